//! Drawable-state WASM exports.
//!
//! Coordinates are written as flat `f64` arrays into caller-provided
//! buffers. Capacities are given in `f64` elements, not bytes.

use courier_core::geometry::Point;

use crate::{RESULT_BUFFER_TOO_SMALL, RESULT_NOT_PRESENT, RESULT_NULL_POINTER, RESULT_OK, with_sim};

/// Copy `values` into the buffer at `out_ptr` if it fits. The number of
/// items (`values.len() / stride`) is always written to `*out_count` so the
/// host can size a retry.
unsafe fn write_flat(
    values: &[f64],
    stride: usize,
    out_ptr: *mut f64,
    out_len: u32,
    out_count: *mut u32,
) -> i32 {
    unsafe { *out_count = (values.len() / stride) as u32 };
    if values.len() > out_len as usize {
        return RESULT_BUFFER_TOO_SMALL;
    }
    if !values.is_empty() {
        unsafe { std::ptr::copy_nonoverlapping(values.as_ptr(), out_ptr, values.len()) };
    }
    RESULT_OK
}

/// Write committed roads as `[x1, y1, x2, y2]` quadruples in drawing order.
/// `*out_count` receives the number of roads.
///
/// Returns [`RESULT_BUFFER_TOO_SMALL`] (after writing the count) if
/// `out_len < 4 * count`.
///
/// # Safety
///
/// `out_ptr` must point to at least `out_len` writable `f64`s.
/// `out_count` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_frame_roads(
    handle: u64,
    out_ptr: *mut f64,
    out_len: u32,
    out_count: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_count.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        let flat: Vec<f64> = slot
            .sim
            .roads()
            .iter()
            .flat_map(|r| [r.start.x, r.start.y, r.end.x, r.end.y])
            .collect();
        unsafe { write_flat(&flat, 4, out_ptr, out_len, out_count) }
    })
}

/// Write the waypoints of the route the vehicle is following as `[x, y]`
/// pairs. `*out_count` receives the number of waypoints, `0` when idle.
///
/// # Safety
///
/// `out_ptr` must point to at least `out_len` writable `f64`s.
/// `out_count` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_frame_path(
    handle: u64,
    out_ptr: *mut f64,
    out_len: u32,
    out_count: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_count.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        let flat: Vec<f64> = slot
            .sim
            .vehicle()
            .path()
            .map(|path| path.waypoints().iter().flat_map(|p| [p.x, p.y]).collect())
            .unwrap_or_default();
        unsafe { write_flat(&flat, 2, out_ptr, out_len, out_count) }
    })
}

/// Write the road being dragged out as `[x1, y1, x2, y2]`.
///
/// Returns [`RESULT_NOT_PRESENT`] when no drag is in progress.
///
/// # Safety
///
/// `out_ptr` must point to at least four writable `f64`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_frame_draft(handle: u64, out_ptr: *mut f64) -> i32 {
    if out_ptr.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| match slot.sim.draft() {
        Some(draft) => {
            let values = [draft.start.x, draft.start.y, draft.current.x, draft.current.y];
            unsafe { std::ptr::copy_nonoverlapping(values.as_ptr(), out_ptr, values.len()) };
            RESULT_OK
        }
        None => RESULT_NOT_PRESENT,
    })
}

/// Write the anchors as `[origin_x, origin_y, destination_x, destination_y]`.
///
/// # Safety
///
/// `out_ptr` must point to at least four writable `f64`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_frame_anchors(handle: u64, out_ptr: *mut f64) -> i32 {
    if out_ptr.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        let Point { x: ox, y: oy } = slot.sim.config().origin;
        let Point { x: dx, y: dy } = slot.sim.config().destination;
        let values = [ox, oy, dx, dy];
        unsafe { std::ptr::copy_nonoverlapping(values.as_ptr(), out_ptr, values.len()) };
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Snapshot export/import WASM exports.

use courier_core::sim::Simulation;
use log::warn;

use crate::{
    INVALID_HANDLE, RESULT_BUFFER_TOO_SMALL, RESULT_DESERIALIZE_ERROR, RESULT_NULL_POINTER,
    RESULT_OK, RESULT_SERIALIZE_ERROR, insert_sim, with_sim,
};

/// Write the snapshot size in bytes to `*out_len`, so the host can size the
/// buffer passed to [`courier_serialize`].
///
/// # Safety
///
/// `out_len` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_serialized_len(handle: u64, out_len: *mut u32) -> i32 {
    if out_len.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| match slot.sim.serialize() {
        Ok(data) => {
            unsafe { *out_len = data.len() as u32 };
            RESULT_OK
        }
        Err(e) => {
            warn!("courier_serialized_len: {e}");
            RESULT_SERIALIZE_ERROR
        }
    })
}

/// Serialize the simulation into the caller-provided buffer at `out_ptr`
/// (capacity `out_len` bytes). The snapshot size is written to
/// `*out_written_ptr` even when the buffer is too small.
///
/// # Safety
///
/// `out_ptr` must point to a writable buffer of at least `out_len` bytes.
/// `out_written_ptr` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_serialize(
    handle: u64,
    out_ptr: *mut u8,
    out_len: u32,
    out_written_ptr: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_written_ptr.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| match slot.sim.serialize() {
        Ok(data) => {
            unsafe { *out_written_ptr = data.len() as u32 };
            if data.len() > out_len as usize {
                return RESULT_BUFFER_TOO_SMALL;
            }
            let buf = unsafe { std::slice::from_raw_parts_mut(out_ptr, data.len()) };
            buf.copy_from_slice(&data);
            RESULT_OK
        }
        Err(e) => {
            warn!("courier_serialize: {e}");
            RESULT_SERIALIZE_ERROR
        }
    })
}

/// Restore a simulation from the snapshot bytes at `data_ptr` (length
/// `data_len`) and write its new handle to `*out_handle`.
///
/// Returns [`RESULT_DESERIALIZE_ERROR`] if the bytes are not a valid
/// snapshot; `*out_handle` is then set to [`INVALID_HANDLE`].
///
/// # Safety
///
/// `data_ptr` must point to at least `data_len` readable bytes.
/// `out_handle` must be a valid, aligned pointer to a `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_deserialize(
    data_ptr: *const u8,
    data_len: u32,
    out_handle: *mut u64,
) -> i32 {
    if data_ptr.is_null() || out_handle.is_null() {
        return RESULT_NULL_POINTER;
    }
    unsafe { *out_handle = INVALID_HANDLE };
    let slice = unsafe { std::slice::from_raw_parts(data_ptr, data_len as usize) };
    match Simulation::deserialize(slice) {
        Ok(sim) => {
            unsafe { *out_handle = insert_sim(sim) };
            RESULT_OK
        }
        Err(e) => {
            warn!("courier_deserialize: {e}");
            RESULT_DESERIALIZE_ERROR
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

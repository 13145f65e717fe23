//! Pointer input WASM exports.

use courier_core::geometry::Point;
use courier_core::input::InputEvent;

use crate::{RESULT_OK, with_sim};

/// Start drawing a road at (`x`, `y`).
#[unsafe(no_mangle)]
pub extern "C" fn courier_pointer_down(handle: u64, x: f64, y: f64) -> i32 {
    with_sim(handle, |slot| {
        slot.sim.handle_input(InputEvent::PointerDown(Point::new(x, y)));
        RESULT_OK
    })
}

/// Move the live end of the road being drawn.
#[unsafe(no_mangle)]
pub extern "C" fn courier_pointer_move(handle: u64, x: f64, y: f64) -> i32 {
    with_sim(handle, |slot| {
        slot.sim.handle_input(InputEvent::PointerMove(Point::new(x, y)));
        RESULT_OK
    })
}

/// Release the pointer at (`x`, `y`). Writes `1` to `*out_added` if a road
/// was committed, `0` if the drag was too short; the pointer may be null.
///
/// # Safety
///
/// `out_added` must be null or a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_pointer_up(handle: u64, x: f64, y: f64, out_added: *mut u32) -> i32 {
    with_sim(handle, |slot| {
        let added = slot.sim.handle_input(InputEvent::PointerUp(Point::new(x, y)));
        if !out_added.is_null() {
            unsafe { *out_added = added.is_some() as u32 };
        }
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{courier_create, courier_road_count};

    fn road_count(h: u64) -> u32 {
        let mut count = 0u32;
        unsafe { courier_road_count(h, &mut count) };
        count
    }

    #[test]
    fn drag_commits_road() {
        let h = courier_create();
        courier_pointer_down(h, 100.0, 100.0);
        courier_pointer_move(h, 150.0, 120.0);
        let mut added = 0u32;
        assert_eq!(unsafe { courier_pointer_up(h, 200.0, 140.0, &mut added) }, RESULT_OK);
        assert_eq!(added, 1);
        assert_eq!(road_count(h), 1);
    }

    #[test]
    fn click_adds_nothing() {
        let h = courier_create();
        courier_pointer_down(h, 100.0, 100.0);
        let mut added = 7u32;
        unsafe { courier_pointer_up(h, 102.0, 101.0, &mut added) };
        assert_eq!(added, 0);
        assert_eq!(road_count(h), 0);
    }

    #[test]
    fn null_out_pointer_is_allowed() {
        let h = courier_create();
        courier_pointer_down(h, 0.0, 0.0);
        assert_eq!(
            unsafe { courier_pointer_up(h, 50.0, 0.0, std::ptr::null_mut()) },
            RESULT_OK
        );
        assert_eq!(road_count(h), 1);
    }
}

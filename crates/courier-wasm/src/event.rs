//! Event polling WASM exports.

use crate::{FlatEvent, RESULT_NULL_POINTER, RESULT_OK, convert_event, with_sim};

/// Copy pending events into the caller-provided buffer at `out_ptr`
/// (capacity `out_len` bytes) as [`FlatEvent`] structs, oldest first.
///
/// The number of events written is stored in `*out_count_ptr`. Events that
/// did not fit stay queued and are returned by the next call.
///
/// # Safety
///
/// `out_ptr` must point to a valid byte buffer of at least `out_len` bytes,
/// aligned for `FlatEvent`. `out_count_ptr` must be a valid, aligned
/// pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_poll_events(
    handle: u64,
    out_ptr: *mut u8,
    out_len: u32,
    out_count_ptr: *mut u32,
) -> i32 {
    if out_ptr.is_null() || out_count_ptr.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        slot.event_cache
            .extend(slot.sim.drain_events().iter().map(convert_event));

        let event_size = std::mem::size_of::<FlatEvent>();
        let max_events = out_len as usize / event_size;
        let count = slot.event_cache.len().min(max_events);

        if count > 0 {
            let src = slot.event_cache.as_ptr() as *const u8;
            unsafe { std::ptr::copy_nonoverlapping(src, out_ptr, count * event_size) };
            slot.event_cache.drain(..count);
        }

        unsafe { *out_count_ptr = count as u32 };
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{courier_pointer_down, courier_pointer_up};
    use crate::sim::{courier_advance, courier_create_with, courier_set_events_enabled};
    use crate::{EVENT_ARRIVED, EVENT_PATH_FOUND, EVENT_ROAD_ADDED, EVENT_ROAD_REJECTED};

    fn poll(h: u64, capacity: usize) -> Vec<FlatEvent> {
        let mut buf = vec![FlatEvent::default(); capacity];
        let mut count = 0u32;
        let rc = unsafe {
            courier_poll_events(
                h,
                buf.as_mut_ptr() as *mut u8,
                (capacity * std::mem::size_of::<FlatEvent>()) as u32,
                &mut count,
            )
        };
        assert_eq!(rc, RESULT_OK);
        buf.truncate(count as usize);
        buf
    }

    fn straight_sim() -> u64 {
        let h = courier_create_with(0.0, 0.0, 20.0, 0.0, 10.0, 0);
        courier_pointer_down(h, 0.0, 0.0);
        unsafe { courier_pointer_up(h, 20.0, 0.0, std::ptr::null_mut()) };
        h
    }

    #[test]
    fn road_then_route_then_arrival() {
        let h = straight_sim();
        let mut arrivals = 0u64;
        unsafe { courier_advance(h, 2, &mut arrivals) };
        assert_eq!(arrivals, 1);

        let kinds: Vec<u32> = poll(h, 16).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EVENT_ROAD_ADDED, EVENT_PATH_FOUND, EVENT_ARRIVED]);
        assert!(poll(h, 16).is_empty());
    }

    #[test]
    fn overflow_stays_queued() {
        let h = straight_sim();
        unsafe { courier_advance(h, 2, std::ptr::null_mut()) };

        let first = poll(h, 1);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, EVENT_ROAD_ADDED);
        let rest = poll(h, 8);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].kind, EVENT_ARRIVED);
        assert_eq!(rest[1].count, 1);
    }

    #[test]
    fn short_drag_is_reported() {
        let h = courier_create_with(0.0, 0.0, 20.0, 0.0, 10.0, 0);
        courier_pointer_down(h, 0.0, 0.0);
        unsafe { courier_pointer_up(h, 1.0, 1.0, std::ptr::null_mut()) };
        let events = poll(h, 4);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EVENT_ROAD_REJECTED);
        assert!((events[0].value - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn disabled_events_are_not_recorded() {
        let h = straight_sim();
        poll(h, 4);
        courier_set_events_enabled(h, 0);
        unsafe { courier_advance(h, 4, std::ptr::null_mut()) };
        assert!(poll(h, 8).is_empty());
    }
}

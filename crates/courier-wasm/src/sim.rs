//! Simulation lifecycle and tick WASM exports.

use courier_core::config::{RebuildPolicy, SimConfig};
use courier_core::geometry::Point;
use courier_core::sim::Simulation;
use log::warn;

use crate::{
    HANDLE_TABLE, INVALID_HANDLE, RESULT_INVALID_HANDLE, RESULT_NULL_POINTER, RESULT_OK,
    handle_to_key, insert_sim, with_sim,
};

/// Create a simulation with the default board layout.
///
/// Returns a non-zero handle.
#[unsafe(no_mangle)]
pub extern "C" fn courier_create() -> u64 {
    insert_sim(Simulation::default())
}

/// Create a simulation with custom anchors and vehicle speed. Snap and
/// minimum-drag thresholds keep their defaults. `cache_route` selects
/// [`RebuildPolicy::OnRoadChange`] when non-zero.
///
/// Returns a non-zero handle, or [`INVALID_HANDLE`] if the values are
/// rejected (non-finite anchors, non-positive speed).
#[unsafe(no_mangle)]
pub extern "C" fn courier_create_with(
    origin_x: f64,
    origin_y: f64,
    destination_x: f64,
    destination_y: f64,
    vehicle_speed: f64,
    cache_route: u32,
) -> u64 {
    let config = SimConfig {
        origin: Point::new(origin_x, origin_y),
        destination: Point::new(destination_x, destination_y),
        vehicle_speed,
        rebuild_policy: if cache_route != 0 {
            RebuildPolicy::OnRoadChange
        } else {
            RebuildPolicy::EveryTick
        },
        ..SimConfig::default()
    };
    match Simulation::new(config) {
        Ok(sim) => insert_sim(sim),
        Err(e) => {
            warn!("courier_create_with: {e}");
            INVALID_HANDLE
        }
    }
}

/// Destroy the simulation at `handle` and free its slot.
///
/// Returns [`RESULT_OK`] on success, or [`RESULT_INVALID_HANDLE`] if the
/// handle is unknown or already destroyed.
#[unsafe(no_mangle)]
pub extern "C" fn courier_destroy(handle: u64) -> i32 {
    HANDLE_TABLE.with(|table| match table.borrow_mut().remove(handle_to_key(handle)) {
        Some(_) => RESULT_OK,
        None => RESULT_INVALID_HANDLE,
    })
}

/// Run one simulation tick.
#[unsafe(no_mangle)]
pub extern "C" fn courier_tick(handle: u64) -> i32 {
    with_sim(handle, |slot| {
        slot.sim.advance();
        RESULT_OK
    })
}

/// Run `ticks` simulation ticks. Writes the number of deliveries completed
/// to `*out_arrivals` when the pointer is non-null.
///
/// # Safety
///
/// `out_arrivals` must be null or a valid, aligned pointer to a `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_advance(handle: u64, ticks: u64, out_arrivals: *mut u64) -> i32 {
    with_sim(handle, |slot| {
        let arrivals = slot.sim.advance_by(ticks);
        if !out_arrivals.is_null() {
            unsafe { *out_arrivals = arrivals };
        }
        RESULT_OK
    })
}

/// Write the current score to `*out_score`.
///
/// # Safety
///
/// `out_score` must be a valid, aligned pointer to a `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_score(handle: u64, out_score: *mut u64) -> i32 {
    if out_score.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        unsafe { *out_score = slot.sim.score() };
        RESULT_OK
    })
}

/// Write the number of ticks run so far to `*out_tick`.
///
/// # Safety
///
/// `out_tick` must be a valid, aligned pointer to a `u64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_get_tick(handle: u64, out_tick: *mut u64) -> i32 {
    if out_tick.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        unsafe { *out_tick = slot.sim.tick() };
        RESULT_OK
    })
}

/// Write the vehicle position to `*out_x` / `*out_y`.
///
/// # Safety
///
/// Both pointers must be valid, aligned pointers to `f64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_vehicle_position(
    handle: u64,
    out_x: *mut f64,
    out_y: *mut f64,
) -> i32 {
    if out_x.is_null() || out_y.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        let p = slot.sim.vehicle_position();
        unsafe {
            *out_x = p.x;
            *out_y = p.y;
        }
        RESULT_OK
    })
}

/// Write the number of committed roads to `*out_count`.
///
/// # Safety
///
/// `out_count` must be a valid, aligned pointer to a `u32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_road_count(handle: u64, out_count: *mut u32) -> i32 {
    if out_count.is_null() {
        return RESULT_NULL_POINTER;
    }
    with_sim(handle, |slot| {
        unsafe { *out_count = slot.sim.roads().len() as u32 };
        RESULT_OK
    })
}

/// Turn event recording on (`enabled != 0`) or off. Hosts that never call
/// `courier_poll_events` should turn it off.
#[unsafe(no_mangle)]
pub extern "C" fn courier_set_events_enabled(handle: u64, enabled: u32) -> i32 {
    with_sim(handle, |slot| {
        slot.sim.set_events_enabled(enabled != 0);
        if enabled == 0 {
            slot.event_cache.clear();
        }
        RESULT_OK
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

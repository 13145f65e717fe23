//! WASM bindings for the courier simulation.
//!
//! This crate exposes a C-compatible, integer-handle-based API suitable for
//! consumption from JavaScript/TypeScript via raw WASM imports. The same API
//! also works as a plain `cdylib` on native targets.
//!
//! # Handles
//!
//! Simulations live in a thread-local slot map. A handle is the slot map
//! key's FFI encoding, so a destroyed handle can never alias a newer
//! simulation. `0` is never a valid handle and is returned on failure.
//!
//! # Host loop
//!
//! Per display refresh the host forwards pointer events, calls
//! `courier_tick`, then reads drawable state with the `courier_frame_*`
//! exports and drains events with `courier_poll_events`. Buffers are always
//! caller-provided; the `courier_alloc`/`courier_free` exports let a
//! JavaScript host carve them out of linear memory.

pub mod event;
pub mod frame;
pub mod input;
pub mod serialize;
pub mod sim;

use std::cell::RefCell;

use courier_core::event::SimEvent;
use courier_core::sim::Simulation;

use slotmap::{Key, KeyData, SlotMap, new_key_type};

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Success.
pub const RESULT_OK: i32 = 0;
/// The simulation handle is invalid.
pub const RESULT_INVALID_HANDLE: i32 = 1;
/// Serialization failed.
pub const RESULT_SERIALIZE_ERROR: i32 = 2;
/// Deserialization failed.
pub const RESULT_DESERIALIZE_ERROR: i32 = 3;
/// A required output pointer was null.
pub const RESULT_NULL_POINTER: i32 = 4;
/// The caller-provided buffer is too small.
pub const RESULT_BUFFER_TOO_SMALL: i32 = 5;
/// The requested item does not exist right now (e.g. no draft road).
pub const RESULT_NOT_PRESENT: i32 = 6;

/// Handle value that never refers to a simulation.
pub const INVALID_HANDLE: u64 = 0;

// ---------------------------------------------------------------------------
// Handle table
// ---------------------------------------------------------------------------

new_key_type! {
    /// Key of a simulation in the handle table.
    pub struct SimKey;
}

/// Per-simulation state held in the handle table.
pub struct SimSlot {
    pub sim: Simulation,
    /// Events drained by the last `courier_poll_events` call.
    pub event_cache: Vec<FlatEvent>,
}

impl SimSlot {
    fn new(sim: Simulation) -> Self {
        Self {
            sim,
            event_cache: Vec::new(),
        }
    }
}

thread_local! {
    static HANDLE_TABLE: RefCell<SlotMap<SimKey, SimSlot>> = RefCell::new(SlotMap::with_key());
}

/// Insert a simulation and return its handle.
fn insert_sim(sim: Simulation) -> u64 {
    HANDLE_TABLE.with(|table| {
        let key = table.borrow_mut().insert(SimSlot::new(sim));
        key_to_handle(key)
    })
}

/// Run a closure with mutable access to the [`SimSlot`] at `handle`.
/// Returns [`RESULT_INVALID_HANDLE`] if the handle is unknown or destroyed.
fn with_sim<F>(handle: u64, f: F) -> i32
where
    F: FnOnce(&mut SimSlot) -> i32,
{
    HANDLE_TABLE.with(|table| {
        let mut table = table.borrow_mut();
        match table.get_mut(handle_to_key(handle)) {
            Some(slot) => f(slot),
            None => RESULT_INVALID_HANDLE,
        }
    })
}

// ---------------------------------------------------------------------------
// Handle conversion helpers
// ---------------------------------------------------------------------------

fn key_to_handle(key: SimKey) -> u64 {
    key.data().as_ffi()
}

fn handle_to_key(handle: u64) -> SimKey {
    // `from_ffi(0)` would decode to the first slot.
    if handle == INVALID_HANDLE {
        return SimKey::null();
    }
    KeyData::from_ffi(handle).into()
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Event kind codes used in [`FlatEvent::kind`].
pub const EVENT_ROAD_ADDED: u32 = 0;
pub const EVENT_ROAD_REJECTED: u32 = 1;
pub const EVENT_PATH_FOUND: u32 = 2;
pub const EVENT_PATH_LOST: u32 = 3;
pub const EVENT_ARRIVED: u32 = 4;
pub const EVENT_INPUT_REJECTED: u32 = 5;

/// Flat, `repr(C)` event representation for WASM consumers.
///
/// Field use by kind: `road` for road-added; `value` holds the drag length
/// for road-rejected, the path length for path-found and the score for
/// arrived; `count` holds the hop count for path-found.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatEvent {
    pub kind: u32,
    pub road: u32,
    pub tick: u64,
    pub count: u64,
    pub value: f64,
}

fn convert_event(event: &SimEvent) -> FlatEvent {
    match *event {
        SimEvent::RoadAdded { road, tick } => FlatEvent {
            kind: EVENT_ROAD_ADDED,
            road: road.0,
            tick,
            ..Default::default()
        },
        SimEvent::RoadRejected { length, tick } => FlatEvent {
            kind: EVENT_ROAD_REJECTED,
            tick,
            value: length,
            ..Default::default()
        },
        SimEvent::PathFound { hops, length, tick } => FlatEvent {
            kind: EVENT_PATH_FOUND,
            tick,
            count: hops as u64,
            value: length,
            ..Default::default()
        },
        SimEvent::PathLost { tick } => FlatEvent {
            kind: EVENT_PATH_LOST,
            tick,
            ..Default::default()
        },
        SimEvent::Arrived { score, tick } => FlatEvent {
            kind: EVENT_ARRIVED,
            tick,
            count: score,
            value: score as f64,
            ..Default::default()
        },
        SimEvent::InputRejected { tick, .. } => FlatEvent {
            kind: EVENT_INPUT_REJECTED,
            tick,
            ..Default::default()
        },
    }
}

// ---------------------------------------------------------------------------
// Linear-memory allocator exports
// ---------------------------------------------------------------------------

/// Allocate `size` bytes aligned to `align` in the WASM linear memory.
/// Returns a pointer to the allocated region, or null on failure.
///
/// # Safety
///
/// The caller must ensure `size` and `align` are valid (align must be a
/// power of two and non-zero).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_alloc(size: usize, align: usize) -> *mut u8 {
    if size == 0 || align == 0 || !align.is_power_of_two() {
        return std::ptr::null_mut();
    }
    let layout = match std::alloc::Layout::from_size_align(size, align) {
        Ok(l) => l,
        Err(_) => return std::ptr::null_mut(),
    };
    // SAFETY: layout has non-zero size, checked above.
    unsafe { std::alloc::alloc(layout) }
}

/// Free a region previously allocated by [`courier_alloc`].
///
/// # Safety
///
/// `ptr` must have been returned by `courier_alloc` with the same `size`
/// and `align` values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn courier_free(ptr: *mut u8, size: usize, align: usize) {
    if ptr.is_null() || size == 0 || align == 0 || !align.is_power_of_two() {
        return;
    }
    // SAFETY: caller guarantees ptr/size/align match a previous alloc call.
    if let Ok(layout) = std::alloc::Layout::from_size_align(size, align) {
        unsafe { std::alloc::dealloc(ptr, layout) };
    }
}

//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::{RebuildPolicy, SimConfig};
use crate::geometry::Point;
use crate::input::InputEvent;
use crate::id::RoadId;
use crate::road::Road;
use crate::sim::Simulation;

// ===========================================================================
// Geometry shorthands
// ===========================================================================

pub fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub fn road(x1: f64, y1: f64, x2: f64, y2: f64) -> Road {
    Road::new(pt(x1, y1), pt(x2, y2))
}

/// Whether two points are within `1e-6` of each other.
pub fn approx_eq(a: Point, b: Point) -> bool {
    a.distance(&b) < 1e-6
}

// ===========================================================================
// Simulation builders
// ===========================================================================

/// A config with the given anchors and speed; everything else default.
pub fn config(origin: Point, destination: Point, speed: f64) -> SimConfig {
    SimConfig {
        origin,
        destination,
        vehicle_speed: speed,
        ..SimConfig::default()
    }
}

/// A session with the given anchors, speed and preset roads.
pub fn sim_with_roads(origin: Point, destination: Point, speed: f64, roads: &[Road]) -> Simulation {
    let mut sim = Simulation::new(config(origin, destination, speed)).expect("valid test config");
    for &r in roads {
        sim.add_road(r);
    }
    sim
}

/// Same as [`sim_with_roads`] but caching the route between road changes.
pub fn cached_sim_with_roads(
    origin: Point,
    destination: Point,
    speed: f64,
    roads: &[Road],
) -> Simulation {
    let mut cfg = config(origin, destination, speed);
    cfg.rebuild_policy = RebuildPolicy::OnRoadChange;
    let mut sim = Simulation::new(cfg).expect("valid test config");
    for &r in roads {
        sim.add_road(r);
    }
    sim
}

/// Drive a full press-drag-release gesture.
pub fn drag(sim: &mut Simulation, from: Point, to: Point) -> Option<RoadId> {
    sim.handle_input(InputEvent::PointerDown(from));
    sim.handle_input(InputEvent::PointerMove(from.lerp(to, 0.5)));
    sim.handle_input(InputEvent::PointerMove(to));
    sim.handle_input(InputEvent::PointerUp(to))
}

/// Tick until the next arrival. Returns the number of ticks taken, or
/// `None` if nothing arrived within `limit` ticks.
pub fn ticks_until_arrival(sim: &mut Simulation, limit: u64) -> Option<u64> {
    for n in 1..=limit {
        if sim.advance().arrived() {
            return Some(n);
        }
    }
    None
}

/// A grid of `cols` x `rows` junctions `spacing` apart starting at `origin`,
/// wired with horizontal roads first, then vertical ones.
pub fn grid_roads(origin: Point, cols: usize, rows: usize, spacing: f64) -> Vec<Road> {
    let at = |c: usize, r: usize| pt(origin.x + c as f64 * spacing, origin.y + r as f64 * spacing);
    let mut roads = Vec::new();
    for r in 0..rows {
        for c in 0..cols.saturating_sub(1) {
            roads.push(Road::new(at(c, r), at(c + 1, r)));
        }
    }
    for c in 0..cols {
        for r in 0..rows.saturating_sub(1) {
            roads.push(Road::new(at(c, r), at(c, r + 1)));
        }
    }
    roads
}

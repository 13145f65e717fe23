//! Vehicle motion along a route.
//!
//! The vehicle follows its current [`Path`] one segment at a time. After `k`
//! ticks on a segment of length `L` its progress is `k * speed / L`, a
//! fraction in `[0, 1)`. The segment is finished on the first tick with
//! `k >= L / speed`, so a segment always takes exactly `ceil(L / speed)`
//! ticks. Reaching the end of a segment snaps the vehicle onto the next node;
//! any leftover distance is dropped.
//!
//! # State machine
//!
//! - **Idle**: no path, or an empty one. The vehicle holds its position.
//! - **Traveling**: interpolating between `path[i]` and `path[i + 1]`.
//! - **Arrived**: the last node was reached (or the path is a single node
//!   because the anchors merged). The vehicle resets to the origin with
//!   segment 0 and progress 0; the caller scores the delivery.

use crate::geometry::Point;
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Largest `f64` below 1.
const PROGRESS_MAX: f64 = 1.0 - f64::EPSILON / 2.0;

/// What happened to the vehicle during one [`Vehicle::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionOutcome {
    /// No usable path; position unchanged.
    Idle,
    /// Moved along the path and has not reached the end yet.
    Traveling,
    /// Reached the destination and was reset to the origin.
    Arrived,
}

/// The delivery vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    position: Point,
    /// Distance units per tick.
    speed: f64,
    path: Option<Path>,
    segment_index: usize,
    /// Ticks spent on the current segment.
    segment_ticks: u64,
    progress: f64,
}

impl Vehicle {
    /// A vehicle parked at `origin` with no path.
    pub fn new(origin: Point, speed: f64) -> Self {
        Self {
            position: origin,
            speed,
            path: None,
            segment_index: 0,
            segment_ticks: 0,
            progress: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    pub fn segment_ticks(&self) -> u64 {
        self.segment_ticks
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Replace the current path. Segment index and tick count carry over so a
    /// freshly recomputed path with the same shape continues seamlessly;
    /// [`step`](Self::step) resets them if they no longer fit.
    pub fn set_path(&mut self, path: Option<Path>) {
        self.path = path;
    }

    /// Park at `origin` at the start of the path.
    pub fn reset_to(&mut self, origin: Point) {
        self.position = origin;
        self.segment_index = 0;
        self.segment_ticks = 0;
        self.progress = 0.0;
    }

    /// Advance one tick along the current path.
    pub fn step(&mut self, origin: Point) -> MotionOutcome {
        let waypoints = match &self.path {
            Some(path) if !path.is_empty() => path.waypoints(),
            _ => return MotionOutcome::Idle,
        };

        if waypoints.len() == 1 {
            self.reset_to(origin);
            return MotionOutcome::Arrived;
        }

        let last = waypoints.len() - 1;
        if self.segment_index >= last {
            // The route got shorter since the index was stored.
            self.segment_index = 0;
            self.segment_ticks = 0;
        }

        let from = waypoints[self.segment_index];
        let to = waypoints[self.segment_index + 1];
        let length = from.distance(&to);

        self.segment_ticks += 1;
        let ticks = self.segment_ticks as f64;
        if length > 0.0 && ticks < length / self.speed {
            self.progress = (ticks * self.speed / length).min(PROGRESS_MAX);
            self.position = from.lerp(to, self.progress);
            return MotionOutcome::Traveling;
        }

        self.segment_index += 1;
        self.segment_ticks = 0;
        self.progress = 0.0;
        if self.segment_index >= last {
            self.reset_to(origin);
            return MotionOutcome::Arrived;
        }
        self.position = to;
        MotionOutcome::Traveling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(&b) < 1e-9
    }

    const ORIGIN: Point = Point::new(0.0, 0.0);

    #[test]
    fn no_path_is_idle() {
        let mut vehicle = Vehicle::new(ORIGIN, 2.0);
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Idle);
        assert_eq!(vehicle.position(), ORIGIN);
    }

    #[test]
    fn idle_holds_last_position() {
        let mut vehicle = Vehicle::new(ORIGIN, 5.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, p(100.0, 0.0)])));
        vehicle.step(ORIGIN);
        vehicle.step(ORIGIN);
        let held = vehicle.position();
        assert!(close(held, p(10.0, 0.0)));

        vehicle.set_path(None);
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Idle);
        assert_eq!(vehicle.position(), held);
    }

    #[test]
    fn single_node_path_arrives_without_moving() {
        let mut vehicle = Vehicle::new(ORIGIN, 2.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN])));
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Arrived);
        assert_eq!(vehicle.position(), ORIGIN);
        assert_eq!(vehicle.segment_index(), 0);
        assert_eq!(vehicle.progress(), 0.0);
    }

    #[test]
    fn straight_segment_interpolates_and_arrives() {
        let dest = p(30.0, 40.0); // length 50
        let mut vehicle = Vehicle::new(ORIGIN, 10.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, dest])));

        for k in 1..5 {
            assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Traveling);
            let expected = ORIGIN.lerp(dest, k as f64 * 10.0 / 50.0);
            assert!(close(vehicle.position(), expected), "tick {k}");
        }
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Arrived);
        assert_eq!(vehicle.position(), ORIGIN);
        assert_eq!(vehicle.segment_index(), 0);
        assert_eq!(vehicle.progress(), 0.0);
    }

    #[test]
    fn segment_end_snaps_to_intermediate_node() {
        let mid = p(10.0, 0.0);
        let end = p(10.0, 10.0);
        let mut vehicle = Vehicle::new(ORIGIN, 4.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, mid, end])));

        vehicle.step(ORIGIN); // 0.4
        vehicle.step(ORIGIN); // 0.8
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Traveling); // 1.2 -> next segment
        assert_eq!(vehicle.segment_index(), 1);
        assert_eq!(vehicle.progress(), 0.0);
        assert_eq!(vehicle.position(), mid);
    }

    #[test]
    fn zero_length_segment_completes_immediately() {
        let end = p(0.0, 20.0);
        let mut vehicle = Vehicle::new(ORIGIN, 1.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, ORIGIN, end])));

        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Traveling);
        assert_eq!(vehicle.segment_index(), 1);
        assert!(vehicle.position().is_finite());
        assert_eq!(vehicle.position(), ORIGIN);
    }

    #[test]
    fn zero_length_final_segment_arrives() {
        let mut vehicle = Vehicle::new(ORIGIN, 1.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, ORIGIN])));
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Arrived);
        assert!(vehicle.position().is_finite());
    }

    #[test]
    fn shrunk_path_resets_segment_index() {
        let mut vehicle = Vehicle::new(ORIGIN, 10.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![
            ORIGIN,
            p(10.0, 0.0),
            p(20.0, 0.0),
            p(30.0, 0.0),
        ])));
        vehicle.step(ORIGIN);
        vehicle.step(ORIGIN);
        assert_eq!(vehicle.segment_index(), 2);

        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, p(100.0, 0.0)])));
        assert_eq!(vehicle.step(ORIGIN), MotionOutcome::Traveling);
        assert_eq!(vehicle.segment_index(), 0);
        assert!(close(vehicle.position(), p(10.0, 0.0)));
    }

    #[test]
    fn progress_stays_below_one() {
        let mut vehicle = Vehicle::new(ORIGIN, 3.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, p(7.0, 0.0), p(7.0, 9.0)])));
        for _ in 0..20 {
            vehicle.step(ORIGIN);
            assert!((0.0..1.0).contains(&vehicle.progress()));
        }
    }

    fn ticks_to_arrive(length: f64, speed: f64) -> u64 {
        let mut vehicle = Vehicle::new(ORIGIN, speed);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, p(length, 0.0)])));
        let mut ticks = 1;
        while vehicle.step(ORIGIN) != MotionOutcome::Arrived {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn length_just_past_whole_ticks_needs_one_more() {
        assert_eq!(ticks_to_arrive(10.000000001, 1.0), 11);
        assert_eq!(ticks_to_arrive(10.0, 1.0), 10);
    }

    #[test]
    fn fractional_speed_finishes_on_exact_tick() {
        // Summing 0.1 ten times lands below 1.
        assert_eq!(ticks_to_arrive(1.0, 0.1), 10);
    }

    #[test]
    fn segment_ticks_reset_on_new_segment() {
        let mut vehicle = Vehicle::new(ORIGIN, 4.0);
        vehicle.set_path(Some(Path::from_waypoints(vec![ORIGIN, p(10.0, 0.0), p(10.0, 10.0)])));
        vehicle.step(ORIGIN);
        vehicle.step(ORIGIN);
        assert_eq!(vehicle.segment_ticks(), 2);
        vehicle.step(ORIGIN);
        assert_eq!(vehicle.segment_ticks(), 0);
        vehicle.step(ORIGIN);
        assert!(close(vehicle.position(), p(10.0, 4.0)));
    }
}

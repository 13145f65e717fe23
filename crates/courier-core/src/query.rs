//! Read-only drawable state for renderers.
//!
//! A [`Frame`] is an owned copy of everything a renderer needs for one
//! refresh. Nothing in it borrows from the simulation, so it can be handed
//! across FFI boundaries or kept around after the next tick.

use crate::geometry::Point;
use crate::id::Ticks;
use crate::input::Draft;
use crate::road::Road;

/// Everything needed to draw one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Committed roads in drawing order.
    pub roads: Vec<Road>,
    /// The road currently being dragged out, if any.
    pub draft: Option<Draft>,
    /// Warehouse anchor.
    pub origin: Point,
    /// Delivery anchor.
    pub destination: Point,
    /// Current vehicle position.
    pub vehicle: Point,
    /// Waypoints of the route the vehicle is following. Empty when idle.
    pub path: Vec<Point>,
    /// Deliveries completed so far.
    pub score: u64,
    /// Ticks run so far.
    pub tick: Ticks,
}

impl Frame {
    /// Whether the vehicle currently has a route to follow.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

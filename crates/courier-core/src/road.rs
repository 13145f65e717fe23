//! The drawn road collection.
//!
//! Roads are append-only: there is no erase, and a road is never mutated
//! after it is added. Insertion order is significant because the graph
//! builder merges endpoints in that order.

use crate::geometry::Point;
use crate::id::RoadId;
use serde::{Deserialize, Serialize};

/// A straight road between two endpoints, stored exactly as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub start: Point,
    pub end: Point,
}

impl Road {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Drawn length (before any endpoint snapping).
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// Ordered, append-only collection of roads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    roads: Vec<Road>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a road and return its id.
    pub fn push(&mut self, road: Road) -> RoadId {
        let id = RoadId(self.roads.len() as u32);
        self.roads.push(road);
        id
    }

    pub fn get(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Roads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    pub fn as_slice(&self) -> &[Road] {
        &self.roads
    }
}

impl FromIterator<Road> for RoadNetwork {
    fn from_iter<I: IntoIterator<Item = Road>>(iter: I) -> Self {
        Self {
            roads: iter.into_iter().collect(),
        }
    }
}

//! Simulation configuration.
//!
//! All tunables live in [`SimConfig`]. The defaults reproduce the reference
//! game: a 600x400 board with the warehouse near the top-left corner and the
//! delivery point near the bottom-right.

use crate::event::DEFAULT_EVENT_CAPACITY;
use crate::geometry::Point;
use crate::input::MIN_ROAD_LENGTH;
use crate::merge::SNAP_DISTANCE;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors reported by [`SimConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got ({x}, {y})")]
    NonFiniteAnchor { field: &'static str, x: f64, y: f64 },
    #[error("vehicle speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Rebuild policy
// ---------------------------------------------------------------------------

/// When the road graph and route are recomputed.
///
/// Both policies produce identical trajectories: the road list is the only
/// input to graph construction and it only changes when a road is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RebuildPolicy {
    /// Rebuild the graph and search it on every tick.
    #[default]
    EveryTick,
    /// Keep the last graph and route until a road is added.
    OnRoadChange,
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Simulation`](crate::sim::Simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Warehouse anchor. The vehicle starts and restarts here.
    pub origin: Point,
    /// Delivery anchor.
    pub destination: Point,
    /// Positions strictly closer than this merge into one node.
    pub snap_threshold: f64,
    /// Drags no longer than this are discarded.
    pub min_road_length: f64,
    /// Vehicle speed in distance units per tick.
    pub vehicle_speed: f64,
    pub rebuild_policy: RebuildPolicy,
    /// Events kept for the host before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(60.0, 60.0),
            destination: Point::new(540.0, 340.0),
            snap_threshold: SNAP_DISTANCE,
            min_road_length: MIN_ROAD_LENGTH,
            vehicle_speed: 2.0,
            rebuild_policy: RebuildPolicy::EveryTick,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SimConfig {
    /// Check that every value is usable. Anchors closer than the snap
    /// threshold are allowed; they merge into one node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, anchor) in [("origin", self.origin), ("destination", self.destination)] {
            if !anchor.is_finite() {
                return Err(ConfigError::NonFiniteAnchor {
                    field,
                    x: anchor.x,
                    y: anchor.y,
                });
            }
        }
        if !self.vehicle_speed.is_finite() || self.vehicle_speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.vehicle_speed));
        }
        for (field, value) in [
            ("snap_threshold", self.snap_threshold),
            ("min_road_length", self.min_road_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        Ok(())
    }
}

//! Data-driven session setup from JSON.
//!
//! Feature-gated behind `data-loader`. A session file holds an optional
//! [`SimConfig`] (missing fields fall back to defaults) and an optional list
//! of preset roads, applied in file order.
//!
//! ```json
//! {
//!   "config": { "vehicle_speed": 3.0 },
//!   "roads": [ { "from": [60, 60], "to": [540, 340] } ]
//! }
//! ```

use crate::config::{ConfigError, SimConfig};
use crate::geometry::Point;
use crate::road::{Road, RoadNetwork};
use crate::sim::Simulation;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("road {index} has a non-finite endpoint")]
    NonFiniteRoad { index: usize },
}

// ---------------------------------------------------------------------------
// JSON data structures
// ---------------------------------------------------------------------------

/// Top-level session file.
#[derive(Debug, serde::Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub config: SimConfig,
    #[serde(default)]
    pub roads: Vec<RoadData>,
}

/// JSON representation of a preset road.
#[derive(Debug, serde::Deserialize)]
pub struct RoadData {
    pub from: [f64; 2],
    pub to: [f64; 2],
}

// ---------------------------------------------------------------------------
// Loading functions
// ---------------------------------------------------------------------------

/// Load and validate a configuration from a JSON string.
pub fn load_config_json(json: &str) -> Result<SimConfig, DataLoadError> {
    let config: SimConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load a full session (configuration plus preset roads) from a JSON string.
pub fn load_session_json(json: &str) -> Result<Simulation, DataLoadError> {
    let data: SessionData = serde_json::from_str(json)?;
    build_session(data)
}

/// Load a full session from JSON bytes.
pub fn load_session_json_bytes(bytes: &[u8]) -> Result<Simulation, DataLoadError> {
    let data: SessionData = serde_json::from_slice(bytes)?;
    build_session(data)
}

fn build_session(data: SessionData) -> Result<Simulation, DataLoadError> {
    let mut roads = RoadNetwork::new();
    for (index, road) in data.roads.iter().enumerate() {
        let start = Point::new(road.from[0], road.from[1]);
        let end = Point::new(road.to[0], road.to[1]);
        if !start.is_finite() || !end.is_finite() {
            return Err(DataLoadError::NonFiniteRoad { index });
        }
        roads.push(Road::new(start, end));
    }
    Ok(Simulation::with_roads(data.config, roads)?)
}

//! Session snapshots.
//!
//! A snapshot captures the configuration, drawn roads, vehicle and score as
//! bitcode bytes behind a versioned header. The route cache and pending
//! events are not stored: the next tick rebuilds the graph from the roads.

use crate::config::{ConfigError, SimConfig};
use crate::id::Ticks;
use crate::motion::Vehicle;
use crate::road::RoadNetwork;
use crate::sim::Simulation;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a courier session snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xC0DE_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("snapshot carries an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("snapshot carries an invalid vehicle: {0}")]
    InvalidVehicle(&'static str),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every serialized snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Tick count at the time the snapshot was taken.
    pub tick: Ticks,
}

impl SnapshotHeader {
    pub fn new(tick: Ticks) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Serializable session state
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    header: SnapshotHeader,
    config: SimConfig,
    roads: RoadNetwork,
    vehicle: Vehicle,
    score: u64,
}

/// Read and validate the header of a snapshot, for version checks. Fails
/// with the same header errors as [`Simulation::deserialize`].
pub fn read_snapshot_header(data: &[u8]) -> Result<SnapshotHeader, DeserializeError> {
    // bitcode has no partial decoding, so the whole snapshot is decoded.
    let snapshot: SessionSnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok(snapshot.header)
}

/// Reject vehicle state that [`Vehicle::step`] could never have produced
/// under `config`.
fn check_vehicle(vehicle: &Vehicle, config: &SimConfig) -> Result<(), DeserializeError> {
    if vehicle.speed() != config.vehicle_speed {
        return Err(DeserializeError::InvalidVehicle("speed differs from configuration"));
    }
    if !vehicle.position().is_finite() {
        return Err(DeserializeError::InvalidVehicle("position is not finite"));
    }
    if !(0.0..1.0).contains(&vehicle.progress()) {
        return Err(DeserializeError::InvalidVehicle("progress outside [0, 1)"));
    }
    let path_finite = vehicle
        .path()
        .is_none_or(|path| path.waypoints().iter().all(|p| p.is_finite()));
    if !path_finite {
        return Err(DeserializeError::InvalidVehicle("path has a non-finite waypoint"));
    }
    Ok(())
}

impl Simulation {
    /// Encode the session as snapshot bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let snapshot = SessionSnapshot {
            header: SnapshotHeader::new(self.tick),
            config: self.config.clone(),
            roads: self.roads.clone(),
            vehicle: self.vehicle.clone(),
            score: self.score,
        };
        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Restore a session from snapshot bytes. Any in-progress gesture at
    /// the time of the snapshot is not restored.
    pub fn deserialize(data: &[u8]) -> Result<Self, DeserializeError> {
        let snapshot: SessionSnapshot =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        snapshot.header.validate()?;
        snapshot.config.validate()?;
        check_vehicle(&snapshot.vehicle, &snapshot.config)?;

        let mut sim = Simulation::from_parts(snapshot.config, snapshot.roads);
        sim.restore_progress(snapshot.vehicle, snapshot.score, snapshot.header.tick);
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::input::InputEvent;

    fn sample_sim() -> Simulation {
        let config = SimConfig {
            origin: Point::new(0.0, 0.0),
            destination: Point::new(100.0, 0.0),
            vehicle_speed: 7.0,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)));
        sim.handle_input(InputEvent::PointerUp(Point::new(100.0, 0.0)));
        sim.advance_by(20);
        sim
    }

    #[test]
    fn round_trip_preserves_session() {
        let sim = sample_sim();
        let data = sim.serialize().unwrap();
        let restored = Simulation::deserialize(&data).unwrap();

        assert_eq!(restored.tick(), sim.tick());
        assert_eq!(restored.score(), sim.score());
        assert_eq!(restored.roads(), sim.roads());
        assert_eq!(restored.vehicle(), sim.vehicle());
        assert_eq!(restored.config(), sim.config());
    }

    #[test]
    fn restored_session_continues_identically() {
        let mut original = sample_sim();
        let mut restored = Simulation::deserialize(&original.serialize().unwrap()).unwrap();
        for _ in 0..30 {
            let a = original.advance();
            let b = restored.advance();
            assert_eq!(a, b);
            assert_eq!(original.vehicle_position(), restored.vehicle_position());
        }
    }

    #[test]
    fn header_reports_tick() {
        let sim = sample_sim();
        let header = read_snapshot_header(&sim.serialize().unwrap()).unwrap();
        assert_eq!(header, SnapshotHeader::new(20));
    }

    #[test]
    fn header_validation() {
        let mut header = SnapshotHeader::new(0);
        assert!(header.validate().is_ok());

        header.magic = 0xDEAD_BEEF;
        assert!(matches!(header.validate(), Err(DeserializeError::InvalidMagic(0xDEAD_BEEF))));

        header.magic = SNAPSHOT_MAGIC;
        header.version = FORMAT_VERSION + 1;
        assert!(matches!(header.validate(), Err(DeserializeError::FutureVersion(_))));

        header.version = 0;
        assert!(matches!(header.validate(), Err(DeserializeError::UnsupportedVersion(0))));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let result = Simulation::deserialize(&[1, 2, 3]);
        assert!(matches!(result, Err(DeserializeError::Decode(_))));
    }

    fn tampered(vehicle: Vehicle) -> Vec<u8> {
        let sim = sample_sim();
        let snapshot = SessionSnapshot {
            header: SnapshotHeader::new(sim.tick()),
            config: sim.config().clone(),
            roads: sim.roads().clone(),
            vehicle,
            score: sim.score(),
        };
        bitcode::serialize(&snapshot).unwrap()
    }

    #[test]
    fn vehicle_speed_must_match_config() {
        let origin = Point::new(0.0, 0.0);
        for speed in [-5.0, 0.0, f64::NAN, 3.0] {
            let result = Simulation::deserialize(&tampered(Vehicle::new(origin, speed)));
            assert!(
                matches!(result, Err(DeserializeError::InvalidVehicle(_))),
                "speed {speed}"
            );
        }
        assert!(Simulation::deserialize(&tampered(Vehicle::new(origin, 7.0))).is_ok());
    }

    #[test]
    fn non_finite_vehicle_position_is_rejected() {
        let vehicle = Vehicle::new(Point::new(f64::INFINITY, 0.0), 7.0);
        assert!(matches!(
            Simulation::deserialize(&tampered(vehicle)),
            Err(DeserializeError::InvalidVehicle("position is not finite"))
        ));
    }

    #[test]
    fn header_read_rejects_bad_magic() {
        let sim = sample_sim();
        let snapshot = SessionSnapshot {
            header: SnapshotHeader {
                magic: 0xDEAD_BEEF,
                ..SnapshotHeader::new(5)
            },
            config: sim.config().clone(),
            roads: sim.roads().clone(),
            vehicle: sim.vehicle().clone(),
            score: 0,
        };
        let data = bitcode::serialize(&snapshot).unwrap();
        assert!(matches!(
            read_snapshot_header(&data),
            Err(DeserializeError::InvalidMagic(0xDEAD_BEEF))
        ));
    }
}

//! Simulation events buffered for the host.
//!
//! Events are recorded while input is handled and while a tick runs, and
//! stay in the buffer until the host drains them. The buffer has a fixed
//! capacity and drops its oldest events once full, so a host that never
//! drains it still uses bounded memory.

use crate::geometry::Point;
use crate::id::{RoadId, Ticks};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Something noteworthy that happened in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A drawn road was appended to the network.
    RoadAdded { road: RoadId, tick: Ticks },
    /// A gesture was released too close to where it started.
    RoadRejected { length: f64, tick: Ticks },
    /// A route exists where there was none on the previous tick.
    PathFound { hops: usize, length: f64, tick: Ticks },
    /// The route that existed on the previous tick is gone.
    PathLost { tick: Ticks },
    /// The vehicle reached the destination.
    Arrived { score: u64, tick: Ticks },
    /// An input event carried a non-finite coordinate and was dropped.
    InputRejected { at: Point, tick: Ticks },
}

/// Discriminant tag for event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimEventKind {
    RoadAdded,
    RoadRejected,
    PathFound,
    PathLost,
    Arrived,
    InputRejected,
}

impl SimEvent {
    pub fn kind(&self) -> SimEventKind {
        match self {
            SimEvent::RoadAdded { .. } => SimEventKind::RoadAdded,
            SimEvent::RoadRejected { .. } => SimEventKind::RoadRejected,
            SimEvent::PathFound { .. } => SimEventKind::PathFound,
            SimEvent::PathLost { .. } => SimEventKind::PathLost,
            SimEvent::Arrived { .. } => SimEventKind::Arrived,
            SimEvent::InputRejected { .. } => SimEventKind::InputRejected,
        }
    }

    pub fn tick(&self) -> Ticks {
        match *self {
            SimEvent::RoadAdded { tick, .. }
            | SimEvent::RoadRejected { tick, .. }
            | SimEvent::PathFound { tick, .. }
            | SimEvent::PathLost { tick }
            | SimEvent::Arrived { tick, .. }
            | SimEvent::InputRejected { tick, .. } => tick,
        }
    }
}

/// Default number of events an [`EventLog`] holds before dropping the oldest.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Pending events in the order they were recorded.
///
/// Fixed capacity: when full, recording a new event drops the oldest one.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    capacity: usize,
    enabled: bool,
    /// Events discarded because the log was full.
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding at most `capacity` events. A capacity of 0 is clamped
    /// to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
            capacity,
            enabled: true,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: SimEvent) {
        if !self.enabled {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Turn recording on or off. Disabling drops anything pending.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.events.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events discarded since creation because the log was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Iterate over pending events from oldest to newest.
    pub fn pending(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Take every pending event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order() {
        let mut log = EventLog::new();
        log.push(SimEvent::RoadAdded {
            road: RoadId(0),
            tick: 0,
        });
        log.push(SimEvent::Arrived { score: 1, tick: 4 });

        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), SimEventKind::RoadAdded);
        assert_eq!(events[1].tick(), 4);
        assert!(log.is_empty());
    }

    #[test]
    fn disabled_log_records_nothing() {
        let mut log = EventLog::new();
        log.push(SimEvent::PathLost { tick: 1 });
        log.set_enabled(false);
        assert!(log.is_empty());

        log.push(SimEvent::PathLost { tick: 2 });
        assert!(log.drain().is_empty());
        assert!(!log.is_enabled());
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::with_capacity(3);
        for tick in 0..5 {
            log.push(SimEvent::PathLost { tick });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.dropped_count(), 2);
        let ticks: Vec<Ticks> = log.pending().map(SimEvent::tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
        log.push(SimEvent::PathLost { tick: 5 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.dropped_count(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = EventLog::with_capacity(0);
        assert_eq!(log.capacity(), 1);
        log.push(SimEvent::PathLost { tick: 0 });
        log.push(SimEvent::PathLost { tick: 1 });
        assert_eq!(log.drain(), vec![SimEvent::PathLost { tick: 1 }]);
    }
}

//! The simulation state and its tick pipeline.
//!
//! [`Simulation`] owns everything that changes over a session: the drawn
//! roads, the in-progress gesture, the vehicle, the score and the tick
//! counter. Hosts drive it with two calls: [`Simulation::handle_input`] for
//! pointer events and [`Simulation::advance`] once per display refresh.
//! [`Simulation::frame`] produces the drawable state.

use crate::config::{ConfigError, RebuildPolicy, SimConfig};
use crate::event::{EventLog, SimEvent};
use crate::geometry::Point;
use crate::graph::RoadGraph;
use crate::id::{RoadId, Ticks};
use crate::input::{Draft, DrawGesture, GestureResult, InputEvent};
use crate::motion::{MotionOutcome, Vehicle};
use crate::path::Path;
use crate::query::Frame;
use crate::road::{Road, RoadNetwork};
use log::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Result of a single [`Simulation::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// The tick that was just run (0 for the first call).
    pub tick: Ticks,
    /// What the vehicle did.
    pub outcome: MotionOutcome,
    /// Whether a route from origin to destination existed this tick.
    pub has_path: bool,
    /// Nodes in this tick's graph.
    pub node_count: usize,
    /// Edges (roads) in this tick's graph.
    pub edge_count: usize,
}

impl TickReport {
    pub fn arrived(&self) -> bool {
        self.outcome == MotionOutcome::Arrived
    }
}

// ---------------------------------------------------------------------------
// Route cache
// ---------------------------------------------------------------------------

/// The graph and route computed on the most recent rebuild.
#[derive(Debug, Clone)]
struct RouteCache {
    graph: RoadGraph,
    path: Option<Path>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A delivery session.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) roads: RoadNetwork,
    gesture: DrawGesture,
    pub(crate) vehicle: Vehicle,
    pub(crate) score: u64,
    pub(crate) tick: Ticks,
    events: EventLog,
    cache: Option<RouteCache>,
    /// Roads changed since `cache` was built.
    roads_dirty: bool,
    /// Whether the previous tick had a route, for found/lost events.
    had_path: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::from_parts(SimConfig::default(), RoadNetwork::new())
    }
}

impl Simulation {
    /// Create a session with no roads.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_roads(config, RoadNetwork::new())
    }

    /// Create a session with preset roads, kept in the given order.
    pub fn with_roads(config: SimConfig, roads: RoadNetwork) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, roads))
    }

    /// Assemble a session from already validated parts.
    pub(crate) fn from_parts(config: SimConfig, roads: RoadNetwork) -> Self {
        let vehicle = Vehicle::new(config.origin, config.vehicle_speed);
        let events = EventLog::with_capacity(config.event_capacity);
        Self {
            config,
            roads,
            gesture: DrawGesture::new(),
            vehicle,
            score: 0,
            tick: 0,
            events,
            cache: None,
            roads_dirty: true,
            had_path: false,
        }
    }

    /// Put back vehicle, score and tick from a snapshot.
    pub(crate) fn restore_progress(&mut self, vehicle: Vehicle, score: u64, tick: Ticks) {
        self.had_path = vehicle.path().is_some();
        self.vehicle = vehicle;
        self.score = score;
        self.tick = tick;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn roads(&self) -> &RoadNetwork {
        &self.roads
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Deliveries completed so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Ticks run so far.
    pub fn tick(&self) -> Ticks {
        self.tick
    }

    pub fn draft(&self) -> Option<Draft> {
        self.gesture.draft()
    }

    /// The graph built on the most recent tick, if any tick has run since
    /// the session started or was restored.
    pub fn last_graph(&self) -> Option<&RoadGraph> {
        self.cache.as_ref().map(|cache| &cache.graph)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Events recorded since the last drain, oldest first.
    pub fn pending_events(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.pending()
    }

    /// Events lost because the log filled up before the host drained it.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped_count()
    }

    /// Take all recorded events.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Turn event recording on or off.
    pub fn set_events_enabled(&mut self, enabled: bool) {
        self.events.set_enabled(enabled);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Apply one pointer event. Returns the id of the road it added, if any.
    ///
    /// Events with non-finite coordinates are dropped, and an unfinished
    /// gesture is abandoned with them.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<RoadId> {
        let at = event.point();
        if !at.is_finite() {
            warn!("dropping {event:?}: non-finite coordinate");
            self.gesture = DrawGesture::new();
            self.events.push(SimEvent::InputRejected {
                at,
                tick: self.tick,
            });
            return None;
        }

        match event {
            InputEvent::PointerDown(at) => {
                self.gesture.pointer_down(at);
                None
            }
            InputEvent::PointerMove(at) => {
                self.gesture.pointer_move(at);
                None
            }
            InputEvent::PointerUp(at) => {
                match self.gesture.pointer_up(at, self.config.min_road_length) {
                    GestureResult::Road(road) => self.add_road(road),
                    GestureResult::TooShort { length } => {
                        debug!("discarding drag of length {length:.2}");
                        self.events.push(SimEvent::RoadRejected {
                            length,
                            tick: self.tick,
                        });
                        None
                    }
                    GestureResult::None => None,
                }
            }
        }
    }

    /// Append a road directly, bypassing the gesture and its length check.
    /// Roads with non-finite endpoints are refused.
    pub fn add_road(&mut self, road: Road) -> Option<RoadId> {
        if !road.start.is_finite() || !road.end.is_finite() {
            warn!("refusing road with non-finite endpoint: {road:?}");
            return None;
        }
        let id = self.roads.push(road);
        self.roads_dirty = true;
        debug!(
            "road {} added: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            id.0, road.start.x, road.start.y, road.end.x, road.end.y
        );
        self.events.push(SimEvent::RoadAdded {
            road: id,
            tick: self.tick,
        });
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one tick: rebuild (or reuse) the graph, search it, move the
    /// vehicle and score an arrival.
    pub fn advance(&mut self) -> TickReport {
        let tick = self.tick;
        let path = self.refresh_route();
        let (node_count, edge_count) = self
            .last_graph()
            .map(|graph| (graph.node_count(), graph.edge_count()))
            .unwrap_or_default();

        let has_path = path.is_some();
        if has_path != self.had_path {
            match &path {
                Some(path) => {
                    debug!(
                        "tick {tick}: route found, {} hops, length {:.1}",
                        path.hop_count(),
                        path.length()
                    );
                    self.events.push(SimEvent::PathFound {
                        hops: path.hop_count(),
                        length: path.length(),
                        tick,
                    });
                }
                None => {
                    debug!("tick {tick}: route lost");
                    self.events.push(SimEvent::PathLost { tick });
                }
            }
        }
        self.had_path = has_path;

        self.vehicle.set_path(path);
        let outcome = self.vehicle.step(self.config.origin);
        if outcome == MotionOutcome::Arrived {
            self.score += 1;
            debug!("tick {tick}: delivery complete, score {}", self.score);
            self.events.push(SimEvent::Arrived {
                score: self.score,
                tick,
            });
        }

        self.tick += 1;
        TickReport {
            tick,
            outcome,
            has_path,
            node_count,
            edge_count,
        }
    }

    /// Run `ticks` ticks and return how many deliveries completed.
    pub fn advance_by(&mut self, ticks: u64) -> u64 {
        let before = self.score;
        for _ in 0..ticks {
            self.advance();
        }
        self.score - before
    }

    /// Produce this tick's route according to the rebuild policy.
    fn refresh_route(&mut self) -> Option<Path> {
        let rebuild = match self.config.rebuild_policy {
            RebuildPolicy::EveryTick => true,
            RebuildPolicy::OnRoadChange => self.roads_dirty || self.cache.is_none(),
        };

        if rebuild {
            let graph = RoadGraph::build(
                self.roads.as_slice(),
                self.config.origin,
                self.config.destination,
                self.config.snap_threshold,
            );
            let path = graph.route();
            trace!(
                "tick {}: rebuilt graph with {} nodes, {} edges",
                self.tick,
                graph.node_count(),
                graph.edge_count()
            );
            self.cache = Some(RouteCache { graph, path });
            self.roads_dirty = false;
        }

        self.cache.as_ref().and_then(|cache| cache.path.clone())
    }

    // -----------------------------------------------------------------------
    // Drawable state
    // -----------------------------------------------------------------------

    /// Snapshot everything a renderer needs for the current refresh.
    pub fn frame(&self) -> Frame {
        Frame {
            roads: self.roads.as_slice().to_vec(),
            draft: self.gesture.draft(),
            origin: self.config.origin,
            destination: self.config.destination,
            vehicle: self.vehicle.position(),
            path: self
                .vehicle
                .path()
                .map(|path| path.waypoints().to_vec())
                .unwrap_or_default(),
            score: self.score,
            tick: self.tick,
        }
    }

    /// Current vehicle position.
    pub fn vehicle_position(&self) -> Point {
        self.vehicle.position()
    }
}

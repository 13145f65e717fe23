//! Courier Core -- the simulation behind the road-drawing delivery game.
//!
//! A user draws road segments between two fixed anchors (a warehouse and a
//! delivery point). Every tick the simulation turns the drawn roads into a
//! graph, searches it for a route, and moves a delivery vehicle along that
//! route. Each arrival scores a point and sends the vehicle back to the
//! warehouse.
//!
//! # Tick Pipeline
//!
//! Each call to [`sim::Simulation::advance`] runs:
//!
//! 1. **Build** -- [`graph::RoadGraph::build`] merges anchors and road
//!    endpoints into nodes (see [`merge`]) and wires an undirected adjacency
//!    list.
//! 2. **Route** -- [`path::find_path`] runs a breadth-first search from the
//!    warehouse node to the delivery node.
//! 3. **Move** -- [`motion::Vehicle::step`] advances the vehicle along the
//!    route and reports arrival.
//! 4. **Bookkeeping** -- score and tick counters are updated and events are
//!    buffered for the host.
//!
//! Input never mutates the graph directly: pointer gestures append roads to
//! the [`road::RoadNetwork`], and the next tick picks them up.
//!
//! ```rust
//! use courier_core::geometry::Point;
//! use courier_core::input::InputEvent;
//! use courier_core::sim::Simulation;
//!
//! let mut sim = Simulation::default();
//! let origin = sim.config().origin;
//! let destination = sim.config().destination;
//!
//! sim.handle_input(InputEvent::PointerDown(origin));
//! sim.handle_input(InputEvent::PointerUp(destination));
//!
//! let report = sim.advance();
//! assert!(report.has_path);
//! ```
//!
//! # Key Types
//!
//! - [`sim::Simulation`] -- owns roads, vehicle, score and tick counter.
//! - [`graph::RoadGraph`] -- per-tick node arena with adjacency lists.
//! - [`path::Path`] -- node sequence with positions produced by the search.
//! - [`motion::Vehicle`] -- path-following state machine.
//! - [`query::Frame`] -- owned drawable state handed to renderers.
//! - [`serialize`] -- versioned snapshot support via bitcode.

pub mod config;
#[cfg(feature = "data-loader")]
pub mod data_loader;
pub mod event;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod input;
pub mod merge;
pub mod motion;
pub mod path;
pub mod query;
pub mod road;
pub mod serialize;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

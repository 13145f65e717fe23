use crate::geometry::Point;
use crate::id::NodeId;
use crate::merge;
use crate::path::{Path, find_path};
use crate::road::Road;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// A graph node: a snapped location shared by every road endpoint (and
/// anchor) that merged into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Point,
}

/// One direction of an undirected road edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Neighbor on the far side of the road.
    pub to: NodeId,
    /// Euclidean distance between the two merged node positions.
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// RoadGraph
// ---------------------------------------------------------------------------

/// The road graph for a single tick: a node arena plus adjacency lists.
///
/// Node ids are indices into `nodes`, and `adjacency[i]` holds the edges
/// leaving node `i`. Every node has an adjacency entry, possibly empty. Each
/// road contributes one symmetric pair of edges, appended in road order, so
/// neighbor order reflects drawing order.
///
/// The graph is never patched in place. Build a fresh one from the current
/// road list whenever it is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadGraph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<Edge>>,
    origin: NodeId,
    destination: NodeId,
    road_count: usize,
}

impl RoadGraph {
    /// Build the graph for `roads` with the two anchors registered first.
    ///
    /// Registration order is: origin, destination, then each road's start
    /// and end in insertion order. A position within `snap_threshold` of an
    /// earlier node resolves to that node.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_core::geometry::Point;
    /// use courier_core::graph::RoadGraph;
    /// use courier_core::merge::SNAP_DISTANCE;
    /// use courier_core::road::Road;
    ///
    /// let origin = Point::new(0.0, 0.0);
    /// let destination = Point::new(100.0, 0.0);
    /// let roads = [Road::new(Point::new(2.0, 1.0), Point::new(98.0, 0.0))];
    ///
    /// let graph = RoadGraph::build(&roads, origin, destination, SNAP_DISTANCE);
    /// assert_eq!(graph.node_count(), 2);
    /// assert_eq!(graph.neighbors(graph.origin())[0].to, graph.destination());
    /// ```
    pub fn build(roads: &[Road], origin: Point, destination: Point, snap_threshold: f64) -> Self {
        let mut nodes = Vec::with_capacity(roads.len() * 2 + 2);
        let origin_id = merge::find_or_insert(&mut nodes, origin, snap_threshold);
        let destination_id = merge::find_or_insert(&mut nodes, destination, snap_threshold);

        let mut graph = Self {
            nodes,
            adjacency: Vec::new(),
            origin: origin_id,
            destination: destination_id,
            road_count: 0,
        };
        graph.sync_adjacency();

        for road in roads {
            let a = merge::find_or_insert(&mut graph.nodes, road.start, snap_threshold);
            let b = merge::find_or_insert(&mut graph.nodes, road.end, snap_threshold);
            graph.sync_adjacency();
            graph.connect(a, b);
        }

        graph
    }

    /// Give every node registered so far an adjacency entry.
    fn sync_adjacency(&mut self) {
        self.adjacency.resize_with(self.nodes.len(), Vec::new);
    }

    /// Add the symmetric edge pair for one road.
    fn connect(&mut self, a: NodeId, b: NodeId) {
        let distance = self.nodes[a.index()]
            .position
            .distance(&self.nodes[b.index()].position);
        self.adjacency[a.index()].push(Edge { to: b, distance });
        self.adjacency[b.index()].push(Edge { to: a, distance });
        self.road_count += 1;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Node the origin anchor resolved to.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Node the destination anchor resolved to. Equal to [`origin`](Self::origin)
    /// when the anchors lie within the snap threshold of each other.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges, which is the number of roads built in.
    pub fn edge_count(&self) -> usize {
        self.road_count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|node| node.position)
    }

    /// Edges leaving `id` in insertion order. Empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Search for a route from the origin node to the destination node.
    pub fn route(&self) -> Option<Path> {
        find_path(self, self.origin, self.destination)
    }
}

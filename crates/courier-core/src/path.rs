//! Breadth-first route search over a [`RoadGraph`].
//!
//! The search counts hops, not distance. Among routes with the same hop
//! count the first one discovered wins: the queue is FIFO and neighbors are
//! expanded in the order their roads were drawn, so the result is fully
//! determined by the road insertion order.

use crate::geometry::Point;
use crate::graph::RoadGraph;
use crate::id::NodeId;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A route through the graph: node ids with their positions captured at
/// search time, so the path stays usable after the graph is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<NodeId>,
    waypoints: Vec<Point>,
}

impl Path {
    /// Build a path from matching node and position lists.
    pub fn new(nodes: Vec<NodeId>, waypoints: Vec<Point>) -> Self {
        debug_assert_eq!(nodes.len(), waypoints.len());
        Self { nodes, waypoints }
    }

    /// A path made only of positions, with ids numbered in order.
    pub fn from_waypoints(waypoints: Vec<Point>) -> Self {
        let nodes = (0..waypoints.len() as u32).map(NodeId).collect();
        Self { nodes, waypoints }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of segments (edges) along the path.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Total geometric length of the path.
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// Find a minimum-hop path from `start` to `goal`.
///
/// Returns `None` when `goal` is not reachable from `start` (or either id
/// is unknown). When `start == goal` the path holds that single node.
pub fn find_path(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Option<Path> {
    let node_count = graph.node_count();
    if start.index() >= node_count || goal.index() >= node_count {
        return None;
    }

    let mut visited = vec![false; node_count];
    let mut came_from: Vec<Option<NodeId>> = vec![None; node_count];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    let mut expanded = 0usize;
    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == goal {
            found = true;
            break;
        }
        expanded += 1;
        for edge in graph.neighbors(current) {
            let next = edge.to.index();
            if !visited[next] {
                visited[next] = true;
                came_from[next] = Some(current);
                queue.push_back(edge.to);
            }
        }
    }

    if !found {
        trace!("no route from {start:?} to {goal:?} after expanding {expanded} nodes");
        return None;
    }

    let mut nodes = vec![goal];
    let mut cursor = goal;
    while let Some(prev) = came_from[cursor.index()] {
        nodes.push(prev);
        cursor = prev;
    }
    nodes.reverse();

    let waypoints = nodes
        .iter()
        .filter_map(|&id| graph.position(id))
        .collect();

    trace!(
        "route {start:?} -> {goal:?}: {} hops, {expanded} nodes expanded",
        nodes.len() - 1
    );
    Some(Path::new(nodes, waypoints))
}

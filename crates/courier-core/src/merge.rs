//! Endpoint snapping: collapses nearby coordinates into shared graph nodes.
//!
//! Roads drawn by hand never end exactly on top of each other, so any
//! position closer than the snap threshold to an already registered node is
//! treated as that node. The first node registered at a location wins, which
//! makes the result depend on registration order.

use crate::geometry::Point;
use crate::graph::Node;
use crate::id::NodeId;

/// Default snap distance. Positions strictly closer than this merge.
pub const SNAP_DISTANCE: f64 = 10.0;

/// Return the first node in `nodes` lying strictly within `threshold` of
/// `position`, or append a new node with the next sequential id.
///
/// `nodes` must be the list being built in the current pass; merging against
/// a stale list breaks id assignment.
pub fn find_or_insert(nodes: &mut Vec<Node>, position: Point, threshold: f64) -> NodeId {
    if let Some(existing) = find_within(nodes, position, threshold) {
        return existing;
    }
    let id = NodeId(nodes.len() as u32);
    nodes.push(Node { id, position });
    id
}

/// Look up the first node within `threshold` of `position` without inserting.
pub fn find_within(nodes: &[Node], position: Point, threshold: f64) -> Option<NodeId> {
    nodes
        .iter()
        .find(|node| node.position.distance(&position) < threshold)
        .map(|node| node.id)
}

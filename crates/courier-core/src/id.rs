use serde::{Deserialize, Serialize};

/// Identifies a node in one [`RoadGraph`](crate::graph::RoadGraph) build.
///
/// Ids are sequential arena indices starting at 0. They are only meaningful
/// for the graph that produced them; every rebuild hands out fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into per-node storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a drawn road. Equal to its insertion index in the road network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadId(pub u32);

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

//! Acceleration structure configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of triangles in a leaf before subdivision is attempted.
pub const LEAF_THRESHOLD: usize = 10;

/// Number of node records reserved whenever a node pool runs out of space.
pub const NODES_PER_BATCH: usize = 1024;

/// Triangle tree construction settings.
///
/// Embeddable in a render settings file; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Ranges with at most this many triangles become leaves
    pub leaf_threshold: usize,
    /// Growth step of the node and leaf pools
    pub nodes_per_batch: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_threshold: LEAF_THRESHOLD,
            nodes_per_batch: NODES_PER_BATCH,
        }
    }
}

impl TreeConfig {
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> Self {
        self.leaf_threshold = leaf_threshold.max(1);
        self
    }

    pub fn with_nodes_per_batch(mut self, nodes_per_batch: usize) -> Self {
        self.nodes_per_batch = nodes_per_batch.max(1);
        self
    }
}

use serde::{Deserialize, Serialize};

/// An immutable geographic point, paired one-to-one with a leaf vertex via
/// the leaf's arena index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub x: f64,
    pub y: f64,
    /// Cluster tag used for coloring; 0 when the instance has no clusters.
    #[serde(default)]
    pub cluster: usize,
}

impl Site {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, cluster: 0 }
    }

    pub fn with_cluster(x: f64, y: f64, cluster: usize) -> Self {
        Self { x, y, cluster }
    }
}

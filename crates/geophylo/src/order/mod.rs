//! Leaf-ordering algorithms.
//!
//! Each algorithm mutates the embedding bits of the geophylogeny's tree and
//! leaves the x-coordinates refreshed. Exactly one orderer may operate on an
//! instance at a time.

mod dp;
pub use dp::{DpOrderer, DpStrategy};

mod greedy;
pub use greedy::GreedyOptimizer;

mod top_down;
pub use top_down::TopDownOrderer;

use crate::error::Result;
use crate::model::Geophylogeny;

/// Algorithm selector for [`order_leaves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Bottom-up dynamic program over (vertex, leftmost-leaf-position).
    Dp(DpStrategy),
    /// Randomized rotation hill climbing on the current embedding.
    Greedy { seed: u64 },
    /// Single top-down pass choosing the rotation with fewer sites on the
    /// wrong side of the subtree midline.
    TopDown,
}

/// Ordering entry point: runs the selected algorithm on the geophylogeny.
pub fn order_leaves(geophylogeny: &mut Geophylogeny, algorithm: Algorithm) -> Result<()> {
    match algorithm {
        Algorithm::Dp(strategy) => {
            let mut orderer = DpOrderer::new(geophylogeny, strategy)?;
            orderer.order_leaves(geophylogeny);
        }
        Algorithm::Greedy { seed } => {
            let mut optimizer = GreedyOptimizer::new(geophylogeny, seed)?;
            optimizer.order_leaves(geophylogeny);
        }
        Algorithm::TopDown => TopDownOrderer::new().order_leaves(geophylogeny),
    }
    Ok(())
}

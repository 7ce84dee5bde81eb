//! Core geophylogeny data model.
//!
//! Vertices live in an arena owned by [`Tree`]; parent/child relations are
//! indices into that arena. Leaves occupy indices `[0, n)` and internal
//! vertices `[n, 2n - 1)`.

mod geophylogeny;
mod leader;
mod site;
mod tree;
mod vertex;

pub use geophylogeny::Geophylogeny;
pub use leader::{Leader, LeaderStyle, segments_intersect};
pub use site::Site;
pub use tree::{Tree, TreeBuilder};
pub use vertex::Vertex;

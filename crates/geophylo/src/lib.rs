#![forbid(unsafe_code)]

//! Geophylogeny model and leaf-ordering algorithms.
//!
//! A geophylogeny is a fixed-topology binary tree drawn above a geographic
//! map, with each leaf connected to its site by a leader line. The topology
//! is immutable; the only degree of freedom is the left/right orientation of
//! each internal vertex. The `order` module provides algorithms that pick
//! orientations so that a layout objective, chiefly the number of pairwise
//! leader crossings, is minimized.

pub mod error;
pub mod generate;
pub mod io;
pub mod model;
pub mod order;

pub use error::{Error, Result};
pub use model::{Geophylogeny, Leader, LeaderStyle, Site, Tree, TreeBuilder, Vertex};
pub use order::{Algorithm, DpOrderer, DpStrategy, GreedyOptimizer, TopDownOrderer, order_leaves};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Reading and writing geophylogeny instances.

pub mod json;
pub mod newick;

//! Seeded random instance generation for experiments.

use crate::error::Result;
use crate::model::{Geophylogeny, LeaderStyle, Site, Tree, TreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates an instance with a uniformly random binary topology and sites
/// drawn uniformly from the map rectangle. The same seed always yields the
/// same instance.
///
/// The leader style starts as `none`; callers pick one before running a
/// crossing-aware orderer.
pub fn uniform_instance(
    map_width: u32,
    map_height: u32,
    num_leaves: usize,
    name: &str,
    seed: u64,
) -> Result<Geophylogeny> {
    let mut rng = StdRng::seed_from_u64(seed);
    let tree = random_topology(num_leaves, &mut rng)?;
    let sites = (0..num_leaves)
        .map(|_| {
            Site::new(
                rng.gen_range(0.0..f64::from(map_width)),
                rng.gen_range(0.0..f64::from(map_height)),
            )
        })
        .collect();
    Ok(Geophylogeny::new(
        tree,
        sites,
        map_width,
        map_height,
        name,
        LeaderStyle::None,
    ))
}

/// Uniformly random binary topology over `num_leaves` leaves: repeatedly
/// joins two random subtree roots until one remains.
pub fn random_topology(num_leaves: usize, rng: &mut impl Rng) -> Result<Tree> {
    let mut builder = TreeBuilder::new(num_leaves);
    for leaf in 0..num_leaves {
        builder.leaf(leaf, None)?;
    }

    let mut roots: Vec<usize> = (0..num_leaves).collect();
    let mut next_inner = num_leaves;
    while roots.len() > 1 {
        let first = roots.swap_remove(rng.gen_range(0..roots.len()));
        let second = roots.swap_remove(rng.gen_range(0..roots.len()));
        builder.inner(next_inner, first, second)?;
        roots.push(next_inner);
        next_inner += 1;
    }

    // An empty arena falls through to the builder's at-least-one-leaf error.
    builder.build(roots.first().copied().unwrap_or(0))
}

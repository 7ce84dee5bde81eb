use crate::error::{Error, Result};
use crate::model::{Geophylogeny, LeaderStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomized rotation hill climbing on an already-embedded geophylogeny.
///
/// Each round visits the internal vertices in a freshly sampled random
/// order, keeps a rotation only when it strictly lowers the global crossing
/// count, and the search stops after the first round with no net
/// improvement. The crossing count is a non-negative integer that strictly
/// decreases on every accepted round, so termination is guaranteed.
#[derive(Debug)]
pub struct GreedyOptimizer {
    rng: StdRng,
}

impl GreedyOptimizer {
    /// The objective is the leader crossing count, so a geophylogeny without
    /// leaders cannot be optimized.
    pub fn new(geophylogeny: &Geophylogeny, seed: u64) -> Result<Self> {
        if geophylogeny.leader_style() == LeaderStyle::None {
            return Err(Error::UnsupportedLeaderStyle {
                algorithm: "greedy",
            });
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Optimizes until a full round finds no improvement; returns the total
    /// number of crossings removed.
    pub fn order_leaves(&mut self, geophylogeny: &mut Geophylogeny) -> usize {
        geophylogeny.compute_x_coordinates();

        let mut total_improvement = 0;
        loop {
            let improvement = self.optimize_one_round(geophylogeny);
            total_improvement += improvement;
            if improvement == 0 {
                break;
            }
        }

        tracing::info!(total_improvement, "greedy optimizer finished");
        total_improvement
    }

    /// One round: each internal vertex tested once, in random order.
    /// Returns the number of crossings removed this round.
    pub fn optimize_one_round(&mut self, geophylogeny: &mut Geophylogeny) -> usize {
        let num_leaves = geophylogeny.tree().num_leaves();
        let test_order = self.random_vertex_test_order(geophylogeny.tree().num_inner_vertices());

        let mut current = geophylogeny.number_of_crossings();
        let mut improvement = 0;
        for offset in test_order {
            let v = num_leaves + offset;
            geophylogeny.tree_mut().rotate(v);
            geophylogeny.compute_x_coordinates();
            let rotated = geophylogeny.number_of_crossings();
            if rotated < current {
                improvement += current - rotated;
                current = rotated;
            } else {
                geophylogeny.tree_mut().rotate(v);
                geophylogeny.compute_x_coordinates();
            }
        }

        tracing::debug!(improvement, crossings = current, "greedy round complete");
        improvement
    }

    /// Fisher-Yates shuffle of `0..len` driven by the seeded generator.
    fn random_vertex_test_order(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = self.rng.gen_range(0..=i);
            order.swap(i, j);
        }
        order
    }
}

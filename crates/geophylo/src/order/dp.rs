use crate::error::{Error, Result};
use crate::model::{Geophylogeny, Leader, LeaderStyle, Tree};

/// Per-leaf base cost fed into the dynamic program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpStrategy {
    /// Straight-line distance from the leaf slot to the site.
    EuclideanDistance,
    /// Horizontal offset between the leaf slot and the site.
    HorizontalDistance,
    /// Slot distance between the leaf position and the site's rank in the
    /// left-to-right site order.
    Hops,
    /// Zero leaf cost; all cost is injected as leader crossings between
    /// sibling subtrees at combination time.
    Crossings,
}

impl DpStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DpStrategy::EuclideanDistance => "euclidean",
            DpStrategy::HorizontalDistance => "horizontal",
            DpStrategy::Hops => "hops",
            DpStrategy::Crossings => "crossings",
        }
    }
}

/// Dynamic-programming leaf orderer.
///
/// `value[v][p]` is the minimum cost of the subtree rooted at `v` when its
/// leftmost leaf is forced to position `p`; `first_as_left[v][p]` records
/// which child achieved it. The table is filled bottom-up (children before
/// parents) and the embedding is recovered top-down from the root at
/// position 0.
///
/// For the `Crossings` strategy the combination cost re-runs the top-down
/// recovery on each child at the trial position to materialize a concrete
/// sub-order before counting cross-pairs. The recovered sub-order may differ
/// from the one ultimately used once the ancestor's position is fixed, so
/// this strategy yields an upper-bound surrogate rather than a globally
/// optimal arrangement. This is inherited behavior that downstream
/// experiments compare against; do not replace it with a subproblem-
/// independent recurrence.
#[derive(Debug)]
pub struct DpOrderer {
    strategy: DpStrategy,
    /// `[vertex][position]` minimum subtree cost; infeasible placements hold
    /// `f64::INFINITY`.
    value: Vec<Vec<f64>>,
    /// `[vertex][position]` whether the first child was chosen as left.
    first_as_left: Vec<Vec<bool>>,
    /// Leaf index -> rank of its site in ascending x order (Hops only).
    site_rank: Vec<usize>,
}

impl DpOrderer {
    pub fn new(geophylogeny: &Geophylogeny, strategy: DpStrategy) -> Result<Self> {
        if strategy == DpStrategy::Crossings
            && geophylogeny.leader_style() == LeaderStyle::None
        {
            return Err(Error::UnsupportedLeaderStyle {
                algorithm: "dp-crossings",
            });
        }

        let num_vertices = geophylogeny.tree().num_vertices();
        let num_leaves = geophylogeny.tree().num_leaves();

        let site_rank = if strategy == DpStrategy::Hops {
            let mut leaves: Vec<usize> = (0..num_leaves).collect();
            leaves.sort_by(|&a, &b| {
                geophylogeny
                    .site_of_leaf(a)
                    .x
                    .total_cmp(&geophylogeny.site_of_leaf(b).x)
            });
            let mut rank = vec![0; num_leaves];
            for (r, leaf) in leaves.into_iter().enumerate() {
                rank[leaf] = r;
            }
            rank
        } else {
            Vec::new()
        };

        Ok(Self {
            strategy,
            value: vec![vec![0.0; num_leaves]; num_vertices],
            first_as_left: vec![vec![true; num_leaves]; num_vertices],
            site_rank,
        })
    }

    pub fn strategy(&self) -> DpStrategy {
        self.strategy
    }

    /// Fills the table bottom-up, then recovers the optimal embedding from
    /// the root and refreshes all x-coordinates.
    pub fn order_leaves(&mut self, geophylogeny: &mut Geophylogeny) {
        let num_leaves = geophylogeny.tree().num_leaves();

        for leaf in geophylogeny.tree().leaf_indices() {
            for position in 0..num_leaves {
                self.value[leaf][position] = self.leaf_cost(geophylogeny, leaf, position);
            }
        }

        for v in inner_vertices_bottom_up(geophylogeny.tree()) {
            let Some((first, second)) = geophylogeny.tree().children(v) else {
                continue;
            };
            let first_size = geophylogeny.tree().vertex(first).clade_size();
            let second_size = geophylogeny.tree().vertex(second).clade_size();
            let clade_size = geophylogeny.tree().vertex(v).clade_size();

            for position in 0..num_leaves {
                if position + clade_size > num_leaves {
                    self.value[v][position] = f64::INFINITY;
                    continue;
                }

                let mut first_left =
                    self.value[first][position] + self.value[second][position + first_size];
                let mut second_left =
                    self.value[second][position] + self.value[first][position + second_size];

                if self.strategy == DpStrategy::Crossings {
                    first_left += self.combination_cost(geophylogeny, first, second, position);
                    second_left += self.combination_cost(geophylogeny, second, first, position);
                }

                // Ties keep the first child on the left.
                self.first_as_left[v][position] = first_left <= second_left;
                self.value[v][position] = first_left.min(second_left);
            }
        }

        let root = geophylogeny.tree().root();
        self.recover_order(geophylogeny, root, 0);
        geophylogeny.compute_x_coordinates();
    }

    fn leaf_cost(&self, geophylogeny: &Geophylogeny, leaf: usize, position: usize) -> f64 {
        let site = geophylogeny.site_of_leaf(leaf);
        match self.strategy {
            DpStrategy::EuclideanDistance => {
                let x_diff = geophylogeny.position_to_x(position) - site.x;
                (x_diff * x_diff + site.y * site.y).sqrt()
            }
            DpStrategy::HorizontalDistance => {
                (geophylogeny.position_to_x(position) - site.x).abs()
            }
            DpStrategy::Hops => (position as f64 - self.site_rank[leaf] as f64).abs(),
            DpStrategy::Crossings => 0.0,
        }
    }

    /// Leader cross-pairs between the two subtrees when `left` starts at
    /// `position` and `right` follows, each laid out by its own recovered
    /// sub-order at that trial position.
    fn combination_cost(
        &self,
        geophylogeny: &mut Geophylogeny,
        left: usize,
        right: usize,
        position: usize,
    ) -> f64 {
        let left_size = geophylogeny.tree().vertex(left).clade_size();
        self.recover_order(geophylogeny, left, position);
        self.recover_order(geophylogeny, right, position + left_size);

        let style = geophylogeny.leader_style();
        let tree = geophylogeny.tree();
        let leaders = |leaves: Vec<usize>| {
            leaves
                .into_iter()
                .map(|leaf| {
                    Leader::new(tree.vertex(leaf).x(), geophylogeny.site_of_leaf(leaf), style)
                })
                .collect::<Vec<_>>()
        };
        let left_leaders = leaders(tree.clade(left));
        let right_leaders = leaders(tree.clade(right));

        let mut crossings = 0usize;
        for left_leader in &left_leaders {
            for right_leader in &right_leaders {
                if left_leader.crosses(right_leader) {
                    crossings += 1;
                }
            }
        }
        crossings as f64
    }

    /// Top-down recovery: applies the recorded child choice at each internal
    /// vertex and writes leaf x-coordinates directly from their positions.
    fn recover_order(&self, geophylogeny: &mut Geophylogeny, v: usize, position: usize) {
        let Some((first, second)) = geophylogeny.tree().children(v) else {
            let x = geophylogeny.position_to_x(position);
            geophylogeny.tree_mut().vertex_mut(v).set_x(x);
            return;
        };

        let (left, right) = if self.first_as_left[v][position] {
            (first, second)
        } else {
            (second, first)
        };
        geophylogeny.tree_mut().set_as_left_child(v, left);
        let left_size = geophylogeny.tree().vertex(left).clade_size();
        self.recover_order(geophylogeny, left, position);
        self.recover_order(geophylogeny, right, position + left_size);
    }
}

/// Internal vertices with every child visited before its parent. The arena
/// index convention usually implies this, but parsed instances are not
/// required to follow it.
fn inner_vertices_bottom_up(tree: &Tree) -> Vec<usize> {
    let mut order = Vec::with_capacity(tree.num_inner_vertices());
    let mut stack = vec![tree.root()];
    while let Some(v) = stack.pop() {
        if let Some((first, second)) = tree.children(v) {
            order.push(v);
            stack.push(first);
            stack.push(second);
        }
    }
    order.reverse();
    order
}

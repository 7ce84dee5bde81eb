use crate::model::{Leader, LeaderStyle, Site, Tree};

/// A phylogenetic tree jointly laid out with a geographic map: the tree, one
/// site per leaf, the map dimensions, and the leader style used to connect
/// leaves to sites.
///
/// Exactly one ordering algorithm may operate on an instance at a time; the
/// embedding bits and coordinates are unprotected shared state.
#[derive(Debug, Clone)]
pub struct Geophylogeny {
    name: String,
    tree: Tree,
    /// Indexed by leaf arena index.
    sites: Vec<Site>,
    map_width: u32,
    map_height: u32,
    leader_style: LeaderStyle,
    /// Horizontal distance between adjacent leaf slots and between the
    /// outermost slots and the map border: `map_width / (n + 1)`.
    leaf_step: f64,
    num_clusters: usize,
}

impl Geophylogeny {
    pub fn new(
        tree: Tree,
        sites: Vec<Site>,
        map_width: u32,
        map_height: u32,
        name: impl Into<String>,
        leader_style: LeaderStyle,
    ) -> Self {
        assert_eq!(
            sites.len(),
            tree.num_leaves(),
            "one site per leaf: got {} sites for {} leaves",
            sites.len(),
            tree.num_leaves()
        );
        let leaf_step = f64::from(map_width) / (tree.num_leaves() + 1) as f64;
        let num_clusters = sites.iter().map(|s| s.cluster + 1).max().unwrap_or(1);
        Self {
            name: name.into(),
            tree,
            sites,
            map_width,
            map_height,
            leader_style,
            leaf_step,
            num_clusters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site_of_leaf(&self, leaf: usize) -> &Site {
        &self.sites[leaf]
    }

    pub fn map_width(&self) -> u32 {
        self.map_width
    }

    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    pub fn leader_style(&self) -> LeaderStyle {
        self.leader_style
    }

    pub fn set_leader_style(&mut self, leader_style: LeaderStyle) {
        self.leader_style = leader_style;
    }

    pub fn leaf_step(&self) -> f64 {
        self.leaf_step
    }

    pub fn has_clusters(&self) -> bool {
        self.num_clusters > 1
    }

    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    /// X-coordinate of the leaf slot at `position` in the tree order.
    pub fn position_to_x(&self, position: usize) -> f64 {
        (position + 1) as f64 * self.leaf_step
    }

    /// Refreshes every vertex's x-coordinate from the current embedding:
    /// leaves from their position, internal vertices as the midpoint of
    /// their children. Must be rerun whenever the leaf order changes.
    pub fn compute_x_coordinates(&mut self) {
        let leaves = self.tree.leaves_in_tree_order();
        for (position, leaf) in leaves.into_iter().enumerate() {
            let x = self.position_to_x(position);
            self.tree.vertex_mut(leaf).set_x(x);
        }
        self.set_inner_x(self.tree.root());
    }

    /// Children before parents; parsed instances do not guarantee that a
    /// parent's arena index exceeds its children's.
    fn set_inner_x(&mut self, v: usize) -> f64 {
        let Some((first, second)) = self.tree.children(v) else {
            return self.tree.vertex(v).x();
        };
        let x = (self.set_inner_x(first) + self.set_inner_x(second)) / 2.0;
        self.tree.vertex_mut(v).set_x(x);
        x
    }

    /// Sets every vertex's y-coordinate from its height above the leaf
    /// level: `y = -height * y_step`. Leaves sit at `y = 0`, the map extends
    /// downward in positive y, the tree upward in negative y.
    pub fn compute_y_coordinates(&mut self, y_step: f64) {
        for v in 0..self.tree.num_vertices() {
            let y = -self.tree.vertex(v).height() * y_step;
            self.tree.vertex_mut(v).set_y(y);
        }
    }

    /// Brute-force all-pairs leader crossing count over the current tree
    /// order. Requires current x-coordinates (`compute_x_coordinates`) and a
    /// leader style other than `none`.
    pub fn number_of_crossings(&self) -> usize {
        let leaves = self.tree.leaves_in_tree_order();
        let leaders: Vec<Leader<'_>> = leaves
            .into_iter()
            .map(|leaf| {
                Leader::new(
                    self.tree.vertex(leaf).x(),
                    &self.sites[leaf],
                    self.leader_style,
                )
            })
            .collect();

        let mut crossings = 0;
        for i in 0..leaders.len() {
            for j in (i + 1)..leaders.len() {
                if leaders[i].crosses(&leaders[j]) {
                    crossings += 1;
                }
            }
        }
        crossings
    }
}

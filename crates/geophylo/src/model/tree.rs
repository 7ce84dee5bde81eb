use crate::error::{Error, Result};
use crate::model::Vertex;
use rand::Rng;

/// A strict binary tree over an arena of vertices.
///
/// A tree with `n` leaves has exactly `2n - 1` vertices: leaves at arena
/// indices `[0, n)` and internal vertices at `[n, 2n - 1)`. The topology is
/// immutable after construction; the embedding (which child is drawn left at
/// each internal vertex) is the only mutable state.
#[derive(Debug, Clone)]
pub struct Tree {
    vertices: Vec<Vertex>,
    root: usize,
    num_leaves: usize,
    name: Option<String>,
}

impl Tree {
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_inner_vertices(&self) -> usize {
        self.num_leaves - 1
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn vertex_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Leaf arena indices, which are also the leaves in index order.
    pub fn leaf_indices(&self) -> std::ops::Range<usize> {
        0..self.num_leaves
    }

    /// Arena indices of the internal vertices.
    pub fn inner_indices(&self) -> std::ops::Range<usize> {
        self.num_leaves..self.vertices.len()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Leaves in the order induced by the current embedding, left to right.
    ///
    /// The subtree rooted at a vertex `v` whose leftmost leaf sits at
    /// position `p` occupies the contiguous position interval
    /// `[p, p + clade_size(v))`.
    pub fn leaves_in_tree_order(&self) -> Vec<usize> {
        let mut leaves = vec![0; self.num_leaves];
        self.place_leaves(self.root, 0, &mut leaves);
        leaves
    }

    fn place_leaves(&self, v: usize, position: usize, leaves: &mut [usize]) {
        let vertex = &self.vertices[v];
        let (Some(left), Some(right)) = (vertex.left_child(), vertex.right_child()) else {
            leaves[position] = v;
            return;
        };
        self.place_leaves(left, position, leaves);
        self.place_leaves(right, position + self.vertices[left].clade_size(), leaves);
    }

    /// Leaves of the subtree rooted at `v`, in current embedding order.
    ///
    /// Recomputed on every call; the embedding may have changed since the
    /// last one.
    pub fn clade(&self, v: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.vertices[v].clade_size());
        self.push_clade(v, &mut out);
        out
    }

    fn push_clade(&self, v: usize, out: &mut Vec<usize>) {
        let vertex = &self.vertices[v];
        let (Some(left), Some(right)) = (vertex.left_child(), vertex.right_child()) else {
            out.push(v);
            return;
        };
        self.push_clade(left, out);
        self.push_clade(right, out);
    }

    /// For every leaf index, its position in the current tree order.
    pub fn positions_by_index(&self) -> Vec<usize> {
        let mut positions = vec![0; self.num_leaves];
        for (position, leaf) in self.leaves_in_tree_order().into_iter().enumerate() {
            positions[leaf] = position;
        }
        positions
    }

    pub fn rotate(&mut self, v: usize) {
        self.vertices[v].rotate();
    }

    /// Rotates `v` and every vertex below it.
    pub fn rotate_deep(&mut self, v: usize) {
        self.vertices[v].rotate();
        if let Some((first, second)) = self.children(v) {
            self.rotate_deep(first);
            self.rotate_deep(second);
        }
    }

    pub fn set_as_left_child(&mut self, parent: usize, child: usize) {
        self.vertices[parent].set_as_left_child(child);
    }

    pub fn children(&self, v: usize) -> Option<(usize, usize)> {
        let vertex = &self.vertices[v];
        Some((vertex.first_child()?, vertex.second_child()?))
    }

    /// Rotates each internal vertex with probability 1/2.
    pub fn randomize_embedding(&mut self, rng: &mut impl Rng) {
        for v in self.inner_indices() {
            if rng.gen_bool(0.5) {
                self.vertices[v].rotate();
            }
        }
    }

    /// Height of the root above the leaf level.
    pub fn height(&self) -> f64 {
        self.vertices[self.root].height()
    }

    pub fn max_discrete_depth(&self) -> usize {
        self.vertices
            .iter()
            .map(Vertex::discrete_depth)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    children: Option<(usize, usize)>,
    taxon: Option<String>,
    branch_length: Option<f64>,
}

/// Arena construction for [`Tree`], used by the parsers and the instance
/// generator.
///
/// Callers declare each vertex by arena index; `build` links parents,
/// derives clade/subtree sizes, discrete depths, heights, and (when branch
/// lengths are present) continuous depths, and rejects arenas that do not
/// form a strict binary tree.
#[derive(Debug)]
pub struct TreeBuilder {
    num_leaves: usize,
    slots: Vec<Option<Slot>>,
}

impl TreeBuilder {
    pub fn new(num_leaves: usize) -> Self {
        let num_vertices = if num_leaves == 0 { 0 } else { 2 * num_leaves - 1 };
        Self {
            num_leaves,
            slots: vec![None; num_vertices],
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn leaf(&mut self, index: usize, taxon: Option<String>) -> Result<()> {
        if index >= self.num_leaves {
            return Err(malformed(format!(
                "leaf index {index} outside leaf range [0, {})",
                self.num_leaves
            )));
        }
        self.claim(
            index,
            Slot {
                children: None,
                taxon,
                branch_length: None,
            },
        )
    }

    pub fn inner(&mut self, index: usize, first_child: usize, second_child: usize) -> Result<()> {
        if index < self.num_leaves {
            return Err(malformed(format!(
                "internal vertex index {index} inside leaf range [0, {})",
                self.num_leaves
            )));
        }
        if first_child == second_child {
            return Err(malformed(format!(
                "internal vertex {index} lists vertex {first_child} as both children"
            )));
        }
        self.claim(
            index,
            Slot {
                children: Some((first_child, second_child)),
                taxon: None,
                branch_length: None,
            },
        )
    }

    pub fn set_branch_length(&mut self, index: usize, length: f64) -> Result<()> {
        match self.slots.get_mut(index) {
            Some(Some(slot)) => {
                slot.branch_length = Some(length);
                Ok(())
            }
            _ => Err(malformed(format!(
                "branch length for undeclared vertex {index}"
            ))),
        }
    }

    fn claim(&mut self, index: usize, slot: Slot) -> Result<()> {
        match self.slots.get_mut(index) {
            Some(existing @ None) => {
                *existing = Some(slot);
                Ok(())
            }
            Some(Some(_)) => Err(malformed(format!("vertex index {index} declared twice"))),
            None => Err(malformed(format!(
                "vertex index {index} outside arena of {} vertices",
                self.slots.len()
            ))),
        }
    }

    pub fn build(self, root: usize) -> Result<Tree> {
        let num_leaves = self.num_leaves;
        let num_vertices = self.slots.len();
        if num_leaves == 0 {
            return Err(malformed("tree must have at least one leaf".to_string()));
        }
        if root >= num_vertices {
            return Err(malformed(format!("root index {root} out of range")));
        }

        let mut vertices = Vec::with_capacity(num_vertices);
        for (index, slot) in self.slots.into_iter().enumerate() {
            let Some(slot) = slot else {
                return Err(malformed(format!("vertex index {index} never declared")));
            };
            let mut vertex = match slot.children {
                Some((first, second)) => {
                    if first >= num_vertices || second >= num_vertices {
                        return Err(malformed(format!(
                            "vertex {index} references a child outside the arena"
                        )));
                    }
                    Vertex::new_inner(index, first, second)
                }
                None => Vertex::new_leaf(index, slot.taxon),
            };
            vertex.set_branch_length(slot.branch_length);
            vertices.push(vertex);
        }

        link_parents(&mut vertices, root)?;

        let order = post_order(&vertices, root);
        if order.len() != num_vertices {
            return Err(malformed(
                "tree is not connected: some vertices are unreachable from the root".to_string(),
            ));
        }

        // Bottom-up derived attributes; children precede parents in `order`.
        for &v in &order {
            let Some(first) = vertices[v].first_child() else {
                continue;
            };
            let second = vertices[v].second_child().unwrap_or(first);
            let clade_size = vertices[first].clade_size() + vertices[second].clade_size();
            let subtree_size = vertices[first].subtree_size() + vertices[second].subtree_size() + 1;
            // Cladogram convention: use the first child's branch length when
            // known, otherwise one unit above the taller child.
            let height = match vertices[first].branch_length() {
                Some(length) if length > 0.0 => vertices[first].height() + length,
                _ => vertices[first].height().max(vertices[second].height()) + 1.0,
            };
            vertices[v].set_clade_size(clade_size);
            vertices[v].set_subtree_size(subtree_size);
            vertices[v].set_height(height);
        }

        if vertices[root].clade_size() != num_leaves {
            return Err(malformed(format!(
                "root clade has {} leaves, expected {num_leaves}",
                vertices[root].clade_size()
            )));
        }

        // Top-down derived attributes; parents precede children in reverse.
        let have_lengths = vertices
            .iter()
            .enumerate()
            .all(|(v, vertex)| v == root || vertex.branch_length().is_some());
        for &v in order.iter().rev() {
            if let Some((first, second)) = {
                let vertex = &vertices[v];
                vertex.first_child().zip(vertex.second_child())
            } {
                let child_depth = vertices[v].discrete_depth() + 1;
                vertices[first].set_discrete_depth(child_depth);
                vertices[second].set_discrete_depth(child_depth);
                if have_lengths {
                    let base = vertices[v].depth();
                    for child in [first, second] {
                        let length = vertices[child].branch_length().unwrap_or(0.0);
                        vertices[child].set_depth(base + length);
                    }
                }
            }
        }

        Ok(Tree {
            vertices,
            root,
            num_leaves,
            name: None,
        })
    }
}

fn link_parents(vertices: &mut [Vertex], root: usize) -> Result<()> {
    let mut parent = vec![None; vertices.len()];
    for v in 0..vertices.len() {
        let Some(first) = vertices[v].first_child() else {
            continue;
        };
        let second = vertices[v].second_child().unwrap_or(first);
        for child in [first, second] {
            if parent[child].is_some() {
                return Err(malformed(format!("vertex {child} has two parents")));
            }
            parent[child] = Some(v);
        }
    }
    if let Some(p) = parent[root] {
        return Err(malformed(format!(
            "root {root} has a parent (vertex {p})"
        )));
    }
    for (v, p) in parent.into_iter().enumerate() {
        match p {
            Some(p) => vertices[v].set_parent(p),
            None if v == root => {}
            None => {
                return Err(malformed(format!("vertex {v} is not attached to the tree")));
            }
        }
    }
    Ok(())
}

/// Children-before-parents ordering of all vertices reachable from `root`.
fn post_order(vertices: &[Vertex], root: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(vertices.len());
    let mut stack = vec![root];
    while let Some(v) = stack.pop() {
        order.push(v);
        if let Some(first) = vertices[v].first_child() {
            stack.push(first);
        }
        if let Some(second) = vertices[v].second_child() {
            stack.push(second);
        }
    }
    order.reverse();
    order
}

fn malformed(message: String) -> Error {
    Error::MalformedInstance { message }
}

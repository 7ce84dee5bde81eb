/// A vertex of a strict binary tree, stored in the arena owned by
/// [`Tree`](crate::model::Tree).
///
/// The topology (parent/children links, clade and subtree sizes, depths,
/// heights) is fixed at construction. The only mutable embedding state is
/// `first_is_left`, which records whether the first child is currently drawn
/// as the left child, plus the output coordinates `x`/`y`.
#[derive(Debug, Clone)]
pub struct Vertex {
    index: usize,
    parent: Option<usize>,
    /// `(first_child, second_child)` arena indices; `None` for a leaf.
    children: Option<(usize, usize)>,
    first_is_left: bool,

    clade_size: usize,
    subtree_size: usize,
    discrete_depth: usize,
    depth: f64,
    height: f64,
    branch_length: Option<f64>,

    /// A fixed vertex refuses rotation requests.
    fixed: bool,

    taxon: Option<String>,

    x: f64,
    y: f64,
}

impl Vertex {
    pub(crate) fn new_leaf(index: usize, taxon: Option<String>) -> Self {
        Self {
            index,
            parent: None,
            children: None,
            first_is_left: true,
            clade_size: 1,
            subtree_size: 1,
            discrete_depth: 0,
            depth: 0.0,
            height: 0.0,
            branch_length: None,
            fixed: false,
            taxon,
            x: 0.0,
            y: 0.0,
        }
    }

    pub(crate) fn new_inner(index: usize, first_child: usize, second_child: usize) -> Self {
        Self {
            children: Some((first_child, second_child)),
            ..Self::new_leaf(index, None)
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable identity; by convention `index + 1`.
    pub fn id(&self) -> usize {
        self.index + 1
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: usize) {
        self.parent = Some(parent);
    }

    pub fn first_child(&self) -> Option<usize> {
        self.children.map(|(first, _)| first)
    }

    pub fn second_child(&self) -> Option<usize> {
        self.children.map(|(_, second)| second)
    }

    pub fn left_child(&self) -> Option<usize> {
        self.children
            .map(|(first, second)| if self.first_is_left { first } else { second })
    }

    pub fn right_child(&self) -> Option<usize> {
        self.children
            .map(|(first, second)| if self.first_is_left { second } else { first })
    }

    pub fn first_is_left(&self) -> bool {
        self.first_is_left
    }

    /// Flips which child is drawn on the left.
    pub fn rotate(&mut self) {
        self.first_is_left = !self.first_is_left;
    }

    /// Makes `child` the left child of this vertex.
    ///
    /// Panics if `child` is not actually a child of this vertex; that is a
    /// caller bug, not a recoverable condition. A fixed vertex keeps its
    /// orientation and logs a warning.
    pub fn set_as_left_child(&mut self, child: usize) {
        let (first, second) = self.children.unwrap_or_else(|| {
            panic!(
                "asked to set vertex {child} as left child of leaf {}",
                self.index
            )
        });
        assert!(
            child == first || child == second,
            "asked to set vertex {child} as left child, but it is not a child of vertex {}",
            self.index
        );

        if self.fixed {
            tracing::warn!(
                vertex = self.index,
                child,
                "rotation request on fixed vertex ignored"
            );
            return;
        }

        self.first_is_left = child == first;
    }

    pub fn clade_size(&self) -> usize {
        self.clade_size
    }

    pub(crate) fn set_clade_size(&mut self, clade_size: usize) {
        self.clade_size = clade_size;
    }

    pub fn subtree_size(&self) -> usize {
        self.subtree_size
    }

    pub(crate) fn set_subtree_size(&mut self, subtree_size: usize) {
        self.subtree_size = subtree_size;
    }

    /// Number of edges on the path from the root.
    pub fn discrete_depth(&self) -> usize {
        self.discrete_depth
    }

    pub(crate) fn set_discrete_depth(&mut self, discrete_depth: usize) {
        self.discrete_depth = discrete_depth;
    }

    /// Total branch length on the path from the root.
    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: f64) {
        self.depth = depth;
    }

    /// Distance above the leaf level; leaves sit at height 0.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn branch_length(&self) -> Option<f64> {
        self.branch_length
    }

    pub(crate) fn set_branch_length(&mut self, branch_length: Option<f64>) {
        self.branch_length = branch_length;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn taxon(&self) -> Option<&str> {
        self.taxon.as_deref()
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }
}

use crate::model::Geophylogeny;

/// Single top-down pass: at each internal vertex, pick the rotation whose
/// subtrees have fewer sites on the wrong side of the vertical midline
/// between them. Local decisions only; no table, no backtracking.
#[derive(Debug, Default)]
pub struct TopDownOrderer;

impl TopDownOrderer {
    pub fn new() -> Self {
        Self
    }

    pub fn order_leaves(&self, geophylogeny: &mut Geophylogeny) {
        let root = geophylogeny.tree().root();
        self.order_vertex(geophylogeny, root, 0);
        geophylogeny.compute_x_coordinates();
    }

    fn order_vertex(&self, geophylogeny: &mut Geophylogeny, v: usize, position: usize) {
        let Some((first, second)) = geophylogeny.tree().children(v) else {
            let x = geophylogeny.position_to_x(position);
            geophylogeny.tree_mut().vertex_mut(v).set_x(x);
            return;
        };

        let first_left = midline_misplaced_sites(geophylogeny, first, second, position);
        let second_left = midline_misplaced_sites(geophylogeny, second, first, position);

        let (left, right) = if first_left <= second_left {
            (first, second)
        } else {
            (second, first)
        };
        geophylogeny.tree_mut().set_as_left_child(v, left);
        let left_size = geophylogeny.tree().vertex(left).clade_size();
        self.order_vertex(geophylogeny, left, position);
        self.order_vertex(geophylogeny, right, position + left_size);
    }
}

/// Number of sites on the wrong side of the midline when `left`'s clade
/// takes the slots starting at `position` and `right`'s clade follows: left
/// sites right of the midline plus right sites left of it.
fn midline_misplaced_sites(
    geophylogeny: &Geophylogeny,
    left: usize,
    right: usize,
    position: usize,
) -> usize {
    let left_size = geophylogeny.tree().vertex(left).clade_size();
    let mid = (geophylogeny.position_to_x(position + left_size)
        + geophylogeny.position_to_x(position + left_size - 1))
        / 2.0;

    let mut misplaced = 0;
    for leaf in geophylogeny.tree().clade(left) {
        if geophylogeny.site_of_leaf(leaf).x > mid {
            misplaced += 1;
        }
    }
    for leaf in geophylogeny.tree().clade(right) {
        if geophylogeny.site_of_leaf(leaf).x < mid {
            misplaced += 1;
        }
    }
    misplaced
}

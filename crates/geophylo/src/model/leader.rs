use crate::model::Site;
use serde::{Deserialize, Serialize};

/// How a leaf is connected to its site in the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderStyle {
    /// Straight segment from the leaf slot to the site.
    S,
    /// Orthogonal leader: vertical from the leaf slot down to the site's
    /// height, then horizontal to the site.
    Po,
    /// Leaders are not drawn; the crossing predicate is undefined.
    #[default]
    None,
}

impl LeaderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderStyle::S => "s",
            LeaderStyle::Po => "po",
            LeaderStyle::None => "none",
        }
    }
}

/// An ephemeral pairing of a leaf's drawn x-coordinate, its site, and a
/// leader style, built on demand to evaluate the crossing predicate.
///
/// The tree sits above the map: a leader starts at `(leaf_x, 0)` on the map's
/// top edge and ends at the site.
#[derive(Debug, Clone, Copy)]
pub struct Leader<'a> {
    leaf_x: f64,
    site: &'a Site,
    style: LeaderStyle,
}

impl<'a> Leader<'a> {
    pub fn new(leaf_x: f64, site: &'a Site, style: LeaderStyle) -> Self {
        Self {
            leaf_x,
            site,
            style,
        }
    }

    /// Whether this leader crosses `other`. Symmetric.
    ///
    /// Both leaders must share the same style, and the style must not be
    /// [`LeaderStyle::None`]; either violation is a caller bug and panics.
    ///
    /// PO-style deliberately tests only horizontal-vs-vertical segment pairs
    /// (not horizontal-vs-horizontal or vertical-vs-vertical overlaps); the
    /// rest of the system depends on exactly this count.
    pub fn crosses(&self, other: &Leader<'_>) -> bool {
        assert_eq!(
            self.style, other.style,
            "crossing predicate invoked on leaders of differing styles"
        );
        match self.style {
            LeaderStyle::S => segments_intersect(
                (self.leaf_x, 0.0),
                (self.site.x, self.site.y),
                (other.leaf_x, 0.0),
                (other.site.x, other.site.y),
            ),
            LeaderStyle::Po => {
                let self_horizontal_vs_other_vertical = segments_intersect(
                    (self.leaf_x, self.site.y),
                    (self.site.x, self.site.y),
                    (other.leaf_x, 0.0),
                    (other.leaf_x, other.site.y),
                );
                let other_horizontal_vs_self_vertical = segments_intersect(
                    (other.leaf_x, other.site.y),
                    (other.site.x, other.site.y),
                    (self.leaf_x, 0.0),
                    (self.leaf_x, self.site.y),
                );
                self_horizontal_vs_other_vertical || other_horizontal_vs_self_vertical
            }
            LeaderStyle::None => {
                panic!("crossing predicate invoked with leader style `none`")
            }
        }
    }
}

/// Closed-segment intersection test: touching endpoints and collinear
/// overlap both count as intersecting.
pub fn segments_intersect(p1: (f64, f64), q1: (f64, f64), p2: (f64, f64), q2: (f64, f64)) -> bool {
    let d1 = orientation(p2, q2, p1);
    let d2 = orientation(p2, q2, q1);
    let d3 = orientation(p1, q1, p2);
    let d4 = orientation(p1, q1, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p2, q2, p1))
        || (d2 == 0.0 && on_segment(p2, q2, q1))
        || (d3 == 0.0 && on_segment(p1, q1, p2))
        || (d4 == 0.0 && on_segment(p1, q1, q2))
}

/// Cross product of `b - a` and `c - a`: positive when `c` lies left of
/// `a -> b`.
fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Whether `p`, known to be collinear with `a -> b`, lies on the segment.
fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

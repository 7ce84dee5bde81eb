use geophylo::model::segments_intersect;
use geophylo::{Leader, LeaderStyle, Site};

#[test]
fn straight_leaders_cross_when_sites_are_swapped() {
    let near = Site::new(30.0, 50.0);
    let far = Site::new(5.0, 50.0);
    let left = Leader::new(10.0, &near, LeaderStyle::S);
    let right = Leader::new(20.0, &far, LeaderStyle::S);
    assert!(left.crosses(&right));
    assert!(right.crosses(&left));
}

#[test]
fn straight_leaders_do_not_cross_when_order_is_preserved() {
    let first = Site::new(5.0, 50.0);
    let second = Site::new(30.0, 50.0);
    let left = Leader::new(10.0, &first, LeaderStyle::S);
    let right = Leader::new(20.0, &second, LeaderStyle::S);
    assert!(!left.crosses(&right));
}

#[test]
fn straight_leaders_sharing_a_site_count_as_crossing() {
    let site = Site::new(15.0, 40.0);
    let left = Leader::new(10.0, &site, LeaderStyle::S);
    let right = Leader::new(20.0, &site, LeaderStyle::S);
    assert!(left.crosses(&right));
}

#[test]
fn po_leaders_cross_on_horizontal_vs_vertical_segments() {
    // The left leaf's horizontal run at y = 50 passes the right leaf's
    // vertical drop at x = 20.
    let left_site = Site::new(30.0, 50.0);
    let right_site = Site::new(5.0, 60.0);
    let left = Leader::new(10.0, &left_site, LeaderStyle::Po);
    let right = Leader::new(20.0, &right_site, LeaderStyle::Po);
    assert!(left.crosses(&right));
    assert!(right.crosses(&left));
}

#[test]
fn po_leaders_with_disjoint_runs_do_not_cross() {
    let left_site = Site::new(15.0, 50.0);
    let right_site = Site::new(25.0, 60.0);
    let left = Leader::new(10.0, &left_site, LeaderStyle::Po);
    let right = Leader::new(20.0, &right_site, LeaderStyle::Po);
    assert!(!left.crosses(&right));
}

#[test]
fn po_ignores_parallel_overlaps() {
    // The horizontal runs overlap on [20, 40] at y = 50, but only
    // horizontal-vs-vertical pairs are tested for the po style.
    let left_site = Site::new(40.0, 50.0);
    let right_site = Site::new(20.0, 50.0);
    let left = Leader::new(10.0, &left_site, LeaderStyle::Po);
    let right = Leader::new(60.0, &right_site, LeaderStyle::Po);
    assert!(!left.crosses(&right));
    assert!(!right.crosses(&left));
}

#[test]
#[should_panic(expected = "differing styles")]
fn crossing_predicate_rejects_mixed_styles() {
    let site_a = Site::new(5.0, 10.0);
    let site_b = Site::new(15.0, 10.0);
    let straight = Leader::new(10.0, &site_a, LeaderStyle::S);
    let orthogonal = Leader::new(20.0, &site_b, LeaderStyle::Po);
    let _ = straight.crosses(&orthogonal);
}

#[test]
#[should_panic(expected = "`none`")]
fn crossing_predicate_rejects_the_none_style() {
    let site_a = Site::new(5.0, 10.0);
    let site_b = Site::new(15.0, 10.0);
    let first = Leader::new(10.0, &site_a, LeaderStyle::None);
    let second = Leader::new(20.0, &site_b, LeaderStyle::None);
    let _ = first.crosses(&second);
}

#[test]
fn segment_intersection_handles_shared_endpoints() {
    assert!(segments_intersect(
        (0.0, 0.0),
        (10.0, 10.0),
        (10.0, 10.0),
        (20.0, 0.0),
    ));
}

#[test]
fn segment_intersection_handles_collinear_overlap() {
    assert!(segments_intersect(
        (0.0, 0.0),
        (10.0, 0.0),
        (5.0, 0.0),
        (15.0, 0.0),
    ));
    assert!(!segments_intersect(
        (0.0, 0.0),
        (4.0, 0.0),
        (5.0, 0.0),
        (15.0, 0.0),
    ));
}

#[test]
fn segment_intersection_proper_crossing() {
    assert!(segments_intersect(
        (0.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (10.0, 0.0),
    ));
    assert!(!segments_intersect(
        (0.0, 0.0),
        (10.0, 0.0),
        (0.0, 5.0),
        (10.0, 5.0),
    ));
}

use geophylo::{Algorithm, Geophylogeny, LeaderStyle, Site, TreeBuilder, generate, order_leaves};

/// `((L0,L1),(L2,L3))` on a width-50 map (slots at x = 10, 20, 30, 40) with
/// site x-coordinates 30, 10, 20, 40.
fn two_cherry_instance() -> Geophylogeny {
    let mut builder = TreeBuilder::new(4);
    for leaf in 0..4 {
        builder.leaf(leaf, None).unwrap();
    }
    builder.inner(4, 0, 1).unwrap();
    builder.inner(5, 2, 3).unwrap();
    builder.inner(6, 4, 5).unwrap();
    let tree = builder.build(6).unwrap();

    let sites = vec![
        Site::new(30.0, 50.0),
        Site::new(10.0, 50.0),
        Site::new(20.0, 50.0),
        Site::new(40.0, 50.0),
    ];
    Geophylogeny::new(tree, sites, 50, 100, "two-cherry", LeaderStyle::S)
}

#[test]
fn midline_rule_orders_the_two_cherry_instance() {
    let mut geophylogeny = two_cherry_instance();
    order_leaves(&mut geophylogeny, Algorithm::TopDown).unwrap();
    assert_eq!(geophylogeny.tree().leaves_in_tree_order(), vec![1, 0, 2, 3]);
}

#[test]
fn ties_keep_the_first_child_on_the_left() {
    // Symmetric sites: both rotations misplace the same number of sites at
    // every vertex, so the embedding must come out unchanged.
    let mut builder = TreeBuilder::new(2);
    builder.leaf(0, None).unwrap();
    builder.leaf(1, None).unwrap();
    builder.inner(2, 0, 1).unwrap();
    let tree = builder.build(2).unwrap();
    let sites = vec![Site::new(15.0, 20.0), Site::new(15.0, 20.0)];
    let mut geophylogeny = Geophylogeny::new(tree, sites, 30, 40, "tied", LeaderStyle::S);

    order_leaves(&mut geophylogeny, Algorithm::TopDown).unwrap();
    assert_eq!(geophylogeny.tree().leaves_in_tree_order(), vec![0, 1]);
}

#[test]
fn pass_refreshes_leaf_coordinates() {
    let mut geophylogeny = generate::uniform_instance(500, 300, 9, "top-down-coords", 13).unwrap();
    order_leaves(&mut geophylogeny, Algorithm::TopDown).unwrap();
    for (position, leaf) in geophylogeny
        .tree()
        .leaves_in_tree_order()
        .into_iter()
        .enumerate()
    {
        assert_eq!(
            geophylogeny.tree().vertex(leaf).x(),
            geophylogeny.position_to_x(position)
        );
    }
}

#[test]
fn works_without_leaders() {
    // The midline rule only looks at site x-coordinates, so it runs on
    // instances that have no leader style yet.
    let mut geophylogeny = generate::uniform_instance(400, 200, 11, "top-down-none", 3).unwrap();
    assert_eq!(geophylogeny.leader_style(), LeaderStyle::None);
    order_leaves(&mut geophylogeny, Algorithm::TopDown).unwrap();
}

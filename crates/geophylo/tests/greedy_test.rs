use geophylo::{Error, GreedyOptimizer, LeaderStyle, generate};

#[test]
fn same_seed_yields_the_same_arrangement() {
    let mut first = generate::uniform_instance(500, 300, 15, "greedy-seeded", 7).unwrap();
    first.set_leader_style(LeaderStyle::S);
    let mut second = first.clone();

    let mut optimizer = GreedyOptimizer::new(&first, 123).unwrap();
    optimizer.order_leaves(&mut first);
    let mut optimizer = GreedyOptimizer::new(&second, 123).unwrap();
    optimizer.order_leaves(&mut second);

    assert_eq!(
        first.tree().leaves_in_tree_order(),
        second.tree().leaves_in_tree_order()
    );
    assert_eq!(first.number_of_crossings(), second.number_of_crossings());
}

#[test]
fn reported_improvement_matches_the_crossing_counts() {
    let mut geophylogeny = generate::uniform_instance(500, 300, 14, "greedy-delta", 2).unwrap();
    geophylogeny.set_leader_style(LeaderStyle::S);
    geophylogeny.compute_x_coordinates();
    let before = geophylogeny.number_of_crossings();

    let mut optimizer = GreedyOptimizer::new(&geophylogeny, 5).unwrap();
    let improvement = optimizer.order_leaves(&mut geophylogeny);

    let after = geophylogeny.number_of_crossings();
    assert_eq!(improvement, before - after);
    assert!(after <= before);
}

#[test]
fn result_is_a_local_optimum_under_single_rotations() {
    let mut geophylogeny = generate::uniform_instance(500, 300, 10, "greedy-local", 31).unwrap();
    geophylogeny.set_leader_style(LeaderStyle::Po);

    let mut optimizer = GreedyOptimizer::new(&geophylogeny, 8).unwrap();
    optimizer.order_leaves(&mut geophylogeny);
    let optimized = geophylogeny.number_of_crossings();

    for v in geophylogeny.tree().inner_indices() {
        geophylogeny.tree_mut().rotate(v);
        geophylogeny.compute_x_coordinates();
        assert!(
            geophylogeny.number_of_crossings() >= optimized,
            "rotating vertex {v} improved a supposedly optimal arrangement"
        );
        geophylogeny.tree_mut().rotate(v);
    }
}

#[test]
fn optimizer_requires_leaders() {
    let geophylogeny = generate::uniform_instance(500, 300, 6, "greedy-no-style", 1).unwrap();
    let result = GreedyOptimizer::new(&geophylogeny, 0);
    assert!(matches!(result, Err(Error::UnsupportedLeaderStyle { .. })));
}

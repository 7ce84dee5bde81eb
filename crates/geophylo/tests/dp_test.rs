use geophylo::{
    Algorithm, DpStrategy, Geophylogeny, GreedyOptimizer, LeaderStyle, Site, TreeBuilder,
    generate, order_leaves,
};

/// `((L0,L1),(L2,L3))` over a width-50 map, so the leaf slots sit at
/// x = 10, 20, 30, 40. Site x-coordinates 30, 10, 20, 40 make the identity
/// order suboptimal for every strategy.
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

/// Runs `f` on every one of the `2^(n-1)` embeddings, x-coordinates
/// refreshed.
fn for_each_embedding(geophylogeny: &mut Geophylogeny, mut f: impl FnMut(&Geophylogeny)) {
    let inner: Vec<usize> = geophylogeny.tree().inner_indices().collect();
    assert!(inner.len() < 32);
    for mask in 0u32..(1 << inner.len()) {
        for (bit, &v) in inner.iter().enumerate() {
            let want_first_left = mask & (1 << bit) == 0;
            if geophylogeny.tree().vertex(v).first_is_left() != want_first_left {
                geophylogeny.tree_mut().rotate(v);
            }
        }
        geophylogeny.compute_x_coordinates();
        f(geophylogeny);
    }
}

fn site_ranks(geophylogeny: &Geophylogeny) -> Vec<usize> {
    let n = geophylogeny.tree().num_leaves();
    let mut leaves: Vec<usize> = (0..n).collect();
    leaves.sort_by(|&a, &b| {
        geophylogeny
            .site_of_leaf(a)
            .x
            .total_cmp(&geophylogeny.site_of_leaf(b).x)
    });
    let mut rank = vec![0; n];
    for (r, leaf) in leaves.into_iter().enumerate() {
        rank[leaf] = r;
    }
    rank
}

fn total_cost(geophylogeny: &Geophylogeny, strategy: DpStrategy, ranks: &[usize]) -> f64 {
    geophylogeny
        .tree()
        .leaves_in_tree_order()
        .into_iter()
        .enumerate()
        .map(|(position, leaf)| {
            let site = geophylogeny.site_of_leaf(leaf);
            match strategy {
                DpStrategy::EuclideanDistance => {
                    let dx = geophylogeny.position_to_x(position) - site.x;
                    (dx * dx + site.y * site.y).sqrt()
                }
                DpStrategy::HorizontalDistance => {
                    (geophylogeny.position_to_x(position) - site.x).abs()
                }
                DpStrategy::Hops => (position as f64 - ranks[leaf] as f64).abs(),
                DpStrategy::Crossings => unreachable!("crossings has no per-leaf cost"),
            }
        })
        .sum()
}

#[test]
fn distance_strategies_match_exhaustive_search() {
    for strategy in [
        DpStrategy::EuclideanDistance,
        DpStrategy::HorizontalDistance,
        DpStrategy::Hops,
    ] {
        for seed in [2, 17, 23] {
            let mut geophylogeny =
                generate::uniform_instance(500, 300, 7, "dp-exhaustive", seed).unwrap();
            geophylogeny.set_leader_style(LeaderStyle::S);
            let ranks = site_ranks(&geophylogeny);

            let mut best = f64::INFINITY;
            for_each_embedding(&mut geophylogeny.clone(), |candidate| {
                best = best.min(total_cost(candidate, strategy, &ranks));
            });

            order_leaves(&mut geophylogeny, Algorithm::Dp(strategy)).unwrap();
            let achieved = total_cost(&geophylogeny, strategy, &ranks);
            assert!(
                (achieved - best).abs() < 1e-9,
                "{}: achieved {achieved}, exhaustive best {best} (seed {seed})",
                strategy.as_str()
            );
        }
    }
}

#[test]
fn horizontal_distance_orders_the_two_cherry_instance() {
    let mut geophylogeny = two_cherry_instance();
    geophylogeny.compute_x_coordinates();
    let before = geophylogeny.number_of_crossings();

    order_leaves(
        &mut geophylogeny,
        Algorithm::Dp(DpStrategy::HorizontalDistance),
    )
    .unwrap();
    assert_eq!(geophylogeny.tree().leaves_in_tree_order(), vec![1, 0, 2, 3]);
    assert!(geophylogeny.number_of_crossings() <= before);
}

#[test]
fn crossings_strategy_finds_the_two_cherry_minimum() {
    let mut geophylogeny = two_cherry_instance();

    let mut best = usize::MAX;
    for_each_embedding(&mut geophylogeny.clone(), |candidate| {
        best = best.min(candidate.number_of_crossings());
    });
    // The clades {L0, L1} and {L2, L3} stay contiguous, so one crossing
    // remains even in the best embedding.
    assert_eq!(best, 1);

    order_leaves(&mut geophylogeny, Algorithm::Dp(DpStrategy::Crossings)).unwrap();
    assert_eq!(geophylogeny.number_of_crossings(), 1);
    assert_eq!(geophylogeny.tree().leaves_in_tree_order(), vec![1, 0, 2, 3]);
}

#[test]
fn greedy_never_worsens_a_dp_arrangement() {
    for seed in [4, 9] {
        let mut geophylogeny =
            generate::uniform_instance(500, 300, 12, "dp-then-greedy", seed).unwrap();
        geophylogeny.set_leader_style(LeaderStyle::Po);

        order_leaves(&mut geophylogeny, Algorithm::Dp(DpStrategy::Crossings)).unwrap();
        let after_dp = geophylogeny.number_of_crossings();

        let mut optimizer = GreedyOptimizer::new(&geophylogeny, seed).unwrap();
        optimizer.order_leaves(&mut geophylogeny);
        assert!(geophylogeny.number_of_crossings() <= after_dp);
    }
}

#[test]
fn ordering_refreshes_leaf_coordinates() {
    let mut geophylogeny = generate::uniform_instance(500, 300, 8, "dp-coords", 6).unwrap();
    order_leaves(
        &mut geophylogeny,
        Algorithm::Dp(DpStrategy::EuclideanDistance),
    )
    .unwrap();
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
fn single_leaf_instances_are_ordered_trivially() {
    let mut geophylogeny = generate::uniform_instance(100, 100, 1, "dp-single", 1).unwrap();
    order_leaves(
        &mut geophylogeny,
        Algorithm::Dp(DpStrategy::HorizontalDistance),
    )
    .unwrap();
    assert_eq!(geophylogeny.tree().leaves_in_tree_order(), vec![0]);
    assert_eq!(geophylogeny.tree().vertex(0).x(), geophylogeny.position_to_x(0));
}

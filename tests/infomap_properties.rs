use walkmap::optimizer::JoinWorkspace;
use walkmap::{
    attempt_join, Error, Graph, InfomapConfig, MapEquation, Partition, RandomWalkEstimator,
};

fn two_triangles() -> Graph<char> {
    Graph::from_adjacency([
        ('A', vec!['B', 'C']),
        ('B', vec!['A', 'C']),
        ('C', vec!['A', 'B', 'D']),
        ('D', vec!['C', 'E', 'F']),
        ('E', vec!['D', 'F']),
        ('F', vec!['E', 'D']),
    ])
    .unwrap()
}

fn four_squares() -> Graph<u32> {
    Graph::from_adjacency([
        (0, vec![1, 3]),
        (1, vec![0, 2]),
        (2, vec![1, 3, 13]),
        (3, vec![0, 2, 4]),
        (4, vec![3, 5, 7]),
        (5, vec![4, 6, 8]),
        (6, vec![5, 7]),
        (7, vec![4, 6]),
        (8, vec![5, 9, 11]),
        (9, vec![8, 10, 12]),
        (10, vec![9, 11]),
        (11, vec![8, 10]),
        (12, vec![9, 13, 15]),
        (13, vec![2, 12, 14]),
        (14, vec![13, 15]),
        (15, vec![12, 14]),
    ])
    .unwrap()
}

fn same_module(p: &Partition, nodes: &[usize]) -> bool {
    nodes.iter().all(|&v| p.module_of(v) == p.module_of(nodes[0]))
}

#[test]
fn walk_estimates_match_undirected_edge_flow() {
    let cfg = InfomapConfig::default();

    let g = two_triangles();
    let table = RandomWalkEstimator::from_config(&cfg).estimate(&g).unwrap();
    for s in 0..g.node_count() {
        for (_, p) in table.out(s) {
            assert!((p - 0.071).abs() <= 0.01, "edge flow {p}");
        }
    }

    let g = four_squares();
    let table = RandomWalkEstimator::from_config(&cfg).estimate(&g).unwrap();
    for s in 0..g.node_count() {
        for (_, p) in table.out(s) {
            assert!((p - 0.025).abs() <= 0.01, "edge flow {p}");
        }
    }
}

#[test]
fn estimated_map_equation_is_near_reference_values() {
    let g = two_triangles();
    let table = RandomWalkEstimator::from_config(&InfomapConfig::default())
        .estimate(&g)
        .unwrap();
    let eq = MapEquation::new(&table);

    let split = Partition::from_modules(vec![0, 0, 0, 1, 1, 1]);
    assert!((eq.evaluate(&split).unwrap() - 1.325).abs() <= 0.2);
    assert!((eq.evaluate(&Partition::singletons(6)).unwrap() - 3.557).abs() <= 0.2);
}

#[test]
fn codelength_is_finite_and_non_negative_with_exit_flow() {
    let g = four_squares();
    let table = RandomWalkEstimator::from_config(&InfomapConfig::default())
        .estimate(&g)
        .unwrap();
    let eq = MapEquation::new(&table);
    let candidates = [
        (0..16).collect::<Vec<u32>>(),
        (0..16).map(|v| v / 4).collect(),
        (0..16).map(|v| v % 3).collect(),
        (0..16).map(|v| u32::from(v >= 8)).collect(),
    ];
    for modules in candidates {
        let mut p = Partition::from_modules(modules);
        p.canonicalize();
        let cl = eq.evaluate(&p).unwrap();
        assert!(cl.is_finite() && cl >= 0.0, "codelength {cl}");
    }
}

#[test]
fn local_join_is_monotone_on_estimated_flow() {
    let g = four_squares();
    let table = RandomWalkEstimator::from_config(&InfomapConfig::default())
        .estimate(&g)
        .unwrap();
    let eq = MapEquation::new(&table);
    let mut workspace = JoinWorkspace::default();

    let mut p = Partition::singletons(16);
    let mut cl = eq.evaluate(&p).unwrap();
    for node in [5, 0, 12, 9, 2, 7, 14, 3, 10] {
        let next = attempt_join(node, &mut p, cl, &g, &eq, &mut workspace).unwrap();
        assert!(next <= cl);
        assert!(p.is_canonical());
        assert!((eq.evaluate(&p).unwrap() - next).abs() < 1e-12);
        cl = next;
    }
}

#[test]
fn driver_recovers_planted_modules() {
    let g = two_triangles();
    let result = walkmap::run(&g, &InfomapConfig::default()).unwrap();
    assert_eq!(result.num_modules, 2);
    assert!(same_module(&result.partition, &[0, 1, 2]));
    assert!(same_module(&result.partition, &[3, 4, 5]));
    assert!(result.codelength < result.initial_codelength);
    assert!(result.codelength < result.one_level_codelength);

    let g = four_squares();
    let result = walkmap::run(&g, &InfomapConfig::default()).unwrap();
    assert_eq!(result.num_modules, 4);
    for block in [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]] {
        assert!(same_module(&result.partition, &block));
    }
}

#[test]
fn disconnected_components_are_never_merged() {
    let g = Graph::from_adjacency([
        ("a1", vec!["a2", "a3"]),
        ("a2", vec!["a1", "a3"]),
        ("a3", vec!["a1", "a2"]),
        ("b1", vec!["b2", "b3", "b4"]),
        ("b2", vec!["b1", "b3"]),
        ("b3", vec!["b1", "b2", "b4"]),
        ("b4", vec!["b1", "b3"]),
    ])
    .unwrap();
    let cfg = InfomapConfig {
        walks: Some(40),
        ..InfomapConfig::default()
    };
    let result = walkmap::run(&g, &cfg).unwrap();
    for a in 0..3 {
        for b in 3..7 {
            assert_ne!(result.partition.module_of(a), result.partition.module_of(b));
        }
    }
}

#[test]
fn same_seed_same_partition() {
    let g = four_squares();
    let cfg = InfomapConfig {
        seed: 2024,
        walks: Some(12),
        steps: Some(5_000),
        ..InfomapConfig::default()
    };
    let a = walkmap::run(&g, &cfg).unwrap();
    let b = walkmap::run(&g, &cfg).unwrap();
    assert_eq!(a.partition, b.partition);
    assert_eq!(a.codelength.to_bits(), b.codelength.to_bits());

    let table = RandomWalkEstimator::from_config(&cfg).estimate(&g).unwrap();
    let c = walkmap::run_with_probabilities(&g, &table, &cfg).unwrap();
    let d = walkmap::run_with_probabilities(&g, &table, &cfg).unwrap();
    assert_eq!(c.partition, d.partition);
    assert_eq!(c.partition, a.partition);
}

#[test]
fn tiny_graphs_need_explicit_sample_counts() {
    let g = Graph::from_adjacency([(1u8, vec![2u8]), (2, vec![1])]).unwrap();
    assert!(matches!(
        walkmap::run(&g, &InfomapConfig::default()),
        Err(Error::InsufficientSamples { .. })
    ));

    let cfg = InfomapConfig {
        walks: Some(2),
        steps: Some(100),
        ..InfomapConfig::default()
    };
    let result = walkmap::run(&g, &cfg).unwrap();
    assert_eq!(result.num_modules, 2);
    assert_eq!(result.restarts, 2);
}

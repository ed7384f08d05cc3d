use std::fs::File;
use std::io::Write;
use std::time::{Duration, SystemTime};

#[test]
fn parse_adjacency_file_into_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.adj");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "# two triangles").unwrap();
    writeln!(f, "A: B C").unwrap();
    writeln!(f, "B: A C").unwrap();
    writeln!(f, "C: A B D").unwrap();
    writeln!(f, "D E F C").unwrap();
    writeln!(f, "E D F").unwrap();
    writeln!(f, "F E D").unwrap();

    let graph = walkmap::parser::parse_network_file(&path).unwrap();
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 14);
    let d = graph.index_of(&"D".to_string()).unwrap();
    let c = graph.index_of(&"C".to_string()).unwrap();
    assert_eq!(graph.neighbors(d).last(), Some(&(c as u32)));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.adj");
    let err = walkmap::parser::parse_network_file(&path).unwrap_err();
    assert!(matches!(err, walkmap::Error::Open { .. }));
    assert!(err.to_string().contains("missing.adj"));
}

#[test]
fn cli_defaults_to_clu_output() {
    let args = vec![
        "in.adj".to_string(),
        "out".to_string(),
        "--silent".to_string(),
    ];
    let cfg = walkmap::cli::parse_args(&args).unwrap();
    assert!(cfg.print_clu);
    assert!(!cfg.print_tree);
    assert_eq!(cfg.out_name, "in");
    assert_eq!(cfg.infomap, walkmap::InfomapConfig::default());
}

#[test]
fn cli_parses_separate_values() {
    let args = vec![
        "--seed".to_string(),
        "7".to_string(),
        "--walks".to_string(),
        "30".to_string(),
        "--steps".to_string(),
        "500".to_string(),
        "--restarts".to_string(),
        "4".to_string(),
        "--threads".to_string(),
        "2".to_string(),
        "-o".to_string(),
        "clu,tree".to_string(),
        "in.adj".to_string(),
        "out".to_string(),
    ];
    let cfg = walkmap::cli::parse_args(&args).unwrap();
    assert_eq!(cfg.infomap.seed, 7);
    assert_eq!(cfg.infomap.walks, Some(30));
    assert_eq!(cfg.infomap.steps, Some(500));
    assert_eq!(cfg.infomap.restarts, Some(4));
    assert_eq!(cfg.infomap.walk_threads, Some(2));
    assert!(cfg.print_clu && cfg.print_tree);
}

#[test]
fn cli_parses_equals_values() {
    let args = vec![
        "--num-trials=8".to_string(),
        "--walks=0".to_string(),
        "--out-name=run".to_string(),
        "--tree".to_string(),
        "in.adj".to_string(),
        "out".to_string(),
    ];
    let cfg = walkmap::cli::parse_args(&args).unwrap();
    assert_eq!(cfg.infomap.restarts, Some(8));
    assert_eq!(cfg.infomap.walks, None);
    assert_eq!(cfg.out_name, "run");
    assert!(cfg.print_tree);
    assert!(!cfg.print_clu);
}

#[test]
fn cli_requires_input_and_output() {
    let args = vec!["in.adj".to_string()];
    assert!(matches!(
        walkmap::cli::parse_args(&args),
        Err(walkmap::Error::Usage(_))
    ));
}

#[test]
fn clu_and_tree_files_list_every_node() {
    let dir = tempfile::tempdir().unwrap();
    let graph = walkmap::Graph::from_adjacency([
        ("A".to_string(), vec!["B".to_string(), "C".to_string()]),
        ("B".to_string(), vec!["A".to_string(), "C".to_string()]),
        ("C".to_string(), vec!["A".to_string(), "B".to_string(), "D".to_string()]),
        ("D".to_string(), vec!["C".to_string(), "E".to_string(), "F".to_string()]),
        ("E".to_string(), vec!["D".to_string(), "F".to_string()]),
        ("F".to_string(), vec!["E".to_string(), "D".to_string()]),
    ])
    .unwrap();
    let table = walkmap::VisitProbabilities::uniform(&graph, 0.071);

    let args = vec![
        "g.adj".to_string(),
        dir.path().join("out").display().to_string(),
        "--clu".to_string(),
        "--tree".to_string(),
    ];
    let cfg = walkmap::cli::parse_args(&args).unwrap();
    let result = walkmap::run_with_probabilities(&graph, &table, &cfg.infomap).unwrap();
    let summary = walkmap::output::RunSummary {
        walks: 0,
        steps: 0,
        start_time: SystemTime::now(),
        elapsed: Duration::from_millis(3),
    };
    let written =
        walkmap::output::write_outputs(&cfg, &graph, &table, &result, &summary).unwrap();
    assert_eq!(written.len(), 2);

    let clu = std::fs::read_to_string(&written[0]).unwrap();
    assert!(clu.contains("# partitioned into 2 levels with 2 top modules"));
    assert!(clu.contains("# codelength 1.31281 bits"));
    let rows: Vec<&str> = clu.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().any(|r| r.starts_with("C ") && r.ends_with(" 0.213")));

    let tree = std::fs::read_to_string(&written[1]).unwrap();
    assert!(tree.lines().any(|l| l.starts_with("1:1 0.213 ")));
    assert_eq!(tree.lines().filter(|l| !l.starts_with('#')).count(), 6);
}

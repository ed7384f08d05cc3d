use log::LevelFilter;
use std::env;
use std::process::ExitCode;
use std::time::Instant;
use walkmap::flow::RandomWalkEstimator;
use walkmap::output::RunSummary;

fn run() -> walkmap::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cfg = walkmap::cli::parse_args(&args)?;

    walkmap::logger::init(cfg.verbose);
    if cfg.silent {
        walkmap::logger::set_log_level(LevelFilter::Warn);
    }

    let start_system = std::time::SystemTime::now();
    let start = Instant::now();

    let graph = walkmap::parser::parse_network_file(&cfg.network_file)?;

    let estimator = RandomWalkEstimator::from_config(&cfg.infomap);
    let table = estimator.estimate(&graph)?;
    let result = walkmap::run_with_probabilities(&graph, &table, &cfg.infomap)?;

    let summary = RunSummary {
        walks: estimator.walks(graph.node_count()),
        steps: estimator.steps(graph.node_count()),
        start_time: start_system,
        elapsed: start.elapsed(),
    };
    let _written = walkmap::output::write_outputs(&cfg, &graph, &table, &result, &summary)?;

    if !cfg.silent {
        println!(
            "Partitioned into 2 levels with {} top modules, codelength {}",
            result.num_modules, result.codelength
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

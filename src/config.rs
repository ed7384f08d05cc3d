use std::path::PathBuf;

pub const DEFAULT_SEED: u64 = 123;

/// Knobs consumed by the estimator and the search driver.
///
/// `None` (or an explicit zero) derives the value from the graph size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfomapConfig {
    pub walks: Option<usize>,
    pub steps: Option<usize>,
    pub restarts: Option<usize>,
    pub seed: u64,
    pub walk_threads: Option<usize>,
}

impl Default for InfomapConfig {
    fn default() -> Self {
        Self {
            walks: None,
            steps: None,
            restarts: None,
            seed: DEFAULT_SEED,
            walk_threads: None,
        }
    }
}

impl InfomapConfig {
    pub fn resolved_restarts(&self, node_count: usize) -> usize {
        self.restarts.filter(|&r| r > 0).unwrap_or(node_count)
    }
}

/// Binary configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub raw_args: String,
    pub network_file: PathBuf,
    pub out_dir: PathBuf,
    pub out_name: String,
    pub infomap: InfomapConfig,
    pub silent: bool,
    pub verbose: bool,
    pub print_clu: bool,
    pub print_tree: bool,
}

impl Config {
    pub fn any_output_enabled(&self) -> bool {
        self.print_clu || self.print_tree
    }
}

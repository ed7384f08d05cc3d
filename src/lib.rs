//! Two-level community detection with the map equation.
//!
//! Visit rates of every directed edge are estimated by Monte-Carlo random
//! walks ([`flow`]), partitions are scored by their two-level codelength
//! ([`objective`]), and a randomized multi-start local-join search looks for
//! the partition with the shortest description ([`optimizer`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod graph;
pub mod logger;
pub mod objective;
pub mod optimizer;
pub mod output;
pub mod parser;
pub mod partition;
pub mod rng;

pub use config::InfomapConfig;
pub use error::{Error, Result};
pub use flow::{RandomWalkEstimator, VisitProbabilities};
pub use graph::Graph;
pub use objective::{CodelengthTerms, MapEquation};
pub use optimizer::{attempt_join, run, run_with_probabilities, InfomapResult};
pub use partition::{canonicalize, Partition};

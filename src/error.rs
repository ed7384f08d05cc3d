//! Error types for walkmap.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building graphs, estimating flow, scoring partitions,
/// or running the binary's I/O.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The graph has no nodes.
    #[error("graph is empty")]
    EmptyGraph,

    /// An adjacency list references an id that is not a node of the graph.
    #[error("node {node} lists unknown neighbour {neighbor}")]
    UnknownNeighbor { node: String, neighbor: String },

    /// A node has no outgoing neighbours, so a walker reaching it is stuck.
    #[error("node {node} has no neighbours to walk to")]
    DanglingNode { node: String },

    /// Walk count or step count resolved to zero.
    #[error("insufficient sample size: {walks} walks of {steps} steps")]
    InsufficientSamples { walks: usize, steps: usize },

    /// The visit-probability table carries no mass at all.
    #[error("visit-probability table carries no flow")]
    NoFlow,

    /// A partition handed to the evaluator has non-dense module ids.
    #[error("partition is not canonical: module {module} with {num_modules} modules")]
    NonCanonicalPartition { module: u32, num_modules: u32 },

    /// A partition does not cover the same node set as the graph.
    #[error("partition covers {found} nodes, expected {expected}")]
    PartitionSize { expected: usize, found: usize },

    /// A node was left out of an explicit assignment.
    #[error("node {node} has no module assignment")]
    UnassignedNode { node: String },

    /// A walk start index lies outside the graph.
    #[error("walk start {index} is out of range for {node_count} nodes")]
    InvalidStart { index: usize, node_count: usize },

    #[error("failed to build walk thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("error opening file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error reading file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed line in a network file.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),
}

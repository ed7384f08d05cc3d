use crate::config::InfomapConfig;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::rng::{mix_seed, RustRng};
use log::debug;
use rayon::prelude::*;
use std::fmt::Debug;

const WALKS_PER_LOG_NODE: usize = 10;
const STEPS_PER_LOG_NODE: usize = 10_000;

/// Estimated fraction of walk steps traversing each directed edge.
///
/// Rows are per source node; each row lists the distinct structural
/// neighbours of that node in first-occurrence order.
#[derive(Debug, Clone)]
pub struct VisitProbabilities {
    offsets: Vec<u32>,
    targets: Vec<u32>,
    probability: Vec<f64>,
}

/// Distinct (source, target) slots plus, for every adjacency entry, the slot it
/// counts into.
struct EdgeSlots {
    offsets: Vec<u32>,
    targets: Vec<u32>,
    slot_of_edge: Vec<u32>,
}

impl EdgeSlots {
    fn new<N>(graph: &Graph<N>) -> Self {
        let n = graph.node_count();
        let mut offsets = vec![0u32; n + 1];
        let mut targets: Vec<u32> = Vec::with_capacity(graph.edge_count());
        let mut slot_of_edge = Vec::with_capacity(graph.edge_count());

        for s in 0..n {
            let row_start = targets.len();
            for &t in graph.neighbors(s) {
                let slot = match targets[row_start..].iter().position(|&x| x == t) {
                    Some(pos) => row_start + pos,
                    None => {
                        targets.push(t);
                        targets.len() - 1
                    }
                };
                slot_of_edge.push(slot as u32);
            }
            offsets[s + 1] = targets.len() as u32;
        }

        Self {
            offsets,
            targets,
            slot_of_edge,
        }
    }
}

impl VisitProbabilities {
    /// Synthetic table assigning `f(source, target)` to each distinct edge.
    pub fn from_fn<N, F>(graph: &Graph<N>, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let slots = EdgeSlots::new(graph);
        let mut probability = vec![0.0; slots.targets.len()];
        for s in 0..graph.node_count() {
            let range = slots.offsets[s] as usize..slots.offsets[s + 1] as usize;
            for e in range {
                probability[e] = f(s, slots.targets[e] as usize);
            }
        }
        Self {
            offsets: slots.offsets,
            targets: slots.targets,
            probability,
        }
    }

    pub fn uniform<N>(graph: &Graph<N>, p: f64) -> Self {
        Self::from_fn(graph, |_, _| p)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn row(&self, source: usize) -> std::ops::Range<usize> {
        self.offsets[source] as usize..self.offsets[source + 1] as usize
    }

    /// `(target, probability)` pairs recorded for `source`.
    pub fn out(&self, source: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row(source)
            .map(move |e| (self.targets[e] as usize, self.probability[e]))
    }

    pub fn probability(&self, source: usize, target: usize) -> Option<f64> {
        self.row(source)
            .find(|&e| self.targets[e] as usize == target)
            .map(|e| self.probability[e])
    }

    /// Total incoming mass credited to each node.
    pub fn node_flow(&self) -> Vec<f64> {
        let mut flow = vec![0.0; self.node_count()];
        for (e, &t) in self.targets.iter().enumerate() {
            flow[t as usize] += self.probability[e];
        }
        flow
    }

    pub fn total_flow(&self) -> f64 {
        self.probability.iter().sum()
    }
}

/// Monte-Carlo estimator of directed-edge visit rates.
#[derive(Debug, Clone, Default)]
pub struct RandomWalkEstimator {
    walks: Option<usize>,
    steps: Option<usize>,
    seed: u64,
    threads: Option<usize>,
    start: Option<usize>,
}

/// `per_log_node · ⌊ln n⌋`, zero for graphs too small to sample.
fn derived_count(node_count: usize, per_log_node: usize) -> usize {
    if node_count == 0 {
        return 0;
    }
    per_log_node * (node_count as f64).ln().floor() as usize
}

#[inline]
fn env_walk_threads() -> Option<usize> {
    ["WALKMAP_WALK_THREADS", "RAYON_NUM_THREADS"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .filter_map(|s| s.parse::<usize>().ok())
        .find(|&n| n > 0)
}

fn resolve_walk_threads(walks: usize, requested: Option<usize>) -> usize {
    let default_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested
        .filter(|&n| n > 0)
        .or_else(env_walk_threads)
        .unwrap_or(default_threads)
        .min(walks)
        .max(1)
}

impl RandomWalkEstimator {
    pub fn from_config(cfg: &InfomapConfig) -> Self {
        Self {
            walks: cfg.walks.filter(|&w| w > 0),
            steps: cfg.steps.filter(|&s| s > 0),
            seed: cfg.seed,
            threads: cfg.walk_threads,
            start: None,
        }
    }

    /// Starts every walk at `node_idx` instead of a uniformly drawn node.
    pub fn with_start(mut self, node_idx: usize) -> Self {
        self.start = Some(node_idx);
        self
    }

    pub fn walks(&self, node_count: usize) -> usize {
        self.walks
            .unwrap_or_else(|| derived_count(node_count, WALKS_PER_LOG_NODE))
    }

    pub fn steps(&self, node_count: usize) -> usize {
        self.steps
            .unwrap_or_else(|| derived_count(node_count, STEPS_PER_LOG_NODE))
    }

    pub fn estimate<N: Debug + Sync>(&self, graph: &Graph<N>) -> Result<VisitProbabilities> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        if let Some(start) = self.start {
            if start >= n {
                return Err(Error::InvalidStart {
                    index: start,
                    node_count: n,
                });
            }
        }
        if let Some(idx) = (0..n).find(|&i| graph.out_degree(i) == 0) {
            return Err(Error::DanglingNode {
                node: format!("{:?}", graph.node_id(idx)),
            });
        }

        let walks = self.walks(n);
        let steps = self.steps(n);
        if walks == 0 || steps == 0 {
            return Err(Error::InsufficientSamples { walks, steps });
        }

        let slots = EdgeSlots::new(graph);
        let threads = resolve_walk_threads(walks, self.threads);
        debug!(
            "simulating {} walks of {} steps on {} nodes ({} threads)",
            walks, steps, n, threads
        );

        // Integer counts sum exactly, so the table does not depend on scheduling.
        let counts = if threads == 1 {
            let mut counts = vec![0u64; slots.targets.len()];
            for w in 0..walks {
                self.walk(graph, &slots, w, steps, &mut counts);
            }
            counts
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| {
                (0..walks)
                    .into_par_iter()
                    .fold(
                        || vec![0u64; slots.targets.len()],
                        |mut counts, w| {
                            self.walk(graph, &slots, w, steps, &mut counts);
                            counts
                        },
                    )
                    .reduce(
                        || vec![0u64; slots.targets.len()],
                        |mut a, b| {
                            for (x, y) in a.iter_mut().zip(b) {
                                *x += y;
                            }
                            a
                        },
                    )
            })
        };

        let total = (walks as f64) * (steps as f64);
        let probability = counts.into_iter().map(|c| c as f64 / total).collect();

        Ok(VisitProbabilities {
            offsets: slots.offsets,
            targets: slots.targets,
            probability,
        })
    }

    fn walk<N>(
        &self,
        graph: &Graph<N>,
        slots: &EdgeSlots,
        walk_index: usize,
        steps: usize,
        counts: &mut [u64],
    ) {
        let mut rng = RustRng::new(mix_seed(self.seed, walk_index as u64));
        let mut current = match self.start {
            Some(s) => s,
            None => rng.pick(graph.node_count()),
        };
        for _ in 0..steps {
            let range = graph.out_range(current);
            let e = range.start + rng.pick(range.len());
            counts[slots.slot_of_edge[e] as usize] += 1;
            current = graph.neighbors(current)[e - range.start] as usize;
        }
    }
}

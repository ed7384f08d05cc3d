use crate::config::InfomapConfig;
use crate::error::{Error, Result};
use crate::flow::{RandomWalkEstimator, VisitProbabilities};
use crate::graph::Graph;
use crate::objective::MapEquation;
use crate::partition::Partition;
use crate::rng::{mix_seed, RustRng, TrialRng, RESTART_STREAM};
use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Best partition found over all restarts.
#[derive(Debug, Clone)]
pub struct InfomapResult {
    pub partition: Partition,
    pub codelength: f64,
    pub num_modules: u32,
    /// Codelength of the all-singletons starting point.
    pub initial_codelength: f64,
    /// Codelength with every node in one module.
    pub one_level_codelength: f64,
    pub restarts: usize,
}

impl InfomapResult {
    pub fn assignments<'g, N>(
        &'g self,
        graph: &'g Graph<N>,
    ) -> impl Iterator<Item = (&'g N, u32)> + 'g {
        self.partition.assignments(graph)
    }

    pub fn into_map<N>(self, graph: &Graph<N>) -> FxHashMap<N, u32>
    where
        N: Eq + Hash + Clone,
    {
        self.partition
            .assignments(graph)
            .map(|(id, m)| (id.clone(), m))
            .collect()
    }
}

/// Outcome of one restart.
#[derive(Debug, Clone)]
pub struct RestartResult {
    pub partition: Partition,
    pub codelength: f64,
}

/// Scratch state reused across join attempts.
#[derive(Debug, Default)]
pub struct JoinWorkspace {
    trial: Option<Partition>,
}

/// Merges the module of `node` into the neighbouring module that lowers the
/// codelength most, if any does.
///
/// Every neighbour in a different module is scored before committing. On
/// improvement `partition` is updated and canonicalized in place and the new
/// codelength returned; otherwise `current_codelength` comes back unchanged.
pub fn attempt_join<N>(
    node: usize,
    partition: &mut Partition,
    current_codelength: f64,
    graph: &Graph<N>,
    objective: &MapEquation<'_>,
    workspace: &mut JoinWorkspace,
) -> Result<f64> {
    let own = partition.module_of(node);
    let mut best: Option<(usize, f64)> = None;
    let mut best_codelength = current_codelength;

    for &neighbour in graph.neighbors(node) {
        let neighbour = neighbour as usize;
        let target = partition.module_of(neighbour);
        if target == own {
            continue;
        }

        let trial = workspace.trial.get_or_insert_with(|| partition.clone());
        trial.clone_from(partition);
        trial.merge_module_into(own, target);
        trial.canonicalize();

        let codelength = objective.evaluate(trial)?;
        if codelength < best_codelength {
            best_codelength = codelength;
            best = Some((neighbour, codelength));
        }
    }

    match best {
        Some((neighbour, codelength)) => {
            let target = partition.module_of(neighbour);
            partition.merge_module_into(own, target);
            partition.canonicalize();
            trace!(
                "joined module of node {} into module of node {}: {} -> {}",
                node,
                neighbour,
                current_codelength,
                codelength
            );
            Ok(codelength)
        }
        None => Ok(current_codelength),
    }
}

/// One randomized pass of local joins starting from `initial`.
pub fn single_restart<N>(
    graph: &Graph<N>,
    objective: &MapEquation<'_>,
    initial: &Partition,
    initial_codelength: f64,
    rng: &mut impl TrialRng,
) -> Result<RestartResult> {
    let mut partition = initial.clone();
    let mut codelength = initial_codelength;
    let mut workspace = JoinWorkspace::default();

    let mut order = vec![0u32; graph.node_count()];
    rng.randomized_index_vector(&mut order);

    for &node in &order {
        if partition.num_modules() > 2 {
            codelength = attempt_join(
                node as usize,
                &mut partition,
                codelength,
                graph,
                objective,
                &mut workspace,
            )?;
        }
    }

    Ok(RestartResult {
        partition,
        codelength,
    })
}

#[inline]
fn seed_for_restart(base_seed: u64, restart_index: usize) -> u64 {
    mix_seed(base_seed ^ RESTART_STREAM, restart_index as u64)
}

/// Searches for the lowest-codelength partition of `graph` against a given
/// visit-probability table.
pub fn run_with_probabilities<N>(
    graph: &Graph<N>,
    table: &VisitProbabilities,
    cfg: &InfomapConfig,
) -> Result<InfomapResult> {
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    if table.node_count() != n {
        return Err(Error::PartitionSize {
            expected: n,
            found: table.node_count(),
        });
    }

    let objective = MapEquation::new(table);
    let initial = Partition::singletons(n);
    let initial_codelength = objective.evaluate(&initial)?;
    let one_level_codelength = objective.evaluate(&Partition::single_module(n))?;
    debug!(
        "singleton codelength {}, one-module codelength {}",
        initial_codelength, one_level_codelength
    );

    let mut best = RestartResult {
        partition: initial.clone(),
        codelength: initial_codelength,
    };

    let restarts = cfg.resolved_restarts(n);
    for restart in 0..restarts {
        let mut rng = RustRng::new(seed_for_restart(cfg.seed, restart));
        let trial = single_restart(graph, &objective, &initial, initial_codelength, &mut rng)?;
        debug!(
            "restart {}: {} modules, codelength {}",
            restart,
            trial.partition.num_modules(),
            trial.codelength
        );
        if trial.codelength < best.codelength {
            best = trial;
        }
    }

    let num_modules = best.partition.num_modules();
    info!(
        "best of {} restarts: {} modules, codelength {}",
        restarts, num_modules, best.codelength
    );

    Ok(InfomapResult {
        partition: best.partition,
        codelength: best.codelength,
        num_modules,
        initial_codelength,
        one_level_codelength,
        restarts,
    })
}

/// Estimates visit probabilities by random walks, then searches for the
/// lowest-codelength partition.
pub fn run<N>(graph: &Graph<N>, cfg: &InfomapConfig) -> Result<InfomapResult>
where
    N: Debug + Sync,
{
    let table = RandomWalkEstimator::from_config(cfg).estimate(graph)?;
    run_with_probabilities(graph, &table, cfg)
}

use crate::error::{Error, Result};
use crate::flow::VisitProbabilities;
use crate::partition::Partition;

/// `p · log2(p / q)`, taking the `p → 0` limit as zero.
#[inline]
pub fn plogq(p: f64, q: f64) -> f64 {
    if p > 0.0 { p * (p / q).log2() } else { 0.0 }
}

/// Two-level codelength split into its index and module parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodelengthTerms {
    pub codelength: f64,
    pub index_codelength: f64,
    pub module_codelength: f64,
}

/// Per-module accumulators for one evaluation.
#[derive(Debug, Clone, Copy, Default)]
struct ModuleFlow {
    flux: f64,
    enter: f64,
    exit: f64,
    node_entropy: f64,
}

/// Map-equation evaluator over a fixed visit-probability table.
#[derive(Debug, Clone, Copy)]
pub struct MapEquation<'t> {
    table: &'t VisitProbabilities,
}

impl<'t> MapEquation<'t> {
    pub fn new(table: &'t VisitProbabilities) -> Self {
        Self { table }
    }

    pub fn evaluate(&self, partition: &Partition) -> Result<f64> {
        self.evaluate_terms(partition).map(|t| t.codelength)
    }

    /// Scores `partition`, recomputing every accumulator from scratch.
    ///
    /// Module ids must already be dense. Inter-module edges credit the flux
    /// of both endpoint modules, and the incoming mass of each module is
    /// folded into its node-entropy term before the per-node terms are added.
    pub fn evaluate_terms(&self, partition: &Partition) -> Result<CodelengthTerms> {
        let n = self.table.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        if partition.node_count() != n {
            return Err(Error::PartitionSize {
                expected: n,
                found: partition.node_count(),
            });
        }
        if let Some(module) = partition.first_non_canonical() {
            return Err(Error::NonCanonicalPartition {
                module,
                num_modules: partition.num_modules(),
            });
        }

        let k = partition.num_modules() as usize;
        let mut modules = vec![ModuleFlow::default(); k];
        let mut node_visits = vec![0.0f64; n];
        let mut total_exit = 0.0f64;
        let mut total_mass = 0.0f64;

        for node in 0..n {
            let m_node = partition.module_of(node) as usize;
            for (neighbour, p) in self.table.out(node) {
                let m_nb = partition.module_of(neighbour) as usize;
                total_mass += p;
                node_visits[neighbour] += p;
                modules[m_nb].flux += p;
                modules[m_nb].node_entropy += p;
                if m_node != m_nb {
                    modules[m_node].flux += p;
                    modules[m_node].exit += p;
                    modules[m_nb].enter += p;
                    total_exit += p;
                }
            }
        }

        if total_mass <= 0.0 {
            return Err(Error::NoFlow);
        }

        for (node, &visits) in node_visits.iter().enumerate() {
            let m = &mut modules[partition.module_of(node) as usize];
            m.node_entropy += plogq(visits, m.flux);
        }

        let mut index_entropy = 0.0f64;
        let mut module_entropy = 0.0f64;
        for m in &modules {
            if m.enter > 0.0 {
                index_entropy -= plogq(m.enter, total_exit) / total_exit;
            }
            module_entropy -= plogq(m.exit, m.flux) + m.node_entropy;
        }

        let index_codelength = total_exit * index_entropy;
        Ok(CodelengthTerms {
            codelength: index_codelength + module_entropy,
            index_codelength,
            module_codelength: module_entropy,
        })
    }
}

use crate::error::{Error, Result};
use crate::graph::Graph;
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

const UNASSIGNED: u32 = u32::MAX;

/// Renumbers module ids in place to the dense range `[0, k)`, in order of
/// first appearance. Returns `k`.
pub fn canonicalize(node_to_module: &mut [u32]) -> u32 {
    let mut relabel: FxHashMap<u32, u32> = FxHashMap::default();
    for m in node_to_module.iter_mut() {
        let next = relabel.len() as u32;
        *m = *relabel.entry(*m).or_insert(next);
    }
    relabel.len() as u32
}

/// Assignment of every node (by dense index) to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    node_to_module: Vec<u32>,
    num_modules: u32,
}

impl Partition {
    /// Every node in its own module.
    pub fn singletons(node_count: usize) -> Self {
        Self {
            node_to_module: (0..node_count as u32).collect(),
            num_modules: node_count as u32,
        }
    }

    /// Every node in module 0.
    pub fn single_module(node_count: usize) -> Self {
        Self {
            node_to_module: vec![0; node_count],
            num_modules: u32::from(node_count > 0),
        }
    }

    /// Takes a raw index-ordered assignment as is; ids need not be dense.
    pub fn from_modules(node_to_module: Vec<u32>) -> Self {
        let mut seen = node_to_module.clone();
        seen.sort_unstable();
        seen.dedup();
        Self {
            num_modules: seen.len() as u32,
            node_to_module,
        }
    }

    /// Builds a partition from `(node id, module)` pairs covering every node.
    pub fn from_assignments<N, I>(graph: &Graph<N>, pairs: I) -> Result<Self>
    where
        N: Eq + Hash + Clone + Debug,
        I: IntoIterator<Item = (N, u32)>,
    {
        let mut node_to_module = vec![UNASSIGNED; graph.node_count()];
        for (id, module) in pairs {
            let idx = graph.index_of(&id).ok_or_else(|| Error::UnassignedNode {
                node: format!("{:?}", id),
            })?;
            node_to_module[idx] = module;
        }
        if let Some(idx) = node_to_module.iter().position(|&m| m == UNASSIGNED) {
            return Err(Error::UnassignedNode {
                node: format!("{:?}", graph.node_id(idx)),
            });
        }
        Ok(Self::from_modules(node_to_module))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_to_module.len()
    }

    #[inline]
    pub fn module_of(&self, node_idx: usize) -> u32 {
        self.node_to_module[node_idx]
    }

    /// Number of distinct modules in use.
    #[inline]
    pub fn num_modules(&self) -> u32 {
        self.num_modules
    }

    pub fn node_to_module(&self) -> &[u32] {
        &self.node_to_module
    }

    /// Relabels every member of `from` to `into`; both must be live modules.
    /// Leaves ids non-dense until the next [`Partition::canonicalize`].
    pub fn merge_module_into(&mut self, from: u32, into: u32) {
        if from == into {
            return;
        }
        for m in self.node_to_module.iter_mut() {
            if *m == from {
                *m = into;
            }
        }
        self.num_modules -= 1;
    }

    pub fn canonicalize(&mut self) {
        self.num_modules = canonicalize(&mut self.node_to_module);
    }

    pub fn is_canonical(&self) -> bool {
        self.first_non_canonical().is_none()
    }

    /// First module id outside `[0, num_modules)`.
    pub(crate) fn first_non_canonical(&self) -> Option<u32> {
        self.node_to_module
            .iter()
            .copied()
            .find(|&m| m >= self.num_modules)
    }

    /// `(node id, module)` pairs in graph node order.
    pub fn assignments<'g, N>(
        &'g self,
        graph: &'g Graph<N>,
    ) -> impl Iterator<Item = (&'g N, u32)> + 'g {
        graph.node_ids().iter().zip(self.node_to_module.iter().copied())
    }

    /// Member node indices per module, each in node order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.num_modules as usize];
        for (idx, &m) in self.node_to_module.iter().enumerate() {
            members[m as usize].push(idx);
        }
        members
    }
}

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Directed graph over opaque node ids.
///
/// Ids are mapped to dense indices in insertion order; that order is the
/// deterministic node iteration order used everywhere else in the crate.
/// Neighbour lists keep their given order and multiplicity.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    node_ids: Vec<N>,
    id_to_idx: FxHashMap<N, u32>,
    out_offsets: Vec<u32>,
    edge_target: Vec<u32>,
}

impl<N> Graph<N>
where
    N: Eq + Hash + Clone + Debug,
{
    /// Builds a graph from `(node, neighbours)` pairs.
    ///
    /// Repeated keys append to the earlier neighbour list. Every neighbour must
    /// also appear as a key; an open node set is rejected here instead of
    /// failing later inside the walk simulator.
    pub fn from_adjacency<I, A>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, A)>,
        A: IntoIterator<Item = N>,
    {
        let mut node_ids: Vec<N> = Vec::new();
        let mut id_to_idx: FxHashMap<N, u32> = FxHashMap::default();
        let mut raw: Vec<Vec<N>> = Vec::new();

        for (id, neighbours) in adjacency {
            let idx = match id_to_idx.get(&id) {
                Some(&idx) => idx as usize,
                None => {
                    let idx = node_ids.len();
                    id_to_idx.insert(id.clone(), idx as u32);
                    node_ids.push(id);
                    raw.push(Vec::new());
                    idx
                }
            };
            raw[idx].extend(neighbours);
        }

        let n = node_ids.len();
        let mut out_offsets = vec![0u32; n + 1];
        let mut edge_target = Vec::with_capacity(raw.iter().map(Vec::len).sum());

        for (idx, neighbours) in raw.iter().enumerate() {
            for nb in neighbours {
                let t = *id_to_idx.get(nb).ok_or_else(|| Error::UnknownNeighbor {
                    node: format!("{:?}", node_ids[idx]),
                    neighbor: format!("{:?}", nb),
                })?;
                edge_target.push(t);
            }
            out_offsets[idx + 1] = edge_target.len() as u32;
        }

        Ok(Self {
            node_ids,
            id_to_idx,
            out_offsets,
            edge_target,
        })
    }

    #[inline]
    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.id_to_idx.get(id).map(|&i| i as usize)
    }
}

impl<N> Graph<N> {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Number of adjacency entries, counting repeats.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_target.len()
    }

    #[inline]
    pub fn out_range(&self, node_idx: usize) -> std::ops::Range<usize> {
        self.out_offsets[node_idx] as usize..self.out_offsets[node_idx + 1] as usize
    }

    #[inline]
    pub fn neighbors(&self, node_idx: usize) -> &[u32] {
        &self.edge_target[self.out_range(node_idx)]
    }

    #[inline]
    pub fn out_degree(&self, node_idx: usize) -> usize {
        (self.out_offsets[node_idx + 1] - self.out_offsets[node_idx]) as usize
    }

    #[inline]
    pub fn node_id(&self, node_idx: usize) -> &N {
        &self.node_ids[node_idx]
    }

    pub fn node_ids(&self) -> &[N] {
        &self.node_ids
    }
}

use crate::error::{Error, Result};
use crate::graph::Graph;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Adjacency lists in first-seen node order.
#[derive(Debug, Clone, Default)]
pub struct ParsedAdjacency {
    pub nodes: Vec<(String, Vec<String>)>,
    index: FxHashMap<String, usize>,
}

impl ParsedAdjacency {
    fn push_line(&mut self, node: &str, neighbours: impl Iterator<Item = String>) {
        let idx = match self.index.get(node) {
            Some(&idx) => idx,
            None => {
                self.index.insert(node.to_string(), self.nodes.len());
                self.nodes.push((node.to_string(), Vec::new()));
                self.nodes.len() - 1
            }
        };
        self.nodes[idx].1.extend(neighbours);
    }

    pub fn into_graph(self) -> Result<Graph<String>> {
        Graph::from_adjacency(self.nodes)
    }
}

/// Splits `node[:] neighbour neighbour ...` into its node id and neighbours.
fn parse_adjacency_line(
    line: &str,
    line_no: usize,
) -> Result<(&str, impl Iterator<Item = String> + '_)> {
    let (head, rest) = match line.split_once(':') {
        Some((head, rest)) => (head.trim(), rest),
        None => {
            let head = line.split_whitespace().next().unwrap_or_default();
            (head, &line[head.len()..])
        }
    };
    if head.is_empty() || head.contains(char::is_whitespace) {
        return Err(Error::Parse {
            line: line_no,
            message: format!("can't parse node id from line '{}'", line),
        });
    }
    Ok((head, rest.split_whitespace().map(str::to_string)))
}

pub fn parse_adjacency<R: BufRead>(reader: R, path: &Path) -> Result<ParsedAdjacency> {
    let mut parsed = ParsedAdjacency::default();

    for (i, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (node, neighbours) = parse_adjacency_line(line, i + 1)?;
        parsed.push_line(node, neighbours);
    }

    if parsed.nodes.is_empty() {
        return Err(Error::EmptyGraph);
    }

    Ok(parsed)
}

pub fn parse_network_file(path: &Path) -> Result<Graph<String>> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_adjacency(BufReader::new(file), path)?.into_graph()
}

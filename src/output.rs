use crate::config::Config;
use crate::error::{Error, Result};
use crate::flow::VisitProbabilities;
use crate::graph::Graph;
use crate::optimizer::InfomapResult;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Formats `v` with `sig` significant digits, trimming trailing zeros.
fn fmt_sig(v: f64, sig: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let digits_before = v.abs().log10().floor() as i32 + 1;
    let decimals = (sig as i32 - digits_before).max(0) as usize;

    let mut s = format!("{:.*}", decimals, v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn format_started_at(start_time: SystemTime) -> String {
    let dt: chrono::DateTime<chrono::Local> = start_time.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Run metadata echoed into every output header.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub walks: usize,
    pub steps: usize,
    pub start_time: SystemTime,
    pub elapsed: Duration,
}

/// Modules ordered by flow (descending), members likewise.
#[derive(Debug)]
struct OrderedModules {
    module_nodes: Vec<Vec<usize>>,
}

fn build_ordered_modules(result: &InfomapResult, node_flow: &[f64]) -> OrderedModules {
    let mut module_nodes = result.partition.members();
    let module_flow: Vec<f64> = module_nodes
        .iter()
        .map(|nodes| nodes.iter().map(|&i| node_flow[i]).sum())
        .collect();

    let mut order: Vec<usize> = (0..module_nodes.len()).collect();
    order.sort_by(|&a, &b| {
        module_flow[b]
            .partial_cmp(&module_flow[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    for nodes in &mut module_nodes {
        nodes.sort_by(|&a, &b| {
            node_flow[b]
                .partial_cmp(&node_flow[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
    }

    let mut taken: Vec<Option<Vec<usize>>> = module_nodes.into_iter().map(Some).collect();
    OrderedModules {
        module_nodes: order.iter().filter_map(|&m| taken[m].take()).collect(),
    }
}

fn output_base_path(cfg: &Config) -> PathBuf {
    let mut p = cfg.out_dir.clone();
    p.push(&cfg.out_name);
    p
}

struct OutputFile {
    path: PathBuf,
    w: BufWriter<File>,
}

impl OutputFile {
    fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            w: BufWriter::new(file),
        })
    }

    fn line(&mut self, args: impl Display) -> Result<()> {
        writeln!(self.w, "{}", args).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn finish(mut self) -> Result<()> {
        self.w.flush().map_err(|source| Error::Write {
            path: self.path,
            source,
        })
    }
}

fn write_header(
    out: &mut OutputFile,
    cfg: &Config,
    result: &InfomapResult,
    summary: &RunSummary,
) -> Result<()> {
    let rel = if result.one_level_codelength.abs() < 1e-16 {
        0.0
    } else {
        (1.0 - result.codelength / result.one_level_codelength) * 100.0
    };

    out.line(format_args!("# v{}", VERSION))?;
    out.line(format_args!("# walkmap {}", cfg.raw_args))?;
    out.line(format_args!("# started at {}", format_started_at(summary.start_time)))?;
    out.line(format_args!("# completed in {} s", summary.elapsed.as_secs_f64()))?;
    out.line(format_args!(
        "# partitioned into 2 levels with {} top modules",
        result.num_modules
    ))?;
    out.line(format_args!("# codelength {} bits", fmt_sig(result.codelength, 6)))?;
    out.line(format_args!("# relative codelength savings {}%", fmt_sig(rel, 6)))?;
    out.line(format_args!(
        "# {} walks of {} steps, {} restarts",
        summary.walks, summary.steps, result.restarts
    ))
}

pub fn write_clu(
    path: &Path,
    cfg: &Config,
    graph: &Graph<String>,
    result: &InfomapResult,
    node_flow: &[f64],
    summary: &RunSummary,
) -> Result<()> {
    let ordered = build_ordered_modules(result, node_flow);
    let mut out = OutputFile::create(path)?;
    write_header(&mut out, cfg, result, summary)?;
    out.line("# node_id module flow")?;

    for (module_zero, nodes) in ordered.module_nodes.iter().enumerate() {
        for &node_idx in nodes {
            out.line(format_args!(
                "{} {} {}",
                graph.node_id(node_idx),
                module_zero + 1,
                fmt_sig(node_flow[node_idx], 6)
            ))?;
        }
    }

    out.finish()
}

pub fn write_tree(
    path: &Path,
    cfg: &Config,
    graph: &Graph<String>,
    result: &InfomapResult,
    node_flow: &[f64],
    summary: &RunSummary,
) -> Result<()> {
    let ordered = build_ordered_modules(result, node_flow);
    let mut out = OutputFile::create(path)?;
    write_header(&mut out, cfg, result, summary)?;
    out.line("# path flow name node_index")?;

    for (module_zero, nodes) in ordered.module_nodes.iter().enumerate() {
        for (pos, &node_idx) in nodes.iter().enumerate() {
            out.line(format_args!(
                "{}:{} {} \"{}\" {}",
                module_zero + 1,
                pos + 1,
                fmt_sig(node_flow[node_idx], 6),
                graph.node_id(node_idx),
                node_idx + 1
            ))?;
        }
    }

    out.finish()
}

pub fn write_outputs(
    cfg: &Config,
    graph: &Graph<String>,
    table: &VisitProbabilities,
    result: &InfomapResult,
    summary: &RunSummary,
) -> Result<Vec<PathBuf>> {
    if !cfg.any_output_enabled() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(&cfg.out_dir).map_err(|source| Error::Write {
        path: cfg.out_dir.clone(),
        source,
    })?;

    let node_flow = table.node_flow();
    let base = output_base_path(cfg);
    let mut written = Vec::new();

    if cfg.print_clu {
        let p = base.with_extension("clu");
        write_clu(&p, cfg, graph, result, &node_flow, summary)?;
        written.push(p);
    }
    if cfg.print_tree {
        let p = base.with_extension("tree");
        write_tree(&p, cfg, graph, result, &node_flow, summary)?;
        written.push(p);
    }

    Ok(written)
}

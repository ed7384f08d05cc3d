use crate::config::{Config, InfomapConfig};
use crate::error::{Error, Result};
use std::path::PathBuf;

const USAGE: &str = "Usage: walkmap network_file out_directory [options]";

fn parse_u64(s: &str) -> Option<u64> {
    s.parse::<u64>().ok()
}

fn parse_usize(s: &str) -> Option<usize> {
    s.parse::<usize>().ok()
}

fn parse_output_list(list: &str, clu: &mut bool, tree: &mut bool) {
    for token in list.split(',') {
        match token.trim() {
            "clu" => *clu = true,
            "tree" => *tree = true,
            _ => {}
        }
    }
}

/// Options taking a value, accepted as `--flag value` or `--flag=value`.
#[derive(Debug, Clone, Copy)]
enum ValueFlag {
    Seed,
    Walks,
    Steps,
    Restarts,
    Threads,
    OutName,
    Output,
}

fn value_flag(name: &str) -> Option<ValueFlag> {
    match name {
        "--seed" => Some(ValueFlag::Seed),
        "--walks" => Some(ValueFlag::Walks),
        "--steps" => Some(ValueFlag::Steps),
        "--restarts" | "--num-trials" => Some(ValueFlag::Restarts),
        "--threads" => Some(ValueFlag::Threads),
        "--out-name" => Some(ValueFlag::OutName),
        "--output" | "-o" => Some(ValueFlag::Output),
        _ => None,
    }
}

pub fn parse_args(args: &[String]) -> Result<Config> {
    let raw_args = args.join(" ");

    let mut network_file: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut out_name: Option<String> = None;

    let mut infomap = InfomapConfig::default();
    let mut silent = false;
    let mut verbose = false;
    let mut print_clu = false;
    let mut print_tree = false;

    let mut i = 0usize;
    while i < args.len() {
        let tok = args[i].as_str();
        i += 1;

        let (name, inline_value) = match tok.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (tok, None),
        };

        if let Some(flag) = value_flag(name) {
            let value = match inline_value {
                Some(v) => v,
                None => match args.get(i) {
                    Some(next) => {
                        i += 1;
                        next.as_str()
                    }
                    None => continue,
                },
            };
            match flag {
                ValueFlag::Seed => {
                    if let Some(v) = parse_u64(value) {
                        infomap.seed = v;
                    }
                }
                ValueFlag::Walks => infomap.walks = parse_usize(value).filter(|&v| v > 0),
                ValueFlag::Steps => infomap.steps = parse_usize(value).filter(|&v| v > 0),
                ValueFlag::Restarts => {
                    infomap.restarts = parse_usize(value).filter(|&v| v > 0)
                }
                ValueFlag::Threads => {
                    infomap.walk_threads = parse_usize(value).filter(|&v| v > 0)
                }
                ValueFlag::OutName => out_name = Some(value.to_string()),
                ValueFlag::Output => parse_output_list(value, &mut print_clu, &mut print_tree),
            }
            continue;
        }

        match tok {
            "--clu" => print_clu = true,
            "--tree" => print_tree = true,
            "--silent" => silent = true,
            "-v" | "--verbose" => verbose = true,
            _ if tok.starts_with('-') => {}
            _ => {
                if network_file.is_none() {
                    network_file = Some(PathBuf::from(tok));
                } else if out_dir.is_none() {
                    out_dir = Some(PathBuf::from(tok));
                }
            }
        }
    }

    let network_file = network_file.ok_or_else(|| Error::Usage(USAGE.to_string()))?;
    let out_dir = out_dir.ok_or_else(|| Error::Usage(USAGE.to_string()))?;

    let out_name = match out_name {
        Some(v) => v,
        None => network_file
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("no-name")
            .to_string(),
    };

    if !print_clu && !print_tree {
        print_clu = true;
    }

    Ok(Config {
        raw_args,
        network_file,
        out_dir,
        out_name,
        infomap,
        silent,
        verbose,
        print_clu,
        print_tree,
    })
}

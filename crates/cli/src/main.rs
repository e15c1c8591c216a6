//! Command-line driver for the proxima k-NN indexes.
//!
//! Loads a CSV dataset, builds one of the three indexes, runs a single
//! query against it and prints the resulting distances with build/search
//! timings. `--check` also runs a brute-force scan and reports how much of
//! the exact answer the index recovered.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use proxima_core::{Dataset, Vector};
use proxima_hnsw::{HnswConfig, HnswIndex};
use proxima_tree::{KdTreeIndex, RpTreeIndex, TreeConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "proxima")]
#[command(about = "Exact and approximate k-NN search over CSV vector datasets")]
struct Args {
    /// Path to the dataset CSV (first line is a header).
    #[arg(long)]
    data: PathBuf,

    /// Index type to build.
    #[arg(long, value_enum, default_value_t = IndexKind::Kd)]
    index: IndexKind,

    /// Dataset row to use as the query vector.
    #[arg(long, default_value = "0")]
    query_row: usize,

    /// Number of nearest neighbors to return.
    #[arg(long, default_value = "10")]
    k: usize,

    /// Beam width for HNSW queries.
    #[arg(long, default_value = "200")]
    ef: usize,

    /// M parameter for HNSW construction.
    #[arg(long, default_value = "16")]
    m: usize,

    /// Leaf bucket capacity for the tree indexes.
    #[arg(long, default_value = "100")]
    leaf_cap: usize,

    /// Random seed (RP-tree directions, HNSW layer draws).
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Compare against a brute-force scan and report the recovered
    /// fraction of the exact answer.
    #[arg(long)]
    check: bool,

    /// Emit the report as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IndexKind {
    /// KD-tree (exact).
    Kd,
    /// Random-projection tree (approximate).
    Rp,
    /// HNSW graph (approximate).
    Hnsw,
}

impl IndexKind {
    fn name(self) -> &'static str {
        match self {
            IndexKind::Kd => "kd",
            IndexKind::Rp => "rp",
            IndexKind::Hnsw => "hnsw",
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    index: &'static str,
    rows: usize,
    dim: usize,
    k: usize,
    build_ms: f64,
    search_us: f64,
    distances: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recall: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("loading dataset from {:?}", args.data);
    let dataset = Dataset::from_csv_path(&args.data)?;
    if dataset.is_empty() {
        bail!("dataset {:?} is empty", args.data);
    }
    let Some(query) = dataset.get(args.query_row).cloned() else {
        bail!(
            "query row {} out of range (dataset has {} rows)",
            args.query_row,
            dataset.len()
        );
    };
    let dim = dataset.dim().unwrap_or(0);

    let build_start = Instant::now();
    let searcher: Box<dyn Fn(&Vector, usize) -> Result<Vec<f64>>> = match args.index {
        IndexKind::Kd => {
            let mut index = KdTreeIndex::new(
                TreeConfig::new()
                    .with_leaf_cap(args.leaf_cap)
                    .with_seed(args.seed),
            );
            index.make_tree(&dataset)?;
            Box::new(move |q, k| Ok(index.search_k_nearest(q, k)?))
        }
        IndexKind::Rp => {
            let mut index = RpTreeIndex::new(
                TreeConfig::new()
                    .with_leaf_cap(args.leaf_cap)
                    .with_seed(args.seed),
            );
            index.make_tree(&dataset)?;
            Box::new(move |q, k| Ok(index.search_k_nearest(q, k)?))
        }
        IndexKind::Hnsw => {
            let config = HnswConfig::new(args.m).with_seed(args.seed);
            let index = HnswIndex::build(&dataset, config)?;
            let ef = args.ef;
            Box::new(move |q, k| Ok(index.search_k_nearest(q, k, ef)?))
        }
    };
    let build_ms = build_start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!("{} index built in {:.1} ms", args.index.name(), build_ms);

    let search_start = Instant::now();
    let distances = searcher(&query, args.k)?;
    let search_us = search_start.elapsed().as_secs_f64() * 1e6;
    tracing::info!(
        "{}-NN search finished in {:.1} us",
        args.k,
        search_us
    );

    let recall = if args.check {
        let truth = brute_force(&dataset, &query, args.k);
        Some(matched_fraction(&distances, &truth))
    } else {
        None
    };

    let report = Report {
        index: args.index.name(),
        rows: dataset.len(),
        dim,
        k: args.k,
        build_ms,
        search_us,
        distances,
        recall,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("index:     {}", report.index);
        println!("dataset:   {} rows, dim {}", report.rows, report.dim);
        println!("build:     {:.1} ms", report.build_ms);
        println!("search:    {:.1} us", report.search_us);
        let rendered: Vec<String> = report
            .distances
            .iter()
            .map(|d| format!("{:.4}", d))
            .collect();
        println!("{}-NN distances: [{}]", report.k, rendered.join(", "));
        if let Some(recall) = report.recall {
            println!("recall vs brute force: {:.3}", recall);
        }
    }

    Ok(())
}

/// Exact k-NN distances by linear scan, ascending.
fn brute_force(dataset: &Dataset, query: &Vector, k: usize) -> Vec<f64> {
    let mut dists: Vec<f64> = dataset
        .vectors()
        .par_iter()
        .map(|p| query.dist(p))
        .collect();
    dists.sort_by(|a, b| a.total_cmp(b));
    dists.truncate(k);
    dists
}

/// Fraction of `truth` present in `got`; both lists ascending.
fn matched_fraction(got: &[f64], truth: &[f64]) -> f64 {
    if truth.is_empty() {
        return 1.0;
    }
    let mut i = 0;
    let mut j = 0;
    let mut hits = 0usize;
    while i < got.len() && j < truth.len() {
        if (got[i] - truth[j]).abs() < 1e-9 {
            hits += 1;
            i += 1;
            j += 1;
        } else if got[i] < truth[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    hits as f64 / truth.len() as f64
}

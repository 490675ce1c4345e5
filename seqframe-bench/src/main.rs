//! Benchmark runner for deferred and baked seqframe pipelines

use std::fs;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use seqframe_bench::{compare_depths, BenchConfig};

fn load_config() -> Result<BenchConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(BenchConfig::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    println!("=== Seqframe Pipeline Benchmarks ===");
    println!(
        "rows: {}, rereads: {}, iterations: {}",
        config.rows, config.rereads, config.iterations
    );

    for result in compare_depths(&config)? {
        println!("\nBenchmark: {}", result.name);
        println!("  Total time:   {:?}", result.total_time);
        println!("  Average time: {:?}", result.avg_time);
        println!("  Min time:     {:?}", result.min_time);
        println!("  Max time:     {:?}", result.max_time);
        println!("  Throughput:   {:.2} rows/sec", result.throughput);
    }
    Ok(())
}

//! Benchmarks for deferred and baked seqframe pipelines

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use seqframe_core::Series;

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of timed iterations
    pub iterations: usize,

    /// Warmup iterations
    pub warmup_iterations: usize,

    /// Number of rows in the source series
    pub rows: usize,

    /// Number of passes pulled per iteration
    pub rereads: usize,

    /// Pipeline depths to measure (number of stacked transformations)
    pub depths: Vec<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            warmup_iterations: 3,
            rows: 100_000,
            rereads: 4,
            depths: vec![1, 4, 16],
        }
    }
}

/// Benchmark result
#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    /// Name of the benchmark
    pub name: String,

    /// Total time taken
    pub total_time: Duration,

    /// Average time per iteration
    pub avg_time: Duration,

    /// Min time per iteration
    pub min_time: Duration,

    /// Max time per iteration
    pub max_time: Duration,

    /// Throughput (rows/second)
    pub throughput: f64,
}

/// Run `func` under `config`, counting `rows_per_iteration` toward throughput
pub fn run_benchmark<F>(
    name: &str,
    config: &BenchConfig,
    rows_per_iteration: usize,
    func: F,
) -> Result<BenchResult>
where
    F: Fn() -> Result<()>,
{
    ensure!(config.iterations > 0, "iterations must be positive");

    for _ in 0..config.warmup_iterations {
        func()?;
    }

    let mut times = Vec::with_capacity(config.iterations);
    let start_total = Instant::now();
    for _ in 0..config.iterations {
        let start = Instant::now();
        func()?;
        times.push(start.elapsed());
    }
    let total_time = start_total.elapsed();

    let avg_time = times.iter().sum::<Duration>() / u32::try_from(times.len())?;
    let min_time = times.iter().min().copied().unwrap_or_default();
    let max_time = times.iter().max().copied().unwrap_or_default();

    #[allow(clippy::cast_precision_loss)]
    let throughput = (config.iterations * rows_per_iteration) as f64
        / total_time.as_secs_f64().max(f64::EPSILON);

    debug!(name, ?avg_time, throughput, "benchmark finished");
    Ok(BenchResult {
        name: name.to_string(),
        total_time,
        avg_time,
        min_time,
        max_time,
        throughput,
    })
}

/// A series with `depth` stacked transformations over `rows` values
pub fn build_pipeline(rows: usize, depth: usize) -> Result<Series<usize, u64>> {
    let values: Vec<u64> = (0..rows as u64).collect();
    let mut series = Series::new(values);
    for level in 0..depth {
        series = if level % 4 == 3 {
            series.skip(1)?
        } else {
            let step = level as u64 + 1;
            series.select(move |x| x.wrapping_mul(31).wrapping_add(step))
        };
    }
    Ok(series)
}

fn reread(series: &Series<usize, u64>, rereads: usize) -> Result<()> {
    let mut checksum = 0u64;
    for _ in 0..rereads {
        checksum = series.iter().fold(checksum, u64::wrapping_add);
    }
    std::hint::black_box(checksum);
    Ok(())
}

/// Re-read a deferred pipeline: every pass reruns every stacked stage
pub fn bench_deferred(config: &BenchConfig, depth: usize) -> Result<BenchResult> {
    let series = build_pipeline(config.rows, depth)?;
    run_benchmark(
        &format!("deferred depth {depth}"),
        config,
        config.rows * config.rereads,
        || reread(&series, config.rereads),
    )
}

/// Bake the same pipeline once, then re-read the stored values
pub fn bench_baked(config: &BenchConfig, depth: usize) -> Result<BenchResult> {
    let series = build_pipeline(config.rows, depth)?.bake();
    run_benchmark(
        &format!("baked depth {depth}"),
        config,
        config.rows * config.rereads,
        || reread(&series, config.rereads),
    )
}

/// Deferred and baked results for every configured depth
pub fn compare_depths(config: &BenchConfig) -> Result<Vec<BenchResult>> {
    let mut results = Vec::with_capacity(config.depths.len() * 2);
    for &depth in &config.depths {
        info!(depth, rows = config.rows, "measuring pipeline");
        results.push(bench_deferred(config, depth)?);
        results.push(bench_baked(config, depth)?);
    }
    Ok(results)
}

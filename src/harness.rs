//! Benchmark harness: times every strategy per size and records the table.
//!
//! Configuration is passed in explicitly through [`BenchConfig`]; the
//! harness keeps no global state.

use crate::error::HarnessError;
use crate::matrix::{Elem, LoopOrder, Matrix};
use crate::threaded::{multiply_blocked_parallel, multiply_parallel};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to benchmark and where to write the results.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Square matrix sizes, run in order.
    pub sizes: Vec<usize>,
    /// Inputs are drawn from `[0, max_value)`.
    pub max_value: Elem,
    /// Seed for the input generator; `None` draws fresh entropy.
    pub seed: Option<u64>,
    /// Worker count for both parallel strategies (0 = auto).
    pub workers: usize,
    /// Tile edge for the blocked-parallel strategy (0 = default).
    pub block_size: usize,
    /// Results file, one `{N, ...}` line per size.
    pub output: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![10, 50, 100, 200, 300, 500, 2000],
            max_value: 1000,
            seed: None,
            workers: 16,
            block_size: 64,
            output: PathBuf::from("matrix_results.txt"),
        }
    }
}

impl BenchConfig {
    pub fn with_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// Wall-clock seconds for each strategy at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub n: usize,
    pub jki: f64,
    pub ijk: f64,
    pub ikj: f64,
    pub parallel: f64,
    pub blocked_parallel: f64,
}

/// `{N, t_bad, t_friendly, t_most_friendly, t_parallel, t_blocked_parallel}`
impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}}}",
            self.n, self.jki, self.ijk, self.ikj, self.parallel, self.blocked_parallel
        )
    }
}

/// Run every size in `config`, writing each line as soon as it is measured.
pub fn run(config: &BenchConfig) -> Result<Vec<Timing>, HarnessError> {
    run_with_progress(config, |_, _| {})
}

/// Same as [`run`], calling `on_size(index, n)` before each size starts.
pub fn run_with_progress<F>(
    config: &BenchConfig,
    mut on_size: F,
) -> Result<Vec<Timing>, HarnessError>
where
    F: FnMut(usize, usize),
{
    if config.sizes.is_empty() {
        return Err(HarnessError::NoSizes);
    }
    if config.sizes.contains(&0) {
        return Err(HarnessError::ZeroSize);
    }

    let file = File::create(&config.output).map_err(|e| io_error(&config.output, e))?;
    let mut out = BufWriter::new(file);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut timings = Vec::with_capacity(config.sizes.len());
    for (idx, &n) in config.sizes.iter().enumerate() {
        info!("running size {} ({}/{})", n, idx + 1, config.sizes.len());
        on_size(idx, n);
        let a = Matrix::random_with(n, n, config.max_value, &mut rng);
        let b = Matrix::random_with(n, n, config.max_value, &mut rng);

        let timing = Timing {
            n,
            jki: time_into(n, |c| LoopOrder::Jki.run(&a, &b, c)),
            ijk: time_into(n, |c| LoopOrder::Ijk.run(&a, &b, c)),
            ikj: time_into(n, |c| LoopOrder::Ikj.run(&a, &b, c)),
            parallel: time_into(n, |c| {
                multiply_parallel(&a, &b, c, config.workers);
            }),
            blocked_parallel: time_into(n, |c| {
                multiply_blocked_parallel(&a, &b, c, config.workers, config.block_size);
            }),
        };

        writeln!(out, "{}", timing).map_err(|e| io_error(&config.output, e))?;
        timings.push(timing);
    }

    out.flush().map_err(|e| io_error(&config.output, e))?;
    Ok(timings)
}

/// Allocate a fresh zeroed `n × n` output and time `f` on it.
fn time_into<F>(n: usize, f: F) -> f64
where
    F: FnOnce(&mut Matrix),
{
    let mut c = Matrix::zeros(n, n);
    let start = Instant::now();
    f(&mut c);
    start.elapsed().as_secs_f64()
}

fn io_error(path: &Path, source: std::io::Error) -> HarnessError {
    HarnessError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_line_format() {
        let t = Timing {
            n: 10,
            jki: 0.5,
            ijk: 0.25,
            ikj: 0.125,
            parallel: 0.0625,
            blocked_parallel: 1.0,
        };
        assert_eq!(
            t.to_string(),
            "{10, 0.500000, 0.250000, 0.125000, 0.062500, 1.000000}"
        );
    }

    #[test]
    fn test_empty_sizes_rejected() {
        let config = BenchConfig::default().with_sizes(Vec::<usize>::new());
        assert!(matches!(run(&config), Err(HarnessError::NoSizes)));
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = BenchConfig::default().with_sizes([4, 0]);
        assert!(matches!(run(&config), Err(HarnessError::ZeroSize)));
    }

    #[test]
    fn test_run_writes_one_line_per_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let config = BenchConfig::default()
            .with_sizes([3, 8, 17])
            .with_seed(1)
            .with_workers(3)
            .with_block_size(4)
            .with_output(&path);

        let timings = run(&config).unwrap();
        assert_eq!(timings.iter().map(|t| t.n).collect::<Vec<_>>(), vec![3, 8, 17]);

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, t) in lines.iter().zip(&timings) {
            assert_eq!(*line, t.to_string());
            assert!(line.starts_with('{') && line.ends_with('}'));
            assert_eq!(line.split(", ").count(), 6);
        }
    }

    #[test]
    fn test_progress_reported_per_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig::default()
            .with_sizes([2, 5, 3])
            .with_seed(9)
            .with_workers(2)
            .with_output(dir.path().join("results.txt"));

        let mut seen = Vec::new();
        run_with_progress(&config, |idx, n| seen.push((idx, n))).unwrap();
        assert_eq!(seen, vec![(0, 2), (1, 5), (2, 3)]);
    }

    #[test]
    fn test_unwritable_output_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.txt");
        let config = BenchConfig::default().with_sizes([2]).with_output(&path);

        match run(&config) {
            Err(HarnessError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}

//! Benchmark runner for the multiplication strategies.

use cachemul::harness::{self, BenchConfig};
use cachemul::{Matrix, multiply};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("=== Matrix Multiplication Benchmark ===\n");

    println!("Run simple multiplication of matrices..");
    run_example(5);

    let config = BenchConfig::default();
    println!(
        "Run different multiplication strategies for sizes {:?} ({} workers, block {})..\n",
        config.sizes, config.workers, config.block_size
    );

    let timings = match harness::run_with_progress(&config, |idx, n| {
        println!("[DEBUG] running iteration {} (N = {})..", idx, n);
    }) {
        Ok(timings) => timings,
        Err(e) => {
            eprintln!("benchmark failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_summary_table(&timings);
    println!("Results are stored in {}", config.output.display());
    ExitCode::SUCCESS
}

fn run_example(n: usize) {
    let a = Matrix::random(n, n, 1000);
    let b = Matrix::random(n, n, 1000);
    let c = multiply(&a, &b);

    println!("[Matrix first]\n{}", a);
    println!("[Matrix second]\n{}", b);
    println!("[Matrix result]\n{}", c);
}

fn print_summary_table(timings: &[harness::Timing]) {
    println!("{}", "=".repeat(90));
    println!("SUMMARY (seconds)");
    println!("{}", "=".repeat(90));

    println!(
        "{:>6} {:>12} {:>12} {:>12} {:>12} {:>14} {:>10}",
        "N", "j-k-i", "i-j-k", "i-k-j", "parallel", "blocked-par", "Speedup"
    );
    println!("{}", "-".repeat(90));

    for t in timings {
        let best = t.parallel.min(t.blocked_parallel);
        let speedup = if best > 0.0 { t.jki / best } else { 0.0 };
        println!(
            "{:>6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>14.6} {:>9.1}×",
            t.n, t.jki, t.ijk, t.ikj, t.parallel, t.blocked_parallel, speedup
        );
    }

    println!("{}", "=".repeat(90));
    println!("\nSpeedup is j-k-i relative to the faster parallel strategy.\n");
}

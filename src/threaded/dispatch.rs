//! Row-parallel and blocked-parallel multiplication.
//!
//! Every call partitions the work statically, hands each worker a disjoint
//! `&mut` slice of C's rows and joins them all before returning. Workers
//! are fresh scoped threads; nothing persists between calls.

use super::partition::{partition, resolve_workers};
use crate::blocked::tiled::{block_count, block_row_span, effective_block, matmul_blocked_rows};
use crate::matrix::{Elem, LoopOrder, Matrix, assert_product_dims};
use log::{debug, warn};
use std::io;
use std::ops::Range;
use std::panic;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

#[derive(Debug, Clone, Copy)]
enum Kernel {
    Rows(LoopOrder),
    Blocked { block: usize },
}

/// One worker's share of a parallel call.
///
/// `range` is in the kernel's own units (rows, or block-rows) and `out` is
/// exactly the rows of C that range covers.
struct ThreadTask<'t> {
    a: &'t Matrix,
    b: &'t Matrix,
    out: &'t mut [Elem],
    range: Range<usize>,
    kernel: Kernel,
}

impl ThreadTask<'_> {
    fn run(self) {
        match self.kernel {
            Kernel::Rows(order) => order.run_rows(self.a, self.b, self.out, self.range),
            Kernel::Blocked { block } => {
                matmul_blocked_rows(self.a, self.b, self.out, self.range, block)
            }
        }
    }
}

/// Take-once holder: whoever empties it runs the task.
type Slot<'t> = Mutex<Option<ThreadTask<'t>>>;

fn run_slot(slot: &Slot<'_>) {
    let task = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(task) = task {
        task.run();
    }
}

/// Parallel matrix multiplication, C += A * B, with a chosen loop order.
///
/// C's rows are split into near-equal contiguous ranges, one per worker,
/// and each worker runs the `order` kernel over its own rows only. The
/// result is identical for every worker count.
///
/// # Arguments
///
/// * `workers` - Thread count; 0 means one per logical CPU. With 1 worker
///   the kernel runs in the calling thread.
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn multiply_rows_parallel<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    order: LoopOrder,
    workers: usize,
) -> &'c mut Matrix {
    assert_product_dims(a, b, c);
    let workers = resolve_workers(workers);

    if workers == 1 {
        debug!("{} multiply on the calling thread", order.name());
        order.run(a, b, c);
        return c;
    }

    // Past one row per worker the extra ranges would all be empty.
    let ranges = partition(a.rows(), workers.min(a.rows()));
    debug!(
        "{} multiply: {} rows over {} workers {:?}",
        order.name(),
        a.rows(),
        workers,
        ranges
    );

    let cols = c.cols();
    let tasks = build_tasks(
        a,
        b,
        c.as_mut_slice(),
        cols,
        ranges,
        |r| r.clone(),
        Kernel::Rows(order),
    );
    execute(tasks);
    c
}

/// [`multiply_rows_parallel`] with the default i-k-j order.
pub fn multiply_parallel<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    workers: usize,
) -> &'c mut Matrix {
    multiply_rows_parallel(a, b, c, LoopOrder::default(), workers)
}

/// Row-parallel j-k-i.
pub fn matmul_jki_mt<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    workers: usize,
) -> &'c mut Matrix {
    multiply_rows_parallel(a, b, c, LoopOrder::Jki, workers)
}

/// Row-parallel i-j-k.
pub fn matmul_ijk_mt<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    workers: usize,
) -> &'c mut Matrix {
    multiply_rows_parallel(a, b, c, LoopOrder::Ijk, workers)
}

/// Row-parallel i-k-j.
pub fn matmul_ikj_mt<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    workers: usize,
) -> &'c mut Matrix {
    multiply_rows_parallel(a, b, c, LoopOrder::Ikj, workers)
}

/// Multi-threaded cache-blocked multiplication, C += A * B.
///
/// Partitions block-rows (not raw rows) among workers; each worker runs
/// the tiled kernel for its block-rows across all of N and K.
///
/// # Arguments
///
/// * `workers` - Thread count; 0 means one per logical CPU
/// * `block_size` - Tile edge; 0 means [`DEFAULT_BLOCK_SIZE`](crate::blocked::DEFAULT_BLOCK_SIZE)
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn multiply_blocked_parallel<'c>(
    a: &Matrix,
    b: &Matrix,
    c: &'c mut Matrix,
    workers: usize,
    block_size: usize,
) -> &'c mut Matrix {
    assert_product_dims(a, b, c);
    let block = effective_block(block_size);
    let workers = resolve_workers(workers);
    let m = a.rows();
    let block_rows = block_count(m, block);

    if workers == 1 {
        debug!("blocked multiply (block {}) on the calling thread", block);
        matmul_blocked_rows(a, b, c.as_mut_slice(), 0..block_rows, block);
        return c;
    }

    let ranges = partition(block_rows, workers.min(block_rows));
    debug!(
        "blocked multiply (block {}): {} block-rows over {} workers {:?}",
        block, block_rows, workers, ranges
    );

    let cols = c.cols();
    let tasks = build_tasks(
        a,
        b,
        c.as_mut_slice(),
        cols,
        ranges,
        |r| block_row_span(r, block, m),
        Kernel::Blocked { block },
    );
    execute(tasks);
    c
}

/// Carve `out` into the row spans of each range and bind them to tasks.
///
/// Ranges must be in order and their spans contiguous from row 0, which
/// [`partition`] guarantees. Empty ranges get no task.
fn build_tasks<'t>(
    a: &'t Matrix,
    b: &'t Matrix,
    out: &'t mut [Elem],
    cols: usize,
    ranges: Vec<Range<usize>>,
    span_of: impl Fn(&Range<usize>) -> Range<usize>,
    kernel: Kernel,
) -> Vec<ThreadTask<'t>> {
    let mut rest = out;
    let mut tasks = Vec::with_capacity(ranges.len());

    for range in ranges {
        let span = span_of(&range);
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(span.len() * cols);
        rest = tail;
        if range.is_empty() {
            continue;
        }
        tasks.push(ThreadTask {
            a,
            b,
            out: head,
            range,
            kernel,
        });
    }

    debug_assert!(rest.is_empty(), "partition left rows of C unassigned");
    tasks
}

/// Run every task exactly once and wait for all of them.
///
/// Each task gets its own scoped thread. If a thread can't be spawned the
/// caller runs that task itself. A panicking worker is re-raised here.
fn execute(tasks: Vec<ThreadTask<'_>>) {
    let slots: Vec<Slot<'_>> = tasks.into_iter().map(|t| Mutex::new(Some(t))).collect();

    thread::scope(|s| {
        let handles: Vec<ScopedJoinHandle<'_, ()>> = slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| match spawn_worker(s, id, slot) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!("failed to spawn worker {}: {}; running it inline", id, e);
                    run_slot(slot);
                    None
                }
            })
            .collect();

        for handle in handles {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
    });
}

fn spawn_worker<'scope, 't: 'scope>(
    scope: &'scope Scope<'scope, '_>,
    id: usize,
    slot: &'scope Slot<'t>,
) -> io::Result<ScopedJoinHandle<'scope, ()>> {
    #[cfg(test)]
    spawn_hooks::before_spawn()?;

    thread::Builder::new()
        .name(format!("cachemul-worker-{}", id))
        .spawn_scoped(scope, move || run_slot(slot))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ikj::multiply_ikj;

    fn sample(m: usize, k: usize, n: usize) -> (Matrix, Matrix) {
        let a = Matrix::from_vec(m, k, (0..m * k).map(|i| (i % 17) as Elem - 8).collect());
        let b = Matrix::from_vec(k, n, (0..k * n).map(|i| (i % 13) as Elem).collect());
        (a, b)
    }

    #[test]
    fn test_single_worker_does_not_spawn() {
        let (a, b) = sample(9, 5, 7);
        spawn_hooks::take_attempts();

        let mut c = Matrix::zeros(9, 7);
        multiply_parallel(&a, &b, &mut c, 1);
        let mut d = Matrix::zeros(9, 7);
        multiply_blocked_parallel(&a, &b, &mut d, 1, 4);

        assert_eq!(spawn_hooks::take_attempts(), 0);
        assert_eq!(c, multiply_ikj(&a, &b));
        assert_eq!(d, c);
    }

    #[test]
    fn test_only_non_empty_ranges_spawn() {
        let (a, b) = sample(3, 4, 4);
        spawn_hooks::take_attempts();

        let mut c = Matrix::zeros(3, 4);
        multiply_parallel(&a, &b, &mut c, 8);
        assert_eq!(spawn_hooks::take_attempts(), 3);

        // 10 rows with block 4 is 3 block-rows.
        let (a, b) = sample(10, 4, 4);
        let mut c = Matrix::zeros(10, 4);
        multiply_blocked_parallel(&a, &b, &mut c, 5, 4);
        assert_eq!(spawn_hooks::take_attempts(), 3);
        assert_eq!(c, multiply_ikj(&a, &b));
    }

    #[test]
    fn test_huge_worker_count_spawns_one_per_row() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]);
        let expected = Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]);
        spawn_hooks::take_attempts();

        let mut c = Matrix::zeros(2, 2);
        multiply_parallel(&a, &b, &mut c, 1 << 40);
        assert_eq!(c, expected);
        assert_eq!(spawn_hooks::take_attempts(), 2);

        let mut c = Matrix::zeros(2, 2);
        multiply_blocked_parallel(&a, &b, &mut c, usize::MAX, 1);
        assert_eq!(c, expected);
        assert_eq!(spawn_hooks::take_attempts(), 2);
    }

    #[test]
    fn test_spawn_failure_runs_inline() {
        let (a, b) = sample(23, 11, 19);
        let expected = multiply_ikj(&a, &b);

        for order in LoopOrder::ALL {
            spawn_hooks::fail_next(2);
            let mut c = Matrix::zeros(23, 19);
            multiply_rows_parallel(&a, &b, &mut c, order, 4);
            assert_eq!(c, expected, "{}", order.name());
        }

        spawn_hooks::fail_next(2);
        let mut c = Matrix::zeros(23, 19);
        multiply_blocked_parallel(&a, &b, &mut c, 4, 3);
        assert_eq!(c, expected);
    }

    #[test]
    fn test_every_spawn_failing_still_computes() {
        let (a, b) = sample(16, 8, 8);
        spawn_hooks::fail_next(usize::MAX);

        let mut c = Matrix::zeros(16, 8);
        multiply_parallel(&a, &b, &mut c, 6);
        let mut d = Matrix::zeros(16, 8);
        multiply_blocked_parallel(&a, &b, &mut d, 6, 2);
        spawn_hooks::fail_next(0);

        let expected = multiply_ikj(&a, &b);
        assert_eq!(c, expected);
        assert_eq!(d, expected);
    }

    #[test]
    fn test_returns_output_for_chaining() {
        let (a, b) = sample(4, 4, 4);
        let mut c = Matrix::zeros(4, 4);
        let out = multiply_parallel(&a, &b, &mut c, 2);
        out.scale(2);

        let mut expected = multiply_ikj(&a, &b);
        expected.scale(2);
        assert_eq!(c, expected);
    }

    #[test]
    #[should_panic(expected = "inner dimensions differ")]
    fn test_mismatched_inner_dimensions_panic() {
        let a = Matrix::zeros(3, 4);
        let b = Matrix::zeros(5, 2);
        let mut c = Matrix::zeros(3, 2);
        multiply_parallel(&a, &b, &mut c, 2);
    }
}

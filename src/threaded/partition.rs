//! Static work partitioning.

use std::ops::Range;

/// Turn a requested worker count into an actual one.
///
/// `0` means one worker per logical CPU (at least 1).
pub fn resolve_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Split `[0, total)` into `workers` contiguous ranges.
///
/// Ranges come back in order, never overlap and cover every index once.
/// Sizes differ by at most one: the first `total % workers` ranges get the
/// extra unit. When `workers > total` the trailing ranges are empty.
///
/// ```
/// use cachemul::threaded::partition::partition;
///
/// assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
/// assert_eq!(partition(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
/// ```
///
/// # Panics
///
/// Panics if `workers` is 0. Resolve it with [`resolve_workers`] first.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "partition needs at least one worker");
    let base = total / workers;
    let rem = total % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut cur = 0;
    for t in 0..workers {
        let len = base + usize::from(t < rem);
        ranges.push(cur..cur + len);
        cur += len;
    }
    ranges
}

//! Dense matrix storage and the single-threaded loop-order kernels.
//!
//! The three kernels compute the same `C += A * B` and differ only in how
//! the `i`, `j`, `k` loops nest. On row-major storage that order decides
//! which operands are walked with stride 1 and which jump a whole row per
//! step, which is the entire point of comparing them.

pub mod dense;
pub mod naive_ijk;
pub mod naive_ikj;
pub mod naive_jki;

pub use dense::{Elem, Matrix};

use std::ops::Range;

/// Loop nesting used by a single-threaded or row-parallel multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopOrder {
    /// j-k-i: innermost loop strides down columns of A and C.
    Jki,
    /// i-j-k: row of A reused, B walked column-wise.
    Ijk,
    /// i-k-j: rows of B and C scanned contiguously.
    #[default]
    Ikj,
}

impl LoopOrder {
    pub const ALL: [LoopOrder; 3] = [LoopOrder::Jki, LoopOrder::Ijk, LoopOrder::Ikj];

    pub fn name(self) -> &'static str {
        match self {
            LoopOrder::Jki => "j-k-i",
            LoopOrder::Ijk => "i-j-k",
            LoopOrder::Ikj => "i-k-j",
        }
    }

    /// Run this order over rows `rows` of C, writing into `out`, which holds
    /// exactly those rows.
    pub fn run_rows(self, a: &Matrix, b: &Matrix, out: &mut [Elem], rows: Range<usize>) {
        match self {
            LoopOrder::Jki => naive_jki::matmul_jki_rows(a, b, out, rows),
            LoopOrder::Ijk => naive_ijk::matmul_ijk_rows(a, b, out, rows),
            LoopOrder::Ikj => naive_ikj::matmul_ikj_rows(a, b, out, rows),
        }
    }

    /// Full `C += A * B` with this order.
    pub fn run(self, a: &Matrix, b: &Matrix, c: &mut Matrix) {
        match self {
            LoopOrder::Jki => naive_jki::matmul_jki(a, b, c),
            LoopOrder::Ijk => naive_ijk::matmul_ijk(a, b, c),
            LoopOrder::Ikj => naive_ikj::matmul_ikj(a, b, c),
        }
    }
}

/// Panics unless `A (m×k) * B (k×n)` can land in `C (m×n)`.
pub(crate) fn assert_product_dims(a: &Matrix, b: &Matrix, c: &Matrix) {
    assert_inner_dims(a, b);
    assert!(
        c.rows() == a.rows() && c.cols() == b.cols(),
        "C: expected {}x{}, got {}x{}",
        a.rows(),
        b.cols(),
        c.rows(),
        c.cols()
    );
}

pub(crate) fn assert_inner_dims(a: &Matrix, b: &Matrix) {
    assert_eq!(
        a.cols(),
        b.rows(),
        "A is {}x{} but B is {}x{}: inner dimensions differ",
        a.rows(),
        a.cols(),
        b.rows(),
        b.cols()
    );
}

/// Panics unless `out` holds exactly rows `rows` of an `a.rows() × b.cols()` result.
pub(crate) fn assert_row_slice(a: &Matrix, b: &Matrix, out: &[Elem], rows: &Range<usize>) {
    assert_inner_dims(a, b);
    assert!(
        rows.start <= rows.end && rows.end <= a.rows(),
        "row range {:?} out of bounds for {} rows",
        rows,
        a.rows()
    );
    assert_eq!(
        out.len(),
        rows.len() * b.cols(),
        "output slice: expected {} rows of {} columns",
        rows.len(),
        b.cols()
    );
}

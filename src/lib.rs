//! Integer matrix multiplication, several ways.
//!
//! Same product, different memory behaviour: three loop orders, a
//! cache-blocked tiling, and row- or block-row-parallel versions of both.
//! The point is to compare them, so every variant produces bit-identical
//! results for the same inputs.
//!
//! ## Usage
//!
//! ```
//! use cachemul::{Matrix, multiply};
//!
//! let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
//! let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]);
//!
//! assert_eq!(multiply(&a, &b), Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]));
//! ```
//!
//! For large matrices, split the rows across threads. The output must be
//! allocated (and zeroed) by the caller:
//!
//! ```
//! use cachemul::{Matrix, multiply_blocked_parallel, multiply_parallel};
//!
//! let a = Matrix::random(256, 256, 100);
//! let b = Matrix::random(256, 256, 100);
//!
//! let mut c = Matrix::zeros(256, 256);
//! multiply_parallel(&a, &b, &mut c, 4);
//!
//! let mut d = Matrix::zeros(256, 256);
//! multiply_blocked_parallel(&a, &b, &mut d, 4, 32);
//! assert_eq!(c, d);
//! ```
//!
//! ## What's inside
//!
//! - j-k-i, i-j-k and i-k-j kernels
//! - Tiled i-k-j kernel with a configurable block edge
//! - Static row / block-row partitioning over scoped threads, with inline
//!   fallback when a thread can't be spawned
//! - A benchmark harness that writes the timing table

pub mod blocked;
pub mod error;
pub mod harness;
pub mod matrix;
pub mod threaded;

pub use blocked::{DEFAULT_BLOCK_SIZE, matmul_blocked};
pub use error::{HarnessError, MatrixError};
pub use matrix::naive_ijk::{matmul_ijk, multiply_ijk};
pub use matrix::naive_ikj::{matmul_ikj, multiply_ikj};
pub use matrix::naive_jki::{matmul_jki, multiply_jki};
pub use matrix::{Elem, LoopOrder, Matrix};
pub use threaded::{
    matmul_ijk_mt, matmul_ikj_mt, matmul_jki_mt, multiply_blocked_parallel, multiply_parallel,
    multiply_rows_parallel,
};

/// Matrix multiply into a freshly allocated result: A * B.
///
/// Uses the i-k-j kernel on the calling thread. A is m×k, B is k×n and the
/// result is m×n.
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    multiply_ikj(a, b)
}

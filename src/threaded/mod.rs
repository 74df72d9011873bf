//! Multi-threaded GEMM.
//!
//! `partition` splits an iteration space into contiguous near-equal ranges;
//! `dispatch` runs one scoped thread per non-empty range over disjoint rows
//! of the output, falling back to the calling thread when a spawn fails or
//! only one worker was asked for.
//!
//! Available entry points:
//! - `multiply_rows_parallel`: row split, any loop order
//! - `multiply_parallel`: row split, i-k-j
//! - `multiply_blocked_parallel`: block-row split, tiled kernel

pub mod dispatch;
pub mod partition;

pub use dispatch::{
    matmul_ijk_mt, matmul_ikj_mt, matmul_jki_mt, multiply_blocked_parallel, multiply_parallel,
    multiply_rows_parallel,
};
pub use partition::{partition, resolve_workers};

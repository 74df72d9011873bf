//! Cache-blocked multiplication.
//!
//! The iteration space is cut into `block × block × block` tiles so the
//! data touched between evictions stays around `3 * block²` elements.
//! Tiles on the far edge of each dimension are clamped to the matrix.

pub mod tiled;

pub use tiled::{DEFAULT_BLOCK_SIZE, block_count, matmul_blocked, matmul_blocked_rows};

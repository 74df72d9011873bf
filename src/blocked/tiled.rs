//! Tiled i-k-j GEMM over ranges of block-rows.

use crate::matrix::{Elem, Matrix, assert_product_dims, assert_row_slice};
use std::ops::Range;

/// Tile edge used when the caller passes 0.
pub const DEFAULT_BLOCK_SIZE: usize = 32;

/// Number of tiles of edge `block` needed to cover `extent`.
pub fn block_count(extent: usize, block: usize) -> usize {
    extent.div_ceil(block)
}

/// Replace a zero block size with [`DEFAULT_BLOCK_SIZE`].
pub(crate) fn effective_block(block_size: usize) -> usize {
    if block_size == 0 {
        DEFAULT_BLOCK_SIZE
    } else {
        block_size
    }
}

/// Rows of C covered by block-rows `block_rows` of an `m`-row result.
pub(crate) fn block_row_span(block_rows: &Range<usize>, block: usize, m: usize) -> Range<usize> {
    let start = (block_rows.start * block).min(m);
    let end = (block_rows.end * block).min(m);
    start..end
}

/// Single-threaded cache-blocked multiplication, C += A * B.
///
/// `block_size` of 0 means [`DEFAULT_BLOCK_SIZE`]. Any positive size is
/// valid, including ones larger than the matrix (one tile then covers it).
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn matmul_blocked(a: &Matrix, b: &Matrix, c: &mut Matrix, block_size: usize) {
    assert_product_dims(a, b, c);
    let block = effective_block(block_size);
    let block_rows = 0..block_count(a.rows(), block);
    matmul_blocked_rows(a, b, c.as_mut_slice(), block_rows, block);
}

/// Blocked kernel restricted to block-rows `block_rows`.
///
/// `out` holds exactly the C rows those block-rows cover (the last one may
/// be short). Tiles are visited block-row, block-col, block-k; inside a
/// tile the loops run i, k, j.
///
/// # Arguments
///
/// * `block_rows` - Half-open range of block-row indices
/// * `block` - Tile edge length, must be non-zero
pub fn matmul_blocked_rows(
    a: &Matrix,
    b: &Matrix,
    out: &mut [Elem],
    block_rows: Range<usize>,
    block: usize,
) {
    assert!(block > 0, "block size must be non-zero");
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let span = block_row_span(&block_rows, block, m);
    assert_row_slice(a, b, out, &span);

    let row_base = span.start;
    let col_blocks = block_count(n, block);
    let k_blocks = block_count(k, block);

    for bi in block_rows {
        let ii = bi * block;
        let i_max = (ii + block).min(m);

        for bj in 0..col_blocks {
            let jj = bj * block;
            let j_max = (jj + block).min(n);

            for bk in 0..k_blocks {
                let kk = bk * block;
                let k_max = (kk + block).min(k);

                for i in ii..i_max {
                    let a_row = a.row(i);
                    let c_row = &mut out[(i - row_base) * n..(i - row_base + 1) * n];
                    for p in kk..k_max {
                        let aik = a_row[p];
                        let b_row = b.row(p);
                        for j in jj..j_max {
                            c_row[j] += aik * b_row[j];
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ikj::multiply_ikj;

    #[test]
    fn test_block_count() {
        assert_eq!(block_count(64, 32), 2);
        assert_eq!(block_count(65, 32), 3);
        assert_eq!(block_count(5, 10000), 1);
        assert_eq!(block_count(7, 1), 7);
    }

    #[test]
    fn test_block_row_span_clamps() {
        assert_eq!(block_row_span(&(0..2), 4, 10), 0..8);
        assert_eq!(block_row_span(&(2..3), 4, 10), 8..10);
        assert_eq!(block_row_span(&(3..3), 4, 10), 10..10);
    }

    #[test]
    fn test_blocked_matches_ikj_on_ragged_tiles() {
        let a = Matrix::from_vec(13, 9, (0..13 * 9).map(|i| (i % 7) as Elem - 3).collect());
        let b = Matrix::from_vec(9, 11, (0..9 * 11).map(|i| (i % 5) as Elem).collect());
        let expected = multiply_ikj(&a, &b);

        for block in [1, 2, 4, 5, 8, 32] {
            let mut c = Matrix::zeros(13, 11);
            matmul_blocked(&a, &b, &mut c, block);
            assert_eq!(c, expected, "block {}", block);
        }
    }

    #[test]
    fn test_zero_block_size_uses_default() {
        let a = Matrix::from_vec(40, 40, (0..1600).map(|i| (i % 11) as Elem).collect());
        let b = Matrix::identity(40);
        let mut c = Matrix::zeros(40, 40);
        matmul_blocked(&a, &b, &mut c, 0);
        assert_eq!(c, a);
    }

    #[test]
    fn test_partial_block_rows_only_touch_their_rows() {
        let a = Matrix::from_vec(10, 3, (0..30).collect());
        let b = Matrix::from_vec(3, 2, vec![1, 0, 0, 1, 1, 1]);
        let expected = multiply_ikj(&a, &b);

        // Block-rows 1..3 with block 4 cover C rows 4..10.
        let mut out = vec![0; 6 * 2];
        matmul_blocked_rows(&a, &b, &mut out, 1..3, 4);
        assert_eq!(&out[..], &expected.as_slice()[4 * 2..]);
    }
}

use super::{Elem, Matrix, assert_product_dims, assert_row_slice};
use std::ops::Range;

/// Matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop. The row of A is reused across the
/// inner loop, but B is read with stride `n` (column-wise), costing a cache
/// miss on most iterations for large matrices.
///
/// Accumulates into C (C += A * B).
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn matmul_ijk(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    assert_product_dims(a, b, c);
    let rows = 0..a.rows();
    matmul_ijk_rows(a, b, c.as_mut_slice(), rows);
}

/// i-j-k restricted to rows `rows` of C, written into `out`.
pub fn matmul_ijk_rows(a: &Matrix, b: &Matrix, out: &mut [Elem], rows: Range<usize>) {
    assert_row_slice(a, b, out, &rows);
    let n = b.cols();
    let bv = b.as_slice();

    for (a_row, c_row) in rows.map(|i| a.row(i)).zip(out.chunks_mut(n)) {
        for (j, cij) in c_row.iter_mut().enumerate() {
            let mut sum = 0;
            for (p, &aip) in a_row.iter().enumerate() {
                sum += aip * bv[p * n + j];
            }
            *cij += sum;
        }
    }
}

/// Allocating form of [`matmul_ijk`].
pub fn multiply_ijk(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    matmul_ijk(a, b, &mut c);
    c
}

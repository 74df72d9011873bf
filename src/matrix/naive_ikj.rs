use super::{Elem, Matrix, assert_product_dims, assert_row_slice};
use std::ops::Range;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// By swapping the j and k loops, the innermost loop accesses both B and C
/// sequentially (stride 1), and `A[i][k]` is loaded once per middle-loop
/// step. This is the default order everywhere else in the crate.
///
/// Accumulates into C (C += A * B).
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn matmul_ikj(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    assert_product_dims(a, b, c);
    let rows = 0..a.rows();
    matmul_ikj_rows(a, b, c.as_mut_slice(), rows);
}

/// i-k-j restricted to rows `rows` of C, written into `out`.
pub fn matmul_ikj_rows(a: &Matrix, b: &Matrix, out: &mut [Elem], rows: Range<usize>) {
    assert_row_slice(a, b, out, &rows);
    let n = b.cols();

    for (a_row, c_row) in rows.map(|i| a.row(i)).zip(out.chunks_mut(n)) {
        for (p, &aik) in a_row.iter().enumerate() {
            for (cij, &bpj) in c_row.iter_mut().zip(b.row(p)) {
                *cij += aik * bpj;
            }
        }
    }
}

/// Allocating form of [`matmul_ikj`].
pub fn multiply_ikj(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    matmul_ikj(a, b, &mut c);
    c
}

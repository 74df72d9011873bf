use super::{Elem, Matrix, assert_product_dims, assert_row_slice};
use std::ops::Range;

/// Matrix multiplication using j-k-i loop order.
///
/// The worst order for row-major storage: the innermost loop walks down a
/// column of both A and C, so every step lands on a different row. Kept as
/// the slow end of the comparison.
///
/// Accumulates into C (C += A * B). Zero C first for a fresh product.
///
/// # Panics
///
/// Panics if `a.cols() != b.rows()` or C is not `a.rows() × b.cols()`.
pub fn matmul_jki(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    assert_product_dims(a, b, c);
    let rows = 0..a.rows();
    matmul_jki_rows(a, b, c.as_mut_slice(), rows);
}

/// j-k-i restricted to rows `rows` of C.
///
/// `out` holds only those rows, so `out[0]` is `C[rows.start][0]`.
pub fn matmul_jki_rows(a: &Matrix, b: &Matrix, out: &mut [Elem], rows: Range<usize>) {
    assert_row_slice(a, b, out, &rows);
    let n = b.cols();
    let k = a.cols();
    let (av, bv) = (a.as_slice(), b.as_slice());

    for j in 0..n {
        for p in 0..k {
            let bpj = bv[p * n + j];
            for (local, i) in rows.clone().enumerate() {
                out[local * n + j] += av[i * k + p] * bpj;
            }
        }
    }
}

/// Allocating form of [`matmul_jki`].
pub fn multiply_jki(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    matmul_jki(a, b, &mut c);
    c
}

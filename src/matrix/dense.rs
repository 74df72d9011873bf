//! Dense row-major integer matrix.

use crate::error::{MatrixError, Result};
use rand::Rng;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Element type for every matrix in this crate.
pub type Elem = i64;

/// A `rows × cols` grid of integers stored in one contiguous row-major buffer.
///
/// Row `i` lives at `data[i * cols..(i + 1) * cols]`. Both dimensions are at
/// least 1 and never change after construction.
///
/// Constructors panic on zero dimensions or mismatched storage. Those checks
/// use `assert!`, so they stay on in release builds too. Use
/// [`Matrix::try_from_vec`] or [`Matrix::try_from_rows`] when the input comes
/// from somewhere you don't control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Elem>,
}

impl Matrix {
    /// Zero-filled `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert_dims(rows, cols);
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Matrix filled with values drawn uniformly from `[0, max)`.
    pub fn random(rows: usize, cols: usize, max: Elem) -> Self {
        Self::random_with(rows, cols, max, &mut rand::thread_rng())
    }

    /// Same as [`Matrix::random`] but draws from the given generator.
    pub fn random_with<R: Rng>(rows: usize, cols: usize, max: Elem, rng: &mut R) -> Self {
        assert_dims(rows, cols);
        assert!(max >= 1, "random fill bound must be at least 1, got {}", max);
        let data = (0..rows * cols).map(|_| rng.gen_range(0..max)).collect();
        Self { rows, cols, data }
    }

    /// Wrap an existing row-major buffer of exactly `rows * cols` elements.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or the buffer length is wrong.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<Elem>) -> Self {
        assert_dims(rows, cols);
        assert_eq!(
            data.len(),
            rows * cols,
            "storage: expected {}x{}={} elements",
            rows,
            cols,
            rows * cols
        );
        Self { rows, cols, data }
    }

    /// Fallible form of [`Matrix::from_vec`].
    pub fn try_from_vec(rows: usize, cols: usize, data: Vec<Elem>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::ZeroDimension { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(MatrixError::StorageLength {
                rows,
                cols,
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Wrap per-row storage, flattening it into one buffer.
    ///
    /// # Panics
    ///
    /// Panics if there are no rows, rows are empty, or rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Elem>>) -> Self {
        match Self::try_from_rows(rows) {
            Ok(m) => m,
            Err(e) => panic!("invalid matrix rows: {}", e),
        }
    }

    /// Fallible form of [`Matrix::from_rows`].
    pub fn try_from_rows(rows: Vec<Vec<Elem>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_rows == 0 || n_cols == 0 {
            return Err(MatrixError::ZeroDimension {
                rows: n_rows,
                cols: n_cols,
            });
        }

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: n_cols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> Elem {
        self[(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: Elem) {
        self[(i, j)] = value;
    }

    /// Row `i` as a contiguous slice.
    pub fn row(&self, i: usize) -> &[Elem] {
        assert!(i < self.rows, "row {} out of bounds for {} rows", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[Elem] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Elem] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<Elem> {
        self.data
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: Elem) {
        self.data.fill(value);
    }

    /// Multiply every element by `factor` in place.
    pub fn scale(&mut self, factor: Elem) {
        for x in &mut self.data {
            *x *= factor;
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Elem;

    fn index(&self, (i, j): (usize, usize)) -> &Elem {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{}",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Elem {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{}",
            i,
            j,
            self.rows,
            self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

/// One line per row, values separated by tabs.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols) {
            for x in row {
                write!(f, "{}\t", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn assert_dims(rows: usize, cols: usize) {
    assert!(
        rows >= 1 && cols >= 1,
        "matrix dimensions must be non-zero, got {}x{}",
        rows,
        cols
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zeros_and_identity() {
        let z = Matrix::zeros(2, 3);
        assert_eq!((z.rows(), z.cols()), (2, 3));
        assert!(z.as_slice().iter().all(|&x| x == 0));

        let id = Matrix::identity(3);
        assert_eq!(id.as_slice(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_random_within_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random_with(10, 12, 5, &mut rng);
        assert!(m.as_slice().iter().all(|&x| (0..5).contains(&x)));

        let again = Matrix::random_with(10, 12, 5, &mut StdRng::seed_from_u64(7));
        assert_eq!(m, again);
    }

    #[test]
    fn test_from_vec_keeps_both_dimensions() {
        let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m[(0, 2)], 3);
    }

    #[test]
    fn test_try_from_vec_errors() {
        assert!(matches!(
            Matrix::try_from_vec(0, 3, vec![]),
            Err(MatrixError::ZeroDimension { rows: 0, cols: 3 })
        ));
        assert!(matches!(
            Matrix::try_from_vec(2, 2, vec![1, 2, 3]),
            Err(MatrixError::StorageLength {
                expected: 4,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 0), 4);

        let ragged = Matrix::try_from_rows(vec![vec![1, 2], vec![3]]);
        assert!(matches!(
            ragged,
            Err(MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_fill_and_scale() {
        let mut m = Matrix::zeros(3, 3);
        m.fill(0);
        m.scale(42);
        assert!(m.as_slice().iter().all(|&x| x == 0));

        m.fill(3);
        m.scale(-2);
        assert!(m.as_slice().iter().all(|&x| x == -6));
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(m.to_string(), "1\t2\t\n3\t4\t\n");
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_rows_panics() {
        Matrix::zeros(0, 4);
    }

    #[test]
    #[should_panic(expected = "storage")]
    fn test_from_vec_wrong_length_panics() {
        Matrix::from_vec(3, 2, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_identity_panics() {
        Matrix::identity(0);
    }

    #[test]
    #[should_panic(expected = "random fill bound")]
    fn test_random_zero_bound_panics() {
        Matrix::random(2, 2, 0);
    }

    #[test]
    #[should_panic(expected = "invalid matrix rows")]
    fn test_from_no_rows_panics() {
        Matrix::from_rows(vec![]);
    }
}

//! Conversion and shape helpers for nalgebra matrices.

use nalgebra::DMatrix;
use crate::{Error, Result};

/// Build a matrix from row-major nested rows.
///
/// An empty slice gives a `0 x 0` matrix. Rows of differing length are
/// rejected.
pub fn dmatrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(Error::InvalidConfig(format!(
            "ragged matrix: row {} has {} columns, expected {}",
            i,
            row.len(),
            n_cols
        )));
    }

    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(n_rows, n_cols, &data))
}

/// Convert a matrix to row-major nested rows.
pub fn dmatrix_to_rows(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Check that a square matrix equals its transpose within `tol`.
pub fn is_symmetric(matrix: &DMatrix<f64>, tol: f64) -> bool {
    if !matrix.is_square() {
        return false;
    }
    let n = matrix.nrows();
    (0..n).all(|i| (i + 1..n).all(|j| (matrix[(i, j)] - matrix[(j, i)]).abs() <= tol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dmatrix_from_rows() {
        let m = dmatrix_from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
    }

    #[test]
    fn test_dmatrix_from_rows_empty() {
        let m = dmatrix_from_rows(&[]).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn test_dmatrix_from_rows_ragged() {
        let result = dmatrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_dmatrix_to_rows_is_row_major() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(dmatrix_to_rows(&m), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_is_symmetric() {
        let sym = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 2.0]);
        assert!(is_symmetric(&sym, 0.0));

        let skew = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.6, 2.0]);
        assert!(!is_symmetric(&skew, 1e-3));
        assert!(is_symmetric(&skew, 0.2));

        let rect = DMatrix::<f64>::zeros(2, 3);
        assert!(!is_symmetric(&rect, 1.0));
    }
}

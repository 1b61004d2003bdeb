//! Discrete Legendre Polynomial block generation
//!
//! Generates the orthonormal basis block for a single coarse group. The raw
//! polynomial values come from the standard three-term recurrence evaluated
//! at the fine-group positions, and the columns are then orthonormalised
//! with a modified Gram-Schmidt pass.

use crate::error::{Error, Result};

use nalgebra::DMatrix;

/// Orthonormal DLP basis block for a coarse group of `size` fine groups
///
/// Returns a `size` x `size` matrix whose columns are the first `size`
/// members of the discrete Legendre polynomial family evaluated at positions
/// `j = 0..size`, ordered from the order-0 flat component up to order
/// `size - 1`. Columns are orthonormal to working precision.
///
/// The raw polynomial values follow the three-term recurrence
///
/// ```text
/// A[j,0] = 1
/// A[j,1] = (n-1-2j)/(n-1)
/// A[j,i] = [(2i-1)(n-1-2j)A[j,i-1] - (i-1)(n-1+i)A[j,i-2]] / [i(n-i)]
/// ```
///
/// A single-group block is the 1x1 identity, so a lone fine group carries
/// only its flat component.
///
/// ```rust
/// # use dgm_basis::dlp_block;
/// let block = dlp_block(3).unwrap();
///
/// // order-0 column is the normalised flat vector
/// let flat = 1.0 / 3.0_f64.sqrt();
/// assert!((block[(0, 0)] - flat).abs() < 1e-12);
/// assert!((block[(1, 0)] - flat).abs() < 1e-12);
/// assert!((block[(2, 0)] - flat).abs() < 1e-12);
/// ```
///
/// An empty block is a caller contract violation and fails with
/// [Error::EmptyBlock].
pub fn dlp_block(size: usize) -> Result<DMatrix<f64>> {
    if size == 0 {
        return Err(Error::EmptyBlock);
    }

    let mut a = DMatrix::from_element(size, size, 1.0);

    if size > 1 {
        let n = (size - 1) as f64;

        for j in 0..size {
            a[(j, 1)] = (n - 2.0 * j as f64) / n;
        }

        for i in 2..size {
            let c0 = ((i - 1) * (size - 1 + i)) as f64;
            let c2 = (i * (size - i)) as f64;
            for j in 0..size {
                let c1 = (2 * i - 1) as f64 * (n - 2.0 * j as f64);
                a[(j, i)] = (c1 * a[(j, i - 1)] - c0 * a[(j, i - 2)]) / c2;
            }
        }
    }

    modified_gram_schmidt(&mut a)?;
    Ok(a)
}

/// Orthonormalise the columns of a square matrix in place
///
/// This is the *modified* Gram-Schmidt process: each column is normalised
/// and immediately projected out of all remaining columns before moving on.
/// The raw DLP columns grow increasingly ill-conditioned with block size,
/// and the classical variant loses orthogonality catastrophically there.
fn modified_gram_schmidt(a: &mut DMatrix<f64>) -> Result<()> {
    let n = a.ncols();

    for k in 0..n {
        let norm = a.column(k).norm();
        if norm < f64::EPSILON {
            return Err(Error::DegenerateColumn(k));
        }
        a.column_mut(k).unscale_mut(norm);

        let q = a.column(k).clone_owned();
        for j in (k + 1)..n {
            let r = q.dot(&a.column(j));
            a.column_mut(j).axpy(-r, &q, 1.0);
        }
    }

    Ok(())
}

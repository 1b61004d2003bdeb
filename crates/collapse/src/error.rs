//! Result and Error types for dgm-collapse

/// Type alias for Result<T, collapse::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `dgm-collapse` crate
///
/// Configuration variants are fatal and reported at setup time. Inner-solve
/// non-convergence is deliberately *not* represented here; it is a warning
/// carried on the returned solution, since partial convergence at a high
/// moment order has diminishing impact on the reconstructed flux.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("basis construction failed")]
    BasisError(#[from] dgm_basis::Error),

    #[error("relaxation factor {0} is outside (0, 1]")]
    InvalidRelaxationFactor(f64),

    #[error("truncation map length mismatch (expected {expected:?}, found {found:?})")]
    TruncationLengthMismatch { expected: usize, found: usize },

    #[error("fine group vector length mismatch (expected {expected:?}, found {found:?})")]
    FineVectorLengthMismatch { expected: usize, found: usize },

    #[error("not enough Legendre scatter orders (expected {expected:?}, found {found:?})")]
    ScatterOrderMismatch { expected: usize, found: usize },

    #[error("homogenization map length mismatch (expected {expected:?}, found {found:?})")]
    HomogenizationLengthMismatch { expected: usize, found: usize },

    #[error("coarse solution shape mismatch (expected {expected:?} cells, found {found:?})")]
    SolutionShapeMismatch { expected: usize, found: usize },

    #[error("coarse transport solve failed at order {order}: {reason}")]
    SolverFailure { order: usize, reason: String },
}

//! Result and Error types for dgm-basis

/// Type alias for Result<T, basis::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `dgm-basis` crate
///
/// Every variant is a fatal configuration error. A bad group structure or a
/// malformed basis file indicates a misconfigured physics problem, so nothing
/// here is recoverable at runtime.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("no coarse group map registered for {0} fine groups")]
    UnsupportedStructure(usize),

    #[error("coarse group map length mismatch (expected {expected:?}, found {found:?})")]
    MapLengthMismatch { expected: usize, found: usize },

    #[error("basis block must contain at least one fine group")]
    EmptyBlock,

    #[error("basis block column {0} is degenerate and cannot be normalised")]
    DegenerateColumn(usize),

    #[error("failed to parse \"{0}\" as a basis matrix value")]
    ParseError(String),

    #[error("basis file row {row} length mismatch (expected {expected:?}, found {found:?})")]
    UnexpectedRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("basis file row count mismatch (expected {expected:?}, found {found:?})")]
    UnexpectedRowCount { expected: usize, found: usize },
}

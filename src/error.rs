//! Recoverable errors.
//!
//! Malformed algebra (mismatched dimensions, empty matrices) is a
//! precondition failure and panics at the call site. The types here cover
//! the few paths where a caller can do something about the failure.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("storage length mismatch: {rows}x{cols} needs {expected} elements, got {got}")]
    StorageLength {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("ragged rows: row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("benchmark size list is empty")]
    NoSizes,
    #[error("benchmark size must be non-zero")]
    ZeroSize,
    #[error("failed to write results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = MatrixError> = std::result::Result<T, E>;

use std::path::PathBuf;

use thiserror::Error;

/// The csv produced no rows, so there is no header to build records from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("CSV is empty")]
pub struct EmptyInputError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load CSV: {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Empty(#[from] EmptyInputError),
    #[error("loader stopped before reporting a result")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write csv output: {0}")]
    Csv(#[from] csv::Error),
}

//! Errors raised while building a task catalog.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read task file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable task rows in {0}")]
    NoRows(PathBuf),

    #[error("task catalog is empty")]
    Empty,

    #[error("duplicate job id {0:?}")]
    DuplicateId(String),

    #[error("job {id:?} has a non-finite deadline")]
    BadDeadline { id: String },
}

use thiserror::Error;

/// Errors produced while parsing paths and entry names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path {path:?}: must begin with '/'")]
    InvalidPath { path: String },

    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

//! Error types for registry queries and registration.

use statree_types::PathError;
use thiserror::Error;

/// Errors that can occur while resolving a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No entry matched the requested segment.
    #[error("api path not found: {path}")]
    NotFound { path: String },

    /// The candidate does not apply here.
    ///
    /// Consumed by listing mode to skip a field. A registry never returns
    /// it from [`crate::Registry::resolve`].
    #[error("entry declined")]
    Declined,

    /// A field entry was invoked without a context of the type it reads.
    #[error("entry {entry:?} requires a context it was not given")]
    ContextMismatch { entry: String },

    /// A handler reported an internal fault.
    #[error("handler for {entry:?} failed: {reason}")]
    Handler { entry: String, reason: String },

    /// The query path is malformed.
    #[error(transparent)]
    Path(#[from] PathError),
}

impl QueryError {
    /// Returns `true` for [`QueryError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur while extending the tree.
///
/// All of these are startup misconfiguration: callers should treat them
/// as fatal rather than skip the registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A segment of the target path names an entry that is not an object.
    #[error("cannot add at api path {path}")]
    NotObject { path: String },

    /// A segment of the target path does not exist.
    #[error("api path {path} not found")]
    PathNotFound { path: String },

    /// The parent already has a child with this name.
    #[error("api path {path}/{name} already exists")]
    AlreadyExists { path: String, name: String },

    /// The path or the new entry's name is malformed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Growing the parent's children failed.
    #[error("allocation failed while adding {name}: {reason}")]
    Alloc { name: String, reason: String },

    /// The configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a query.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Result of a registration.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

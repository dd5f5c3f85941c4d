//! Per-query traversal state.

use statree_types::PathCursor;

use crate::error::{QueryError, QueryResult};

/// State carried through one resolution.
///
/// Holds the path cursor that each object level advances as it descends.
/// Everything produced for the query is owned by the returned
/// [`statree_types::Value`], so abandoning a query releases it in one step.
#[derive(Clone, Debug)]
pub struct QueryContext<'p> {
    cursor: PathCursor<'p>,
    strict: bool,
}

impl<'p> QueryContext<'p> {
    /// Start a query for `path`.
    pub fn new(path: &'p str) -> QueryResult<Self> {
        Ok(Self {
            cursor: PathCursor::new(path)?,
            strict: false,
        })
    }

    /// Reject leaves reached while segments remain unconsumed.
    pub fn with_strict_paths(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Consume the next path segment. `None` means "list this level".
    pub fn next_segment(&mut self) -> Option<&'p str> {
        self.cursor.next_segment()
    }

    /// Whether unconsumed segments remain.
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The full path being resolved.
    pub fn path(&self) -> &'p str {
        self.cursor.full()
    }

    /// The unconsumed remainder of the path.
    pub fn remaining(&self) -> &'p str {
        self.cursor.remaining()
    }

    /// A [`QueryError::NotFound`] for this query's path.
    pub fn not_found(&self) -> QueryError {
        QueryError::NotFound {
            path: self.path().to_string(),
        }
    }
}

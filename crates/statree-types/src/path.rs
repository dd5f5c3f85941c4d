//! Path syntax for addressing entries in the tree.
//!
//! A path is an ASCII string beginning with `/`. Segments are the
//! `/`-delimited substrings that follow. A path whose remainder is `/` or
//! empty addresses "this level": the caller lists every child instead of
//! looking one up.
//!
//! - `/` lists the root
//! - `/status` looks up `status` and then lists it
//! - `/status/workers/count` descends three levels
//!
//! There is no escaping and no wildcard segment.

use crate::error::PathError;

/// The path separator.
pub const SEPARATOR: char = '/';

/// A cursor over the unconsumed remainder of a path.
///
/// The remainder always starts at a separator (or is empty), so
/// [`PathCursor::next_segment`] can be called repeatedly as a traversal
/// descends one level at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathCursor<'p> {
    full: &'p str,
    rest: &'p str,
}

impl<'p> PathCursor<'p> {
    /// Create a cursor over `path`.
    ///
    /// The empty path is accepted and behaves like `/`. Any other path
    /// must begin with the separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use statree_types::PathCursor;
    ///
    /// assert!(PathCursor::new("/status").is_ok());
    /// assert!(PathCursor::new("").is_ok());
    /// assert!(PathCursor::new("status").is_err());
    /// ```
    pub fn new(path: &'p str) -> Result<Self, PathError> {
        if !path.is_empty() && !path.starts_with(SEPARATOR) {
            return Err(PathError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(Self {
            full: path,
            rest: path,
        })
    }

    /// Consume the next segment.
    ///
    /// Returns `None` when the remainder is at most one character (`/` or
    /// empty), meaning the current level should be listed. Otherwise the
    /// leading separator is skipped and everything up to the next separator
    /// is returned; the cursor is left positioned on that separator.
    ///
    /// `//` yields an empty segment, which never names an entry.
    pub fn next_segment(&mut self) -> Option<&'p str> {
        if self.rest.len() <= 1 {
            return None;
        }

        let tail = &self.rest[1..];
        let end = tail.find(SEPARATOR).unwrap_or(tail.len());
        let (segment, rest) = tail.split_at(end);
        self.rest = rest;
        Some(segment)
    }

    /// Whether at least one more segment can be consumed.
    pub fn has_remaining(&self) -> bool {
        self.rest.len() > 1
    }

    /// The unconsumed remainder, starting at a separator or empty.
    pub fn remaining(&self) -> &'p str {
        self.rest
    }

    /// The path the cursor was created from.
    pub fn full(&self) -> &'p str {
        self.full
    }

    /// The part of the path consumed so far.
    pub fn consumed(&self) -> &'p str {
        &self.full[..self.full.len() - self.rest.len()]
    }
}

/// Validate the name of an entry that is about to join the tree.
///
/// Names must be non-empty (the empty name was the old end-of-list marker
/// and still never matches a lookup) and must not contain the separator,
/// since a name with `/` could never be addressed by a path.
pub fn validate_entry_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::InvalidName {
            name: name.to_string(),
            reason: "entry name must not be empty".into(),
        });
    }

    if name.contains(SEPARATOR) {
        return Err(PathError::InvalidName {
            name: name.to_string(),
            reason: format!("must not contain {SEPARATOR:?}"),
        });
    }

    Ok(())
}

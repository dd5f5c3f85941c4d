//! Path resolution: one algorithm for every level of the tree.
//!
//! [`object_iterate`] consumes one segment of the query path. With a segment
//! it runs in lookup mode and returns the first candidate whose name matches;
//! without one it runs in listing mode and collects every candidate into an
//! object. Object entries re-enter it with their own children, which is how a
//! multi-segment path descends.

use statree_types::{Object, Value};
use tracing::trace;

use crate::entry::{Entry, Handler};
use crate::error::{QueryError, QueryResult};
use crate::handler::Context;
use crate::iter::{EntryIter, SliceIter};
use crate::query::QueryContext;

/// Resolve one level of `query` against the candidates produced by `iter`.
///
/// - Lookup mode: returns the matching candidate's result unchanged, or
///   [`QueryError::NotFound`] once the candidates are exhausted.
/// - Listing mode: returns an object with one field per candidate, skipping
///   candidates that return [`QueryError::Declined`]. Any other error aborts
///   the listing. An object with no fields is a valid result.
pub fn object_iterate<'a, I>(iter: &mut I, query: &mut QueryContext<'_>) -> QueryResult<Value>
where
    I: EntryIter<'a> + ?Sized,
{
    if let Some(name) = query.next_segment() {
        while let Some(candidate) = iter.next_entry(query)? {
            if candidate.entry.name() == name {
                return candidate.entry.handle(query, candidate.ctx);
            }
        }

        trace!(path = query.path(), segment = name, "no entry matched");
        return Err(query.not_found());
    }

    let mut obj = Object::new();

    while let Some(candidate) = iter.next_entry(query)? {
        match candidate.entry.handle(query, candidate.ctx) {
            Ok(value) => obj.insert(candidate.entry.name(), value),
            Err(QueryError::Declined) => {
                trace!(entry = candidate.entry.name(), "entry declined");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Value::Object(obj))
}

/// The object handler: resolve `query` against a static children sequence.
pub fn object_handler<'a>(
    children: &'a [Entry],
    query: &mut QueryContext<'_>,
    ctx: Context<'a>,
) -> QueryResult<Value> {
    object_iterate(&mut SliceIter::new(children, ctx), query)
}

/// The string handler: produce `value`.
///
/// With strict paths, a leaf reached while segments remain is not found.
pub fn string_handler(value: &str, query: &QueryContext<'_>) -> QueryResult<Value> {
    if query.is_strict() && query.has_remaining() {
        trace!(path = query.path(), rest = query.remaining(), "path continues past a leaf");
        return Err(query.not_found());
    }
    Ok(Value::string(value))
}

impl Entry {
    /// Produce this entry's value for the rest of `query`.
    pub fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value> {
        match self.handler() {
            Handler::Object(children) => object_handler(children, query, ctx),
            Handler::String(value) => string_handler(value, query),
            Handler::Field(field) => {
                let value = ctx
                    .and_then(|ctx| field.read(ctx))
                    .ok_or_else(|| QueryError::ContextMismatch {
                        entry: self.name().to_string(),
                    })?;
                string_handler(value, query)
            }
            Handler::Custom(handler) => handler.handle(query, ctx),
        }
    }
}

//! The iteration protocol: where a traversal gets its candidate entries.
//!
//! Static objects iterate their own children with [`SliceIter`]. Custom
//! handlers can synthesize candidates on the fly (one per live connection,
//! say) with [`from_fn`], without the registry tree itself growing.

use std::borrow::Cow;

use crate::entry::Entry;
use crate::error::QueryResult;
use crate::handler::Context;
use crate::query::QueryContext;

/// One candidate produced by an [`EntryIter`].
///
/// Static children are borrowed from the tree; synthesized ones are owned
/// by the candidate. `ctx` is the context the candidate's handler receives.
#[derive(Clone, Debug)]
pub struct Candidate<'a> {
    pub entry: Cow<'a, Entry>,
    pub ctx: Context<'a>,
}

impl<'a> Candidate<'a> {
    pub fn borrowed(entry: &'a Entry, ctx: Context<'a>) -> Self {
        Self {
            entry: Cow::Borrowed(entry),
            ctx,
        }
    }

    pub fn owned(entry: Entry, ctx: Context<'a>) -> Self {
        Self {
            entry: Cow::Owned(entry),
            ctx,
        }
    }
}

/// Produces candidate entries for one dispatch step.
///
/// `Ok(Some(_))` is the next candidate, `Ok(None)` means there are no more,
/// and `Err(_)` aborts the traversal.
pub trait EntryIter<'a> {
    fn next_entry(&mut self, query: &mut QueryContext<'_>) -> QueryResult<Option<Candidate<'a>>>;
}

/// Iterates a static children sequence, handing every child the same context.
#[derive(Clone, Debug)]
pub struct SliceIter<'a> {
    entries: std::slice::Iter<'a, Entry>,
    ctx: Context<'a>,
}

impl<'a> SliceIter<'a> {
    pub fn new(entries: &'a [Entry], ctx: Context<'a>) -> Self {
        Self {
            entries: entries.iter(),
            ctx,
        }
    }
}

impl<'a> EntryIter<'a> for SliceIter<'a> {
    fn next_entry(&mut self, _query: &mut QueryContext<'_>) -> QueryResult<Option<Candidate<'a>>> {
        Ok(self
            .entries
            .next()
            .map(|entry| Candidate::borrowed(entry, self.ctx)))
    }
}

/// An [`EntryIter`] backed by a closure. Build one with [`from_fn`].
pub struct FnIter<F>(F);

/// Drive a traversal from a generator closure.
pub fn from_fn<'a, F>(f: F) -> FnIter<F>
where
    F: FnMut(&mut QueryContext<'_>) -> QueryResult<Option<Candidate<'a>>>,
{
    FnIter(f)
}

impl<'a, F> EntryIter<'a> for FnIter<F>
where
    F: FnMut(&mut QueryContext<'_>) -> QueryResult<Option<Candidate<'a>>>,
{
    fn next_entry(&mut self, query: &mut QueryContext<'_>) -> QueryResult<Option<Candidate<'a>>> {
        (self.0)(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use std::any::Any;

    fn names<'a>(iter: &mut impl EntryIter<'a>) -> QueryResult<Vec<String>> {
        let mut query = QueryContext::new("/").unwrap();
        let mut out = Vec::new();
        while let Some(candidate) = iter.next_entry(&mut query)? {
            out.push(candidate.entry.name().to_string());
        }
        Ok(out)
    }

    #[test]
    fn slice_iter_walks_in_order() {
        let children = vec![Entry::string("a", "1"), Entry::string("b", "2")];
        let mut iter = SliceIter::new(&children, None);
        assert_eq!(names(&mut iter).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn slice_iter_empty() {
        let mut iter = SliceIter::new(&[], None);
        assert!(names(&mut iter).unwrap().is_empty());
    }

    #[test]
    fn fn_iter_synthesizes_entries() {
        let mut n = 0;
        let mut iter = from_fn(|_query| {
            n += 1;
            Ok((n <= 3).then(|| Candidate::owned(Entry::string(format!("conn{n}"), "up"), None)))
        });
        assert_eq!(names(&mut iter).unwrap(), vec!["conn1", "conn2", "conn3"]);
    }

    #[test]
    fn fn_iter_propagates_failure() {
        let mut iter = from_fn(|_query| {
            Err(QueryError::Handler {
                entry: "conns".into(),
                reason: "snapshot unavailable".into(),
            })
        });
        assert!(names(&mut iter).is_err());
    }

    #[test]
    fn candidate_carries_context() {
        let children = vec![Entry::string("a", "1")];
        let record = 42u32;
        let mut iter = SliceIter::new(&children, Some(&record as &dyn Any));
        let mut query = QueryContext::new("/").unwrap();
        let candidate = iter.next_entry(&mut query).unwrap().unwrap();
        let ctx = candidate.ctx.unwrap();
        assert_eq!(ctx.downcast_ref::<u32>(), Some(&42));
    }
}

//! Extension points for entry behaviour.
//!
//! - [`FieldRead`] reads one string out of the caller's per-query context
//!   record. A single definition can be resolved against many records of
//!   the same type by varying only the context passed to the query.
//! - [`EntryHandler`] is the fully custom behaviour, including synthesized
//!   children (see [`crate::iter::from_fn`]).

use std::any::{type_name, Any};
use std::fmt;

use statree_types::Value;

use crate::error::QueryResult;
use crate::query::QueryContext;

/// The opaque caller context threaded through every handler invocation.
pub type Context<'a> = Option<&'a dyn Any>;

// ---------------------------------------------------------------------------
// FieldRead
// ---------------------------------------------------------------------------

/// Reads a string field from a context record.
pub trait FieldRead: Send + Sync {
    /// Return the field, or `None` if `ctx` is not the expected record type.
    fn read<'c>(&self, ctx: &'c dyn Any) -> Option<&'c str>;
}

impl<F: FieldRead + ?Sized> FieldRead for &F {
    fn read<'c>(&self, ctx: &'c dyn Any) -> Option<&'c str> {
        (**self).read(ctx)
    }
}

/// A [`FieldRead`] over records of type `T`.
///
/// ```
/// use statree_registry::{FieldRead, TypedField};
///
/// struct Worker { pid: String }
///
/// static PID: TypedField<Worker> = TypedField::new(|w| w.pid.as_str());
///
/// let w = Worker { pid: "4107".into() };
/// assert_eq!(PID.read(&w), Some("4107"));
/// assert_eq!(PID.read(&7u32), None);
/// ```
pub struct TypedField<T> {
    get: fn(&T) -> &str,
}

impl<T> TypedField<T> {
    pub const fn new(get: fn(&T) -> &str) -> Self {
        Self { get }
    }
}

impl<T> Clone for TypedField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedField<T> {}

impl<T: Any> FieldRead for TypedField<T> {
    fn read<'c>(&self, ctx: &'c dyn Any) -> Option<&'c str> {
        ctx.downcast_ref::<T>().map(self.get)
    }
}

impl<T> fmt::Debug for TypedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedField<{}>", type_name::<T>())
    }
}

// ---------------------------------------------------------------------------
// EntryHandler
// ---------------------------------------------------------------------------

/// Caller-defined entry behaviour.
///
/// A handler may return [`crate::QueryError::Declined`] to be left out of
/// a listing. Handlers that enumerate children of their own should hand an
/// [`crate::EntryIter`] to [`crate::object_iterate`] so lookups and listings
/// behave exactly as they do for static objects.
pub trait EntryHandler: Send + Sync {
    fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value>;
}

impl<H: EntryHandler + ?Sized> EntryHandler for &H {
    fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value> {
        (**self).handle(query, ctx)
    }
}

/// An [`EntryHandler`] backed by a closure. Build one with [`handler_fn`].
pub struct FnHandler<F>(F);

/// Wrap a closure as an [`EntryHandler`].
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut QueryContext<'_>, Context<'_>) -> QueryResult<Value> + Send + Sync,
{
    FnHandler(f)
}

impl<F> EntryHandler for FnHandler<F>
where
    F: Fn(&mut QueryContext<'_>, Context<'_>) -> QueryResult<Value> + Send + Sync,
{
    fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value> {
        (self.0)(query, ctx)
    }
}

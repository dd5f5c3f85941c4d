//! Path-addressed entry registry.
//!
//! A registry is a tree of named entries that exposes internal state as a
//! [`statree_types::Value`] tree. Subsystems register entries into it during
//! startup; afterwards a path such as `/status/workers/count` is resolved
//! against it, either to a single value (lookup) or, when the path ends at an
//! object, to a dump of everything below it (listing).
//!
//! # Architecture
//!
//! - **Templates** are `'static` compiled-in definitions. A registry never
//!   mutates or frees one; it deep-copies it into its own tree.
//! - **Entries** are the owned nodes of that tree: objects with children,
//!   fixed strings, fields read out of a per-query context record, or
//!   custom handlers.
//! - **Resolution** walks one path segment per object level, pulling
//!   candidates from an [`EntryIter`]. Custom handlers may supply their own
//!   iterator to synthesize children on the fly.
//! - **Registration** requires `&mut Registry`, so the tree is frozen as soon
//!   as it is shared for queries.
//!
//! # Modules
//!
//! - [`error`] — [`QueryError`] and [`RegistryError`]
//! - [`entry`] — [`Entry`], [`Handler`], [`TemplateEntry`]
//! - [`handler`] — [`FieldRead`], [`TypedField`], [`EntryHandler`]
//! - [`query`] — [`QueryContext`]
//! - [`iter`] — the [`EntryIter`] protocol
//! - [`dispatch`] — [`object_iterate`] and the built-in handlers
//! - [`registry`] — [`Registry`]
//! - [`config`] — [`RegistryConfig`]

pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod handler;
pub mod iter;
pub mod query;
pub mod registry;

pub use config::{EntryNode, EntrySpec, RegistryConfig};
pub use dispatch::{object_handler, object_iterate, string_handler};
pub use entry::{Entry, Handler, TemplateEntry, TemplateHandler};
pub use error::{QueryError, QueryResult, RegistryError, RegistryResult};
pub use handler::{handler_fn, Context, EntryHandler, FieldRead, FnHandler, TypedField};
pub use iter::{from_fn, Candidate, EntryIter, FnIter, SliceIter};
pub use query::QueryContext;
pub use registry::{Registry, ROOT_TEMPLATE};

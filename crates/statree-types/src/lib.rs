//! Foundation types for statree.
//!
//! This crate provides the output value tree produced by queries and the
//! path syntax used to address entries. Every other statree crate depends on
//! `statree-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Output tree node: an [`Object`] or a string
//! - [`Object`] — Ordered name → value mapping
//! - [`PathCursor`] — Segment-at-a-time cursor over a `/`-separated path
//! - [`PathError`] — Invalid paths and entry names

pub mod error;
pub mod path;
pub mod value;

pub use error::PathError;
pub use path::{validate_entry_name, PathCursor, SEPARATOR};
pub use value::{Object, Value};

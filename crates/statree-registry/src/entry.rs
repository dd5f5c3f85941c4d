//! Entries: the named nodes of the registry tree.
//!
//! Two representations exist side by side:
//!
//! - [`TemplateEntry`] is a compiled-in, `'static` definition. Templates are
//!   immutable and may be shared by any number of registries, so they are
//!   never mutated or freed.
//! - [`Entry`] is an owned node. A registry's tree is made of these; it is
//!   obtained by deep-copying a template ([`TemplateEntry::to_entry`]) and is
//!   released as a unit when dropped.

use std::fmt;
use std::sync::Arc;

use statree_types::{validate_entry_name, PathError};

use crate::handler::{EntryHandler, FieldRead};

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// An owned, named node in the registry tree.
///
/// `Clone` is a deep copy of the children; field and custom handlers are
/// immutable code and are shared between copies.
#[derive(Clone, Debug)]
pub struct Entry {
    name: String,
    handler: Handler,
}

/// How an entry produces its value.
#[derive(Clone)]
pub enum Handler {
    /// An object whose fields are the child entries, in order.
    Object(Vec<Entry>),
    /// A fixed string.
    String(String),
    /// A string read out of the per-query context record.
    Field(Arc<dyn FieldRead>),
    /// Caller-defined behaviour.
    Custom(Arc<dyn EntryHandler>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(children) => f.debug_tuple("Object").field(children).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Field(_) => f.write_str("Field(..)"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Entry {
    /// Create an entry with an explicit handler.
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }

    /// An object entry with the given children.
    pub fn object(name: impl Into<String>, children: Vec<Entry>) -> Self {
        Self::new(name, Handler::Object(children))
    }

    /// A leaf that always produces `value`.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Handler::String(value.into()))
    }

    /// A leaf that reads a string field out of the query context.
    pub fn field(name: impl Into<String>, field: impl FieldRead + 'static) -> Self {
        Self::new(name, Handler::Field(Arc::new(field)))
    }

    /// An entry driven by a custom handler.
    pub fn custom(name: impl Into<String>, handler: impl EntryHandler + 'static) -> Self {
        Self::new(name, Handler::Custom(Arc::new(handler)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Returns `true` if this entry is an object.
    pub fn is_object(&self) -> bool {
        matches!(self.handler, Handler::Object(_))
    }

    /// The children, if this entry is an object.
    pub fn children(&self) -> Option<&[Entry]> {
        match &self.handler {
            Handler::Object(children) => Some(children),
            _ => None,
        }
    }

    /// Mutable access to the children, if this entry is an object.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Entry>> {
        match &mut self.handler {
            Handler::Object(children) => Some(children),
            _ => None,
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Entry> {
        self.children()?.iter().find(|e| e.name == name)
    }

    /// Check this entry's name and, recursively, the names of its children.
    ///
    /// Siblings must also be unique, since listing emits one field per child.
    pub fn validate(&self) -> Result<(), PathError> {
        validate_entry_name(&self.name)?;
        self.validate_children()
    }

    /// Like [`Entry::validate`], but skips this entry's own name.
    ///
    /// Used for roots, whose name is never matched against a path.
    pub fn validate_children(&self) -> Result<(), PathError> {
        validate_children(self.children().unwrap_or_default())
    }
}

fn validate_children(children: &[Entry]) -> Result<(), PathError> {
    for (i, child) in children.iter().enumerate() {
        child.validate()?;
        if children[..i].iter().any(|c| c.name == child.name) {
            return Err(PathError::InvalidName {
                name: child.name.clone(),
                reason: "duplicate sibling name".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TemplateEntry
// ---------------------------------------------------------------------------

/// A compiled-in entry definition.
///
/// ```
/// use statree_registry::TemplateEntry;
///
/// static BUILD: [TemplateEntry; 1] = [TemplateEntry::string("profile", "release")];
/// static INFO: TemplateEntry = TemplateEntry::object("build", &BUILD);
///
/// let entry = INFO.to_entry();
/// assert_eq!(entry.children().unwrap().len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct TemplateEntry {
    pub name: &'static str,
    pub handler: TemplateHandler,
}

/// The handler of a [`TemplateEntry`].
#[derive(Clone, Copy)]
pub enum TemplateHandler {
    Object(&'static [TemplateEntry]),
    String(&'static str),
    Field(&'static dyn FieldRead),
    Custom(&'static dyn EntryHandler),
}

impl TemplateEntry {
    pub const fn object(name: &'static str, children: &'static [TemplateEntry]) -> Self {
        Self {
            name,
            handler: TemplateHandler::Object(children),
        }
    }

    pub const fn string(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            handler: TemplateHandler::String(value),
        }
    }

    pub const fn field(name: &'static str, field: &'static dyn FieldRead) -> Self {
        Self {
            name,
            handler: TemplateHandler::Field(field),
        }
    }

    pub const fn custom(name: &'static str, handler: &'static dyn EntryHandler) -> Self {
        Self {
            name,
            handler: TemplateHandler::Custom(handler),
        }
    }

    /// Deep-copy this template into an owned entry.
    ///
    /// Object children are copied recursively, so the result shares no
    /// mutable state with the template.
    pub fn to_entry(&self) -> Entry {
        let handler = match self.handler {
            TemplateHandler::Object(children) => {
                Handler::Object(children.iter().map(TemplateEntry::to_entry).collect())
            }
            TemplateHandler::String(s) => Handler::String(s.to_string()),
            TemplateHandler::Field(field) => Handler::Field(Arc::new(field)),
            TemplateHandler::Custom(handler) => Handler::Custom(Arc::new(handler)),
        };
        Entry::new(self.name, handler)
    }
}

impl From<&TemplateEntry> for Entry {
    fn from(template: &TemplateEntry) -> Self {
        template.to_entry()
    }
}

impl fmt::Debug for TemplateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TemplateEntry");
        s.field("name", &self.name);
        match self.handler {
            TemplateHandler::Object(children) => s.field("children", &children),
            TemplateHandler::String(value) => s.field("value", &value),
            TemplateHandler::Field(_) => s.field("handler", &"field"),
            TemplateHandler::Custom(_) => s.field("handler", &"custom"),
        };
        s.finish()
    }
}

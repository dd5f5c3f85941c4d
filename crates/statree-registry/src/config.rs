use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::{RegistryError, RegistryResult};

/// Configuration for a [`crate::Registry`].
///
/// ```toml
/// strict_paths = false
///
/// [[entries]]
/// path = "/status"
/// entry = { name = "version", value = "1.4.0" }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// When `true`, a path that continues past a string leaf is not found.
    /// When `false`, the extra segments are ignored and the leaf's value is
    /// returned.
    pub strict_paths: bool,
    /// Static entries registered at startup, in order.
    pub entries: Vec<EntrySpec>,
}

impl RegistryConfig {
    /// Parse a TOML configuration.
    pub fn from_toml_str(s: &str) -> RegistryResult<Self> {
        toml::from_str(s).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> RegistryResult<String> {
        toml::to_string(self).map_err(|e| RegistryError::Config(e.to_string()))
    }
}

/// An entry to register at `path`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySpec {
    pub path: String,
    pub entry: EntryNode,
}

/// A statically configured entry: a string leaf if `value` is set,
/// otherwise an object holding `children`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntryNode>,
}

impl EntryNode {
    /// Build the owned entry this node describes.
    pub fn to_entry(&self) -> RegistryResult<Entry> {
        match &self.value {
            Some(_) if !self.children.is_empty() => Err(RegistryError::Config(format!(
                "entry {:?} has both a value and children",
                self.name
            ))),
            Some(value) => Ok(Entry::string(&self.name, value)),
            None => {
                let children = self
                    .children
                    .iter()
                    .map(EntryNode::to_entry)
                    .collect::<RegistryResult<Vec<_>>>()?;
                Ok(Entry::object(&self.name, children))
            }
        }
    }
}

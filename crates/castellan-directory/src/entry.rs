//! Raw directory entries as produced and consumed by the gateway.

use std::collections::HashMap;

/// Attribute name to ordered values.
pub type Attributes = HashMap<String, Vec<String>>;

/// One entry read from the directory: a distinguished name plus its
/// attribute values, nothing else. Typed records are built from entries
/// by the mapper.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attributes: Attributes,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute insertion, mostly for tests.
    pub fn with(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// First value of an attribute, if present.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of an attribute; empty when absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes.get(name).map_or(&[], Vec::as_slice)
    }
}

//! Bidirectional conversion between typed records and directory entries.
//!
//! The mapper walks a record's [`RecordSchema`] table; it never inspects
//! the record type itself. Round-trip guarantee: mapping an entry to a
//! record and the record back to attributes reproduces the original
//! attribute values for every non-transient, non-identity field.

use crate::entry::{Attributes, DirectoryEntry};
use crate::schema::{FieldRole, FieldValue, RecordSchema, ValueKind};

impl<R> RecordSchema<R> {
    /// Render a record as directory attributes.
    ///
    /// Transient and identity fields are skipped, as are fields whose
    /// current value is an empty scalar or empty list: directories
    /// reject attributes with no values.
    pub fn to_attributes(&self, record: &R) -> Attributes {
        let mut attributes = Attributes::new();
        for field in self.fields() {
            if field.transient || field.role == FieldRole::Identity {
                continue;
            }
            let value = (field.get)(record);
            if value.is_empty() {
                continue;
            }
            attributes.insert(field.attribute.to_string(), value.into_list());
        }
        attributes
    }
}

impl<R: Default> RecordSchema<R> {
    /// Build a record from a directory entry.
    ///
    /// Identity fields receive the full DN; DN component fields are
    /// parsed out of the DN; regular fields read the entry's attribute
    /// values. Fields with no source value keep their default.
    pub fn from_entry(&self, entry: &DirectoryEntry) -> R {
        let mut record = R::default();
        for field in self.fields() {
            let value = match field.role {
                FieldRole::Identity => Some(FieldValue::Scalar(entry.dn.clone())),
                FieldRole::DnComponent { position } => {
                    dn_component(&entry.dn, field.attribute, position).map(FieldValue::Scalar)
                }
                FieldRole::Regular => {
                    let values = entry.values(field.attribute);
                    if values.is_empty() {
                        None
                    } else {
                        Some(match field.kind {
                            ValueKind::Scalar => FieldValue::Scalar(values[0].clone()),
                            ValueKind::List => FieldValue::List(values.to_vec()),
                        })
                    }
                }
            };
            if let Some(value) = value {
                (field.set)(&mut record, value);
            }
        }
        record
    }
}

/// Extract a DN component value by attribute prefix.
///
/// Scans the comma-separated components left to right, matching the
/// attribute name case-insensitively. `position` selects among the
/// matches; an out-of-range position falls back to the first match.
fn dn_component(dn: &str, attribute: &str, position: usize) -> Option<String> {
    let matches: Vec<&str> = dn
        .split(',')
        .filter_map(|component| {
            let (name, value) = component.trim().split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case(attribute)
                .then(|| value.trim())
        })
        .collect();
    matches
        .get(position)
        .or_else(|| matches.first())
        .map(|value| (*value).to_string())
}

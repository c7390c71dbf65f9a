//! Static attribute schemas for record types.
//!
//! Each record type declares a table of [`FieldDescriptor`]s: a typed
//! configuration literal binding one struct field to one directory
//! attribute or DN component. The table is validated once when the
//! [`RecordSchema`] is constructed and is immutable afterwards; there is
//! no runtime type introspection and no tag parsing.

use thiserror::Error;

use crate::filter;

/// A field value in transit between a record and the directory.
///
/// Records are flat: every field is either a scalar string or an ordered
/// list of strings. Anything richer belongs above the mapping layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Collapse to a scalar; a list yields its first value.
    pub fn into_scalar(self) -> String {
        match self {
            FieldValue::Scalar(value) => value,
            FieldValue::List(values) => values.into_iter().next().unwrap_or_default(),
        }
    }

    /// Collapse to a list; a scalar yields a one-element list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            FieldValue::Scalar(value) => vec![value],
            FieldValue::List(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(value) => value.is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }
}

/// Declared value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Single string value.
    Scalar,
    /// Ordered list of string values.
    List,
}

/// How a field participates in the directory representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Plain attribute, read and written by attribute name.
    Regular,
    /// Part of the entry's distinguished name. `position` selects among
    /// the DN components sharing this attribute prefix (0-based); out of
    /// range falls back to the first match.
    DnComponent { position: usize },
    /// Receives the entry's full distinguished name on read and is never
    /// written as an attribute.
    Identity,
}

/// Binds one record field to one directory attribute or DN component.
pub struct FieldDescriptor<R> {
    /// Logical field name, used in diagnostics.
    pub name: &'static str,
    /// Directory attribute name.
    pub attribute: &'static str,
    pub kind: ValueKind,
    pub role: FieldRole,
    /// Transient fields are never written back to the directory.
    pub transient: bool,
    pub get: fn(&R) -> FieldValue,
    pub set: fn(&mut R, FieldValue),
}

impl<R> std::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .field("transient", &self.transient)
            .finish()
    }
}

/// Error raised while deriving a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The declared value kind is not usable for the field's role.
    #[error("unsupported field kind for '{field}': {detail}")]
    UnsupportedFieldKind {
        field: &'static str,
        detail: String,
    },

    /// Two descriptors bind the same directory attribute.
    #[error("attribute '{attribute}' is bound more than once")]
    DuplicateAttribute { attribute: &'static str },

    /// The table declares no DN component, so no DN can be synthesized.
    #[error("record type declares no DN component fields")]
    NoDnComponent,
}

/// Validated, ordered field table for one record type.
///
/// Derived once per record type at startup and passed by reference;
/// immutable after derivation.
pub struct RecordSchema<R> {
    object_classes: &'static [&'static str],
    fields: Vec<FieldDescriptor<R>>,
    attribute_names: Vec<String>,
}

impl<R> RecordSchema<R> {
    /// Derive a schema from a descriptor table, validating it.
    pub fn new(
        object_classes: &'static [&'static str],
        fields: Vec<FieldDescriptor<R>>,
    ) -> Result<Self, SchemaError> {
        let mut seen = Vec::with_capacity(fields.len());
        let mut has_dn_component = false;

        for field in &fields {
            match field.role {
                FieldRole::Identity if field.kind != ValueKind::Scalar => {
                    return Err(SchemaError::UnsupportedFieldKind {
                        field: field.name,
                        detail: "identity fields hold a single distinguished name".to_string(),
                    });
                }
                FieldRole::DnComponent { .. } if field.kind != ValueKind::Scalar => {
                    return Err(SchemaError::UnsupportedFieldKind {
                        field: field.name,
                        detail: "DN components are single-valued".to_string(),
                    });
                }
                FieldRole::DnComponent { .. } => has_dn_component = true,
                _ => {}
            }
            if seen.contains(&field.attribute) {
                return Err(SchemaError::DuplicateAttribute {
                    attribute: field.attribute,
                });
            }
            seen.push(field.attribute);
        }

        if !has_dn_component {
            return Err(SchemaError::NoDnComponent);
        }

        let attribute_names = fields
            .iter()
            .filter(|field| field.role != FieldRole::Identity)
            .map(|field| field.attribute.to_string())
            .collect();

        Ok(Self {
            object_classes,
            fields,
            attribute_names,
        })
    }

    pub fn object_classes(&self) -> &'static [&'static str] {
        self.object_classes
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Attribute names to request on searches for this record type.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Search predicate matching this record type's object classes.
    pub fn object_class_filter(&self) -> String {
        filter::object_class_condition(self.object_classes)
    }

    /// Synthesize the distinguished name of a record: the DN component
    /// fields in declaration order, then the container path.
    pub fn dn(&self, record: &R, container: &str) -> String {
        let components: Vec<String> = self
            .fields
            .iter()
            .filter(|field| matches!(field.role, FieldRole::DnComponent { .. }))
            .map(|field| {
                let value = (field.get)(record).into_scalar();
                format!("{}={}", field.attribute, filter::escape_dn_value(&value))
            })
            .collect();
        format!("{},{}", components.join(","), container)
    }
}

impl<R> std::fmt::Debug for RecordSchema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("object_classes", &self.object_classes)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Probe {
        dn: String,
        name: String,
        unit: String,
        tags: Vec<String>,
    }

    const PROBE_CLASSES: &[&str] = &["probeObject"];

    fn descriptor(
        name: &'static str,
        attribute: &'static str,
        kind: ValueKind,
        role: FieldRole,
    ) -> FieldDescriptor<Probe> {
        FieldDescriptor {
            name,
            attribute,
            kind,
            role,
            transient: false,
            get: |_| FieldValue::Scalar(String::new()),
            set: |_, _| {},
        }
    }

    fn valid_fields() -> Vec<FieldDescriptor<Probe>> {
        vec![
            FieldDescriptor {
                name: "dn",
                attribute: "dn",
                kind: ValueKind::Scalar,
                role: FieldRole::Identity,
                transient: false,
                get: |p| FieldValue::Scalar(p.dn.clone()),
                set: |p, v| p.dn = v.into_scalar(),
            },
            FieldDescriptor {
                name: "name",
                attribute: "cn",
                kind: ValueKind::Scalar,
                role: FieldRole::DnComponent { position: 0 },
                transient: false,
                get: |p| FieldValue::Scalar(p.name.clone()),
                set: |p, v| p.name = v.into_scalar(),
            },
            FieldDescriptor {
                name: "unit",
                attribute: "ou",
                kind: ValueKind::Scalar,
                role: FieldRole::DnComponent { position: 0 },
                transient: false,
                get: |p| FieldValue::Scalar(p.unit.clone()),
                set: |p, v| p.unit = v.into_scalar(),
            },
            FieldDescriptor {
                name: "tags",
                attribute: "probeTag",
                kind: ValueKind::List,
                role: FieldRole::Regular,
                transient: false,
                get: |p| FieldValue::List(p.tags.clone()),
                set: |p, v| p.tags = v.into_list(),
            },
        ]
    }

    #[test]
    fn valid_table_derives() {
        let schema = RecordSchema::new(PROBE_CLASSES, valid_fields()).unwrap();
        assert_eq!(schema.attribute_names(), ["cn", "ou", "probeTag"]);
        assert_eq!(
            schema.object_class_filter(),
            "(&(objectClass=probeObject))"
        );
    }

    #[test]
    fn list_valued_dn_component_rejected() {
        let fields = vec![
            descriptor(
                "name",
                "cn",
                ValueKind::List,
                FieldRole::DnComponent { position: 0 },
            ),
        ];
        let err = RecordSchema::new(PROBE_CLASSES, fields).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedFieldKind { field: "name", .. }
        ));
    }

    #[test]
    fn list_valued_identity_rejected() {
        let fields = vec![
            descriptor("dn", "dn", ValueKind::List, FieldRole::Identity),
            descriptor(
                "name",
                "cn",
                ValueKind::Scalar,
                FieldRole::DnComponent { position: 0 },
            ),
        ];
        let err = RecordSchema::new(PROBE_CLASSES, fields).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFieldKind { .. }));
    }

    #[test]
    fn duplicate_attribute_rejected() {
        let fields = vec![
            descriptor(
                "name",
                "cn",
                ValueKind::Scalar,
                FieldRole::DnComponent { position: 0 },
            ),
            descriptor("display", "cn", ValueKind::Scalar, FieldRole::Regular),
        ];
        let err = RecordSchema::new(PROBE_CLASSES, fields).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateAttribute { attribute: "cn" });
    }

    #[test]
    fn table_without_dn_component_rejected() {
        let fields = vec![descriptor(
            "name",
            "cn",
            ValueKind::Scalar,
            FieldRole::Regular,
        )];
        let err = RecordSchema::new(PROBE_CLASSES, fields).unwrap_err();
        assert_eq!(err, SchemaError::NoDnComponent);
    }

    #[test]
    fn dn_synthesis_follows_declaration_order() {
        let schema = RecordSchema::new(PROBE_CLASSES, valid_fields()).unwrap();
        let probe = Probe {
            name: "relay".to_string(),
            unit: "edge".to_string(),
            ..Probe::default()
        };
        assert_eq!(
            schema.dn(&probe, "dc=example,dc=org"),
            "cn=relay,ou=edge,dc=example,dc=org"
        );
    }

    #[test]
    fn dn_synthesis_escapes_values() {
        let schema = RecordSchema::new(PROBE_CLASSES, valid_fields()).unwrap();
        let probe = Probe {
            name: "relay,primary".to_string(),
            unit: "edge".to_string(),
            ..Probe::default()
        };
        assert_eq!(
            schema.dn(&probe, "dc=example,dc=org"),
            "cn=relay\\,primary,ou=edge,dc=example,dc=org"
        );
    }
}

//! The group record and its attribute table.

use serde::{Deserialize, Serialize};

use castellan_directory::schema::{
    FieldDescriptor, FieldRole, FieldValue, RecordSchema, SchemaError, ValueKind,
};

/// Object classes of a group entry.
pub const GROUP_OBJECT_CLASSES: &[&str] = &["posixGroup"];

/// A group as stored in the directory. Role groups are ordinary groups
/// in the supplementary container whose `member_uid` list holds the user
/// ids carrying that role.
///
/// `ou` is transient: it is recovered from the DN on read but the
/// container placement alone encodes it, so it is never written back as
/// an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dn: String,
    pub cn: String,
    pub ou: String,
    pub gid_number: String,
    pub member_uid: Vec<String>,
}

impl Group {
    /// Derive the group attribute table.
    pub fn schema() -> Result<RecordSchema<Group>, SchemaError> {
        RecordSchema::new(
            GROUP_OBJECT_CLASSES,
            vec![
                FieldDescriptor {
                    name: "dn",
                    attribute: "dn",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Identity,
                    transient: false,
                    get: |g| FieldValue::Scalar(g.dn.clone()),
                    set: |g, v| g.dn = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "cn",
                    attribute: "cn",
                    kind: ValueKind::Scalar,
                    role: FieldRole::DnComponent { position: 0 },
                    transient: false,
                    get: |g| FieldValue::Scalar(g.cn.clone()),
                    set: |g, v| g.cn = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "ou",
                    attribute: "ou",
                    kind: ValueKind::Scalar,
                    role: FieldRole::DnComponent { position: 0 },
                    transient: true,
                    get: |g| FieldValue::Scalar(g.ou.clone()),
                    set: |g, v| g.ou = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "gid_number",
                    attribute: "gidNumber",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |g| FieldValue::Scalar(g.gid_number.clone()),
                    set: |g, v| g.gid_number = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "member_uid",
                    attribute: "memberUid",
                    kind: ValueKind::List,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |g| FieldValue::List(g.member_uid.clone()),
                    set: |g, v| g.member_uid = v.into_list(),
                },
            ],
        )
    }
}

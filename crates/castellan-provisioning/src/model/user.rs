//! The user record and its attribute table.

use serde::{Deserialize, Serialize};

use castellan_directory::schema::{
    FieldDescriptor, FieldRole, FieldValue, RecordSchema, SchemaError, ValueKind,
};

/// Object classes of a user entry.
pub const USER_OBJECT_CLASSES: &[&str] =
    &["posixAccount", "inetOrgPerson", "organizationalPerson", "person"];

/// A user account as stored in the directory.
///
/// `dn` is filled when the record is read back and is never written as
/// an attribute. `cn` and `ou` double as the entry's DN components:
/// `cn=<cn>,ou=<ou>,<user base>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dn: String,
    pub uid: String,
    pub cn: String,
    pub ou: String,
    pub sn: String,
    pub given_name: String,
    pub gid_number: String,
    pub uid_number: String,
    pub home_directory: String,
    pub mail: String,
    #[serde(default, skip_serializing)]
    pub user_password: String,
}

impl User {
    /// Derive the user attribute table. Built once per repository at
    /// startup and held immutably from then on.
    pub fn schema() -> Result<RecordSchema<User>, SchemaError> {
        RecordSchema::new(
            USER_OBJECT_CLASSES,
            vec![
                FieldDescriptor {
                    name: "dn",
                    attribute: "dn",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Identity,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.dn.clone()),
                    set: |u, v| u.dn = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "uid",
                    attribute: "uid",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.uid.clone()),
                    set: |u, v| u.uid = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "cn",
                    attribute: "cn",
                    kind: ValueKind::Scalar,
                    role: FieldRole::DnComponent { position: 0 },
                    transient: false,
                    get: |u| FieldValue::Scalar(u.cn.clone()),
                    set: |u, v| u.cn = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "ou",
                    attribute: "ou",
                    kind: ValueKind::Scalar,
                    role: FieldRole::DnComponent { position: 0 },
                    transient: false,
                    get: |u| FieldValue::Scalar(u.ou.clone()),
                    set: |u, v| u.ou = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "sn",
                    attribute: "sn",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.sn.clone()),
                    set: |u, v| u.sn = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "given_name",
                    attribute: "givenName",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.given_name.clone()),
                    set: |u, v| u.given_name = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "gid_number",
                    attribute: "gidNumber",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.gid_number.clone()),
                    set: |u, v| u.gid_number = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "uid_number",
                    attribute: "uidNumber",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.uid_number.clone()),
                    set: |u, v| u.uid_number = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "home_directory",
                    attribute: "homeDirectory",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.home_directory.clone()),
                    set: |u, v| u.home_directory = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "mail",
                    attribute: "mail",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.mail.clone()),
                    set: |u, v| u.mail = v.into_scalar(),
                },
                FieldDescriptor {
                    name: "user_password",
                    attribute: "userPassword",
                    kind: ValueKind::Scalar,
                    role: FieldRole::Regular,
                    transient: false,
                    get: |u| FieldValue::Scalar(u.user_password.clone()),
                    set: |u, v| u.user_password = v.into_scalar(),
                },
            ],
        )
    }
}

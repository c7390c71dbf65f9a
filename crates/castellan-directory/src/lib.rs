//! # castellan-directory
//!
//! Directory access layer for the castellan identity core.
//!
//! The directory is an external, attribute-oriented store addressed by
//! distinguished names. It offers flat read/write operations and no
//! multi-object transactions; everything above this crate has to live
//! with that. This crate provides:
//!
//! - a declarative, statically-built mapping between typed records and
//!   the directory's attribute/DN model ([`schema`], [`mapper`]),
//! - a reuse pool of administratively bound sessions ([`pool`]),
//! - a gateway exposing the directory operations the identity core
//!   consumes ([`gateway`]),
//! - filter and DN escaping helpers ([`filter`]) and the configuration
//!   and error types shared by all of the above.
//!
//! Record types and everything that knows about users or groups live in
//! `castellan-provisioning`; this crate is generic over record shape.

pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod mapper;
pub mod pool;
pub mod schema;

pub use config::{ConfigError, DirectoryConfig};
pub use entry::{Attributes, DirectoryEntry};
pub use error::{DirectoryError, DirectoryResult};
pub use gateway::DirectoryGateway;
pub use pool::{SessionFactory, SessionPool};
pub use schema::{FieldDescriptor, FieldRole, FieldValue, RecordSchema, SchemaError, ValueKind};

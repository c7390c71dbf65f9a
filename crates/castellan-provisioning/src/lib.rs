//! # castellan-provisioning
//!
//! Identity provisioning on top of `castellan-directory`: typed user and
//! group records with their attribute tables, repositories, the
//! mutually-exclusive role-group coordinator, and the registration /
//! unregistration workflow.
//!
//! The backing store offers no multi-object transactions, so every
//! multi-step operation here is a sequence of non-atomic directory
//! writes with explicit, best-effort compensation. The coordinator and
//! the registration workflow document exactly which step may fail and
//! what is rolled back when it does.

pub mod allocator;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod notify;
pub mod repository;
pub mod role;
pub mod saga;
pub mod secret;
pub mod validation;

pub use coordinator::RoleCoordinator;
pub use error::{ProvisionError, ProvisionResult};
pub use model::{Group, GroupCategory, User, UserCategory};
pub use notify::{CredentialNotice, NotificationError, NotificationSender};
pub use repository::{GroupRepository, LdapGroupRepository, LdapUserRepository, UserRepository};
pub use role::Role;
pub use saga::{RegistrationDefaults, RegistrationRequest, RegistrationSaga};
pub use secret::{RandomSecretGenerator, SecretGenerator};

//! Typed repository contracts over the directory.
//!
//! The traits are the seam between the provisioning workflows and the
//! directory: the coordinator and the registration workflow only ever
//! see these contracts, which keeps them testable against in-memory
//! fakes. Lookups return `Option`; absence only becomes an error where
//! a caller requires presence.

mod group;
mod user;

pub use group::LdapGroupRepository;
pub use user::LdapUserRepository;

use async_trait::async_trait;

use crate::error::ProvisionResult;
use crate::model::{Group, GroupCategory, User, UserCategory};

/// CRUD contract for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by unique id anywhere under the user base.
    async fn find_by_uid(&self, uid: &str) -> ProvisionResult<Option<User>>;

    /// Find a user by unique id within one category container.
    async fn find_by_category_and_uid(
        &self,
        category: UserCategory,
        uid: &str,
    ) -> ProvisionResult<Option<User>>;

    async fn find_all(&self) -> ProvisionResult<Vec<User>>;

    async fn find_all_by_category(&self, category: UserCategory) -> ProvisionResult<Vec<User>>;

    async fn create(&self, user: &User) -> ProvisionResult<()>;

    /// Replace the user's attributes with the record's current values.
    async fn modify(&self, user: &User) -> ProvisionResult<()>;

    /// Move the user into another category container.
    async fn rename(&self, user: &User, category: UserCategory) -> ProvisionResult<()>;

    async fn set_credential(&self, user: &User, new_secret: &str) -> ProvisionResult<()>;

    async fn delete(&self, user: &User) -> ProvisionResult<()>;

    /// Verify a credential. Unknown uids and rejected credentials are
    /// both `Ok(false)`.
    async fn authenticate(&self, uid: &str, secret: &str) -> ProvisionResult<bool>;
}

/// CRUD and membership contract for group records.
///
/// Groups carry no credential, so the credential operations of the user
/// contract have no counterpart here.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_category_and_name(
        &self,
        category: GroupCategory,
        name: &str,
    ) -> ProvisionResult<Option<Group>>;

    async fn find_all(&self) -> ProvisionResult<Vec<Group>>;

    async fn find_all_by_category(&self, category: GroupCategory) -> ProvisionResult<Vec<Group>>;

    /// Groups within a category whose member list contains `uid`.
    async fn find_all_by_member(
        &self,
        category: GroupCategory,
        uid: &str,
    ) -> ProvisionResult<Vec<Group>>;

    async fn create(&self, group: &Group) -> ProvisionResult<()>;

    async fn delete(&self, group: &Group) -> ProvisionResult<()>;

    /// Add `uid` to the group's member list.
    async fn add_member(&self, group: &Group, uid: &str) -> ProvisionResult<()>;

    /// Remove `uid` from the group's member list.
    async fn remove_member(&self, group: &Group, uid: &str) -> ProvisionResult<()>;
}

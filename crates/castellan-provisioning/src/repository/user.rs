//! LDAP-backed user repository.

use std::sync::Arc;

use async_trait::async_trait;

use castellan_directory::schema::RecordSchema;
use castellan_directory::{filter, DirectoryGateway, SchemaError};

use crate::error::ProvisionResult;
use crate::model::{User, UserCategory};
use crate::repository::UserRepository;

pub struct LdapUserRepository {
    gateway: Arc<DirectoryGateway>,
    schema: RecordSchema<User>,
    object_class_filter: String,
}

impl LdapUserRepository {
    /// Build the repository, deriving the user attribute table once.
    pub fn new(gateway: Arc<DirectoryGateway>) -> Result<Self, SchemaError> {
        let schema = User::schema()?;
        let object_class_filter = schema.object_class_filter();
        Ok(Self {
            gateway,
            schema,
            object_class_filter,
        })
    }

    fn base_dn(&self) -> &str {
        &self.gateway.config().user_base_dn
    }

    fn container_dn(&self, category: UserCategory) -> String {
        format!("ou={},{}", category.ou(), self.base_dn())
    }

    /// Distinguished name of a user record. Prefers the identity DN the
    /// record was read with; synthesizes from the DN components
    /// otherwise.
    pub fn dn_for(&self, user: &User) -> String {
        if user.dn.is_empty() {
            self.schema.dn(user, self.base_dn())
        } else {
            user.dn.clone()
        }
    }

    async fn find(&self, base: &str, predicate: &str) -> ProvisionResult<Vec<User>> {
        let combined = filter::and(&self.object_class_filter, predicate);
        let names: Vec<&str> = self
            .schema
            .attribute_names()
            .iter()
            .map(String::as_str)
            .collect();
        let entries = self.gateway.search(base, &combined, &names).await?;
        Ok(entries
            .iter()
            .map(|entry| self.schema.from_entry(entry))
            .collect())
    }
}

#[async_trait]
impl UserRepository for LdapUserRepository {
    async fn find_by_uid(&self, uid: &str) -> ProvisionResult<Option<User>> {
        let users = self
            .find(self.base_dn(), &filter::equals("uid", uid))
            .await?;
        Ok(users.into_iter().next())
    }

    async fn find_by_category_and_uid(
        &self,
        category: UserCategory,
        uid: &str,
    ) -> ProvisionResult<Option<User>> {
        let users = self
            .find(&self.container_dn(category), &filter::equals("uid", uid))
            .await?;
        Ok(users.into_iter().next())
    }

    async fn find_all(&self) -> ProvisionResult<Vec<User>> {
        self.find(self.base_dn(), &filter::present_any()).await
    }

    async fn find_all_by_category(&self, category: UserCategory) -> ProvisionResult<Vec<User>> {
        self.find(&self.container_dn(category), &filter::present_any())
            .await
    }

    async fn create(&self, user: &User) -> ProvisionResult<()> {
        let attributes = self.schema.to_attributes(user);
        self.gateway
            .add(&self.dn_for(user), self.schema.object_classes(), &attributes)
            .await?;
        Ok(())
    }

    async fn modify(&self, user: &User) -> ProvisionResult<()> {
        let attributes = self.schema.to_attributes(user);
        let empty = castellan_directory::Attributes::new();
        self.gateway
            .modify(&self.dn_for(user), &empty, &empty, &attributes)
            .await?;
        Ok(())
    }

    async fn rename(&self, user: &User, category: UserCategory) -> ProvisionResult<()> {
        let new_rdn = format!("cn={}", filter::escape_dn_value(&user.cn));
        let new_superior = self.container_dn(category);
        self.gateway
            .rename(&self.dn_for(user), &new_rdn, Some(&new_superior))
            .await?;
        Ok(())
    }

    async fn set_credential(&self, user: &User, new_secret: &str) -> ProvisionResult<()> {
        self.gateway
            .set_credential(&self.dn_for(user), new_secret)
            .await?;
        Ok(())
    }

    async fn delete(&self, user: &User) -> ProvisionResult<()> {
        self.gateway.delete(&self.dn_for(user)).await?;
        Ok(())
    }

    async fn authenticate(&self, uid: &str, secret: &str) -> ProvisionResult<bool> {
        let Some(user) = self.find_by_uid(uid).await? else {
            return Ok(false);
        };
        Ok(self.gateway.authenticate(&self.dn_for(&user), secret).await?)
    }
}

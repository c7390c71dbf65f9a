//! LDAP-backed group repository.

use std::sync::Arc;

use async_trait::async_trait;

use castellan_directory::schema::RecordSchema;
use castellan_directory::{filter, Attributes, DirectoryGateway, SchemaError};

use crate::error::ProvisionResult;
use crate::model::{Group, GroupCategory};
use crate::repository::GroupRepository;

pub struct LdapGroupRepository {
    gateway: Arc<DirectoryGateway>,
    schema: RecordSchema<Group>,
    object_class_filter: String,
}

impl LdapGroupRepository {
    /// Build the repository, deriving the group attribute table once.
    pub fn new(gateway: Arc<DirectoryGateway>) -> Result<Self, SchemaError> {
        let schema = Group::schema()?;
        let object_class_filter = schema.object_class_filter();
        Ok(Self {
            gateway,
            schema,
            object_class_filter,
        })
    }

    fn base_dn(&self) -> &str {
        &self.gateway.config().group_base_dn
    }

    fn container_dn(&self, category: GroupCategory) -> String {
        format!("ou={},{}", category.ou(), self.base_dn())
    }

    pub fn dn_for(&self, group: &Group) -> String {
        if group.dn.is_empty() {
            self.schema.dn(group, self.base_dn())
        } else {
            group.dn.clone()
        }
    }

    async fn find(&self, base: &str, predicate: &str) -> ProvisionResult<Vec<Group>> {
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

    fn member_attribute(uid: &str) -> Attributes {
        Attributes::from([("memberUid".to_string(), vec![uid.to_string()])])
    }
}

#[async_trait]
impl GroupRepository for LdapGroupRepository {
    async fn find_by_category_and_name(
        &self,
        category: GroupCategory,
        name: &str,
    ) -> ProvisionResult<Option<Group>> {
        let groups = self
            .find(&self.container_dn(category), &filter::equals("cn", name))
            .await?;
        Ok(groups.into_iter().next())
    }

    async fn find_all(&self) -> ProvisionResult<Vec<Group>> {
        self.find(self.base_dn(), &filter::present_any()).await
    }

    async fn find_all_by_category(&self, category: GroupCategory) -> ProvisionResult<Vec<Group>> {
        self.find(&self.container_dn(category), &filter::present_any())
            .await
    }

    async fn find_all_by_member(
        &self,
        category: GroupCategory,
        uid: &str,
    ) -> ProvisionResult<Vec<Group>> {
        self.find(
            &self.container_dn(category),
            &filter::equals("memberUid", uid),
        )
        .await
    }

    async fn create(&self, group: &Group) -> ProvisionResult<()> {
        let attributes = self.schema.to_attributes(group);
        self.gateway
            .add(
                &self.dn_for(group),
                self.schema.object_classes(),
                &attributes,
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, group: &Group) -> ProvisionResult<()> {
        self.gateway.delete(&self.dn_for(group)).await?;
        Ok(())
    }

    async fn add_member(&self, group: &Group, uid: &str) -> ProvisionResult<()> {
        let empty = Attributes::new();
        self.gateway
            .modify(
                &self.dn_for(group),
                &Self::member_attribute(uid),
                &empty,
                &empty,
            )
            .await?;
        Ok(())
    }

    async fn remove_member(&self, group: &Group, uid: &str) -> ProvisionResult<()> {
        let empty = Attributes::new();
        self.gateway
            .modify(
                &self.dn_for(group),
                &empty,
                &Self::member_attribute(uid),
                &empty,
            )
            .await?;
        Ok(())
    }
}

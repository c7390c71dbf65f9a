//! In-memory fakes for the repository and collaborator contracts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use castellan_directory::DirectoryError;
use castellan_provisioning::{
    Group, GroupCategory, GroupRepository, NotificationError, NotificationSender, ProvisionError,
    ProvisionResult, Role, RoleCoordinator, SecretGenerator, User, UserCategory, UserRepository,
};

/// User store backed by a hash map keyed by uid.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.users.lock().unwrap();
            for user in users {
                map.insert(user.uid.clone(), user);
            }
        }
        repo
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.users.lock().unwrap().contains_key(uid)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_uid(&self, uid: &str) -> ProvisionResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(uid).cloned())
    }

    async fn find_by_category_and_uid(
        &self,
        category: UserCategory,
        uid: &str,
    ) -> ProvisionResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(uid)
            .filter(|user| user.ou == category.ou())
            .cloned())
    }

    async fn find_all(&self) -> ProvisionResult<Vec<User>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn find_all_by_category(&self, category: UserCategory) -> ProvisionResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|user| user.ou == category.ou())
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> ProvisionResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.uid) {
            return Err(ProvisionError::AlreadyExists {
                uid: user.uid.clone(),
            });
        }
        users.insert(user.uid.clone(), user.clone());
        Ok(())
    }

    async fn modify(&self, user: &User) -> ProvisionResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.uid.clone(), user.clone());
        Ok(())
    }

    async fn rename(&self, user: &User, category: UserCategory) -> ProvisionResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.uid) {
            Some(stored) => {
                stored.ou = category.ou().to_string();
                Ok(())
            }
            None => Err(ProvisionError::UserNotFound {
                uid: user.uid.clone(),
            }),
        }
    }

    async fn set_credential(&self, user: &User, new_secret: &str) -> ProvisionResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.uid) {
            Some(stored) => {
                stored.user_password = new_secret.to_string();
                Ok(())
            }
            None => Err(ProvisionError::UserNotFound {
                uid: user.uid.clone(),
            }),
        }
    }

    async fn delete(&self, user: &User) -> ProvisionResult<()> {
        match self.users.lock().unwrap().remove(&user.uid) {
            Some(_) => Ok(()),
            None => Err(ProvisionError::UserNotFound {
                uid: user.uid.clone(),
            }),
        }
    }

    async fn authenticate(&self, uid: &str, secret: &str) -> ProvisionResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(uid)
            .is_some_and(|user| !secret.is_empty() && user.user_password == secret))
    }
}

/// Group store keyed by container and name, with one failure injection
/// point: `add_member` can be made to fail for a single group.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: Mutex<HashMap<(String, String), Group>>,
    fail_add_for: Mutex<Option<String>>,
}

impl InMemoryGroupRepository {
    /// Seed the supplementary container with the standard role groups.
    pub fn with_role_groups(roles: &[Role]) -> Self {
        let repo = Self::default();
        {
            let mut groups = repo.groups.lock().unwrap();
            for (i, role) in roles.iter().enumerate() {
                let name = role.as_str().to_string();
                groups.insert(
                    ("supplementary".to_string(), name.clone()),
                    Group {
                        dn: format!("cn={name},ou=supplementary,ou=groups,dc=example,dc=org"),
                        cn: name,
                        ou: "supplementary".to_string(),
                        gid_number: (10100 + i).to_string(),
                        member_uid: Vec::new(),
                    },
                );
            }
        }
        repo
    }

    pub fn fail_next_add_for(&self, group_name: &str) {
        *self.fail_add_for.lock().unwrap() = Some(group_name.to_string());
    }

    pub fn members_of(&self, name: &str) -> Vec<String> {
        self.groups
            .lock()
            .unwrap()
            .get(&("supplementary".to_string(), name.to_string()))
            .map(|group| group.member_uid.clone())
            .unwrap_or_default()
    }

    /// Supplementary role groups the uid belongs to.
    pub fn memberships(&self, uid: &str) -> Vec<String> {
        self.groups
            .lock()
            .unwrap()
            .values()
            .filter(|group| {
                group.ou == "supplementary" && group.member_uid.iter().any(|m| m == uid)
            })
            .map(|group| group.cn.clone())
            .collect()
    }

    pub fn insert_member(&self, name: &str, uid: &str) {
        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .get_mut(&("supplementary".to_string(), name.to_string()))
            .expect("role group must be seeded");
        group.member_uid.push(uid.to_string());
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_category_and_name(
        &self,
        category: GroupCategory,
        name: &str,
    ) -> ProvisionResult<Option<Group>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .get(&(category.ou().to_string(), name.to_string()))
            .cloned())
    }

    async fn find_all(&self) -> ProvisionResult<Vec<Group>> {
        Ok(self.groups.lock().unwrap().values().cloned().collect())
    }

    async fn find_all_by_category(&self, category: GroupCategory) -> ProvisionResult<Vec<Group>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|group| group.ou == category.ou())
            .cloned()
            .collect())
    }

    async fn find_all_by_member(
        &self,
        category: GroupCategory,
        uid: &str,
    ) -> ProvisionResult<Vec<Group>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|group| {
                group.ou == category.ou() && group.member_uid.iter().any(|m| m == uid)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, group: &Group) -> ProvisionResult<()> {
        self.groups
            .lock()
            .unwrap()
            .insert((group.ou.clone(), group.cn.clone()), group.clone());
        Ok(())
    }

    async fn delete(&self, group: &Group) -> ProvisionResult<()> {
        self.groups
            .lock()
            .unwrap()
            .remove(&(group.ou.clone(), group.cn.clone()));
        Ok(())
    }

    async fn add_member(&self, group: &Group, uid: &str) -> ProvisionResult<()> {
        let fail = {
            let mut armed = self.fail_add_for.lock().unwrap();
            if armed.as_deref() == Some(group.cn.as_str()) {
                *armed = None;
                true
            } else {
                false
            }
        };
        if fail {
            return Err(ProvisionError::Directory(DirectoryError::operation(
                "injected add failure",
            )));
        }
        let mut groups = self.groups.lock().unwrap();
        let stored = groups
            .get_mut(&(group.ou.clone(), group.cn.clone()))
            .ok_or_else(|| ProvisionError::GroupNotFound {
                name: group.cn.clone(),
            })?;
        if !stored.member_uid.iter().any(|m| m == uid) {
            stored.member_uid.push(uid.to_string());
        }
        Ok(())
    }

    async fn remove_member(&self, group: &Group, uid: &str) -> ProvisionResult<()> {
        let mut groups = self.groups.lock().unwrap();
        let stored = groups
            .get_mut(&(group.ou.clone(), group.cn.clone()))
            .ok_or_else(|| ProvisionError::GroupNotFound {
                name: group.cn.clone(),
            })?;
        stored.member_uid.retain(|m| m != uid);
        Ok(())
    }
}

/// Notifier that records deliveries and can be switched to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String, Value)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn deliveries(&self) -> Vec<(String, String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(
        &self,
        address: &str,
        subject: &str,
        payload: Value,
    ) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::new("transport unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), subject.to_string(), payload));
        Ok(())
    }
}

/// Deterministic secret source.
pub struct FixedSecretGenerator(pub &'static str);

impl SecretGenerator for FixedSecretGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Coordinator over a shared fake group repository.
pub fn coordinator(groups: &Arc<InMemoryGroupRepository>) -> RoleCoordinator {
    RoleCoordinator::new(Arc::clone(groups) as Arc<dyn GroupRepository>)
}

/// A member-category user with sensible defaults.
pub fn member_user(uid: &str, uid_number: &str) -> User {
    User {
        dn: String::new(),
        uid: uid.to_string(),
        cn: uid.to_string(),
        ou: "member".to_string(),
        sn: "Doe".to_string(),
        given_name: "Jane".to_string(),
        gid_number: "10000".to_string(),
        uid_number: uid_number.to_string(),
        home_directory: format!("/home/{uid}"),
        mail: format!("{uid}@example.org"),
        user_password: "initial".to_string(),
    }
}

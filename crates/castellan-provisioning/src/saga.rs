//! Registration and unregistration as compensated multi-step workflows.
//!
//! Registration runs a fixed step sequence: validate, allocate, create
//! the directory record, grant the role, send the credential
//! notification. The store cannot tie those steps into a transaction,
//! so each step past record creation pairs with one compensating action:
//! unregister the record that was just created. Compensation outcomes
//! are logged and never replace the error that triggered them.

use std::sync::Arc;

use tracing::{info, warn};

use crate::allocator;
use crate::coordinator::RoleCoordinator;
use crate::error::{ProvisionError, ProvisionResult};
use crate::model::{User, UserCategory};
use crate::notify::{CredentialNotice, NotificationSender};
use crate::repository::UserRepository;
use crate::role::Role;
use crate::secret::SecretGenerator;
use crate::validation;

/// A registration request as it arrives from the outer layers; category
/// and role come in by name and are validated here.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub surname: String,
    pub given_name: String,
    pub mail: String,
    pub category: String,
    pub role: String,
}

/// Fixed values stamped onto newly registered accounts.
#[derive(Debug, Clone)]
pub struct RegistrationDefaults {
    /// Primary group id shared by all accounts.
    pub gid_number: String,
    /// Home directories are created under this root.
    pub home_directory_root: String,
    /// Subject line of the credential notification.
    pub notice_subject: String,
}

impl Default for RegistrationDefaults {
    fn default() -> Self {
        Self {
            gid_number: "10000".to_string(),
            home_directory_root: "/home".to_string(),
            notice_subject: "Your account credentials".to_string(),
        }
    }
}

pub struct RegistrationSaga {
    users: Arc<dyn UserRepository>,
    coordinator: RoleCoordinator,
    notifier: Arc<dyn NotificationSender>,
    secrets: Arc<dyn SecretGenerator>,
    defaults: RegistrationDefaults,
}

impl RegistrationSaga {
    pub fn new(
        users: Arc<dyn UserRepository>,
        coordinator: RoleCoordinator,
        notifier: Arc<dyn NotificationSender>,
        secrets: Arc<dyn SecretGenerator>,
        defaults: RegistrationDefaults,
    ) -> Self {
        Self {
            users,
            coordinator,
            notifier,
            secrets,
            defaults,
        }
    }

    /// Register a new account and return the created record.
    ///
    /// After the record exists, a failed role grant or a failed
    /// notification unregisters it again (best-effort, logged) and the
    /// step's own error is returned. On success the returned record
    /// still carries the generated credential; callers decide how long
    /// to keep it around.
    pub async fn register(&self, request: RegistrationRequest) -> ProvisionResult<User> {
        let category = UserCategory::from_name(&request.category)?;
        if category != UserCategory::System {
            validation::validate_member_username(&request.username)?;
        }
        let role = Role::from_name(&request.role)?;
        validation::validate_email(&request.mail)?;

        if self.users.find_by_uid(&request.username).await?.is_some() {
            return Err(ProvisionError::AlreadyExists {
                uid: request.username,
            });
        }

        let uid_number = self.next_uid_number().await?;
        let secret = self.secrets.generate();

        let user = User {
            dn: String::new(),
            uid: request.username.clone(),
            cn: request.username.clone(),
            ou: category.ou().to_string(),
            sn: request.surname,
            given_name: request.given_name,
            gid_number: self.defaults.gid_number.clone(),
            uid_number: uid_number.to_string(),
            home_directory: format!("{}/{}", self.defaults.home_directory_root, request.username),
            mail: request.mail,
            user_password: secret.clone(),
        };

        self.users.create(&user).await?;
        info!(uid = %user.uid, category = %category, "user record created");

        if let Err(err) = self.coordinator.grant_role(&user.uid, role).await {
            self.roll_back_registration(&user, "role grant").await;
            return Err(err);
        }

        let notice = CredentialNotice {
            surname: user.sn.clone(),
            given_name: user.given_name.clone(),
            username: user.uid.clone(),
            password: secret,
        };
        if let Err(err) = self
            .notifier
            .send(&user.mail, &self.defaults.notice_subject, notice.into_payload())
            .await
        {
            self.roll_back_registration(&user, "credential notification")
                .await;
            return Err(err.into());
        }

        info!(uid = %user.uid, role = %role, "registration completed");
        Ok(user)
    }

    /// Remove an account.
    ///
    /// The record deletion is the authoritative step. Revoking the role
    /// membership afterwards is best-effort: once the record is gone, a
    /// failed revocation is logged and never propagated.
    pub async fn unregister(&self, uid: &str) -> ProvisionResult<()> {
        let user = self
            .users
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| ProvisionError::UserNotFound {
                uid: uid.to_string(),
            })?;

        self.users.delete(&user).await?;
        info!(uid, "user record deleted");

        if let Err(err) = self.coordinator.grant_role(uid, Role::Anonymous).await {
            warn!(uid, error = %err, "user record deleted but role membership could not be revoked");
        }
        Ok(())
    }

    /// Compensation shared by the post-creation steps.
    async fn roll_back_registration(&self, user: &User, step: &'static str) {
        if let Err(err) = self.unregister(&user.uid).await {
            let logged = ProvisionError::compensation(step, err);
            warn!(uid = %user.uid, error = %logged, "failed to roll back registration");
        }
    }

    /// Allocate the next free uid number, reusing numbers freed by
    /// earlier unregistrations.
    async fn next_uid_number(&self) -> ProvisionResult<u32> {
        let users = self.users.find_all().await?;
        let used: Vec<u32> = users
            .iter()
            .filter_map(|user| user.uid_number.parse().ok())
            .collect();
        Ok(allocator::next_available_id(&used))
    }
}

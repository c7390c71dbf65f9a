//! Mutually-exclusive role-group coordination.
//!
//! Role groups live in the supplementary group container; a user id may
//! be a member of at most one of them. The backing store has no
//! cross-object transactions, so a role switch is a two-step update with
//! a compensating re-add, not an atomic operation. Concurrent grants for
//! the same uid are not serialized here: an in-process lock would not
//! protect a multi-process deployment, so observation repair (highest
//! precedence wins) plus the compensation below is all the protection
//! there is.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};
use crate::model::{Group, GroupCategory};
use crate::repository::GroupRepository;
use crate::role::Role;

pub struct RoleCoordinator {
    groups: Arc<dyn GroupRepository>,
}

impl RoleCoordinator {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    /// Resolve the role a user currently holds.
    ///
    /// Membership in no role group is [`Role::Anonymous`]. Membership in
    /// several resolves to the highest precedence; that state should not
    /// occur and is logged, but it is recoverable, not fatal.
    pub async fn current_role(&self, uid: &str) -> ProvisionResult<Role> {
        let memberships = self
            .groups
            .find_all_by_member(GroupCategory::Supplementary, uid)
            .await?;
        let roles: Vec<Role> = memberships
            .iter()
            .filter_map(|group| Role::from_name(&group.cn).ok())
            .collect();
        if roles.len() > 1 {
            warn!(
                uid,
                memberships = roles.len(),
                "user holds more than one role group, resolving to highest precedence"
            );
        }
        Ok(roles.into_iter().max().unwrap_or(Role::Anonymous))
    }

    /// Grant `new_role` to `uid`, revoking whatever role it held.
    ///
    /// Granting the current role is a no-op. Granting
    /// [`Role::Anonymous`] removes the current membership. A switch
    /// removes the old membership first and then adds the new one; if
    /// the add fails, the old membership is restored best-effort and the
    /// add error is returned. A failed restore is logged only.
    pub async fn grant_role(&self, uid: &str, new_role: Role) -> ProvisionResult<()> {
        let current = self.current_role(uid).await?;
        if current == new_role {
            return Ok(());
        }

        if new_role == Role::Anonymous {
            // current != Anonymous here, so there is a membership to drop.
            let old_group = self.role_group(current).await?;
            self.groups.remove_member(&old_group, uid).await?;
            debug!(uid, role = %current, "role membership revoked");
            return Ok(());
        }

        let new_group = self.role_group(new_role).await?;

        if current == Role::Anonymous {
            self.groups.add_member(&new_group, uid).await?;
            debug!(uid, role = %new_role, "role membership granted");
            return Ok(());
        }

        let old_group = self.role_group(current).await?;
        self.groups.remove_member(&old_group, uid).await?;
        if let Err(err) = self.groups.add_member(&new_group, uid).await {
            if let Err(restore_err) = self.groups.add_member(&old_group, uid).await {
                let logged = ProvisionError::compensation("role switch", restore_err);
                warn!(uid, role = %current, error = %logged, "failed to restore previous role membership");
            }
            return Err(err);
        }
        debug!(uid, from = %current, to = %new_role, "role membership switched");
        Ok(())
    }

    async fn role_group(&self, role: Role) -> ProvisionResult<Group> {
        self.groups
            .find_by_category_and_name(GroupCategory::Supplementary, role.as_str())
            .await?
            .ok_or_else(|| ProvisionError::GroupNotFound {
                name: role.as_str().to_string(),
            })
    }
}

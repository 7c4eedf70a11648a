//! Role lifecycle and batch user/role membership edits.

use std::sync::Arc;

use tracing::{error, info};

use doorman_core::config::MembershipConfig;
use doorman_core::error::AppError;
use doorman_core::result::AppResult;
use doorman_core::traits::store::{DocumentSession, DocumentStore};
use doorman_entity::role::Role;
use doorman_store::repositories::{RoleRepository, UserRepository};

/// Manages role lifecycle and user/role membership.
///
/// Membership lives on the user documents as a set of role identifiers;
/// batch edits resolve the full username and role-name sets in one
/// subclause query each, apply the cross-product edit in memory, and
/// commit once.
#[derive(Debug, Clone)]
pub struct RoleService {
    /// Document store handle.
    store: Arc<dyn DocumentStore>,
    /// Application-scoped user repository.
    users: UserRepository,
    /// Application-scoped role repository.
    roles: RoleRepository,
    /// Application namespace, for log context.
    application_name: String,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(store: Arc<dyn DocumentStore>, config: &MembershipConfig) -> Self {
        Self {
            store,
            users: UserRepository::new(config.application_name.clone()),
            roles: RoleRepository::new(config.application_name.clone()),
            application_name: config.application_name.clone(),
        }
    }

    /// Creates a new role. Fails with a conflict when the name is
    /// already taken within the application.
    pub async fn create_role(&self, name: &str) -> AppResult<Role> {
        let mut session = self.store.open_session().await?;
        if self.roles.exists(session.as_ref(), name).await? {
            return Err(AppError::conflict(format!(
                "Role '{name}' already exists"
            )));
        }
        let role = Role::new(name, self.application_name.clone());
        self.roles.store(session.as_mut(), &role)?;
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.application_name,
            role = %name,
            "Role created"
        );
        Ok(role)
    }

    /// Checks whether a role exists within the application.
    pub async fn role_exists(&self, name: &str) -> AppResult<bool> {
        let session = self.store.open_session().await?;
        self.roles.exists(session.as_ref(), name).await
    }

    /// Deletes a role. Returns `false` when absent.
    ///
    /// With `fail_on_populated`, a role that still has members is left
    /// untouched and the call fails. Otherwise the role reference is
    /// stripped from every member and the role document deleted, all in
    /// one commit.
    pub async fn delete_role(&self, name: &str, fail_on_populated: bool) -> AppResult<bool> {
        let mut session = self.store.open_session().await?;
        let Some(role) = self.roles.find_by_name(session.as_ref(), name).await? else {
            return Ok(false);
        };

        let members = self.users.members_of(session.as_ref(), role.id).await?;
        if !members.is_empty() && fail_on_populated {
            return Err(AppError::role_populated(format!(
                "Role '{name}' still has {} member(s)",
                members.len()
            )));
        }
        for mut member in members {
            member.remove_role(role.id);
            self.users.store(session.as_mut(), &member)?;
        }
        self.roles.delete(session.as_mut(), &role);
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.application_name,
            role = %name,
            "Role deleted"
        );
        Ok(true)
    }

    /// Adds every named user to every named role. A no-op when either
    /// list is empty; idempotent for roles already held; unresolved
    /// names are skipped.
    pub async fn add_users_to_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        self.edit_membership(usernames, role_names, true).await
    }

    /// Removes every named user from every named role. A no-op when
    /// either list is empty; idempotent for roles not held; unresolved
    /// names are skipped.
    pub async fn remove_users_from_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        self.edit_membership(usernames, role_names, false).await
    }

    /// Checks whether a user holds a role. `false` when either is
    /// unknown.
    pub async fn is_user_in_role(&self, username: &str, role_name: &str) -> AppResult<bool> {
        let session = self.store.open_session().await?;
        let Some(role) = self.roles.find_by_name(session.as_ref(), role_name).await? else {
            return Ok(false);
        };
        let Some(user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(false);
        };
        Ok(user.has_role(role.id))
    }

    /// Lists the role names a user holds. Empty for an unknown user or
    /// one with no memberships.
    pub async fn get_roles_for_user(&self, username: &str) -> AppResult<Vec<String>> {
        let session = self.store.open_session().await?;
        let Some(user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(Vec::new());
        };
        let roles = self.roles.find_by_ids(session.as_ref(), &user.roles).await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    /// Lists every role name in the application.
    pub async fn get_all_roles(&self) -> AppResult<Vec<String>> {
        let session = self.store.open_session().await?;
        let roles = self.roles.find_all(session.as_ref()).await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    /// Lists the usernames holding a role.
    ///
    /// `None` means the role itself does not exist, as distinct from
    /// `Some(vec![])` for a role with no members.
    pub async fn get_users_in_role(&self, role_name: &str) -> AppResult<Option<Vec<String>>> {
        self.users_in_role(role_name, None).await
    }

    /// Like [`get_users_in_role`](Self::get_users_in_role) but narrowed
    /// to usernames containing the given pattern.
    pub async fn find_users_in_role(
        &self,
        role_name: &str,
        username_pattern: &str,
    ) -> AppResult<Option<Vec<String>>> {
        self.users_in_role(role_name, Some(username_pattern)).await
    }

    async fn users_in_role(
        &self,
        role_name: &str,
        username_pattern: Option<&str>,
    ) -> AppResult<Option<Vec<String>>> {
        let session = self.store.open_session().await?;
        let Some(role) = self.roles.find_by_name(session.as_ref(), role_name).await? else {
            return Ok(None);
        };
        let members = self.users.members_of(session.as_ref(), role.id).await?;
        let usernames = members
            .into_iter()
            .map(|u| u.username)
            .filter(|name| username_pattern.is_none_or(|p| name.contains(p)))
            .collect();
        Ok(Some(usernames))
    }

    /// Resolves both name sets, applies the cross-product edit in
    /// memory, and commits once. Only users whose membership actually
    /// changed are written back.
    async fn edit_membership(
        &self,
        usernames: &[String],
        role_names: &[String],
        add: bool,
    ) -> AppResult<()> {
        if usernames.is_empty() || role_names.is_empty() {
            return Ok(());
        }
        let mut session = self.store.open_session().await?;
        let users = self
            .users
            .find_by_usernames(session.as_ref(), usernames)
            .await?;
        let roles = self.roles.find_by_names(session.as_ref(), role_names).await?;

        for mut user in users {
            let mut changed = false;
            for role in &roles {
                changed |= if add {
                    user.add_role(role.id)
                } else {
                    user.remove_role(role.id)
                };
            }
            if changed {
                self.users.store(session.as_mut(), &user)?;
            }
        }
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.application_name,
            users = usernames.len(),
            roles = roles.len(),
            add = add,
            "Membership edited"
        );
        Ok(())
    }

    /// Commits the session, logging storage failures with the acting
    /// application before propagating them unchanged.
    async fn commit(&self, session: &mut dyn DocumentSession) -> AppResult<()> {
        session.save_changes().await.inspect_err(|e| {
            error!(
                application = %self.application_name,
                error = %e,
                "Commit failed"
            );
        })
    }
}

use std::sync::Arc;

use curriculum_sdk::{
    Capability, Group, ListQuery, NewGroup, NewPermission, NewUser, Page, Permission, Role, User,
    UserPatch,
};
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{check_len, check_required};
use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::fields::{GroupFields, UserFields};
use crate::domain::policy;
use crate::domain::repos::UsersRepository;

#[derive(Clone)]
pub struct UsersService<R: UsersRepository> {
    repo: Arc<R>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<R: UsersRepository> UsersService<R> {
    pub fn new(repo: Arc<R>, db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self { repo, db, config }
    }
}

fn validate_profile(
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), DomainError> {
    if let Some(email) = email {
        check_len(UserFields::EMAIL, email, UserFields::EMAIL_MAX)?;
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::validation(
                UserFields::EMAIL,
                format!("'{email}' is not an email address"),
            ));
        }
    }
    if let Some(first_name) = first_name {
        check_len(UserFields::FIRST_NAME, first_name, UserFields::NAME_MAX)?;
    }
    if let Some(last_name) = last_name {
        check_len(UserFields::LAST_NAME, last_name, UserFields::NAME_MAX)?;
    }
    Ok(())
}

fn validate_new_user(new_user: &NewUser) -> Result<(), DomainError> {
    check_required(
        UserFields::USERNAME,
        &new_user.username,
        UserFields::USERNAME_MAX,
    )?;
    check_required(
        UserFields::PASSWORD,
        &new_user.password_hash,
        UserFields::PASSWORD_MAX,
    )?;
    validate_profile(
        Some(&new_user.email),
        Some(&new_user.first_name),
        Some(&new_user.last_name),
    )
}

// Accounts
impl<R: UsersRepository> UsersService<R> {
    #[instrument(skip(self, new_user), fields(username = %new_user.username, role = %new_user.role))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        validate_new_user(&new_user)?;

        if self
            .repo
            .find_by_username(&self.db, &new_user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                new_user.username
            )));
        }

        let NewUser {
            id,
            username,
            email,
            first_name,
            last_name,
            password_hash,
            role,
        } = new_user;

        let user = User {
            id: id.unwrap_or_else(Uuid::now_v7),
            username,
            email,
            first_name,
            last_name,
            role,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: OffsetDateTime::now_utc(),
            last_login: None,
        };

        let user = self.repo.create(&self.db, user, password_hash).await?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Getting user by id");

        self.repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        debug!("Looking up user by username");

        self.repo.find_by_username(&self.db, username).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        role: Option<Role>,
        query: ListQuery,
    ) -> Result<Page<User>, DomainError> {
        let limit = self.config.effective_limit(query.limit);
        let page = self
            .repo
            .list_page(&self.db, role, limit, query.offset)
            .await?;

        debug!("Successfully listed {} users in page", page.items.len());
        Ok(page)
    }

    #[instrument(skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        validate_profile(
            patch.email.as_deref(),
            patch.first_name.as_deref(),
            patch.last_name.as_deref(),
        )?;

        let mut current = self.get_user(id).await?;

        if let Some(email) = patch.email {
            current.email = email;
        }
        if let Some(first_name) = patch.first_name {
            current.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            current.last_name = last_name;
        }
        if let Some(role) = patch.role {
            if role != current.role {
                info!(from = %current.role, to = %role, "Changing user role");
            }
            current.role = role;
        }
        if let Some(is_active) = patch.is_active {
            current.is_active = is_active;
        }
        if let Some(is_staff) = patch.is_staff {
            current.is_staff = is_staff;
        }
        if let Some(is_superuser) = patch.is_superuser {
            current.is_superuser = is_superuser;
        }

        let user = self.repo.update(&self.db, current).await?;

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(skip(self, password_hash), fields(user_id = %id))]
    pub async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), DomainError> {
        check_required(
            UserFields::PASSWORD,
            &password_hash,
            UserFields::PASSWORD_MAX,
        )?;

        if !self.repo.set_password(&self.db, id, password_hash).await? {
            return Err(DomainError::not_found("User", id));
        }

        info!("Password hash replaced");
        Ok(())
    }

    /// Stamp `last_login` with the current time.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn record_login(&self, id: Uuid) -> Result<OffsetDateTime, DomainError> {
        let now = OffsetDateTime::now_utc();
        if !self.repo.set_last_login(&self.db, id, now).await? {
            return Err(DomainError::not_found("User", id));
        }

        debug!("Recorded login");
        Ok(now)
    }

    /// Delete a user. Tests, the credit account, ledger rows and memberships
    /// are removed by the storage cascade.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting user");

        if !self.repo.delete(&self.db, id).await? {
            return Err(DomainError::not_found("User", id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id, capability = ?capability))]
    pub async fn has_capability(
        &self,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<bool, DomainError> {
        let user = self.get_user(user_id).await?;
        let allowed = policy::user_allows(&user, capability);

        debug!(role = %user.role, allowed, "Evaluated capability");
        Ok(allowed)
    }
}

// Groups and permissions
impl<R: UsersRepository> UsersService<R> {
    #[instrument(skip(self, new_group), fields(name = %new_group.name))]
    pub async fn create_group(&self, new_group: NewGroup) -> Result<Group, DomainError> {
        info!("Creating group");

        check_required(GroupFields::NAME, &new_group.name, GroupFields::NAME_MAX)?;

        let group = Group {
            id: new_group.id.unwrap_or_else(Uuid::now_v7),
            name: new_group.name,
        };
        self.repo.create_group(&self.db, group).await
    }

    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.repo.list_groups(&self.db).await
    }

    /// Returns `false` when the user was already a member.
    #[instrument(skip(self), fields(user_id = %user_id, group_id = %group_id))]
    pub async fn add_user_to_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.ensure_user(user_id).await?;
        if self.repo.get_group(&self.db, group_id).await?.is_none() {
            return Err(DomainError::not_found("Group", group_id));
        }

        let added = self.repo.add_to_group(&self.db, user_id, group_id).await?;
        if added {
            info!("User added to group");
        } else {
            debug!("User already in group");
        }
        Ok(added)
    }

    #[instrument(skip(self), fields(user_id = %user_id, group_id = %group_id))]
    pub async fn remove_user_from_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError> {
        let removed = self
            .repo
            .remove_from_group(&self.db, user_id, group_id)
            .await?;
        if removed {
            info!("User removed from group");
        }
        Ok(removed)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, DomainError> {
        self.ensure_user(user_id).await?;
        self.repo.groups_of(&self.db, user_id).await
    }

    #[instrument(skip(self, new_permission), fields(codename = %new_permission.codename))]
    pub async fn create_permission(
        &self,
        new_permission: NewPermission,
    ) -> Result<Permission, DomainError> {
        info!("Creating permission");

        check_required(
            GroupFields::CODENAME,
            &new_permission.codename,
            GroupFields::CODENAME_MAX,
        )?;
        check_required(
            GroupFields::NAME,
            &new_permission.name,
            GroupFields::PERMISSION_NAME_MAX,
        )?;

        let permission = Permission {
            id: new_permission.id.unwrap_or_else(Uuid::now_v7),
            codename: new_permission.codename,
            name: new_permission.name,
        };
        self.repo.create_permission(&self.db, permission).await
    }

    /// Returns `false` when the permission was already granted.
    #[instrument(skip(self), fields(user_id = %user_id, permission_id = %permission_id))]
    pub async fn grant_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.ensure_user(user_id).await?;
        if self
            .repo
            .get_permission(&self.db, permission_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Permission", permission_id));
        }

        let granted = self.repo.grant(&self.db, user_id, permission_id).await?;
        if granted {
            info!("Permission granted");
        }
        Ok(granted)
    }

    #[instrument(skip(self), fields(user_id = %user_id, permission_id = %permission_id))]
    pub async fn revoke_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError> {
        let revoked = self.repo.revoke(&self.db, user_id, permission_id).await?;
        if revoked {
            info!("Permission revoked");
        }
        Ok(revoked)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_user_permissions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Permission>, DomainError> {
        self.ensure_user(user_id).await?;
        self.repo.permissions_of(&self.db, user_id).await
    }

    async fn ensure_user(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.get(&self.db, id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Group, Page, Permission, Role, User};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for user accounts and their group/permission memberships.
///
/// All methods accept `conn: &C`, either the pooled `DatabaseConnection` or an
/// open `DatabaseTransaction`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<User>, DomainError>;

    async fn find_by_username<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Page through users ordered by username, optionally restricted to one role.
    async fn list_page<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> Result<Page<User>, DomainError>;

    /// Insert a user row together with its password hash.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
        password_hash: String,
    ) -> Result<User, DomainError>;

    /// Write every profile column except the password hash.
    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
    ) -> Result<User, DomainError>;

    async fn set_password<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        password_hash: String,
    ) -> Result<bool, DomainError>;

    async fn set_last_login<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError>;

    /// Delete a user; owned rows go with it through the foreign keys.
    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    // Groups

    async fn create_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        group: Group,
    ) -> Result<Group, DomainError>;

    async fn get_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Group>, DomainError>;

    async fn list_groups<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Group>, DomainError>;

    /// Returns `false` when the membership already existed.
    async fn add_to_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn remove_from_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn groups_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Group>, DomainError>;

    // Permissions

    async fn create_permission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        permission: Permission,
    ) -> Result<Permission, DomainError>;

    async fn get_permission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Permission>, DomainError>;

    /// Returns `false` when the grant already existed.
    async fn grant<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn revoke<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn permissions_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Permission>, DomainError>;
}

use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Group, Page, Permission, Role, User};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TryInsertResult,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;
use crate::infra::storage::db::{db_err, fetch_page};
use crate::infra::storage::entity::{group, permission, user, user_group, user_permission};

/// ORM-based implementation of the `UsersRepository` trait.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

impl OrmUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn profile_columns(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        username: Set(u.username.clone()),
        email: Set(u.email.clone()),
        first_name: Set(u.first_name.clone()),
        last_name: Set(u.last_name.clone()),
        role: Set(u.role.into()),
        is_active: Set(u.is_active),
        is_staff: Set(u.is_staff),
        is_superuser: Set(u.is_superuser),
        date_joined: Set(u.date_joined),
        last_login: Set(u.last_login),
        ..Default::default()
    }
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_username<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_page<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> Result<Page<User>, DomainError> {
        let mut select = user::Entity::find().order_by_asc(user::Column::Username);
        if let Some(role) = role {
            select = select.filter(user::Column::Role.eq(user::Role::from(role)));
        }
        fetch_page(select, conn, limit, offset, Into::into).await
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
        password_hash: String,
    ) -> Result<User, DomainError> {
        let mut m = profile_columns(&user);
        m.password = Set(password_hash);
        let _ = m.insert(conn).await.map_err(db_err)?;
        Ok(user)
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
    ) -> Result<User, DomainError> {
        let m = profile_columns(&user);
        let _ = m.update(conn).await.map_err(db_err)?;
        Ok(user)
    }

    async fn set_password<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        password_hash: String,
    ) -> Result<bool, DomainError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Password, password_hash.into())
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn set_last_login<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastLogin, Some(at).into())
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = user::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn create_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        group: Group,
    ) -> Result<Group, DomainError> {
        let m = group::ActiveModel {
            id: Set(group.id),
            name: Set(group.name.clone()),
        };
        let _ = m.insert(conn).await.map_err(db_err)?;
        Ok(group)
    }

    async fn get_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Group>, DomainError> {
        let found = group::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_groups<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Group>, DomainError> {
        let rows = group::Entity::find()
            .order_by_asc(group::Column::Name)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_to_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError> {
        let inserted = user_group::Entity::insert(user_group::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        })
        .on_conflict(
            OnConflict::columns([user_group::Column::UserId, user_group::Column::GroupId])
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(conn)
        .await
        .map_err(db_err)?;
        Ok(matches!(inserted, TryInsertResult::Inserted(_)))
    }

    async fn remove_from_group<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = user_group::Entity::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .filter(user_group::Column::GroupId.eq(group_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn groups_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Group>, DomainError> {
        let Some(owner) = user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(db_err)?
        else {
            return Ok(Vec::new());
        };
        let rows = owner
            .find_related(group::Entity)
            .order_by_asc(group::Column::Name)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_permission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        permission: Permission,
    ) -> Result<Permission, DomainError> {
        let m = permission::ActiveModel {
            id: Set(permission.id),
            codename: Set(permission.codename.clone()),
            name: Set(permission.name.clone()),
        };
        let _ = m.insert(conn).await.map_err(db_err)?;
        Ok(permission)
    }

    async fn get_permission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Permission>, DomainError> {
        let found = permission::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn grant<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError> {
        let inserted = user_permission::Entity::insert(user_permission::ActiveModel {
            user_id: Set(user_id),
            permission_id: Set(permission_id),
        })
        .on_conflict(
            OnConflict::columns([
                user_permission::Column::UserId,
                user_permission::Column::PermissionId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .do_nothing()
        .exec(conn)
        .await
        .map_err(db_err)?;
        Ok(matches!(inserted, TryInsertResult::Inserted(_)))
    }

    async fn revoke<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = user_permission::Entity::delete_many()
            .filter(user_permission::Column::UserId.eq(user_id))
            .filter(user_permission::Column::PermissionId.eq(permission_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn permissions_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<Permission>, DomainError> {
        let rows = permission::Entity::find()
            .join(JoinType::InnerJoin, permission::Relation::UserPermission.def())
            .filter(user_permission::Column::UserId.eq(user_id))
            .order_by_asc(permission::Column::Codename)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{CreditTransaction, Page, UserCredit};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::fields::CreditFields;
use crate::domain::repos::CreditsRepository;
use crate::infra::storage::db::{db_err, fetch_page};
use crate::infra::storage::entity::{credit_transaction, user, user_credit};
use crate::infra::storage::mapper::credit_with_owner;

#[derive(Clone, Default)]
pub struct OrmCreditsRepository;

impl OrmCreditsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CreditsRepository for OrmCreditsRepository {
    async fn get_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Option<UserCredit>, DomainError> {
        let found = user_credit::Entity::find()
            .filter(user_credit::Column::UserId.eq(user_id))
            .find_also_related(user::Entity)
            .one(conn)
            .await
            .map_err(db_err)?;

        Ok(found.map(|(credit, owner)| {
            let username = owner.map(|u| u.username).unwrap_or_default();
            credit_with_owner(credit, username)
        }))
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        balance: Option<i64>,
    ) -> Result<(), DomainError> {
        let m = user_credit::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            balance: balance.map_or(NotSet, Set),
        };
        let _ = m.insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_balance<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        balance: i64,
    ) -> Result<bool, DomainError> {
        let result = user_credit::Entity::update_many()
            .col_expr(user_credit::Column::Balance, Expr::value(balance))
            .filter(user_credit::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn apply_delta<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        delta: i64,
    ) -> Result<bool, DomainError> {
        // Debits keep the balance >= 0, credits keep it <= i64::MAX.
        let bound = if delta < 0 {
            let floor = delta
                .checked_neg()
                .ok_or_else(|| DomainError::validation(CreditFields::AMOUNT, "out of range"))?;
            user_credit::Column::Balance.gte(floor)
        } else {
            user_credit::Column::Balance.lte(i64::MAX - delta)
        };
        let result = user_credit::Entity::update_many()
            .col_expr(
                user_credit::Column::Balance,
                Expr::col(user_credit::Column::Balance).add(delta),
            )
            .filter(user_credit::Column::UserId.eq(user_id))
            .filter(bound)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn append_transaction<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tx: CreditTransaction,
    ) -> Result<(), DomainError> {
        let m = credit_transaction::ActiveModel {
            id: Set(tx.id),
            user_id: Set(tx.user_id),
            amount: Set(tx.amount),
            balance_after: Set(tx.balance_after),
            reason: Set(tx.reason),
            created_at: Set(tx.created_at),
        };
        let _ = m.insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn list_transactions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<CreditTransaction>, DomainError> {
        let select = credit_transaction::Entity::find()
            .filter(credit_transaction::Column::UserId.eq(user_id))
            .order_by_asc(credit_transaction::Column::CreatedAt)
            .order_by_asc(credit_transaction::Column::Id);
        fetch_page(select, conn, limit, offset, Into::into).await
    }
}

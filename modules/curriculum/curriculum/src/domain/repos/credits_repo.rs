use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{CreditTransaction, Page, UserCredit};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[async_trait]
pub trait CreditsRepository: Send + Sync {
    /// The account of `user_id`, joined with the owner's username.
    async fn get_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<Option<UserCredit>, DomainError>;

    /// Insert an account. `balance: None` leaves the column to its default.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
        balance: Option<i64>,
    ) -> Result<(), DomainError>;

    async fn set_balance<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        balance: i64,
    ) -> Result<bool, DomainError>;

    /// Add `delta` to the balance unless the result would be negative.
    ///
    /// Returns `false` when no row matched (missing account or overdraft).
    async fn apply_delta<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        delta: i64,
    ) -> Result<bool, DomainError>;

    async fn append_transaction<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tx: CreditTransaction,
    ) -> Result<(), DomainError>;

    /// Oldest first.
    async fn list_transactions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<CreditTransaction>, DomainError>;
}

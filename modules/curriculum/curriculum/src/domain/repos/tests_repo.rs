use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Test};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for tests and their question sets.
///
/// Returned `Test` values always carry their question ids, sorted.
#[async_trait]
pub trait TestsRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Test>, DomainError>;

    /// Newest first.
    async fn list_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Test>, DomainError>;

    /// Insert the test row only; `created_at` is stamped by the entity hook.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Test, DomainError>;

    /// Link questions, skipping pairs that already exist. Returns rows added.
    async fn add_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<u64, DomainError>;

    /// Returns rows removed.
    async fn remove_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<u64, DomainError>;

    async fn clear_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
    ) -> Result<u64, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

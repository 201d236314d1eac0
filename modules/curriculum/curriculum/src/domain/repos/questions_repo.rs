use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Question};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[async_trait]
pub trait QuestionsRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Question>, DomainError>;

    async fn list_for_taxonomy<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        taxonomy_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Question>, DomainError>;

    /// Subset of `ids` that exist.
    async fn existing_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, DomainError>;

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

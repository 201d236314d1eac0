use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Taxonomy, TaxonomyFilter};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Taxonomy>, DomainError>;

    /// Page through nodes ordered by their codes; filter fields match exactly.
    async fn list_page<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: &TaxonomyFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Taxonomy>, DomainError>;

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        node: Taxonomy,
    ) -> Result<Taxonomy, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        node: Taxonomy,
    ) -> Result<Taxonomy, DomainError>;

    /// Delete a node; its questions are removed by the foreign key cascade.
    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

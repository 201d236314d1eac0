use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Taxonomy, TaxonomyFilter};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::TaxonomyRepository;
use crate::infra::storage::db::{db_err, fetch_page};
use crate::infra::storage::entity::taxonomy;

#[derive(Clone, Default)]
pub struct OrmTaxonomyRepository;

impl OrmTaxonomyRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn to_active(node: &Taxonomy) -> taxonomy::ActiveModel {
    taxonomy::ActiveModel {
        id: Set(node.id),
        subject_code: Set(node.subject_code.clone()),
        grade_code: Set(node.grade_code.clone()),
        theme_code: Set(node.theme_code.clone()),
        unit_code: Set(node.unit_code.clone()),
        outcome_code: Set(node.outcome_code.clone()),
    }
}

#[async_trait]
impl TaxonomyRepository for OrmTaxonomyRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Taxonomy>, DomainError> {
        let found = taxonomy::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_page<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: &TaxonomyFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Taxonomy>, DomainError> {
        let mut select = taxonomy::Entity::find()
            .order_by_asc(taxonomy::Column::SubjectCode)
            .order_by_asc(taxonomy::Column::GradeCode)
            .order_by_asc(taxonomy::Column::OutcomeCode)
            .order_by_asc(taxonomy::Column::Id);
        if let Some(subject) = &filter.subject_code {
            select = select.filter(taxonomy::Column::SubjectCode.eq(subject.as_str()));
        }
        if let Some(grade) = &filter.grade_code {
            select = select.filter(taxonomy::Column::GradeCode.eq(grade.as_str()));
        }
        fetch_page(select, conn, limit, offset, Into::into).await
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        node: Taxonomy,
    ) -> Result<Taxonomy, DomainError> {
        let _ = to_active(&node).insert(conn).await.map_err(db_err)?;
        Ok(node)
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        node: Taxonomy,
    ) -> Result<Taxonomy, DomainError> {
        let _ = to_active(&node).update(conn).await.map_err(db_err)?;
        Ok(node)
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = taxonomy::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

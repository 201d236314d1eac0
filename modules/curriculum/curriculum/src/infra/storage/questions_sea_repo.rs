use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Question};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::QuestionsRepository;
use crate::infra::storage::db::{db_err, fetch_page};
use crate::infra::storage::entity::question;

#[derive(Clone, Default)]
pub struct OrmQuestionsRepository;

impl OrmQuestionsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn to_active(q: &Question) -> question::ActiveModel {
    question::ActiveModel {
        id: Set(q.id),
        taxonomy_id: Set(q.taxonomy_id),
        text: Set(q.text.clone()),
        difficulty_score: Set(q.difficulty_score),
    }
}

#[async_trait]
impl QuestionsRepository for OrmQuestionsRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Question>, DomainError> {
        let found = question::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_for_taxonomy<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        taxonomy_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Question>, DomainError> {
        let select = question::Entity::find()
            .filter(question::Column::TaxonomyId.eq(taxonomy_id))
            .order_by_asc(question::Column::Id);
        fetch_page(select, conn, limit, offset, Into::into).await
    }

    async fn existing_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<Uuid> = question::Entity::find()
            .select_only()
            .column(question::Column::Id)
            .filter(question::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(found)
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError> {
        let _ = to_active(&question).insert(conn).await.map_err(db_err)?;
        Ok(question)
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        question: Question,
    ) -> Result<Question, DomainError> {
        let _ = to_active(&question).update(conn).await.map_err(db_err)?;
        Ok(question)
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = question::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

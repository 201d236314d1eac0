use std::collections::BTreeMap;

use async_trait::async_trait;
use curriculum_db::DbConnTrait;
use curriculum_sdk::{Page, Test};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
    TryInsertResult,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::TestsRepository;
use crate::infra::storage::db::{db_err, fetch_page};
use crate::infra::storage::entity::{test, test_question};

#[derive(Clone, Default)]
pub struct OrmTestsRepository;

impl OrmTestsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn with_questions(model: test::Model, mut question_ids: Vec<Uuid>) -> Test {
    question_ids.sort_unstable();
    Test {
        id: model.id,
        user_id: model.user_id,
        question_ids,
        created_at: model.created_at,
    }
}

async fn question_ids_by_test<C: DbConnTrait + Send + Sync>(
    conn: &C,
    test_ids: Vec<Uuid>,
) -> Result<BTreeMap<Uuid, Vec<Uuid>>, DomainError> {
    let mut by_test: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    if test_ids.is_empty() {
        return Ok(by_test);
    }
    let links = test_question::Entity::find()
        .filter(test_question::Column::TestId.is_in(test_ids))
        .all(conn)
        .await
        .map_err(db_err)?;
    for link in links {
        by_test.entry(link.test_id).or_default().push(link.question_id);
    }
    Ok(by_test)
}

#[async_trait]
impl TestsRepository for OrmTestsRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Test>, DomainError> {
        let Some(model) = test::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        let mut ids = question_ids_by_test(conn, vec![id]).await?;
        Ok(Some(with_questions(model, ids.remove(&id).unwrap_or_default())))
    }

    async fn list_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Page<Test>, DomainError> {
        let select = test::Entity::find()
            .filter(test::Column::UserId.eq(user_id))
            .order_by_desc(test::Column::CreatedAt)
            .order_by_desc(test::Column::Id);
        let page = fetch_page(select, conn, limit, offset, |m| m).await?;

        let mut ids =
            question_ids_by_test(conn, page.items.iter().map(|m| m.id).collect()).await?;
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|m| {
                    let question_ids = ids.remove(&m.id).unwrap_or_default();
                    with_questions(m, question_ids)
                })
                .collect(),
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        })
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Test, DomainError> {
        let m = test::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            created_at: NotSet,
        };
        let model = m.insert(conn).await.map_err(db_err)?;
        Ok(with_questions(model, Vec::new()))
    }

    async fn add_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<u64, DomainError> {
        let mut added = 0;
        for &question_id in question_ids {
            let res = test_question::Entity::insert(test_question::ActiveModel {
                test_id: Set(test_id),
                question_id: Set(question_id),
            })
            .on_conflict(
                OnConflict::columns([
                    test_question::Column::TestId,
                    test_question::Column::QuestionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(conn)
            .await
            .map_err(db_err)?;
            if matches!(res, TryInsertResult::Inserted(_)) {
                added += 1;
            }
        }
        Ok(added)
    }

    async fn remove_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<u64, DomainError> {
        if question_ids.is_empty() {
            return Ok(0);
        }
        let result = test_question::Entity::delete_many()
            .filter(test_question::Column::TestId.eq(test_id))
            .filter(test_question::Column::QuestionId.is_in(question_ids.iter().copied()))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn clear_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        test_id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = test_question::Entity::delete_many()
            .filter(test_question::Column::TestId.eq(test_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = test::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

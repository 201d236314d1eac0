use std::collections::BTreeSet;
use std::sync::Arc;

use curriculum_db::DbConnTrait;
use curriculum_sdk::{ListQuery, NewTest, Page, Test};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{QuestionsRepository, TestsRepository, UsersRepository};
use crate::infra::storage::db::db_err;

/// Tests and their question sets. `created_at` is written once, at insert.
#[derive(Clone)]
pub struct TestsService<R: TestsRepository, U: UsersRepository, Q: QuestionsRepository> {
    repo: Arc<R>,
    users: Arc<U>,
    questions: Arc<Q>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

/// Deduplicate; the result is sorted.
fn unique_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

impl<R: TestsRepository, U: UsersRepository, Q: QuestionsRepository> TestsService<R, U, Q> {
    pub fn new(
        repo: Arc<R>,
        users: Arc<U>,
        questions: Arc<Q>,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            users,
            questions,
            db,
            config,
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.users.get(&self.db, user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }
        Ok(())
    }

    async fn ensure_questions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<(), DomainError> {
        let found: BTreeSet<Uuid> = self
            .questions
            .existing_ids(conn, ids)
            .await?
            .into_iter()
            .collect();
        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(DomainError::not_found("Question", *missing)),
            None => Ok(()),
        }
    }

    async fn load<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Test, DomainError> {
        self.repo
            .get(conn, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Test", id))
    }
}

impl<R: TestsRepository, U: UsersRepository, Q: QuestionsRepository> TestsService<R, U, Q> {
    #[instrument(skip(self, new_test), fields(user_id = %new_test.user_id, questions = new_test.question_ids.len()))]
    pub async fn create_test(&self, new_test: NewTest) -> Result<Test, DomainError> {
        info!("Creating test");

        self.ensure_user(new_test.user_id).await?;
        let question_ids = unique_ids(new_test.question_ids);
        let id = new_test.id.unwrap_or_else(Uuid::now_v7);

        let txn = self.db.begin().await.map_err(db_err)?;
        self.ensure_questions(&txn, &question_ids).await?;
        self.repo.create(&txn, id, new_test.user_id).await?;
        self.repo.add_questions(&txn, id, &question_ids).await?;
        let test = self.load(&txn, id).await?;
        txn.commit().await.map_err(db_err)?;

        info!("Successfully created test with id={}", test.id);
        Ok(test)
    }

    #[instrument(skip(self), fields(test_id = %id))]
    pub async fn get_test(&self, id: Uuid) -> Result<Test, DomainError> {
        debug!("Getting test by id");

        self.load(&self.db, id).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_tests_for_user(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Test>, DomainError> {
        self.ensure_user(user_id).await?;

        let limit = self.config.effective_limit(query.limit);
        let page = self
            .repo
            .list_for_user(&self.db, user_id, limit, query.offset)
            .await?;

        debug!("Successfully listed {} tests in page", page.items.len());
        Ok(page)
    }

    /// Add questions to the set. Questions already present are skipped.
    #[instrument(skip(self, question_ids), fields(test_id = %test_id))]
    pub async fn add_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, DomainError> {
        let question_ids = unique_ids(question_ids);

        let txn = self.db.begin().await.map_err(db_err)?;
        self.load(&txn, test_id).await?;
        self.ensure_questions(&txn, &question_ids).await?;
        let added = self.repo.add_questions(&txn, test_id, &question_ids).await?;
        let test = self.load(&txn, test_id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(added, requested = question_ids.len(), "Questions added to test");
        Ok(test)
    }

    /// Remove questions from the set. Ids not in the set are ignored.
    #[instrument(skip(self, question_ids), fields(test_id = %test_id))]
    pub async fn remove_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, DomainError> {
        let question_ids = unique_ids(question_ids);

        let txn = self.db.begin().await.map_err(db_err)?;
        self.load(&txn, test_id).await?;
        let removed = self
            .repo
            .remove_questions(&txn, test_id, &question_ids)
            .await?;
        let test = self.load(&txn, test_id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(removed, "Questions removed from test");
        Ok(test)
    }

    /// Make the question set exactly `question_ids`.
    #[instrument(skip(self, question_ids), fields(test_id = %test_id))]
    pub async fn replace_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, DomainError> {
        let question_ids = unique_ids(question_ids);

        let txn = self.db.begin().await.map_err(db_err)?;
        self.load(&txn, test_id).await?;
        self.ensure_questions(&txn, &question_ids).await?;
        self.repo.clear_questions(&txn, test_id).await?;
        self.repo.add_questions(&txn, test_id, &question_ids).await?;
        let test = self.load(&txn, test_id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(size = test.question_ids.len(), "Question set replaced");
        Ok(test)
    }

    #[instrument(skip(self), fields(test_id = %id))]
    pub async fn delete_test(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting test");

        if !self.repo.delete(&self.db, id).await? {
            return Err(DomainError::not_found("Test", id));
        }

        info!("Successfully deleted test");
        Ok(())
    }
}

use std::sync::Arc;

use curriculum_sdk::{ListQuery, NewQuestion, Page, Question, QuestionPatch};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::fields::QuestionFields;
use crate::domain::repos::{QuestionsRepository, TaxonomyRepository};

#[derive(Clone)]
pub struct QuestionsService<R: QuestionsRepository, T: TaxonomyRepository> {
    repo: Arc<R>,
    taxonomy: Arc<T>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<R: QuestionsRepository, T: TaxonomyRepository> QuestionsService<R, T> {
    pub fn new(
        repo: Arc<R>,
        taxonomy: Arc<T>,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            taxonomy,
            db,
            config,
        }
    }

    async fn ensure_taxonomy(&self, taxonomy_id: Uuid) -> Result<(), DomainError> {
        if self.taxonomy.get(&self.db, taxonomy_id).await?.is_none() {
            return Err(DomainError::not_found("Taxonomy", taxonomy_id));
        }
        Ok(())
    }
}

fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::validation(
            QuestionFields::TEXT,
            "must not be empty",
        ));
    }
    Ok(())
}

impl<R: QuestionsRepository, T: TaxonomyRepository> QuestionsService<R, T> {
    #[instrument(skip(self, new_question), fields(taxonomy_id = %new_question.taxonomy_id))]
    pub async fn create_question(&self, new_question: NewQuestion) -> Result<Question, DomainError> {
        info!("Creating question");

        validate_text(&new_question.text)?;
        self.ensure_taxonomy(new_question.taxonomy_id).await?;

        let question = Question {
            id: new_question.id.unwrap_or_else(Uuid::now_v7),
            taxonomy_id: new_question.taxonomy_id,
            text: new_question.text,
            difficulty_score: new_question.difficulty_score,
        };
        let question = self.repo.create(&self.db, question).await?;

        info!("Successfully created question with id={}", question.id);
        Ok(question)
    }

    #[instrument(skip(self), fields(question_id = %id))]
    pub async fn get_question(&self, id: Uuid) -> Result<Question, DomainError> {
        debug!("Getting question by id");

        self.repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", id))
    }

    #[instrument(skip(self), fields(taxonomy_id = %taxonomy_id))]
    pub async fn list_questions_for_taxonomy(
        &self,
        taxonomy_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Question>, DomainError> {
        self.ensure_taxonomy(taxonomy_id).await?;

        let limit = self.config.effective_limit(query.limit);
        let page = self
            .repo
            .list_for_taxonomy(&self.db, taxonomy_id, limit, query.offset)
            .await?;

        debug!("Successfully listed {} questions in page", page.items.len());
        Ok(page)
    }

    #[instrument(skip(self, patch), fields(question_id = %id))]
    pub async fn update_question(
        &self,
        id: Uuid,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError> {
        info!("Updating question");

        let mut question = self.get_question(id).await?;

        if let Some(taxonomy_id) = patch.taxonomy_id {
            if taxonomy_id != question.taxonomy_id {
                self.ensure_taxonomy(taxonomy_id).await?;
                question.taxonomy_id = taxonomy_id;
            }
        }
        if let Some(text) = patch.text {
            validate_text(&text)?;
            question.text = text;
        }
        if let Some(score) = patch.difficulty_score {
            question.difficulty_score = score;
        }

        let question = self.repo.update(&self.db, question).await?;

        info!("Successfully updated question");
        Ok(question)
    }

    /// Delete a question; it disappears from every test that held it.
    #[instrument(skip(self), fields(question_id = %id))]
    pub async fn delete_question(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting question");

        if !self.repo.delete(&self.db, id).await? {
            return Err(DomainError::not_found("Question", id));
        }

        info!("Successfully deleted question");
        Ok(())
    }
}

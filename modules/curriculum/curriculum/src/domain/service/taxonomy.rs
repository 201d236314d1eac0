use std::sync::Arc;

use curriculum_sdk::{ListQuery, NewTaxonomy, Page, Taxonomy, TaxonomyFilter, TaxonomyPatch};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{check_len, check_required};
use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::fields::TaxonomyFields;
use crate::domain::repos::TaxonomyRepository;

#[derive(Clone)]
pub struct TaxonomyService<R: TaxonomyRepository> {
    repo: Arc<R>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<R: TaxonomyRepository> TaxonomyService<R> {
    pub fn new(repo: Arc<R>, db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self { repo, db, config }
    }
}

fn validate_node(node: &Taxonomy) -> Result<(), DomainError> {
    let max = TaxonomyFields::CODE_MAX;
    check_required(TaxonomyFields::SUBJECT_CODE, &node.subject_code, max)?;
    check_required(TaxonomyFields::GRADE_CODE, &node.grade_code, max)?;
    check_required(TaxonomyFields::OUTCOME_CODE, &node.outcome_code, max)?;
    if let Some(theme) = &node.theme_code {
        check_len(TaxonomyFields::THEME_CODE, theme, max)?;
    }
    if let Some(unit) = &node.unit_code {
        check_len(TaxonomyFields::UNIT_CODE, unit, max)?;
    }
    Ok(())
}

/// Nodes without a theme or unit are accepted; their display has an empty segment.
fn warn_if_unplaced(node: &Taxonomy) {
    if node.theme_or_unit().is_none() {
        warn!(taxonomy = %node, "taxonomy node has neither theme nor unit code");
    }
}

impl<R: TaxonomyRepository> TaxonomyService<R> {
    #[instrument(skip(self, new_node), fields(subject = %new_node.subject_code, grade = %new_node.grade_code))]
    pub async fn create_taxonomy(&self, new_node: NewTaxonomy) -> Result<Taxonomy, DomainError> {
        info!("Creating taxonomy node");

        let node = Taxonomy {
            id: new_node.id.unwrap_or_else(Uuid::now_v7),
            subject_code: new_node.subject_code,
            grade_code: new_node.grade_code,
            theme_code: new_node.theme_code,
            unit_code: new_node.unit_code,
            outcome_code: new_node.outcome_code,
        };
        validate_node(&node)?;
        warn_if_unplaced(&node);

        let node = self.repo.create(&self.db, node).await?;

        info!(taxonomy = %node, "Successfully created taxonomy node with id={}", node.id);
        Ok(node)
    }

    #[instrument(skip(self), fields(taxonomy_id = %id))]
    pub async fn get_taxonomy(&self, id: Uuid) -> Result<Taxonomy, DomainError> {
        debug!("Getting taxonomy node by id");

        self.repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Taxonomy", id))
    }

    #[instrument(skip(self))]
    pub async fn list_taxonomies(
        &self,
        filter: TaxonomyFilter,
        query: ListQuery,
    ) -> Result<Page<Taxonomy>, DomainError> {
        let limit = self.config.effective_limit(query.limit);
        let page = self
            .repo
            .list_page(&self.db, &filter, limit, query.offset)
            .await?;

        debug!("Successfully listed {} taxonomy nodes in page", page.items.len());
        Ok(page)
    }

    #[instrument(skip(self, patch), fields(taxonomy_id = %id))]
    pub async fn update_taxonomy(
        &self,
        id: Uuid,
        patch: TaxonomyPatch,
    ) -> Result<Taxonomy, DomainError> {
        info!("Updating taxonomy node");

        let mut node = self.get_taxonomy(id).await?;

        if let Some(subject) = patch.subject_code {
            node.subject_code = subject;
        }
        if let Some(grade) = patch.grade_code {
            node.grade_code = grade;
        }
        if let Some(theme) = patch.theme_code {
            node.theme_code = theme;
        }
        if let Some(unit) = patch.unit_code {
            node.unit_code = unit;
        }
        if let Some(outcome) = patch.outcome_code {
            node.outcome_code = outcome;
        }
        validate_node(&node)?;
        warn_if_unplaced(&node);

        let node = self.repo.update(&self.db, node).await?;

        info!(taxonomy = %node, "Successfully updated taxonomy node");
        Ok(node)
    }

    /// Delete a node together with every question tagged to it.
    #[instrument(skip(self), fields(taxonomy_id = %id))]
    pub async fn delete_taxonomy(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting taxonomy node");

        if !self.repo.delete(&self.db, id).await? {
            return Err(DomainError::not_found("Taxonomy", id));
        }

        info!("Successfully deleted taxonomy node");
        Ok(())
    }
}

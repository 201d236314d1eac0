//! Domain service layer: validation and business rules.
//!
//! One service per aggregate, each generic over the repositories it needs:
//! - `users` - accounts, group/permission membership, capability checks
//! - `taxonomy` - curriculum nodes
//! - `questions` - questions tagged to a taxonomy node
//! - `test_sets` - user-owned tests and their question sets
//! - `credits` - credit accounts and the append-only ledger
//!
//! Multi-row writes open a transaction with `begin()` and pass it to the
//! repositories in place of the pooled connection.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    CreditsRepository, QuestionsRepository, TaxonomyRepository, TestsRepository, UsersRepository,
};

mod credits;
mod questions;
mod taxonomy;
mod test_sets;
mod users;

pub use credits::CreditsService;
pub use questions::QuestionsService;
pub use taxonomy::TaxonomyService;
pub use test_sets::TestsService;
pub use users::UsersService;

#[cfg(test)]
mod tests_credits;
#[cfg(test)]
mod tests_taxonomy_questions;
#[cfg(test)]
mod tests_test_sets;
#[cfg(test)]
mod tests_users;

/// Reject values longer than `max` characters.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Reject blank values, then apply `check_len`.
pub(crate) fn check_required(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    check_len(field, value, max)
}

// DI container aggregating all domain services
pub struct AppServices<UR, TR, QR, XR, CR>
where
    UR: UsersRepository + 'static,
    TR: TaxonomyRepository + 'static,
    QR: QuestionsRepository + 'static,
    XR: TestsRepository + 'static,
    CR: CreditsRepository + 'static,
{
    pub users: Arc<UsersService<UR>>,
    pub taxonomy: Arc<TaxonomyService<TR>>,
    pub questions: Arc<QuestionsService<QR, TR>>,
    pub tests: Arc<TestsService<XR, UR, QR>>,
    pub credits: Arc<CreditsService<CR, UR>>,
}

impl<UR, TR, QR, XR, CR> AppServices<UR, TR, QR, XR, CR>
where
    UR: UsersRepository + 'static,
    TR: TaxonomyRepository + 'static,
    QR: QuestionsRepository + 'static,
    XR: TestsRepository + 'static,
    CR: CreditsRepository + 'static,
{
    pub fn new(
        users_repo: UR,
        taxonomy_repo: TR,
        questions_repo: QR,
        tests_repo: XR,
        credits_repo: CR,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        let users_repo = Arc::new(users_repo);
        let taxonomy_repo = Arc::new(taxonomy_repo);
        let questions_repo = Arc::new(questions_repo);

        Self {
            users: Arc::new(UsersService::new(
                Arc::clone(&users_repo),
                db.clone(),
                config.clone(),
            )),
            taxonomy: Arc::new(TaxonomyService::new(
                Arc::clone(&taxonomy_repo),
                db.clone(),
                config.clone(),
            )),
            questions: Arc::new(QuestionsService::new(
                Arc::clone(&questions_repo),
                Arc::clone(&taxonomy_repo),
                db.clone(),
                config.clone(),
            )),
            tests: Arc::new(TestsService::new(
                Arc::new(tests_repo),
                Arc::clone(&users_repo),
                Arc::clone(&questions_repo),
                db.clone(),
                config.clone(),
            )),
            credits: Arc::new(CreditsService::new(
                Arc::new(credits_repo),
                users_repo,
                db,
                config,
            )),
        }
    }
}

//! Wiring of repositories and services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::ServiceConfig;
use crate::domain::service::AppServices;
use crate::infra::storage::{
    OrmCreditsRepository, OrmQuestionsRepository, OrmTaxonomyRepository, OrmTestsRepository,
    OrmUsersRepository,
};
use crate::local_client::CurriculumLocalClient;

pub type ConcreteAppServices = AppServices<
    OrmUsersRepository,
    OrmTaxonomyRepository,
    OrmQuestionsRepository,
    OrmTestsRepository,
    OrmCreditsRepository,
>;

/// Build the service container over an already migrated connection.
#[must_use]
pub fn build_app_services(db: DatabaseConnection, config: ServiceConfig) -> ConcreteAppServices {
    info!(
        default_page_size = config.default_page_size,
        max_page_size = config.max_page_size,
        "Initializing curriculum services"
    );

    AppServices::new(
        OrmUsersRepository::new(),
        OrmTaxonomyRepository::new(),
        OrmQuestionsRepository::new(),
        OrmTestsRepository::new(),
        OrmCreditsRepository::new(),
        db,
        config,
    )
}

/// Build the services and wrap them in the in-process client.
#[must_use]
pub fn build_local_client(db: DatabaseConnection, config: ServiceConfig) -> CurriculumLocalClient {
    CurriculumLocalClient::new(Arc::new(build_app_services(db, config)))
}

//! Curriculum module implementation.
//!
//! The public API is defined in `curriculum-sdk` and re-exported here.
//!
//! - `infra::storage` declares the `SeaORM` entities, relations and migrations
//! - `domain` holds validation, the role policy and one service per aggregate
//! - `local_client` adapts the services to `CurriculumClientV1`

pub use curriculum_sdk::{
    Capability, CurriculumClientV1, CurriculumError, Role, Taxonomy, Test, User, UserCredit,
};

pub mod config;
pub mod local_client;
pub mod module;

pub use config::ServiceConfig;
pub use infra::storage::migrations::Migrator;
pub use local_client::CurriculumLocalClient;
pub use module::{ConcreteAppServices, build_app_services, build_local_client};

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;

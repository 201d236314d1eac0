//! Infrastructure storage layer: everything `SeaORM`-specific.
//!
//! - `entity/` declares tables and relations
//! - `mapper.rs` converts entity models to SDK contract types
//! - `migrations/` holds the schema migrator
//! - `*_sea_repo.rs` implement the domain repository traits

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod credits_sea_repo;
mod questions_sea_repo;
mod taxonomy_sea_repo;
mod tests_sea_repo;
mod users_sea_repo;

pub use credits_sea_repo::OrmCreditsRepository;
pub use questions_sea_repo::OrmQuestionsRepository;
pub use taxonomy_sea_repo::OrmTaxonomyRepository;
pub use tests_sea_repo::OrmTestsRepository;
pub use users_sea_repo::OrmUsersRepository;

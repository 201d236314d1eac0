#![allow(clippy::unwrap_used, clippy::expect_used)]

use curriculum_db::{DbConnConfig, connect};
use curriculum_sdk::{NewQuestion, NewTaxonomy, NewUser, Question, Role, Taxonomy, User};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::infra::storage::migrations::Migrator;
use crate::module::{ConcreteAppServices, build_app_services};

/// Fresh in-memory `SQLite` database with every migration applied.
pub async fn inmem_db() -> DatabaseConnection {
    let db = connect(&DbConnConfig::default())
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn services() -> (ConcreteAppServices, DatabaseConnection) {
    let db = inmem_db().await;
    (build_app_services(db.clone(), ServiceConfig::default()), db)
}

#[must_use]
pub fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        id: None,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "pbkdf2_sha256$600000$salt$hash".to_owned(),
        role,
    }
}

pub async fn seed_user(svc: &ConcreteAppServices, username: &str, role: Role) -> User {
    svc.users
        .create_user(new_user(username, role))
        .await
        .expect("Failed to seed user")
}

#[must_use]
pub fn new_taxonomy(subject: &str, grade: &str, unit: Option<&str>, outcome: &str) -> NewTaxonomy {
    NewTaxonomy {
        id: None,
        subject_code: subject.to_owned(),
        grade_code: grade.to_owned(),
        theme_code: None,
        unit_code: unit.map(str::to_owned),
        outcome_code: outcome.to_owned(),
    }
}

pub async fn seed_taxonomy(svc: &ConcreteAppServices) -> Taxonomy {
    svc.taxonomy
        .create_taxonomy(new_taxonomy("MAT", "5", Some("U1"), "O3"))
        .await
        .expect("Failed to seed taxonomy")
}

pub async fn seed_question(
    svc: &ConcreteAppServices,
    taxonomy_id: Uuid,
    text: &str,
) -> Question {
    svc.questions
        .create_question(NewQuestion {
            id: None,
            taxonomy_id,
            text: text.to_owned(),
            difficulty_score: 3,
        })
        .await
        .expect("Failed to seed question")
}

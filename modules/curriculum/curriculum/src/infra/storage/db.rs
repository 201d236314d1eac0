//! Database error conversion and paging helpers.

use curriculum_db::DbConnTrait;
use curriculum_sdk::Page;
use sea_orm::{
    DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect, Select, SqlErr,
};

use crate::domain::error::DomainError;

/// Classify a `SeaORM` error into a `DomainError`.
///
/// Unique violations become `Conflict`; foreign-key and CHECK violations
/// become `Integrity`; everything else is an opaque `Database` error.
pub fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => DomainError::conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => DomainError::integrity(detail),
        _ if is_check_violation(&e) => DomainError::integrity(e.to_string()),
        _ => DomainError::database(e.to_string()),
    }
}

#[cfg(any(feature = "db-sqlite", feature = "db-pg"))]
fn is_check_violation(e: &DbErr) -> bool {
    use sea_orm::RuntimeErr;
    use sea_orm::sqlx::error::ErrorKind;

    match e {
        DbErr::Exec(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db))) => {
            matches!(db.kind(), ErrorKind::CheckViolation)
        }
        _ => false,
    }
}

#[cfg(not(any(feature = "db-sqlite", feature = "db-pg")))]
fn is_check_violation(_e: &DbErr) -> bool {
    false
}

/// Count `select`, then fetch one offset window of it and map each row.
///
/// Offsets beyond `i64::MAX` cannot be bound by the SQL drivers and are
/// rejected as a validation error.
pub async fn fetch_page<E, C, T, F>(
    select: Select<E>,
    conn: &C,
    limit: u64,
    offset: u64,
    map: F,
) -> Result<Page<T>, DomainError>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
    C: DbConnTrait + Send + Sync,
    F: Fn(E::Model) -> T,
{
    if i64::try_from(offset).is_err() {
        return Err(DomainError::validation(
            "offset",
            format!("must be at most {}", i64::MAX),
        ));
    }

    let total = select.clone().count(conn).await.map_err(db_err)?;
    let rows = select
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(Page {
        items: rows.into_iter().map(map).collect(),
        total,
        limit,
        offset,
    })
}

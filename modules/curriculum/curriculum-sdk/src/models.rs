//! Public models for the `curriculum` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the curriculum module and its consumers.

use std::fmt;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::role::Role;

/// An account. The password hash is write-only and never appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Data for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Already-hashed password; hashing belongs to the authentication layer.
    pub password_hash: String,
    pub role: Role,
}

/// Partial update data for a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// A named permission group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub id: Option<Uuid>,
    pub name: String,
}

/// An individual permission, identified by its codename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: Uuid,
    pub codename: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    pub id: Option<Uuid>,
    pub codename: String,
    pub name: String,
}

/// A curriculum classification node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    pub id: Uuid,
    pub subject_code: String,
    pub grade_code: String,
    pub theme_code: Option<String>,
    pub unit_code: Option<String>,
    pub outcome_code: String,
}

impl Taxonomy {
    /// Theme code when present and non-empty, otherwise the unit code.
    #[must_use]
    pub fn theme_or_unit(&self) -> Option<&str> {
        self.theme_code
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.unit_code.as_deref().filter(|s| !s.is_empty()))
    }
}

/// `subject.grade.theme-or-unit.outcome`, e.g. `MAT.5.U1.O3`.
impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.subject_code,
            self.grade_code,
            self.theme_or_unit().unwrap_or_default(),
            self.outcome_code
        )
    }
}

/// Data for creating a taxonomy node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaxonomy {
    pub id: Option<Uuid>,
    pub subject_code: String,
    pub grade_code: String,
    pub theme_code: Option<String>,
    pub unit_code: Option<String>,
    pub outcome_code: String,
}

/// Partial update for a taxonomy node.
///
/// The nullable codes use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxonomyPatch {
    pub subject_code: Option<String>,
    pub grade_code: Option<String>,
    pub theme_code: Option<Option<String>>,
    pub unit_code: Option<Option<String>>,
    pub outcome_code: Option<String>,
}

/// Exact-match filter for listing taxonomy nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxonomyFilter {
    pub subject_code: Option<String>,
    pub grade_code: Option<String>,
}

/// A question tagged to exactly one taxonomy node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: Uuid,
    pub taxonomy_id: Uuid,
    pub text: String,
    pub difficulty_score: i32,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub id: Option<Uuid>,
    pub taxonomy_id: Uuid,
    pub text: String,
    pub difficulty_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionPatch {
    pub taxonomy_id: Option<Uuid>,
    pub text: Option<String>,
    pub difficulty_score: Option<i32>,
}

/// A user-owned test holding an unordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Sorted for stable output; the set itself has no order.
    pub question_ids: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTest {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub question_ids: Vec<Uuid>,
}

/// A user's credit account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub balance: i64,
}

impl fmt::Display for UserCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.username, self.balance)
    }
}

/// One append-only ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Signed change applied to the balance.
    pub amount: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: OffsetDateTime,
}

/// Offset pagination request. `limit: None` uses the service default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: u64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_more(&self) -> bool {
        let seen = u64::try_from(self.items.len()).unwrap_or(u64::MAX);
        self.offset.saturating_add(seen) < self.total
    }
}

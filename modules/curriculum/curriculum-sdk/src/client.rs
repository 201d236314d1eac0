//! Object-safe client boundary for the `curriculum` module.
//!
//! Register as `Arc<dyn CurriculumClientV1>`; the in-process implementation
//! lives in the `curriculum` crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CurriculumError;
use time::OffsetDateTime;

use crate::models::{
    CreditTransaction, Group, ListQuery, NewGroup, NewPermission, NewQuestion, NewTaxonomy,
    NewTest, NewUser, Page, Permission, Question, QuestionPatch, Taxonomy, TaxonomyFilter,
    TaxonomyPatch, Test, User, UserCredit, UserPatch,
};
use crate::role::{Capability, Role};

#[async_trait]
pub trait CurriculumClientV1: Send + Sync {
    // ==================== Users ====================

    async fn create_user(&self, new_user: NewUser) -> Result<User, CurriculumError>;

    async fn get_user(&self, id: Uuid) -> Result<User, CurriculumError>;

    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<User>, CurriculumError>;

    async fn list_users(
        &self,
        role: Option<Role>,
        query: ListQuery,
    ) -> Result<Page<User>, CurriculumError>;

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, CurriculumError>;

    /// Delete a user together with their tests, credit account and memberships.
    async fn delete_user(&self, id: Uuid) -> Result<(), CurriculumError>;

    /// Store an already hashed password.
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), CurriculumError>;

    /// Stamp `last_login` with the current time and return it.
    async fn record_login(&self, id: Uuid) -> Result<OffsetDateTime, CurriculumError>;

    async fn has_capability(
        &self,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<bool, CurriculumError>;

    // ==================== Groups & permissions ====================

    async fn create_group(&self, new_group: NewGroup) -> Result<Group, CurriculumError>;

    async fn list_groups(&self) -> Result<Vec<Group>, CurriculumError>;

    /// `false` when the user was already a member.
    async fn add_user_to_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, CurriculumError>;

    async fn remove_user_from_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, CurriculumError>;

    async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, CurriculumError>;

    async fn create_permission(
        &self,
        new_permission: NewPermission,
    ) -> Result<Permission, CurriculumError>;

    /// `false` when the permission was already granted.
    async fn grant_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, CurriculumError>;

    async fn revoke_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, CurriculumError>;

    async fn list_user_permissions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Permission>, CurriculumError>;

    // ==================== Taxonomy ====================

    async fn create_taxonomy(&self, new_node: NewTaxonomy) -> Result<Taxonomy, CurriculumError>;

    async fn get_taxonomy(&self, id: Uuid) -> Result<Taxonomy, CurriculumError>;

    async fn list_taxonomies(
        &self,
        filter: TaxonomyFilter,
        query: ListQuery,
    ) -> Result<Page<Taxonomy>, CurriculumError>;

    async fn update_taxonomy(
        &self,
        id: Uuid,
        patch: TaxonomyPatch,
    ) -> Result<Taxonomy, CurriculumError>;

    /// Delete a taxonomy node and every question tagged to it.
    async fn delete_taxonomy(&self, id: Uuid) -> Result<(), CurriculumError>;

    // ==================== Questions ====================

    async fn create_question(&self, new_question: NewQuestion)
    -> Result<Question, CurriculumError>;

    async fn get_question(&self, id: Uuid) -> Result<Question, CurriculumError>;

    async fn list_questions_for_taxonomy(
        &self,
        taxonomy_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Question>, CurriculumError>;

    async fn update_question(
        &self,
        id: Uuid,
        patch: QuestionPatch,
    ) -> Result<Question, CurriculumError>;

    async fn delete_question(&self, id: Uuid) -> Result<(), CurriculumError>;

    // ==================== Tests ====================

    async fn create_test(&self, new_test: NewTest) -> Result<Test, CurriculumError>;

    async fn get_test(&self, id: Uuid) -> Result<Test, CurriculumError>;

    async fn list_tests_for_user(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Test>, CurriculumError>;

    async fn add_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError>;

    async fn remove_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError>;

    /// Make the question set exactly `question_ids`.
    async fn replace_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError>;

    async fn delete_test(&self, id: Uuid) -> Result<(), CurriculumError>;

    // ==================== Credits ====================

    /// Open the single credit account of a user; balance defaults to 0.
    async fn open_credit_account(
        &self,
        user_id: Uuid,
        initial_balance: Option<i64>,
    ) -> Result<UserCredit, CurriculumError>;

    async fn get_credit(&self, user_id: Uuid) -> Result<UserCredit, CurriculumError>;

    /// Overwrite the balance; the difference is recorded in the ledger.
    async fn set_balance(&self, user_id: Uuid, balance: i64)
    -> Result<UserCredit, CurriculumError>;

    async fn adjust_balance(
        &self,
        user_id: Uuid,
        amount: i64,
        reason: String,
    ) -> Result<UserCredit, CurriculumError>;

    async fn list_credit_transactions(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<CreditTransaction>, CurriculumError>;
}

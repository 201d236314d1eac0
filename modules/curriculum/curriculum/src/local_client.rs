//! Local implementation of `CurriculumClientV1`.
//!
//! Used for in-process calls. It delegates to the domain services and
//! converts errors to SDK error types.

use std::sync::Arc;

use async_trait::async_trait;
use curriculum_sdk::{
    Capability, CreditTransaction, CurriculumClientV1, CurriculumError, Group, ListQuery,
    NewGroup, NewPermission, NewQuestion, NewTaxonomy, NewTest, NewUser, Page, Permission,
    Question, QuestionPatch, Role, Taxonomy, TaxonomyFilter, TaxonomyPatch, Test, User,
    UserCredit, UserPatch,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::module::ConcreteAppServices;

pub struct CurriculumLocalClient {
    services: Arc<ConcreteAppServices>,
}

impl CurriculumLocalClient {
    #[must_use]
    pub fn new(services: Arc<ConcreteAppServices>) -> Self {
        Self { services }
    }

    #[must_use]
    pub fn services(&self) -> &Arc<ConcreteAppServices> {
        &self.services
    }
}

#[async_trait]
impl CurriculumClientV1 for CurriculumLocalClient {
    // Users

    async fn create_user(&self, new_user: NewUser) -> Result<User, CurriculumError> {
        self.services
            .users
            .create_user(new_user)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, CurriculumError> {
        self.services.users.get_user(id).await.map_err(Into::into)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, CurriculumError> {
        self.services
            .users
            .find_by_username(username)
            .await
            .map_err(Into::into)
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        query: ListQuery,
    ) -> Result<Page<User>, CurriculumError> {
        self.services
            .users
            .list_users(role, query)
            .await
            .map_err(Into::into)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, CurriculumError> {
        self.services
            .users
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), CurriculumError> {
        self.services.users.delete_user(id).await.map_err(Into::into)
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), CurriculumError> {
        self.services
            .users
            .set_password_hash(id, password_hash)
            .await
            .map_err(Into::into)
    }

    async fn record_login(&self, id: Uuid) -> Result<OffsetDateTime, CurriculumError> {
        self.services.users.record_login(id).await.map_err(Into::into)
    }

    async fn has_capability(
        &self,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<bool, CurriculumError> {
        self.services
            .users
            .has_capability(user_id, capability)
            .await
            .map_err(Into::into)
    }

    // Groups & permissions

    async fn create_group(&self, new_group: NewGroup) -> Result<Group, CurriculumError> {
        self.services
            .users
            .create_group(new_group)
            .await
            .map_err(Into::into)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, CurriculumError> {
        self.services.users.list_groups().await.map_err(Into::into)
    }

    async fn add_user_to_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, CurriculumError> {
        self.services
            .users
            .add_user_to_group(user_id, group_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_user_from_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<bool, CurriculumError> {
        self.services
            .users
            .remove_user_from_group(user_id, group_id)
            .await
            .map_err(Into::into)
    }

    async fn list_user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, CurriculumError> {
        self.services
            .users
            .list_user_groups(user_id)
            .await
            .map_err(Into::into)
    }

    async fn create_permission(
        &self,
        new_permission: NewPermission,
    ) -> Result<Permission, CurriculumError> {
        self.services
            .users
            .create_permission(new_permission)
            .await
            .map_err(Into::into)
    }

    async fn grant_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, CurriculumError> {
        self.services
            .users
            .grant_permission(user_id, permission_id)
            .await
            .map_err(Into::into)
    }

    async fn revoke_permission(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, CurriculumError> {
        self.services
            .users
            .revoke_permission(user_id, permission_id)
            .await
            .map_err(Into::into)
    }

    async fn list_user_permissions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Permission>, CurriculumError> {
        self.services
            .users
            .list_user_permissions(user_id)
            .await
            .map_err(Into::into)
    }

    // Taxonomy

    async fn create_taxonomy(&self, new_node: NewTaxonomy) -> Result<Taxonomy, CurriculumError> {
        self.services
            .taxonomy
            .create_taxonomy(new_node)
            .await
            .map_err(Into::into)
    }

    async fn get_taxonomy(&self, id: Uuid) -> Result<Taxonomy, CurriculumError> {
        self.services
            .taxonomy
            .get_taxonomy(id)
            .await
            .map_err(Into::into)
    }

    async fn list_taxonomies(
        &self,
        filter: TaxonomyFilter,
        query: ListQuery,
    ) -> Result<Page<Taxonomy>, CurriculumError> {
        self.services
            .taxonomy
            .list_taxonomies(filter, query)
            .await
            .map_err(Into::into)
    }

    async fn update_taxonomy(
        &self,
        id: Uuid,
        patch: TaxonomyPatch,
    ) -> Result<Taxonomy, CurriculumError> {
        self.services
            .taxonomy
            .update_taxonomy(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_taxonomy(&self, id: Uuid) -> Result<(), CurriculumError> {
        self.services
            .taxonomy
            .delete_taxonomy(id)
            .await
            .map_err(Into::into)
    }

    // Questions

    async fn create_question(
        &self,
        new_question: NewQuestion,
    ) -> Result<Question, CurriculumError> {
        self.services
            .questions
            .create_question(new_question)
            .await
            .map_err(Into::into)
    }

    async fn get_question(&self, id: Uuid) -> Result<Question, CurriculumError> {
        self.services
            .questions
            .get_question(id)
            .await
            .map_err(Into::into)
    }

    async fn list_questions_for_taxonomy(
        &self,
        taxonomy_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Question>, CurriculumError> {
        self.services
            .questions
            .list_questions_for_taxonomy(taxonomy_id, query)
            .await
            .map_err(Into::into)
    }

    async fn update_question(
        &self,
        id: Uuid,
        patch: QuestionPatch,
    ) -> Result<Question, CurriculumError> {
        self.services
            .questions
            .update_question(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_question(&self, id: Uuid) -> Result<(), CurriculumError> {
        self.services
            .questions
            .delete_question(id)
            .await
            .map_err(Into::into)
    }

    // Tests

    async fn create_test(&self, new_test: NewTest) -> Result<Test, CurriculumError> {
        self.services
            .tests
            .create_test(new_test)
            .await
            .map_err(Into::into)
    }

    async fn get_test(&self, id: Uuid) -> Result<Test, CurriculumError> {
        self.services.tests.get_test(id).await.map_err(Into::into)
    }

    async fn list_tests_for_user(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<Test>, CurriculumError> {
        self.services
            .tests
            .list_tests_for_user(user_id, query)
            .await
            .map_err(Into::into)
    }

    async fn add_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError> {
        self.services
            .tests
            .add_questions(test_id, question_ids)
            .await
            .map_err(Into::into)
    }

    async fn remove_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError> {
        self.services
            .tests
            .remove_questions(test_id, question_ids)
            .await
            .map_err(Into::into)
    }

    async fn replace_questions(
        &self,
        test_id: Uuid,
        question_ids: Vec<Uuid>,
    ) -> Result<Test, CurriculumError> {
        self.services
            .tests
            .replace_questions(test_id, question_ids)
            .await
            .map_err(Into::into)
    }

    async fn delete_test(&self, id: Uuid) -> Result<(), CurriculumError> {
        self.services.tests.delete_test(id).await.map_err(Into::into)
    }

    // Credits

    async fn open_credit_account(
        &self,
        user_id: Uuid,
        initial_balance: Option<i64>,
    ) -> Result<UserCredit, CurriculumError> {
        self.services
            .credits
            .open_account(user_id, initial_balance)
            .await
            .map_err(Into::into)
    }

    async fn get_credit(&self, user_id: Uuid) -> Result<UserCredit, CurriculumError> {
        self.services
            .credits
            .get_credit(user_id)
            .await
            .map_err(Into::into)
    }

    async fn set_balance(
        &self,
        user_id: Uuid,
        balance: i64,
    ) -> Result<UserCredit, CurriculumError> {
        self.services
            .credits
            .set_balance(user_id, balance)
            .await
            .map_err(Into::into)
    }

    async fn adjust_balance(
        &self,
        user_id: Uuid,
        amount: i64,
        reason: String,
    ) -> Result<UserCredit, CurriculumError> {
        self.services
            .credits
            .adjust_balance(user_id, amount, reason)
            .await
            .map_err(Into::into)
    }

    async fn list_credit_transactions(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<CreditTransaction>, CurriculumError> {
        self.services
            .credits
            .list_transactions(user_id, query)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{inmem_db, new_user};

    async fn client() -> CurriculumLocalClient {
        crate::build_local_client(inmem_db().await, crate::ServiceConfig::default())
    }

    #[tokio::test]
    async fn errors_surface_as_sdk_errors() {
        let client = client().await;
        let missing = Uuid::now_v7();

        let err = client.get_user(missing).await.unwrap_err();
        assert_eq!(err, CurriculumError::not_found("User", missing));

        let err = client
            .create_user(NewUser {
                username: String::new(),
                ..new_user("x", Role::Student)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CurriculumError::Validation { .. }));
    }

    #[tokio::test]
    async fn client_covers_the_whole_flow() {
        let client = client().await;

        let teacher = client
            .create_user(new_user("ogretmen1", Role::Teacher))
            .await
            .unwrap();
        assert!(client
            .has_capability(teacher.id, Capability::ManageQuestions)
            .await
            .unwrap());

        let node = client
            .create_taxonomy(NewTaxonomy {
                id: None,
                subject_code: "MAT".to_owned(),
                grade_code: "5".to_owned(),
                theme_code: None,
                unit_code: Some("U1".to_owned()),
                outcome_code: "O3".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(node.to_string(), "MAT.5.U1.O3");

        let question = client
            .create_question(NewQuestion {
                id: None,
                taxonomy_id: node.id,
                text: "2 + 3 = ?".to_owned(),
                difficulty_score: 1,
            })
            .await
            .unwrap();

        let test = client
            .create_test(NewTest {
                id: None,
                user_id: teacher.id,
                question_ids: vec![question.id],
            })
            .await
            .unwrap();
        assert_eq!(test.question_ids, vec![question.id]);

        let credit = client.open_credit_account(teacher.id, None).await.unwrap();
        assert_eq!(credit.balance, 0);

        let err = client
            .adjust_balance(teacher.id, -5, "test purchase".to_owned())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CurriculumError::InsufficientCredits {
                user_id: teacher.id,
                balance: 0,
                requested: -5,
            }
        );
    }

    #[tokio::test]
    async fn client_exposes_membership_and_balance_operations() {
        let client = client().await;
        let user = client
            .create_user(new_user("kurum1", Role::Institution))
            .await
            .unwrap();

        let found = client.find_user_by_username("kurum1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        client
            .set_password_hash(user.id, "argon2$x".to_owned())
            .await
            .unwrap();
        let at = client.record_login(user.id).await.unwrap();
        let stored = client.get_user(user.id).await.unwrap().last_login;
        assert_eq!(
            stored.map(|t| t.unix_timestamp()),
            Some(at.unix_timestamp())
        );

        let group = client
            .create_group(NewGroup {
                id: None,
                name: "kurumlar".to_owned(),
            })
            .await
            .unwrap();
        assert!(client.add_user_to_group(user.id, group.id).await.unwrap());
        assert_eq!(client.list_groups().await.unwrap(), vec![group.clone()]);
        assert_eq!(client.list_user_groups(user.id).await.unwrap(), vec![group.clone()]);
        assert!(client.remove_user_from_group(user.id, group.id).await.unwrap());

        let perm = client
            .create_permission(NewPermission {
                id: None,
                codename: "view_credit".to_owned(),
                name: "Can view credit".to_owned(),
            })
            .await
            .unwrap();
        assert!(client.grant_permission(user.id, perm.id).await.unwrap());
        assert_eq!(client.list_user_permissions(user.id).await.unwrap(), vec![perm.clone()]);
        assert!(client.revoke_permission(user.id, perm.id).await.unwrap());

        client.open_credit_account(user.id, None).await.unwrap();
        let credit = client.set_balance(user.id, 25).await.unwrap();
        assert_eq!(credit.balance, 25);

        let test = client
            .create_test(NewTest {
                id: None,
                user_id: user.id,
                question_ids: vec![],
            })
            .await
            .unwrap();
        let test = client.replace_questions(test.id, vec![]).await.unwrap();
        assert!(test.question_ids.is_empty());

        let err = client
            .list_users(
                None,
                ListQuery {
                    limit: None,
                    offset: u64::MAX,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CurriculumError::Validation { .. }));
    }
}

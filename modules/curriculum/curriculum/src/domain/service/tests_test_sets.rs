#![allow(clippy::unwrap_used, clippy::expect_used)]

use curriculum_sdk::{ListQuery, NewTest, Role};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{test, test_question};
use crate::test_support::{seed_question, seed_taxonomy, seed_user, services};

#[tokio::test]
async fn created_at_is_stamped_once() {
    let (svc, _db) = services().await;
    let owner = seed_user(&svc, "ogr", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q1 = seed_question(&svc, node.id, "q1").await;
    let q2 = seed_question(&svc, node.id, "q2").await;

    let created = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q1.id],
        })
        .await
        .unwrap();

    svc.tests.add_questions(created.id, vec![q2.id]).await.unwrap();
    svc.tests.remove_questions(created.id, vec![q1.id]).await.unwrap();
    let replaced = svc
        .tests
        .replace_questions(created.id, vec![q1.id, q2.id])
        .await
        .unwrap();

    assert_eq!(replaced.created_at, created.created_at);
    let fetched = svc.tests.get_test(created.id).await.unwrap();
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn adding_a_question_twice_keeps_one_membership() {
    let (svc, db) = services().await;
    let owner = seed_user(&svc, "ogr", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "q").await;

    let t = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q.id, q.id],
        })
        .await
        .unwrap();
    assert_eq!(t.question_ids, vec![q.id]);

    let t = svc.tests.add_questions(t.id, vec![q.id]).await.unwrap();
    assert_eq!(t.question_ids, vec![q.id]);
    assert_eq!(test_question::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_question_aborts_the_whole_write() {
    let (svc, db) = services().await;
    let owner = seed_user(&svc, "ogr", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "q").await;
    let missing = Uuid::now_v7();

    let err = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q.id, missing],
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found("Question", missing));
    assert_eq!(test::Entity::find().count(&db).await.unwrap(), 0);

    let t = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![],
        })
        .await
        .unwrap();
    let err = svc
        .tests
        .add_questions(t.id, vec![q.id, missing])
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found("Question", missing));
    assert!(svc.tests.get_test(t.id).await.unwrap().question_ids.is_empty());
}

#[tokio::test]
async fn test_owner_must_exist() {
    let (svc, _db) = services().await;
    let ghost = Uuid::now_v7();

    let err = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: ghost,
            question_ids: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found("User", ghost));
}

#[tokio::test]
async fn replace_questions_sets_exact_membership() {
    let (svc, _db) = services().await;
    let owner = seed_user(&svc, "ogr", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q1 = seed_question(&svc, node.id, "q1").await;
    let q2 = seed_question(&svc, node.id, "q2").await;
    let q3 = seed_question(&svc, node.id, "q3").await;

    let t = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q1.id, q2.id],
        })
        .await
        .unwrap();

    let t = svc
        .tests
        .replace_questions(t.id, vec![q3.id, q2.id])
        .await
        .unwrap();
    let mut expected = vec![q2.id, q3.id];
    expected.sort_unstable();
    assert_eq!(t.question_ids, expected);

    let t = svc.tests.replace_questions(t.id, vec![]).await.unwrap();
    assert!(t.question_ids.is_empty());
}

#[tokio::test]
async fn list_tests_for_user_returns_only_their_tests() {
    let (svc, _db) = services().await;
    let alice = seed_user(&svc, "alice", Role::Student).await;
    let bob = seed_user(&svc, "bob", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "q").await;

    for owner in [alice.id, alice.id, bob.id] {
        svc.tests
            .create_test(NewTest {
                id: None,
                user_id: owner,
                question_ids: vec![q.id],
            })
            .await
            .unwrap();
    }

    let page = svc
        .tests
        .list_tests_for_user(alice.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|t| t.user_id == alice.id));
    assert!(page.items.iter().all(|t| t.question_ids == vec![q.id]));
}

#[tokio::test]
async fn deleting_a_test_keeps_its_questions() {
    let (svc, db) = services().await;
    let owner = seed_user(&svc, "ogr", Role::Student).await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "q").await;
    let t = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q.id],
        })
        .await
        .unwrap();

    svc.tests.delete_test(t.id).await.unwrap();

    assert_eq!(test_question::Entity::find().count(&db).await.unwrap(), 0);
    assert!(svc.questions.get_question(q.id).await.is_ok());
    assert_eq!(
        svc.tests.get_test(t.id).await.unwrap_err(),
        DomainError::not_found("Test", t.id)
    );
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use curriculum_sdk::{
    ListQuery, NewQuestion, NewTest, QuestionPatch, Role, TaxonomyFilter, TaxonomyPatch,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::test_support::{
    new_taxonomy, seed_question, seed_taxonomy, seed_user, services,
};

#[tokio::test]
async fn taxonomy_displays_with_unit_when_theme_missing() {
    let (svc, _db) = services().await;

    let node = seed_taxonomy(&svc).await;
    assert_eq!(node.to_string(), "MAT.5.U1.O3");

    let fetched = svc.taxonomy.get_taxonomy(node.id).await.unwrap();
    assert_eq!(fetched.to_string(), "MAT.5.U1.O3");
    assert_eq!(fetched.theme_code, None);
}

#[tokio::test]
async fn theme_takes_precedence_and_can_be_cleared() {
    let (svc, _db) = services().await;
    let node = seed_taxonomy(&svc).await;

    let themed = svc
        .taxonomy
        .update_taxonomy(
            node.id,
            TaxonomyPatch {
                theme_code: Some(Some("T2".to_owned())),
                ..TaxonomyPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(themed.to_string(), "MAT.5.T2.O3");

    let cleared = svc
        .taxonomy
        .update_taxonomy(
            node.id,
            TaxonomyPatch {
                theme_code: Some(None),
                unit_code: Some(None),
                ..TaxonomyPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.to_string(), "MAT.5..O3");
    assert_eq!(
        svc.taxonomy.get_taxonomy(node.id).await.unwrap().unit_code,
        None
    );
}

#[tokio::test]
async fn taxonomy_codes_are_validated() {
    let (svc, _db) = services().await;

    let err = svc
        .taxonomy
        .create_taxonomy(new_taxonomy("MATEMATIK_5", "5", Some("U1"), "O1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "subject_code"));

    let err = svc
        .taxonomy
        .create_taxonomy(new_taxonomy("MAT", "5", Some("U1"), ""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "outcome_code"));

    // Neither theme nor unit is accepted.
    assert!(svc
        .taxonomy
        .create_taxonomy(new_taxonomy("MAT", "5", None, "O1"))
        .await
        .is_ok());
}

#[tokio::test]
async fn identical_code_tuples_are_allowed() {
    let (svc, _db) = services().await;
    let a = seed_taxonomy(&svc).await;
    let b = seed_taxonomy(&svc).await;
    assert_ne!(a.id, b.id);
    assert_eq!(a.to_string(), b.to_string());
}

#[tokio::test]
async fn list_taxonomies_filters_by_subject_and_grade() {
    let (svc, _db) = services().await;
    for (subject, grade) in [("MAT", "5"), ("MAT", "6"), ("FEN", "5")] {
        svc.taxonomy
            .create_taxonomy(new_taxonomy(subject, grade, Some("U1"), "O1"))
            .await
            .unwrap();
    }

    let math = svc
        .taxonomy
        .list_taxonomies(
            TaxonomyFilter {
                subject_code: Some("MAT".to_owned()),
                grade_code: None,
            },
            ListQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(math.total, 2);

    let fifth = svc
        .taxonomy
        .list_taxonomies(
            TaxonomyFilter {
                subject_code: None,
                grade_code: Some("5".to_owned()),
            },
            ListQuery::default(),
        )
        .await
        .unwrap();
    let subjects: Vec<_> = fifth.items.iter().map(|t| t.subject_code.as_str()).collect();
    assert_eq!(subjects, vec!["FEN", "MAT"]);
}

#[tokio::test]
async fn question_requires_existing_taxonomy_and_text() {
    let (svc, _db) = services().await;
    let missing = Uuid::now_v7();

    let err = svc
        .questions
        .create_question(NewQuestion {
            id: None,
            taxonomy_id: missing,
            text: "?".to_owned(),
            difficulty_score: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found("Taxonomy", missing));

    let node = seed_taxonomy(&svc).await;
    let err = svc
        .questions
        .create_question(NewQuestion {
            id: None,
            taxonomy_id: node.id,
            text: "   ".to_owned(),
            difficulty_score: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn question_update_can_move_between_nodes() {
    let (svc, _db) = services().await;
    let from = seed_taxonomy(&svc).await;
    let to = svc
        .taxonomy
        .create_taxonomy(new_taxonomy("MAT", "6", Some("U2"), "O1"))
        .await
        .unwrap();
    let q = seed_question(&svc, from.id, "Kesirleri sıralayınız").await;
    assert_eq!(q.to_string(), "Kesirleri sıralayınız");

    let moved = svc
        .questions
        .update_question(
            q.id,
            QuestionPatch {
                taxonomy_id: Some(to.id),
                difficulty_score: Some(-2),
                ..QuestionPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.taxonomy_id, to.id);
    assert_eq!(moved.difficulty_score, -2);

    let left = svc
        .questions
        .list_questions_for_taxonomy(from.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(left.total, 0);
    let arrived = svc
        .questions
        .list_questions_for_taxonomy(to.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(arrived.items, vec![moved]);
}

#[tokio::test]
async fn deleting_taxonomy_removes_its_questions() {
    let (svc, _db) = services().await;
    let node = seed_taxonomy(&svc).await;
    let other = svc
        .taxonomy
        .create_taxonomy(new_taxonomy("FEN", "5", Some("U1"), "O1"))
        .await
        .unwrap();
    let q1 = seed_question(&svc, node.id, "q1").await;
    let q2 = seed_question(&svc, node.id, "q2").await;
    let kept = seed_question(&svc, other.id, "q3").await;

    let owner = seed_user(&svc, "ogretmen", Role::Teacher).await;
    let test = svc
        .tests
        .create_test(NewTest {
            id: None,
            user_id: owner.id,
            question_ids: vec![q1.id, kept.id],
        })
        .await
        .unwrap();

    svc.taxonomy.delete_taxonomy(node.id).await.unwrap();

    for gone in [q1.id, q2.id] {
        assert_eq!(
            svc.questions.get_question(gone).await.unwrap_err(),
            DomainError::not_found("Question", gone)
        );
    }
    assert!(svc.questions.get_question(kept.id).await.is_ok());

    // The test survives and only loses the removed question.
    let test = svc.tests.get_test(test.id).await.unwrap();
    assert_eq!(test.question_ids, vec![kept.id]);
}

#[tokio::test]
async fn deleting_question_twice_is_not_found() {
    let (svc, _db) = services().await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "q").await;

    svc.questions.delete_question(q.id).await.unwrap();
    assert_eq!(
        svc.questions.delete_question(q.id).await.unwrap_err(),
        DomainError::not_found("Question", q.id)
    );
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use curriculum_sdk::{Capability, ListQuery, NewGroup, NewPermission, NewTest, Role, UserPatch};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Statement};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{
    credit_transaction, test, user_credit, user_group, user_permission,
};
use crate::test_support::{new_user, seed_question, seed_taxonomy, seed_user, services};

fn raw_user_insert(role: &str) -> String {
    format!(
        "INSERT INTO users (id, username, email, first_name, last_name, password, role, \
         is_active, is_staff, is_superuser, date_joined) \
         VALUES ('{}', 'raw_{role}', '', '', '', 'h', '{role}', 1, 0, 0, '2024-01-01 00:00:00+00:00')",
        Uuid::now_v7()
    )
}

#[tokio::test]
async fn create_and_get_user_round_trips_profile() {
    let (svc, _db) = services().await;

    let created = seed_user(&svc, "bayi1", Role::Dealer).await;
    assert!(created.is_active);
    assert!(!created.is_staff);
    assert!(!created.is_superuser);
    assert!(created.last_login.is_none());
    assert_eq!(created.to_string(), "bayi1");

    let fetched = svc.users.get_user(created.id).await.unwrap();
    assert_eq!(fetched.username, "bayi1");
    assert_eq!(fetched.role, Role::Dealer);
    assert_eq!(fetched.email, "bayi1@example.com");

    let by_name = svc.users.find_by_username("bayi1").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(created.id));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (svc, _db) = services().await;
    seed_user(&svc, "kurum1", Role::Institution).await;

    let err = svc
        .users
        .create_user(new_user("kurum1", Role::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }), "{err:?}");
}

#[tokio::test]
async fn invalid_profile_fields_are_rejected() {
    let (svc, _db) = services().await;

    let mut long_name = new_user("x", Role::Student);
    long_name.username = "u".repeat(151);
    let err = svc.users.create_user(long_name).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "username"));

    let mut bad_email = new_user("y", Role::Student);
    bad_email.email = "not-an-address".to_owned();
    let err = svc.users.create_user(bad_email).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "email"));

    let mut no_email = new_user("z", Role::Student);
    no_email.email = String::new();
    assert!(svc.users.create_user(no_email).await.is_ok());
}

#[tokio::test]
async fn storage_rejects_unknown_role_codes() {
    let (_svc, db) = services().await;
    let backend = db.get_database_backend();

    let rejected = db
        .execute(Statement::from_string(backend, raw_user_insert("HACKER")))
        .await
        .unwrap_err();
    assert!(
        matches!(db_err(rejected), DomainError::Integrity { .. }),
        "CHECK violation must be classified"
    );

    let accepted = db
        .execute(Statement::from_string(backend, raw_user_insert("OGRENCI")))
        .await;
    assert!(accepted.is_ok(), "{accepted:?}");
}

#[tokio::test]
async fn update_user_changes_role_and_flags() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr1", Role::Student).await;

    let updated = svc
        .users
        .update_user(
            user.id,
            UserPatch {
                role: Some(Role::Teacher),
                is_staff: Some(true),
                first_name: Some("Ayşe".to_owned()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Teacher);
    assert!(updated.is_staff);

    let fetched = svc.users.get_user(user.id).await.unwrap();
    assert_eq!(fetched.role, Role::Teacher);
    assert_eq!(fetched.first_name, "Ayşe");
    assert_eq!(fetched.username, "ogr1");
}

#[tokio::test]
async fn list_users_filters_by_role_and_pages() {
    let (svc, _db) = services().await;
    seed_user(&svc, "a_ogr", Role::Student).await;
    seed_user(&svc, "b_ogr", Role::Student).await;
    seed_user(&svc, "c_ogr", Role::Student).await;
    seed_user(&svc, "admin", Role::Admin).await;

    let students = svc
        .users
        .list_users(
            Some(Role::Student),
            ListQuery {
                limit: Some(2),
                offset: 0,
            },
        )
        .await
        .unwrap();
    assert_eq!(students.total, 3);
    assert_eq!(students.items.len(), 2);
    assert_eq!(students.items[0].username, "a_ogr");
    assert!(students.has_more());

    let everyone = svc.users.list_users(None, ListQuery::default()).await.unwrap();
    assert_eq!(everyone.total, 4);
}

#[tokio::test]
async fn offsets_beyond_i64_are_rejected() {
    let (svc, _db) = services().await;
    seed_user(&svc, "ogr", Role::Student).await;

    let err = svc
        .users
        .list_users(
            None,
            ListQuery {
                limit: None,
                offset: u64::MAX,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "offset"));

    let past_end = svc
        .users
        .list_users(
            None,
            ListQuery {
                limit: None,
                offset: u64::try_from(i64::MAX).unwrap(),
            },
        )
        .await
        .unwrap();
    assert_eq!(past_end.total, 1);
    assert!(past_end.items.is_empty());
}

#[tokio::test]
async fn password_and_login_updates() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogretmen", Role::Teacher).await;

    svc.users
        .set_password_hash(user.id, "argon2$new".to_owned())
        .await
        .unwrap();
    let at = svc.users.record_login(user.id).await.unwrap();
    let fetched = svc.users.get_user(user.id).await.unwrap();
    assert_eq!(
        fetched.last_login.map(|t| t.unix_timestamp()),
        Some(at.unix_timestamp())
    );

    let missing = Uuid::now_v7();
    assert_eq!(
        svc.users.record_login(missing).await.unwrap_err(),
        DomainError::not_found("User", missing)
    );
}

#[tokio::test]
async fn groups_and_permissions_have_set_semantics() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "kurum", Role::Institution).await;

    let group = svc
        .users
        .create_group(NewGroup {
            id: None,
            name: "editors".to_owned(),
        })
        .await
        .unwrap();
    assert!(svc.users.add_user_to_group(user.id, group.id).await.unwrap());
    assert!(!svc.users.add_user_to_group(user.id, group.id).await.unwrap());
    assert_eq!(svc.users.list_user_groups(user.id).await.unwrap(), vec![group.clone()]);

    let perm = svc
        .users
        .create_permission(NewPermission {
            id: None,
            codename: "add_question".to_owned(),
            name: "Can add question".to_owned(),
        })
        .await
        .unwrap();
    assert!(svc.users.grant_permission(user.id, perm.id).await.unwrap());
    assert!(!svc.users.grant_permission(user.id, perm.id).await.unwrap());
    assert_eq!(svc.users.list_user_permissions(user.id).await.unwrap(), vec![perm.clone()]);

    assert!(svc.users.revoke_permission(user.id, perm.id).await.unwrap());
    assert!(svc.users.list_user_permissions(user.id).await.unwrap().is_empty());
    assert!(svc.users.remove_user_from_group(user.id, group.id).await.unwrap());
    assert!(svc.users.list_user_groups(user.id).await.unwrap().is_empty());

    let err = svc
        .users
        .create_group(NewGroup {
            id: None,
            name: "editors".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn capabilities_follow_role_and_account_flags() {
    let (svc, _db) = services().await;
    let student = seed_user(&svc, "ogr", Role::Student).await;

    assert!(svc
        .users
        .has_capability(student.id, Capability::CreateTests)
        .await
        .unwrap());
    assert!(!svc
        .users
        .has_capability(student.id, Capability::ManageTaxonomy)
        .await
        .unwrap());

    svc.users
        .update_user(
            student.id,
            UserPatch {
                is_active: Some(false),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(!svc
        .users
        .has_capability(student.id, Capability::CreateTests)
        .await
        .unwrap());
}

#[tokio::test]
async fn deleting_user_cascades_to_owned_rows() {
    let (svc, db) = services().await;
    let user = seed_user(&svc, "silinecek", Role::Teacher).await;
    let keeper = seed_user(&svc, "kalan", Role::Teacher).await;
    let node = seed_taxonomy(&svc).await;
    let q = seed_question(&svc, node.id, "1 + 1 = ?").await;

    for owner in [user.id, keeper.id] {
        svc.tests
            .create_test(NewTest {
                id: None,
                user_id: owner,
                question_ids: vec![q.id],
            })
            .await
            .unwrap();
        svc.credits.open_account(owner, Some(10)).await.unwrap();
    }
    let group = svc
        .users
        .create_group(NewGroup {
            id: None,
            name: "teachers".to_owned(),
        })
        .await
        .unwrap();
    svc.users.add_user_to_group(user.id, group.id).await.unwrap();
    let perm = svc
        .users
        .create_permission(NewPermission {
            id: None,
            codename: "view_test".to_owned(),
            name: "Can view test".to_owned(),
        })
        .await
        .unwrap();
    svc.users.grant_permission(user.id, perm.id).await.unwrap();

    svc.users.delete_user(user.id).await.unwrap();

    assert_eq!(test::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(user_credit::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(credit_transaction::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(user_group::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(user_permission::Entity::find().count(&db).await.unwrap(), 0);

    // The question itself and the other user's data survive.
    assert!(svc.questions.get_question(q.id).await.is_ok());
    assert_eq!(svc.credits.get_credit(keeper.id).await.unwrap().balance, 10);
    assert!(matches!(
        svc.users.delete_user(user.id).await.unwrap_err(),
        DomainError::NotFound { entity: "User", .. }
    ));
}

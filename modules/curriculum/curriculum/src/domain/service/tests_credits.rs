#![allow(clippy::unwrap_used, clippy::expect_used)]

use curriculum_sdk::{ListQuery, Role};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::test_support::{seed_user, services};

#[tokio::test]
async fn new_account_starts_at_zero() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "bayi", Role::Dealer).await;

    let credit = svc.credits.open_account(user.id, None).await.unwrap();
    assert_eq!(credit.balance, 0);
    assert_eq!(credit.username, "bayi");
    assert_eq!(credit.to_string(), "bayi - 0");

    let ledger = svc
        .credits
        .list_transactions(user.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(ledger.total, 0);
}

#[tokio::test]
async fn second_account_for_same_user_conflicts() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "kurum", Role::Institution).await;
    svc.credits.open_account(user.id, Some(5)).await.unwrap();

    let err = svc.credits.open_account(user.id, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }), "{err:?}");
    assert_eq!(svc.credits.get_credit(user.id).await.unwrap().balance, 5);
}

#[tokio::test]
async fn opening_requires_user_and_nonnegative_balance() {
    let (svc, _db) = services().await;
    let ghost = Uuid::now_v7();
    assert_eq!(
        svc.credits.open_account(ghost, None).await.unwrap_err(),
        DomainError::not_found("User", ghost)
    );

    let user = seed_user(&svc, "ogr", Role::Student).await;
    let err = svc.credits.open_account(user.id, Some(-1)).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "balance"));
}

#[tokio::test]
async fn credits_and_debits_update_balance() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr", Role::Student).await;
    svc.credits.open_account(user.id, None).await.unwrap();

    let credit = svc
        .credits
        .adjust_balance(user.id, 100, "purchase".to_owned())
        .await
        .unwrap();
    assert_eq!(credit.balance, 100);

    let credit = svc
        .credits
        .adjust_balance(user.id, -100, "test generated".to_owned())
        .await
        .unwrap();
    assert_eq!(credit.balance, 0);
}

#[tokio::test]
async fn overdraft_is_rejected_without_side_effects() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr", Role::Student).await;
    svc.credits.open_account(user.id, Some(30)).await.unwrap();

    let err = svc
        .credits
        .adjust_balance(user.id, -31, "too much".to_owned())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::insufficient_credits(user.id, 30, -31));

    assert_eq!(svc.credits.get_credit(user.id).await.unwrap().balance, 30);
    let ledger = svc
        .credits
        .list_transactions(user.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(ledger.total, 1);
}

#[tokio::test]
async fn balance_overflow_is_a_validation_error() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "bayi", Role::Dealer).await;
    svc.credits
        .open_account(user.id, Some(i64::MAX - 1))
        .await
        .unwrap();

    let err = svc
        .credits
        .adjust_balance(user.id, 10, "top up".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "amount"));
    assert_eq!(
        svc.credits.get_credit(user.id).await.unwrap().balance,
        i64::MAX - 1
    );

    let credit = svc
        .credits
        .adjust_balance(user.id, 1, "top up".to_owned())
        .await
        .unwrap();
    assert_eq!(credit.balance, i64::MAX);

    let err = svc
        .credits
        .adjust_balance(user.id, i64::MIN, "drain".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "amount"));
}

#[tokio::test]
async fn ledger_sums_to_balance() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "bayi", Role::Dealer).await;
    svc.credits.open_account(user.id, Some(50)).await.unwrap();

    for (amount, reason) in [(20, "top up"), (-45, "tests"), (7, "refund")] {
        svc.credits
            .adjust_balance(user.id, amount, reason.to_owned())
            .await
            .unwrap();
    }
    svc.credits.set_balance(user.id, 10).await.unwrap();

    let credit = svc.credits.get_credit(user.id).await.unwrap();
    let ledger = svc
        .credits
        .list_transactions(user.id, ListQuery::default())
        .await
        .unwrap();

    let amounts: Vec<i64> = ledger.items.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![50, 20, -45, 7, -22]);
    assert_eq!(amounts.iter().sum::<i64>(), credit.balance);
    assert_eq!(ledger.items.last().map(|t| t.balance_after), Some(10));
    assert_eq!(ledger.items[0].reason, "opening balance");
}

#[tokio::test]
async fn set_balance_to_same_value_writes_nothing() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr", Role::Student).await;
    svc.credits.open_account(user.id, None).await.unwrap();

    let credit = svc.credits.set_balance(user.id, 0).await.unwrap();
    assert_eq!(credit.balance, 0);
    let err = svc.credits.set_balance(user.id, -3).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let ledger = svc
        .credits
        .list_transactions(user.id, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(ledger.total, 0);
}

#[tokio::test]
async fn adjustment_input_is_validated() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr", Role::Student).await;
    svc.credits.open_account(user.id, None).await.unwrap();

    let err = svc
        .credits
        .adjust_balance(user.id, 0, "noop".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "amount"));

    let err = svc
        .credits
        .adjust_balance(user.id, 5, " ".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "reason"));
}

#[tokio::test]
async fn missing_account_is_not_found() {
    let (svc, _db) = services().await;
    let user = seed_user(&svc, "ogr", Role::Student).await;

    for err in [
        svc.credits.get_credit(user.id).await.unwrap_err(),
        svc.credits
            .adjust_balance(user.id, 5, "gift".to_owned())
            .await
            .unwrap_err(),
        svc.credits
            .list_transactions(user.id, ListQuery::default())
            .await
            .unwrap_err(),
    ] {
        assert_eq!(err, DomainError::not_found("UserCredit", user.id));
    }
}

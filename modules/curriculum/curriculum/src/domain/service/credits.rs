use std::sync::Arc;

use curriculum_db::DbConnTrait;
use curriculum_sdk::{CreditTransaction, ListQuery, Page, UserCredit};
use sea_orm::{DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::check_required;
use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::fields::CreditFields;
use crate::domain::repos::{CreditsRepository, UsersRepository};
use crate::infra::storage::db::db_err;

const OPENING_REASON: &str = "opening balance";
const SET_REASON: &str = "balance set";

/// Credit accounts. Every balance change is mirrored by one ledger row
/// written in the same transaction.
#[derive(Clone)]
pub struct CreditsService<R: CreditsRepository, U: UsersRepository> {
    repo: Arc<R>,
    users: Arc<U>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<R: CreditsRepository, U: UsersRepository> CreditsService<R, U> {
    pub fn new(repo: Arc<R>, users: Arc<U>, db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self {
            repo,
            users,
            db,
            config,
        }
    }

    async fn load<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<UserCredit, DomainError> {
        self.repo
            .get_by_user(conn, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("UserCredit", user_id))
    }

    async fn record<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
        amount: i64,
        balance_after: i64,
        reason: String,
    ) -> Result<(), DomainError> {
        self.repo
            .append_transaction(
                conn,
                CreditTransaction {
                    id: Uuid::now_v7(),
                    user_id,
                    amount,
                    balance_after,
                    reason,
                    created_at: OffsetDateTime::now_utc(),
                },
            )
            .await
    }
}

fn validate_balance(balance: i64) -> Result<(), DomainError> {
    if balance < 0 {
        return Err(DomainError::validation(
            CreditFields::BALANCE,
            "must not be negative",
        ));
    }
    Ok(())
}

impl<R: CreditsRepository, U: UsersRepository> CreditsService<R, U> {
    /// Open the single account of `user_id`. A second account is a conflict.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn open_account(
        &self,
        user_id: Uuid,
        initial_balance: Option<i64>,
    ) -> Result<UserCredit, DomainError> {
        info!("Opening credit account");

        if let Some(balance) = initial_balance {
            validate_balance(balance)?;
        }
        if self.users.get(&self.db, user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        self.repo
            .create(&txn, Uuid::now_v7(), user_id, initial_balance)
            .await
            .map_err(|e| match e {
                DomainError::Conflict { .. } => {
                    DomainError::conflict(format!("user {user_id} already has a credit account"))
                }
                other => other,
            })?;
        let credit = self.load(&txn, user_id).await?;
        if credit.balance != 0 {
            self.record(
                &txn,
                user_id,
                credit.balance,
                credit.balance,
                OPENING_REASON.to_owned(),
            )
            .await?;
        }
        txn.commit().await.map_err(db_err)?;

        info!(credit = %credit, "Successfully opened credit account");
        Ok(credit)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_credit(&self, user_id: Uuid) -> Result<UserCredit, DomainError> {
        debug!("Getting credit account");

        self.load(&self.db, user_id).await
    }

    /// Overwrite the balance. The signed difference goes to the ledger.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn set_balance(&self, user_id: Uuid, balance: i64) -> Result<UserCredit, DomainError> {
        info!("Setting credit balance");

        validate_balance(balance)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let before = self.load(&txn, user_id).await?;
        let diff = balance - before.balance;
        if diff != 0 {
            self.repo.set_balance(&txn, user_id, balance).await?;
            self.record(&txn, user_id, diff, balance, SET_REASON.to_owned())
                .await?;
        }
        let credit = self.load(&txn, user_id).await?;
        txn.commit().await.map_err(db_err)?;

        info!(credit = %credit, diff, "Credit balance set");
        Ok(credit)
    }

    /// Apply a signed `amount`. A debit beyond the balance fails with
    /// `InsufficientCredits`, a credit past `i64::MAX` with a validation
    /// error; either way nothing changes.
    #[instrument(skip(self, reason), fields(user_id = %user_id))]
    pub async fn adjust_balance(
        &self,
        user_id: Uuid,
        amount: i64,
        reason: String,
    ) -> Result<UserCredit, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation(
                CreditFields::AMOUNT,
                "must not be zero",
            ));
        }
        check_required(CreditFields::REASON, &reason, CreditFields::REASON_MAX)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        if !self.repo.apply_delta(&txn, user_id, amount).await? {
            let current = self.load(&txn, user_id).await?;
            if amount > 0 {
                warn!(balance = current.balance, "Credit rejected, balance would overflow");
                return Err(DomainError::validation(
                    CreditFields::AMOUNT,
                    "would overflow the balance",
                ));
            }
            warn!(balance = current.balance, "Debit rejected, insufficient credits");
            return Err(DomainError::insufficient_credits(
                user_id,
                current.balance,
                amount,
            ));
        }
        let credit = self.load(&txn, user_id).await?;
        self.record(&txn, user_id, amount, credit.balance, reason)
            .await?;
        txn.commit().await.map_err(db_err)?;

        info!(balance = credit.balance, "Credit balance adjusted");
        Ok(credit)
    }

    /// Ledger rows of the account, oldest first.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Page<CreditTransaction>, DomainError> {
        self.load(&self.db, user_id).await?;

        let limit = self.config.effective_limit(query.limit);
        let page = self
            .repo
            .list_transactions(&self.db, user_id, limit, query.offset)
            .await?;

        debug!("Successfully listed {} ledger rows in page", page.items.len());
        Ok(page)
    }
}

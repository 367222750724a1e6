//! Ledger service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::models::AccountUuid,
        ledger::{
            data::LedgerEntry,
            errors::LedgerServiceError,
            models::{BonusTransaction, Reconciliation, replay},
            postings::{post_credit, post_debit},
            repository::PgLedgerRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgLedgerService {
    db: Db,
    repository: PgLedgerRepository,
}

impl PgLedgerService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLedgerRepository::new(),
        }
    }
}

#[async_trait]
impl LedgerService for PgLedgerService {
    async fn credit(
        &self,
        account: AccountUuid,
        entry: LedgerEntry,
    ) -> Result<BonusTransaction, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        let transaction = post_credit(&self.repository, &mut tx, account, entry).await?;

        tx.commit().await?;

        info!(
            account = %account,
            transaction = %transaction.uuid,
            points = transaction.points,
            "credited points"
        );

        Ok(transaction)
    }

    async fn debit(
        &self,
        account: AccountUuid,
        entry: LedgerEntry,
    ) -> Result<BonusTransaction, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        let transaction = post_debit(&self.repository, &mut tx, account, entry).await?;

        tx.commit().await?;

        info!(
            account = %account,
            transaction = %transaction.uuid,
            points = transaction.points,
            "debited points"
        );

        Ok(transaction)
    }

    async fn balance(&self, account: AccountUuid) -> Result<u64, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        let balance = self.repository.get_balance(&mut tx, account).await?;

        tx.commit().await?;

        Ok(balance)
    }

    async fn transactions(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<BonusTransaction>, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        let transactions = self.repository.list_transactions(&mut tx, account).await?;

        tx.commit().await?;

        Ok(transactions)
    }

    async fn reconcile(&self, account: AccountUuid) -> Result<Reconciliation, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        // Lock so no posting lands between the two reads.
        let cached = self.repository.lock_balance(&mut tx, account).await?;
        let transactions = self.repository.list_transactions(&mut tx, account).await?;

        tx.commit().await?;

        Ok(Reconciliation {
            account_uuid: account,
            cached,
            replayed: replay(&transactions),
        })
    }
}

#[automock]
#[async_trait]
/// Loyalty points balance and history per account.
pub trait LedgerService: Send + Sync {
    /// Adds points to an account.
    async fn credit(
        &self,
        account: AccountUuid,
        entry: LedgerEntry,
    ) -> Result<BonusTransaction, LedgerServiceError>;

    /// Spends points from an account. Never takes the balance below zero.
    async fn debit(
        &self,
        account: AccountUuid,
        entry: LedgerEntry,
    ) -> Result<BonusTransaction, LedgerServiceError>;

    /// Current balance; zero for accounts that never earned points.
    async fn balance(&self, account: AccountUuid) -> Result<u64, LedgerServiceError>;

    /// Full history, oldest first.
    async fn transactions(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<BonusTransaction>, LedgerServiceError>;

    /// Compare the cached balance against a replay of the history.
    async fn reconcile(&self, account: AccountUuid) -> Result<Reconciliation, LedgerServiceError>;
}

//! Balance-changing postings.
//!
//! Both the ledger service and checkout post through these functions so the
//! balance and the log are always written together under the balance lock.

use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::to_i64,
    domain::{
        accounts::models::AccountUuid,
        ledger::{
            data::LedgerEntry,
            errors::LedgerServiceError,
            models::{BonusTransaction, TransactionKind},
            repository::PgLedgerRepository,
        },
    },
};

/// Validate a posting amount before any lock is taken.
pub(crate) fn check_amount(points: u64) -> Result<(), LedgerServiceError> {
    if points == 0 {
        return Err(LedgerServiceError::InvalidAmount);
    }

    Ok(())
}

/// Validate a debit amount against the locked balance.
pub(crate) fn check_covered(points: u64, available: u64) -> Result<(), LedgerServiceError> {
    if points > available {
        return Err(LedgerServiceError::InsufficientBalance {
            requested: points,
            available,
        });
    }

    Ok(())
}

/// Add `entry.points` to the balance and append an `earned` entry.
pub(crate) async fn post_credit(
    repository: &PgLedgerRepository,
    tx: &mut Transaction<'_, Postgres>,
    account: AccountUuid,
    entry: LedgerEntry,
) -> Result<BonusTransaction, LedgerServiceError> {
    check_amount(entry.points)?;

    repository.lock_balance(tx, account).await?;

    let balance = repository
        .adjust_balance(tx, account, to_i64(entry.points)?)
        .await?;

    let transaction = repository
        .create_transaction(tx, account, TransactionKind::Earned, entry)
        .await?;

    debug!(
        account = %account,
        points = transaction.points,
        balance,
        "posted credit"
    );

    Ok(transaction)
}

/// Subtract `entry.points` from the balance and append a `spent` entry.
///
/// Fails without writing anything if the locked balance cannot cover it.
pub(crate) async fn post_debit(
    repository: &PgLedgerRepository,
    tx: &mut Transaction<'_, Postgres>,
    account: AccountUuid,
    entry: LedgerEntry,
) -> Result<BonusTransaction, LedgerServiceError> {
    check_amount(entry.points)?;

    let available = repository.lock_balance(tx, account).await?;

    check_covered(entry.points, available)?;

    let balance = repository
        .adjust_balance(tx, account, -to_i64(entry.points)?)
        .await?;

    let transaction = repository
        .create_transaction(tx, account, TransactionKind::Spent, entry)
        .await?;

    debug!(
        account = %account,
        points = transaction.points,
        balance,
        "posted debit"
    );

    Ok(transaction)
}

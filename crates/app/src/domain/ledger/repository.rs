//! Ledger Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{to_i64, try_get_u64},
    domain::{
        accounts::models::AccountUuid,
        ledger::{
            data::LedgerEntry,
            models::{BonusTransaction, BonusTransactionUuid, TransactionKind},
        },
    },
};

const ENSURE_USER_BONUS_SQL: &str = include_str!("sql/ensure_user_bonus.sql");
const LOCK_USER_BONUS_SQL: &str = include_str!("sql/lock_user_bonus.sql");
const GET_BALANCE_SQL: &str = include_str!("sql/get_balance.sql");
const ADJUST_BALANCE_SQL: &str = include_str!("sql/adjust_balance.sql");
const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");
const LIST_TRANSACTIONS_SQL: &str = include_str!("sql/list_transactions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLedgerRepository;

impl PgLedgerRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Create the balance row if missing, then lock it for the rest of the
    /// transaction and return the current balance.
    pub(crate) async fn lock_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        query(ENSURE_USER_BONUS_SQL)
            .bind(account.into_uuid())
            .execute(&mut **tx)
            .await?;

        let total: i64 = query_scalar(LOCK_USER_BONUS_SQL)
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        points_from_column(total)
    }

    /// Unlocked read; accounts without a balance row have zero points.
    pub(crate) async fn get_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let total: Option<i64> = query_scalar(GET_BALANCE_SQL)
            .bind(account.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        total.map_or(Ok(0), points_from_column)
    }

    /// Apply `delta` to a balance row previously locked with
    /// [`Self::lock_balance`].
    pub(crate) async fn adjust_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        delta: i64,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(ADJUST_BALANCE_SQL)
            .bind(account.into_uuid())
            .bind(delta)
            .fetch_one(&mut **tx)
            .await?;

        points_from_column(total)
    }

    pub(crate) async fn create_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        kind: TransactionKind,
        entry: LedgerEntry,
    ) -> Result<BonusTransaction, sqlx::Error> {
        query_as::<Postgres, BonusTransaction>(CREATE_TRANSACTION_SQL)
            .bind(BonusTransactionUuid::new().into_uuid())
            .bind(account.into_uuid())
            .bind(kind.as_str())
            .bind(to_i64(entry.points)?)
            .bind(entry.description)
            .bind(entry.reference)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Vec<BonusTransaction>, sqlx::Error> {
        query_as::<Postgres, BonusTransaction>(LIST_TRANSACTIONS_SQL)
            .bind(account.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn points_from_column(total: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
        index: "total_points".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for BonusTransaction {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        Ok(Self {
            uuid: BonusTransactionUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            kind: kind.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?,
            points: try_get_u64(row, "points")?,
            description: row.try_get("description")?,
            reference: row.try_get("reference")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

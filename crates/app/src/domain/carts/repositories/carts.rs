//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::debug;

use crate::domain::{
    accounts::models::AccountUuid,
    carts::models::{Cart, CartUuid},
};

const ENSURE_ACTIVE_CART_SQL: &str = include_str!("../sql/ensure_active_cart.sql");
const LOCK_ACTIVE_CART_SQL: &str = include_str!("../sql/lock_active_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");
const CLOSE_CART_SQL: &str = include_str!("../sql/close_cart.sql");

/// How often to retry when a concurrent checkout closes the active cart
/// between the upsert and the lock.
const ACTIVE_CART_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Return the account's active cart locked for update, creating it if
    /// the account has none. The returned cart has no items loaded.
    pub(crate) async fn lock_or_create_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Cart, sqlx::Error> {
        for attempt in 1..=ACTIVE_CART_ATTEMPTS {
            query(ENSURE_ACTIVE_CART_SQL)
                .bind(CartUuid::new().into_uuid())
                .bind(account.into_uuid())
                .execute(&mut **tx)
                .await?;

            let cart = query_as::<Postgres, Cart>(LOCK_ACTIVE_CART_SQL)
                .bind(account.into_uuid())
                .fetch_optional(&mut **tx)
                .await?;

            if let Some(cart) = cart {
                return Ok(cart);
            }

            debug!(account = %account, attempt, "active cart closed while locking, retrying");
        }

        Err(sqlx::Error::RowNotFound)
    }

    /// Lock any cart by id regardless of owner or state.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        cart: CartUuid,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Deactivate a cart. Returns the number of carts closed, zero when it
    /// was already inactive.
    pub(crate) async fn close_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLOSE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            is_active: row.try_get("is_active")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            closed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("closed_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

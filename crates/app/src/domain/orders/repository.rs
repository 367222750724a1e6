//! Orders Repository

use std::collections::HashMap;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{to_i32, to_i64, try_get_u32, try_get_u64},
    domain::{
        accounts::models::AccountUuid,
        addresses::models::AddressUuid,
        carts::models::CartUuid,
        orders::{
            data::NewOrder,
            models::{Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid},
        },
        products::models::ProductUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order row and its line snapshot.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        let mut created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.account_uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(order.address_uuid.into_uuid())
            .bind(order.comment)
            .bind(order.subtotal)
            .bind(order.total_price)
            .bind(to_i64(order.points_redeemed)?)
            .bind(to_i64(order.points_earned)?)
            .fetch_one(&mut **tx)
            .await?;

        created.items.reserve(order.items.len());

        for item in order.items {
            let item = query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
                .bind(OrderItemUuid::new().into_uuid())
                .bind(created.uuid.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(item.product_name)
                .bind(to_i32(item.quantity)?)
                .bind(item.unit_price)
                .bind(to_i64(item.bonus_points)?)
                .bind(to_i64(item.points_earned)?)
                .fetch_one(&mut **tx)
                .await?;

            created.items.push(item);
        }

        Ok(created)
    }

    /// Fetch an order with its items, only if it belongs to `account`.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        let mut order = query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        order.items = self.get_order_items(tx, &[order.uuid.into_uuid()]).await?;

        Ok(order)
    }

    /// Lock an order row for a status change. Items are not loaded.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// All orders of an account, newest first, with their items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let mut orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(account.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let uuids: Vec<Uuid> = orders.iter().map(|o| o.uuid.into_uuid()).collect();

        let mut items: HashMap<OrderUuid, Vec<OrderItem>> = HashMap::new();

        for item in self.get_order_items(tx, &uuids).await? {
            items.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            address_uuid: AddressUuid::from_uuid(row.try_get("address_uuid")?),
            comment: row.try_get("comment")?,
            subtotal: row.try_get("subtotal")?,
            total_price: row.try_get("total_price")?,
            points_redeemed: try_get_u64(row, "points_redeemed")?,
            points_earned: try_get_u64(row, "points_earned")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_u32(row, "quantity")?,
            unit_price: row.try_get("unit_price")?,
            bonus_points: try_get_u64(row, "bonus_points")?,
            points_earned: try_get_u64(row, "points_earned")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

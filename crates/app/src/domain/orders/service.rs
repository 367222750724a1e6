//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::models::AccountUuid,
        orders::{
            errors::OrdersServiceError,
            models::{Order, OrderStatus, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(
        &self,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, account, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self, account: AccountUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx, account).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        account: AccountUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, account, order).await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        self.repository.update_status(&mut tx, order, status).await?;

        let updated = self.repository.get_order(&mut tx, account, order).await?;

        tx.commit().await?;

        info!(
            order = %order,
            from = %current.status,
            to = %status,
            "order status changed"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Placed orders of an account.
pub trait OrdersService: Send + Sync {
    /// Retrieve a single order with its line items.
    async fn get_order(
        &self,
        account: AccountUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// All orders of the account, newest first.
    async fn list_orders(&self, account: AccountUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Move an order to a new status if the transition is allowed.
    async fn update_status(
        &self,
        account: AccountUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}

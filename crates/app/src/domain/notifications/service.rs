//! Notifier service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::domain::{notifications::errors::NotifyError, orders::models::Order};

#[automock]
#[async_trait]
/// Outbound channel for order events (push, SMS, staff alerts).
///
/// Called only after the order is committed; a failure here never undoes
/// the order.
pub trait Notifier: Send + Sync {
    /// Announce a newly placed order.
    async fn notify_order_created(&self, order: &Order) -> Result<(), NotifyError>;
}

/// Notifier that records order events in the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_order_created(&self, order: &Order) -> Result<(), NotifyError> {
        info!(
            order = %order.uuid,
            account = %order.account_uuid,
            total_price = %order.total_price,
            points_redeemed = order.points_redeemed,
            points_earned = order.points_earned,
            "order created"
        );

        Ok(())
    }
}

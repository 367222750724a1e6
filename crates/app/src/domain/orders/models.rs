//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{
        accounts::models::AccountUuid, addresses::models::AddressUuid, carts::models::CartUuid,
        products::models::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Canceled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }

    /// `pending → confirmed | canceled`, `confirmed → delivered | canceled`.
    /// Delivered and canceled orders are final.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Canceled)
                | (Self::Confirmed, Self::Delivered | Self::Canceled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Order Model
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub account_uuid: AccountUuid,
    pub cart_uuid: CartUuid,
    pub address_uuid: AddressUuid,
    pub comment: Option<String>,
    pub subtotal: Decimal,

    /// Amount charged after redeeming points, never negative.
    pub total_price: Decimal,
    pub points_redeemed: u64,
    pub points_earned: u64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// OrderItem Model
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,

    /// Final (discounted) unit price at the time of the order.
    pub unit_price: Decimal,
    pub bonus_points: u64,
    pub points_earned: u64,
    pub created_at: Timestamp,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{
        accounts::models::AccountUuid,
        products::models::{ProductUuid, final_price},
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Cart Model
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub uuid: CartUuid,
    pub account_uuid: AccountUuid,
    pub is_active: bool,
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl Cart {
    /// Sum of line totals at current catalog prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart line joined with the current catalog entry of its product.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub bonus_points: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    /// Unit price after discount.
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        final_price(self.unit_price, self.discount_percent)
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.final_price() * Decimal::from(self.quantity)
    }
}

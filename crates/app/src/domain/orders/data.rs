//! Order Data

use rust_decimal::Decimal;

use crate::domain::{
    accounts::models::AccountUuid,
    addresses::models::AddressUuid,
    carts::models::CartUuid,
    orders::models::OrderUuid,
    products::models::ProductUuid,
};

/// Order row as computed by checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub account_uuid: AccountUuid,
    pub cart_uuid: CartUuid,
    pub address_uuid: AddressUuid,
    pub comment: Option<String>,
    pub subtotal: Decimal,
    pub total_price: Decimal,
    pub points_redeemed: u64,
    pub points_earned: u64,
    pub items: Vec<NewOrderItem>,
}

/// Frozen copy of one cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub bonus_points: u64,
    pub points_earned: u64,
}

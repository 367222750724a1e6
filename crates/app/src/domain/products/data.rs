//! Products Data

use rust_decimal::Decimal;

use crate::domain::products::models::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub bonus_points: u64,
}

/// Product Update Data
///
/// Replaces every mutable catalog field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub bonus_points: u64,
}

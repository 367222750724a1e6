//! Product Models

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub bonus_points: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Product {
    /// Price after discount, see [`final_price`].
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        final_price(self.price, self.discount_percent)
    }
}

/// Unit price after applying an optional percentage discount, rounded to
/// currency minor units.
#[must_use]
pub fn final_price(price: Decimal, discount_percent: Option<Decimal>) -> Decimal {
    let discounted = match discount_percent {
        Some(percent) if !percent.is_zero() => {
            price * (Decimal::ONE - percent / Decimal::ONE_HUNDRED)
        }
        _ => price,
    };

    discounted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

//! Order pricing.
//!
//! Pure computation of an order from cart lines and the locked points
//! balance. Points redeem 1:1 against the currency unit.

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    carts::models::CartItem, checkout::errors::CheckoutError, orders::data::NewOrderItem,
};

/// Largest amount an order column (`NUMERIC(12, 2)`) can hold.
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// What to do when a customer asks to redeem more points than they hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionPolicy {
    /// Redeem the whole balance instead.
    #[default]
    Clamp,

    /// Fail with [`CheckoutError::InsufficientBalance`].
    Reject,
}

impl RedemptionPolicy {
    /// Points to debit for a request of `requested` against `balance`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InsufficientBalance`] under
    /// [`RedemptionPolicy::Reject`] when `requested` exceeds `balance`.
    pub fn redeemable(self, requested: u64, balance: u64) -> Result<u64, CheckoutError> {
        match self {
            Self::Clamp => Ok(requested.min(balance)),
            Self::Reject if requested > balance => Err(CheckoutError::InsufficientBalance {
                requested,
                available: balance,
            }),
            Self::Reject => Ok(requested),
        }
    }
}

/// Totals and frozen lines of an order about to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub points_redeemed: u64,
    pub total_price: Decimal,
    pub points_earned: u64,
    pub lines: Vec<NewOrderItem>,
}

/// Price `items` and settle the redemption against `balance`.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for no items,
/// [`CheckoutError::InsufficientBalance`] when the policy rejects the
/// redemption and [`CheckoutError::InvalidData`] if earned points overflow
/// or the subtotal exceeds what an order can store.
pub fn quote(
    items: &[CartItem],
    balance: u64,
    requested: u64,
    policy: RedemptionPolicy,
) -> Result<Quote, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let lines = items
        .iter()
        .map(freeze_line)
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    if subtotal > MAX_AMOUNT {
        return Err(CheckoutError::InvalidData);
    }

    let points_earned = lines
        .iter()
        .try_fold(0_u64, |acc, line| acc.checked_add(line.points_earned))
        .ok_or(CheckoutError::InvalidData)?;

    let points_redeemed = policy.redeemable(requested, balance)?;

    let total_price = (subtotal - Decimal::from(points_redeemed)).max(Decimal::ZERO);

    Ok(Quote {
        subtotal,
        points_redeemed,
        total_price,
        points_earned,
        lines,
    })
}

fn freeze_line(item: &CartItem) -> Result<NewOrderItem, CheckoutError> {
    let points_earned = item
        .bonus_points
        .checked_mul(u64::from(item.quantity))
        .ok_or(CheckoutError::InvalidData)?;

    Ok(NewOrderItem {
        product_uuid: item.product_uuid,
        product_name: item.product_name.clone(),
        quantity: item.quantity,
        unit_price: item.final_price(),
        bonus_points: item.bonus_points,
        points_earned,
    })
}

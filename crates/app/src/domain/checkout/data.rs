//! Checkout Data

use crate::domain::{addresses::models::AddressUuid, carts::models::CartUuid};

/// Checkout request for the caller's active cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Must be the caller's active cart.
    pub cart_uuid: CartUuid,

    /// Must be one of the caller's delivery addresses.
    pub address_uuid: AddressUuid,

    /// Points the customer wants to spend on this order.
    pub points_to_redeem: u64,

    pub comment: Option<String>,
}

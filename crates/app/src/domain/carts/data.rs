//! Cart Data

use crate::domain::products::models::ProductUuid;

/// Request to put a product into the active cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,

    /// Added to any quantity already in the cart.
    pub quantity: u32,
}

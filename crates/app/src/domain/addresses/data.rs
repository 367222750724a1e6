//! Address Data

use crate::domain::addresses::models::AddressUuid;

/// New Delivery Address Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub details: Option<String>,
}

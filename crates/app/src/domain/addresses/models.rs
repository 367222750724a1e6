//! Address Models

use jiff::Timestamp;
use serde::Serialize;

use crate::{domain::accounts::models::AccountUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Delivery Address Model
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub uuid: AddressUuid,
    pub account_uuid: AccountUuid,
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub details: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

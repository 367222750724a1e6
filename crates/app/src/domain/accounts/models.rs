//! Account Models

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Account UUID
pub type AccountUuid = TypedUuid<Account>;

/// Account Model
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique account identifier.
    pub uuid: AccountUuid,

    /// Login email.
    pub email: String,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Account creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

//! Account Data

use crate::domain::accounts::models::AccountUuid;

/// New Account Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// UUID to assign to the account row.
    pub uuid: AccountUuid,

    /// Login email, unique case-insensitively.
    pub email: String,

    /// Optional contact phone number.
    pub phone: Option<String>,
}

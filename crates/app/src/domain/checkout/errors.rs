//! Checkout errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::ledger::LedgerServiceError;

const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("cart is not the caller's active cart")]
    CartMismatch,

    #[error("delivery address not found")]
    NotFound,

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("points ledger failed")]
    Ledger(#[from] LedgerServiceError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CheckoutError {
    /// Whether the same request may succeed if submitted again.
    ///
    /// Ledger rejections such as an insufficient balance are terminal; only
    /// ledger storage failures are retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(error) => error.is_retryable(),
            Self::Sql(_) => true,
            _ => false,
        }
    }
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        // numeric_value_out_of_range: an amount exceeds its column precision.
        if error
            .as_database_error()
            .and_then(DatabaseError::code)
            .is_some_and(|code| code == NUMERIC_VALUE_OUT_OF_RANGE)
        {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            // orders.cart_uuid is unique: the cart already became an order.
            Some(ErrorKind::UniqueViolation) => Self::CartMismatch,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

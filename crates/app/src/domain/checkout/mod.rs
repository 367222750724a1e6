//! Checkout
//!
//! Turns the active cart into an order in one transaction: prices are
//! frozen into the order lines, redeemed points are debited, earned points
//! are credited per line and the cart is closed. Nothing is written unless
//! every step succeeds.

pub mod data;
pub mod errors;
pub mod pricing;
pub mod service;

pub use errors::CheckoutError;
pub use service::*;

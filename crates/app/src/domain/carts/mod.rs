//! Carts
//!
//! Every account has at most one active cart. It is created lazily on first
//! use and closed exactly once, by checkout. Items are priced from the
//! catalog at read time; the order placed at checkout freezes those prices.

pub mod data;
pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;

//! Orders
//!
//! Orders are written once, by checkout, and afterwards only their status
//! moves. Line items carry the prices and bonus points in effect when the
//! order was placed.

pub mod data;
pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;

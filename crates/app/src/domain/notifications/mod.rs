//! Order Notifications

pub mod errors;
pub mod service;

pub use errors::NotifyError;
pub use service::*;

//! Alma Domain Concerns

pub mod accounts;
pub mod addresses;
pub mod carts;
pub mod checkout;
pub mod ledger;
pub mod notifications;
pub mod orders;
pub mod products;

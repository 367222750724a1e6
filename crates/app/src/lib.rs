//! Retail checkout with a loyalty points ledger.
//!
//! Accounts fill a cart from the product catalog, then check it out into an
//! order. Checkout can spend loyalty points and earns new ones per line;
//! every points movement is recorded in the account's ledger.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod uuids;

#[cfg(test)]
mod test;

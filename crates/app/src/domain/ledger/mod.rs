//! Loyalty Points Ledger
//!
//! A per-account running balance (`user_bonuses`) with an append-only log
//! (`bonus_transactions`). The log is authoritative; the balance column is a
//! cache of it and is only ever changed together with a log append, inside
//! one transaction, while holding a row lock on the balance.

pub mod data;
pub mod errors;
pub mod models;
pub(crate) mod postings;
pub(crate) mod repository;
pub mod service;

pub use errors::LedgerServiceError;
pub use service::*;

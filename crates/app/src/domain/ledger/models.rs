//! Ledger Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::Serialize;

use crate::{domain::accounts::models::AccountUuid, uuids::TypedUuid};

/// Bonus Transaction UUID
pub type BonusTransactionUuid = TypedUuid<BonusTransaction>;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earned,
    Spent,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Earned => "earned",
            Self::Spent => "spent",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored kind is neither `earned` nor `spent`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction kind `{0}`")]
pub struct UnknownTransactionKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "earned" => Ok(Self::Earned),
            "spent" => Ok(Self::Spent),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

/// Bonus Transaction Model
#[derive(Debug, Clone, Serialize)]
pub struct BonusTransaction {
    pub uuid: BonusTransactionUuid,
    pub account_uuid: AccountUuid,
    pub kind: TransactionKind,
    pub points: u64,
    pub description: String,
    pub reference: Option<String>,
    pub created_at: Timestamp,
}

impl BonusTransaction {
    /// Effect of this entry on the balance.
    #[must_use]
    pub fn signed_points(&self) -> i128 {
        match self.kind {
            TransactionKind::Earned => i128::from(self.points),
            TransactionKind::Spent => -i128::from(self.points),
        }
    }
}

/// Rebuild a balance from scratch by summing `earned − spent`.
pub fn replay<'a>(transactions: impl IntoIterator<Item = &'a BonusTransaction>) -> i128 {
    transactions
        .into_iter()
        .map(BonusTransaction::signed_points)
        .sum()
}

/// Cached balance next to the balance replayed from the log, read in the
/// same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub account_uuid: AccountUuid,
    pub cached: u64,
    pub replayed: i128,
}

impl Reconciliation {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        i128::from(self.cached) == self.replayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: TransactionKind, points: u64) -> BonusTransaction {
        BonusTransaction {
            uuid: BonusTransactionUuid::new(),
            account_uuid: AccountUuid::new(),
            kind,
            points,
            description: "test".to_string(),
            reference: None,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn replay_of_empty_log_is_zero() {
        let log: [BonusTransaction; 0] = [];

        assert_eq!(replay(&log), 0);
    }

    #[test]
    fn replay_nets_earned_against_spent() {
        let log = [
            entry(TransactionKind::Earned, 100),
            entry(TransactionKind::Spent, 30),
            entry(TransactionKind::Earned, 12),
            entry(TransactionKind::Spent, 82),
        ];

        assert_eq!(replay(&log), 0);
        assert_eq!(replay(log.iter().take(3)), 82);
    }

    #[test]
    fn kind_parses_stored_values() {
        assert_eq!("earned".parse(), Ok(TransactionKind::Earned));
        assert_eq!("spent".parse(), Ok(TransactionKind::Spent));
        assert!("refund".parse::<TransactionKind>().is_err());
        assert_eq!(TransactionKind::Spent.to_string(), "spent");
    }

    #[test]
    fn reconciliation_compares_cached_and_replayed() {
        let account_uuid = AccountUuid::new();

        let balanced = Reconciliation {
            account_uuid,
            cached: 12,
            replayed: 12,
        };
        let drifted = Reconciliation {
            account_uuid,
            cached: 12,
            replayed: 11,
        };

        assert!(balanced.is_balanced());
        assert!(!drifted.is_balanced());
    }
}

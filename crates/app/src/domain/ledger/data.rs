//! Ledger Data

/// A credit or debit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Number of points to move; must be positive.
    pub points: u64,

    /// Free-text description shown in the account history.
    pub description: String,

    /// Optional correlation reference, e.g. a scanned QR/source code or an
    /// order id.
    pub reference: Option<String>,
}

impl LedgerEntry {
    pub fn new(points: u64, description: impl Into<String>) -> Self {
        Self {
            points,
            description: description.into(),
            reference: None,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

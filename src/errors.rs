use thiserror::Error;

use crate::ledger::EntryId;

/// Error type that captures ledger input and lookup failures.
///
/// Every variant is raised before the ledger is touched, so callers can treat
/// any error as "nothing changed".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Category is required")]
    MissingCategory,
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),
}

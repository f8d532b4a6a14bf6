//! Validated mutations for ledger entries.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::services::ServiceResult;
use crate::errors::LedgerError;
use crate::ledger::{EntryId, ExpenseEntry, Ledger};

/// Result of an edit request. A cancelled edit leaves the entry untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditOutcome {
    Applied,
    Cancelled,
}

/// Validates input before it reaches the ledger. Rejected input never
/// changes the store.
pub struct EntryService;

impl EntryService {
    /// Appends an income entry stamped with `at`.
    pub fn record_income(
        ledger: &mut Ledger,
        amount: Decimal,
        at: DateTime<FixedOffset>,
    ) -> ServiceResult<EntryId> {
        let amount = validate_amount(amount).inspect_err(|err| {
            warn!(%err, "income rejected");
        })?;
        let id = ledger.add_income(amount, at);
        debug!(ledger = %ledger.id, %id, %amount, "income recorded");
        Ok(id)
    }

    /// Appends an expense entry stamped with `at`. Blank descriptions are
    /// stored as `None`.
    pub fn record_expense(
        ledger: &mut Ledger,
        amount: Decimal,
        category: &str,
        description: Option<&str>,
        at: DateTime<FixedOffset>,
    ) -> ServiceResult<EntryId> {
        let amount = validate_amount(amount).inspect_err(|err| {
            warn!(%err, "expense rejected");
        })?;
        let category = validate_category(category).inspect_err(|err| {
            warn!(%err, "expense rejected");
        })?;
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        let id = ledger.add_expense(amount, category, description, at);
        debug!(ledger = %ledger.id, %id, %amount, category, "expense recorded");
        Ok(id)
    }

    /// Replaces amount and category of the expense `id`.
    ///
    /// Invalid replacement values cancel the edit instead of failing; only
    /// an unknown id is an error.
    pub fn edit_expense(
        ledger: &mut Ledger,
        id: EntryId,
        new_amount: Decimal,
        new_category: &str,
    ) -> ServiceResult<EditOutcome> {
        let ledger_id = ledger.id;
        let entry = ledger
            .expense_mut(id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        let (Ok(amount), Ok(category)) =
            (validate_amount(new_amount), validate_category(new_category))
        else {
            debug!(ledger = %ledger_id, %id, "expense edit cancelled");
            return Ok(EditOutcome::Cancelled);
        };
        let previous = entry.amount;
        entry.amend(amount, category);
        debug!(ledger = %ledger_id, %id, %previous, %amount, "expense edited");
        Ok(EditOutcome::Applied)
    }

    /// Removes the expense `id` and returns it.
    pub fn remove_expense(ledger: &mut Ledger, id: EntryId) -> ServiceResult<ExpenseEntry> {
        let removed = ledger
            .remove_expense(id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        debug!(ledger = %ledger.id, %id, amount = %removed.amount, "expense removed");
        Ok(removed)
    }
}

/// Parses presenter text into a validated amount.
pub fn parse_amount(text: &str) -> ServiceResult<Decimal> {
    let trimmed = text.trim();
    let value = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::InvalidAmount(format!("`{trimmed}` is not a number")))?;
    validate_amount(value)
}

fn validate_amount(amount: Decimal) -> ServiceResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} must be greater than zero"
        )));
    }
    Ok(amount)
}

fn validate_category(category: &str) -> ServiceResult<&str> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::MissingCategory);
    }
    Ok(trimmed)
}

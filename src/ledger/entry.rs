use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Session-unique identifier handed out by the ledger, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that happened at a point in time and carries an amount.
///
/// The aggregator works over this trait so income and expense streams share
/// one implementation.
pub trait Dated {
    fn amount(&self) -> Decimal;
    fn instant(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: EntryId,
    pub amount: Decimal,
    pub recorded_at: DateTime<FixedOffset>,
}

impl IncomeEntry {
    pub fn new(id: EntryId, amount: Decimal, recorded_at: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            amount,
            recorded_at,
        }
    }
}

impl Dated for IncomeEntry {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn instant(&self) -> DateTime<FixedOffset> {
        self.recorded_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub amount: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub occurred_at: DateTime<FixedOffset>,
}

impl ExpenseEntry {
    pub fn new(
        id: EntryId,
        amount: Decimal,
        category: impl Into<String>,
        description: Option<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            description,
            occurred_at,
        }
    }

    /// Replaces amount and category; the timestamp and description stay put.
    pub fn amend(&mut self, amount: Decimal, category: impl Into<String>) {
        self.amount = amount;
        self.category = category.into();
    }
}

impl Dated for ExpenseEntry {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn instant(&self) -> DateTime<FixedOffset> {
        self.occurred_at
    }
}

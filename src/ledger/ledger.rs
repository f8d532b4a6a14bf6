use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::entry::{EntryId, ExpenseEntry, IncomeEntry};

/// In-memory store of every income and expense entry for the session.
///
/// Entries are kept in insertion order. Totals are never cached; they are
/// folded from the entries on demand so they cannot drift from the store.
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    incomes: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
    next_id: u64,
}

/// Running aggregates derived from the ledger contents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_spent: Decimal,
    pub in_hand: Decimal,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_income(&mut self, amount: Decimal, recorded_at: DateTime<FixedOffset>) -> EntryId {
        let id = self.allocate_id();
        self.incomes.push(IncomeEntry::new(id, amount, recorded_at));
        id
    }

    pub fn add_expense(
        &mut self,
        amount: Decimal,
        category: impl Into<String>,
        description: Option<String>,
        occurred_at: DateTime<FixedOffset>,
    ) -> EntryId {
        let id = self.allocate_id();
        self.expenses.push(ExpenseEntry::new(
            id,
            amount,
            category,
            description,
            occurred_at,
        ));
        id
    }

    pub fn incomes(&self) -> &[IncomeEntry] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn expense(&self, id: EntryId) -> Option<&ExpenseEntry> {
        self.expenses.iter().find(|entry| entry.id == id)
    }

    pub fn expense_mut(&mut self, id: EntryId) -> Option<&mut ExpenseEntry> {
        self.expenses.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove_expense(&mut self, id: EntryId) -> Option<ExpenseEntry> {
        let index = self.expenses.iter().position(|entry| entry.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn entry_count(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn totals(&self) -> Totals {
        let total_income: Decimal = self.incomes.iter().map(|entry| entry.amount).sum();
        let total_spent: Decimal = self.expenses.iter().map(|entry| entry.amount).sum();
        Totals {
            total_income,
            total_spent,
            in_hand: total_income - total_spent,
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new("Session")
    }
}

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::core::clock::Clock;
use crate::core::services::{
    summary_service::{DetailList, LedgerSnapshot, PeriodSummary},
    EditOutcome, EntryService, ServiceResult, SummaryService,
};
use crate::ledger::{EntryId, ExpenseEntry, Ledger, Period, Totals};

/// Owns the session ledger and the clock that stamps new entries.
///
/// This is the surface the presenter talks to: mutations go through the
/// entry service, reads are recomputed from the store on every call.
pub struct LedgerManager<C: Clock> {
    ledger: Ledger,
    clock: C,
}

impl<C: Clock> LedgerManager<C> {
    pub fn new(clock: C) -> Self {
        Self::with_ledger(Ledger::default(), clock)
    }

    pub fn with_ledger(ledger: Ledger, clock: C) -> Self {
        Self { ledger, clock }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Swaps the clock used for new entries; existing entries keep their stamps.
    pub fn replace_clock(&mut self, clock: C) {
        self.clock = clock;
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn record_income(&mut self, amount: Decimal) -> ServiceResult<EntryId> {
        let now = self.clock.now();
        EntryService::record_income(&mut self.ledger, amount, now)
    }

    pub fn record_expense(
        &mut self,
        amount: Decimal,
        category: &str,
        description: Option<&str>,
    ) -> ServiceResult<EntryId> {
        let now = self.clock.now();
        EntryService::record_expense(&mut self.ledger, amount, category, description, now)
    }

    pub fn edit_expense(
        &mut self,
        id: EntryId,
        new_amount: Decimal,
        new_category: &str,
    ) -> ServiceResult<EditOutcome> {
        EntryService::edit_expense(&mut self.ledger, id, new_amount, new_category)
    }

    pub fn remove_expense(&mut self, id: EntryId) -> ServiceResult<ExpenseEntry> {
        EntryService::remove_expense(&mut self.ledger, id)
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    pub fn summary(&self, period: Period) -> PeriodSummary {
        SummaryService::summary(&self.ledger, period, &self.clock.now())
    }

    pub fn detail_list(&self) -> DetailList {
        SummaryService::detail_list(self.ledger.expenses(), &self.clock.now())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        SummaryService::snapshot(&self.ledger, &self.clock.now())
    }
}

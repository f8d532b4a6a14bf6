//! Ledger domain models and the calendar rules used to summarize them.

pub mod entry;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;

pub use entry::{Dated, EntryId, ExpenseEntry, IncomeEntry};
pub use ledger::{Ledger, Totals};
pub use period::{Period, WEEKDAYS, WEEK_BUCKETS};

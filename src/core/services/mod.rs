pub mod entry_service;
pub mod summary_service;

pub use entry_service::{EditOutcome, EntryService};
pub use summary_service::{
    BucketTotal, DailyBreakdown, DetailItem, DetailList, LedgerSnapshot, PeriodSummary,
    SummaryService, WeeklyBreakdown,
};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

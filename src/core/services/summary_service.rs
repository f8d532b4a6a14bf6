//! Pull-based aggregation over the ledger.
//!
//! Nothing here is cached or indexed: every call rescans the entries it is
//! given, which keeps results consistent with the store after any mutation.

use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::ledger::period::{self, weekday_label, WEEKDAYS, WEEK_BUCKETS};
use crate::ledger::{Dated, EntryId, ExpenseEntry, Ledger, Period, Totals};

/// One labelled slot of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotal {
    pub label: String,
    pub amount: Decimal,
}

impl BucketTotal {
    fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Seven weekday buckets, Sunday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBreakdown {
    pub buckets: Vec<BucketTotal>,
}

/// Five week-of-month buckets plus whatever fell past week five.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBreakdown {
    pub buckets: Vec<BucketTotal>,
    pub unbucketed: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailItem {
    pub id: EntryId,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Today's expenses, or the marker shown when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum DetailList {
    Entries(Vec<DetailItem>),
    NoExpenses,
}

impl DetailList {
    pub fn is_empty(&self) -> bool {
        matches!(self, DetailList::NoExpenses)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub income: Decimal,
    pub spent: Decimal,
    pub breakdown: Vec<BucketTotal>,
    /// Month expenses that landed outside the five week buckets.
    pub unbucketed: Decimal,
}

/// Everything the presenter redraws after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub totals: Totals,
    pub today: PeriodSummary,
    pub week: PeriodSummary,
    pub month: PeriodSummary,
    pub details: DetailList,
}

pub struct SummaryService;

impl SummaryService {
    pub fn sum_for_period<E, Tz>(entries: &[E], period: Period, now: &DateTime<Tz>) -> Decimal
    where
        E: Dated,
        Tz: TimeZone,
    {
        entries
            .iter()
            .filter(|entry| period.contains(&entry.instant(), now))
            .map(Dated::amount)
            .sum()
    }

    /// Groups entries inside the trailing week by local weekday.
    pub fn daily_breakdown<E, Tz>(entries: &[E], now: &DateTime<Tz>) -> DailyBreakdown
    where
        E: Dated,
        Tz: TimeZone,
    {
        let mut sums = [Decimal::ZERO; 7];
        for entry in entries {
            let instant = entry.instant();
            if period::is_this_week(&instant, now) {
                sums[period::weekday_index(&instant, now)] += entry.amount();
            }
        }
        let buckets = WEEKDAYS
            .iter()
            .zip(sums)
            .map(|(day, amount)| BucketTotal::new(weekday_label(*day), amount))
            .collect();
        DailyBreakdown { buckets }
    }

    /// Groups entries inside the current month by week of month.
    pub fn weekly_breakdown<E, Tz>(entries: &[E], now: &DateTime<Tz>) -> WeeklyBreakdown
    where
        E: Dated,
        Tz: TimeZone,
    {
        let mut sums = [Decimal::ZERO; WEEK_BUCKETS as usize];
        let mut unbucketed = Decimal::ZERO;
        for entry in entries {
            let instant = entry.instant();
            if !period::is_this_month(&instant, now) {
                continue;
            }
            let week = period::week_of_month(&instant, now);
            let slot = (week as usize)
                .checked_sub(1)
                .filter(|idx| *idx < sums.len());
            match slot {
                Some(idx) => sums[idx] += entry.amount(),
                None => {
                    warn!(week, amount = %entry.amount(), "entry outside week buckets");
                    unbucketed += entry.amount();
                }
            }
        }
        let buckets = sums
            .iter()
            .enumerate()
            .map(|(idx, amount)| BucketTotal::new(format!("Week {}", idx + 1), *amount))
            .collect();
        WeeklyBreakdown {
            buckets,
            unbucketed,
        }
    }

    /// Today's expenses in insertion order.
    pub fn detail_list<Tz: TimeZone>(
        expenses: &[ExpenseEntry],
        now: &DateTime<Tz>,
    ) -> DetailList {
        let items: Vec<DetailItem> = expenses
            .iter()
            .filter(|entry| period::is_today(&entry.occurred_at, now))
            .map(|entry| DetailItem {
                id: entry.id,
                category: entry.category.clone(),
                description: entry.description.clone(),
                amount: entry.amount,
                date: period::local_date(&entry.occurred_at, now),
            })
            .collect();
        if items.is_empty() {
            DetailList::NoExpenses
        } else {
            DetailList::Entries(items)
        }
    }

    pub fn summary<Tz: TimeZone>(
        ledger: &Ledger,
        period: Period,
        now: &DateTime<Tz>,
    ) -> PeriodSummary {
        let income = Self::sum_for_period(ledger.incomes(), period, now);
        let spent = Self::sum_for_period(ledger.expenses(), period, now);
        let (breakdown, unbucketed) = match period {
            Period::Today => {
                let breakdown = match Self::detail_list(ledger.expenses(), now) {
                    DetailList::Entries(items) => items
                        .into_iter()
                        .map(|item| BucketTotal::new(item.category, item.amount))
                        .collect(),
                    DetailList::NoExpenses => Vec::new(),
                };
                (breakdown, Decimal::ZERO)
            }
            Period::Week => (
                Self::daily_breakdown(ledger.expenses(), now).buckets,
                Decimal::ZERO,
            ),
            Period::Month => {
                let weekly = Self::weekly_breakdown(ledger.expenses(), now);
                (weekly.buckets, weekly.unbucketed)
            }
        };
        PeriodSummary {
            period,
            income,
            spent,
            breakdown,
            unbucketed,
        }
    }

    /// Rebuilds every summary view from scratch.
    pub fn snapshot<Tz: TimeZone>(ledger: &Ledger, now: &DateTime<Tz>) -> LedgerSnapshot {
        LedgerSnapshot {
            totals: ledger.totals(),
            today: Self::summary(ledger, Period::Today, now),
            week: Self::summary(ledger, Period::Week, now),
            month: Self::summary(ledger, Period::Month, now),
            details: Self::detail_list(ledger.expenses(), now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rust_decimal_macros::dec;

    fn at(m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, m, d, h, 0, 0)
            .unwrap()
    }

    fn bucket_sum(buckets: &[BucketTotal]) -> Decimal {
        buckets.iter().map(|bucket| bucket.amount).sum()
    }

    #[test]
    fn daily_breakdown_always_has_seven_ordered_buckets() {
        let ledger = Ledger::new("Empty");
        let daily = SummaryService::daily_breakdown(ledger.expenses(), &at(5, 15, 12));
        let labels: Vec<&str> = daily.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday"
            ]
        );
        assert!(daily.buckets.iter().all(|bucket| bucket.amount.is_zero()));
    }

    #[test]
    fn rolling_week_and_weekday_buckets_overlap_on_same_weekday() {
        // 2024-05-15 is a Wednesday; the 8th is also a Wednesday, exactly a week back.
        let now = at(5, 15, 12);
        let mut ledger = Ledger::new("Week");
        ledger.add_expense(dec!(40), "Food", None, at(5, 8, 12));
        ledger.add_expense(dec!(60), "Food", None, at(5, 15, 9));
        ledger.add_expense(dec!(99), "Old", None, at(5, 7, 12));

        let daily = SummaryService::daily_breakdown(ledger.expenses(), &now);
        assert_eq!(daily.buckets[3].label, "Wednesday");
        assert_eq!(daily.buckets[3].amount, dec!(100));
        assert_eq!(
            bucket_sum(&daily.buckets),
            SummaryService::sum_for_period(ledger.expenses(), Period::Week, &now)
        );
    }

    #[test]
    fn fractional_amounts_partition_the_week_exactly() {
        // Sunday the 12th and Monday the 13th, viewed from Wednesday the 15th.
        let now = at(5, 15, 12);
        let mut ledger = Ledger::new("Cents");
        ledger.add_expense(dec!(0.1), "Tea", None, at(5, 12, 9));
        ledger.add_expense(dec!(0.2), "Tea", None, at(5, 13, 9));
        ledger.add_expense(dec!(0.3), "Tea", None, at(5, 13, 17));

        let daily = SummaryService::daily_breakdown(ledger.expenses(), &now);
        let week = SummaryService::sum_for_period(ledger.expenses(), Period::Week, &now);
        assert_eq!(week, dec!(0.6));
        assert_eq!(bucket_sum(&daily.buckets), week);
        assert_eq!(daily.buckets[1].amount, dec!(0.5));

        let weekly = SummaryService::weekly_breakdown(ledger.expenses(), &now);
        let month = SummaryService::sum_for_period(ledger.expenses(), Period::Month, &now);
        assert_eq!(bucket_sum(&weekly.buckets) + weekly.unbucketed, month);
    }

    #[test]
    fn weekly_breakdown_sums_month_entries_by_week() {
        // June 2024 starts on a Saturday.
        let now = at(6, 20, 12);
        let mut ledger = Ledger::new("Month");
        ledger.add_expense(dec!(10), "A", None, at(6, 1, 8));
        ledger.add_expense(dec!(20), "B", None, at(6, 2, 8));
        ledger.add_expense(dec!(30), "C", None, at(6, 16, 8));
        ledger.add_expense(dec!(70), "Prev", None, at(5, 31, 8));

        let weekly = SummaryService::weekly_breakdown(ledger.expenses(), &now);
        let amounts: Vec<Decimal> = weekly.buckets.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, [dec!(10), dec!(20), dec!(0), dec!(30), dec!(0)]);
        assert_eq!(weekly.buckets[4].label, "Week 5");
        assert!(weekly.unbucketed.is_zero());
    }

    #[test]
    fn week_six_entries_are_reported_as_unbucketed() {
        let now = at(6, 30, 20);
        let mut ledger = Ledger::new("Overflow");
        ledger.add_expense(dec!(15), "Late", None, at(6, 30, 8));
        ledger.add_expense(dec!(5), "Early", None, at(6, 3, 8));

        let weekly = SummaryService::weekly_breakdown(ledger.expenses(), &now);
        assert_eq!(weekly.buckets.len(), 5);
        assert_eq!(bucket_sum(&weekly.buckets), dec!(5));
        assert_eq!(weekly.unbucketed, dec!(15));
        assert_eq!(
            bucket_sum(&weekly.buckets) + weekly.unbucketed,
            SummaryService::sum_for_period(ledger.expenses(), Period::Month, &now)
        );
    }

    #[test]
    fn detail_list_keeps_insertion_order_and_uses_sentinel() {
        let now = at(5, 15, 18);
        let mut ledger = Ledger::new("Detail");
        assert_eq!(
            SummaryService::detail_list(ledger.expenses(), &now),
            DetailList::NoExpenses
        );

        ledger.add_expense(dec!(5), "Coffee", Some("flat white".into()), at(5, 15, 8));
        ledger.add_expense(dec!(7), "Bus", None, at(5, 14, 8));
        ledger.add_expense(dec!(12), "Lunch", None, at(5, 15, 13));

        let DetailList::Entries(items) = SummaryService::detail_list(ledger.expenses(), &now)
        else {
            panic!("expected entries");
        };
        let categories: Vec<&str> = items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, ["Coffee", "Lunch"]);
        assert_eq!(items[0].description.as_deref(), Some("flat white"));
        assert_eq!(items[0].date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    }

    #[test]
    fn today_summary_lists_expenses_as_breakdown() {
        let now = at(5, 15, 18);
        let mut ledger = Ledger::new("Today");
        ledger.add_income(dec!(1000), at(5, 15, 7));
        ledger.add_expense(dec!(500), "Food", None, at(5, 15, 9));

        let summary = SummaryService::summary(&ledger, Period::Today, &now);
        assert_eq!(summary.income, dec!(1000));
        assert_eq!(summary.spent, dec!(500));
        assert_eq!(summary.breakdown, vec![BucketTotal::new("Food", dec!(500))]);
    }

    #[test]
    fn snapshot_serializes_detail_sentinel() {
        let ledger = Ledger::new("Json");
        let snapshot = SummaryService::snapshot(&ledger, &at(5, 15, 18));
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["details"]["kind"], "no_expenses");
        assert_eq!(json["week"]["breakdown"].as_array().map(Vec::len), Some(7));
        assert_eq!(json["month"]["breakdown"].as_array().map(Vec::len), Some(5));
    }
}

//! Text layouts for the summaries the ledger computes.

use crate::config::Config;
use crate::core::services::{DetailList, LedgerSnapshot, PeriodSummary};
use crate::ledger::{ExpenseEntry, IncomeEntry, Period, Totals};

const NO_EXPENSES_TODAY: &str = "No expenses for today.";

pub fn totals_lines(config: &Config, totals: &Totals) -> Vec<String> {
    vec![
        format!("Total income: {}", config.format_money(totals.total_income)),
        format!("Total spent:  {}", config.format_money(totals.total_spent)),
        format!("In hand:      {}", config.format_money(totals.in_hand)),
    ]
}

pub fn summary_lines(config: &Config, summary: &PeriodSummary) -> Vec<String> {
    let (income_label, spent_label) = match summary.period {
        Period::Today => ("Today's income", "Today's spent"),
        Period::Week => ("Weekly income", "Weekly spent"),
        Period::Month => ("Monthly income", "Monthly spent"),
    };
    let mut lines = vec![
        format!("{income_label}: {}", config.format_money(summary.income)),
        format!("{spent_label}: {}", config.format_money(summary.spent)),
    ];
    if summary.period == Period::Today && summary.breakdown.is_empty() {
        lines.push(format!("  {NO_EXPENSES_TODAY}"));
    }
    lines.extend(
        summary
            .breakdown
            .iter()
            .map(|bucket| format!("  {}: {}", bucket.label, config.format_money(bucket.amount))),
    );
    if !summary.unbucketed.is_zero() {
        lines.push(format!(
            "  Beyond week 5: {}",
            config.format_money(summary.unbucketed)
        ));
    }
    lines
}

pub fn detail_lines(config: &Config, details: &DetailList) -> Vec<String> {
    match details {
        DetailList::NoExpenses => vec![NO_EXPENSES_TODAY.to_string()],
        DetailList::Entries(items) => items
            .iter()
            .map(|item| {
                let mut line = format!(
                    "{} {}: {} - {}",
                    item.id,
                    item.category,
                    config.format_money(item.amount),
                    item.date.format("%Y-%m-%d")
                );
                if let Some(description) = &item.description {
                    line.push_str(&format!(" ({description})"));
                }
                line
            })
            .collect(),
    }
}

pub fn entry_lines(
    config: &Config,
    incomes: &[IncomeEntry],
    expenses: &[ExpenseEntry],
) -> Vec<String> {
    let mut lines = Vec::with_capacity(incomes.len() + expenses.len());
    lines.extend(incomes.iter().map(|entry| {
        format!(
            "{} income {} at {}",
            entry.id,
            config.format_money(entry.amount),
            entry.recorded_at.format("%Y-%m-%d %H:%M")
        )
    }));
    lines.extend(expenses.iter().map(|entry| {
        format!(
            "{} expense {} {} at {}",
            entry.id,
            entry.category,
            config.format_money(entry.amount),
            entry.occurred_at.format("%Y-%m-%d %H:%M")
        )
    }));
    lines
}

/// Sections in the order they are drawn after a mutation.
pub fn snapshot_sections(
    config: &Config,
    snapshot: &LedgerSnapshot,
) -> Vec<(String, Vec<String>)> {
    vec![
        ("Totals".to_string(), totals_lines(config, &snapshot.totals)),
        (
            Period::Today.label().to_string(),
            summary_lines(config, &snapshot.today),
        ),
        (
            Period::Week.label().to_string(),
            summary_lines(config, &snapshot.week),
        ),
        (
            Period::Month.label().to_string(),
            summary_lines(config, &snapshot.month),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::SummaryService;
    use crate::ledger::Ledger;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    #[test]
    fn empty_today_prints_sentinel() {
        let config = Config::default();
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 15, 12, 0, 0)
            .unwrap();
        let ledger = Ledger::new("Render");
        let snapshot = SummaryService::snapshot(&ledger, &now);

        let lines = summary_lines(&config, &snapshot.today);
        assert_eq!(
            lines,
            [
                "Today's income: ₹0.00",
                "Today's spent: ₹0.00",
                "  No expenses for today."
            ]
        );
        assert_eq!(detail_lines(&config, &snapshot.details), [NO_EXPENSES_TODAY]);
    }

    #[test]
    fn week_section_lists_every_weekday() {
        let config = Config::default();
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 15, 12, 0, 0)
            .unwrap();
        let mut ledger = Ledger::new("Render");
        ledger.add_expense(dec!(500), "Food", None, now);
        let snapshot = SummaryService::snapshot(&ledger, &now);

        let lines = summary_lines(&config, &snapshot.week);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "Weekly spent: ₹500.00");
        assert_eq!(lines[5], "  Wednesday: ₹500.00");
    }

    #[test]
    fn totals_show_in_hand_balance() {
        let config = Config::default();
        let totals = Totals {
            total_income: dec!(1000),
            total_spent: dec!(300),
            in_hand: dec!(700),
        };
        assert_eq!(totals_lines(&config, &totals)[2], "In hand:      ₹700.00");
    }
}

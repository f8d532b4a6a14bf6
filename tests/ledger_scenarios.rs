mod common;

use common::{at, manager_at};
use pocket_ledger::{
    core::{
        services::{DetailList, EditOutcome, SummaryService},
        FixedClock,
    },
    errors::LedgerError,
    ledger::{Period, Totals},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn totals(income: Decimal, spent: Decimal, in_hand: Decimal) -> Totals {
    Totals {
        total_income: income,
        total_spent: spent,
        in_hand,
    }
}

#[test]
fn income_expense_edit_remove_walkthrough() {
    let mut manager = manager_at(at(2024, 7, 10, 11));

    manager.record_income(dec!(1000)).expect("income");
    assert_eq!(manager.totals(), totals(dec!(1000), dec!(0), dec!(1000)));

    let food = manager
        .record_expense(dec!(500), "Food", Some("weekly groceries"))
        .expect("expense");
    assert_eq!(manager.totals(), totals(dec!(1000), dec!(500), dec!(500)));
    assert_eq!(manager.summary(Period::Today).spent, dec!(500));

    let outcome = manager.edit_expense(food, dec!(300), "Food").expect("edit");
    assert_eq!(outcome, EditOutcome::Applied);
    assert_eq!(manager.totals(), totals(dec!(1000), dec!(300), dec!(700)));
    let stored = manager.ledger().expense(food).expect("still present");
    assert_eq!(stored.occurred_at, at(2024, 7, 10, 11));
    assert_eq!(stored.description.as_deref(), Some("weekly groceries"));

    manager.remove_expense(food).expect("remove");
    assert_eq!(manager.totals(), totals(dec!(1000), dec!(0), dec!(1000)));
    assert_eq!(manager.detail_list(), DetailList::NoExpenses);
}

#[test]
fn cancelled_edit_keeps_entry_and_totals() {
    let mut manager = manager_at(at(2024, 7, 10, 11));
    manager.record_income(dec!(200)).unwrap();
    let id = manager.record_expense(dec!(80), "Fuel", None).unwrap();
    let before = manager.snapshot();

    assert_eq!(
        manager.edit_expense(id, dec!(0), "Fuel").unwrap(),
        EditOutcome::Cancelled
    );
    assert_eq!(
        manager.edit_expense(id, dec!(50), "  ").unwrap(),
        EditOutcome::Cancelled
    );

    assert_eq!(manager.snapshot(), before);
}

#[test]
fn removing_twice_reports_missing_entry() {
    let mut manager = manager_at(at(2024, 7, 10, 11));
    let id = manager.record_expense(dec!(12), "Snacks", None).unwrap();
    manager.remove_expense(id).unwrap();

    let err = manager.remove_expense(id).expect_err("already removed");
    assert_eq!(err, LedgerError::EntryNotFound(id));
    assert_eq!(manager.totals().total_spent, dec!(0));
}

#[test]
fn entries_with_same_amount_and_time_are_distinct() {
    let mut manager = manager_at(at(2024, 7, 10, 11));
    let first = manager.record_expense(dec!(25), "Tea", None).unwrap();
    let second = manager.record_expense(dec!(25), "Tea", None).unwrap();
    assert_ne!(first, second);

    manager.remove_expense(first).unwrap();

    assert_eq!(manager.ledger().expenses().len(), 1);
    assert_eq!(manager.totals().total_spent, dec!(25));
    let DetailList::Entries(items) = manager.detail_list() else {
        panic!("one expense left today");
    };
    assert_eq!(items[0].id, second);
}

#[test]
fn incomes_eight_days_apart_split_week_and_month() {
    let earlier = at(2024, 7, 2, 9);
    let later = at(2024, 7, 10, 9);
    let mut manager = manager_at(earlier);
    manager.record_income(dec!(100)).unwrap();
    manager.replace_clock(FixedClock(later));
    manager.record_income(dec!(100)).unwrap();

    let incomes = manager.ledger().incomes();
    assert_eq!(
        SummaryService::sum_for_period(incomes, Period::Week, &later),
        dec!(100)
    );
    assert_eq!(
        SummaryService::sum_for_period(incomes, Period::Month, &later),
        dec!(200)
    );
    assert_eq!(manager.summary(Period::Week).income, dec!(100));
    assert_eq!(manager.summary(Period::Month).income, dec!(200));
}

#[test]
fn fractional_income_exactly_covered_by_spending() {
    let mut manager = manager_at(at(2024, 7, 10, 11));
    manager.record_income(dec!(0.3)).unwrap();
    manager.record_expense(dec!(0.1), "Tea", None).unwrap();
    manager.record_expense(dec!(0.2), "Biscuits", None).unwrap();

    assert_eq!(manager.totals(), totals(dec!(0.3), dec!(0.3), Decimal::ZERO));
    let today = manager.summary(Period::Today);
    assert_eq!(today.income, today.spent);
}

#[test]
fn snapshot_rebuilds_every_view() {
    let mut manager = manager_at(at(2024, 7, 10, 9));
    manager.record_income(dec!(1500)).unwrap();
    manager.record_expense(dec!(120), "Transport", None).unwrap();
    manager.replace_clock(FixedClock(at(2024, 7, 12, 20)));
    manager.record_expense(dec!(80), "Food", None).unwrap();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.totals, totals(dec!(1500), dec!(200), dec!(1300)));
    assert_eq!(snapshot.today.spent, dec!(80));
    assert_eq!(snapshot.today.income, dec!(0));
    assert_eq!(snapshot.week.spent, dec!(200));
    assert_eq!(snapshot.month.spent, dec!(200));
    assert_eq!(snapshot.week.breakdown.len(), 7);
    assert_eq!(snapshot.month.breakdown.len(), 5);

    // 2024-07-10 is a Wednesday, the 12th a Friday.
    assert_eq!(snapshot.week.breakdown[3].amount, dec!(120));
    assert_eq!(snapshot.week.breakdown[5].amount, dec!(80));
    // July 2024 starts on a Monday, so both days sit in week 2.
    assert_eq!(snapshot.month.breakdown[1].amount, dec!(200));
}

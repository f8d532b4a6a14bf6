//! Calendar rules that decide which summary period an instant belongs to.
//!
//! All predicates are pure functions of `(instant, now)`. Calendar fields are
//! read in the time zone of `now`, so an entry recorded late in the evening in
//! one offset still lands on the viewer's local day.
//!
//! "This week" is a trailing seven-day window ending at `now`, while the daily
//! breakdown buckets by calendar weekday. The two intentionally disagree: an
//! entry from exactly seven days ago shares a weekday bucket with today.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the trailing "this week" window.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Number of week-of-month buckets reported in a monthly breakdown.
pub const WEEK_BUCKETS: u32 = 5;

/// Weekday order used for daily breakdowns.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Today, Period::Week, Period::Month];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Week => "This Week",
            Period::Month => "This Month",
        }
    }

    /// Word accepted on the command line for this period.
    pub fn keyword(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Membership predicate for this period.
    pub fn contains<A, B>(&self, instant: &DateTime<A>, now: &DateTime<B>) -> bool
    where
        A: TimeZone,
        B: TimeZone,
    {
        match self {
            Period::Today => is_today(instant, now),
            Period::Week => is_this_week(instant, now),
            Period::Month => is_this_month(instant, now),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period `{0}` (expected today, week or month)")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" | "this-week" | "weekly" => Ok(Period::Week),
            "month" | "this-month" | "monthly" => Ok(Period::Month),
            other => Err(ParsePeriodError(other.to_string())),
        }
    }
}

/// Calendar date of `instant` as seen from the time zone of `now`.
pub fn local_date<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> NaiveDate
where
    A: TimeZone,
    B: TimeZone,
{
    instant.with_timezone(&now.timezone()).date_naive()
}

pub fn is_today<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> bool
where
    A: TimeZone,
    B: TimeZone,
{
    local_date(instant, now) == now.date_naive()
}

/// True when `now - 7 days <= instant <= now`. Both ends are inclusive and
/// instants after `now` are outside the window.
pub fn is_this_week<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> bool
where
    A: TimeZone,
    B: TimeZone,
{
    let at = instant.naive_utc();
    let end = now.naive_utc();
    let start = end - Duration::days(WEEK_WINDOW_DAYS);
    at >= start && at <= end
}

pub fn is_this_month<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> bool
where
    A: TimeZone,
    B: TimeZone,
{
    let date = local_date(instant, now);
    let today = now.date_naive();
    date.year() == today.year() && date.month() == today.month()
}

/// Index into [`WEEKDAYS`] (0 = Sunday) for the local weekday of `instant`.
pub fn weekday_index<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> usize
where
    A: TimeZone,
    B: TimeZone,
{
    local_date(instant, now).weekday().num_days_from_sunday() as usize
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Week-of-month bucket for the local date of `instant`.
pub fn week_of_month<A, B>(instant: &DateTime<A>, now: &DateTime<B>) -> u32
where
    A: TimeZone,
    B: TimeZone,
{
    week_of_month_for_date(local_date(instant, now))
}

/// `ceil((day_of_month + weekday_of_first) / 7)` with Sunday = 0.
///
/// Months whose first falls late in the week can reach 6, for example the
/// 31st of a month starting on Friday. Callers decide what to do with those.
pub fn week_of_month_for_date(date: NaiveDate) -> u32 {
    let day = date.day();
    let weekday = date.weekday().num_days_from_sunday();
    let first_weekday = (weekday + 7 - (day - 1) % 7) % 7;
    (day + first_weekday).div_ceil(7)
}

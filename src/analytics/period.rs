use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};

/// Reporting granularity selected by the `range` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Range {
    /// Case-insensitive. Unrecognized tokens fall back to weekly rather
    /// than erroring; callers rely on this.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "daily" => Range::Daily,
            "monthly" => Range::Monthly,
            "yearly" => Range::Yearly,
            _ => Range::Weekly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Range::Daily => "daily",
            Range::Weekly => "weekly",
            Range::Monthly => "monthly",
            Range::Yearly => "yearly",
        }
    }
}

/// Current and previous reporting windows for one granularity.
///
/// `previous_end` sits exactly one nanosecond before `current_start`, so
/// the two windows neither overlap nor leave a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub current_start: DateTime<Utc>,
    pub previous_start: DateTime<Utc>,
    pub previous_end: DateTime<Utc>,
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The Monday on or before `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.ordinal0()))
}

/// Week-of-month under a Monday-anchored numbering where only full weeks
/// count: the nth Monday of the month. Callers only evaluate this at a
/// week's Monday.
pub fn week_of_month(monday: NaiveDate) -> u32 {
    (monday.day() - 1) / 7 + 1
}

pub fn resolve(range: Range, now: DateTime<Utc>) -> PeriodWindow {
    let today = now.date_naive();
    let (current, previous) = match range {
        Range::Daily => (today, today - Days::new(1)),
        Range::Weekly => {
            let monday = monday_of_week(today);
            (monday, monday - Days::new(7))
        }
        Range::Monthly => {
            let first = first_of_month(today);
            (first, first_of_month(first - Days::new(1)))
        }
        Range::Yearly => {
            let first = first_of_year(today);
            (first, first_of_year(first - Days::new(1)))
        }
    };

    let current_start = start_of_day(current);
    PeriodWindow {
        current_start,
        previous_start: start_of_day(previous),
        previous_end: current_start - Duration::nanoseconds(1),
    }
}

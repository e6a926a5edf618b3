use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::constants::{DAILY_CHART_DAYS, WEEKLY_CHART_WEEKS, YEARLY_CHART_YEARS};
use crate::store::{Store, StoreError};

use super::period::{
    first_of_year, monday_of_week, start_of_day, week_of_month, Range,
};

/// One bucket of the dashboard time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub new_places: u64,
    pub new_users: u64,
    /// Places created strictly before this bucket's end.
    pub total_places: u64,
    pub total_users: u64,
}

/// Builds the full chart series for one granularity. Finite and
/// restartable: every call recounts from committed store state.
pub fn build_chart_series(
    store: &Store,
    range: Range,
    today: NaiveDate,
) -> Result<Vec<ChartPoint>, StoreError> {
    match range {
        Range::Daily => daily_series(store, today),
        Range::Weekly => weekly_series(store, today),
        Range::Monthly => monthly_series(store, today),
        Range::Yearly => yearly_series(store, today),
    }
}

/// Seven buckets ending today. One window scan feeds all buckets: the
/// cumulative figure for a bucket is the pre-window total plus the
/// in-window entries before the bucket's end, which matches a direct
/// count-before-bucket-end.
fn daily_series(store: &Store, today: NaiveDate) -> Result<Vec<ChartPoint>, StoreError> {
    let start_date = today - Days::new(DAILY_CHART_DAYS as u64 - 1);
    let window_start = start_of_day(start_date);
    let window_end = start_of_day(start_date + Days::new(DAILY_CHART_DAYS as u64));

    let base_places = store.count_places_created_before(window_start)?;
    let base_users = store.count_users_created_before(window_start)?;
    let place_times = store.place_created_times_between(window_start, window_end)?;
    let user_times = store.user_created_times_between(window_start, window_end)?;

    let mut points = Vec::with_capacity(DAILY_CHART_DAYS as usize);
    for i in 0..DAILY_CHART_DAYS {
        let day = start_date + Days::new(i as u64);
        let bucket_start = start_of_day(day).timestamp_millis();
        let bucket_end = start_of_day(day + Days::new(1)).timestamp_millis();

        let new_places = place_times
            .iter()
            .filter(|t| (bucket_start..bucket_end).contains(*t))
            .count() as u64;
        let new_users = user_times
            .iter()
            .filter(|t| (bucket_start..bucket_end).contains(*t))
            .count() as u64;
        let total_places =
            base_places + place_times.iter().filter(|t| **t < bucket_end).count() as u64;
        let total_users =
            base_users + user_times.iter().filter(|t| **t < bucket_end).count() as u64;

        points.push(ChartPoint {
            label: format!("{}({})", day.format("%m-%d"), day.format("%a")),
            new_places,
            new_users,
            total_places,
            total_users,
        });
    }
    Ok(points)
}

/// Seven Monday-anchored weeks ending with the current week. Few enough
/// buckets that each one recounts directly.
fn weekly_series(store: &Store, today: NaiveDate) -> Result<Vec<ChartPoint>, StoreError> {
    let mut points = Vec::with_capacity(WEEKLY_CHART_WEEKS as usize);
    for i in (0..WEEKLY_CHART_WEEKS).rev() {
        let monday = monday_of_week(today - Days::new(7 * i as u64));
        let start = start_of_day(monday);
        let end = start_of_day(monday + Days::new(7));

        points.push(ChartPoint {
            label: format!("{}월 {}주차", monday.month(), week_of_month(monday)),
            new_places: store.count_places_created_between(start, end)?,
            new_users: store.count_users_created_between(start, end)?,
            total_places: store.count_places_created_before(end)?,
            total_users: store.count_users_created_before(end)?,
        });
    }
    Ok(points)
}

/// Calendar months of the current year, January through the month holding
/// `today`. Future months are never emitted.
fn monthly_series(store: &Store, today: NaiveDate) -> Result<Vec<ChartPoint>, StoreError> {
    let january = first_of_year(today);
    let mut points = Vec::new();
    for i in 0..12u32 {
        let month_start = january + Months::new(i);
        if month_start > today {
            break;
        }
        let start = start_of_day(month_start);
        let end = start_of_day(month_start + Months::new(1));

        points.push(ChartPoint {
            label: month_start.format("%b").to_string(),
            new_places: store.count_places_created_between(start, end)?,
            new_users: store.count_users_created_between(start, end)?,
            total_places: store.count_places_created_before(end)?,
            total_users: store.count_users_created_before(end)?,
        });
    }
    Ok(points)
}

/// The current year and the four before it.
fn yearly_series(store: &Store, today: NaiveDate) -> Result<Vec<ChartPoint>, StoreError> {
    let january = first_of_year(today);
    let mut points = Vec::with_capacity(YEARLY_CHART_YEARS as usize);
    for i in (0..YEARLY_CHART_YEARS).rev() {
        let year_start = january - Months::new(12 * i as u32);
        let start = start_of_day(year_start);
        let end = start_of_day(year_start + Months::new(12));

        points.push(ChartPoint {
            label: year_start.year().to_string(),
            new_places: store.count_places_created_between(start, end)?,
            new_users: store.count_users_created_between(start, end)?,
            total_places: store.count_places_created_before(end)?,
            total_users: store.count_users_created_before(end)?,
        });
    }
    Ok(points)
}

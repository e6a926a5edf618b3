use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::store::{Store, StoreError};

use super::growth::growth_rate;
use super::period::{self, first_of_month, first_of_year, monday_of_week, start_of_day, Range};

/// Headline dashboard figures for one reporting period.
///
/// `new_places_chart_data` and `new_users_chart_data` are single-key maps
/// keyed by the range token. They predate the chart endpoint and the admin
/// front end still reads them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_places: u64,
    pub total_users: u64,
    pub period_places_count: u64,
    pub places_growth_rate: f64,
    pub users_growth_rate: f64,
    pub new_places_chart_data: HashMap<String, u64>,
    pub new_users_chart_data: HashMap<String, u64>,
}

/// Entities created since the start of each calendar period containing
/// `now`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub places_daily: u64,
    pub places_weekly: u64,
    pub places_monthly: u64,
    pub places_yearly: u64,
    pub users_daily: u64,
    pub users_weekly: u64,
    pub users_monthly: u64,
    pub users_yearly: u64,
}

pub fn dashboard_data(
    store: &Store,
    range: Range,
    now: DateTime<Utc>,
) -> Result<DashboardData, StoreError> {
    let window = period::resolve(range, now);
    // Windows are inclusive of their end instant; with millisecond keys
    // that is an exclusive bound one millisecond later (for `now`) or at
    // `current_start` (for the previous window's last nanosecond).
    let now_end = now + Duration::milliseconds(1);

    let total_places = store.count_places()?;
    let total_users = store.count_users()?;

    let current_places = store.count_places_created_between(window.current_start, now_end)?;
    let previous_places =
        store.count_places_created_between(window.previous_start, window.current_start)?;
    let current_users = store.count_users_created_between(window.current_start, now_end)?;
    let previous_users =
        store.count_users_created_between(window.previous_start, window.current_start)?;

    let token = range.as_str().to_string();
    Ok(DashboardData {
        total_places,
        total_users,
        period_places_count: current_places,
        places_growth_rate: growth_rate(current_places, previous_places),
        users_growth_rate: growth_rate(current_users, previous_users),
        new_places_chart_data: HashMap::from([(token.clone(), current_places)]),
        new_users_chart_data: HashMap::from([(token, current_users)]),
    })
}

pub fn stats_data(store: &Store, now: DateTime<Utc>) -> Result<StatsData, StoreError> {
    let today = now.date_naive();
    let now_end = now + Duration::milliseconds(1);

    let day_start = start_of_day(today);
    let week_start = start_of_day(monday_of_week(today));
    let month_start = start_of_day(first_of_month(today));
    let year_start = start_of_day(first_of_year(today));

    Ok(StatsData {
        places_daily: store.count_places_created_between(day_start, now_end)?,
        places_weekly: store.count_places_created_between(week_start, now_end)?,
        places_monthly: store.count_places_created_between(month_start, now_end)?,
        places_yearly: store.count_places_created_between(year_start, now_end)?,
        users_daily: store.count_users_created_between(day_start, now_end)?,
        users_weekly: store.count_users_created_between(week_start, now_end)?,
        users_monthly: store.count_users_created_between(month_start, now_end)?,
        users_yearly: store.count_users_created_between(year_start, now_end)?,
    })
}

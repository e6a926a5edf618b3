/// Maximum retries for compare-and-swap updates of a place record.
pub const MAX_CAS_RETRIES: u32 = 20;

/// Number of activity log rows shown in the admin back office.
pub const ACTIVITY_LOG_PAGE: usize = 100;

/// Lowest and highest accepted review rating.
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Buckets emitted by the daily chart (today plus six preceding days).
pub const DAILY_CHART_DAYS: i64 = 7;

/// Buckets emitted by the weekly chart (current week plus six preceding).
pub const WEEKLY_CHART_WEEKS: i64 = 7;

/// Buckets emitted by the yearly chart (current year plus four preceding).
pub const YEARLY_CHART_YEARS: i32 = 5;

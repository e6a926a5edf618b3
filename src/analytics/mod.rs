//! Dashboard aggregates over the place and user collections.
//!
//! Everything here recomputes from committed store state on each call.
//! Nothing is cached between requests.

pub mod chart;
pub mod dashboard;
pub mod growth;
pub mod period;
pub mod report_groups;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// The place no longer exists.
    Disappeared,
    /// The place is mapped or described incorrectly.
    Incorrect,
    /// Catch-all; requires free-text content.
    Other,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Disappeared => "disappeared",
            ReportType::Incorrect => "incorrect",
            ReportType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub place_id: String,
    /// None for anonymous reporters.
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Appends a report. When `enforce_once` is set (regular logged-in
    /// users), a second report for the same place by the same user is a
    /// conflict; admins and anonymous reporters are exempt.
    pub fn create_report(&self, report: &Report, enforce_once: bool) -> Result<(), StoreError> {
        if let (true, Some(user_id)) = (enforce_once, report.user_id.as_deref()) {
            let index_key = keys::report_user_index_key(user_id, &report.place_id);
            let cas_result = self
                .reports
                .compare_and_swap(
                    index_key.as_bytes(),
                    None::<&[u8]>,
                    Some(report.id.as_bytes().to_vec()),
                )
                .map_err(StoreError::Sled)?;
            if cas_result.is_err() {
                return Err(StoreError::Conflict {
                    entity: "report".to_string(),
                    key: format!("{}:{}", user_id, report.place_id),
                });
            }
        }

        let key = keys::report_key(
            &report.place_id,
            report.created_at.timestamp_millis(),
            &report.id,
        );
        self.reports.insert(key.as_bytes(), Self::serialize(report)?)?;
        Ok(())
    }

    /// All reports in key order: grouped by place, arrival order within a
    /// place.
    pub fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        let mut reports = Vec::new();
        for item in self.reports.iter() {
            let (key, value) = item?;
            if String::from_utf8_lossy(&key).starts_with("user:") {
                continue;
            }
            reports.push(Self::deserialize::<Report>(&value)?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn report(id: &str, place_id: &str, user_id: Option<&str>, report_type: ReportType) -> Report {
        Report {
            id: id.to_string(),
            place_id: place_id.to_string(),
            user_id: user_id.map(str::to_string),
            report_type,
            content: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn anonymous_reports_are_unrestricted() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("reports-db").to_str().unwrap()).unwrap();

        store
            .create_report(&report("r1", "p1", None, ReportType::Disappeared), true)
            .unwrap();
        store
            .create_report(&report("r2", "p1", None, ReportType::Disappeared), true)
            .unwrap();
        assert_eq!(store.list_reports().unwrap().len(), 2);
    }

    #[test]
    fn second_report_by_same_user_conflicts() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("reports-db2").to_str().unwrap()).unwrap();

        store
            .create_report(&report("r1", "p1", Some("u1"), ReportType::Incorrect), true)
            .unwrap();
        let err = store
            .create_report(&report("r2", "p1", Some("u1"), ReportType::Other), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn exempt_reporters_skip_the_once_rule() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("reports-db3").to_str().unwrap()).unwrap();

        store
            .create_report(&report("r1", "p1", Some("admin1"), ReportType::Incorrect), false)
            .unwrap();
        store
            .create_report(&report("r2", "p1", Some("admin1"), ReportType::Incorrect), false)
            .unwrap();
        assert_eq!(store.list_reports().unwrap().len(), 2);
    }

    #[test]
    fn reports_keep_arrival_order_within_a_place() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("reports-db4").to_str().unwrap()).unwrap();

        let now = Utc::now();
        let mut first = report("r1", "p1", None, ReportType::Other);
        first.created_at = now - Duration::minutes(2);
        first.content = Some("first".to_string());
        let mut second = report("r2", "p1", None, ReportType::Other);
        second.created_at = now;
        second.content = Some("second".to_string());

        // insert out of order; key ordering restores arrival order
        store.create_report(&second, true).unwrap();
        store.create_report(&first, true).unwrap();

        let listed = store.list_reports().unwrap();
        assert_eq!(listed[0].content.as_deref(), Some("first"));
        assert_eq!(listed[1].content.as_deref(), Some("second"));
    }
}

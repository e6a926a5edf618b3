use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ACTIVITY_LOG_PAGE;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// None for anonymous visitors.
    pub user_id: Option<String>,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn append_activity_log(&self, log: &ActivityLog) -> Result<(), StoreError> {
        let key = keys::activity_log_key(log.created_at.timestamp_millis(), &log.id);
        self.activity_logs
            .insert(key.as_bytes(), Self::serialize(log)?)?;
        Ok(())
    }

    /// Most recent page of activity, newest first. Key encoding is
    /// reverse-timestamp so a forward scan already yields that order.
    pub fn list_recent_activity_logs(&self) -> Result<Vec<ActivityLog>, StoreError> {
        let mut logs = Vec::new();
        for item in self.activity_logs.iter().take(ACTIVITY_LOG_PAGE) {
            let (_, value) = item?;
            logs.push(Self::deserialize::<ActivityLog>(&value)?);
        }
        Ok(logs)
    }

    /// Every recorded coordinate, for heatmap rendering.
    pub fn list_all_activity_logs(&self) -> Result<Vec<ActivityLog>, StoreError> {
        let mut logs = Vec::new();
        for item in self.activity_logs.iter() {
            let (_, value) = item?;
            logs.push(Self::deserialize::<ActivityLog>(&value)?);
        }
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn log(id: &str, created_at: DateTime<Utc>) -> ActivityLog {
        ActivityLog {
            id: id.to_string(),
            latitude: 37.5,
            longitude: 127.0,
            user_id: None,
            session_id: "s1".to_string(),
            created_at,
        }
    }

    #[test]
    fn recent_logs_come_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("activity-db").to_str().unwrap()).unwrap();

        let now = Utc::now();
        store.append_activity_log(&log("a1", now - Duration::minutes(2))).unwrap();
        store.append_activity_log(&log("a2", now)).unwrap();
        store.append_activity_log(&log("a3", now - Duration::minutes(1))).unwrap();

        let recent = store.list_recent_activity_logs().unwrap();
        let ids: Vec<&str> = recent.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn recent_listing_is_capped() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("activity-db2").to_str().unwrap()).unwrap();

        let now = Utc::now();
        for i in 0..(ACTIVITY_LOG_PAGE + 5) {
            store
                .append_activity_log(&log(&format!("a{i}"), now - Duration::seconds(i as i64)))
                .unwrap();
        }

        assert_eq!(store.list_recent_activity_logs().unwrap().len(), ACTIVITY_LOG_PAGE);
        assert_eq!(store.list_all_activity_logs().unwrap().len(), ACTIVITY_LOG_PAGE + 5);
    }
}

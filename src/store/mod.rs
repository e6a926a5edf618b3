pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub sessions: sled::Tree,
    pub places: sled::Tree,
    pub reviews: sled::Tree,
    pub favorites: sled::Tree,
    pub reports: sled::Tree,
    pub edit_requests: sled::Tree,
    pub activity_logs: sled::Tree,
    pub meta: sled::Tree,
    // Secondary index trees
    pub users_by_created_at: sled::Tree,
    pub places_by_created_at: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("CAS retry exhausted after {attempts} attempts: entity={entity}, key={key}")]
    CasRetryExhausted {
        entity: String,
        key: String,
        attempts: u32,
    },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let sessions = db.open_tree(trees::SESSIONS)?;
        let places = db.open_tree(trees::PLACES)?;
        let reviews = db.open_tree(trees::REVIEWS)?;
        let favorites = db.open_tree(trees::FAVORITES)?;
        let reports = db.open_tree(trees::REPORTS)?;
        let edit_requests = db.open_tree(trees::EDIT_REQUESTS)?;
        let activity_logs = db.open_tree(trees::ACTIVITY_LOGS)?;
        let meta = db.open_tree(trees::META)?;
        let users_by_created_at = db.open_tree(trees::USERS_BY_CREATED_AT)?;
        let places_by_created_at = db.open_tree(trees::PLACES_BY_CREATED_AT)?;

        Ok(Self {
            db,
            users,
            sessions,
            places,
            reviews,
            favorites,
            reports,
            edit_requests,
            activity_logs,
            meta,
            users_by_created_at,
            places_by_created_at,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    /// Count index entries whose creation timestamp falls in `[start, end)`.
    pub(crate) fn count_index_range(
        tree: &sled::Tree,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<u64, StoreError> {
        let lo = keys::created_at_bound(start_ms);
        let hi = keys::created_at_bound(end_ms);
        let mut count = 0u64;
        for item in tree.range(lo.as_bytes()..hi.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    /// Count index entries created strictly before `end`.
    pub(crate) fn count_index_before(tree: &sled::Tree, end_ms: i64) -> Result<u64, StoreError> {
        let hi = keys::created_at_bound(end_ms);
        let mut count = 0u64;
        for item in tree.range(..hi.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    /// Creation timestamps (millis, ascending) of index entries in
    /// `[start, end)`. The timestamp is parsed out of the key, so this never
    /// touches the primary records.
    pub(crate) fn index_timestamps_between(
        tree: &sled::Tree,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let lo = keys::created_at_bound(start_ms);
        let hi = keys::created_at_bound(end_ms);
        let mut stamps = Vec::new();
        for item in tree.range(lo.as_bytes()..hi.as_bytes()) {
            let (key, _) = item?;
            let key_str = String::from_utf8_lossy(&key);
            let Some((ts, _)) = key_str.split_once(':') else {
                continue;
            };
            if let Ok(parsed) = ts.parse::<i64>() {
                stamps.push(parsed);
            }
        }
        Ok(stamps)
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

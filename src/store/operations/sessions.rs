use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Store {
    pub fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let key = keys::session_key(&session.token_hash);
        self.sessions
            .insert(key.as_bytes(), Self::serialize(session)?)?;
        Ok(())
    }

    /// Returns None for expired sessions; expired entries are removed
    /// opportunistically on read rather than by a background job.
    pub fn get_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        let key = keys::session_key(token_hash);
        let Some(raw) = self.sessions.get(key.as_bytes())? else {
            return Ok(None);
        };

        let session = Self::deserialize::<Session>(&raw)?;
        if session.expires_at <= Utc::now() {
            let _ = self.sessions.remove(key.as_bytes());
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let key = keys::session_key(token_hash);
        self.sessions.remove(key.as_bytes())?;
        Ok(())
    }

    /// Revokes every session belonging to a user. Logout invalidates all
    /// of the user's tokens, not just the one presented.
    pub fn delete_user_sessions(&self, user_id: &str) -> Result<u64, StoreError> {
        let mut stale = Vec::new();
        for item in self.sessions.iter() {
            let (key, value) = item?;
            let session: Session = Self::deserialize(&value)?;
            if session.user_id == user_id {
                stale.push(key.to_vec());
            }
        }

        let removed = stale.len() as u64;
        for key in stale {
            self.sessions.remove(key)?;
        }
        Ok(removed)
    }
}

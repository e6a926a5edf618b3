use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Reviewed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub content: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn create_edit_request(&self, request: &EditRequest) -> Result<(), StoreError> {
        let key = keys::edit_request_key(&request.place_id, &request.id);
        self.edit_requests
            .insert(key.as_bytes(), Self::serialize(request)?)?;
        Ok(())
    }

    pub fn list_pending_edit_requests_for_place(
        &self,
        place_id: &str,
    ) -> Result<Vec<EditRequest>, StoreError> {
        let prefix = keys::edit_request_place_prefix(place_id);
        let mut requests = Vec::new();
        for item in self.edit_requests.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let request: EditRequest = Self::deserialize(&value)?;
            if request.status == RequestStatus::Pending {
                requests.push(request);
            }
        }
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }

    /// Marks every pending request for a place reviewed. Called when an
    /// admin applies a description update, which settles the suggestions.
    pub fn mark_edit_requests_reviewed(&self, place_id: &str) -> Result<u64, StoreError> {
        let prefix = keys::edit_request_place_prefix(place_id);
        let mut updated = 0u64;
        let mut pending = Vec::new();
        for item in self.edit_requests.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let request: EditRequest = Self::deserialize(&value)?;
            if request.status == RequestStatus::Pending {
                pending.push((key.to_vec(), request));
            }
        }

        for (key, mut request) in pending {
            request.status = RequestStatus::Reviewed;
            self.edit_requests.insert(key, Self::serialize(&request)?)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Pending-request count per place in one pass, for admin list views.
    /// Places with no pending requests are absent.
    pub fn count_pending_edit_requests_by_place(
        &self,
    ) -> Result<HashMap<String, u64>, StoreError> {
        let mut counts = HashMap::new();
        for item in self.edit_requests.iter() {
            let (_, value) = item?;
            let request: EditRequest = Self::deserialize(&value)?;
            if request.status == RequestStatus::Pending {
                *counts.entry(request.place_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

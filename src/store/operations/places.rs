use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_CAS_RETRIES;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub road_address: String,
    pub description: String,
    pub view_count: u64,
    /// Denormalized rollup over the review collection; owned exclusively by
    /// `recompute_review_stats` and never written anywhere else.
    pub review_count: u64,
    pub average_rating: f64,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_place(&self, place: &Place) -> Result<(), StoreError> {
        let key = keys::place_key(&place.id);
        self.places.insert(key.as_bytes(), Self::serialize(place)?)?;

        let index_key = keys::created_at_index_key(place.created_at.timestamp_millis(), &place.id);
        self.places_by_created_at
            .insert(index_key.as_bytes(), &[])?;
        Ok(())
    }

    pub fn get_place(&self, place_id: &str) -> Result<Option<Place>, StoreError> {
        let key = keys::place_key(place_id);
        match self.places.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn require_place(&self, place_id: &str) -> Result<Place, StoreError> {
        self.get_place(place_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "place".to_string(),
            key: place_id.to_string(),
        })
    }

    pub fn list_places(&self) -> Result<Vec<Place>, StoreError> {
        let mut places = Vec::new();
        for item in self.places.iter() {
            let (_, value) = item?;
            places.push(Self::deserialize::<Place>(&value)?);
        }
        places.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(places)
    }

    pub fn search_places_by_address(&self, term: &str) -> Result<Vec<Place>, StoreError> {
        let needle = term.to_lowercase();
        let mut places = Vec::new();
        for item in self.places.iter() {
            let (_, value) = item?;
            let place: Place = Self::deserialize(&value)?;
            if place.road_address.to_lowercase().contains(&needle) {
                places.push(place);
            }
        }
        places.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(places)
    }

    /// Deletes the place and everything hanging off it: reviews (and their
    /// index entries), favorites, reports and edit requests.
    pub fn delete_place(&self, place_id: &str) -> Result<(), StoreError> {
        let place = self.require_place(place_id)?;

        for review in self.list_reviews_for_place(place_id)? {
            self.reviews
                .remove(keys::review_key(&review.id).as_bytes())?;
            self.reviews
                .remove(keys::review_place_index_key(place_id, &review.id).as_bytes())?;
            self.reviews
                .remove(keys::review_user_index_key(&review.user_id, place_id).as_bytes())?;
        }

        let mut dead_keys = Vec::new();
        for item in self.favorites.iter() {
            let (key, _) = item?;
            if String::from_utf8_lossy(&key).ends_with(&format!(":{place_id}")) {
                dead_keys.push(key.to_vec());
            }
        }
        for key in dead_keys {
            self.favorites.remove(key)?;
        }

        let mut dead_keys = Vec::new();
        for item in self.reports.iter() {
            let (key, _) = item?;
            let key_str = String::from_utf8_lossy(&key).to_string();
            if key_str.starts_with(&format!("{place_id}:"))
                || key_str.ends_with(&format!(":{place_id}"))
            {
                dead_keys.push(key.to_vec());
            }
        }
        for key in dead_keys {
            self.reports.remove(key)?;
        }

        let prefix = keys::edit_request_place_prefix(place_id);
        let mut dead_keys = Vec::new();
        for item in self.edit_requests.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            dead_keys.push(key.to_vec());
        }
        for key in dead_keys {
            self.edit_requests.remove(key)?;
        }

        let index_key = keys::created_at_index_key(place.created_at.timestamp_millis(), place_id);
        self.places_by_created_at.remove(index_key.as_bytes())?;
        self.places.remove(keys::place_key(place_id).as_bytes())?;
        Ok(())
    }

    pub fn update_place_description(
        &self,
        place_id: &str,
        description: &str,
    ) -> Result<Place, StoreError> {
        self.mutate_place(place_id, |place| {
            place.description = description.to_string();
        })
    }

    pub fn increment_place_view_count(&self, place_id: &str) -> Result<Place, StoreError> {
        self.mutate_place(place_id, |place| {
            place.view_count += 1;
        })
    }

    /// Rollup maintainer for the denormalized review stats on a place.
    ///
    /// Recomputes count and arithmetic mean from the live review set and
    /// CAS-writes them back. On contention the loop restarts with a fresh
    /// read of both the place record and the review set, so whichever writer
    /// lands last has recomputed from the review set visible after its own
    /// mutation. Zero reviews writes 0 / 0.0, never a missing value.
    pub fn recompute_review_stats(&self, place_id: &str) -> Result<Place, StoreError> {
        let key = keys::place_key(place_id);
        for _ in 0..MAX_CAS_RETRIES {
            let Some(raw) = self.places.get(key.as_bytes())? else {
                return Err(StoreError::NotFound {
                    entity: "place".to_string(),
                    key: place_id.to_string(),
                });
            };

            let mut place: Place = Self::deserialize(&raw)?;
            let (review_count, average_rating) = self.review_stats_for_place(place_id)?;
            place.review_count = review_count;
            place.average_rating = average_rating;
            place.updated_at = Utc::now();

            let new_bytes = Self::serialize(&place)?;
            match self
                .places
                .compare_and_swap(key.as_bytes(), Some(&raw), Some(new_bytes))?
            {
                Ok(()) => return Ok(place),
                Err(_) => continue,
            }
        }

        Err(StoreError::CasRetryExhausted {
            entity: "place".to_string(),
            key: place_id.to_string(),
            attempts: MAX_CAS_RETRIES,
        })
    }

    fn mutate_place<F>(&self, place_id: &str, mutate: F) -> Result<Place, StoreError>
    where
        F: Fn(&mut Place),
    {
        let key = keys::place_key(place_id);
        for _ in 0..MAX_CAS_RETRIES {
            let Some(raw) = self.places.get(key.as_bytes())? else {
                return Err(StoreError::NotFound {
                    entity: "place".to_string(),
                    key: place_id.to_string(),
                });
            };

            let mut place: Place = Self::deserialize(&raw)?;
            mutate(&mut place);
            place.updated_at = Utc::now();

            let new_bytes = Self::serialize(&place)?;
            match self
                .places
                .compare_and_swap(key.as_bytes(), Some(&raw), Some(new_bytes))?
            {
                Ok(()) => return Ok(place),
                Err(_) => continue,
            }
        }

        Err(StoreError::CasRetryExhausted {
            entity: "place".to_string(),
            key: place_id.to_string(),
            attempts: MAX_CAS_RETRIES,
        })
    }

    pub fn count_places(&self) -> Result<u64, StoreError> {
        let mut count = 0u64;
        for item in self.places_by_created_at.iter() {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    /// Places created in `[start, end)`.
    pub fn count_places_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        Self::count_index_range(
            &self.places_by_created_at,
            start.timestamp_millis(),
            end.timestamp_millis(),
        )
    }

    /// Places created strictly before `end`.
    pub fn count_places_created_before(&self, end: DateTime<Utc>) -> Result<u64, StoreError> {
        Self::count_index_before(&self.places_by_created_at, end.timestamp_millis())
    }

    /// Creation timestamps (millis, ascending) of places created in
    /// `[start, end)`. The daily chart materializes one window and filters
    /// it per bucket instead of re-scanning per bucket.
    pub fn place_created_times_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<i64>, StoreError> {
        Self::index_timestamps_between(
            &self.places_by_created_at,
            start.timestamp_millis(),
            end.timestamp_millis(),
        )
    }

    /// Number of places each user has registered; users without places are
    /// absent from the result.
    pub fn count_places_by_creator(
        &self,
    ) -> Result<std::collections::HashMap<String, u64>, StoreError> {
        let mut counts = std::collections::HashMap::new();
        for item in self.places.iter() {
            let (_, value) = item?;
            let place: Place = Self::deserialize(&value)?;
            if let Some(user_id) = place.created_by {
                *counts.entry(user_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

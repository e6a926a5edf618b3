use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::operations::places::Place;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Inserts a review and synchronously refreshes the owning place's
    /// rollup fields. The (user, place) pair is unique; a second review by
    /// the same user for the same place is a conflict.
    pub fn create_review(&self, review: &Review) -> Result<Place, StoreError> {
        let user_index_key = keys::review_user_index_key(&review.user_id, &review.place_id);

        let cas_result = self
            .reviews
            .compare_and_swap(
                user_index_key.as_bytes(),
                None::<&[u8]>,
                Some(review.id.as_bytes().to_vec()),
            )
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "review".to_string(),
                key: format!("{}:{}", review.user_id, review.place_id),
            });
        }

        let primary_key = keys::review_key(&review.id);
        let place_index_key = keys::review_place_index_key(&review.place_id, &review.id);
        let bytes = Self::serialize(review)?;

        if let Err(e) = self.reviews.insert(primary_key.as_bytes(), bytes) {
            let _ = self.reviews.remove(user_index_key.as_bytes());
            return Err(StoreError::Sled(e));
        }
        self.reviews
            .insert(place_index_key.as_bytes(), review.id.as_bytes())?;

        // Same unit of work as the insert: the rollup must be fresh before
        // this call returns.
        self.recompute_review_stats(&review.place_id)
    }

    /// Removes a review and synchronously refreshes the owning place's
    /// rollup fields.
    pub fn delete_review(&self, review_id: &str) -> Result<Place, StoreError> {
        let review = self
            .get_review(review_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "review".to_string(),
                key: review_id.to_string(),
            })?;

        self.reviews
            .remove(keys::review_key(review_id).as_bytes())?;
        self.reviews
            .remove(keys::review_place_index_key(&review.place_id, review_id).as_bytes())?;
        self.reviews
            .remove(keys::review_user_index_key(&review.user_id, &review.place_id).as_bytes())?;

        self.recompute_review_stats(&review.place_id)
    }

    pub fn get_review(&self, review_id: &str) -> Result<Option<Review>, StoreError> {
        let key = keys::review_key(review_id);
        match self.reviews.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_reviews_for_place(&self, place_id: &str) -> Result<Vec<Review>, StoreError> {
        let prefix = keys::review_place_prefix(place_id);
        let mut reviews = Vec::new();
        for item in self.reviews.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let review_id = String::from_utf8_lossy(&value).to_string();
            if let Some(review) = self.get_review(&review_id)? {
                reviews.push(review);
            }
        }
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    /// Count and arithmetic mean of ratings over the live review set for a
    /// place. Zero reviews yields (0, 0.0).
    pub fn review_stats_for_place(&self, place_id: &str) -> Result<(u64, f64), StoreError> {
        let prefix = keys::review_place_prefix(place_id);
        let mut count = 0u64;
        let mut rating_sum = 0i64;
        for item in self.reviews.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let review_id = String::from_utf8_lossy(&value).to_string();
            if let Some(review) = self.get_review(&review_id)? {
                count += 1;
                rating_sum += i64::from(review.rating);
            }
        }

        if count == 0 {
            return Ok((0, 0.0));
        }
        Ok((count, rating_sum as f64 / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::store::operations::places::tests::sample_place;

    use super::*;

    fn sample_review(id: &str, place_id: &str, user_id: &str, rating: i32) -> Review {
        Review {
            id: id.to_string(),
            place_id: place_id.to_string(),
            user_id: user_id.to_string(),
            rating,
            comment: "fine".to_string(),
            created_at: Utc::now(),
        }
    }

    fn store_with_place(dir: &tempfile::TempDir, name: &str) -> Store {
        let store = Store::open(dir.path().join(name).to_str().unwrap()).unwrap();
        store.create_place(&sample_place("p1")).unwrap();
        store
    }

    #[test]
    fn create_review_refreshes_rollup() {
        let dir = tempdir().unwrap();
        let store = store_with_place(&dir, "reviews-db");

        store.create_review(&sample_review("r1", "p1", "u1", 5)).unwrap();
        let place = store.create_review(&sample_review("r2", "p1", "u2", 4)).unwrap();

        assert_eq!(place.review_count, 2);
        assert!((place.average_rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_user_place_review_conflicts() {
        let dir = tempdir().unwrap();
        let store = store_with_place(&dir, "reviews-db2");

        store.create_review(&sample_review("r1", "p1", "u1", 5)).unwrap();
        let err = store
            .create_review(&sample_review("r2", "p1", "u1", 3))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn deleting_last_review_zeroes_rollup() {
        let dir = tempdir().unwrap();
        let store = store_with_place(&dir, "reviews-db3");

        store.create_review(&sample_review("r1", "p1", "u1", 3)).unwrap();
        let place = store.delete_review("r1").unwrap();

        assert_eq!(place.review_count, 0);
        assert_eq!(place.average_rating, 0.0);
    }

    #[test]
    fn delete_then_readd_restores_rollup() {
        let dir = tempdir().unwrap();
        let store = store_with_place(&dir, "reviews-db4");

        store.create_review(&sample_review("r1", "p1", "u1", 4)).unwrap();
        let before = store.get_place("p1").unwrap().unwrap();

        store.delete_review("r1").unwrap();
        let after = store.create_review(&sample_review("r1b", "p1", "u1", 4)).unwrap();

        assert_eq!(before.review_count, after.review_count);
        assert!((before.average_rating - after.average_rating).abs() < f64::EPSILON);
    }

    #[test]
    fn user_can_review_again_after_delete() {
        let dir = tempdir().unwrap();
        let store = store_with_place(&dir, "reviews-db5");

        store.create_review(&sample_review("r1", "p1", "u1", 2)).unwrap();
        store.delete_review("r1").unwrap();
        assert!(store.create_review(&sample_review("r2", "p1", "u1", 5)).is_ok());
    }
}

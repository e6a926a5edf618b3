use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: String,
    pub place_id: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn add_favorite(&self, favorite: &Favorite) -> Result<(), StoreError> {
        let key = keys::favorite_key(&favorite.user_id, &favorite.place_id);

        let cas_result = self
            .favorites
            .compare_and_swap(
                key.as_bytes(),
                None::<&[u8]>,
                Some(Self::serialize(favorite)?),
            )
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "favorite".to_string(),
                key,
            });
        }
        Ok(())
    }

    pub fn remove_favorite(&self, user_id: &str, place_id: &str) -> Result<(), StoreError> {
        let key = keys::favorite_key(user_id, place_id);
        if self.favorites.remove(key.as_bytes())?.is_none() {
            return Err(StoreError::NotFound {
                entity: "favorite".to_string(),
                key,
            });
        }
        Ok(())
    }

    pub fn is_favorited(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        let key = keys::favorite_key(user_id, place_id);
        Ok(self.favorites.get(key.as_bytes())?.is_some())
    }

    pub fn list_favorites_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, StoreError> {
        let prefix = keys::favorite_user_prefix(user_id);
        let mut favorites = Vec::new();
        for item in self.favorites.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            favorites.push(Self::deserialize::<Favorite>(&value)?);
        }
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    /// Favorite count per place in one pass, for admin list views. Places
    /// with no favorites are absent.
    pub fn count_favorites_by_place(&self) -> Result<HashMap<String, u64>, StoreError> {
        let mut counts = HashMap::new();
        for item in self.favorites.iter() {
            let (_, value) = item?;
            let favorite: Favorite = Self::deserialize(&value)?;
            *counts.entry(favorite.place_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn fav(user_id: &str, place_id: &str) -> Favorite {
        Favorite {
            user_id: user_id.to_string(),
            place_id: place_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn add_and_remove_favorite() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("fav-db").to_str().unwrap()).unwrap();

        store.add_favorite(&fav("u1", "p1")).unwrap();
        assert!(store.is_favorited("u1", "p1").unwrap());

        store.remove_favorite("u1", "p1").unwrap();
        assert!(!store.is_favorited("u1", "p1").unwrap());
    }

    #[test]
    fn double_favorite_conflicts() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("fav-db2").to_str().unwrap()).unwrap();

        store.add_favorite(&fav("u1", "p1")).unwrap();
        let err = store.add_favorite(&fav("u1", "p1")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn grouped_counts_skip_unfavorited_places() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("fav-db3").to_str().unwrap()).unwrap();

        store.add_favorite(&fav("u1", "p1")).unwrap();
        store.add_favorite(&fav("u2", "p1")).unwrap();
        store.add_favorite(&fav("u1", "p2")).unwrap();

        let counts = store.count_favorites_by_place().unwrap();
        assert_eq!(counts.get("p1"), Some(&2));
        assert_eq!(counts.get("p2"), Some(&1));
        assert_eq!(counts.get("p3"), None);
    }
}

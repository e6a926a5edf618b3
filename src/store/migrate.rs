use crate::store::keys;
use crate::store::operations::places::Place;
use crate::store::operations::users::User;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_created_at_indexes", m002_created_at_indexes),
    ]
}

/// Run all unapplied migrations.
///
/// Every migration must be idempotent: a crash between `func()` and
/// `set_version()` means the migration runs again on the next start. The
/// version checkpoint is persisted after each successful migration, and
/// `set_version` refuses downgrades.
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.meta.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            if raw.len() == 4 {
                let bytes: [u8; 4] = raw.as_ref().try_into().unwrap_or([0; 4]);
                Ok(u32::from_be_bytes(bytes))
            } else {
                let text = String::from_utf8(raw.to_vec()).unwrap_or_else(|_| "0".to_string());
                Ok(text.parse::<u32>().unwrap_or(0))
            }
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .meta
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// Rebuild the created-at index trees from the primary users/places trees.
fn m002_created_at_indexes(store: &Store) -> Result<(), StoreError> {
    for item in store.users.iter() {
        let (key, value) = item?;
        if String::from_utf8_lossy(&key).starts_with("email:") {
            continue;
        }
        let user: User = Store::deserialize(&value)?;
        let index_key = keys::created_at_index_key(user.created_at.timestamp_millis(), &user.id);
        store
            .users_by_created_at
            .insert(index_key.as_bytes(), &[])?;
    }

    for item in store.places.iter() {
        let (_, value) = item?;
        let place: Place = Store::deserialize(&value)?;
        let index_key = keys::created_at_index_key(place.created_at.timestamp_millis(), &place.id);
        store
            .places_by_created_at
            .insert(index_key.as_bytes(), &[])?;
    }

    Ok(())
}

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

pub mod keys {
    pub const USERS: &str = "digital_menu_users";
    pub const RESTAURANTS: &str = "digital_menu_restaurants";
    pub const MENU_ITEMS: &str = "digital_menu_items";
    pub const ORDERS: &str = "digital_menu_orders";
    pub const AUTH_USER: &str = "digital_menu_auth_user";
    pub const CART: &str = "digital_menu_cart";
    pub const TOKEN: &str = "digital_menu_token";
}

/// String-keyed JSON values persisted to a single file.
///
/// Cloning shares the same in-memory map. Read and write failures are logged
/// and swallowed: a broken store degrades to an empty one.
///
/// The file holds a handful of small collections and every write rewrites it
/// with blocking `std::fs` calls while the map lock is held. Callers on an
/// async runtime accept that short stall; the store is not meant for bulk data.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    data: Arc<Mutex<Map<String, Value>>>,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "store file unreadable, starting empty");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };

        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        // a poisoned map is still a valid map
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value has an unexpected shape");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(err) => {
                tracing::error!(key, error = %err, "error serializing value for store");
                return;
            }
        };
        let mut data = self.lock();
        data.insert(key.to_string(), value);
        self.flush(&data);
    }

    pub fn remove(&self, key: &str) {
        let mut data = self.lock();
        if data.remove(key).is_some() {
            self.flush(&data);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Stored collection under `key`, seeded with `seed` on first access.
    pub fn collection<T, F>(&self, key: &str, seed: F) -> Vec<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        if let Some(items) = self.get::<Vec<T>>(key) {
            return items;
        }
        let items = seed();
        self.set(key, &items);
        items
    }

    fn flush(&self, data: &Map<String, Value>) {
        let bytes = match serde_json::to_vec_pretty(data) {
            Ok(b) => b,
            Err(err) => {
                tracing::error!(error = %err, "error encoding store");
                return;
            }
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::error!(path = %parent.display(), error = %err, "error creating store directory");
                return;
            }
        }
        if let Err(err) = fs::write(&self.path, bytes) {
            tracing::error!(path = %self.path.display(), error = %err, "error saving store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = LocalStore::open(&path);
        store.set(keys::TOKEN, &"abc".to_string());

        let reopened = LocalStore::open(&path);
        assert_eq!(reopened.get::<String>(keys::TOKEN).as_deref(), Some("abc"));
    }

    #[test]
    fn collection_is_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));

        let first: Vec<u32> = store.collection("numbers", || vec![1, 2, 3]);
        assert_eq!(first, vec![1, 2, 3]);

        store.set("numbers", &vec![7u32]);
        let second: Vec<u32> = store.collection("numbers", || vec![1, 2, 3]);
        assert_eq!(second, vec![7]);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = LocalStore::open(&path);
        assert!(!store.contains(keys::USERS));
    }

    #[test]
    fn remove_drops_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));
        store.set(keys::AUTH_USER, &"someone".to_string());
        store.remove(keys::AUTH_USER);
        assert!(store.get::<String>(keys::AUTH_USER).is_none());
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be
        let store = LocalStore::open(dir.path());
        store.set(keys::TOKEN, &"abc".to_string());
        assert_eq!(store.get::<String>(keys::TOKEN).as_deref(), Some("abc"));
    }
}

//! Session-backed storage adapter for the cart store.
//!
//! The cart store works against a synchronous string-valued [`Storage`]
//! backend; tower-sessions is async. The adapter bridges the two the same
//! way the ledger itself works: load a snapshot of the tracked keys at the
//! start of a request, run the synchronous cart operations against it, then
//! write the changed keys back in one pass.
//!
//! Two requests racing on the same session resolve last-writer-wins at
//! full-value granularity, which is exactly the cart's documented
//! consistency contract.

use std::collections::{HashMap, HashSet};

use tower_sessions::Session;

use baba_boutique_core::cart::{CART_KEY, Storage};

/// Keys the adapter tracks for the storefront.
const TRACKED_KEYS: &[&str] = &[CART_KEY];

/// A request-scoped snapshot of the session's string values.
#[derive(Debug, Default)]
pub struct SessionStorage {
    values: HashMap<String, String>,
    dirty: HashSet<String>,
    removed: HashSet<String>,
}

impl SessionStorage {
    /// Load a snapshot of the tracked keys from the session.
    ///
    /// A value that is missing or not a string is treated as absent; the
    /// cart store turns that into an empty ledger.
    pub async fn load(session: &Session) -> Self {
        let mut values = HashMap::new();
        for key in TRACKED_KEYS {
            if let Ok(Some(value)) = session.get::<String>(key).await {
                values.insert((*key).to_owned(), value);
            }
        }
        Self {
            values,
            dirty: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn persist(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.removed {
            session.remove::<String>(key).await?;
        }
        for key in &self.dirty {
            if let Some(value) = self.values.get(key) {
                session.insert(key, value).await?;
            }
        }
        Ok(())
    }
}

impl Storage for SessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
        self.dirty.insert(key.to_owned());
        self.removed.remove(key);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.dirty.remove(key);
        self.removed.insert(key.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marks_dirty_and_unmarks_removed() {
        let mut storage = SessionStorage::default();
        storage.remove(CART_KEY);
        storage.set(CART_KEY, "[]".to_owned());

        assert_eq!(storage.get(CART_KEY), Some("[]".to_owned()));
        assert!(storage.dirty.contains(CART_KEY));
        assert!(!storage.removed.contains(CART_KEY));
    }

    #[test]
    fn test_remove_tombstones_the_key() {
        let mut storage = SessionStorage::default();
        storage.set(CART_KEY, "[]".to_owned());
        storage.remove(CART_KEY);

        assert_eq!(storage.get(CART_KEY), None);
        assert!(!storage.dirty.contains(CART_KEY));
        assert!(storage.removed.contains(CART_KEY));
    }

    #[tokio::test]
    async fn test_round_trip_through_a_session() {
        use std::sync::Arc;
        use tower_sessions::{MemoryStore, Session};

        let store: Arc<MemoryStore> = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let mut storage = SessionStorage::load(&session).await;
        assert_eq!(storage.get(CART_KEY), None);
        storage.set(CART_KEY, "[1,2]".to_owned());
        storage.persist(&session).await.unwrap();

        let storage = SessionStorage::load(&session).await;
        assert_eq!(storage.get(CART_KEY), Some("[1,2]".to_owned()));
    }
}

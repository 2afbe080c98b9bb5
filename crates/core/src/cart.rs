//! The persisted cart ledger.
//!
//! The cart is an ordered sequence of (product snapshot, quantity) pairs,
//! serialized as one JSON string under the well-known key [`CART_KEY`] in a
//! string-valued storage backend. Every operation re-reads, modifies, and
//! rewrites the entire sequence; there is no cached in-memory mirror, so the
//! backend is always the source of truth and callers observe mutations by
//! calling [`CartStore::read`] again.
//!
//! # Consistency
//!
//! The backing storage is shared by every tab of a browser profile.
//! Concurrent writers are resolved last-writer-wins at full-structure
//! granularity: no merge, no versioning, no locking. A writer holding a
//! stale read will clobber a concurrent write from another tab. This is an
//! accepted limitation of the contract, not a defect; [`CartStore::subscribe`]
//! offers best-effort freshness for passive observers such as the cart badge.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "cart";

/// Storage key for the admin bearer token.
///
/// Presence of the key is the entire "admin session active" contract; the
/// token is never inspected client-side.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// A string-valued key/value storage backend.
///
/// Implementations stand in for the browser profile's durable storage: the
/// binaries back this with the session layer, tests with [`MemoryStorage`].
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Remove `key` entirely. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str);
}

/// In-memory storage backend.
///
/// Clones share the same underlying map, which models several tabs of one
/// browser profile pointing at the same durable store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.lock().insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.lock().remove(key);
    }
}

/// One cart entry: a product snapshot and a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity, widened so large carts cannot overflow.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.product.price * self.quantity
    }
}

type Listener = Box<dyn Fn(&[CartLine]) + Send>;

/// The cart store over an injected storage backend.
///
/// All operations are synchronous and non-blocking. Mutations persist the
/// full updated sequence and then notify subscribers with the fresh ledger.
pub struct CartStore<S> {
    storage: S,
    listeners: Vec<Listener>,
}

impl<S: Storage> CartStore<S> {
    /// Create a store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            listeners: Vec::new(),
        }
    }

    /// Consume the store and hand the backend back to the caller.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the current ledger.
    ///
    /// Never fails: an absent key is an empty cart, and an unparseable
    /// payload degrades to empty rather than propagating a parse error.
    #[must_use]
    pub fn read(&self) -> Vec<CartLine> {
        self.storage
            .get(CART_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// If a line for the product already exists its quantity is incremented,
    /// otherwise a new line is appended. A zero quantity is dropped so the
    /// ledger never holds an empty line.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let mut lines = self.read();
        match lines.iter_mut().find(|line| line.product.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine { product, quantity }),
        }
        self.persist(&lines);
    }

    /// Replace the quantity of the line matching `product_id`.
    ///
    /// A non-positive quantity is a no-op: the line is neither updated nor
    /// removed. That is the store's longstanding contract ([`Self::remove`]
    /// is the way to take a line out), preserved here deliberately.
    pub fn update_quantity(&mut self, product_id: &ProductId, new_quantity: i64) {
        if new_quantity <= 0 {
            return;
        }
        let new_quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        let mut lines = self.read();
        for line in &mut lines {
            if &line.product.id == product_id {
                line.quantity = new_quantity;
            }
        }
        self.persist(&lines);
    }

    /// Remove the line matching `product_id`, if any.
    ///
    /// Idempotent: removing an absent id is a no-op, not an error.
    pub fn remove(&mut self, product_id: &ProductId) {
        let mut lines = self.read();
        lines.retain(|line| &line.product.id != product_id);
        self.persist(&lines);
    }

    /// Delete the persisted ledger entirely.
    ///
    /// The key is removed, not emptied; a subsequent [`Self::read`] still
    /// returns an empty sequence.
    pub fn clear(&mut self) {
        self.storage.remove(CART_KEY);
        self.notify(&[]);
    }

    /// Register a listener invoked with the fresh ledger after every
    /// persisting mutation.
    ///
    /// Best-effort UI freshness only; the consistency contract stays
    /// last-writer-wins regardless of who is subscribed.
    pub fn subscribe(&mut self, listener: impl Fn(&[CartLine]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Total number of items across all lines, for the badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.read()
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of all line totals, in whole rupees.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.read().iter().map(CartLine::line_total).sum()
    }

    fn persist(&mut self, lines: &[CartLine]) {
        // Serializing plain structs cannot fail.
        let Ok(raw) = serde_json::to_string(lines) else {
            return;
        };
        self.storage.set(CART_KEY, raw);
        self.notify(lines);
    }

    fn notify(&self, lines: &[CartLine]) {
        for listener in &self.listeners {
            listener(lines);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::types::{Category, Price};

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(price),
            category: Category::Sarees,
            size: Vec::new(),
            images: vec![format!("/uploads/{id}.jpg")],
        }
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_read_of_missing_key_is_empty() {
        assert!(store().read().is_empty());
    }

    #[test]
    fn test_read_of_corrupt_payload_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(CART_KEY, "{not json".to_owned());
        let store = CartStore::new(storage);
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_add_distinct_ids_keeps_one_line_each() {
        let mut store = store();
        store.add(product("p1", 100), 1);
        store.add(product("p2", 200), 2);
        store.add(product("p3", 300), 3);

        let lines = store.read();
        assert_eq!(lines.len(), 3);
        let quantities: Vec<u32> = lines.iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![1, 2, 3]);
    }

    #[test]
    fn test_add_existing_id_increments_instead_of_duplicating() {
        let mut store = store();
        store.add(product("p1", 100), 1);
        store.add(product("p1", 100), 1);

        let lines = store.read();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_add_sums_quantities_per_id() {
        let mut store = store();
        store.add(product("p1", 100), 2);
        store.add(product("p2", 100), 1);
        store.add(product("p1", 100), 5);

        let lines = store.read();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first().unwrap().quantity, 7);
    }

    #[test]
    fn test_add_zero_quantity_is_dropped() {
        let mut store = store();
        store.add(product("p1", 100), 0);
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = store();
        store.add(product("b", 100), 1);
        store.add(product("a", 100), 1);
        let ids: Vec<String> = store
            .read()
            .into_iter()
            .map(|l| l.product.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    // The non-positive no-op is a quirk of the contract, kept on purpose:
    // update with 0 or a negative does not remove the line, it does nothing.
    #[test]
    fn test_update_quantity_non_positive_is_a_noop() {
        let mut store = store();
        store.add(product("p1", 100), 2);

        store.update_quantity(&ProductId::new("p1"), 0);
        assert_eq!(store.read().first().unwrap().quantity, 2);

        store.update_quantity(&ProductId::new("p1"), -1);
        assert_eq!(store.read().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_replaces_matching_line() {
        let mut store = store();
        store.add(product("p1", 100), 2);
        store.update_quantity(&ProductId::new("p1"), 5);

        let lines = store.read();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 5);

        store.remove(&ProductId::new("p1"));
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_update_quantity_of_absent_id_changes_nothing() {
        let mut store = store();
        store.add(product("p1", 100), 2);
        store.update_quantity(&ProductId::new("ghost"), 9);
        assert_eq!(store.read().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = store();
        store.add(product("p1", 100), 1);
        store.add(product("p2", 100), 1);

        store.remove(&ProductId::new("p1"));
        let after_first = store.read();
        store.remove(&ProductId::new("p1"));
        let after_second = store.read();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.len(), 1);
    }

    #[test]
    fn test_clear_removes_the_key_entirely() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());
        store.add(product("p1", 100), 1);
        assert!(storage.get(CART_KEY).is_some());

        store.clear();
        assert!(storage.get(CART_KEY).is_none());
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_read_reflects_net_effect_regardless_of_store_instance() {
        // No cached mirror: a fresh store over the same backend sees the
        // same ledger after every step.
        let storage = MemoryStorage::new();

        CartStore::new(storage.clone()).add(product("p1", 100), 2);
        CartStore::new(storage.clone()).add(product("p2", 250), 1);
        CartStore::new(storage.clone()).update_quantity(&ProductId::new("p1"), 4);
        CartStore::new(storage.clone()).remove(&ProductId::new("p2"));

        let lines = CartStore::new(storage).read();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().product.id, ProductId::new("p1"));
        assert_eq!(lines.first().unwrap().quantity, 4);
    }

    #[test]
    fn test_last_writer_wins_at_full_structure_granularity() {
        // Two tabs snapshot the same profile storage, mutate independently,
        // and write the whole structure back. The later write-back clobbers
        // the earlier one: no merge, no versioning. Accepted contract.
        let mut profile = MemoryStorage::new();
        CartStore::new(profile.clone()).add(product("p1", 100), 1);
        let loaded = profile.get(CART_KEY).unwrap();

        let mut snapshot_a = MemoryStorage::new();
        snapshot_a.set(CART_KEY, loaded.clone());
        let mut snapshot_b = MemoryStorage::new();
        snapshot_b.set(CART_KEY, loaded);

        let mut tab_a = CartStore::new(snapshot_a);
        tab_a.update_quantity(&ProductId::new("p1"), 5);
        let mut tab_b = CartStore::new(snapshot_b);
        tab_b.add(product("p2", 200), 1);

        // Write-backs land in order: A first, then B.
        profile.set(CART_KEY, tab_a.into_storage().get(CART_KEY).unwrap());
        profile.set(CART_KEY, tab_b.into_storage().get(CART_KEY).unwrap());

        let lines = CartStore::new(profile).read();
        let quantities: Vec<u32> = lines.iter().map(|l| l.quantity).collect();
        // Tab B never saw A's update, so p1 is back to quantity 1.
        assert_eq!(quantities, vec![1, 1]);
    }

    #[test]
    fn test_subscribe_sees_fresh_ledger_after_each_mutation() {
        let notified = Arc::new(AtomicU32::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut store = store();
        let notified_by_listener = Arc::clone(&notified);
        let seen_by_listener = Arc::clone(&seen);
        store.subscribe(move |lines| {
            notified_by_listener.fetch_add(1, Ordering::SeqCst);
            let counts: Vec<u32> = lines.iter().map(|l| l.quantity).collect();
            seen_by_listener
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(counts);
        });

        store.add(product("p1", 100), 1);
        store.update_quantity(&ProductId::new("p1"), 3);
        store.clear();

        assert_eq!(notified.load(Ordering::SeqCst), 3);
        let seen = seen.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(seen, vec![vec![1], vec![3], vec![]]);
    }

    #[test]
    fn test_subscribe_not_notified_on_noop_update() {
        let notified = Arc::new(AtomicU32::new(0));

        let mut store = store();
        store.add(product("p1", 100), 1);
        let notified_by_listener = Arc::clone(&notified);
        store.subscribe(move |_| {
            notified_by_listener.fetch_add(1, Ordering::SeqCst);
        });

        store.update_quantity(&ProductId::new("p1"), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_item_count_and_subtotal_derive_from_ledger() {
        let mut store = store();
        store.add(product("p1", 3000), 2);
        store.add(product("p2", 1200), 1);

        assert_eq!(store.item_count(), 3);
        assert_eq!(store.subtotal(), 7200);
    }
}

//! Producers over concurrently mutated key/value stores.
//!
//! A store plugs in through [`ConcurrentStore`]: a thread-safe enumeration
//! that can be stopped early, and a thread-safe point lookup. The adapters in
//! this module ([`sync_keys`], [`sync_values`], [`sync_all`],
//! [`sync_get_all_by_keys`]) borrow a store and read it each time they are
//! driven. They never write to it.
//!
//! # Consistency
//!
//! The adapters provide **no snapshot isolation**. A pass sees whatever the
//! store's enumeration reports while it runs: entries inserted or removed
//! concurrently may or may not appear, and [`sync_get_all_by_keys`] observes
//! each key at the instant of its own lookup. Callers that need a
//! point-in-time view must copy the store under their own locking first.
//! Enumeration order is the store's, which in general is unspecified.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::traits::{PairedProducer, Producer};

/// A dynamically typed store value.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// Downcast a dynamic value, returning [`Error::TypeMismatch`] if it is not a `T`.
///
/// Pass the value itself (`&*arc`), not a reference to its `Arc`.
pub fn try_any_as<T: Any + Clone>(value: &(dyn Any + Send + Sync)) -> Result<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(Error::type_mismatch::<T>)
}

/// Downcast a dynamic value.
///
/// # Panics
///
/// Panics if the value is not a `T`.
pub fn any_as<T: Any + Clone>(value: &(dyn Any + Send + Sync)) -> T {
    match try_any_as(value) {
        Ok(value) => value,
        Err(err) => {
            error_event!(%err, "dynamic store value has the wrong type");
            panic!("{}", err)
        }
    }
}

/// A key/value store that can be read while other threads write to it.
pub trait ConcurrentStore {
    /// The key type
    type Key;
    /// The value type
    type Value;

    /// Call `f` once per live entry until it returns `false`.
    ///
    /// Returns `true` if every entry was offered. Implementations must be
    /// safe to call concurrently with writers; they are not required to
    /// present a consistent snapshot.
    fn visit<F>(&self, f: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool;

    /// Look a single key up
    fn load(&self, key: &Self::Key) -> Option<Self::Value>;
}

/// A concurrent hash map with weakly consistent enumeration.
///
/// [`visit`](ConcurrentStore::visit) copies the key list, then fetches each
/// entry when it is reached. No lock is held while the callback runs, so the
/// callback may write to the map. Entries removed before they are reached are
/// skipped, entries inserted after the key list was taken are not seen, and
/// values updated in between are seen with their new value.
pub struct SyncMap<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // Poisoned locks are recovered.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.write().insert(key, value)
    }

    /// Remove an entry, returning its value
    pub fn remove(&self, key: &K) -> Option<V> {
        self.write().remove(key)
    }

    /// Copy of the value stored under `key`
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

impl<K, V> Default for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SyncMap<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V> ConcurrentStore for SyncMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(K, V) -> bool,
    {
        let keys: Vec<K> = self.read().keys().cloned().collect();
        for key in keys {
            let Some(value) = self.get(&key) else {
                continue;
            };
            if !f(key, value) {
                return false;
            }
        }
        true
    }

    fn load(&self, key: &K) -> Option<V> {
        self.get(key)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn finish_pass(adapter: &'static str, visited: usize, completed: bool) {
    trace_event!(adapter, visited, completed, "store pass finished");
    #[cfg(feature = "metrics")]
    crate::metrics::record_store_pass(adapter, visited);
}

/// Producer returned by [`sync_keys`]
pub struct SyncKeys<'a, S: ?Sized> {
    store: &'a S,
}

/// Producer returned by [`sync_values`]
pub struct SyncValues<'a, S: ?Sized> {
    store: &'a S,
}

/// Paired producer returned by [`sync_all`]
pub struct SyncAll<'a, S: ?Sized> {
    store: &'a S,
}

/// Paired producer returned by [`sync_get_all_by_keys`]
pub struct SyncGetAllByKeys<'a, S: ConcurrentStore + ?Sized> {
    store: &'a S,
    keys: Vec<S::Key>,
}

/// Emit every key of `store`, enumerating it afresh on each pass
pub fn sync_keys<S: ConcurrentStore + ?Sized>(store: &S) -> SyncKeys<'_, S> {
    SyncKeys { store }
}

/// Emit every value of `store`, enumerating it afresh on each pass
pub fn sync_values<S: ConcurrentStore + ?Sized>(store: &S) -> SyncValues<'_, S> {
    SyncValues { store }
}

/// Emit every entry of `store`, enumerating it afresh on each pass
pub fn sync_all<S: ConcurrentStore + ?Sized>(store: &S) -> SyncAll<'_, S> {
    SyncAll { store }
}

/// Look each requested key up in `store`, in request order, skipping absent keys.
///
/// Each lookup sees the store as it is at that moment; two keys of one pass
/// may observe different generations of the store.
pub fn sync_get_all_by_keys<'a, S, I>(store: &'a S, keys: I) -> SyncGetAllByKeys<'a, S>
where
    S: ConcurrentStore + ?Sized,
    I: IntoIterator<Item = S::Key>,
{
    SyncGetAllByKeys {
        store,
        keys: keys.into_iter().collect(),
    }
}

impl<S> Producer for SyncKeys<'_, S>
where
    S: ConcurrentStore + ?Sized,
{
    type Item = S::Key;

    fn drive<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        let mut visited = 0;
        let completed = self.store.visit(|key, _| {
            visited += 1;
            sink(key)
        });
        finish_pass("sync_keys", visited, completed);
        completed
    }
}

impl<S> Producer for SyncValues<'_, S>
where
    S: ConcurrentStore + ?Sized,
{
    type Item = S::Value;

    fn drive<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        let mut visited = 0;
        let completed = self.store.visit(|_, value| {
            visited += 1;
            sink(value)
        });
        finish_pass("sync_values", visited, completed);
        completed
    }
}

impl<S> PairedProducer for SyncAll<'_, S>
where
    S: ConcurrentStore + ?Sized,
{
    type Key = S::Key;
    type Value = S::Value;

    fn drive_pairs<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool,
    {
        let mut visited = 0;
        let completed = self.store.visit(|key, value| {
            visited += 1;
            sink(key, value)
        });
        finish_pass("sync_all", visited, completed);
        completed
    }
}

impl<S> PairedProducer for SyncGetAllByKeys<'_, S>
where
    S: ConcurrentStore + ?Sized,
    S::Key: Clone,
{
    type Key = S::Key;
    type Value = S::Value;

    fn drive_pairs<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool,
    {
        let mut visited = 0;
        for key in &self.keys {
            let Some(value) = self.store.load(key) else {
                continue;
            };
            visited += 1;
            if !sink(key.clone(), value) {
                finish_pass("sync_get_all_by_keys", visited, false);
                return false;
            }
        }
        finish_pass("sync_get_all_by_keys", visited, true);
        true
    }
}

//! Concurrent keyed container.
//!
//! `KeyedMap` is a `HashMap` behind a single reader/writer lock. Per-key
//! operations take the lock for the duration of the call only. Bulk iteration
//! goes through [`KeyedMap::read`], which hands back the read guard itself so
//! the caller holds the lock for exactly as long as it iterates.
//!
//! Guards must never be held across an `.await` or any blocking I/O: every
//! writer stalls while a guard is alive.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::{RwLock, RwLockReadGuard};

/// Read guard over the whole mapping. Derefs to `HashMap<K, V>`.
pub type KeyedMapGuard<'a, K, V> = RwLockReadGuard<'a, HashMap<K, V>>;

/// A `HashMap` safe for concurrent use from many tasks or threads.
pub struct KeyedMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> KeyedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Clone of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: K, value: V) {
        self.inner.write().insert(key, value);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Insert only if `key` is vacant. Returns `true` when this call inserted.
    ///
    /// The check and the insert happen under one write lock, so of several
    /// concurrent callers with the same key exactly one sees `true`.
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        let mut map = self.inner.write();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, value);
        true
    }

    /// Mutate the value under `key` in place, creating it from `Default` first
    /// if absent. Runs `f` under the write lock; keep it short.
    pub fn update_or_default<R, F>(&self, key: K, f: F) -> R
    where
        V: Default,
        F: FnOnce(&mut V) -> R,
    {
        let mut map = self.inner.write();
        f(map.entry(key).or_default())
    }

    /// Run `f` against the value under `key` without cloning it.
    pub fn with_value<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.read().get(key).map(f)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Guarded view of the whole mapping for iteration.
    ///
    /// Writers block until the guard is dropped. Iteration order is unspecified.
    pub fn read(&self) -> KeyedMapGuard<'_, K, V> {
        self.inner.read()
    }
}

impl<K, V> Default for KeyedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_and_set() {
        let map: KeyedMap<String, u32> = KeyedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.get(&"a".to_string()), None);

        map.set("a".to_string(), 1);
        map.set("a".to_string(), 2);
        assert_eq!(map.get(&"a".to_string()), Some(2));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_insert_if_absent_only_first_wins() {
        let map: KeyedMap<&str, u32> = KeyedMap::new();
        assert!(map.insert_if_absent("k", 1));
        assert!(!map.insert_if_absent("k", 2));
        assert_eq!(map.get(&"k"), Some(1));
    }

    #[test]
    fn test_update_or_default_appends_in_place() {
        let map: KeyedMap<&str, Vec<u32>> = KeyedMap::new();
        map.update_or_default("k", |v| v.push(1));
        let len = map.update_or_default("k", |v| {
            v.push(2);
            v.len()
        });
        assert_eq!(len, 2);
        assert_eq!(map.get(&"k"), Some(vec![1, 2]));
    }

    #[test]
    fn test_with_value_borrows() {
        let map: KeyedMap<&str, Vec<u32>> = KeyedMap::new();
        map.set("k", vec![1, 2, 3]);
        assert_eq!(map.with_value(&"k", |v| v.len()), Some(3));
        assert_eq!(map.with_value(&"missing", |v| v.len()), None);
    }

    #[test]
    fn test_read_guard_sees_every_entry() {
        let map: KeyedMap<u32, u32> = KeyedMap::new();
        for i in 0..10 {
            map.set(i, i * i);
        }
        let guard = map.read();
        let sum: u32 = guard.values().sum();
        assert_eq!(guard.len(), 10);
        assert_eq!(sum, 285);
    }

    #[test]
    fn test_concurrent_insert_if_absent_has_single_winner() {
        let map: Arc<KeyedMap<u32, usize>> = Arc::new(KeyedMap::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let map = Arc::clone(&map);
                std::thread::spawn(move || (0..100).filter(|k| map.insert_if_absent(*k, t)).count())
            })
            .collect();

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(wins, 100);
        assert_eq!(map.len(), 100);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let map: Arc<KeyedMap<&'static str, Vec<u32>>> = Arc::new(KeyedMap::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let map = Arc::clone(&map);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        map.update_or_default("shared", |v| v.push(t * 1000 + i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(map.with_value(&"shared", |v| v.len()), Some(1000));
    }
}

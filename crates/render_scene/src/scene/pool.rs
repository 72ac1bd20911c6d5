//! Arena-backed entity pools
//!
//! Each category of scene entity lives in a [`SlotMap`] arena keyed by a
//! typed key. Entities that are attached to the scene are additionally
//! listed in a dense [`FixedArray`] of keys, and each entity remembers its
//! index there (`pool_id`). That back-reference makes removal by identity
//! O(1): swap the last key into the vacated slot and fix up the moved
//! entity's index.
//!
//! Invariant: an entity's `pool_id` is `Some(i)` exactly when
//! `pool[i]` is its key, and `None` when it is not attached.

use slotmap::{Key, SlotMap};

use crate::foundation::collections::{CollectionError, FixedArray, OverflowPolicy};

use super::error::{PoolCategory, SceneError, SceneResult};

/// Entities that can be attached to a pool
///
/// Only the owning pool writes the index.
pub(crate) trait Pooled {
    /// Index in the owning pool's dense array
    fn pool_id(&self) -> Option<usize>;

    /// Record the index in the owning pool's dense array
    fn set_pool_id(&mut self, id: Option<usize>);
}

/// Arena of entities plus the dense list of attached ones
#[derive(Debug)]
pub(crate) struct EntityPool<K: Key, T> {
    category: PoolCategory,
    arena: SlotMap<K, T>,
    pool: FixedArray<K>,
}

impl<K: Key, T: Pooled> EntityPool<K, T> {
    pub(crate) fn new(category: PoolCategory, capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            category,
            arena: SlotMap::with_key(),
            pool: FixedArray::with_policy(capacity, overflow),
        }
    }

    /// Store a detached entity
    pub(crate) fn create(&mut self, mut item: T) -> K {
        item.set_pool_id(None);
        self.arena.insert(item)
    }

    /// Detach and drop an entity from the arena
    pub(crate) fn destroy(&mut self, key: K) -> Option<T> {
        // Unknown keys fall through to the arena lookup below
        let _ = self.remove(key);
        self.arena.remove(key)
    }

    pub(crate) fn get(&self, key: K) -> Option<&T> {
        self.arena.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.arena.get_mut(key)
    }

    /// Attach an entity; `Ok(false)` if it already was
    pub(crate) fn add(&mut self, key: K) -> SceneResult<bool> {
        let item = self
            .arena
            .get_mut(key)
            .ok_or(SceneError::UnknownHandle { category: self.category })?;
        if item.pool_id().is_some() {
            return Ok(false);
        }

        let index = self.pool.push(key).map_err(|e| match e {
            CollectionError::CapacityExceeded { capacity } => SceneError::CapacityExceeded {
                category: self.category,
                capacity,
            },
        })?;
        item.set_pool_id(Some(index));

        log::debug!("Attached {} at pool index {}", self.category, index);
        Ok(true)
    }

    /// Detach an entity; `Ok(false)` if it was not attached
    pub(crate) fn remove(&mut self, key: K) -> SceneResult<bool> {
        let item = self
            .arena
            .get(key)
            .ok_or(SceneError::UnknownHandle { category: self.category })?;
        let Some(index) = item.pool_id() else {
            return Ok(false);
        };

        // The last entry is about to move into `index`
        if let Some(&last) = self.pool.last() {
            if let Some(moved) = self.arena.get_mut(last) {
                moved.set_pool_id(Some(index));
            }
        }
        let removed = self.pool.fast_remove(index);
        debug_assert_eq!(removed, Some(key), "pool index out of sync");

        if let Some(item) = self.arena.get_mut(key) {
            item.set_pool_id(None);
        }

        log::debug!("Detached {} from pool index {}", self.category, index);
        Ok(true)
    }

    /// Attached entity at dense index `index`
    pub(crate) fn at(&self, index: usize) -> SceneResult<&T> {
        self.pool
            .get(index)
            .and_then(|&key| self.arena.get(key))
            .ok_or(SceneError::IndexOutOfRange {
                category: self.category,
                index,
                count: self.pool.len(),
            })
    }

    /// Key of the attached entity at dense index `index`
    pub(crate) fn key_at(&self, index: usize) -> SceneResult<K> {
        self.pool.get(index).copied().ok_or(SceneError::IndexOutOfRange {
            category: self.category,
            index,
            count: self.pool.len(),
        })
    }

    /// Number of attached entities
    pub(crate) fn count(&self) -> usize {
        self.pool.len()
    }

    /// Attached entities in pool order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.pool
            .iter()
            .filter_map(move |&key| self.arena.get(key).map(|item| (key, item)))
    }

    /// Run `f` on every attached entity in pool order
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for key in self.pool.iter() {
            if let Some(item) = self.arena.get_mut(*key) {
                f(item);
            }
        }
    }

    /// Keys in the dense array, in pool order
    pub(crate) fn keys(&self) -> &[K] {
        self.pool.as_slice()
    }

    /// Capacity of the dense array
    pub(crate) fn capacity(&self) -> usize {
        self.pool.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    slotmap::new_key_type! {
        struct TestKey;
    }

    #[derive(Debug, Default)]
    struct Item {
        pool_id: Option<usize>,
    }

    impl Pooled for Item {
        fn pool_id(&self) -> Option<usize> {
            self.pool_id
        }

        fn set_pool_id(&mut self, id: Option<usize>) {
            self.pool_id = id;
        }
    }

    fn pool(capacity: usize) -> EntityPool<TestKey, Item> {
        EntityPool::new(PoolCategory::Model, capacity, OverflowPolicy::Grow)
    }

    fn assert_indices_consistent(pool: &EntityPool<TestKey, Item>, all: &[TestKey]) {
        for (i, key) in pool.keys().iter().enumerate() {
            assert_eq!(pool.get(*key).unwrap().pool_id, Some(i));
        }
        for key in all {
            if !pool.keys().contains(key) {
                assert_eq!(pool.get(*key).unwrap().pool_id, None);
            }
        }
    }

    #[test]
    fn test_swap_remove_fixes_moved_index() {
        let mut pool = pool(16);
        let a = pool.create(Item::default());
        let b = pool.create(Item::default());
        let c = pool.create(Item::default());
        for key in [a, b, c] {
            assert!(pool.add(key).unwrap());
        }

        assert!(pool.remove(a).unwrap());

        assert_eq!(pool.keys(), &[c, b]);
        assert_eq!(pool.get(c).unwrap().pool_id, Some(0));
        assert_eq!(pool.get(b).unwrap().pool_id, Some(1));
        assert_eq!(pool.get(a).unwrap().pool_id, None);
    }

    #[test]
    fn test_removing_last_element() {
        let mut pool = pool(4);
        let a = pool.create(Item::default());
        let b = pool.create(Item::default());
        pool.add(a).unwrap();
        pool.add(b).unwrap();

        pool.remove(b).unwrap();
        assert_eq!(pool.keys(), &[a]);
        assert_eq!(pool.get(a).unwrap().pool_id, Some(0));
        assert_eq!(pool.get(b).unwrap().pool_id, None);
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let mut pool = pool(4);
        let a = pool.create(Item::default());

        assert!(pool.add(a).unwrap());
        assert!(!pool.add(a).unwrap());
        assert_eq!(pool.count(), 1);
        assert_eq!(pool.get(a).unwrap().pool_id, Some(0));

        assert!(pool.remove(a).unwrap());
        assert!(!pool.remove(a).unwrap());
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_index_invariant_over_mixed_sequence() {
        let mut pool = pool(2);
        let keys: Vec<_> = (0..6).map(|_| pool.create(Item::default())).collect();

        // Deterministic interleaving of adds and removes, including repeats
        let script = [0, 1, 2, 3, 1, 4, 0, 5, 2, 2, 3, 1, 5, 4, 0];
        for (step, &i) in script.iter().enumerate() {
            if step % 3 == 2 {
                pool.remove(keys[i]).unwrap();
            } else {
                pool.add(keys[i]).unwrap();
            }
            assert_indices_consistent(&pool, &keys);
        }
    }

    #[test]
    fn test_fail_policy_reports_capacity() {
        let mut pool: EntityPool<TestKey, Item> =
            EntityPool::new(PoolCategory::Light, 1, OverflowPolicy::Fail);
        let a = pool.create(Item::default());
        let b = pool.create(Item::default());

        pool.add(a).unwrap();
        assert_eq!(
            pool.add(b),
            Err(SceneError::CapacityExceeded { category: PoolCategory::Light, capacity: 1 })
        );
        assert_eq!(pool.get(b).unwrap().pool_id, None);
    }

    #[test]
    fn test_destroy_detaches_first() {
        let mut pool = pool(4);
        let a = pool.create(Item::default());
        let b = pool.create(Item::default());
        pool.add(a).unwrap();
        pool.add(b).unwrap();

        assert!(pool.destroy(a).is_some());
        assert_eq!(pool.keys(), &[b]);
        assert_eq!(pool.get(b).unwrap().pool_id, Some(0));
        assert_eq!(pool.add(a), Err(SceneError::UnknownHandle { category: PoolCategory::Model }));
    }

    #[test]
    fn test_out_of_range_index() {
        let pool = pool(4);
        assert_eq!(
            pool.at(0).unwrap_err(),
            SceneError::IndexOutOfRange { category: PoolCategory::Model, index: 0, count: 0 }
        );
    }
}

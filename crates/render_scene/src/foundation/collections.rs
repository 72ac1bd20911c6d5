//! Pooled containers for per-frame data
//!
//! Both containers keep their backing storage alive across frames so the
//! render loop does not allocate while it runs:
//!
//! - [`FixedArray`] is a dense, order-non-preserving array with O(1)
//!   swap-and-pop removal. The scene keeps one per entity category.
//! - [`RecyclePool`] hands out reusable entries; `reset` rewinds the
//!   logical length without dropping anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a [`FixedArray`] does when a push would exceed its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Double the capacity and keep going (a warning is logged)
    #[default]
    Grow,
    /// Refuse the push with [`CollectionError::CapacityExceeded`]
    Fail,
}

/// Errors raised by the pooled containers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A push was refused under [`OverflowPolicy::Fail`]
    #[error("Capacity exceeded: array is full at {capacity} elements")]
    CapacityExceeded {
        /// Capacity at the time of the push
        capacity: usize,
    },
}

/// Dense array with a logical capacity and swap-and-pop removal
///
/// Elements in `[0, len)` are always valid; there are no holes. Removal
/// moves the last element into the vacated slot, so indices of other
/// elements are stable except for the one that was moved.
#[derive(Debug, Clone)]
pub struct FixedArray<T> {
    data: Vec<T>,
    capacity: usize,
    overflow: OverflowPolicy,
}

impl<T> FixedArray<T> {
    /// Create an empty array that grows when full
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(capacity, OverflowPolicy::Grow)
    }

    /// Create an empty array with an explicit overflow policy
    pub fn with_policy(capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            overflow,
        }
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current logical capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Overflow policy this array was created with
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Append an element and return the index it landed at
    pub fn push(&mut self, value: T) -> Result<usize, CollectionError> {
        if self.data.len() >= self.capacity {
            match self.overflow {
                OverflowPolicy::Fail => {
                    return Err(CollectionError::CapacityExceeded {
                        capacity: self.capacity,
                    });
                }
                OverflowPolicy::Grow => {
                    let grown = (self.capacity * 2).max(1);
                    log::warn!(
                        "FixedArray grew past its capacity: {} -> {}",
                        self.capacity,
                        grown
                    );
                    self.data.reserve(grown - self.data.len());
                    self.capacity = grown;
                }
            }
        }

        self.data.push(value);
        Ok(self.data.len() - 1)
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Remove the element at `index` by moving the last element into its slot
    ///
    /// Returns `None` when `index` is out of range.
    pub fn fast_remove(&mut self, index: usize) -> Option<T> {
        if index >= self.data.len() {
            return None;
        }
        Some(self.data.swap_remove(index))
    }

    /// Element at `index`, if live
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Mutable element at `index`, if live
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Last live element
    pub fn last(&self) -> Option<&T> {
        self.data.last()
    }

    /// Drop all elements, keeping the capacity
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate over live elements in storage order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Live elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Sort live elements in place
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.data.sort_by(compare);
    }
}

impl<T: PartialEq> FixedArray<T> {
    /// Linear search for `value`
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|v| v == value)
    }
}

impl<'a, T> IntoIterator for &'a FixedArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pool of reusable entries for transient per-call results
///
/// Entries are created by a factory up front and handed out again after
/// every [`reset`](Self::reset). Storage only ever grows.
pub struct RecyclePool<T> {
    data: Vec<T>,
    count: usize,
    factory: fn() -> T,
}

impl<T> RecyclePool<T> {
    /// Create a pool pre-filled with `size` entries from `factory`
    pub fn new(factory: fn() -> T, size: usize) -> Self {
        Self {
            data: (0..size).map(|_| factory()).collect(),
            count: 0,
            factory,
        }
    }

    /// Number of entries handed out since the last reset
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no entries are handed out
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of allocated entries, live or not
    pub fn allocated(&self) -> usize {
        self.data.len()
    }

    /// Rewind to zero length without dropping entries
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Hand out the next entry, growing the backing storage if needed
    ///
    /// The returned entry still carries whatever it held last time it was
    /// used; callers overwrite every field they care about.
    pub fn add(&mut self) -> &mut T {
        if self.count >= self.data.len() {
            let grown = (self.data.len() * 2).max(1);
            let factory = self.factory;
            self.data.resize_with(grown, factory);
        }
        self.count += 1;
        &mut self.data[self.count - 1]
    }

    /// Swap-remove the live entry at `index`; the entry stays allocated
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        let last = self.count - 1;
        self.data.swap(index, last);
        self.count = last;
    }

    /// Live entry at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Live entries as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.count]
    }

    /// Iterate over live entries
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Sort live entries in place
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.data[..self.count].sort_by(compare);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RecyclePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecyclePool")
            .field("live", &self.as_slice())
            .field("allocated", &self.data.len())
            .finish()
    }
}

use std::{cmp::Ordering, marker::PhantomData};
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

// 1. The ID (Handle)
// It's just the insertion index into an `Assets<T>`. Efficient to copy.
#[derive(Debug)]
pub struct Handle<T> {
    pub index: usize,
    marker: PhantomData<T>,
}

impl<T> Handle<T> {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

// Crucial for using Handle in HashMaps
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // We only compare the index, completely ignoring the generic marker
        self.index.cmp(&other.index)
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Serialize for Handle<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

// 2. The Storage
// Append-only. Insertion order is handle order and is never rearranged.
#[derive(Debug, Clone)]
pub struct Assets<T> {
    storage: Vec<T>,
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self {
            storage: Vec::new(),
        }
    }
}

impl<T> Assets<T> {
    pub fn add(&mut self, asset: T) -> Handle<T> {
        let handle = Handle::new(self.storage.len());
        self.storage.push(asset);
        handle
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.storage.get(handle.index)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Handles in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        (0..self.storage.len()).map(Handle::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.storage
            .iter()
            .enumerate()
            .map(|(index, asset)| (Handle::new(index), asset))
    }
}

impl<T: Serialize> Serialize for Assets<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.storage.serialize(serializer)
    }
}

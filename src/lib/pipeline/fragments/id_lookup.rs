//! Dense surrogate ids for hashable keys.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Bijection between distinct keys and the indices `0..len()`.
///
/// Ids are handed out in insertion order and carry no meaning beyond
/// addressing rows or columns of a matrix.
#[derive(Debug, Clone)]
pub struct IdLookup<K> {
    ids: FxHashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Hash + Eq + Clone> IdLookup<K> {
    pub fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Id of `key`, assigning the next free one on first sight.
    pub fn insert(&mut self, key: K) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    #[inline]
    pub fn id_of(&self, key: &K) -> Option<usize> {
        self.ids.get(key).copied()
    }

    #[inline]
    pub fn key_of(&self, id: usize) -> Option<&K> {
        self.keys.get(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for IdLookup<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for IdLookup<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for key in iter {
            lookup.insert(key);
        }
        lookup
    }
}

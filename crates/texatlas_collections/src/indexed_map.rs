use std::hash::Hash;
use std::{borrow::Borrow, collections::HashMap, ops::Index};

/// A map which keeps values in insertion order and allows
/// accessing them both by key and by index in O(1).
///
/// Indexes are stable: nothing is ever removed from the map,
/// and overwriting a key keeps its original index.
#[derive(Debug, Clone)]
pub struct IndexedMap<K, V> {
    index_to_value: Vec<V>,
    key_to_index: HashMap<K, usize>,
}

impl<K, V> Default for IndexedMap<K, V> {
    fn default() -> Self {
        Self {
            index_to_value: Default::default(),
            key_to_index: Default::default(),
        }
    }
}

impl<K: Eq + Hash, V> IndexedMap<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index_to_value: Vec::with_capacity(capacity),
            key_to_index: HashMap::with_capacity(capacity),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.index_to_value.reserve(additional);
        self.key_to_index.reserve(additional);
    }

    /// Inserts a value, overwriting the existing one if the key is taken.
    /// Returns the index of the value.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        match self.key_to_index.get(&key) {
            Some(&index) => {
                self.index_to_value[index] = value;
                index
            }
            None => self.push(key, value),
        }
    }

    /// Inserts a value only if the key is not taken yet.
    /// On conflict the map is left untouched and the index
    /// of the existing value is returned as an error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<usize, usize> {
        match self.key_to_index.get(&key) {
            Some(&index) => Err(index),
            None => Ok(self.push(key, value)),
        }
    }

    fn push(&mut self, key: K, value: V) -> usize {
        let index = self.index_to_value.len();
        self.index_to_value.push(value);
        self.key_to_index.insert(key, index);
        index
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.index_to_value.get(index)
    }

    pub fn get_index<Q: ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.key_to_index.get(key).cloned()
    }

    pub fn get_by_key<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get_index(key).map(|index| &self.index_to_value[index])
    }

    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.key_to_index.contains_key(key)
    }
}

impl<K, V> IndexedMap<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.index_to_value.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_value.is_empty()
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.index_to_value.iter()
    }
}

impl<K, V> Index<usize> for IndexedMap<K, V> {
    type Output = V;

    fn index(&self, index: usize) -> &Self::Output {
        &self.index_to_value[index]
    }
}

impl<K: Eq + Hash, V> Index<&K> for IndexedMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        let index = self.key_to_index[key];
        &self.index_to_value[index]
    }
}

impl<'a, K, V> IntoIterator for &'a IndexedMap<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

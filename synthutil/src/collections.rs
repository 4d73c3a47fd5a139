use std::collections::HashMap;

/// Groups values under a key, preserving the insertion order of values within each group.
pub struct MultiMap<K, V> {
    map: HashMap<K, Vec<V>>,
    empty: Vec<V>,
}

impl<K, V> MultiMap<K, V>
where
    K: std::cmp::Eq + std::hash::Hash,
{
    pub fn new() -> MultiMap<K, V> {
        MultiMap {
            map: HashMap::new(),
            empty: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_insert_with(Vec::new).push(value);
    }

    pub fn get(&self, key: K) -> &Vec<V> {
        self.map.get(&key).unwrap_or(&self.empty)
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> Default for MultiMap<K, V>
where
    K: std::cmp::Eq + std::hash::Hash,
{
    fn default() -> MultiMap<K, V> {
        MultiMap::new()
    }
}

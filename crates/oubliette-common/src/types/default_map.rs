use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// A `HashMap` that materializes a value for missing keys on first access.
///
/// The default comes either from the value type's `Default` impl
/// (`DefaultMap::new`) or from a factory closure that receives the key
/// (`DefaultMap::with_factory`). This mirrors how per-room caches in the
/// callback shims behave: reading an entry that does not exist yet creates
/// it in its initial state.
pub struct DefaultMap<K, V> {
    map: HashMap<K, V>,
    factory: Box<dyn Fn(&K) -> V>,
}

impl<K: Eq + Hash, V: Default + 'static> DefaultMap<K, V> {
    pub fn new() -> Self {
        Self::with_factory(|_| V::default())
    }
}

impl<K: Eq + Hash, V: Default + 'static> Default for DefaultMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> DefaultMap<K, V> {
    pub fn with_factory(factory: impl Fn(&K) -> V + 'static) -> Self {
        Self {
            map: HashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// If the key exists, returns its value; otherwise inserts the default
    /// for that key and returns it.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V {
        match self.map.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = (self.factory)(entry.key());
                entry.insert(value)
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for DefaultMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

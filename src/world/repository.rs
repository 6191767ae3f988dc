//! Repository contract for domain aggregates
//!
//! Upkeep and the turn phases only ever look aggregates up by id, enumerate
//! ids, and save modified copies back. Storage technology lives behind this
//! trait; the in-memory store keeps ids ordered so every enumeration is
//! deterministic.

use std::collections::BTreeMap;

/// A domain aggregate addressed by an opaque id
pub trait Aggregate: Clone {
    type Id: Copy + Ord + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Lookup-by-id and save for one aggregate type
pub trait Repository<T: Aggregate> {
    /// Fetch a copy of the aggregate, if present
    fn get(&self, id: T::Id) -> Option<T>;

    /// Insert or replace the aggregate under its own id
    fn save(&mut self, item: T);

    /// All ids in ascending order
    fn ids(&self) -> Vec<T::Id>;

    fn contains(&self, id: T::Id) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered in-memory repository
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T: Aggregate> {
    items: BTreeMap<T::Id, T>,
}

impl<T: Aggregate> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}

impl<T: Aggregate> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Aggregate> FromIterator<T> for InMemoryRepository<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut repo = Self::new();
        for item in iter {
            repo.save(item);
        }
        repo
    }
}

impl<T: Aggregate> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: T::Id) -> Option<T> {
        self.items.get(&id).cloned()
    }

    fn save(&mut self, item: T) {
        self.items.insert(item.id(), item);
    }

    fn ids(&self) -> Vec<T::Id> {
        self.items.keys().copied().collect()
    }

    fn contains(&self, id: T::Id) -> bool {
        self.items.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

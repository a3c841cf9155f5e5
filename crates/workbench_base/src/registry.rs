//! Generic keyed container with insertion-order iteration.
//!
//! A plain `HashMap` would make iteration order depend on hash-bucket
//! layout, which would make derivation search, example enumeration, and
//! constructor-case ordering nondeterministic between runs. `Registry<T>`
//! pairs a `HashMap` (for O(1) lookup) with an explicit insertion-order
//! list to keep that ordering stable across runs.

use rustc_hash::FxHashMap;

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::id::Id;

/// A keyed container owning entities of type `T`, indexed by `Id<T>`.
///
/// Iteration (`iter`, `ids`, `values`) always walks entities in the order
/// they were inserted, never hash order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entities: FxHashMap<Id<T>, T>,
    order: Vec<Id<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Registry {
            entities: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Insert a new entity under `id`. Returns the previous entity, if any
    /// (which also leaves `id`'s position in the insertion order unchanged).
    pub fn insert(&mut self, id: Id<T>, value: T) -> Option<T> {
        if self.entities.contains_key(&id) {
            return self.entities.insert(id, value);
        }
        self.order.push(id.clone());
        self.entities.insert(id, value)
    }

    pub fn get(&self, id: &Id<T>) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &Id<T>) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &Id<T>) -> bool {
        self.entities.contains_key(id)
    }

    /// Remove an entity, dropping it from both the map and the order list.
    /// Returns the removed entity, if it existed.
    pub fn remove(&mut self, id: &Id<T>) -> Option<T> {
        let removed = self.entities.remove(id);
        if removed.is_some() {
            self.order.retain(|existing| existing != id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &Id<T>> {
        self.order.iter()
    }

    /// `(id, entity)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id<T>, &T)> {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(id).map(|v| (id, v)))
    }

    /// Entities in insertion order, without their ids.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, v)| v)
    }

    /// Mutable entities, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let position: FxHashMap<&Id<T>, usize> = self.order.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let mut items: Vec<(usize, &mut T)> = self
            .entities
            .iter_mut()
            .map(|(id, value)| (position[id], value))
            .collect();
        items.sort_by_key(|(i, _)| *i);
        items.into_iter().map(|(_, value)| value)
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry::new()
    }
}

// Serialized as an ordered sequence of `(id, entity)` pairs rather than a
// JSON object, so that re-reading preserves insertion order exactly (a plain
// `HashMap` derive would serialize in hash order and lose it).
impl<T: Serialize> Serialize for Registry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.order.len()))?;
        for (id, value) in self.iter() {
            seq.serialize_element(&(id, value))?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Registry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RegistryVisitor<T> {
            type Value = Registry<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a sequence of (id, entity) pairs")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut registry = Registry::new();
                while let Some((id, value)) = seq.next_element::<(Id<T>, T)>()? {
                    registry.insert(id, value);
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_seq(RegistryVisitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Widget(&'static str);

    #[test]
    fn iterates_in_insertion_order_not_hash_order() {
        let mut reg: Registry<Widget> = Registry::new();
        let ids: Vec<Id<Widget>> = (0..20).map(|_| Id::fresh()).collect();
        for (i, id) in ids.iter().enumerate() {
            reg.insert(id.clone(), Widget(Box::leak(i.to_string().into_boxed_str())));
        }
        let observed: Vec<&Id<Widget>> = reg.ids().collect();
        let expected: Vec<&Id<Widget>> = ids.iter().collect();
        assert_eq!(observed, expected);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut reg: Registry<Widget> = Registry::new();
        let a = Id::fresh();
        let b = Id::fresh();
        reg.insert(a.clone(), Widget("a"));
        reg.insert(b.clone(), Widget("b"));
        assert_eq!(reg.remove(&a), Some(Widget("a")));
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec![&b]);
    }

    #[test]
    fn reinserting_same_id_preserves_position() {
        let mut reg: Registry<Widget> = Registry::new();
        let a = Id::fresh();
        let b = Id::fresh();
        reg.insert(a.clone(), Widget("a1"));
        reg.insert(b.clone(), Widget("b"));
        reg.insert(a.clone(), Widget("a2"));
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec![&a, &b]);
        assert_eq!(reg.get(&a), Some(&Widget("a2")));
    }
}

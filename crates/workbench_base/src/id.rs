//! Opaque, strongly-typed entity identifiers.
//!
//! Every registry-owned entity (sorts, constructors, judgments, rules,
//! functions, ...) is referenced by [`Id<T>`] rather than by a raw string or
//! index. The phantom `T` keeps a `SortId` from being accidentally used where
//! a `ConstructorId` is expected, at zero runtime cost.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// An opaque reference to an entity of kind `T`.
///
/// Wraps an RFC 4122 v4 UUID string. `Id` is `Copy`-free (ids are cloned, not
/// copied, to keep the representation an owned `String` rather than forcing
/// a fixed-size buffer), but cloning is cheap relative to the entities it
/// refers to.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Generate a fresh identifier using an RFC 4122 v4 UUID.
    pub fn fresh() -> Self {
        Id {
            value: uuid::Uuid::new_v4().to_string(),
            _marker: PhantomData,
        }
    }

    /// Wrap an existing string as an identifier (e.g. one read back from
    /// persisted state). No uniqueness check is performed here; the
    /// `Registry` that owns the entity is the source of truth for that.
    pub fn from_string(value: impl Into<String>) -> Self {
        Id {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// Borrow the identifier's raw string form.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Id {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sort;
    struct Constructor;

    #[test]
    fn fresh_ids_are_distinct() {
        let a: Id<Sort> = Id::fresh();
        let b: Id<Sort> = Id::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn roundtrips_through_json() {
        let id: Id<Sort> = Id::from_string("fixed-name");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"fixed-name\"");
        let back: Id<Sort> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn distinct_marker_types_do_not_interfere() {
        let a: Id<Sort> = Id::from_string("x");
        let b: Id<Constructor> = Id::from_string("x");
        assert_eq!(a.as_str(), b.as_str());
    }
}

//! Ordered map and set containers for decoded values.
//!
//! [`ValueMap`] and [`ValueSet`] are thin wrappers around [`IndexMap`] and [`IndexSet`] so that
//! decoded containers iterate in wire order. Equality ignores order, matching the semantics of
//! `g:Map` and `g:Set`.
//!
//! A `g:Map` payload never overwrites an entry: [`ValueMap::try_insert`] refuses a key that is
//! already present and the map codec turns that refusal into
//! [`Error::DuplicateKey`](crate::Error::DuplicateKey).
//!
//! ## Examples
//!
//! ```rust
//! use graphson_codec::{Value, ValueMap};
//!
//! let mut map = ValueMap::new();
//! map.try_insert(Value::from("name"), Value::from("marko")).unwrap();
//! map.try_insert(Value::from("age"), Value::from(29)).unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert!(map.try_insert(Value::from("age"), Value::from(30)).is_err());
//! ```

use crate::value::hash_one;
use crate::{Error, Result, Value};
use indexmap::{IndexMap, IndexSet};
use std::hash::{Hash, Hasher};

/// An insertion-ordered map of decoded keys to decoded values.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert(Value::from("first"), Value::from(1));
/// map.insert(Value::from("second"), Value::from(2));
///
/// let keys: Vec<_> = map.keys().filter_map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueMap(IndexMap<Value, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, replacing and returning any previous value.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Inserts a key-value pair only if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is already present; the map is left unchanged.
    pub fn try_insert(&mut self, key: Value, value: Value) -> Result<()> {
        if self.0.contains_key(&key) {
            return Err(Error::duplicate_key(&key));
        }
        self.0.insert(key, value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a string key, the common case for property maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{Value, ValueMap};
    ///
    /// let mut map = ValueMap::new();
    /// map.insert(Value::from("key"), Value::from(42));
    /// assert_eq!(map.get_str("key").and_then(|v| v.as_i64()), Some(42));
    /// ```
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&Value::from(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.0.iter()
    }
}

impl Hash for ValueMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .0
            .iter()
            .fold(0u64, |acc, entry| acc.wrapping_add(hash_one(&entry)));
        self.0.len().hash(state);
        combined.hash(state);
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}

/// An insertion-ordered, de-duplicating set of decoded values.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{Value, ValueSet};
///
/// let set: ValueSet = vec![1, 2, 2, 3].into_iter().map(Value::from).collect();
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&Value::from(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueSet(IndexSet<Value>);

impl ValueSet {
    #[must_use]
    pub fn new() -> Self {
        ValueSet(IndexSet::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueSet(IndexSet::with_capacity(capacity))
    }

    /// Adds a value, returning `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.0.insert(value)
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.0.iter()
    }
}

impl Hash for ValueSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .0
            .iter()
            .fold(0u64, |acc, value| acc.wrapping_add(hash_one(value)));
        self.0.len().hash(state);
        combined.hash(state);
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = indexmap::set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        ValueSet(IndexSet::from_iter(iter))
    }
}

impl Extend<Value> for ValueSet {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

//! Per-instance storage backing lazy properties.
//!
//! A host object owns a [`Slots`] map. Each property resolves into the entry
//! addressed by its [`StorageKey`]; the absence of an entry means the property
//! has not been resolved on that host yet.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Address of a cached property value inside a host's [`Slots`].
///
/// Derived from the public attribute name; renders with a leading underscore,
/// so the key of `lucky_number` displays as `_lucky_number`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageKey(&'static str);

impl StorageKey {
   /// Key under which the attribute `name` caches its value.
   #[inline]
   #[must_use]
   pub const fn for_attribute(name: &'static str) -> Self {
      Self(name)
   }

   /// Public attribute name this key was derived from.
   #[inline]
   pub const fn attribute_name(&self) -> &'static str {
      self.0
   }
}

impl fmt::Display for StorageKey {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "_{}", self.0)
   }
}

impl fmt::Debug for StorageKey {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "StorageKey({self})")
   }
}

type Entry = Box<dyn Any + Send + Sync>;

/// Type-erased map of resolved property values for one host instance.
#[derive(Default)]
pub struct Slots {
   entries: HashMap<StorageKey, Entry>,
}

impl Slots {
   /// Creates an empty map; every property starts unresolved.
   #[must_use]
   pub fn new() -> Self {
      Self::default()
   }

   /// Number of resolved entries.
   pub fn len(&self) -> usize {
      self.entries.len()
   }

   /// Whether no property has been resolved on this host.
   pub fn is_empty(&self) -> bool {
      self.entries.is_empty()
   }

   /// Whether `key` holds a value, of any type.
   pub fn contains(&self, key: StorageKey) -> bool {
      self.entries.contains_key(&key)
   }

   /// Returns the value under `key` if present and of type `T`.
   pub fn get<T: Any>(&self, key: StorageKey) -> Option<&T> {
      self.raw(key)?.downcast_ref()
   }

   /// Stores `value` under `key`, returning whether a previous entry was replaced.
   pub fn insert<T: Any + Send + Sync>(&mut self, key: StorageKey, value: T) -> bool {
      self.entries.insert(key, Box::new(value)).is_some()
   }

   /// Drops the entry under `key`, returning whether one existed.
   pub fn remove(&mut self, key: StorageKey) -> bool {
      self.entries.remove(&key).is_some()
   }

   /// Keys of all resolved entries, in no particular order.
   pub fn keys(&self) -> impl Iterator<Item = StorageKey> + '_ {
      self.entries.keys().copied()
   }

   /// Untyped view of the entry under `key`, for callers reporting type
   /// mismatches themselves.
   pub(crate) fn raw(&self, key: StorageKey) -> Option<&(dyn Any + Send + Sync)> {
      self.entries.get(&key).map(|entry| &**entry)
   }
}

impl fmt::Debug for Slots {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut keys: Vec<_> = self.keys().collect();
      keys.sort_by_key(|key| key.attribute_name());
      f.debug_tuple("Slots").field(&keys).finish()
   }
}

/// An object that carries lazy properties.
///
/// Implementors expose their [`Slots`]; property values shared across all
/// instances of the type read and write through these accessors.
pub trait Host {
   /// Storage that reads check and serve cached values from.
   fn slots(&self) -> &Slots;

   /// Storage that reads populate on a miss, and that setters and the
   /// default delete write to.
   fn slots_mut(&mut self) -> &mut Slots;
}

impl Host for Slots {
   #[inline]
   fn slots(&self) -> &Slots {
      self
   }

   #[inline]
   fn slots_mut(&mut self) -> &mut Slots {
      self
   }
}

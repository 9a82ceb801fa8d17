use std::any::Any;
use std::fmt;

use super::Property;
use crate::error::PropertyError;
use crate::slots::{Host, StorageKey};

/// Managed attribute with lazy, cached reads and overridable hooks.
///
/// - A read returns the value cached in the host's slot, or computes it with
///   the getter and caches it. Each host instance computes at most once until
///   the slot is cleared.
/// - A write is handed to the setter, which owns populating the slot. Without
///   a setter the property is read-only.
/// - A delete runs the deleter, or clears the slot.
///
/// All hooks are plain function pointers so a property can be built in a
/// `const` context and shared as a `static` by every instance of `H`.
pub struct BaseLazyProperty<H, T> {
   key: StorageKey,
   getter: Option<fn(&H) -> T>,
   setter: Option<fn(&mut H, T)>,
   deleter: Option<fn(&mut H)>,
   doc: Option<&'static str>,
}

impl<H, T> BaseLazyProperty<H, T> {
   /// Binds a property to `name` without a getter. Reading it before
   /// something populates the slot fails.
   #[inline]
   #[must_use]
   pub const fn new(name: &'static str) -> Self {
      Self {
         key: StorageKey::for_attribute(name),
         getter: None,
         setter: None,
         deleter: None,
         doc: None,
      }
   }

   /// Binds a property to `name`, computed on first read by `getter`.
   #[inline]
   #[must_use]
   pub const fn with_getter(name: &'static str, getter: fn(&H) -> T) -> Self {
      let mut this = Self::new(name);
      this.getter = Some(getter);
      this
   }

   /// Registers the write hook under the same name.
   #[inline]
   #[must_use]
   pub const fn with_setter(mut self, setter: fn(&mut H, T)) -> Self {
      self.setter = Some(setter);
      self
   }

   /// Registers the delete hook under the same name.
   #[inline]
   #[must_use]
   pub const fn with_deleter(mut self, deleter: fn(&mut H)) -> Self {
      self.deleter = Some(deleter);
      self
   }

   /// Attaches a human-readable description. Purely informational.
   #[inline]
   #[must_use]
   pub const fn with_doc(mut self, doc: &'static str) -> Self {
      self.doc = Some(doc);
      self
   }

   /// Public attribute name the property was bound to.
   #[inline]
   pub const fn name(&self) -> &'static str {
      self.key.attribute_name()
   }

   /// Slot key the value is cached under, `_<name>`.
   #[inline]
   pub const fn storage_key(&self) -> StorageKey {
      self.key
   }

   /// Description set with [`with_doc`](Self::with_doc).
   #[inline]
   pub const fn doc(&self) -> Option<&'static str> {
      self.doc
   }

   /// The compute hook, if any. Presence-required properties keep theirs
   /// here without ever calling it.
   #[inline]
   pub const fn getter(&self) -> Option<fn(&H) -> T> {
      self.getter
   }

   /// Whether a setter is registered.
   #[inline]
   pub const fn is_writable(&self) -> bool {
      self.setter.is_some()
   }
}

impl<H: Host, T: Any + Send + Sync> BaseLazyProperty<H, T> {
   /// Returns the cached value, computing and caching it on a miss.
   ///
   /// Fails with [`PropertyError::AttributeMissing`] when the slot is empty
   /// and there is no getter. A panicking getter leaves the slot empty.
   pub fn get<'h>(&self, host: &'h mut H) -> Result<&'h T, PropertyError> {
      if !host.slots().contains(self.key) {
         let getter = self
            .getter
            .ok_or_else(|| PropertyError::attribute_missing(self.key))?;
         let value = getter(&*host);
         host.slots_mut().insert(self.key, value);
      }
      self.cached(host)?.ok_or_else(|| PropertyError::attribute_missing(self.key))
   }

   /// Passes `value` to the setter. The slot is only touched if the setter
   /// touches it.
   pub fn set(&self, host: &mut H, value: T) -> Result<(), PropertyError> {
      let setter = self.setter.ok_or_else(|| PropertyError::not_writable(self.name()))?;
      setter(host, value);
      Ok(())
   }

   /// Runs the deleter if one is registered, otherwise clears the slot.
   ///
   /// Without a deleter, deleting an unresolved property fails with
   /// [`PropertyError::AttributeMissing`].
   pub fn delete(&self, host: &mut H) -> Result<(), PropertyError> {
      if let Some(deleter) = self.deleter {
         deleter(host);
         return Ok(());
      }
      if host.slots_mut().remove(self.key) {
         Ok(())
      } else {
         Err(PropertyError::attribute_missing(self.key))
      }
   }

   /// Looks the slot up without resolving it.
   ///
   /// `Ok(None)` when the slot is empty, an error when it holds a value of
   /// another type.
   pub fn cached<'h>(&self, host: &'h H) -> Result<Option<&'h T>, PropertyError> {
      match host.slots().raw(self.key) {
         None => Ok(None),
         Some(entry) => entry
            .downcast_ref::<T>()
            .map(Some)
            .ok_or_else(|| PropertyError::type_mismatch::<T>(self.name())),
      }
   }
}

impl<H: Host, T: Any + Send + Sync> Property<H> for BaseLazyProperty<H, T> {
   type Value = T;

   #[inline]
   fn base(&self) -> &BaseLazyProperty<H, T> {
      self
   }

   #[inline]
   fn get<'h>(&self, host: &'h mut H) -> Result<&'h T, PropertyError> {
      BaseLazyProperty::get(self, host)
   }
}

impl<H, T> fmt::Debug for BaseLazyProperty<H, T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("BaseLazyProperty")
         .field("name", &self.name())
         .field("storage_key", &self.key)
         .field("computed", &self.getter.is_some())
         .field("writable", &self.setter.is_some())
         .field("deletable", &self.deleter.is_some())
         .finish()
   }
}

use std::any::Any;
use std::fmt;

use super::{BaseLazyProperty, MissingPolicy, PresenceBuilder, Property};
use crate::error::PropertyError;
use crate::slots::Host;

/// Property computed by its getter on first read and cached per host.
///
/// ```rust
/// use lazy_attrs::{LazyProperty, Property, Slots};
///
/// static ANSWER: LazyProperty<Slots, u32> = LazyProperty::new("answer", |_| 42);
///
/// let mut host = Slots::new();
/// assert_eq!(ANSWER.get(&mut host), Ok(&42));
/// assert_eq!(host.get::<u32>(ANSWER.storage_key()), Some(&42));
/// ```
pub struct LazyProperty<H, T> {
   base: BaseLazyProperty<H, T>,
}

impl<H, T> LazyProperty<H, T> {
   /// Binds a property to `name`, computed by `getter` on first read.
   #[inline]
   #[must_use]
   pub const fn new(name: &'static str, getter: fn(&H) -> T) -> Self {
      Self {
         base: BaseLazyProperty::with_getter(name, getter),
      }
   }

   /// Registers the write hook. The setter is expected to store the value
   /// under [`Property::storage_key`] itself.
   #[inline]
   #[must_use]
   pub const fn with_setter(self, setter: fn(&mut H, T)) -> Self {
      Self {
         base: self.base.with_setter(setter),
      }
   }

   /// Registers the delete hook, replacing the default of clearing the slot.
   #[inline]
   #[must_use]
   pub const fn with_deleter(self, deleter: fn(&mut H)) -> Self {
      Self {
         base: self.base.with_deleter(deleter),
      }
   }

   #[inline]
   #[must_use]
   pub const fn with_doc(self, doc: &'static str) -> Self {
      Self {
         base: self.base.with_doc(doc),
      }
   }

   /// Starts a property that must be populated before it is read.
   ///
   /// Reading it while unresolved fails with
   /// [`PropertyError::NotPresent`], carrying `error_message` or
   /// `property '<name>' is not present yet`.
   #[inline]
   #[must_use]
   pub const fn require_presence(error_message: Option<&'static str>) -> PresenceBuilder<H, T> {
      PresenceBuilder::new(MissingPolicy::Raise { error_message })
   }

   /// Starts a property that falls back to `default_value()` when read while
   /// unresolved, emitting `warning_message` if one is given.
   ///
   /// The default is produced on each fallback, so `T` needs no `Clone`.
   #[inline]
   #[must_use]
   pub const fn with_default_value_when_missing(
      default_value: fn() -> T,
      warning_message: Option<&'static str>,
   ) -> PresenceBuilder<H, T> {
      PresenceBuilder::new(MissingPolicy::Default {
         value: default_value,
         warning_message,
      })
   }
}

impl<H: Host, T: Any + Send + Sync> Property<H> for LazyProperty<H, T> {
   type Value = T;

   #[inline]
   fn base(&self) -> &BaseLazyProperty<H, T> {
      &self.base
   }

   #[inline]
   fn get<'h>(&self, host: &'h mut H) -> Result<&'h T, PropertyError> {
      self.base.get(host)
   }
}

impl<H, T> fmt::Debug for LazyProperty<H, T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("LazyProperty").field(&self.base).finish()
   }
}

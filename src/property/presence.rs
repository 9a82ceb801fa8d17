use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use super::{BaseLazyProperty, Property};
use crate::error::PropertyError;
use crate::slots::Host;
use crate::warning;

/// What a presence-required property does when read while unresolved.
///
/// Holds no `T` itself: the default is produced by a function pointer, so the
/// policy is `Copy` and usable in `const` builders for any `T`.
pub enum MissingPolicy<T> {
   /// Fail with [`PropertyError::NotPresent`].
   Raise { error_message: Option<&'static str> },
   /// Cache and return `value()`, emitting `warning_message` first if set.
   Default {
      value: fn() -> T,
      warning_message: Option<&'static str>,
   },
}

impl<T> MissingPolicy<T> {
   /// Whether an unresolved read fails instead of falling back.
   #[inline]
   pub const fn raises(&self) -> bool {
      matches!(self, Self::Raise { .. })
   }

   /// Message attached to the failure or the warning, if any.
   #[inline]
   pub const fn message(&self) -> Option<&'static str> {
      match self {
         Self::Raise { error_message } => *error_message,
         Self::Default { warning_message, .. } => *warning_message,
      }
   }
}

impl<T> Clone for MissingPolicy<T> {
   fn clone(&self) -> Self {
      *self
   }
}

impl<T> Copy for MissingPolicy<T> {}

impl<T> fmt::Debug for MissingPolicy<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Self::Raise { error_message } => f.debug_struct("Raise").field("error_message", error_message).finish(),
         Self::Default { warning_message, .. } => f
            .debug_struct("Default")
            .field("warning_message", warning_message)
            .finish_non_exhaustive(),
      }
   }
}

/// First stage of a presence-required property: the policy is chosen, the
/// binding is not.
///
/// Obtained from [`LazyProperty::require_presence`](super::LazyProperty::require_presence)
/// or [`LazyProperty::with_default_value_when_missing`](super::LazyProperty::with_default_value_when_missing).
pub struct PresenceBuilder<H, T> {
   policy: MissingPolicy<T>,
   _host: PhantomData<fn(&H)>,
}

impl<H, T> PresenceBuilder<H, T> {
   #[inline]
   pub(crate) const fn new(policy: MissingPolicy<T>) -> Self {
      Self {
         policy,
         _host: PhantomData,
      }
   }

   /// Finishes the property under `name`. `getter` is recorded for
   /// introspection but never called to resolve the value.
   #[inline]
   #[must_use]
   pub const fn attach(self, name: &'static str, getter: fn(&H) -> T) -> PresenceRequiredProperty<H, T> {
      PresenceRequiredProperty {
         base: BaseLazyProperty::with_getter(name, getter),
         policy: self.policy,
      }
   }

   /// Finishes the property under `name` without a getter.
   #[inline]
   #[must_use]
   pub const fn bind(self, name: &'static str) -> PresenceRequiredProperty<H, T> {
      PresenceRequiredProperty {
         base: BaseLazyProperty::new(name),
         policy: self.policy,
      }
   }
}

/// Property whose value must be supplied by a setter or by the host itself
/// before it is read.
///
/// States per host: absent (no slot entry) and present. Reads of a present
/// property return the cached value. Reads of an absent one follow the
/// [`MissingPolicy`]: fail, or install the default and return it.
///
/// ```rust
/// use lazy_attrs::{LazyProperty, Property, PropertyError, Slots};
///
/// static TOKEN: lazy_attrs::PresenceRequiredProperty<Slots, String> =
///    LazyProperty::require_presence(None).bind("token");
///
/// let mut host = Slots::new();
/// let err = TOKEN.get(&mut host).unwrap_err();
/// assert_eq!(err.to_string(), "property 'token' is not present yet");
///
/// host.insert(TOKEN.storage_key(), String::from("abc"));
/// assert_eq!(TOKEN.get(&mut host).map(String::as_str), Ok("abc"));
/// ```
pub struct PresenceRequiredProperty<H, T> {
   base: BaseLazyProperty<H, T>,
   policy: MissingPolicy<T>,
}

impl<H, T> PresenceRequiredProperty<H, T> {
   /// Registers the write hook, the usual way a value becomes present.
   ///
   /// ```rust
   /// use lazy_attrs::{LazyProperty, PresenceRequiredProperty, Property, Slots};
   ///
   /// static MOTTO: PresenceRequiredProperty<Slots, String> =
   ///    LazyProperty::require_presence(Some("no motto set"))
   ///       .attach("motto", |_: &Slots| String::from("unused"))
   ///       .with_setter(|slots: &mut Slots, motto: String| {
   ///          slots.insert(MOTTO.storage_key(), motto.to_uppercase());
   ///       })
   ///       .with_doc("What the host lives by.");
   ///
   /// let mut host = Slots::new();
   /// assert_eq!(MOTTO.get(&mut host).unwrap_err().to_string(), "no motto set");
   ///
   /// MOTTO.set(&mut host, String::from("carpe diem")).unwrap();
   /// assert_eq!(MOTTO.get(&mut host).map(String::as_str), Ok("CARPE DIEM"));
   /// assert!(MOTTO.base().getter().is_some());
   /// assert_eq!(MOTTO.base().doc(), Some("What the host lives by."));
   /// ```
   #[inline]
   #[must_use]
   pub const fn with_setter(self, setter: fn(&mut H, T)) -> Self {
      Self {
         base: self.base.with_setter(setter),
         policy: self.policy,
      }
   }

   /// Registers the delete hook. Without one a delete clears the slot,
   /// returning the property to absent.
   #[inline]
   #[must_use]
   pub const fn with_deleter(self, deleter: fn(&mut H)) -> Self {
      Self {
         base: self.base.with_deleter(deleter),
         policy: self.policy,
      }
   }

   /// Attaches a description, readable through [`BaseLazyProperty::doc`].
   #[inline]
   #[must_use]
   pub const fn with_doc(self, doc: &'static str) -> Self {
      Self {
         base: self.base.with_doc(doc),
         policy: self.policy,
      }
   }

   /// How unresolved reads are handled.
   #[inline]
   pub const fn policy(&self) -> &MissingPolicy<T> {
      &self.policy
   }
}

impl<H, T> Property<H> for PresenceRequiredProperty<H, T>
where
   H: Host,
   T: Any + Send + Sync,
{
   type Value = T;

   #[inline]
   fn base(&self) -> &BaseLazyProperty<H, T> {
      &self.base
   }

   fn get<'h>(&self, host: &'h mut H) -> Result<&'h T, PropertyError> {
      let name = self.base.name();
      if !host.slots().contains(self.base.storage_key()) {
         match &self.policy {
            MissingPolicy::Raise { error_message } => {
               return Err(PropertyError::not_present(name, *error_message));
            }
            MissingPolicy::Default {
               value,
               warning_message,
            } => {
               if let Some(message) = *warning_message {
                  warning::warn(name, message);
               }
               host.slots_mut().insert(self.base.storage_key(), value());
            }
         }
      }
      self.base
         .cached(host)?
         .ok_or_else(|| PropertyError::attribute_missing(self.base.storage_key()))
   }
}

impl<H, T> fmt::Debug for PresenceRequiredProperty<H, T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("PresenceRequiredProperty")
         .field("base", &self.base)
         .field("policy", &self.policy)
         .finish()
   }
}

//! Lazily computed, cached properties.
//!
//! A property is declared once per host type, usually as a `static`, and
//! resolves into the per-instance [`Slots`](crate::Slots) of whichever host it
//! is used with:
//!
//! ```rust
//! use lazy_attrs::{Host, LazyProperty, Property, Slots};
//!
//! struct Circle {
//!    radius: f64,
//!    slots: Slots,
//! }
//!
//! impl Host for Circle {
//!    fn slots(&self) -> &Slots {
//!       &self.slots
//!    }
//!    fn slots_mut(&mut self) -> &mut Slots {
//!       &mut self.slots
//!    }
//! }
//!
//! static AREA: LazyProperty<Circle, f64> =
//!    LazyProperty::new("area", |c: &Circle| std::f64::consts::PI * c.radius * c.radius);
//!
//! let mut circle = Circle { radius: 2.0, slots: Slots::new() };
//! assert!((AREA.get(&mut circle).unwrap() - 12.566).abs() < 1e-3);
//! assert!(AREA.is_resolved(&circle));
//! ```

use std::any::Any;

use crate::error::PropertyError;
use crate::slots::{Host, StorageKey};

mod base;
mod lazy;
mod presence;

pub use base::BaseLazyProperty;
pub use lazy::LazyProperty;
pub use presence::{MissingPolicy, PresenceBuilder, PresenceRequiredProperty};

/// Read/write/delete access to a managed attribute of `H`.
///
/// Variants differ only in how a read resolves an empty slot; writes and
/// deletes go through the shared [`BaseLazyProperty`] hooks.
pub trait Property<H: Host> {
   /// Type of the attribute.
   type Value: Any + Send + Sync;

   /// The hooks and binding shared by every variant.
   fn base(&self) -> &BaseLazyProperty<H, Self::Value>;

   /// Returns the cached value, resolving it first if the slot is empty.
   fn get<'h>(&self, host: &'h mut H) -> Result<&'h Self::Value, PropertyError>;

   /// Public attribute name.
   fn name(&self) -> &'static str {
      self.base().name()
   }

   /// Key of the host slot the value is cached under.
   fn storage_key(&self) -> StorageKey {
      self.base().storage_key()
   }

   /// Hands `value` to the setter. Fails with [`PropertyError::NotWritable`]
   /// when there is none.
   fn set(&self, host: &mut H, value: Self::Value) -> Result<(), PropertyError> {
      self.base().set(host, value)
   }

   /// Runs the deleter, or clears the slot when there is none.
   fn delete(&self, host: &mut H) -> Result<(), PropertyError> {
      self.base().delete(host)
   }

   /// Whether `host` currently holds a value for this property.
   fn is_resolved(&self, host: &H) -> bool {
      host.slots().contains(self.storage_key())
   }
}

//! Errors surfaced by property access.

use std::borrow::Cow;

use thiserror::Error;

use crate::slots::StorageKey;

/// Failure of a property read, write or delete.
///
/// The `Display` text of each variant is stable and part of the public
/// contract; callers may match on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
   /// A write was attempted on a property without a setter.
   #[error("setting '{name}' is not allowed")]
   NotWritable { name: &'static str },

   /// A presence-required property was read before anything populated it.
   #[error("{message}")]
   NotPresent {
      name: &'static str,
      message: Cow<'static, str>,
   },

   /// The slot is empty and there is nothing to compute it with, or a
   /// delete found no stored value.
   #[error("object has no attribute '{storage_key}'")]
   AttributeMissing {
      name: &'static str,
      storage_key: StorageKey,
   },

   /// The slot holds a value of another type than the property declares.
   #[error("stored value of '{name}' is not a `{expected}`")]
   TypeMismatch {
      name: &'static str,
      expected: &'static str,
   },
}

impl PropertyError {
   pub(crate) fn not_writable(name: &'static str) -> Self {
      Self::NotWritable { name }
   }

   /// Builds the presence error, falling back to the default wording.
   pub(crate) fn not_present(name: &'static str, custom: Option<&'static str>) -> Self {
      let message = match custom {
         Some(message) => Cow::Borrowed(message),
         None => Cow::Owned(format!("property '{name}' is not present yet")),
      };
      Self::NotPresent { name, message }
   }

   pub(crate) fn attribute_missing(key: StorageKey) -> Self {
      Self::AttributeMissing {
         name: key.attribute_name(),
         storage_key: key,
      }
   }

   pub(crate) fn type_mismatch<T>(name: &'static str) -> Self {
      Self::TypeMismatch {
         name,
         expected: std::any::type_name::<T>(),
      }
   }

   /// Name of the property the failure concerns.
   pub fn property_name(&self) -> &'static str {
      match self {
         Self::NotWritable { name }
         | Self::NotPresent { name, .. }
         | Self::AttributeMissing { name, .. }
         | Self::TypeMismatch { name, .. } => name,
      }
   }
}

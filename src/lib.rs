//! Lazily computed, cached properties and process-wide singletons.
//!
//! # Lazy properties
//!
//! A property is declared once per host type, typically as a `static`, and
//! caches its value in the [`Slots`] of each host instance it is read from:
//!
//! - [`LazyProperty`]: computed by its getter on first read, cached after.
//! - [`PresenceRequiredProperty`]: must be supplied by a setter or by the host
//!   before it is read. Reading it while absent either fails with
//!   [`PropertyError::NotPresent`] or installs a default value and emits a
//!   [`Warning`], depending on its [`MissingPolicy`].
//! - [`BaseLazyProperty`]: the shared hooks (getter, setter, deleter) both
//!   variants are built on.
//!
//! Writes go through an explicitly registered setter; without one every write
//! fails with [`PropertyError::NotWritable`].
//!
//! ```rust
//! use lazy_attrs::{Host, LazyProperty, PresenceRequiredProperty, Property, Slots};
//!
//! struct Person {
//!    slots: Slots,
//! }
//!
//! impl Host for Person {
//!    fn slots(&self) -> &Slots {
//!       &self.slots
//!    }
//!    fn slots_mut(&mut self) -> &mut Slots {
//!       &mut self.slots
//!    }
//! }
//!
//! static LUCKY_NUMBER: LazyProperty<Person, u32> =
//!    LazyProperty::new("lucky_number", |_| 81).with_setter(|person: &mut Person, number: u32| {
//!       person.slots.insert(LUCKY_NUMBER.storage_key(), number);
//!    });
//!
//! static NICKNAME: PresenceRequiredProperty<Person, &'static str> =
//!    LazyProperty::with_default_value_when_missing(|| "n/a", Some("no nickname yet"))
//!       .bind("nickname");
//!
//! let mut person = Person { slots: Slots::new() };
//! assert_eq!(LUCKY_NUMBER.get(&mut person), Ok(&81));
//! LUCKY_NUMBER.set(&mut person, 100).unwrap();
//! assert_eq!(LUCKY_NUMBER.get(&mut person), Ok(&100));
//!
//! let (nickname, warnings) = lazy_attrs::catch_warnings(|| NICKNAME.get(&mut person).copied());
//! assert_eq!(nickname, Ok("n/a"));
//! assert_eq!(warnings[0].message, "no nickname yet");
//! ```
//!
//! # Singletons
//!
//! [`Singleton<T>`] holds the single instance of `T`, constructed at most once
//! even under concurrent first access. [`SingletonType`] and the
//! [`singleton!`] macro attach such a slot to a type.

/// Errors of property access.
mod error;

/// Lazy property variants.
mod property;

/// Initialization state machine behind [`Singleton`].
mod state;

/// Single-instance slots.
mod singleton;

/// Per-instance storage.
mod slots;

/// Warning emission and capture.
pub mod warning;

pub use error::PropertyError;
pub use property::{
   BaseLazyProperty, LazyProperty, MissingPolicy, PresenceBuilder, PresenceRequiredProperty, Property,
};
pub use singleton::{Singleton, SingletonType};
pub use slots::{Host, Slots, StorageKey};
pub use warning::{catch_warnings, Warning};

use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_attrs::{
   catch_warnings, Host, LazyProperty, MissingPolicy, PresenceRequiredProperty, Property, PropertyError,
   Slots, Warning,
};

struct Person {
   slots: Slots,
}

impl Person {
   /// Populates `name` up front, the way a constructor fills its own fields.
   fn new(name: &str) -> Self {
      let mut slots = Slots::new();
      slots.insert(NAME.storage_key(), name.to_string());
      Self { slots }
   }

   fn fallback_number(&self) -> i32 {
      42
   }

   fn fallback_name(&self) -> String {
      String::from("fallback")
   }
}

impl Host for Person {
   fn slots(&self) -> &Slots {
      &self.slots
   }

   fn slots_mut(&mut self) -> &mut Slots {
      &mut self.slots
   }
}

static NAME: PresenceRequiredProperty<Person, String> =
   LazyProperty::require_presence(None).attach("name", Person::fallback_name);

static RENAMEABLE: PresenceRequiredProperty<Person, String> = LazyProperty::require_presence(None)
   .attach("renameable", Person::fallback_name)
   .with_setter(|person, name| {
      person.slots.insert(RENAMEABLE.storage_key(), name);
   });

static REQUIRED_NUMBER: PresenceRequiredProperty<Person, i32> =
   LazyProperty::require_presence(None).attach("lucky_number", Person::fallback_number);

static CUSTOM_MESSAGE: PresenceRequiredProperty<Person, i32> =
   LazyProperty::require_presence(Some("call `draw` before reading the lucky number"))
      .attach("drawn_number", Person::fallback_number);

static DEFAULTED_NUMBER: PresenceRequiredProperty<Person, i32> =
   LazyProperty::with_default_value_when_missing(|| -1, Some("the lucky number is not present yet"))
      .attach("defaulted_number", Person::fallback_number);

static QUIET_DEFAULT: PresenceRequiredProperty<Person, i32> =
   LazyProperty::with_default_value_when_missing(|| 0, None).bind("quiet_number");

fn person_without_name() -> Person {
   Person { slots: Slots::new() }
}

#[test]
fn test_missing_raises_default_message() {
   let mut person = person_without_name();

   for _ in 0..3 {
      let err = REQUIRED_NUMBER.get(&mut person).unwrap_err();
      assert_eq!(err.to_string(), "property 'lucky_number' is not present yet");
      assert_eq!(err.property_name(), "lucky_number");
   }

   assert!(person.slots.is_empty());
   assert!(REQUIRED_NUMBER.policy().raises());
}

#[test]
fn test_missing_raises_custom_message() {
   let mut person = person_without_name();

   let err = CUSTOM_MESSAGE.get(&mut person).unwrap_err();
   assert_eq!(
      err,
      PropertyError::NotPresent {
         name: "drawn_number",
         message: "call `draw` before reading the lucky number".into(),
      }
   );
   assert_eq!(err.to_string(), "call `draw` before reading the lucky number");
}

#[test]
fn test_getter_is_never_called() {
   static ISOLATED_CALLS: AtomicUsize = AtomicUsize::new(0);
   static ISOLATED: PresenceRequiredProperty<Slots, u8> =
      LazyProperty::require_presence(None).attach("isolated", |_| {
         ISOLATED_CALLS.fetch_add(1, Ordering::SeqCst);
         1
      });

   let mut slots = Slots::new();
   for _ in 0..3 {
      assert!(ISOLATED.get(&mut slots).is_err());
   }
   assert_eq!(ISOLATED_CALLS.load(Ordering::SeqCst), 0);
   assert!(ISOLATED.base().getter().is_some());
}

#[test]
fn test_host_populated_value_is_returned() {
   let mut person = Person::new("Isaac");
   assert_eq!(NAME.get(&mut person).map(String::as_str), Ok("Isaac"));
}

#[test]
fn test_set_without_setter_is_rejected() {
   let mut person = Person::new("Isaac");

   let err = NAME.set(&mut person, "Albert".to_string()).unwrap_err();
   assert_eq!(err.to_string(), "setting 'name' is not allowed");
   assert_eq!(NAME.get(&mut person).map(String::as_str), Ok("Isaac"));
}

#[test]
fn test_set_with_setter_then_get() {
   let mut person = person_without_name();

   assert!(RENAMEABLE.get(&mut person).is_err());
   RENAMEABLE.set(&mut person, "Albert".to_string()).unwrap();
   assert_eq!(RENAMEABLE.get(&mut person).map(String::as_str), Ok("Albert"));

   // Nothing but the property's own slot was written
   let keys: Vec<_> = person.slots.keys().collect();
   assert_eq!(keys, [RENAMEABLE.storage_key()]);
   assert_eq!(
      person.slots.get::<String>(RENAMEABLE.storage_key()).map(String::as_str),
      Some("Albert")
   );
}

#[test]
fn test_default_on_missing_with_warning() {
   let mut person = person_without_name();

   let (value, warnings) = catch_warnings(|| DEFAULTED_NUMBER.get(&mut person).copied());
   assert_eq!(value, Ok(-1));
   assert_eq!(
      warnings,
      [Warning {
         property: "defaulted_number",
         message: "the lucky number is not present yet",
      }]
   );

   assert_eq!(person.slots.len(), 1);
   assert_eq!(person.slots.get::<i32>(DEFAULTED_NUMBER.storage_key()), Some(&-1));
   assert_eq!(DEFAULTED_NUMBER.storage_key().to_string(), "_defaulted_number");
}

#[test]
fn test_default_installed_once() {
   let mut person = person_without_name();

   let (_, first) = catch_warnings(|| DEFAULTED_NUMBER.get(&mut person).copied());
   let (value, second) = catch_warnings(|| DEFAULTED_NUMBER.get(&mut person).copied());
   assert_eq!(first.len(), 1);
   assert!(second.is_empty());
   assert_eq!(value, Ok(-1));
}

#[test]
fn test_default_without_warning() {
   let mut person = person_without_name();

   let (value, warnings) = catch_warnings(|| QUIET_DEFAULT.get(&mut person).copied());
   assert_eq!(value, Ok(0));
   assert!(warnings.is_empty());
   assert!(matches!(
      QUIET_DEFAULT.policy(),
      MissingPolicy::Default {
         warning_message: None,
         ..
      }
   ));
   assert_eq!(QUIET_DEFAULT.policy().message(), None);
}

#[test]
fn test_present_value_wins_over_default() {
   let mut person = person_without_name();
   person.slots.insert(DEFAULTED_NUMBER.storage_key(), 7);

   let (value, warnings) = catch_warnings(|| DEFAULTED_NUMBER.get(&mut person).copied());
   assert_eq!(value, Ok(7));
   assert!(warnings.is_empty());
}

#[test]
fn test_delete_returns_to_absent() {
   let mut person = Person::new("Isaac");

   NAME.delete(&mut person).unwrap();
   assert!(!NAME.is_resolved(&person));
   assert_eq!(
      NAME.get(&mut person).unwrap_err().to_string(),
      "property 'name' is not present yet"
   );

   let (value, warnings) = catch_warnings(|| {
      DEFAULTED_NUMBER.get(&mut person).copied().unwrap();
      DEFAULTED_NUMBER.delete(&mut person).unwrap();
      DEFAULTED_NUMBER.get(&mut person).copied()
   });
   assert_eq!(value, Ok(-1));
   assert_eq!(warnings.len(), 2);
}

#[test]
fn test_nested_capture_records_innermost_only() {
   let mut person = person_without_name();

   let ((_, inner), outer) = catch_warnings(|| catch_warnings(|| DEFAULTED_NUMBER.get(&mut person).copied()));
   assert_eq!(inner.len(), 1);
   assert!(outer.is_empty());
}

/// Neither `Clone` nor `Debug`: presence-required values only need to be storable.
struct Handle(u32);

static HANDLE: PresenceRequiredProperty<Slots, Handle> = LazyProperty::require_presence(Some("no handle opened"))
   .attach("handle", |_: &Slots| Handle(0))
   .with_setter(|slots: &mut Slots, handle: Handle| {
      slots.insert(HANDLE.storage_key(), handle);
   })
   .with_doc("An opened resource.");

static FRESH_HANDLE: PresenceRequiredProperty<Slots, Handle> =
   LazyProperty::with_default_value_when_missing(|| Handle(1), Some("opening a fresh handle")).bind("fresh_handle");

#[test]
fn test_non_clone_value_under_raise() {
   let mut slots = Slots::new();

   assert_eq!(HANDLE.storage_key().to_string(), "_handle");
   assert_eq!(HANDLE.get(&mut slots).err().unwrap().to_string(), "no handle opened");
   assert!(HANDLE.policy().raises());

   HANDLE.set(&mut slots, Handle(7)).unwrap();
   assert_eq!(HANDLE.get(&mut slots).map(|handle| handle.0), Ok(7));
   assert_eq!(slots.get::<Handle>(HANDLE.storage_key()).map(|handle| handle.0), Some(7));
   assert_eq!(HANDLE.base().doc(), Some("An opened resource."));
}

#[test]
fn test_non_clone_default_is_produced_per_fallback() {
   let mut slots = Slots::new();

   let (value, warnings) = catch_warnings(|| FRESH_HANDLE.get(&mut slots).map(|handle| handle.0));
   assert_eq!(value, Ok(1));
   assert_eq!(warnings.len(), 1);

   // Deleting and reading again installs a new default
   FRESH_HANDLE.delete(&mut slots).unwrap();
   let (value, warnings) = catch_warnings(|| FRESH_HANDLE.get(&mut slots).map(|handle| handle.0));
   assert_eq!(value, Ok(1));
   assert_eq!(warnings[0].message, "opening a fresh handle");
}

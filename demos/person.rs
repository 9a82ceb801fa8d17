use lazy_attrs::{catch_warnings, Host, LazyProperty, PresenceRequiredProperty, Property, Slots};

struct Person {
   name: String,
   slots: Slots,
}

impl Person {
   fn new(name: &str) -> Self {
      Self {
         name: name.to_string(),
         slots: Slots::new(),
      }
   }

   fn lucky_number(&self) -> u32 {
      println!("Computing lucky number for {}...", self.name);
      self.name.bytes().map(u32::from).sum::<u32>() % 101
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

static LUCKY_NUMBER: LazyProperty<Person, u32> =
   LazyProperty::new("lucky_number", Person::lucky_number).with_setter(|person, number| {
      person.slots.insert(LUCKY_NUMBER.storage_key(), number);
   });

static BIRTH_YEAR: PresenceRequiredProperty<Person, i32> =
   LazyProperty::with_default_value_when_missing(|| -1, Some("the birth year is not present yet"))
      .bind("birth_year");

static EMAIL: PresenceRequiredProperty<Person, String> =
   LazyProperty::require_presence(Some("an email address must be registered first")).bind("email");

fn main() {
   let mut person = Person::new("Isaac");
   println!("{:?}", person.slots);

   // Computed on the first read only
   let first = *LUCKY_NUMBER.get(&mut person).unwrap();
   let second = *LUCKY_NUMBER.get(&mut person).unwrap();
   assert_eq!(first, second);
   println!("lucky number: {first}, slots: {:?}", person.slots);

   LUCKY_NUMBER.set(&mut person, 100).unwrap();
   println!("after set: {}", LUCKY_NUMBER.get(&mut person).unwrap());

   let (year, warnings) = catch_warnings(|| BIRTH_YEAR.get(&mut person).copied());
   println!("birth year: {year:?}, warnings: {warnings:?}");

   match EMAIL.get(&mut person) {
      Ok(email) => println!("email: {email}"),
      Err(err) => println!("email unavailable: {err}"),
   }
   if let Err(err) = EMAIL.set(&mut person, "isaac@example.com".to_string()) {
      println!("{err}");
   }
}

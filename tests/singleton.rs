use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use lazy_attrs::{singleton, Singleton, SingletonType};

#[derive(Debug, PartialEq)]
struct Config {
   name: String,
   workers: usize,
}

#[test]
fn test_new_is_empty() {
   let slot: Singleton<Config> = Singleton::new();
   assert!(!slot.is_initialized());
   assert_eq!(slot.get(), None);
   assert_eq!(format!("{slot:?}"), "Singleton(<unconstructed>)");
}

#[test]
fn test_instance_is_shared() {
   let slot: Singleton<Config> = Singleton::new();
   let calls = AtomicUsize::new(0);
   let make = || {
      calls.fetch_add(1, Ordering::SeqCst);
      Config {
         name: "main".to_string(),
         workers: 4,
      }
   };

   let first = slot.instance(make);
   let second = slot.instance(make);
   assert!(std::ptr::eq(first, second));
   assert_eq!(calls.load(Ordering::SeqCst), 1);
   assert_eq!(slot.get().map(|config| config.workers), Some(4));
}

#[test]
fn test_later_arguments_are_dropped() {
   let slot: Singleton<Config> = Singleton::new();
   let build = |(name, workers): (&str, usize)| Config {
      name: name.to_string(),
      workers,
   };

   let first = slot.instance_with(("first", 1), build);
   let second = slot.instance_with(("second", 2), build);
   assert!(std::ptr::eq(first, second));
   assert_eq!(
      second,
      &Config {
         name: "first".to_string(),
         workers: 1,
      }
   );
}

#[test]
fn test_dropped_arguments_are_released() {
   let slot: Singleton<usize> = Singleton::new();
   let token = Arc::new(());

   slot.instance_with(Arc::clone(&token), |held| Arc::strong_count(&held));
   assert_eq!(Arc::strong_count(&token), 1);

   slot.instance_with(Arc::clone(&token), |_| unreachable!());
   assert_eq!(Arc::strong_count(&token), 1);
   assert_eq!(slot.get(), Some(&2));
}

#[test]
fn test_try_instance_retries_after_error() {
   let slot: Singleton<u32> = Singleton::new();

   assert_eq!(slot.try_instance(|| Err::<u32, _>("unavailable")), Err("unavailable"));
   assert!(!slot.is_initialized());

   assert_eq!(slot.try_instance(|| Ok::<_, &str>(7)), Ok(&7));
   assert_eq!(slot.try_instance(|| Err::<u32, _>("ignored")), Ok(&7));
}

#[test]
fn test_panicking_init_can_be_retried() {
   let slot: Singleton<u32> = Singleton::new();

   let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
      slot.instance(|| panic!("init failed"));
   }));
   assert!(result.is_err());
   assert!(!slot.is_initialized());

   assert_eq!(slot.instance(|| 11), &11);
}

#[test]
fn test_concurrent_first_access_constructs_once() {
   let slot = Arc::new(Singleton::<usize>::new());
   let calls = Arc::new(AtomicUsize::new(0));
   let barrier = Arc::new(Barrier::new(8));

   let handles: Vec<_> = (0..8)
      .map(|i| {
         let slot = Arc::clone(&slot);
         let calls = Arc::clone(&calls);
         let barrier = Arc::clone(&barrier);
         thread::spawn(move || {
            barrier.wait();
            let instance = slot.instance(|| {
               calls.fetch_add(1, Ordering::SeqCst);
               thread::sleep(Duration::from_millis(20));
               i
            });
            instance as *const usize as usize
         })
      })
      .collect();

   let addresses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
   assert_eq!(calls.load(Ordering::SeqCst), 1);
   assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_waiters_take_over_after_failed_init() {
   let slot = Arc::new(Singleton::<u32>::new());
   let attempts = Arc::new(AtomicUsize::new(0));

   let handles: Vec<_> = (0..4)
      .map(|_| {
         let slot = Arc::clone(&slot);
         let attempts = Arc::clone(&attempts);
         thread::spawn(move || {
            slot
               .try_instance(|| {
                  thread::sleep(Duration::from_millis(10));
                  if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                     Err("first attempt fails")
                  } else {
                     Ok(5)
                  }
               })
               .copied()
         })
      })
      .collect();

   let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
   assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
   assert_eq!(results.iter().filter(|r| **r == Ok(5)).count(), 3);
   assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

struct Database {
   url: &'static str,
}

impl SingletonType for Database {
   fn slot() -> &'static Singleton<Self> {
      static SLOT: Singleton<Database> = Singleton::new();
      &SLOT
   }

   fn create() -> Self {
      Database {
         url: "postgres://localhost",
      }
   }
}

#[test]
fn test_trait_form_identity() {
   let first = Database::instance();
   let second = Database::instance();
   assert!(std::ptr::eq(first, second));
   assert_eq!(second.url, "postgres://localhost");
   assert!(Database::slot().is_initialized());
}

static CACHE_CREATIONS: AtomicUsize = AtomicUsize::new(0);

struct Cache {
   capacity: usize,
}

struct ScratchCache(Cache);

singleton!(Cache => {
   CACHE_CREATIONS.fetch_add(1, Ordering::SeqCst);
   Cache { capacity: 128 }
});

#[test]
fn test_macro_form_identity() {
   let first = Cache::instance();
   let second = Cache::instance();
   assert!(std::ptr::eq(first, second));
   assert_eq!(first.capacity, 128);
   assert_eq!(CACHE_CREATIONS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wrapper_type_is_not_a_singleton() {
   let a = ScratchCache(Cache { capacity: 1 });
   let b = ScratchCache(Cache { capacity: 1 });
   assert!(!std::ptr::eq(&a, &b));
   assert!(!std::ptr::eq(&a.0, Cache::instance()));
}

//! Process-wide single instances.
//!
//! [`Singleton<T>`] is a slot holding the one instance of `T`. The first
//! construction call builds the instance; every later call returns a
//! reference to that same instance. Concurrent first calls construct at most
//! once, the losers block until the winner is done.
//!
//! Types opt in either by implementing [`SingletonType`] by hand, or by
//! applying [`singleton!`](crate::singleton!) to an existing type:
//!
//! ```rust
//! use lazy_attrs::{singleton, SingletonType};
//!
//! pub struct Registry {
//!    pub name: &'static str,
//! }
//!
//! singleton!(Registry => Registry { name: "main" });
//!
//! assert!(std::ptr::eq(Registry::instance(), Registry::instance()));
//! ```
//!
//! Initialization runs exactly once per slot. Arguments handed to later
//! construction calls through [`Singleton::instance_with`] are dropped
//! without re-running any initialization on the existing instance.

use core::any::type_name;
use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;
use core::sync::atomic::Ordering;

use crate::state::InitState;

/// Slot for the single shared instance of `T`.
pub struct Singleton<T> {
   value: UnsafeCell<MaybeUninit<T>>,
   state: InitState,
}

impl<T> Singleton<T> {
   /// Creates an empty slot. Usable in `static` items.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         value: UnsafeCell::new(MaybeUninit::uninit()),
         state: InitState::new(),
      }
   }

   /// Whether the instance has been constructed. Never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.state.is_ready(Ordering::Acquire)
   }

   /// The instance, if it has been constructed. Never blocks.
   #[inline]
   pub fn get(&self) -> Option<&T> {
      if self.is_initialized() {
         // SAFETY: READY is only published after the value was written.
         Some(unsafe { self.get_unchecked() })
      } else {
         None
      }
   }

   /// Returns the instance, constructing it with `init` on the first call.
   ///
   /// If `init` panics the slot stays empty and a later call may retry.
   pub fn instance<F>(&self, init: F) -> &T
   where
      F: FnOnce() -> T,
   {
      if let Some(instance) = self.get() {
         return instance;
      }
      self.construct(init);
      // SAFETY: `construct` returns only once the slot is ready.
      unsafe { self.get_unchecked() }
   }

   /// Like [`instance`](Self::instance), with construction arguments.
   ///
   /// Only the call that actually constructs consumes `args`; on every other
   /// call they are dropped.
   pub fn instance_with<A, F>(&self, args: A, init: F) -> &T
   where
      F: FnOnce(A) -> T,
   {
      let mut args = Some(args);
      let instance = self.instance(|| match args.take() {
         Some(args) => init(args),
         None => unreachable!("construction arguments consumed twice"),
      });
      if args.is_some() {
         log::trace!(
            "singleton {} already constructed; dropping construction arguments",
            type_name::<T>()
         );
      }
      instance
   }

   /// Returns the instance, constructing it with the fallible `init` on the
   /// first call. On `Err` the slot stays empty.
   pub fn try_instance<F, E>(&self, init: F) -> Result<&T, E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      if let Some(instance) = self.get() {
         return Ok(instance);
      }
      self.try_construct(init)?;
      // SAFETY: `try_construct` returned `Ok`, so the slot is ready.
      Ok(unsafe { self.get_unchecked() })
   }

   /// # Safety
   ///
   /// The slot must be ready.
   #[inline]
   unsafe fn get_unchecked(&self) -> &T {
      debug_assert!(self.is_initialized(), "singleton read before construction");
      unsafe { (*self.value.get()).assume_init_ref() }
   }

   /// Writes the freshly built instance. Caller holds the construction guard.
   #[inline]
   fn publish(&self, value: T) {
      // SAFETY: the guard gives exclusive access to the empty slot.
      unsafe { (*self.value.get()).write(value) };
      log::debug!("constructed singleton {}", type_name::<T>());
   }

   #[cold]
   fn construct<F>(&self, init: F)
   where
      F: FnOnce() -> T,
   {
      let Some(guard) = self.state.claim() else {
         return;
      };
      self.publish(init());
      guard.commit();
   }

   #[cold]
   fn try_construct<F, E>(&self, init: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      let Some(guard) = self.state.claim() else {
         return Ok(());
      };
      // On `Err` the guard drops here and resets the slot.
      let value = init()?;
      self.publish(value);
      guard.commit();
      Ok(())
   }
}

// SAFETY: shared access hands out `&T` to any thread (needs `T: Sync`) and the
// instance may be built on one thread and dropped on another (needs `T: Send`).
unsafe impl<T: Send + Sync> Sync for Singleton<T> {}
// SAFETY: moving the slot moves the instance with it.
unsafe impl<T: Send> Send for Singleton<T> {}

impl<T> Default for Singleton<T> {
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T: fmt::Debug> fmt::Debug for Singleton<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("Singleton");
      match self.get() {
         Some(instance) => d.field(instance),
         None => d.field(&format_args!("<unconstructed>")),
      };
      d.finish()
   }
}

impl<T> Drop for Singleton<T> {
   fn drop(&mut self) {
      if self.is_initialized() {
         // SAFETY: the slot is ready and `&mut self` rules out other readers.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }
}

/// A type restricted to one process-wide instance.
///
/// Implement [`slot`](Self::slot) with a `static` [`Singleton`] and
/// [`create`](Self::create) with the construction logic, or let
/// [`singleton!`](crate::singleton!) write both.
pub trait SingletonType: Sized + Send + Sync + 'static {
   /// The slot holding the instance.
   fn slot() -> &'static Singleton<Self>;

   /// Builds the instance. Called at most once per process.
   fn create() -> Self;

   /// The shared instance, created on first use.
   fn instance() -> &'static Self {
      Self::slot().instance(Self::create)
   }
}

/// Makes an existing type a [`SingletonType`].
///
/// ```rust
/// use lazy_attrs::{singleton, SingletonType};
///
/// struct Clock(u64);
/// struct Counter(u32);
///
/// singleton! {
///    Clock => Clock(0),
///    Counter => Counter(7),
/// }
///
/// assert_eq!(Counter::instance().0, 7);
/// assert!(std::ptr::eq(Clock::instance(), Clock::instance()));
/// ```
#[macro_export]
macro_rules! singleton {
   ($($ty:ty => $init:expr),+ $(,)?) => {
      $(
         impl $crate::SingletonType for $ty {
            fn slot() -> &'static $crate::Singleton<Self> {
               static SLOT: $crate::Singleton<$ty> = $crate::Singleton::new();
               &SLOT
            }

            fn create() -> Self {
               $init
            }
         }
      )+
   };
}

//! Initialization state of a [`Singleton`](crate::Singleton) slot.
//!
//! One `AtomicU8` packs the whole state:
//! - bit 0 `READY`: the instance exists,
//! - bit 1 `BUSY`: some caller is constructing it,
//! - bit 2 `PARKED`: at least one caller sleeps waiting for `BUSY` to clear,
//! - bits 3-7: a generation counter bumped on every `READY`/reset transition,
//!   so parked callers see a changed word even if the flags come back equal.
//!
//! Sleeping goes through `parking_lot_core`, keyed on the atomic's address.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

#[repr(transparent)]
pub(crate) struct InitState(AtomicU8);

impl InitState {
   const READY: u8 = 1;
   const BUSY: u8 = 2;
   const PARKED: u8 = 4;
   const GEN_ONE: u8 = 8;
   const GEN_MASK: u8 = !(Self::READY | Self::BUSY | Self::PARKED);

   #[inline(always)]
   const fn bump_generation(word: u8) -> u8 {
      (word & Self::GEN_MASK).wrapping_add(Self::GEN_ONE) & Self::GEN_MASK
   }

   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(0))
   }

   #[inline]
   fn key(&self) -> usize {
      self.0.as_ptr() as usize
   }

   fn wake_all(&self) {
      // SAFETY: `key` is the same address `sleep_while` parks on, and neither
      // callback touches parking_lot state.
      unsafe {
         parking_lot_core::unpark_all(self.key(), DEFAULT_UNPARK_TOKEN);
      }
   }

   /// Parks the caller until the word differs from `observed`. Returns early
   /// on spurious wakeups; callers re-check in a loop.
   fn sleep_while(&self, observed: u8) {
      // SAFETY: see `wake_all`.
      unsafe {
         let _ = parking_lot_core::park(
            self.key(),
            || self.0.load(Ordering::Acquire) == observed,
            || {},
            |_, _| {},
            DEFAULT_PARK_TOKEN,
            None,
         );
      }
   }

   /// Stores `flags` under the next generation and wakes sleepers if any
   /// were registered.
   fn publish(&self, flags: u8) {
      let generation = Self::bump_generation(self.0.load(Ordering::Relaxed));
      let previous = self.0.swap(flags | generation, Ordering::Release);
      if previous & Self::PARKED != 0 {
         self.wake_all();
      }
   }

   #[inline]
   pub(crate) fn is_ready(&self, ordering: Ordering) -> bool {
      self.0.load(ordering) & Self::READY != 0
   }

   /// Claims the right to construct, sleeping while another caller holds it.
   ///
   /// Returns `None` once the slot is ready. A caller that finds the slot busy
   /// sets `PARKED` before sleeping so the holder knows to wake it.
   pub(crate) fn claim(&self) -> Option<InitGuard<'_>> {
      let mut word = self.0.load(Ordering::Acquire);
      loop {
         if word & Self::READY != 0 {
            return None;
         }
         if word & Self::BUSY == 0 {
            match self
               .0
               .compare_exchange_weak(word, word | Self::BUSY, Ordering::Acquire, Ordering::Acquire)
            {
               Ok(_) => return Some(InitGuard { state: self }),
               Err(current) => word = current,
            }
            continue;
         }
         if word & Self::PARKED == 0 {
            if let Err(current) = self.0.compare_exchange_weak(
               word,
               word | Self::PARKED,
               Ordering::Relaxed,
               Ordering::Acquire,
            ) {
               word = current;
               continue;
            }
            word |= Self::PARKED;
         }
         self.sleep_while(word);
         word = self.0.load(Ordering::Acquire);
      }
   }
}

/// Exclusive right to construct the instance.
///
/// [`commit`](Self::commit) marks the slot ready. Dropping the guard instead
/// (initializer failed or panicked) returns the slot to empty and wakes
/// sleepers so one of them can retry.
pub(crate) struct InitGuard<'a> {
   state: &'a InitState,
}

impl InitGuard<'_> {
   #[inline]
   pub(crate) fn commit(self) {
      self.state.publish(InitState::READY);
      mem::forget(self);
   }
}

impl Drop for InitGuard<'_> {
   fn drop(&mut self) {
      self.state.publish(0);
   }
}

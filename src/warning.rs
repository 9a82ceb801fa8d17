//! Non-fatal warnings raised while resolving properties.
//!
//! Every warning goes to the `log` facade at `warn` level under the
//! `lazy_attrs::warning` target. Code that needs to observe warnings directly,
//! tests in particular, can wrap the access in [`catch_warnings`].

use std::cell::RefCell;

/// A warning emitted on behalf of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
   /// Attribute whose resolution produced the warning.
   pub property: &'static str,
   pub message: &'static str,
}

thread_local! {
   static CAPTURES: RefCell<Vec<Vec<Warning>>> = const { RefCell::new(Vec::new()) };
}

/// Emits `message` for `property`.
pub(crate) fn warn(property: &'static str, message: &'static str) {
   log::warn!(target: "lazy_attrs::warning", "{property}: {message}");
   CAPTURES.with(|captures| {
      if let Some(frame) = captures.borrow_mut().last_mut() {
         frame.push(Warning { property, message });
      }
   });
}

/// Runs `f` and returns its result along with the warnings it emitted on the
/// current thread.
///
/// Captures nest; a warning is recorded by the innermost active capture only.
/// Warnings are still forwarded to the logger while captured.
pub fn catch_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<Warning>) {
   struct Frame;

   impl Drop for Frame {
      // Pops on unwind too, so a panicking `f` does not leave a stale frame.
      fn drop(&mut self) {
         CAPTURES.with(|captures| {
            captures.borrow_mut().pop();
         });
      }
   }

   CAPTURES.with(|captures| captures.borrow_mut().push(Vec::new()));
   let frame = Frame;
   let result = f();
   let caught = CAPTURES.with(|captures| {
      captures
         .borrow_mut()
         .last_mut()
         .map(std::mem::take)
         .unwrap_or_default()
   });
   drop(frame);
   (result, caught)
}

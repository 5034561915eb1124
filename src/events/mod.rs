//! Event handling module.
//!
//! This module contains the pieces between raw platform events and the
//! controller:
//! - Input: pointer, keyboard and host messages mapped to operations
//! - Debounce: quiet-period bookkeeping for viewport resizes
//! - Runtime: native single-task event loop (not built for wasm)

pub mod debounce;
pub mod input;
#[cfg(not(target_arch = "wasm32"))]
pub mod runtime;

pub use debounce::Debouncer;
pub use input::{Handler, InputEvent, Outcome, Target};

//! Presentation of navigation state.
//!
//! The controller never reads markup back. It projects state into a
//! [`Snapshot`], diffs it against the last one applied and hands the patches
//! to a [`Presenter`].

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod projection;

pub use projection::{ElementKey, ElementState, Patch, Snapshot};

use crate::state::NavigationState;

/// Applies markup patches produced by the controller.
///
pub trait Presenter {
    /// Apply one batch. A batch is one transition and must be applied as a
    /// whole.
    fn apply(&mut self, patches: &[Patch]);

    /// Scroll the content region back to its origin. Must be idempotent.
    fn scroll_content_to_top(&mut self);

    /// Observe the state after every reconciliation, before the host is
    /// notified.
    fn state_changed(&mut self, _state: &NavigationState) {}
}

/// Presenter for headless use.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply(&mut self, _patches: &[Patch]) {}

    fn scroll_content_to_top(&mut self) {}
}

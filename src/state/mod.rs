//! Navigation state module.
//!
//! This module contains the core state of the sidebar, including:
//! - The read-only navigation tree (`NavTree`, `NavGroup`, `NavItem`)
//! - The mutable `NavigationState` and its transitions
//! - State error handling

mod error;
mod navigation;
mod state_impl;

pub use error::StateError;
pub use navigation::{NavGroup, NavItem, NavTree, NavTreeBuilder};
pub use state_impl::NavigationState;

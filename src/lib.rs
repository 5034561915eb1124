//! Collapsible sidebar navigation for dashboard pages.
//!
//! The navigation state lives in [`state::NavigationState`] and is changed
//! only through [`Controller`], which projects it onto the markup and keeps
//! the host's notion of the current page in sync. In the browser,
//! `SidebarNav` binds a controller to the page; natively the controller can
//! be driven through [`events::runtime::EventLoop`].

#![forbid(unsafe_code)]

#[cfg(target_arch = "wasm32")]
mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod logger;
pub mod state;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub use app::SidebarNav;
pub use config::SidebarConfig;
pub use controller::Controller;
pub use error::{AppError, AppResult};

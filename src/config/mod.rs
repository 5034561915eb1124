//! Configuration management module.
//!
//! This module handles loading and validating the sidebar configuration:
//! responsive breakpoint, resize debounce, host channel names, the class
//! names used to find markup and the state classes written back to it.
//! Configuration is read from YAML (and therefore JSON) text embedded by the
//! host page; every field is optional.

mod error;
pub mod hotkeys;

pub use error::ConfigError;
pub use hotkeys::{HotkeyAction, KeyBindings};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEFAULT_BREAKPOINT_PX: u32 = 1024;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Oversees the sidebar configuration.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Viewports narrower than this are treated as mobile
    pub breakpoint_px: u32,
    pub resize_debounce_ms: u64,
    /// Deep-link page used when the host has not pushed one
    pub initial_page: Option<String>,
    pub log_level: String,
    pub smooth_scroll: bool,
    pub host: HostConfig,
    pub markup: MarkupConfig,
    pub classes: StateClasses,
    pub keys: KeyBindings,
}

/// Names of the host input and message used for selection sync.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub input_name: String,
    pub message_name: String,
}

/// Class names that identify the navigation markup.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    pub sidebar: String,
    pub overlay: String,
    pub toggle: String,
    pub content: String,
    pub group: String,
    pub group_header: String,
    pub group_children: String,
    pub item: String,
    pub single_item: String,
    /// Data attribute carrying the page id, without the `data-` prefix
    pub page_attribute: String,
}

/// State classes written back to the markup.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateClasses {
    pub expanded: String,
    pub active: String,
    pub panel_open: String,
    pub overlay_active: String,
    pub body_open: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        SidebarConfig {
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            initial_page: None,
            log_level: "info".to_string(),
            smooth_scroll: true,
            host: HostConfig::default(),
            markup: MarkupConfig::default(),
            classes: StateClasses::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            input_name: "sidebar_page".to_string(),
            message_name: "set_active_page".to_string(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        MarkupConfig {
            sidebar: "sidebar".to_string(),
            overlay: "sidebar-overlay".to_string(),
            toggle: "sidebar-toggle".to_string(),
            content: "main-content".to_string(),
            group: "nav-group".to_string(),
            group_header: "nav-group-header".to_string(),
            group_children: "nav-group-children".to_string(),
            item: "nav-item".to_string(),
            single_item: "nav-item-single".to_string(),
            page_attribute: "page".to_string(),
        }
    }
}

impl Default for StateClasses {
    fn default() -> Self {
        StateClasses {
            expanded: "expanded".to_string(),
            active: "active".to_string(),
            panel_open: "open".to_string(),
            overlay_active: "active".to_string(),
            body_open: "sidebar-open".to_string(),
        }
    }
}

impl MarkupConfig {
    /// Return a class selector for one of the markup class names.
    ///
    pub fn selector(class: &str) -> String {
        format!(".{}", class)
    }

    /// Selector matching both grouped and top-level leaf items.
    ///
    pub fn item_selector(&self) -> String {
        format!(
            "{}, {}",
            Self::selector(&self.item),
            Self::selector(&self.single_item)
        )
    }

    pub fn page_data_attribute(&self) -> String {
        format!("data-{}", self.page_attribute)
    }
}

impl SidebarConfig {
    /// Parse and validate configuration text. Empty text yields the defaults.
    ///
    pub fn from_yaml(source: &str) -> Result<SidebarConfig, ConfigError> {
        if source.trim().is_empty() {
            return Ok(SidebarConfig::default());
        }
        let config: SidebarConfig =
            serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the browser would otherwise reject at runtime.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoint_px == 0 {
            return Err(ConfigError::InvalidBreakpoint(self.breakpoint_px));
        }
        self.level_filter()?;

        let m = &self.markup;
        let c = &self.classes;
        let names: [(&'static str, &str); 15] = [
            ("markup.sidebar", m.sidebar.as_str()),
            ("markup.overlay", m.overlay.as_str()),
            ("markup.toggle", m.toggle.as_str()),
            ("markup.content", m.content.as_str()),
            ("markup.group", m.group.as_str()),
            ("markup.group_header", m.group_header.as_str()),
            ("markup.group_children", m.group_children.as_str()),
            ("markup.item", m.item.as_str()),
            ("markup.single_item", m.single_item.as_str()),
            ("markup.page_attribute", m.page_attribute.as_str()),
            ("classes.expanded", c.expanded.as_str()),
            ("classes.active", c.active.as_str()),
            ("classes.panel_open", c.panel_open.as_str()),
            ("classes.overlay_active", c.overlay_active.as_str()),
            ("classes.body_open", c.body_open.as_str()),
        ];
        for (field, value) in names {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidClassName {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Whether the width counts as a narrow (mobile) viewport.
    ///
    pub fn is_narrow(&self, width: u32) -> bool {
        width < self.breakpoint_px
    }
}

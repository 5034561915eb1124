//! Hotkey configuration management.
//!
//! This module defines the keyboard bindings for the sidebar: which keys
//! activate a focused navigation element and which keys dismiss the mobile
//! panel. Keys are named the way `KeyboardEvent.key` reports them, with
//! `Space` and `Esc` accepted as aliases.

use super::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Represents all possible actions that can be bound to hotkeys.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    /// Same as a pointer click on the focused group header or item
    Activate,
    /// Close the mobile panel when it is open
    Dismiss,
}

/// Modifier keys held during a key press.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A key press as reported by the platform.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        KeyPress {
            key: key.to_string(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(key: &str, modifiers: Modifiers) -> Self {
        KeyPress {
            key: key.to_string(),
            modifiers,
        }
    }
}

/// Represents a key combination (key name + required modifiers).
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub fn key(key: &str) -> Self {
        Hotkey {
            key: key.to_string(),
            modifiers: Modifiers::default(),
        }
    }
}

fn canonical_key(name: &str) -> String {
    match name {
        "Space" | "Spacebar" => " ".to_string(),
        "Esc" => "Escape".to_string(),
        other => other.to_string(),
    }
}

impl FromStr for Hotkey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidHotkey(s.to_string());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(invalid)?;

        let mut modifiers = Modifiers::default();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => return Err(invalid()),
            }
        }

        Ok(Hotkey {
            key: canonical_key(key),
            modifiers,
        })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hotkey(self))
    }
}

/// Custom serialization for Hotkey.
///
impl Serialize for Hotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hotkey(self))
    }
}

/// Custom deserialization for Hotkey.
///
impl<'de> Deserialize<'de> for Hotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Maps hotkey actions to the keys bound to them.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_activate")]
    pub activate: Vec<Hotkey>,
    #[serde(default = "default_dismiss")]
    pub dismiss: Vec<Hotkey>,
}

fn default_activate() -> Vec<Hotkey> {
    vec![Hotkey::key("Enter"), Hotkey::key(" ")]
}

fn default_dismiss() -> Vec<Hotkey> {
    vec![Hotkey::key("Escape")]
}

impl Default for KeyBindings {
    fn default() -> Self {
        default_hotkeys()
    }
}

/// Returns the default bindings: Enter/Space activate, Escape dismisses.
///
pub fn default_hotkeys() -> KeyBindings {
    KeyBindings {
        activate: default_activate(),
        dismiss: default_dismiss(),
    }
}

/// Check whether a key press matches a hotkey. Ctrl, Alt and Meta must match
/// exactly; Shift is only checked when the hotkey requires it.
///
pub fn matches_hotkey(press: &KeyPress, hotkey: &Hotkey) -> bool {
    let held = press.modifiers;
    let wanted = hotkey.modifiers;
    press.key == hotkey.key
        && held.ctrl == wanted.ctrl
        && held.alt == wanted.alt
        && held.meta == wanted.meta
        && (!wanted.shift || held.shift)
}

/// Return the action bound to the key press, if any. Dismiss wins when a key
/// is bound to both.
///
pub fn get_action_for_event(press: &KeyPress, bindings: &KeyBindings) -> Option<HotkeyAction> {
    if bindings.dismiss.iter().any(|h| matches_hotkey(press, h)) {
        Some(HotkeyAction::Dismiss)
    } else if bindings.activate.iter().any(|h| matches_hotkey(press, h)) {
        Some(HotkeyAction::Activate)
    } else {
        None
    }
}

/// Format a hotkey for display and serialization, e.g. `Ctrl+Space`.
///
pub fn format_hotkey(hotkey: &Hotkey) -> String {
    let mut parts = vec![];
    if hotkey.modifiers.ctrl {
        parts.push("Ctrl");
    }
    if hotkey.modifiers.alt {
        parts.push("Alt");
    }
    if hotkey.modifiers.shift {
        parts.push("Shift");
    }
    if hotkey.modifiers.meta {
        parts.push("Meta");
    }

    let key_str = if hotkey.key == " " {
        "Space"
    } else {
        hotkey.key.as_str()
    };

    if parts.is_empty() {
        key_str.to_string()
    } else {
        format!("{}+{}", parts.join("+"), key_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_hotkey() {
        let hotkey = Hotkey::key("Enter");
        assert!(matches_hotkey(&KeyPress::new("Enter"), &hotkey));
        assert!(!matches_hotkey(&KeyPress::new("Tab"), &hotkey));

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert!(!matches_hotkey(
            &KeyPress::with_modifiers("Enter", ctrl),
            &hotkey
        ));
    }

    #[test]
    fn test_shift_is_optional_unless_required() {
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(matches_hotkey(
            &KeyPress::with_modifiers(" ", shift),
            &Hotkey::key(" ")
        ));

        let required: Hotkey = "Shift+Enter".parse().unwrap();
        assert!(!matches_hotkey(&KeyPress::new("Enter"), &required));
        assert!(matches_hotkey(
            &KeyPress::with_modifiers("Enter", shift),
            &required
        ));
    }

    #[test]
    fn test_get_action_for_event() {
        let bindings = default_hotkeys();
        assert_eq!(
            get_action_for_event(&KeyPress::new("Enter"), &bindings),
            Some(HotkeyAction::Activate)
        );
        assert_eq!(
            get_action_for_event(&KeyPress::new(" "), &bindings),
            Some(HotkeyAction::Activate)
        );
        assert_eq!(
            get_action_for_event(&KeyPress::new("Escape"), &bindings),
            Some(HotkeyAction::Dismiss)
        );
        assert_eq!(get_action_for_event(&KeyPress::new("a"), &bindings), None);
    }

    #[test]
    fn test_parse_hotkey() {
        let hotkey: Hotkey = "Ctrl+Alt+Space".parse().unwrap();
        assert_eq!(hotkey.key, " ");
        assert!(hotkey.modifiers.ctrl);
        assert!(hotkey.modifiers.alt);
        assert!(!hotkey.modifiers.meta);

        assert_eq!("Esc".parse::<Hotkey>().unwrap(), Hotkey::key("Escape"));
        assert!("Hyper+x".parse::<Hotkey>().is_err());
        assert!("Ctrl+".parse::<Hotkey>().is_err());
        assert!("".parse::<Hotkey>().is_err());
    }

    #[test]
    fn test_format_hotkey() {
        assert_eq!(format_hotkey(&Hotkey::key(" ")), "Space");
        let hotkey: Hotkey = "meta+shift+k".parse().unwrap();
        assert_eq!(hotkey.to_string(), "Shift+Meta+k");
    }

    #[test]
    fn test_hotkey_serialization() {
        let bindings = default_hotkeys();
        let serialized = serde_yaml::to_string(&bindings).unwrap();
        assert!(serialized.contains("Space"));
        let deserialized: KeyBindings = serde_yaml::from_str(&serialized).unwrap();
        assert_eq!(bindings, deserialized);
    }

    #[test]
    fn test_partial_bindings_use_defaults() {
        let bindings: KeyBindings = serde_yaml::from_str("activate: [Enter]").unwrap();
        assert_eq!(bindings.activate, vec![Hotkey::key("Enter")]);
        assert_eq!(bindings.dismiss, vec![Hotkey::key("Escape")]);
    }
}

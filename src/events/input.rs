//! Input event handling.
//!
//! Translates pointer clicks, key presses and host messages into controller
//! operations. Keyboard activation of a navigation element goes through the
//! same click path as the pointer.

use crate::config::hotkeys::{get_action_for_event, HotkeyAction, KeyPress};
use crate::config::KeyBindings;
use crate::controller::Controller;
use crate::host::HostBridge;
use crate::ui::Presenter;
use log::*;

/// Element an input event was aimed at.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    GroupHeader(String),
    Item(String),
    ToggleButton,
    Overlay,
}

impl Target {
    /// Group headers and leaf items; the elements keyboard activation applies to.
    ///
    pub fn is_nav_element(&self) -> bool {
        matches!(self, Target::GroupHeader(_) | Target::Item(_))
    }
}

/// Specify the different input event types.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Click(Target),
    Key {
        press: KeyPress,
        target: Option<Target>,
    },
    HostActivate(String),
}

/// Result of handling one event.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the event mapped to a controller operation
    pub handled: bool,
    /// Whether the platform default action should be suppressed
    pub prevent_default: bool,
}

impl Outcome {
    fn ignored() -> Self {
        Outcome::default()
    }

    fn handled(prevent_default: bool) -> Self {
        Outcome {
            handled: true,
            prevent_default,
        }
    }

    fn handled_if(handled: bool, prevent_default: bool) -> Self {
        if handled {
            Outcome::handled(prevent_default)
        } else {
            Outcome::ignored()
        }
    }
}

/// Maps input events onto controller operations.
///
#[derive(Debug, Clone, Default)]
pub struct Handler {
    bindings: KeyBindings,
}

impl Handler {
    pub fn new(bindings: KeyBindings) -> Self {
        Handler { bindings }
    }

    /// Handle one event against the controller.
    ///
    pub fn handle<H: HostBridge, P: Presenter>(
        &self,
        controller: &mut Controller<H, P>,
        event: InputEvent,
    ) -> Outcome {
        match event {
            InputEvent::Click(target) => click(controller, &target),
            InputEvent::Key { press, target } => {
                match get_action_for_event(&press, &self.bindings) {
                    Some(HotkeyAction::Dismiss) => {
                        if controller.close_panel() {
                            debug!("Processing dismiss key '{}'...", press.key);
                            Outcome::handled(false)
                        } else {
                            Outcome::ignored()
                        }
                    }
                    Some(HotkeyAction::Activate) => match target {
                        Some(target) if target.is_nav_element() => {
                            debug!("Processing activation key '{}' on {:?}...", press.key, target);
                            click(controller, &target)
                        }
                        _ => Outcome::ignored(),
                    },
                    None => Outcome::ignored(),
                }
            }
            InputEvent::HostActivate(page_id) => {
                Outcome::handled_if(controller.activate_page(&page_id), false)
            }
        }
    }
}

/// Pointer click on a target. Navigation elements always suppress the
/// default action, even when their id is stale.
///
fn click<H: HostBridge, P: Presenter>(controller: &mut Controller<H, P>, target: &Target) -> Outcome {
    match target {
        Target::GroupHeader(group_id) => Outcome {
            handled: controller.toggle_group(group_id),
            prevent_default: true,
        },
        Target::Item(page_id) => Outcome {
            handled: controller.select_item(page_id),
            prevent_default: true,
        },
        Target::ToggleButton => {
            controller.toggle_panel();
            Outcome::handled(false)
        }
        Target::Overlay => Outcome::handled_if(controller.close_panel(), false),
    }
}

//! Host application channel.
//!
//! The host renders page content and exchanges selection messages with the
//! sidebar. Outbound notifications are fire-and-forget; inbound "activate
//! page" messages are delivered to a handler registered through
//! [`HostBridge::on_activate_page`].

#[cfg(target_arch = "wasm32")]
pub mod js;

use serde::{Deserialize, Serialize};

/// Handler invoked with the page id of an inbound activation message.
pub type ActivateHandler = Box<dyn Fn(String)>;

/// Payload of the outbound selection event.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionNotice {
    pub page_id: String,
}

impl SelectionNotice {
    pub fn new(page_id: &str) -> Self {
        SelectionNotice {
            page_id: page_id.to_string(),
        }
    }
}

/// Errors raised while talking to the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No host is attached to the page
    #[error("No host attached")]
    Detached,

    /// Host object lacks the expected function
    #[error("Host function missing: {0}")]
    MissingFunction(String),

    /// Host function threw
    #[error("Host call failed: {0}")]
    CallFailed(String),

    /// Payload could not be encoded
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Capabilities the controller needs from the host.
///
pub trait HostBridge {
    /// Whether a host is present to receive notifications.
    fn is_attached(&self) -> bool;

    /// Send the outbound selection event. Called at most once per user
    /// selection and never retried.
    fn notify_selection(&self, notice: &SelectionNotice) -> Result<(), HostError>;

    /// Subscribe to inbound "activate page" messages.
    fn on_activate_page(&self, handler: ActivateHandler) -> Result<(), HostError>;
}

/// Bridge used when the page has no host.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl HostBridge for Detached {
    fn is_attached(&self) -> bool {
        false
    }

    fn notify_selection(&self, _notice: &SelectionNotice) -> Result<(), HostError> {
        Err(HostError::Detached)
    }

    fn on_activate_page(&self, _handler: ActivateHandler) -> Result<(), HostError> {
        Err(HostError::Detached)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_serializes_as_page_id() {
        let json = serde_json::to_string(&SelectionNotice::new("power")).unwrap();
        assert_eq!(json, r#"{"pageId":"power"}"#);
    }

    #[test]
    fn detached_host() {
        let host = Detached;
        assert!(!host.is_attached());
        assert!(matches!(
            host.notify_selection(&SelectionNotice::new("x")),
            Err(HostError::Detached)
        ));
        assert!(host.on_activate_page(Box::new(|_| {})).is_err());
    }

    #[test]
    fn host_error_display() {
        assert!(HostError::MissingFunction("setInputValue".into())
            .to_string()
            .contains("setInputValue"));
        assert!(HostError::CallFailed("boom".into())
            .to_string()
            .contains("boom"));
    }
}

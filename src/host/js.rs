//! Browser host bridge.
//!
//! Talks to a Shiny host when `window.Shiny` exists: selections go out via
//! `Shiny.setInputValue(<input>, pageId, {priority: "event"})` and activations
//! come in through `Shiny.addCustomMessageHandler(<message>, ...)`. A plain JS
//! callback can be installed instead; it receives `{pageId}`.

use super::{ActivateHandler, HostBridge, HostError, SelectionNotice};
use crate::config::HostConfig;
use crate::ui::dom::js_text;
use js_sys::{Function, Object, Reflect};
use log::*;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Host bridge for the browser.
///
pub struct JsHost {
    input_name: String,
    message_name: String,
    callback: RefCell<Option<Function>>,
}

impl JsHost {
    pub fn new(config: &HostConfig) -> Self {
        JsHost {
            input_name: config.input_name.clone(),
            message_name: config.message_name.clone(),
            callback: RefCell::new(None),
        }
    }

    /// Install or clear the outbound callback. While set it takes precedence
    /// over Shiny.
    ///
    pub fn set_callback(&self, callback: Option<Function>) {
        *self.callback.borrow_mut() = callback;
    }

    fn shiny() -> Option<JsValue> {
        let shiny = Reflect::get(&js_sys::global(), &JsValue::from_str("Shiny")).ok()?;
        if shiny.is_undefined() || shiny.is_null() {
            None
        } else {
            Some(shiny)
        }
    }

    fn method(shiny: &JsValue, name: &str) -> Result<Function, HostError> {
        Reflect::get(shiny, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| HostError::MissingFunction(name.to_string()))
    }

    fn notify_callback(&self, callback: &Function, notice: &SelectionNotice) -> Result<(), HostError> {
        let payload = serde_json::to_string(notice)?;
        let value = js_sys::JSON::parse(&payload).map_err(|e| HostError::CallFailed(js_text(&e)))?;
        callback
            .call1(&JsValue::NULL, &value)
            .map_err(|e| HostError::CallFailed(js_text(&e)))?;
        Ok(())
    }

    fn notify_shiny(&self, notice: &SelectionNotice) -> Result<(), HostError> {
        let shiny = Self::shiny().ok_or(HostError::Detached)?;
        let set_input = Self::method(&shiny, "setInputValue")?;
        let options = Object::new();
        Reflect::set(
            &options,
            &JsValue::from_str("priority"),
            &JsValue::from_str("event"),
        )
        .map_err(|e| HostError::CallFailed(js_text(&e)))?;
        set_input
            .call3(
                &shiny,
                &JsValue::from_str(&self.input_name),
                &JsValue::from_str(&notice.page_id),
                &options,
            )
            .map_err(|e| HostError::CallFailed(js_text(&e)))?;
        Ok(())
    }
}

/// Extract the page id from an inbound message: a bare string, a number,
/// or an object carrying `pageId`.
///
fn page_id_from(message: &JsValue) -> Option<String> {
    if let Some(page_id) = message.as_string() {
        return Some(page_id);
    }
    if let Some(number) = message.as_f64() {
        return Some(number.to_string());
    }
    if message.is_object() {
        return Reflect::get(message, &JsValue::from_str("pageId"))
            .ok()
            .and_then(|v| v.as_string());
    }
    None
}

impl HostBridge for JsHost {
    fn is_attached(&self) -> bool {
        self.callback.borrow().is_some() || Self::shiny().is_some()
    }

    fn notify_selection(&self, notice: &SelectionNotice) -> Result<(), HostError> {
        if let Some(callback) = self.callback.borrow().as_ref() {
            return self.notify_callback(callback, notice);
        }
        self.notify_shiny(notice)
    }

    fn on_activate_page(&self, handler: ActivateHandler) -> Result<(), HostError> {
        let shiny = Self::shiny().ok_or(HostError::Detached)?;
        let add_handler = Self::method(&shiny, "addCustomMessageHandler")?;
        let closure = Closure::<dyn Fn(JsValue)>::new(move |message: JsValue| {
            match page_id_from(&message) {
                Some(page_id) => handler(page_id),
                None => debug!("Ignoring activation message without a page id"),
            }
        });
        add_handler
            .call2(
                &shiny,
                &JsValue::from_str(&self.message_name),
                closure.as_ref().unchecked_ref(),
            )
            .map_err(|e| HostError::CallFailed(js_text(&e)))?;
        // Shiny cannot unregister message handlers; the handler lives as long as the page
        closure.forget();
        debug!("Subscribed to host message '{}'", self.message_name);
        Ok(())
    }
}

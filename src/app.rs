//! Browser entry point.
//!
//! `new SidebarNav(config?)` scans the page, wires the DOM listeners and the
//! host channel and returns a handle exposing the host-facing operations.
//! Every listener shares one controller; a listener that finds it busy
//! (a host callback re-entering during a notification) drops its event.

use crate::config::hotkeys::{KeyPress, Modifiers};
use crate::config::SidebarConfig;
use crate::controller::Controller;
use crate::events::{Debouncer, Handler, InputEvent};
use crate::host::js::JsHost;
use crate::host::HostBridge;
use crate::logger;
use crate::ui::dom::{self, js_text, DomPresenter, StateMirror, TargetIndex};
use anyhow::{anyhow, Context, Result};
use js_sys::Function;
use log::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, Window};

type NavController = Controller<JsHost, DomPresenter>;
type SharedController = Rc<RefCell<NavController>>;

/// Event listener removed from its target on drop.
///
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Listener> {
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("Failed to listen for {}: {}", kind, js_text(&e)))?;
        Ok(Listener {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Pending resize timer, shared with the resize listener.
///
#[derive(Clone)]
struct ResizeTimer {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
}

impl ResizeTimer {
    fn restart(&self, callback: &Function, timeout_ms: u64) {
        self.cancel();
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, timeout_ms as i32)
        {
            Ok(handle) => self.handle.set(Some(handle)),
            Err(e) => warn!("Failed to schedule resize settle: {}", js_text(&e)),
        }
    }

    fn cancel(&self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Sidebar navigation bound to the current page.
///
#[wasm_bindgen]
pub struct SidebarNav {
    controller: SharedController,
    mirror: Rc<StateMirror>,
    resize_timer: ResizeTimer,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SidebarNav {
    /// Bind to the page. `config` is optional YAML or JSON text.
    ///
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<SidebarNav, JsValue> {
        start(config.as_deref().unwrap_or(""))
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    /// Host-driven activation. Does not notify the host.
    ///
    #[wasm_bindgen(js_name = activatePage)]
    pub fn activate_page(&self, page_id: &str) -> bool {
        with_controller(&self.controller, |c| c.activate_page(page_id)).unwrap_or(false)
    }

    /// Select a page as if the user clicked it.
    ///
    #[wasm_bindgen(js_name = selectItem)]
    pub fn select_item(&self, page_id: &str) -> bool {
        with_controller(&self.controller, |c| c.select_item(page_id)).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = toggleGroup)]
    pub fn toggle_group(&self, group_id: &str) -> bool {
        with_controller(&self.controller, |c| c.toggle_group(group_id)).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = togglePanel)]
    pub fn toggle_panel(&self) -> bool {
        with_controller(&self.controller, |c| c.toggle_panel()).unwrap_or(false)
    }

    /// Route selections to `callback({pageId})` instead of Shiny. Pass
    /// nothing to clear it.
    ///
    #[wasm_bindgen(js_name = setHostCallback)]
    pub fn set_host_callback(&self, callback: Option<Function>) {
        match self.controller.try_borrow() {
            Ok(controller) => controller.host().set_callback(callback),
            Err(_) => warn!("Controller busy; host callback not changed"),
        }
    }

    #[wasm_bindgen(getter, js_name = activePage)]
    pub fn active_page(&self) -> Option<String> {
        self.mirror.active_page()
    }

    #[wasm_bindgen(getter, js_name = panelOpen)]
    pub fn panel_open(&self) -> bool {
        self.mirror.panel_open()
    }
}

impl Drop for SidebarNav {
    fn drop(&mut self) {
        self.resize_timer.cancel();
    }
}

fn with_controller<T>(
    controller: &SharedController,
    f: impl FnOnce(&mut NavController) -> T,
) -> Option<T> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut *controller)),
        Err(_) => {
            warn!("Controller busy; re-entrant request dropped");
            None
        }
    }
}

fn viewport_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .map(|width| width.max(0.0) as u32)
        .unwrap_or(0)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_into::<Element>().ok())
}

/// Run one input event with the viewport width refreshed first.
///
fn dispatch(
    controller: &Weak<RefCell<NavController>>,
    handler: &Handler,
    window: &Window,
    input: InputEvent,
    event: &Event,
) {
    let controller = match controller.upgrade() {
        Some(controller) => controller,
        None => return,
    };
    let outcome = with_controller(&controller, |c| {
        c.set_viewport_width(viewport_width(window));
        handler.handle(c, input)
    });
    if outcome.map_or(false, |o| o.prevent_default) {
        event.prevent_default();
    }
}

fn start(source: &str) -> Result<SidebarNav> {
    let config = SidebarConfig::from_yaml(source).context("Invalid sidebar configuration")?;
    if let Err(e) = logger::init(config.level_filter()?, logger::console_sink()) {
        debug!("Keeping existing logger: {}", e);
    }

    let window = web_sys::window().ok_or_else(|| anyhow!("No global window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("Window has no document"))?;

    let chrome = dom::ensure_chrome(&document, &config.markup)?;
    let scan = dom::scan(&document, &config)?;
    let content = document
        .query_selector(&crate::config::MarkupConfig::selector(&config.markup.content))
        .ok()
        .flatten();
    if content.is_none() {
        debug!("No .{} element; selections will not scroll", config.markup.content);
    }

    let initial_page = scan
        .tree
        .first_known([config.initial_page.as_deref(), scan.marked_active.as_deref()])
        .map(str::to_string);
    let presenter = DomPresenter::new(scan.elements, &chrome, content, config.smooth_scroll);
    let mirror = presenter.mirror();
    let host = JsHost::new(&config.host);
    let handler = Rc::new(Handler::new(config.keys.clone()));
    let targets = Rc::new(scan.targets);
    let quiet_ms = config.resize_debounce_ms;

    let controller: SharedController = Rc::new(RefCell::new(Controller::new(
        scan.tree,
        config,
        host,
        presenter,
        viewport_width(&window),
        initial_page.as_deref(),
    )));

    subscribe_host(&controller);

    let resize_timer = ResizeTimer {
        window: window.clone(),
        handle: Rc::new(Cell::new(None)),
    };
    let listeners = vec![
        Listener::attach(
            &document,
            "click",
            click_listener(&controller, &handler, &targets, &window),
        )?,
        Listener::attach(
            &document,
            "keydown",
            key_listener(&controller, &handler, &targets, &window),
        )?,
        Listener::attach(
            &window,
            "resize",
            resize_listener(&controller, &resize_timer, quiet_ms),
        )?,
    ];

    info!(
        "Sidebar navigation ready, active page {:?}",
        mirror.active_page()
    );
    Ok(SidebarNav {
        controller,
        mirror,
        resize_timer,
        _listeners: listeners,
    })
}

fn subscribe_host(controller: &SharedController) {
    let target = Rc::downgrade(controller);
    let subscribed = controller.borrow().host().on_activate_page(Box::new(move |page_id| {
        if let Some(controller) = target.upgrade() {
            with_controller(&controller, |c| c.activate_page(&page_id));
        }
    }));
    if let Err(e) = subscribed {
        info!("Host activations unavailable ({}); use activatePage instead", e);
    }
}

fn click_listener(
    controller: &SharedController,
    handler: &Rc<Handler>,
    targets: &Rc<TargetIndex>,
    window: &Window,
) -> Closure<dyn FnMut(Event)> {
    let controller = Rc::downgrade(controller);
    let handler = Rc::clone(handler);
    let targets = Rc::clone(targets);
    let window = window.clone();
    Closure::new(move |event: Event| {
        if let Some(target) = event_element(&event).and_then(|el| targets.resolve(&el)) {
            dispatch(&controller, &handler, &window, InputEvent::Click(target), &event);
        }
    })
}

fn key_listener(
    controller: &SharedController,
    handler: &Rc<Handler>,
    targets: &Rc<TargetIndex>,
    window: &Window,
) -> Closure<dyn FnMut(Event)> {
    let controller = Rc::downgrade(controller);
    let handler = Rc::clone(handler);
    let targets = Rc::clone(targets);
    let window = window.clone();
    Closure::new(move |event: Event| {
        let key_event = match event.dyn_ref::<KeyboardEvent>() {
            Some(key_event) => key_event,
            None => return,
        };
        let press = KeyPress::with_modifiers(
            &key_event.key(),
            Modifiers {
                ctrl: key_event.ctrl_key(),
                alt: key_event.alt_key(),
                shift: key_event.shift_key(),
                meta: key_event.meta_key(),
            },
        );
        let target = event_element(&event).and_then(|el| targets.resolve(&el));
        dispatch(
            &controller,
            &handler,
            &window,
            InputEvent::Key { press, target },
            &event,
        );
    })
}

fn resize_listener(
    controller: &SharedController,
    timer: &ResizeTimer,
    quiet_ms: u64,
) -> Closure<dyn FnMut(Event)> {
    let debouncer = Rc::new(RefCell::new(Debouncer::<u32>::new(quiet_ms)));
    let settle = {
        let controller = Rc::downgrade(controller);
        let debouncer = Rc::clone(&debouncer);
        let timer = timer.clone();
        Closure::<dyn FnMut()>::new(move || {
            timer.handle.set(None);
            // The timer is the deadline; firing at it avoids clock skew stranding the value
            let settled = {
                let mut debouncer = debouncer.borrow_mut();
                let due = debouncer.deadline();
                due.and_then(|due| debouncer.fire(due))
            };
            if let (Some(width), Some(controller)) = (settled, controller.upgrade()) {
                debug!("Viewport settled at {}px", width);
                with_controller(&controller, |c| c.viewport_settled(width));
            }
        })
    };
    let controller = Rc::downgrade(controller);
    let timer = timer.clone();
    Closure::new(move |_event: Event| {
        let width = viewport_width(&timer.window);
        if let Some(controller) = controller.upgrade() {
            with_controller(&controller, |c| {
                c.set_viewport_width(width);
            });
        }
        debouncer
            .borrow_mut()
            .schedule(js_sys::Date::now() as u64, width);
        timer.restart(settle.as_ref().unchecked_ref(), quiet_ms);
    })
}

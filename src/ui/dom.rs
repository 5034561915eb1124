//! Browser markup binding.
//!
//! Reads the navigation tree out of the page once at startup, adds the mobile
//! chrome when the page does not provide it, resolves event targets back to
//! navigation elements and applies patches to the live elements.

use super::{ElementKey, Patch, Presenter};
use crate::config::{MarkupConfig, SidebarConfig};
use crate::error::AppError;
use crate::events::Target;
use crate::state::{NavTree, NavigationState};
use log::*;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, ScrollBehavior, ScrollToOptions};

const TOGGLE_LABEL: &str = "Toggle navigation";
const TOGGLE_ICON: &str = r#"<i class="fa fa-bars"></i>"#;

/// Readable text for a thrown JS value.
///
pub(crate) fn js_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn dom_error(value: JsValue) -> AppError {
    AppError::Dom(js_text(&value))
}

fn query(document: &Document, selector: &str) -> Result<Option<Element>, AppError> {
    document.query_selector(selector).map_err(dom_error)
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, AppError> {
    let list = document.query_selector_all(selector).map_err(dom_error)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn closest(from: &Element, selector: &str) -> Option<Element> {
    from.closest(selector).ok().flatten()
}

fn label(element: &Element) -> String {
    element.text_content().unwrap_or_default().trim().to_string()
}

/// Mobile chrome elements.
///
pub struct Chrome {
    pub toggle: Element,
    pub overlay: Element,
    pub body: Element,
}

/// Find the toggle button and overlay, creating either one when missing.
///
pub fn ensure_chrome(document: &Document, markup: &MarkupConfig) -> Result<Chrome, AppError> {
    let body = document
        .body()
        .ok_or_else(|| AppError::Dom("document has no body".to_string()))?;

    let toggle = match query(document, &MarkupConfig::selector(&markup.toggle))? {
        Some(toggle) => toggle,
        None => {
            let toggle = document.create_element("button").map_err(dom_error)?;
            toggle.set_class_name(&markup.toggle);
            toggle.set_attribute("type", "button").map_err(dom_error)?;
            toggle.set_attribute("aria-label", TOGGLE_LABEL).map_err(dom_error)?;
            toggle.set_inner_html(TOGGLE_ICON);
            body.prepend_with_node_1(&toggle).map_err(dom_error)?;
            debug!("Created navigation toggle button");
            toggle
        }
    };

    let overlay = match query(document, &MarkupConfig::selector(&markup.overlay))? {
        Some(overlay) => overlay,
        None => {
            let overlay = document.create_element("div").map_err(dom_error)?;
            overlay.set_class_name(&markup.overlay);
            body.prepend_with_node_1(&overlay).map_err(dom_error)?;
            debug!("Created navigation overlay");
            overlay
        }
    };

    Ok(Chrome {
        toggle,
        overlay,
        body: body.into(),
    })
}

/// Maps event targets back to navigation elements.
///
pub struct TargetIndex {
    headers: Vec<(String, Element)>,
    header_selector: String,
    item_selector: String,
    page_attribute: String,
    toggle_selector: String,
    overlay_selector: String,
}

impl TargetIndex {
    /// Resolve the element an event was dispatched to, walking up to the
    /// nearest navigation element.
    ///
    pub fn resolve(&self, from: &Element) -> Option<Target> {
        if let Some(header) = closest(from, &self.header_selector) {
            return self
                .headers
                .iter()
                .find(|(_, element)| element.is_same_node(Some(header.as_ref())))
                .map(|(id, _)| Target::GroupHeader(id.clone()));
        }
        if let Some(item) = closest(from, &self.item_selector) {
            return item.get_attribute(&self.page_attribute).map(Target::Item);
        }
        if closest(from, &self.toggle_selector).is_some() {
            return Some(Target::ToggleButton);
        }
        if closest(from, &self.overlay_selector).is_some() {
            return Some(Target::Overlay);
        }
        None
    }
}

/// Everything read from the markup at startup.
///
pub struct DomScan {
    pub tree: NavTree,
    pub elements: HashMap<ElementKey, Element>,
    pub targets: TargetIndex,
    /// First item the markup already marks active
    pub marked_active: Option<String>,
}

/// Build the navigation tree from the markup.
///
/// A group whose header has no children container right after it is skipped
/// and its items become top-level. Items without a page id and duplicate ids
/// are skipped. Every navigation element is made keyboard focusable.
///
pub fn scan(document: &Document, config: &SidebarConfig) -> Result<DomScan, AppError> {
    let markup = &config.markup;
    let mut builder = NavTree::builder();
    let mut elements = HashMap::new();
    let mut headers = vec![];
    let mut containers: Vec<(String, Element)> = vec![];
    let mut group_ids = HashSet::new();

    for (index, group) in query_all(document, &MarkupConfig::selector(&markup.group))?
        .into_iter()
        .enumerate()
    {
        let header = match query_child(&group, &markup.group_header) {
            Some(header) => header,
            None => {
                warn!("Navigation group #{} has no header; skipped", index);
                continue;
            }
        };
        let children = match header
            .next_element_sibling()
            .filter(|sibling| sibling.class_list().contains(&markup.group_children))
        {
            Some(children) => children,
            None => {
                warn!(
                    "Navigation group #{} has no children container after its header; skipped",
                    index
                );
                continue;
            }
        };
        let id = header
            .get_attribute("data-group")
            .filter(|id| !id.is_empty())
            .or_else(|| Some(group.id()).filter(|id| !id.is_empty()))
            .unwrap_or_else(|| format!("group-{}", index));
        if !group_ids.insert(id.clone()) {
            warn!("Duplicate navigation group '{}'; skipped", id);
            continue;
        }

        header.set_attribute("tabindex", "0").map_err(dom_error)?;
        builder = builder.group(&id, &label(&header));
        elements.insert(ElementKey::GroupHeader(id.clone()), header.clone());
        elements.insert(ElementKey::GroupChildren(id.clone()), children);
        headers.push((id.clone(), header));
        containers.push((id, group));
    }

    let page_attribute = markup.page_data_attribute();
    let mut page_ids = HashSet::new();
    let mut marked_active = None;
    for item in query_all(document, &markup.item_selector())? {
        let page_id = match item.get_attribute(&page_attribute).filter(|id| !id.is_empty()) {
            Some(page_id) => page_id,
            None => {
                warn!("Navigation item without {}; skipped", page_attribute);
                continue;
            }
        };
        if !page_ids.insert(page_id.clone()) {
            warn!("Duplicate navigation page '{}'; skipped", page_id);
            continue;
        }
        let group_id = if item.class_list().contains(&markup.item) {
            closest(&item, &MarkupConfig::selector(&markup.group)).and_then(|group| {
                containers
                    .iter()
                    .find(|(_, element)| element.is_same_node(Some(group.as_ref())))
                    .map(|(id, _)| id.clone())
            })
        } else {
            None
        };

        item.set_attribute("tabindex", "0").map_err(dom_error)?;
        if marked_active.is_none() && item.class_list().contains(&config.classes.active) {
            marked_active = Some(page_id.clone());
        }
        builder = builder.item(&page_id, &label(&item), group_id.as_deref());
        elements.insert(ElementKey::Item(page_id), item);
    }

    if let Some(sidebar) = query(document, &MarkupConfig::selector(&markup.sidebar))? {
        elements.insert(ElementKey::Panel, sidebar);
    } else {
        warn!("No .{} element found; panel state is not shown", markup.sidebar);
    }

    let tree = builder.build()?;
    info!(
        "Scanned navigation: {} groups, {} items",
        tree.groups().len(),
        tree.items().len()
    );

    Ok(DomScan {
        tree,
        elements,
        targets: TargetIndex {
            headers,
            header_selector: MarkupConfig::selector(&markup.group_header),
            item_selector: markup.item_selector(),
            page_attribute,
            toggle_selector: MarkupConfig::selector(&markup.toggle),
            overlay_selector: MarkupConfig::selector(&markup.overlay),
        },
        marked_active,
    })
}

fn query_child(parent: &Element, class: &str) -> Option<Element> {
    parent
        .query_selector(&MarkupConfig::selector(class))
        .ok()
        .flatten()
}

/// Last reconciled state, readable while the controller is borrowed.
///
#[derive(Debug, Default)]
pub struct StateMirror {
    active_page: RefCell<Option<String>>,
    panel_open: Cell<bool>,
}

impl StateMirror {
    pub fn active_page(&self) -> Option<String> {
        self.active_page.borrow().clone()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open.get()
    }

    fn update(&self, state: &NavigationState) {
        *self.active_page.borrow_mut() = state.active_page_id().map(str::to_string);
        self.panel_open.set(state.mobile_panel_open());
    }
}

/// Presenter writing patches to live elements.
///
pub struct DomPresenter {
    elements: HashMap<ElementKey, Element>,
    content: Option<Element>,
    smooth_scroll: bool,
    mirror: Rc<StateMirror>,
}

impl DomPresenter {
    pub fn new(
        mut elements: HashMap<ElementKey, Element>,
        chrome: &Chrome,
        content: Option<Element>,
        smooth_scroll: bool,
    ) -> Self {
        elements.insert(ElementKey::Overlay, chrome.overlay.clone());
        elements.insert(ElementKey::Body, chrome.body.clone());
        DomPresenter {
            elements,
            content,
            smooth_scroll,
            mirror: Rc::new(StateMirror::default()),
        }
    }

    pub fn mirror(&self) -> Rc<StateMirror> {
        Rc::clone(&self.mirror)
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, patches: &[Patch]) {
        for patch in patches {
            let element = match self.elements.get(patch.target()) {
                Some(element) => element,
                None => continue,
            };
            let result = match patch {
                Patch::Class { class, enabled, .. } => element
                    .class_list()
                    .toggle_with_force(class, *enabled)
                    .map(|_| ()),
                Patch::Attribute { name, value, .. } => element.set_attribute(name, value),
            };
            if let Err(e) = result {
                warn!("Failed to apply {:?}: {}", patch, js_text(&e));
            }
        }
    }

    fn scroll_content_to_top(&mut self) {
        if let Some(content) = &self.content {
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(if self.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            });
            content.scroll_to_with_scroll_to_options(&options);
        }
    }

    fn state_changed(&mut self, state: &NavigationState) {
        self.mirror.update(state);
    }
}

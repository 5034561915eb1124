//! Sidebar navigation controller.
//!
//! Owns the navigation tree and state, runs every transition, pushes the
//! resulting markup changes to the presenter and notifies the host of
//! user-driven selections. Host-driven activations update the markup only,
//! so neither direction of the selection sync echoes back to its origin.

use crate::config::SidebarConfig;
use crate::host::{HostBridge, SelectionNotice};
use crate::state::{NavTree, NavigationState, StateError};
use crate::ui::{Presenter, Snapshot};
use log::*;

/// Oversees navigation state, presentation and host notification.
///
pub struct Controller<H: HostBridge, P: Presenter> {
    tree: NavTree,
    state: NavigationState,
    config: SidebarConfig,
    host: H,
    presenter: P,
    viewport_width: u32,
    rendered: Option<Snapshot>,
}

impl<H: HostBridge, P: Presenter> Controller<H, P> {
    /// Create the controller, seed the state from the initial page (falling
    /// back to the configured one when it is missing or unknown) and write
    /// the full markup state once.
    ///
    pub fn new(
        tree: NavTree,
        config: SidebarConfig,
        host: H,
        presenter: P,
        viewport_width: u32,
        initial_page: Option<&str>,
    ) -> Self {
        let initial_page = tree.first_known([initial_page, config.initial_page.as_deref()]);
        let state = NavigationState::seeded(&tree, initial_page);
        debug!(
            "Seeded navigation state: active={:?}, expanded={:?}",
            state.active_page_id(),
            state.expanded_group_ids()
        );
        let mut controller = Controller {
            tree,
            state,
            config,
            host,
            presenter,
            viewport_width,
            rendered: None,
        };
        controller.reconcile();
        controller
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn is_narrow(&self) -> bool {
        self.config.is_narrow(self.viewport_width)
    }

    /// Expand or collapse a group. Unknown groups are ignored.
    ///
    pub fn toggle_group(&mut self, group_id: &str) -> bool {
        match self.state.toggle_group(&self.tree, group_id) {
            Ok(expanded) => {
                debug!("Group '{}' expanded={}", group_id, expanded);
                self.reconcile();
                true
            }
            Err(e) => {
                self.ignore(e);
                false
            }
        }
    }

    /// Select a page on behalf of the user: mark it active, expand its group,
    /// close the mobile panel on narrow viewports, notify the host once and
    /// scroll the content back to the top. Unknown pages are ignored.
    ///
    pub fn select_item(&mut self, page_id: &str) -> bool {
        if let Err(e) = self.state.select_page(&self.tree, page_id) {
            self.ignore(e);
            return false;
        }
        debug!("Selected page '{}'", page_id);
        if self.is_narrow() {
            self.state.close_panel();
        }
        self.reconcile();
        self.notify_host(page_id);
        self.presenter.scroll_content_to_top();
        true
    }

    /// Activate a page on behalf of the host. Updates the markup only; the
    /// host is not notified since it originated the change.
    ///
    pub fn activate_page(&mut self, page_id: &str) -> bool {
        if let Err(e) = self.state.select_page(&self.tree, page_id) {
            self.ignore(e);
            return false;
        }
        debug!("Host activated page '{}'", page_id);
        self.reconcile();
        true
    }

    /// Open or close the mobile panel. Returns the new open value.
    ///
    pub fn toggle_panel(&mut self) -> bool {
        let open = self.state.toggle_panel();
        debug!("Mobile panel open={}", open);
        self.reconcile();
        open
    }

    /// Close the mobile panel. Returns whether it was open.
    ///
    pub fn close_panel(&mut self) -> bool {
        let closed = self.state.close_panel();
        if closed {
            debug!("Mobile panel closed");
            self.reconcile();
        }
        closed
    }

    /// Track the current viewport width without any panel side effect.
    ///
    pub fn set_viewport_width(&mut self, width: u32) -> &mut Self {
        self.viewport_width = width;
        self
    }

    /// Apply a settled viewport width: wide viewports never show the panel.
    ///
    pub fn viewport_settled(&mut self, width: u32) -> bool {
        self.viewport_width = width;
        if self.is_narrow() {
            return false;
        }
        self.close_panel()
    }

    fn ignore(&self, error: StateError) {
        if error.is_unknown_id() {
            debug!("Ignoring navigation request: {}", error);
        } else {
            warn!("Navigation request failed: {}", error);
        }
    }

    fn notify_host(&self, page_id: &str) {
        if !self.host.is_attached() {
            debug!("No host attached, selection of '{}' not sent", page_id);
            return;
        }
        if let Err(e) = self.host.notify_selection(&SelectionNotice::new(page_id)) {
            warn!("Failed to notify host of selection '{}': {}", page_id, e);
        }
    }

    fn reconcile(&mut self) {
        let snapshot = Snapshot::project(&self.tree, &self.state, &self.config.classes);
        let patches = snapshot.diff(self.rendered.as_ref());
        if !patches.is_empty() {
            self.presenter.apply(&patches);
        }
        self.presenter.state_changed(&self.state);
        self.rendered = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use crate::ui::projection::ARIA_EXPANDED;
    use crate::ui::testing::RecordingPresenter;
    use crate::ui::{ElementKey, Patch};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    const NARROW: u32 = 600;
    const WIDE: u32 = 1280;

    type TestController = Controller<RecordingHost, RecordingPresenter>;

    fn tree() -> NavTree {
        NavTree::builder()
            .group("G1", "Group one")
            .item("I1", "Item one", Some("G1"))
            .item("I2", "Item two", Some("G1"))
            .item("home", "Home", None)
            .build()
            .unwrap()
    }

    fn controller(width: u32, initial: Option<&str>) -> (TestController, RecordingHost, RecordingPresenter) {
        let host = RecordingHost::attached();
        let presenter = RecordingPresenter::default();
        let controller = Controller::new(
            tree(),
            SidebarConfig::default(),
            host.clone(),
            presenter.clone(),
            width,
            initial,
        );
        (controller, host, presenter)
    }

    fn expanded(c: &TestController) -> BTreeSet<&str> {
        c.state().expanded_group_ids().iter().map(String::as_str).collect()
    }

    #[test]
    fn select_item_from_empty_state() {
        let (mut c, host, presenter) = controller(WIDE, None);
        assert!(c.select_item("I1"));
        assert_eq!(c.state().active_page_id(), Some("I1"));
        assert_eq!(expanded(&c), BTreeSet::from(["G1"]));
        assert_eq!(host.sent_pages(), vec!["I1"]);
        assert_eq!(presenter.scroll_count(), 1);
    }

    #[test]
    fn host_activation_is_not_echoed() {
        let (mut c, host, _) = controller(WIDE, None);
        c.select_item("I1");
        assert!(c.activate_page("I2"));
        assert_eq!(c.state().active_page_id(), Some("I2"));
        assert_eq!(expanded(&c), BTreeSet::from(["G1"]));
        assert_eq!(host.sent_pages(), vec!["I1"]);
    }

    #[test]
    fn host_activation_before_interaction() {
        let (mut c, host, presenter) = controller(NARROW, None);
        c.toggle_panel();
        assert!(c.activate_page("home"));
        assert!(host.sent_pages().is_empty());
        assert_eq!(presenter.scroll_count(), 0);
        // Host activation leaves the panel alone
        assert!(c.state().mobile_panel_open());
    }

    #[test]
    fn toggle_expanded_group_collapses_it() {
        let (mut c, _, presenter) = controller(WIDE, None);
        c.select_item("I1");
        assert!(c.toggle_group("G1"));
        assert!(expanded(&c).is_empty());
        assert!(presenter.last_batch().contains(&Patch::Attribute {
            target: ElementKey::GroupHeader("G1".into()),
            name: ARIA_EXPANDED,
            value: "false".into(),
        }));
        // Toggling again restores it
        assert!(c.toggle_group("G1"));
        assert_eq!(expanded(&c), BTreeSet::from(["G1"]));
    }

    #[test]
    fn selection_closes_panel_on_narrow_viewport() {
        let (mut c, host, presenter) = controller(NARROW, None);
        assert!(c.toggle_panel());
        assert!(c.select_item("I1"));
        assert!(!c.state().mobile_panel_open());
        assert_eq!(host.sent_pages(), vec!["I1"]);
        let batch = presenter.last_batch();
        assert!(batch.contains(&Patch::Class {
            target: ElementKey::Body,
            class: "sidebar-open".into(),
            enabled: false,
        }));
    }

    #[test]
    fn selection_keeps_panel_on_wide_viewport() {
        let (mut c, _, _) = controller(WIDE, None);
        c.toggle_panel();
        c.select_item("I1");
        assert!(c.state().mobile_panel_open());
    }

    #[test]
    fn panel_classes_change_in_one_batch() {
        let (mut c, _, presenter) = controller(NARROW, None);
        c.toggle_panel();
        let targets: Vec<ElementKey> = presenter
            .last_batch()
            .iter()
            .map(|p| p.target().clone())
            .collect();
        assert_eq!(
            targets,
            vec![ElementKey::Panel, ElementKey::Overlay, ElementKey::Body]
        );
        assert!(!c.toggle_panel());
        assert_eq!(presenter.last_batch().len(), 3);
    }

    #[test]
    fn reselecting_notifies_each_time() {
        let (mut c, host, _) = controller(WIDE, None);
        c.select_item("I1");
        c.select_item("I1");
        assert_eq!(host.sent_pages(), vec!["I1", "I1"]);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (mut c, host, presenter) = controller(WIDE, Some("I1"));
        let batches = presenter.batches.borrow().len();
        assert!(!c.select_item("missing"));
        assert!(!c.activate_page("missing"));
        assert!(!c.toggle_group("missing"));
        assert_eq!(c.state().active_page_id(), Some("I1"));
        assert!(host.sent_pages().is_empty());
        assert_eq!(presenter.batches.borrow().len(), batches);
    }

    #[test]
    fn detached_host_still_updates_markup() {
        let host = RecordingHost::default();
        let presenter = RecordingPresenter::default();
        let mut c = Controller::new(
            tree(),
            SidebarConfig::default(),
            host.clone(),
            presenter.clone(),
            WIDE,
            None,
        );
        assert!(c.select_item("I2"));
        assert!(host.sent_pages().is_empty());
        assert!(presenter.last_batch().contains(&Patch::Class {
            target: ElementKey::Item("I2".into()),
            class: "active".into(),
            enabled: true,
        }));
    }

    #[test]
    fn failing_host_keeps_local_state() {
        let host = RecordingHost {
            attached: true,
            failing: true,
            ..RecordingHost::default()
        };
        let mut c = Controller::new(
            tree(),
            SidebarConfig::default(),
            host,
            RecordingPresenter::default(),
            WIDE,
            None,
        );
        assert!(c.select_item("I1"));
        assert_eq!(c.state().active_page_id(), Some("I1"));
    }

    #[test]
    fn initial_reconciliation_writes_full_markup() {
        let (c, host, presenter) = controller(WIDE, Some("I2"));
        assert_eq!(presenter.batches.borrow().len(), 1);
        let batch = presenter.last_batch();
        assert!(batch.contains(&Patch::Class {
            target: ElementKey::GroupHeader("G1".into()),
            class: "active".into(),
            enabled: true,
        }));
        assert!(batch.contains(&Patch::Attribute {
            target: ElementKey::GroupHeader("G1".into()),
            name: ARIA_EXPANDED,
            value: "true".into(),
        }));
        assert_eq!(expanded(&c), BTreeSet::from(["G1"]));
        assert!(host.sent_pages().is_empty());
    }

    #[test]
    fn configured_initial_page_is_fallback() {
        let config = SidebarConfig {
            initial_page: Some("I1".into()),
            ..SidebarConfig::default()
        };
        let c = Controller::new(
            tree(),
            config.clone(),
            RecordingHost::default(),
            RecordingPresenter::default(),
            WIDE,
            None,
        );
        assert_eq!(c.state().active_page_id(), Some("I1"));

        let c = Controller::new(
            tree(),
            config,
            RecordingHost::default(),
            RecordingPresenter::default(),
            WIDE,
            Some("home"),
        );
        assert_eq!(c.state().active_page_id(), Some("home"));
        assert!(c.state().expanded_group_ids().is_empty());
    }

    #[test]
    fn unknown_initial_page_falls_back_to_configured() {
        let config = SidebarConfig {
            initial_page: Some("I1".into()),
            ..SidebarConfig::default()
        };
        let presenter = RecordingPresenter::default();
        let c = Controller::new(
            tree(),
            config,
            crate::host::Detached,
            presenter.clone(),
            WIDE,
            Some("stale"),
        );
        assert_eq!(c.state().active_page_id(), Some("I1"));
        assert!(c.state().is_expanded("G1"));
        assert!(presenter.last_batch().contains(&Patch::Class {
            target: ElementKey::Item("I1".into()),
            class: "active".into(),
            enabled: true,
        }));
    }

    #[test]
    fn unknown_initial_and_configured_pages_leave_nothing_active() {
        let config = SidebarConfig {
            initial_page: Some("gone".into()),
            ..SidebarConfig::default()
        };
        let c = Controller::new(
            tree(),
            config,
            crate::host::Detached,
            crate::ui::NullPresenter,
            WIDE,
            Some("stale"),
        );
        assert_eq!(c.state().active_page_id(), None);
        assert!(c.state().expanded_group_ids().is_empty());
    }

    #[test]
    fn settled_wide_viewport_closes_panel() {
        let (mut c, _, _) = controller(NARROW, None);
        c.toggle_panel();
        assert!(!c.viewport_settled(800));
        assert!(c.state().mobile_panel_open());
        assert!(c.viewport_settled(1024));
        assert!(!c.state().mobile_panel_open());
        assert!(!c.is_narrow());
    }

    #[test]
    fn close_panel_when_closed_is_noop() {
        let (mut c, _, presenter) = controller(NARROW, None);
        let batches = presenter.batches.borrow().len();
        assert!(!c.close_panel());
        assert_eq!(presenter.batches.borrow().len(), batches);
    }

    #[test]
    fn presenter_observes_every_reconciled_state() {
        let (mut c, _, presenter) = controller(NARROW, None);
        c.toggle_panel();
        c.select_item("I2");
        let states = presenter.states.borrow();
        assert_eq!(states.len(), 3);
        assert!(states[1].mobile_panel_open());
        assert_eq!(states[2].active_page_id(), Some("I2"));
        assert!(!states[2].mobile_panel_open());
        assert_eq!(&states[2], c.state());
    }

    #[test]
    fn inbound_host_messages_reach_controller() {
        let (c, host, _) = controller(WIDE, None);
        let shared = Rc::new(RefCell::new(c));
        let target = Rc::clone(&shared);
        host.on_activate_page(Box::new(move |page_id| {
            target.borrow_mut().activate_page(&page_id);
        }))
        .unwrap();

        host.push_activate("I2");
        assert_eq!(shared.borrow().state().active_page_id(), Some("I2"));
        host.push_activate("stale");
        assert_eq!(shared.borrow().state().active_page_id(), Some("I2"));
        assert!(host.sent_pages().is_empty());
    }
}

use super::error::StateError;
use super::navigation::NavTree;
use log::*;
use std::collections::BTreeSet;

/// Houses the mutable navigation state.
///
/// Every transition takes the tree it validates ids against. The state never
/// reads anything back from markup; presentation is derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    active_page_id: Option<String>,
    expanded_group_ids: BTreeSet<String>,
    mobile_panel_open: bool,
}

impl NavigationState {
    /// Return a new state with nothing active, nothing expanded and the
    /// panel closed.
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the load-time state for the given initial page. Unknown ids
    /// leave the state empty.
    ///
    pub fn seeded(tree: &NavTree, initial_page: Option<&str>) -> Self {
        let mut state = Self::new();
        if let Some(page_id) = initial_page {
            if let Err(e) = state.select_page(tree, page_id) {
                debug!("Ignoring initial page: {}", e);
            }
        }
        state.expand_active_group(tree);
        state
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn expanded_group_ids(&self) -> &BTreeSet<String> {
        &self.expanded_group_ids
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded_group_ids.contains(group_id)
    }

    pub fn is_active(&self, page_id: &str) -> bool {
        self.active_page_id.as_deref() == Some(page_id)
    }

    pub fn mobile_panel_open(&self) -> bool {
        self.mobile_panel_open
    }

    /// Flip the expansion of a group. Returns the new expanded value.
    ///
    pub fn toggle_group(&mut self, tree: &NavTree, group_id: &str) -> Result<bool, StateError> {
        if !tree.has_group(group_id) {
            return Err(StateError::UnknownGroup {
                id: group_id.to_string(),
            });
        }
        if self.expanded_group_ids.remove(group_id) {
            Ok(false)
        } else {
            self.expanded_group_ids.insert(group_id.to_string());
            Ok(true)
        }
    }

    /// Make the given page the single active page and expand its parent
    /// group.
    ///
    pub fn select_page(&mut self, tree: &NavTree, page_id: &str) -> Result<(), StateError> {
        if !tree.has_item(page_id) {
            return Err(StateError::UnknownPage {
                id: page_id.to_string(),
            });
        }
        self.active_page_id = Some(page_id.to_string());
        self.expand_active_group(tree);
        Ok(())
    }

    /// Ensure the group holding the active page is expanded.
    ///
    pub fn expand_active_group(&mut self, tree: &NavTree) -> &mut Self {
        if let Some(group_id) = self
            .active_page_id
            .as_deref()
            .and_then(|page_id| tree.parent_group(page_id))
        {
            if !self.expanded_group_ids.contains(group_id) {
                self.expanded_group_ids.insert(group_id.to_string());
            }
        }
        self
    }

    /// Open the mobile panel. Returns whether anything changed.
    ///
    pub fn open_panel(&mut self) -> bool {
        !std::mem::replace(&mut self.mobile_panel_open, true)
    }

    /// Close the mobile panel. Returns whether anything changed.
    ///
    pub fn close_panel(&mut self) -> bool {
        std::mem::replace(&mut self.mobile_panel_open, false)
    }

    /// Flip the mobile panel. Returns the new open value.
    ///
    pub fn toggle_panel(&mut self) -> bool {
        self.mobile_panel_open = !self.mobile_panel_open;
        self.mobile_panel_open
    }
}

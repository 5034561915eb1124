//! Projection of navigation state onto markup.
//!
//! A [`Snapshot`] lists, for every element the sidebar controls, which state
//! classes it should carry and which ARIA attributes it should have. Diffing
//! two snapshots yields the [`Patch`] batch a presenter has to apply.

use crate::config::StateClasses;
use crate::state::{NavTree, NavigationState};
use std::collections::BTreeMap;

pub const ARIA_EXPANDED: &str = "aria-expanded";

/// Identifies an element controlled by the sidebar.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKey {
    GroupHeader(String),
    GroupChildren(String),
    Item(String),
    Panel,
    Overlay,
    Body,
}

/// Desired classes and attributes of one element.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    pub classes: BTreeMap<String, bool>,
    pub attributes: BTreeMap<&'static str, String>,
}

impl ElementState {
    fn class(mut self, name: &str, enabled: bool) -> Self {
        // Two flags may share one class name (e.g. "active"); either enables it
        *self.classes.entry(name.to_string()).or_insert(false) |= enabled;
        self
    }

    fn attribute(mut self, name: &'static str, value: &str) -> Self {
        self.attributes.insert(name, value.to_string());
        self
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.get(name).copied().unwrap_or(false)
    }
}

/// A single markup mutation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Class {
        target: ElementKey,
        class: String,
        enabled: bool,
    },
    Attribute {
        target: ElementKey,
        name: &'static str,
        value: String,
    },
}

impl Patch {
    pub fn target(&self) -> &ElementKey {
        match self {
            Patch::Class { target, .. } | Patch::Attribute { target, .. } => target,
        }
    }
}

/// Desired markup for the whole sidebar.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    elements: BTreeMap<ElementKey, ElementState>,
}

impl Snapshot {
    /// Compute the markup the given state should produce.
    ///
    pub fn project(tree: &NavTree, state: &NavigationState, classes: &StateClasses) -> Snapshot {
        let mut elements = BTreeMap::new();
        let active_group = state
            .active_page_id()
            .and_then(|page_id| tree.parent_group(page_id));

        for group in tree.groups() {
            let expanded = state.is_expanded(&group.id);
            let header = ElementState::default()
                .class(&classes.expanded, expanded)
                .class(&classes.active, active_group == Some(group.id.as_str()))
                .attribute(ARIA_EXPANDED, if expanded { "true" } else { "false" });
            elements.insert(ElementKey::GroupHeader(group.id.clone()), header);
            elements.insert(
                ElementKey::GroupChildren(group.id.clone()),
                ElementState::default().class(&classes.expanded, expanded),
            );
        }

        for item in tree.items() {
            elements.insert(
                ElementKey::Item(item.page_id.clone()),
                ElementState::default().class(&classes.active, state.is_active(&item.page_id)),
            );
        }

        let open = state.mobile_panel_open();
        elements.insert(
            ElementKey::Panel,
            ElementState::default().class(&classes.panel_open, open),
        );
        elements.insert(
            ElementKey::Overlay,
            ElementState::default().class(&classes.overlay_active, open),
        );
        elements.insert(
            ElementKey::Body,
            ElementState::default().class(&classes.body_open, open),
        );

        Snapshot { elements }
    }

    pub fn element(&self, key: &ElementKey) -> Option<&ElementState> {
        self.elements.get(key)
    }

    pub fn has_class(&self, key: &ElementKey, class: &str) -> bool {
        self.element(key).map_or(false, |e| e.has_class(class))
    }

    pub fn attribute(&self, key: &ElementKey, name: &str) -> Option<&str> {
        self.element(key)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    /// Return the patches turning `previous` into `self`. Without a previous
    /// snapshot every class and attribute is written, which also clears
    /// stale classes left in server-rendered markup.
    ///
    pub fn diff(&self, previous: Option<&Snapshot>) -> Vec<Patch> {
        let mut patches = vec![];
        for (key, element) in &self.elements {
            let before = previous.and_then(|p| p.elements.get(key));
            for (class, &enabled) in &element.classes {
                let unchanged = before
                    .and_then(|b| b.classes.get(class))
                    .map_or(false, |&was| was == enabled);
                if !unchanged {
                    patches.push(Patch::Class {
                        target: key.clone(),
                        class: class.clone(),
                        enabled,
                    });
                }
            }
            for (&name, value) in &element.attributes {
                let unchanged = before
                    .and_then(|b| b.attributes.get(name))
                    .map_or(false, |was| was == value);
                if !unchanged {
                    patches.push(Patch::Attribute {
                        target: key.clone(),
                        name,
                        value: value.clone(),
                    });
                }
            }
        }
        patches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> NavTree {
        NavTree::builder()
            .group("G1", "Group")
            .item("I1", "One", Some("G1"))
            .item("I2", "Two", Some("G1"))
            .item("home", "Home", None)
            .build()
            .unwrap()
    }

    #[test]
    fn project_active_item_and_group() {
        let tree = tree();
        let classes = StateClasses::default();
        let state = NavigationState::seeded(&tree, Some("I2"));
        let snapshot = Snapshot::project(&tree, &state, &classes);

        let header = ElementKey::GroupHeader("G1".into());
        assert!(snapshot.has_class(&header, "expanded"));
        assert!(snapshot.has_class(&header, "active"));
        assert_eq!(snapshot.attribute(&header, ARIA_EXPANDED), Some("true"));
        assert!(snapshot.has_class(&ElementKey::GroupChildren("G1".into()), "expanded"));
        assert!(snapshot.has_class(&ElementKey::Item("I2".into()), "active"));
        assert!(!snapshot.has_class(&ElementKey::Item("I1".into()), "active"));
        assert!(!snapshot.has_class(&ElementKey::Panel, "open"));
    }

    #[test]
    fn project_top_level_item_leaves_groups_inactive() {
        let tree = tree();
        let state = NavigationState::seeded(&tree, Some("home"));
        let snapshot = Snapshot::project(&tree, &state, &StateClasses::default());
        let header = ElementKey::GroupHeader("G1".into());
        assert!(!snapshot.has_class(&header, "active"));
        assert_eq!(snapshot.attribute(&header, ARIA_EXPANDED), Some("false"));
    }

    #[test]
    fn shared_class_names_are_merged() {
        let tree = tree();
        let classes = StateClasses {
            active: "on".into(),
            expanded: "on".into(),
            ..StateClasses::default()
        };
        let mut state = NavigationState::new();
        state.toggle_group(&tree, "G1").unwrap();
        let snapshot = Snapshot::project(&tree, &state, &classes);
        assert!(snapshot.has_class(&ElementKey::GroupHeader("G1".into()), "on"));
    }

    #[test]
    fn diff_without_previous_writes_everything() {
        let tree = tree();
        let snapshot = Snapshot::project(&tree, &NavigationState::new(), &StateClasses::default());
        let patches = snapshot.diff(None);
        // header: 2 classes + aria, children: 1, items: 3, panel/overlay/body: 3
        assert_eq!(patches.len(), 10);
        assert!(patches.contains(&Patch::Attribute {
            target: ElementKey::GroupHeader("G1".into()),
            name: ARIA_EXPANDED,
            value: "false".into(),
        }));
    }

    #[test]
    fn diff_is_minimal() {
        let tree = tree();
        let classes = StateClasses::default();
        let mut state = NavigationState::new();
        let before = Snapshot::project(&tree, &state, &classes);
        state.open_panel();
        let after = Snapshot::project(&tree, &state, &classes);

        assert_eq!(
            after.diff(Some(&before)),
            vec![
                Patch::Class {
                    target: ElementKey::Panel,
                    class: "open".into(),
                    enabled: true,
                },
                Patch::Class {
                    target: ElementKey::Overlay,
                    class: "active".into(),
                    enabled: true,
                },
                Patch::Class {
                    target: ElementKey::Body,
                    class: "sidebar-open".into(),
                    enabled: true,
                },
            ]
        );
        assert!(after.diff(Some(&after)).is_empty());
    }
}

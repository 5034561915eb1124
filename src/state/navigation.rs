//! Navigation tree model.
//!
//! The tree is rendered by the host and is read-only to the controller: a
//! list of collapsible groups, each holding leaf items, plus top-level leaf
//! items that belong to no group. Nesting deeper than one group level is not
//! represented.

use super::error::StateError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A selectable leaf entry.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub page_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A collapsible container of leaf items.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Immutable navigation tree with id lookups.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTree {
    groups: Vec<NavGroup>,
    items: Vec<NavItem>,
    group_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
}

impl NavTree {
    /// Return a builder for a new tree.
    ///
    pub fn builder() -> NavTreeBuilder {
        NavTreeBuilder::default()
    }

    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn group(&self, id: &str) -> Option<&NavGroup> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    pub fn item(&self, page_id: &str) -> Option<&NavItem> {
        self.item_index.get(page_id).map(|&i| &self.items[i])
    }

    pub fn has_group(&self, id: &str) -> bool {
        self.group_index.contains_key(id)
    }

    pub fn has_item(&self, page_id: &str) -> bool {
        self.item_index.contains_key(page_id)
    }

    /// Return the id of the group containing the given page, if any.
    ///
    pub fn parent_group(&self, page_id: &str) -> Option<&str> {
        self.item(page_id).and_then(|item| item.group_id.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.groups.is_empty()
    }

    /// Return the first candidate page id present in the tree. Missing and
    /// unknown candidates are skipped.
    ///
    pub fn first_known<'a>(
        &self,
        candidates: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Option<&'a str> {
        candidates
            .into_iter()
            .flatten()
            .find(|page_id| self.has_item(page_id))
    }
}

/// Accumulates groups and items in render order.
///
#[derive(Debug, Default)]
pub struct NavTreeBuilder {
    groups: Vec<NavGroup>,
    items: Vec<NavItem>,
}

impl NavTreeBuilder {
    pub fn group(mut self, id: &str, label: &str) -> Self {
        self.groups.push(NavGroup {
            id: id.to_string(),
            label: label.to_string(),
            children: vec![],
        });
        self
    }

    pub fn item(mut self, page_id: &str, label: &str, group_id: Option<&str>) -> Self {
        self.items.push(NavItem {
            page_id: page_id.to_string(),
            label: label.to_string(),
            group_id: group_id.map(str::to_string),
        });
        self
    }

    /// Validate ids and link each item to its group.
    ///
    pub fn build(self) -> Result<NavTree, StateError> {
        let mut group_index = HashMap::new();
        let mut groups = self.groups;
        for (i, group) in groups.iter_mut().enumerate() {
            group.children.clear();
            if group_index.insert(group.id.clone(), i).is_some() {
                return Err(StateError::DuplicateGroup {
                    id: group.id.clone(),
                });
            }
        }

        let mut item_index = HashMap::new();
        for (i, item) in self.items.iter().enumerate() {
            if item_index.insert(item.page_id.clone(), i).is_some() {
                return Err(StateError::DuplicatePage {
                    id: item.page_id.clone(),
                });
            }
            if let Some(group_id) = &item.group_id {
                let &g = group_index
                    .get(group_id)
                    .ok_or_else(|| StateError::UnknownParentGroup {
                        page_id: item.page_id.clone(),
                        group_id: group_id.clone(),
                    })?;
                groups[g].children.push(item.page_id.clone());
            }
        }

        Ok(NavTree {
            groups,
            items: self.items,
            group_index,
            item_index,
        })
    }
}

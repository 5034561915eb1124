//! Navigation state-specific error types.

/// Errors that can occur while building the navigation tree or running a
/// state transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Group id is not part of the rendered tree
    #[error("Unknown group: {id}")]
    UnknownGroup { id: String },

    /// Page id is not part of the rendered tree
    #[error("Unknown page: {id}")]
    UnknownPage { id: String },

    /// Two groups share the same id
    #[error("Duplicate group id: {id}")]
    DuplicateGroup { id: String },

    /// Two leaf items share the same page id
    #[error("Duplicate page id: {id}")]
    DuplicatePage { id: String },

    /// Leaf item references a group that was never declared
    #[error("Page {page_id} references unknown group {group_id}")]
    UnknownParentGroup { page_id: String, group_id: String },
}

impl StateError {
    /// Whether the error only means the id is stale or missing, which the
    /// controller ignores rather than reports.
    pub fn is_unknown_id(&self) -> bool {
        matches!(
            self,
            StateError::UnknownGroup { .. } | StateError::UnknownPage { .. }
        )
    }
}

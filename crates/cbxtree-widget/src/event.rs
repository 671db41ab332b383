//! Outbound notifications and the keyboard vocabulary.

use cbxtree_core::NodeId;

/// Notification produced by widget mutations.
///
/// Events accumulate on the widget and are collected with
/// [`CbxTree::take_events`](crate::CbxTree::take_events) after each input is
/// routed. Bulk operations are intentionally silent, matching the behavior
/// of per-item gestures being the only notification sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// The selection changed through a check gesture. Read the current
    /// selection from the widget (`form_entries`, `tree`) when handling it.
    Changed,
    /// One branch was expanded or collapsed.
    Toggled {
        /// Submission value of the toggled branch.
        value: String,
        /// Display title of the toggled branch.
        title: String,
        /// True when the branch was expanded, false when collapsed.
        expanded: bool,
    },
    /// An on-demand branch was expanded and wants its subtree. The host
    /// loads records for `value` and answers with
    /// [`CbxTree::resolve_subtree`](crate::CbxTree::resolve_subtree) or
    /// [`CbxTree::abort_subtree`](crate::CbxTree::abort_subtree).
    SubtreeRequested {
        /// Handle of the requesting branch.
        node: NodeId,
        /// Submission value of the requesting branch.
        value: String,
    },
}

/// Keys understood by [`CbxTree::handle_key`](crate::CbxTree::handle_key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Space,
}

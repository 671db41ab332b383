//! The interactive checkbox-tree widget.
//!
//! [`CbxTree`] wraps the selection tree with everything a host needs to
//! drive it: a focus cursor over the visible rows, the keyboard map,
//! pointer entry points, the on-demand fetch workflow, bulk toggles, JSON
//! content hooks and form participation. The host renders from
//! [`CbxTree::rows`], routes inputs in, and drains [`TreeEvent`]s out.
//!
//! Everything here is synchronous. The only asynchronous concern, loading
//! a subtree, is split at its suspension point: expanding an unfetched
//! branch emits [`TreeEvent::SubtreeRequested`], the host performs the
//! load however it likes, and completion re-enters through
//! [`CbxTree::resolve_subtree`] or [`CbxTree::abort_subtree`]. While the
//! request is outstanding the branch row is inert.

use ahash::AHashSet;
use cbxtree_core::{
    AttachError, CheckState, InputError, NodeId, RawItem, SubtreeKind, Tree, parse_items,
};

use crate::event::{Key, TreeEvent};
use crate::rows::{Disclosure, Row, visible_rows};

// ============================================================================
// Widget State
// ============================================================================

/// Interactive checkbox-tree state.
///
/// The widget owns a [`Tree`] plus the interaction state around it. All
/// mutating entry points run to completion before returning; between calls
/// every read (rows, states, form entries) is consistent.
#[derive(Debug)]
pub struct CbxTree {
    tree: Tree,
    /// Records the widget was constructed with; `reset` rebuilds from these.
    default_items: Vec<RawItem>,
    name: String,
    disabled: bool,
    hover_focus: bool,
    focus: Option<NodeId>,
    inflight: AHashSet<NodeId>,
    events: Vec<TreeEvent>,
}

impl Default for CbxTree {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CbxTree {
    /// Build a widget from raw records.
    pub fn new(items: Vec<RawItem>) -> Self {
        let tree = Tree::new(items.clone());
        let focus = tree.roots().next();
        Self {
            tree,
            default_items: items,
            name: String::new(),
            disabled: false,
            hover_focus: true,
            focus,
            inflight: AHashSet::new(),
            events: Vec::new(),
        }
    }

    /// Build a widget from a JSON document.
    ///
    /// A rejected document leaves an empty, fully operational widget behind,
    /// the same way [`CbxTree::set_json`] recovers. Use [`parse_items`] plus
    /// [`CbxTree::new`] to observe the error instead.
    pub fn from_json(text: &str) -> Self {
        let mut widget = Self::new(Vec::new());
        let _ = widget.set_json(text);
        widget
    }

    /// Set the form field name used by [`CbxTree::form_entries`].
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Disable or enable all user gestures.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Control whether hovering a row moves the focus cursor (on by default).
    #[must_use]
    pub fn with_hover_focus(mut self, hover_focus: bool) -> Self {
        self.hover_focus = hover_focus;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The underlying tree, for reads.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Current focus cursor.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Form field name.
    pub fn form_name(&self) -> &str {
        &self.name
    }

    /// Replace the form field name.
    pub fn set_form_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether gestures are currently ignored.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Disable or enable all user gestures.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether hover moves the focus cursor.
    pub fn hover_focus(&self) -> bool {
        self.hover_focus
    }

    /// True while a subtree request for this branch is outstanding.
    pub fn is_fetching(&self, node: NodeId) -> bool {
        self.inflight.contains(&node)
    }

    /// Flattened visible rows, in document order.
    pub fn rows(&self) -> Vec<Row<'_>> {
        visible_rows(&self.tree, self.focus)
    }

    /// Form submission pairs: the field name with each selected item's
    /// value, in selection insertion order.
    pub fn form_entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.tree
            .selected_values()
            .map(move |value| (self.name.as_str(), value))
    }

    /// Drain the accumulated events.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Content Hooks
    // ========================================================================

    /// Replace the whole tree with new records.
    ///
    /// Focus returns to the first row; outstanding fetches and undrained
    /// events are dropped. The reset baseline is not touched.
    pub fn set_data(&mut self, items: Vec<RawItem>) {
        self.rebuild(items);
    }

    /// Replace the whole tree from a JSON document and make it the new
    /// reset baseline.
    ///
    /// On error the widget holds an empty tree (and an empty baseline) and
    /// the error is returned; the widget stays fully operational either way.
    pub fn set_json(&mut self, text: &str) -> Result<(), InputError> {
        match parse_items(text) {
            Ok(items) => {
                self.default_items = items.clone();
                self.rebuild(items);
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(message = "cbxtree.input_rejected", error = %err);
                self.default_items = Vec::new();
                self.rebuild(Vec::new());
                Err(err)
            }
        }
    }

    /// Serialize the current tree, selection flags included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.tree.to_raw())
    }

    /// Restore a previously serialized tree, e.g. from session state.
    ///
    /// Unlike [`CbxTree::set_json`], a rejected document keeps the current
    /// tree untouched.
    pub fn restore_state(&mut self, state: &str) -> Result<(), InputError> {
        match parse_items(state) {
            Ok(items) => {
                self.rebuild(items);
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(message = "cbxtree.restore_rejected", error = %err);
                Err(err)
            }
        }
    }

    /// Rebuild from the records the widget started with.
    pub fn reset(&mut self) {
        let items = self.default_items.clone();
        self.rebuild(items);
    }

    fn rebuild(&mut self, items: Vec<RawItem>) {
        self.tree = Tree::new(items);
        self.focus = self.tree.roots().next();
        self.inflight.clear();
        self.events.clear();
    }

    // ========================================================================
    // Check Gestures
    // ========================================================================

    /// Route a checkbox gesture: focus the row, toggle through the
    /// synchronizer, emit [`TreeEvent::Changed`].
    ///
    /// Ignored while disabled and while the row's fetch is outstanding.
    pub fn handle_check(&mut self, node: NodeId, checked: bool) {
        if self.disabled || self.inflight.contains(&node) {
            return;
        }
        if self.tree.get(node).is_none() {
            return;
        }
        self.focus = Some(node);
        self.tree.set_checked(node, checked);
        self.events.push(TreeEvent::Changed);
    }

    /// Check or uncheck every item.
    ///
    /// `None` picks the direction automatically: check everything unless
    /// every item already reads as checked. Emits no event.
    pub fn toggle_all_checked(&mut self, checked: Option<bool>) {
        let checked = match checked {
            Some(checked) => checked,
            None => self
                .tree
                .iter()
                .any(|item| item.state() != CheckState::Checked),
        };
        self.tree.set_all_checked(checked);
    }

    // ========================================================================
    // Expand / Collapse
    // ========================================================================

    /// Toggle a branch open or closed, moving focus to it.
    ///
    /// Expanding a branch that has not fetched its subtree marks it inert
    /// and emits [`TreeEvent::SubtreeRequested`] exactly once; the
    /// [`TreeEvent::Toggled`] notification follows either way. Leaves and
    /// in-flight rows are ignored, as is everything while disabled.
    pub fn toggle_expand(&mut self, node: NodeId) {
        if self.disabled || self.inflight.contains(&node) {
            return;
        }
        let Some(view) = self.tree.get(node) else {
            return;
        };
        if view.subtree_kind() == SubtreeKind::Leaf {
            return;
        }
        let expanding = view.collapsed() == Some(true);
        let unfetched = view.subtree_kind() == SubtreeKind::Unfetched;
        let title = view.title().to_string();
        let value = view.value().to_string();

        self.tree.set_collapsed(node, !expanding);
        self.focus = Some(node);
        if expanding && unfetched {
            self.inflight.insert(node);
            self.events.push(TreeEvent::SubtreeRequested {
                node,
                value: value.clone(),
            });
        }
        self.events.push(TreeEvent::Toggled {
            value,
            title,
            expanded: expanding,
        });
    }

    /// Expand or collapse every fetched, non-empty branch.
    ///
    /// `None` picks the direction automatically: expand if any eligible
    /// branch is collapsed. On-demand branches are never force-expanded, so
    /// this can never trigger fetches. Emits no event.
    pub fn toggle_all_expanded(&mut self, expanded: Option<bool>) {
        let expanded = match expanded {
            Some(expanded) => expanded,
            None => self
                .tree
                .iter()
                .any(|item| item.child_count() > 0 && item.collapsed() == Some(true)),
        };
        self.tree.set_all_collapsed(!expanded);
    }

    // ========================================================================
    // Lazy Fetch Workflow
    // ========================================================================

    /// Answer an outstanding subtree request with fetched records.
    ///
    /// Attaches the subtree, syncs it to the branch's own checked state and
    /// clears the inert mark. A resolution that no longer matches an
    /// outstanding request (the tree was rebuilt since) is dropped.
    pub fn resolve_subtree(&mut self, node: NodeId, items: Vec<RawItem>) -> Result<(), AttachError> {
        if !self.inflight.remove(&node) {
            return Ok(());
        }
        self.tree.attach_subtree(node, items)?;
        self.tree.sync_descendants(node);
        Ok(())
    }

    /// Answer an outstanding subtree request with failure.
    ///
    /// The branch stays unfetched and interactive; expanding it again
    /// retries the request.
    pub fn abort_subtree(&mut self, node: NodeId) {
        self.inflight.remove(&node);
    }

    // ========================================================================
    // Focus & Keyboard
    // ========================================================================

    /// Move the focus cursor to a hovered row, when hover focus is on.
    pub fn handle_hover(&mut self, node: NodeId) {
        if self.disabled || !self.hover_focus || self.inflight.contains(&node) {
            return;
        }
        if self.tree.get(node).is_some() {
            self.focus = Some(node);
        }
    }

    /// Route one key press. Returns true when the key was consumed (the
    /// host should suppress its default effect).
    ///
    /// `page_rows` is the number of rows the host's viewport shows; page
    /// keys move by one viewport minus one row, clamped to the ends.
    pub fn handle_key(&mut self, key: Key, page_rows: usize) -> bool {
        if self.disabled {
            return false;
        }
        match key {
            Key::ArrowDown => self.focus_next(),
            Key::ArrowUp => self.focus_prev(),
            Key::ArrowRight => {
                if let Some((node, disclosure)) = self.focused_disclosure() {
                    match disclosure {
                        Disclosure::Expanded => self.focus_next(),
                        Disclosure::Collapsed => self.toggle_expand(node),
                        Disclosure::Leaf => {}
                    }
                }
            }
            Key::ArrowLeft => {
                if let Some((node, disclosure)) = self.focused_disclosure() {
                    if disclosure == Disclosure::Expanded {
                        self.toggle_expand(node);
                    } else {
                        self.focus_parent(node);
                    }
                }
            }
            Key::PageDown => self.focus_page_down(page_rows),
            Key::PageUp => self.focus_page_up(page_rows),
            Key::Home => self.focus_first(),
            Key::End => self.focus_last(),
            Key::Enter => {
                if let Some((node, disclosure)) = self.focused_disclosure() {
                    if disclosure != Disclosure::Leaf {
                        self.toggle_expand(node);
                    }
                }
            }
            Key::Space => {
                if let Some((node, _)) = self.focused_disclosure() {
                    let next = self.tree.state(node) != CheckState::Checked;
                    self.handle_check(node, next);
                }
            }
        }
        true
    }

    fn visible_ids(&self) -> Vec<NodeId> {
        self.rows().iter().map(|row| row.node).collect()
    }

    fn current_focus_index(&self, visible: &[NodeId]) -> Option<usize> {
        let focus = self.focus?;
        visible.iter().position(|&node| node == focus)
    }

    /// Focus plus disclosure of the focused row, if it is visible.
    fn focused_disclosure(&self) -> Option<(NodeId, Disclosure)> {
        let focus = self.focus?;
        self.rows()
            .iter()
            .find(|row| row.node == focus)
            .map(|row| (row.node, row.disclosure))
    }

    fn focus_next(&mut self) {
        let visible = self.visible_ids();
        match self.current_focus_index(&visible) {
            Some(index) => {
                if let Some(&next) = visible.get(index + 1) {
                    self.focus = Some(next);
                }
            }
            None => self.focus = visible.first().copied(),
        }
    }

    fn focus_prev(&mut self) {
        let visible = self.visible_ids();
        match self.current_focus_index(&visible) {
            Some(index) => {
                if index > 0 {
                    self.focus = Some(visible[index - 1]);
                }
            }
            None => self.focus = visible.first().copied(),
        }
    }

    fn focus_first(&mut self) {
        self.focus = self.visible_ids().first().copied();
    }

    fn focus_last(&mut self) {
        self.focus = self.visible_ids().last().copied();
    }

    fn focus_page_down(&mut self, page_rows: usize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return;
        }
        let current = self.current_focus_index(&visible).unwrap_or(0);
        let target = (current + page_rows.saturating_sub(1)).min(visible.len() - 1);
        self.focus = Some(visible[target]);
    }

    fn focus_page_up(&mut self, page_rows: usize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return;
        }
        let current = self.current_focus_index(&visible).unwrap_or(0);
        let target = current.saturating_sub(page_rows.saturating_sub(1));
        self.focus = Some(visible[target]);
    }

    fn focus_parent(&mut self, node: NodeId) {
        if let Some(parent) = self.tree.parent(node) {
            self.focus = Some(parent);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

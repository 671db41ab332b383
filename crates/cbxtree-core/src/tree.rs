//! Arena-backed checkbox tree with derived tri-state selection.
//!
//! The tree is the single source of truth for a checkbox hierarchy: items
//! live in a flat arena addressed by [`NodeId`] handles, selection is an
//! insertion-ordered id set, and every checkbox state is derived on read
//! from those two structures. Nothing caches tri-states, so there is no
//! cache to invalidate.
//!
//! Selection changes propagate in two passes: the toggled item's subtree is
//! overwritten first, then each ancestor is recomputed from its children.
//! The pass order is part of the contract — ancestor recomputation reads
//! child composition and must see the subtree already updated.
//!
//! Items are addressed externally by positional path ids: top-level items
//! are `"0"`, `"1"`, ... and the i-th child of item `P` is `"P:i"`. Ids are
//! assigned once at build or attach time and resolved through a side table;
//! walks use parent links and child vectors, never id parsing.

use ahash::AHashMap;
use indexmap::IndexSet;
#[cfg(feature = "tracing")]
use web_time::Instant;

use crate::error::AttachError;
use crate::raw::{RawChildren, RawItem};

// ── Handles and states ──────────────────────────────────────────────────

/// Handle to one node of a [`Tree`] arena.
///
/// Handles are issued by the tree (lookups, iteration, views) and are only
/// meaningful for the tree that issued them. Passing a handle to a different
/// or rebuilt tree addresses an arbitrary node or panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tri-state of one checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// Not selected; for branches, no selected descendant subtree.
    #[default]
    Unchecked,
    /// Selected. For branches this means the whole subtree is selected.
    Checked,
    /// Branch whose subtree mixes selected and unselected items.
    Indeterminate,
}

/// How a node relates to children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtreeKind {
    /// Never has children; no expand affordance.
    Leaf,
    /// Branch whose children load on demand and have not been fetched yet.
    Unfetched,
    /// Branch with a known (possibly empty) child list.
    Fetched,
}

// ── Arena ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Subtree {
    Leaf,
    Unfetched,
    Fetched(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    title: String,
    value: String,
    icon: Option<String>,
    collapsed: bool,
    parent: Option<NodeId>,
    subtree: Subtree,
}

/// Checkbox tree: item arena plus the selection set.
///
/// Rebuilding from new raw data replaces the whole value; ids are positional,
/// so they are only stable across builds of identically shaped data. The one
/// in-place structural change is [`Tree::attach_subtree`], which grows an
/// on-demand branch exactly once.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    ids: AHashMap<String, NodeId>,
    selection: IndexSet<NodeId>,
}

impl Tree {
    /// Build a tree from raw records.
    ///
    /// `checked` flags seed the selection set in document order and are taken
    /// as authoritative: no synchronization pass runs, so a branch flagged
    /// checked above unflagged children stays exactly that way until the
    /// first toggle re-syncs it.
    pub fn new(items: Vec<RawItem>) -> Self {
        #[cfg(feature = "tracing")]
        let build_start = Instant::now();
        #[cfg(feature = "tracing")]
        let build_span = tracing::debug_span!(
            "tree.build",
            root_items = items.len(),
            total_nodes = tracing::field::Empty,
            build_duration_us = tracing::field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _build_guard = build_span.enter();

        let mut tree = Self::default();
        tree.roots = tree.build_items(items, None, "");

        #[cfg(feature = "tracing")]
        {
            let elapsed_us = build_start.elapsed().as_micros() as u64;
            build_span.record("total_nodes", tree.nodes.len() as u64);
            build_span.record("build_duration_us", elapsed_us);
        }

        tree
    }

    fn build_items(
        &mut self,
        items: Vec<RawItem>,
        parent: Option<NodeId>,
        prefix: &str,
    ) -> Vec<NodeId> {
        let mut level = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let id = if prefix.is_empty() {
                index.to_string()
            } else {
                format!("{prefix}:{index}")
            };
            let node_id = NodeId::new(self.nodes.len());
            // Leaves never collapse, unfetched branches always start
            // collapsed, fetched branches take their flag from the record.
            let collapsed = match &item.children {
                RawChildren::Leaf => false,
                RawChildren::Unfetched => true,
                RawChildren::Fetched(_) => item.collapsed.unwrap_or(false),
            };
            self.nodes.push(Node {
                id: id.clone(),
                title: item.title,
                value: item.value,
                icon: item.icon,
                collapsed,
                parent,
                subtree: Subtree::Leaf,
            });
            self.ids.insert(id.clone(), node_id);
            // Seed before recursing so selection order is document order.
            if item.checked == Some(true) {
                self.selection.insert(node_id);
            }
            let subtree = match item.children {
                RawChildren::Leaf => Subtree::Leaf,
                RawChildren::Unfetched => Subtree::Unfetched,
                RawChildren::Fetched(children) => {
                    Subtree::Fetched(self.build_items(children, Some(node_id), &id))
                }
            };
            self.nodes[node_id.index()].subtree = subtree;
            level.push(node_id);
        }
        level
    }

    // ── Addressing ──────────────────────────────────────────────────────

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level items in document order.
    pub fn roots(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        self.roots.iter().copied()
    }

    /// Resolve a path id (`"0:2:1"`) to its handle.
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Parent handle, `None` for top-level items.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// View of one item, `None` for a foreign handle.
    pub fn get(&self, node: NodeId) -> Option<ItemView<'_>> {
        (node.index() < self.nodes.len()).then(|| ItemView { tree: self, node })
    }

    /// View of the item with the given path id.
    pub fn item(&self, id: &str) -> Option<ItemView<'_>> {
        self.lookup(id).and_then(|node| self.get(node))
    }

    // ── State derivation ────────────────────────────────────────────────

    /// Whether the item's id is in the selection set.
    pub fn is_checked(&self, node: NodeId) -> bool {
        self.selection.contains(&node)
    }

    /// Derive the tri-state of one item.
    ///
    /// Selection membership wins outright; an unselected item without a
    /// (fetched, non-empty) subtree is unchecked; anything else composes the
    /// states of its children.
    pub fn state(&self, node: NodeId) -> CheckState {
        if self.selection.contains(&node) {
            return CheckState::Checked;
        }
        match &self.nodes[node.index()].subtree {
            Subtree::Fetched(children) if !children.is_empty() => self.state_from_children(node),
            _ => CheckState::Unchecked,
        }
    }

    /// Compose an item's state from its children, ignoring the item's own
    /// selection membership. This is what ancestor synchronization reads.
    pub fn state_from_children(&self, node: NodeId) -> CheckState {
        let Subtree::Fetched(children) = &self.nodes[node.index()].subtree else {
            return CheckState::Unchecked;
        };
        let mut any_checked = false;
        let mut any_unchecked = false;
        for &child in children {
            match self.state(child) {
                CheckState::Indeterminate => return CheckState::Indeterminate,
                CheckState::Checked => any_checked = true,
                CheckState::Unchecked => any_unchecked = true,
            }
        }
        if !any_checked {
            CheckState::Unchecked
        } else if !any_unchecked {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    // ── Selection synchronization ───────────────────────────────────────

    /// Toggle one item and re-establish selection consistency around it.
    ///
    /// Descendants are overwritten first, then ancestors are recomputed;
    /// running the passes the other way round would read stale child
    /// composition.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.set_membership(node, checked);
        self.sync_descendants(node);
        self.sync_ancestors(node);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.sync",
            id = %self.nodes[node.index()].id,
            checked,
            selected = self.selection.len() as u64,
        );
    }

    /// Force every descendant's membership to match the item's own.
    ///
    /// No-op for leaves and unfetched branches. Idempotent.
    pub fn sync_descendants(&mut self, node: NodeId) {
        let checked = self.selection.contains(&node);
        for id in self.descendant_ids(node) {
            self.set_membership(id, checked);
        }
    }

    /// Recompute each ancestor from its children, bottom-up to the root.
    ///
    /// An ancestor is selected exactly when its children compose to
    /// [`CheckState::Checked`]; indeterminate and unchecked both mean
    /// "not selected".
    pub fn sync_ancestors(&mut self, node: NodeId) {
        let mut current = self.nodes[node.index()].parent;
        while let Some(id) = current {
            let checked = self.state_from_children(id) == CheckState::Checked;
            self.set_membership(id, checked);
            current = self.nodes[id.index()].parent;
        }
    }

    fn set_membership(&mut self, node: NodeId, checked: bool) {
        if checked {
            self.selection.insert(node);
        } else {
            self.selection.shift_remove(&node);
        }
    }

    // ── Bulk operations ─────────────────────────────────────────────────

    /// Check or uncheck every item. The result is globally consistent, so no
    /// synchronization pass is needed.
    pub fn set_all_checked(&mut self, checked: bool) {
        let ids: Vec<NodeId> = self.iter().map(|item| item.node_id()).collect();
        for id in ids {
            self.set_membership(id, checked);
        }
    }

    /// Check or uncheck an item together with all of its descendants.
    pub fn set_subtree_checked(&mut self, node: NodeId, checked: bool) {
        self.set_membership(node, checked);
        for id in self.descendant_ids(node) {
            self.set_membership(id, checked);
        }
    }

    fn descendant_ids(&self, node: NodeId) -> Vec<NodeId> {
        self.descendants(node).map(|item| item.node_id()).collect()
    }

    // ── Collapse control ────────────────────────────────────────────────

    /// Whether the item is currently collapsed. Always false for leaves.
    pub fn is_collapsed(&self, node: NodeId) -> bool {
        self.nodes[node.index()].collapsed
    }

    /// Collapse or expand one branch. No-op for leaves.
    pub fn set_collapsed(&mut self, node: NodeId, collapsed: bool) {
        if !matches!(self.nodes[node.index()].subtree, Subtree::Leaf) {
            self.nodes[node.index()].collapsed = collapsed;
        }
    }

    /// Collapse or expand every fetched, non-empty branch. On-demand
    /// branches are left alone so bulk expansion never triggers fetches.
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        for index in 0..self.nodes.len() {
            if matches!(&self.nodes[index].subtree, Subtree::Fetched(children) if !children.is_empty())
            {
                self.nodes[index].collapsed = collapsed;
            }
        }
    }

    // ── Lazy attachment ─────────────────────────────────────────────────

    /// Attach a fetched subtree to an on-demand branch.
    ///
    /// Precondition: the branch is [`SubtreeKind::Unfetched`]. Attaching to
    /// a fetched branch or a leaf fails without mutating anything; the
    /// unfetched-to-fetched transition happens at most once per branch.
    ///
    /// `checked` flags in the records seed the selection just like at build
    /// time, and no synchronization runs. Callers that want the new subtree
    /// to inherit the branch's own state follow up with
    /// [`Tree::sync_descendants`].
    pub fn attach_subtree(&mut self, node: NodeId, items: Vec<RawItem>) -> Result<(), AttachError> {
        match &self.nodes[node.index()].subtree {
            Subtree::Unfetched => {}
            Subtree::Leaf => {
                return Err(AttachError::Leaf {
                    id: self.nodes[node.index()].id.clone(),
                });
            }
            Subtree::Fetched(_) => {
                return Err(AttachError::AlreadyFetched {
                    id: self.nodes[node.index()].id.clone(),
                });
            }
        }

        #[cfg(feature = "tracing")]
        let attach_start = Instant::now();
        #[cfg(feature = "tracing")]
        let before = self.nodes.len();

        let prefix = self.nodes[node.index()].id.clone();
        let children = self.build_items(items, Some(node), &prefix);
        self.nodes[node.index()].subtree = Subtree::Fetched(children);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.attach",
            id = %prefix,
            attached = (self.nodes.len() - before) as u64,
            attach_duration_us = attach_start.elapsed().as_micros() as u64,
        );

        Ok(())
    }

    // ── Serialization ───────────────────────────────────────────────────

    /// Project the tree back into raw records.
    ///
    /// `checked` always reflects current selection membership, so branch
    /// flags come out normalized even if the input seeded them
    /// inconsistently. `collapsed` is emitted only when true, and the
    /// leaf / unfetched / fetched distinction of every `children` field is
    /// preserved.
    pub fn to_raw(&self) -> Vec<RawItem> {
        self.roots.iter().map(|&id| self.node_to_raw(id)).collect()
    }

    fn node_to_raw(&self, node: NodeId) -> RawItem {
        let item = &self.nodes[node.index()];
        RawItem {
            title: item.title.clone(),
            value: item.value.clone(),
            icon: item.icon.clone(),
            checked: Some(self.selection.contains(&node)),
            collapsed: item.collapsed.then_some(true),
            children: match &item.subtree {
                Subtree::Leaf => RawChildren::Leaf,
                Subtree::Unfetched => RawChildren::Unfetched,
                Subtree::Fetched(children) => RawChildren::Fetched(
                    children.iter().map(|&child| self.node_to_raw(child)).collect(),
                ),
            },
        }
    }

    /// Submission values of selected items, in selection insertion order.
    pub fn selected_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.selection
            .iter()
            .map(|&id| self.nodes[id.index()].value.as_str())
    }

    // ── Traversal ───────────────────────────────────────────────────────

    /// Pre-order traversal of the whole tree.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Pre-order traversal of one item's descendants (the item excluded).
    pub fn descendants(&self, node: NodeId) -> Iter<'_> {
        let mut stack = Vec::new();
        if let Subtree::Fetched(children) = &self.nodes[node.index()].subtree {
            stack.extend(children.iter().rev().copied());
        }
        Iter { tree: self, stack }
    }
}

// ── Views ───────────────────────────────────────────────────────────────

/// Borrowed view of one item: everything a renderer needs to draw a row
/// without walking the arena or composing states itself.
#[derive(Clone, Copy)]
pub struct ItemView<'t> {
    tree: &'t Tree,
    node: NodeId,
}

impl<'t> ItemView<'t> {
    /// Handle of the viewed item.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Path id of the viewed item.
    pub fn id(&self) -> &'t str {
        &self.tree.nodes[self.node.index()].id
    }

    /// Display label.
    pub fn title(&self) -> &'t str {
        &self.tree.nodes[self.node.index()].title
    }

    /// Submission value.
    pub fn value(&self) -> &'t str {
        &self.tree.nodes[self.node.index()].value
    }

    /// Icon reference, if any.
    pub fn icon(&self) -> Option<&'t str> {
        self.tree.nodes[self.node.index()].icon.as_deref()
    }

    /// Derived tri-state.
    pub fn state(&self) -> CheckState {
        self.tree.state(self.node)
    }

    /// Leaf / unfetched / fetched classification.
    pub fn subtree_kind(&self) -> SubtreeKind {
        match self.tree.nodes[self.node.index()].subtree {
            Subtree::Leaf => SubtreeKind::Leaf,
            Subtree::Unfetched => SubtreeKind::Unfetched,
            Subtree::Fetched(_) => SubtreeKind::Fetched,
        }
    }

    /// Collapsed flag for branches, `None` for leaves.
    pub fn collapsed(&self) -> Option<bool> {
        match self.tree.nodes[self.node.index()].subtree {
            Subtree::Leaf => None,
            _ => Some(self.tree.nodes[self.node.index()].collapsed),
        }
    }

    /// Number of fetched children (zero for leaves and unfetched branches).
    pub fn child_count(&self) -> usize {
        match &self.tree.nodes[self.node.index()].subtree {
            Subtree::Fetched(children) => children.len(),
            _ => 0,
        }
    }

    /// Direct children, in document order.
    pub fn children(&self) -> ChildViews<'t> {
        let ids: &'t [NodeId] = match &self.tree.nodes[self.node.index()].subtree {
            Subtree::Fetched(children) => children,
            _ => &[],
        };
        ChildViews {
            tree: self.tree,
            ids: ids.iter(),
        }
    }
}

impl std::fmt::Debug for ItemView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemView")
            .field("id", &self.id())
            .field("title", &self.title())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Iterator over the direct children of one item.
#[derive(Clone)]
pub struct ChildViews<'t> {
    tree: &'t Tree,
    ids: std::slice::Iter<'t, NodeId>,
}

impl<'t> Iterator for ChildViews<'t> {
    type Item = ItemView<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&node| ItemView {
            tree: self.tree,
            node,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for ChildViews<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&node| ItemView {
            tree: self.tree,
            node,
        })
    }
}

impl ExactSizeIterator for ChildViews<'_> {}

/// Pre-order iterator over a tree or subtree.
#[derive(Clone)]
pub struct Iter<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Iter<'t> {
    type Item = ItemView<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Subtree::Fetched(children) = &self.tree.nodes[node.index()].subtree {
            self.stack.extend(children.iter().rev().copied());
        }
        Some(ItemView {
            tree: self.tree,
            node,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

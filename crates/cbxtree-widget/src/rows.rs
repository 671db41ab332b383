//! Flattened visible-row projection.
//!
//! Renderers that draw the tree as a flat list (one row per visible item)
//! get the entire visible geometry from [`visible_rows`]: document order,
//! indentation depth, derived check state and the expand affordance. The
//! subtree of a collapsed branch is skipped wholesale; the branch row
//! itself stays visible.

use cbxtree_core::{CheckState, NodeId, SubtreeKind, Tree};

/// Expand affordance of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    /// Leaf item: no toggle control at all.
    Leaf,
    /// Branch currently hiding its subtree (or not yet fetched).
    Collapsed,
    /// Branch currently showing its subtree.
    Expanded,
}

/// One visible item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'t> {
    /// Handle of the item.
    pub node: NodeId,
    /// Path id of the item.
    pub id: &'t str,
    /// Nesting depth, zero for top-level items.
    pub depth: usize,
    /// Display label.
    pub title: &'t str,
    /// Icon reference, if any.
    pub icon: Option<&'t str>,
    /// Derived tri-state for the checkbox.
    pub state: CheckState,
    /// Expand affordance.
    pub disclosure: Disclosure,
    /// True for the row holding the focus cursor.
    pub focused: bool,
}

/// Flatten the visible items of a tree, in document order.
pub(crate) fn visible_rows(tree: &Tree, focus: Option<NodeId>) -> Vec<Row<'_>> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    for root in tree.roots().rev() {
        stack.push((root, 0));
    }
    while let Some((node, depth)) = stack.pop() {
        let Some(view) = tree.get(node) else { continue };
        let collapsed = view.collapsed() == Some(true);
        let disclosure = match view.subtree_kind() {
            SubtreeKind::Leaf => Disclosure::Leaf,
            _ if collapsed => Disclosure::Collapsed,
            _ => Disclosure::Expanded,
        };
        rows.push(Row {
            node,
            id: view.id(),
            depth,
            title: view.title(),
            icon: view.icon(),
            state: view.state(),
            disclosure,
            focused: focus == Some(node),
        });
        if !collapsed {
            for child in view.children().rev() {
                stack.push((child.node_id(), depth + 1));
            }
        }
    }
    rows
}

// ── Tests ───────────────────────────────────────────────────────────────

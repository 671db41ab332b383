#![forbid(unsafe_code)]

//! Keyboard navigation and activation tests for the checkbox tree.
//!
//! Proves that:
//! 1. Arrow Up/Down walk the visible rows in document order without wrapping
//! 2. Collapsed subtrees are skipped, and a hidden focus recovers to the first row
//! 3. Arrow Right/Left expand, collapse and climb to the parent
//! 4. Page Up/Down move by one viewport minus one row, clamped to the ends
//! 5. Enter toggles branches, Space toggles checkboxes, both with the right events
//! 6. A disabled widget consumes nothing
//!
//! Run:
//!   cargo test -p cbxtree-widget --test keyboard_navigation

use cbxtree_widget::{CbxTree, CheckState, Key, RawItem, TreeEvent};

fn pantry() -> Vec<RawItem> {
    vec![
        RawItem::new("Produce", "produce").children(vec![
            RawItem::new("Apple", "apple"),
            RawItem::new("Berries", "berries").children(vec![
                RawItem::new("Blackberry", "blackberry"),
                RawItem::new("Blueberry", "blueberry"),
            ]),
        ]),
        RawItem::new("Dairy", "dairy").on_demand(),
        RawItem::new("Bread", "bread"),
    ]
}

fn focused_id(widget: &CbxTree) -> String {
    widget
        .focus()
        .and_then(|node| widget.tree().get(node))
        .map(|view| view.id().to_string())
        .unwrap_or_default()
}

fn visible_ids(widget: &CbxTree) -> Vec<String> {
    widget.rows().iter().map(|row| row.id.to_string()).collect()
}

// ============================================================================
// 1. Arrow Up/Down
// ============================================================================

#[test]
fn arrow_down_walks_rows_in_document_order() {
    let mut widget = CbxTree::new(pantry());
    assert_eq!(focused_id(&widget), "0");

    let walk = ["0:0", "0:1", "0:1:0", "0:1:1", "1", "2"];
    for expected in walk {
        assert!(widget.handle_key(Key::ArrowDown, 10));
        assert_eq!(focused_id(&widget), expected);
    }
}

#[test]
fn arrow_down_does_not_wrap_at_last_row() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::End, 10);
    assert_eq!(focused_id(&widget), "2");

    assert!(widget.handle_key(Key::ArrowDown, 10), "key is still consumed");
    assert_eq!(focused_id(&widget), "2", "focus must stay on the last row");
}

#[test]
fn arrow_up_walks_back_and_stops_at_first() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::End, 10);

    for expected in ["1", "0:1:1", "0:1:0", "0:1", "0:0", "0"] {
        assert!(widget.handle_key(Key::ArrowUp, 10));
        assert_eq!(focused_id(&widget), expected);
    }

    assert!(widget.handle_key(Key::ArrowUp, 10));
    assert_eq!(focused_id(&widget), "0", "focus must stay on the first row");
}

#[test]
fn home_and_end_jump_to_extremes() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::ArrowDown, 10);
    widget.handle_key(Key::ArrowDown, 10);

    assert!(widget.handle_key(Key::End, 10));
    assert_eq!(focused_id(&widget), "2");

    assert!(widget.handle_key(Key::Home, 10));
    assert_eq!(focused_id(&widget), "0");
}

// ============================================================================
// 2. Collapsed Subtrees and Hidden Focus
// ============================================================================

#[test]
fn navigation_skips_collapsed_subtrees() {
    let mut widget = CbxTree::new(pantry());
    let berries = widget.tree().lookup("0:1").unwrap();

    widget.toggle_expand(berries);
    widget.take_events();
    assert_eq!(visible_ids(&widget), vec!["0", "0:0", "0:1", "1", "2"]);
    assert_eq!(focused_id(&widget), "0:1");

    assert!(widget.handle_key(Key::ArrowDown, 10));
    assert_eq!(focused_id(&widget), "1", "berry leaves must be skipped");

    assert!(widget.handle_key(Key::ArrowUp, 10));
    assert_eq!(focused_id(&widget), "0:1");
}

#[test]
fn hidden_focus_recovers_to_first_row() {
    let mut widget = CbxTree::new(pantry());
    let blackberry = widget.tree().lookup("0:1:0").unwrap();
    widget.handle_hover(blackberry);
    assert_eq!(focused_id(&widget), "0:1:0");

    // Bulk collapse does not move focus, so the cursor is now off-screen.
    widget.toggle_all_expanded(Some(false));
    assert_eq!(visible_ids(&widget), vec!["0", "1", "2"]);

    assert!(widget.handle_key(Key::ArrowDown, 10));
    assert_eq!(focused_id(&widget), "0", "navigation restarts at the top");
}

#[test]
fn space_with_hidden_focus_changes_nothing() {
    let mut widget = CbxTree::new(pantry());
    let blackberry = widget.tree().lookup("0:1:0").unwrap();
    widget.handle_hover(blackberry);
    widget.toggle_all_expanded(Some(false));

    assert!(widget.handle_key(Key::Space, 10));
    assert!(widget.take_events().is_empty());
    assert_eq!(widget.form_entries().count(), 0);
}

// ============================================================================
// 3. Arrow Right/Left
// ============================================================================

#[test]
fn right_arrow_on_expanded_branch_moves_to_next_row() {
    let mut widget = CbxTree::new(pantry());
    assert_eq!(focused_id(&widget), "0");

    assert!(widget.handle_key(Key::ArrowRight, 10));
    assert_eq!(focused_id(&widget), "0:0");
    assert!(widget.take_events().is_empty(), "no toggle happened");
}

#[test]
fn right_arrow_expands_collapsed_branch_in_place() {
    let mut widget = CbxTree::new(pantry());
    let berries = widget.tree().lookup("0:1").unwrap();
    widget.toggle_expand(berries);
    widget.take_events();

    assert!(widget.handle_key(Key::ArrowRight, 10));
    assert_eq!(focused_id(&widget), "0:1", "expansion keeps focus on the branch");
    assert_eq!(visible_ids(&widget).len(), 7);
    assert_eq!(
        widget.take_events(),
        vec![TreeEvent::Toggled {
            value: "berries".into(),
            title: "Berries".into(),
            expanded: true,
        }]
    );
}

#[test]
fn right_arrow_on_leaf_is_consumed_without_effect() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::End, 10);
    assert_eq!(focused_id(&widget), "2");

    assert!(widget.handle_key(Key::ArrowRight, 10));
    assert_eq!(focused_id(&widget), "2");
    assert!(widget.take_events().is_empty());
}

#[test]
fn left_arrow_collapses_expanded_branch() {
    let mut widget = CbxTree::new(pantry());
    assert_eq!(focused_id(&widget), "0");

    assert!(widget.handle_key(Key::ArrowLeft, 10));
    assert_eq!(visible_ids(&widget), vec!["0", "1", "2"]);
    assert_eq!(focused_id(&widget), "0");
    assert_eq!(
        widget.take_events(),
        vec![TreeEvent::Toggled {
            value: "produce".into(),
            title: "Produce".into(),
            expanded: false,
        }]
    );
}

#[test]
fn left_arrow_on_leaf_climbs_to_parent() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::ArrowDown, 10);
    assert_eq!(focused_id(&widget), "0:0");

    assert!(widget.handle_key(Key::ArrowLeft, 10));
    assert_eq!(focused_id(&widget), "0");
    assert!(widget.take_events().is_empty(), "climbing is not a toggle");
}

#[test]
fn left_arrow_on_collapsed_top_level_branch_stays_put() {
    let mut widget = CbxTree::new(pantry());
    let dairy = widget.tree().lookup("1").unwrap();
    widget.handle_hover(dairy);

    // Dairy loads on demand, so it renders collapsed; there is no parent.
    assert!(widget.handle_key(Key::ArrowLeft, 10));
    assert_eq!(focused_id(&widget), "1");
    assert!(widget.take_events().is_empty());
}

// ============================================================================
// 4. Page Up/Down
// ============================================================================

#[test]
fn page_down_moves_viewport_minus_one_and_clamps() {
    let mut widget = CbxTree::new(pantry());
    assert_eq!(focused_id(&widget), "0");

    // 7 visible rows, viewport of 4: each page is a 3-row hop.
    assert!(widget.handle_key(Key::PageDown, 4));
    assert_eq!(focused_id(&widget), "0:1:0");

    assert!(widget.handle_key(Key::PageDown, 4));
    assert_eq!(focused_id(&widget), "2");

    assert!(widget.handle_key(Key::PageDown, 4));
    assert_eq!(focused_id(&widget), "2", "page down clamps at the last row");
}

#[test]
fn page_up_mirrors_page_down() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::End, 4);

    assert!(widget.handle_key(Key::PageUp, 4));
    assert_eq!(focused_id(&widget), "0:1:0");

    assert!(widget.handle_key(Key::PageUp, 100));
    assert_eq!(focused_id(&widget), "0", "page up clamps at the first row");
}

#[test]
fn paging_with_hidden_focus_starts_from_first_row() {
    let mut widget = CbxTree::new(pantry());
    let blueberry = widget.tree().lookup("0:1:1").unwrap();
    widget.handle_hover(blueberry);
    widget.toggle_all_expanded(Some(false));

    assert!(widget.handle_key(Key::PageDown, 2));
    assert_eq!(focused_id(&widget), "1");
}

// ============================================================================
// 5. Enter and Space
// ============================================================================

#[test]
fn enter_toggles_branch_and_reports_it() {
    let mut widget = CbxTree::new(pantry());
    let berries = widget.tree().lookup("0:1").unwrap();
    widget.handle_hover(berries);

    assert!(widget.handle_key(Key::Enter, 10));
    assert!(widget.tree().is_collapsed(berries));
    assert_eq!(
        widget.take_events(),
        vec![TreeEvent::Toggled {
            value: "berries".into(),
            title: "Berries".into(),
            expanded: false,
        }]
    );

    assert!(widget.handle_key(Key::Enter, 10));
    assert!(!widget.tree().is_collapsed(berries));
}

#[test]
fn enter_on_leaf_is_consumed_without_toggle() {
    let mut widget = CbxTree::new(pantry());
    widget.handle_key(Key::End, 10);

    assert!(widget.handle_key(Key::Enter, 10));
    assert!(widget.take_events().is_empty(), "leaves have nothing to toggle");
}

#[test]
fn space_checks_and_unchecks_the_focused_subtree() {
    let mut widget = CbxTree::new(pantry());
    let produce = widget.tree().lookup("0").unwrap();

    assert!(widget.handle_key(Key::Space, 10));
    assert_eq!(widget.tree().state(produce), CheckState::Checked);
    assert_eq!(widget.form_entries().count(), 5);
    assert_eq!(widget.take_events(), vec![TreeEvent::Changed]);

    assert!(widget.handle_key(Key::Space, 10));
    assert_eq!(widget.tree().state(produce), CheckState::Unchecked);
    assert_eq!(widget.form_entries().count(), 0);
    assert_eq!(widget.take_events(), vec![TreeEvent::Changed]);
}

#[test]
fn space_on_indeterminate_branch_checks_it() {
    let mut widget = CbxTree::new(pantry());
    let berries = widget.tree().lookup("0:1").unwrap();
    let blackberry = widget.tree().lookup("0:1:0").unwrap();
    let blueberry = widget.tree().lookup("0:1:1").unwrap();

    widget.handle_check(blackberry, true);
    widget.take_events();
    assert_eq!(widget.tree().state(berries), CheckState::Indeterminate);

    // An indeterminate checkbox reads as "not checked": Space completes it.
    widget.handle_hover(berries);
    assert!(widget.handle_key(Key::Space, 10));
    assert_eq!(widget.tree().state(berries), CheckState::Checked);
    assert_eq!(widget.tree().state(blueberry), CheckState::Checked);
    assert_eq!(widget.take_events(), vec![TreeEvent::Changed]);
}

// ============================================================================
// 6. Disabled Widget
// ============================================================================

#[test]
fn disabled_widget_consumes_no_keys() {
    let mut widget = CbxTree::new(pantry()).with_disabled(true);

    let keys = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::PageUp,
        Key::PageDown,
        Key::Home,
        Key::End,
        Key::Enter,
        Key::Space,
    ];
    for key in keys {
        assert!(!widget.handle_key(key, 10), "disabled must not consume {key:?}");
    }

    assert_eq!(focused_id(&widget), "0", "focus never moved");
    assert!(widget.take_events().is_empty());
    assert_eq!(widget.form_entries().count(), 0);
}

#![forbid(unsafe_code)]

//! Interactive checkbox-tree widget over `cbxtree-core`.
//!
//! # Role
//!
//! The interaction layer of the checkbox-tree form control: a focus cursor,
//! the tree keyboard map, expand/collapse with on-demand subtree loading,
//! JSON content hooks and form participation. The selection semantics live
//! in [`cbxtree_core`]; this crate decides what a key press, hover or click
//! means and tells the host what happened.
//!
//! # This crate provides
//!
//! - [`CbxTree`] — the widget: build it from records or JSON, feed it keys
//!   and pointer gestures, render from [`CbxTree::rows`], drain
//!   [`TreeEvent`]s, submit [`CbxTree::form_entries`].
//! - [`Row`] / [`Disclosure`] — the flattened visible-row projection a
//!   renderer draws from, one entry per visible item.
//! - [`Key`] / [`TreeEvent`] — the input and output vocabulary between host
//!   and widget.
//!
//! # How it fits
//!
//! The widget is deliberately host-agnostic: it never draws and never
//! performs I/O. Subtree loading is split at the suspension point — the
//! widget emits [`TreeEvent::SubtreeRequested`], the host fetches, and
//! completion re-enters through [`CbxTree::resolve_subtree`] or
//! [`CbxTree::abort_subtree`].
//!
//! ```
//! use cbxtree_widget::{CbxTree, Key, RawItem, TreeEvent};
//!
//! let mut widget = CbxTree::new(vec![
//!     RawItem::new("Fruits", "fruits").children(vec![RawItem::new("Apple", "apple")]),
//! ])
//! .with_name("groceries");
//!
//! widget.handle_key(Key::ArrowDown, 10);
//! widget.handle_key(Key::Space, 10);
//!
//! assert_eq!(widget.take_events(), vec![TreeEvent::Changed]);
//! assert_eq!(
//!     widget.form_entries().collect::<Vec<_>>(),
//!     vec![("groceries", "apple"), ("groceries", "fruits")],
//! );
//! ```

/// Input keys and outbound notifications.
pub mod event;
/// The flattened visible-row projection.
pub mod rows;
/// The widget itself.
pub mod widget;

pub use cbxtree_core::{
    AttachError, CheckState, InputError, NodeId, RawChildren, RawItem, SubtreeKind, Tree,
};
pub use event::{Key, TreeEvent};
pub use rows::{Disclosure, Row};
pub use widget::CbxTree;

#![forbid(unsafe_code)]

//! Tri-state checkbox tree selection model.
//!
//! # Role
//!
//! The data layer of a checkbox-tree form control: hierarchical items with
//! checked / unchecked / indeterminate states, selection that propagates to
//! descendants and ancestors, and branches whose subtrees load on demand.
//! Rendering, input handling and form plumbing live one layer up (see the
//! companion widget crate); this crate owns the facts.
//!
//! # This crate provides
//!
//! - [`RawItem`] / [`RawChildren`] — the JSON interchange records, with the
//!   load-bearing absent / `null` / list distinction of the `children` field.
//! - [`Tree`] — the arena: positional path ids, derived tri-states, the
//!   descendants-then-ancestors selection synchronizer, bulk operations,
//!   one-shot lazy attachment and raw round-tripping.
//! - [`InputError`] / [`AttachError`] — typed failures for the JSON boundary
//!   and the attach precondition.
//!
//! # How it fits
//!
//! A host parses records with [`parse_items`], builds a [`Tree`], renders
//! from [`ItemView`]s, routes user toggles through [`Tree::set_checked`],
//! and serializes back with [`Tree::to_raw`]. States are always derived from
//! the selection set, never stored, so reads are consistent at any point
//! between mutations.
//!
//! ```
//! use cbxtree_core::{CheckState, RawItem, Tree};
//!
//! let mut tree = Tree::new(vec![RawItem::new("Fruits", "fruits").children(vec![
//!     RawItem::new("Apple", "apple"),
//!     RawItem::new("Pear", "pear"),
//! ])]);
//!
//! let apple = tree.lookup("0:0").unwrap();
//! tree.set_checked(apple, true);
//!
//! assert_eq!(tree.state(tree.lookup("0").unwrap()), CheckState::Indeterminate);
//! assert_eq!(tree.selected_values().collect::<Vec<_>>(), vec!["apple"]);
//! ```

/// Typed errors for input parsing and lazy attachment.
pub mod error;
/// Raw JSON records and the document parser.
pub mod raw;
/// The arena tree, state derivation and selection synchronization.
pub mod tree;

pub use error::{AttachError, InputError};
pub use raw::{RawChildren, RawItem, parse_items};
pub use tree::{CheckState, ChildViews, ItemView, Iter, NodeId, SubtreeKind, Tree};

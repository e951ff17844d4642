//! An unbalanced binary search multimap with parent back-references.
//!
//! [`LinkedTree`] maps `i64` keys to a [`ValueList`] of payloads. Inserting an
//! existing key adds the payload to the front of that key's list rather than
//! creating a second node. Nodes keep a link to their parent as well as their
//! children, which is what lets the traversal cursors resume a walk one key at a
//! time without recursion.
//!
//! # Example
//!
//! ```
//! use linked_tree::{KeyCursor, LinkedTree, Traversal};
//!
//! let mut tree = LinkedTree::new();
//! for key in [37, 26, 42, 13, 35, 56, 30, 47, 70] {
//!     tree.insert(key, key * 100);
//! }
//!
//! // Cursors advance on demand.
//! let mut cursor = tree.preorder();
//! assert_eq!(cursor.next_key(), Ok(37));
//! assert_eq!(cursor.next_key(), Ok(26));
//!
//! // Traversals can be written out in any order.
//! let mut out = String::new();
//! tree.write_keys(Traversal::Inorder, &mut out).unwrap();
//! assert_eq!(out, "13 26 30 35 37 42 47 56 70");
//!
//! assert_eq!(tree.depth(13), Some(2));
//! assert_eq!(tree.delete_max(), Some(70));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Arena storage** - Nodes live in one slot vector and refer to each other by
//!   index, so parent links are plain copies rather than shared ownership
//! - **Resumable cursors** - [`Preorder`] and [`Inorder`] implement [`KeyCursor`]
//!   as well as [`Iterator`]
//!
//! # Implementation
//!
//! The tree is never rebalanced; its height depends entirely on insertion order.
//! Deleting a key with two children moves the in-order successor (the minimum of
//! the right subtree) into its place.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod linked_tree;
pub mod value_list;

pub use error::{Error, Result};
pub use linked_tree::{Inorder, KeyCursor, LevelOrder, LinkedTree, Postorder, Preorder, Traversal};
pub use value_list::ValueList;

/// The key type: a signed integer, unique within one tree.
pub type Key = i64;

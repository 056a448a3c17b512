//! An arena-backed red-black tree map for Rust.
//!
//! This crate provides [`RedBlackTreeMap`], an ordered key-value container
//! that stays balanced under any insertion order, plus read-only analytics
//! describing the shape of the tree:
//!
//! - [`height`](RedBlackTreeMap::height), [`diameter`](RedBlackTreeMap::diameter),
//!   [`max_width`](RedBlackTreeMap::max_width) - Size of the tree in each direction
//! - [`leaf_count`](RedBlackTreeMap::leaf_count),
//!   [`internal_node_count`](RedBlackTreeMap::internal_node_count),
//!   [`null_count`](RedBlackTreeMap::null_count) - What the tree is made of
//! - [`successful_search_cost`](RedBlackTreeMap::successful_search_cost),
//!   [`unsuccessful_search_cost`](RedBlackTreeMap::unsuccessful_search_cost) - Average probes per lookup
//!
//! # Example
//!
//! ```
//! use rb_tree::{RedBlackTreeMap, TreeError};
//!
//! let mut tree = RedBlackTreeMap::new();
//! for (key, value) in [(5, "e"), (2, "b"), (8, "h"), (1, "a"), (3, "c")] {
//!     tree.insert(key, value).unwrap();
//! }
//!
//! // Keys are unique.
//! assert_eq!(tree.insert(5, "again"), Err(TreeError::DuplicateKey(5)));
//! assert_eq!(tree.len(), 5);
//!
//! // Cursor-style traversal.
//! let mut keys = Vec::new();
//! let mut at = tree.begin();
//! while let Some(key) = tree.key_at(at) {
//!     keys.push(*key);
//!     at = tree.advance(at).unwrap();
//! }
//! assert_eq!(keys, [1, 2, 3, 5, 8]);
//!
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.leaf_count() + tree.internal_node_count(), tree.len());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Insert-only** - Entries are never removed individually, so positions stay valid
//! - **No stack recursion** - Every walk keeps an explicit stack
//!
//! # Implementation
//!
//! Nodes live in a single arena and refer to each other (left, right and
//! parent) by index, so rotations are a handful of index updates rather than
//! pointer surgery. Duplicate keys skipped by bulk insertion are reported
//! through the [`log`] facade.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
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

mod color;
mod error;
mod position;
mod raw;

pub mod rbtree_map;

pub use color::Color;
pub use error::TreeError;
pub use position::Position;
pub use rbtree_map::RedBlackTreeMap;

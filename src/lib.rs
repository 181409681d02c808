//! # An ordered map kept balanced as a red-black tree
//!
//! `rbtree-map` maps fixed-width unsigned keys to owned payloads.  The map is
//! a classic red-black tree with a shared black sentinel standing in for every
//! absent child: insertion and deletion rebalance with the usual recoloring
//! and rotation cases, and lookups, minimum/maximum, and successor/predecessor
//! walks are bounded by the tree height.
//!
//! Inserting an existing key replaces its payload in place.  Errors are
//! returned as [`Error`] values; [`RbTree::check`] verifies the red-black
//! invariants and reports the first broken one as a [`Violation`].
//!
//! ```
//! use rbtree_map::RbTree;
//!
//! let mut t = RbTree::new();
//! for k in [10, 35, 5, 22] {
//!     t.insert(k, k.to_string()).unwrap();
//! }
//!
//! let mut keys = vec![];
//! let mut n = t.minimum();
//! while let Some(node) = n {
//!     keys.push(node.key());
//!     n = node.successor();
//! }
//! assert_eq!(keys, [5, 10, 22, 35]);
//! assert_eq!(t.check(), Ok(t.black_height()));
//! ```

mod error;
pub use error::Error;

mod rbtree;
pub use rbtree::{Iter, Key, NodeId, NodeRef, RbTree, Violation};

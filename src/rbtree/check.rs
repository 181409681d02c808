use std::fmt;

use super::node::Color;
use super::{Key, RbTree, NIL};

/// A broken red-black or bookkeeping invariant found by [`RbTree::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The sentinel is no longer black.
    RecoloredSentinel,
    /// The root is red.
    RedRoot { key: Key },
    /// The root's parent link does not point at the sentinel.
    RootHasParent { key: Key },
    /// A key is outside the range its ancestors allow.
    OutOfOrder { key: Key },
    /// A red node has a red child.
    RedRedEdge { parent: Key, child: Key },
    /// The two subtrees of a node have different black-heights.
    BlackHeightMismatch { key: Key, left: usize, right: usize },
    /// A child's parent link does not point back at its parent.
    BrokenParentLink { parent: Key, child: Key },
    /// A freed arena slot is still linked into the tree.
    DeadSlotLinked { index: usize },
    /// The cached length disagrees with the number of reachable nodes.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecoloredSentinel => write!(f, "sentinel is not black"),
            Self::RedRoot { key } => write!(f, "root {key} is red"),
            Self::RootHasParent { key } => {
                write!(f, "root {key} has a parent link")
            }
            Self::OutOfOrder { key } => write!(f, "key {key} is out of order"),
            Self::RedRedEdge { parent, child } => {
                write!(f, "red node {parent} has red child {child}")
            }
            Self::BlackHeightMismatch { key, left, right } => write!(
                f,
                "node {key} has black-heights {left} (left) and {right} (right)"
            ),
            Self::BrokenParentLink { parent, child } => {
                write!(f, "child {child} does not link back to parent {parent}")
            }
            Self::DeadSlotLinked { index } => {
                write!(f, "freed slot {index} is still linked")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "tree claims {expected} nodes, {found} are reachable")
            }
        }
    }
}

impl std::error::Error for Violation {}

impl<V> RbTree<V> {
    /// Verifies every structural invariant and returns the tree's
    /// black-height.
    ///
    /// Checks key order, a black root, no red node with a red child, equal
    /// black-heights on both sides of every node, parent links agreeing with
    /// child links, and the cached length.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// for k in 0..100 {
    ///     t.insert(k, ()).unwrap();
    /// }
    /// assert_eq!(t.check(), Ok(t.black_height()));
    /// ```
    pub fn check(&self) -> Result<usize, Violation> {
        if self.nodes[NIL].color != Color::Black {
            return Err(Violation::RecoloredSentinel);
        }

        if self.root == NIL {
            return match self.len {
                0 => Ok(0),
                n => Err(Violation::LengthMismatch {
                    expected: n,
                    found: 0,
                }),
            };
        }

        let root = &self.nodes[self.root];
        if root.color == Color::Red {
            return Err(Violation::RedRoot { key: root.key });
        }
        if root.parent != NIL {
            return Err(Violation::RootHasParent { key: root.key });
        }

        let (found, bh) = self.chk_node(self.root, None, None)?;
        if found != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                found,
            });
        }

        Ok(bh)
    }

    // Checks the subtree at real node `i`, whose keys must lie strictly
    // between `lo` and `hi`.  Returns its node count and black-height.
    fn chk_node(
        &self,
        i: usize,
        lo: Option<Key>,
        hi: Option<Key>,
    ) -> Result<(usize, usize), Violation> {
        let n = &self.nodes[i];
        if !n.is_live() {
            return Err(Violation::DeadSlotLinked { index: i });
        }

        let above_lo = lo.map_or(true, |lo| lo < n.key);
        let below_hi = hi.map_or(true, |hi| n.key < hi);
        if !(above_lo && below_hi) {
            return Err(Violation::OutOfOrder { key: n.key });
        }

        let (lf_len, lf_bh) = self.chk_child(i, n.left, lo, Some(n.key))?;
        let (rt_len, rt_bh) = self.chk_child(i, n.right, Some(n.key), hi)?;

        if lf_bh != rt_bh {
            return Err(Violation::BlackHeightMismatch {
                key: n.key,
                left: lf_bh,
                right: rt_bh,
            });
        }

        Ok((lf_len + rt_len + 1, lf_bh))
    }

    // Checks child `c` of `p` and returns its node count plus the black nodes
    // it contributes to `p`'s black-height (the sentinel contributes one).
    fn chk_child(
        &self,
        p: usize,
        c: usize,
        lo: Option<Key>,
        hi: Option<Key>,
    ) -> Result<(usize, usize), Violation> {
        if c == NIL {
            return Ok((0, 1));
        }

        let (parent, child) = (&self.nodes[p], &self.nodes[c]);
        if child.parent != p {
            return Err(Violation::BrokenParentLink {
                parent: parent.key,
                child: child.key,
            });
        }
        if parent.color == Color::Red && child.color == Color::Red {
            return Err(Violation::RedRedEdge {
                parent: parent.key,
                child: child.key,
            });
        }

        let (len, bh) = self.chk_node(c, lo, hi)?;
        Ok((len, bh + (child.color == Color::Black) as usize))
    }
}

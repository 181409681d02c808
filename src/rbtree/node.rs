use std::fmt::{Debug, Formatter};

use super::{Key, RbTree, NIL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Color {
    Red,
    Black,
}

impl Color {
    fn tag(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }
}

// Which child slot of a parent we are talking about.  The fixups are written
// once against `side` and `side.flip()` instead of once per direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

impl Side {
    pub(super) fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// An arena slot.  Slot `NIL` is the sentinel: black, keyless, payload-less.
// A freed slot also has no payload and sits on the tree's free list until an
// insert reuses it.  Every node reachable from the root holds a payload.
pub(super) struct Node<V> {
    pub(super) color: Color,
    pub(super) key: Key,
    pub(super) payload: Option<V>,
    pub(super) left: usize,
    pub(super) right: usize,
    pub(super) parent: usize,
}

impl<V> Node<V> {
    pub(super) fn sentinel() -> Self {
        Node {
            color: Color::Black,
            key: Key::MAX,
            payload: None,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }

    // New nodes start red with both children pointing at the sentinel.
    pub(super) fn new(key: Key, payload: V) -> Self {
        Node {
            color: Color::Red,
            key,
            payload: Some(payload),
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }

    pub(super) fn child(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(super) fn child_mut(&mut self, side: Side) -> &mut usize {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(super) fn is_live(&self) -> bool {
        self.payload.is_some()
    }
}

/// An opaque handle naming a node of an [`RbTree`].
///
/// Handles stay meaningful until the node they name is deleted.  Passing the
/// handle of a deleted node back to the tree yields
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument), unless the slot
/// has been reused by a later insert, in which case the handle names the new
/// node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) usize);

/// A read-only view of one node of an [`RbTree`].
///
/// Exposes the node's key and payload plus in-order navigation.  Links cannot
/// be modified through a `NodeRef`.
pub struct NodeRef<'a, V> {
    pub(super) tree: &'a RbTree<V>,
    pub(super) id: usize,
    pub(super) key: Key,
    pub(super) payload: &'a V,
}

impl<'a, V> Clone for NodeRef<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for NodeRef<'a, V> {}

impl<'a, V> NodeRef<'a, V> {
    /// The node's handle, usable with the tree's id-based operations.
    pub fn id(&self) -> NodeId {
        NodeId(self.id)
    }

    /// The key stored in this node.
    pub fn key(&self) -> Key {
        self.key
    }

    /// The payload stored under this node's key.
    pub fn payload(&self) -> &'a V {
        self.payload
    }

    /// The node holding the next larger key, or `None` if this is the maximum.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// t.insert(1, "a").unwrap();
    /// t.insert(2, "b").unwrap();
    /// let one = t.search(1).unwrap();
    /// assert_eq!(one.successor().map(|n| n.key()), Some(2));
    /// assert!(one.successor().unwrap().successor().is_none());
    /// ```
    pub fn successor(&self) -> Option<NodeRef<'a, V>> {
        self.tree.node_ref(self.tree.successor_of(self.id))
    }

    /// The node holding the next smaller key, or `None` if this is the minimum.
    pub fn predecessor(&self) -> Option<NodeRef<'a, V>> {
        self.tree.node_ref(self.tree.predecessor_of(self.id))
    }

    /// The smallest key in the subtree rooted here.
    pub fn subtree_minimum(&self) -> NodeRef<'a, V> {
        self.tree
            .node_ref(self.tree.minimum_of(self.id))
            .unwrap_or(*self)
    }

    /// The largest key in the subtree rooted here.
    pub fn subtree_maximum(&self) -> NodeRef<'a, V> {
        self.tree
            .node_ref(self.tree.maximum_of(self.id))
            .unwrap_or(*self)
    }

    /// Black nodes on any path from this node down to the sentinel, not
    /// counting this node and counting the sentinel.
    pub fn black_height(&self) -> usize {
        self.tree.black_height_at(self.id)
    }
}

impl<'a, V: Debug> Debug for NodeRef<'a, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key)
            .field("payload", self.payload)
            .finish()
    }
}

impl<V: Debug> RbTree<V> {
    // Prints the subtree at `i` as `(C {key: payload} left right)`, with `.`
    // standing for the sentinel.
    pub(super) fn fmt_subtree(
        &self,
        i: usize,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        let n = &self.nodes[i];
        let payload = match (i, n.payload.as_ref()) {
            (NIL, _) | (_, None) => return f.write_str("."),
            (_, Some(p)) => p,
        };

        f.write_fmt(format_args!(
            "({} {{{:?}: {:?}}} ",
            n.color.tag(),
            n.key,
            payload
        ))?;
        self.fmt_subtree(n.left, f)?;
        f.write_str(" ")?;
        self.fmt_subtree(n.right, f)?;
        f.write_str(")")
    }
}

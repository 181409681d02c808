#![warn(missing_docs)]
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};

use log::{debug, trace, warn};

use crate::Error;

mod check;
mod iter;
mod node;

pub use check::Violation;
pub use iter::Iter;
use node::{Color, Node, Side};
pub use node::{NodeId, NodeRef};

/// Keys are fixed-width unsigned integers ordered numerically.
pub type Key = u64;

// Index of the sentinel in the node arena.
const NIL: usize = 0;

#[cfg(test)]
macro_rules! chk_tree {
    ( $t:expr ) => {{
        if let Err(v) = $t.check() {
            panic!("red-black check failed: {}", v);
        }
    }};
}

#[cfg(not(test))]
macro_rules! chk_tree {
    ( $t:expr ) => {{
        let _ = &$t;
    }};
}

/// An ordered map from [`Key`]s to owned payloads, kept balanced as a
/// red-black tree.
///
/// Inserting a key that is already present replaces its payload in place; the
/// tree never holds two nodes with the same key.  Every operation is bounded
/// by the tree height, which never exceeds `2 * log2(n + 1)` for `n` entries.
///
/// Nodes live in an arena owned by the tree.  Links between nodes are arena
/// indices, and index 0 names a single black sentinel that stands in
/// for every absent child and for the root's parent.  Parent links are plain
/// back-references; a node is owned only by the arena.
///
/// The tree is not synchronized.  Callers sharing one across threads must
/// serialize access themselves.
pub struct RbTree<V> {
    nodes: Vec<Node<V>>,
    // freed arena slots, reused by later inserts
    free: Vec<usize>,
    root: usize,
    len: usize,
}

impl<V> RbTree<V> {
    /// Creates an empty tree holding only its sentinel.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    /// let t: RbTree<String> = RbTree::new();
    /// assert!(t.is_empty());
    /// assert!(t.minimum().is_none());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` entries before the
    /// arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::sentinel());
        RbTree {
            nodes,
            free: Vec::with_capacity(capacity),
            root: NIL,
            len: 0,
        }
    }

    /// Creates an empty tree, reporting allocation failure instead of
    /// aborting.
    pub fn try_new() -> Result<Self, Error> {
        Self::try_with_capacity(0)
    }

    /// Like [`with_capacity`](Self::with_capacity), but reports allocation
    /// failure as [`Error::AllocationFailure`].  Nothing stays allocated when
    /// it fails.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::{Error, RbTree};
    ///
    /// let t: RbTree<u8> = RbTree::try_with_capacity(16).unwrap();
    /// assert!(t.is_empty());
    /// let huge = RbTree::<u8>::try_with_capacity(usize::MAX);
    /// assert_eq!(huge.err(), Some(Error::AllocationFailure));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut nodes = Vec::new();
        let mut free = Vec::new();
        let reserved = match capacity.checked_add(1) {
            Some(slots) => {
                nodes.try_reserve_exact(slots).is_ok()
                    && free.try_reserve_exact(capacity).is_ok()
            }
            None => false,
        };

        if !reserved {
            warn!("could not reserve a tree for {capacity} entries");
            return Err(Error::AllocationFailure);
        }

        nodes.push(Node::sentinel());
        Ok(RbTree {
            nodes,
            free,
            root: NIL,
            len: 0,
        })
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry, leaving an empty tree.
    ///
    /// Nodes are released in post-order, each node's payload before the node.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.len);
        self.release_subtree(self.root);
        self.nodes.truncate(1);
        self.nodes[NIL] = Node::sentinel();
        self.free.clear();
        self.root = NIL;
        self.len = 0;
    }

    fn release_subtree(&mut self, i: usize) {
        if i == NIL {
            return;
        }

        let (left, right) = (self.nodes[i].left, self.nodes[i].right);
        self.release_subtree(left);
        self.release_subtree(right);
        drop(self.nodes[i].payload.take());
    }

    //
    // Search
    //

    // Returns the index of the node holding `key`, or NIL.
    fn find(&self, key: Key) -> usize {
        let mut curr = self.root;
        while curr != NIL {
            let n = &self.nodes[curr];
            match key.cmp(&n.key) {
                Less => curr = n.left,
                Equal => return curr,
                Greater => curr = n.right,
            }
        }

        NIL
    }

    /// Finds the node holding `key`.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// t.insert(7, "seven").unwrap();
    /// let n = t.search(7).unwrap();
    /// assert_eq!((n.key(), *n.payload()), (7, "seven"));
    /// assert!(t.search(8).is_none());
    /// ```
    pub fn search(&self, key: Key) -> Option<NodeRef<'_, V>> {
        self.node_ref(self.find(key))
    }

    /// Returns a reference to the payload stored under `key`.
    pub fn get(&self, key: Key) -> Option<&V> {
        self.nodes[self.find(key)].payload.as_ref()
    }

    /// Returns a mutable reference to the payload stored under `key`.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let i = self.find(key);
        self.nodes[i].payload.as_mut()
    }

    /// Tests if the tree holds an entry for `key`.
    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key) != NIL
    }

    // Builds a view of node `i`; None for the sentinel or a freed slot.
    fn node_ref(&self, i: usize) -> Option<NodeRef<'_, V>> {
        if i == NIL {
            return None;
        }

        let n = self.nodes.get(i)?;
        n.payload.as_ref().map(|payload| NodeRef {
            tree: self,
            id: i,
            key: n.key,
            payload,
        })
    }

    // Maps a caller's handle to the index of a live node.
    fn live(&self, id: NodeId) -> Result<usize, Error> {
        match self.nodes.get(id.0) {
            Some(n) if id.0 != NIL && n.is_live() => Ok(id.0),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Returns a view of the node named by `id`.
    pub fn node(&self, id: NodeId) -> Result<NodeRef<'_, V>, Error> {
        let i = self.live(id)?;
        self.node_ref(i).ok_or(Error::InvalidArgument)
    }

    /// Returns the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, V>> {
        self.node_ref(self.root)
    }

    //
    // Link helpers.  All of them treat NIL as an ordinary black node whose
    // own links are never read for navigation.
    //

    fn color(&self, i: usize) -> Color {
        self.nodes[i].color
    }

    fn set_color(&mut self, i: usize, color: Color) {
        debug_assert!(i != NIL || color == Color::Black);
        self.nodes[i].color = color;
    }

    fn parent(&self, i: usize) -> usize {
        self.nodes[i].parent
    }

    fn child(&self, i: usize, side: Side) -> usize {
        self.nodes[i].child(side)
    }

    // Which side of its parent the real node `i` hangs from.
    fn side_of(&self, i: usize) -> Side {
        if self.nodes[self.parent(i)].left == i {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points the slot of `parent` that held `old` at `new` instead, or the
    // root if `parent` is NIL.  Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: usize, old: usize, new: usize) {
        if parent == NIL {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            self.nodes[parent].right = new;
        }
    }

    //
    // Rotations
    //

    // Rotates the subtree at `x` toward `side`.  A left rotation promotes
    // x's right child y:
    //
    //      x               y
    //     / \             / \
    //    a   y    =>     x   c
    //       / \         / \
    //      b   c       a   b
    //
    // b changes parents; a and c do not.  Colors are untouched.
    fn rotate(&mut self, x: usize, side: Side) {
        let y = self.child(x, side.flip());
        debug_assert!(y != NIL, "rotating toward a missing child");
        trace!("rotate {:?} at {}", side, self.nodes[x].key);

        // move b from y to x
        let b = self.child(y, side);
        *self.nodes[x].child_mut(side.flip()) = b;
        if b != NIL {
            self.nodes[b].parent = x;
        }

        // install y where x was
        let xp = self.parent(x);
        self.nodes[y].parent = xp;
        self.replace_child(xp, x, y);

        // make x y's child
        *self.nodes[y].child_mut(side) = x;
        self.nodes[x].parent = y;
    }

    //
    // Insertion
    //

    // Stores a new red node in the arena and returns its index.  Fails
    // without touching the tree if the arena cannot grow.
    fn alloc_node(&mut self, key: Key, payload: V) -> Result<usize, Error> {
        if let Some(i) = self.free.pop() {
            self.nodes[i] = Node::new(key, payload);
            return Ok(i);
        }

        // The free list must be able to hold every slot, so that delete
        // never has to allocate.
        let free_room = self.nodes.len() - self.free.len();
        if self.nodes.try_reserve(1).is_err()
            || self.free.try_reserve(free_room).is_err()
        {
            warn!("allocation failed while inserting key {key}");
            return Err(Error::AllocationFailure);
        }

        self.nodes.push(Node::new(key, payload));
        Ok(self.nodes.len() - 1)
    }

    /// Inserts `payload` under `key`.
    ///
    /// If the key is already present its payload is replaced in place and the
    /// old payload is returned; the tree's shape does not change.  Otherwise a
    /// new node is linked in and the tree is rebalanced.
    ///
    /// On [`Error::AllocationFailure`] the tree is unchanged and `payload` is
    /// dropped.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// assert_eq!(t.insert(3, "a"), Ok(None));
    /// assert_eq!(t.insert(3, "b"), Ok(Some("a")));
    /// assert_eq!(t.len(), 1);
    /// assert_eq!(t.get(3), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: Key, payload: V) -> Result<Option<V>, Error> {
        let mut parent = NIL;
        let mut side = Side::Left;
        let mut curr = self.root;
        while curr != NIL {
            let n = &mut self.nodes[curr];
            match key.cmp(&n.key) {
                Less => side = Side::Left,
                Equal => {
                    trace!("insert {key}: replacing payload");
                    return Ok(n.payload.replace(payload));
                }
                Greater => side = Side::Right,
            }
            parent = curr;
            curr = n.child(side);
        }

        let z = self.alloc_node(key, payload)?;
        debug!("insert {key}: new node in slot {z}");
        self.nodes[z].parent = parent;
        if parent == NIL {
            self.root = z;
        } else {
            *self.nodes[parent].child_mut(side) = z;
        }
        self.len += 1;

        self.insert_fixup(z);
        chk_tree!(self);
        Ok(None)
    }

    // Restores the red-black properties after linking the red node `z`.
    // While z's parent p is red, p is not the root, so z has a grandparent g.
    fn insert_fixup(&mut self, mut z: usize) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            let g = self.parent(p);
            let side = self.side_of(p);
            let uncle = self.child(g, side.flip());

            if self.color(uncle) == Color::Red {
                // case 1: push g's blackness down to p and the uncle
                trace!("insert fixup case 1 at {}", self.nodes[g].key);
                self.set_color(p, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(g, Color::Red);
                z = g;
                continue;
            }

            if z == self.child(p, side.flip()) {
                // case 2: z is an inner grandchild; make it an outer one
                trace!("insert fixup case 2 at {}", self.nodes[p].key);
                z = p;
                self.rotate(z, side);
            }

            // case 3: z is an outer grandchild
            let p = self.parent(z);
            let g = self.parent(p);
            trace!("insert fixup case 3 at {}", self.nodes[g].key);
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            self.rotate(g, side.flip());
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    //
    // Deletion
    //

    // Puts the subtree at `v` where the subtree at `u` was.  The sentinel's
    // parent link is never written.
    fn transplant(&mut self, u: usize, v: usize) {
        let up = self.parent(u);
        self.replace_child(up, u, v);
        if v != NIL {
            self.nodes[v].parent = up;
        }
    }

    // Returns slot `i` to the free list along with its payload.
    fn release(&mut self, i: usize) -> Option<V> {
        let n = &mut self.nodes[i];
        let payload = n.payload.take();
        n.left = NIL;
        n.right = NIL;
        n.parent = NIL;
        self.free.push(i);
        payload
    }

    /// Removes `key` and returns its payload.
    ///
    /// Returns [`Error::NotFound`] and leaves the tree unchanged if the key is
    /// absent.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::{Error, RbTree};
    ///
    /// let mut t = RbTree::new();
    /// t.insert(1, 'x').unwrap();
    /// assert_eq!(t.delete(1), Ok('x'));
    /// assert_eq!(t.delete(1), Err(Error::NotFound));
    /// ```
    pub fn delete(&mut self, key: Key) -> Result<V, Error> {
        let z = self.find(key);
        if z == NIL {
            trace!("delete {key}: not found");
            return Err(Error::NotFound);
        }

        // `x` takes the place of the node physically spliced out.  It may be
        // the sentinel, whose parent link is meaningless, so its parent is
        // tracked in `xp`.
        let mut removed = self.color(z);
        let x;
        let xp;
        let (zl, zr) = (self.nodes[z].left, self.nodes[z].right);
        if zl == NIL {
            x = zr;
            xp = self.parent(z);
            self.transplant(z, zr);
        } else if zr == NIL {
            x = zl;
            xp = self.parent(z);
            self.transplant(z, zl);
        } else {
            // z's successor y has no left child; splice y out and put it
            // where z was
            let y = self.minimum_of(zr);
            removed = self.color(y);
            x = self.nodes[y].right;
            if self.parent(y) == z {
                xp = y;
            } else {
                xp = self.parent(y);
                self.transplant(y, x);
                self.nodes[y].right = zr;
                self.nodes[zr].parent = y;
            }
            self.transplant(z, y);
            self.nodes[y].left = zl;
            self.nodes[zl].parent = y;
            let zc = self.color(z);
            self.set_color(y, zc);
        }

        if removed == Color::Black {
            self.delete_fixup(x, xp);
        }

        self.len -= 1;
        debug!("delete {key}: freed slot {z}");
        let payload = self.release(z);
        chk_tree!(self);
        payload.ok_or(Error::NotFound)
    }

    /// Removes `key` and returns its payload, or `None` if it was absent.
    pub fn remove(&mut self, key: Key) -> Option<V> {
        self.delete(key).ok()
    }

    // Resolves the extra black carried by `x` (child of `xp`) after a black
    // node was spliced out above it.
    fn delete_fixup(&mut self, mut x: usize, mut xp: usize) {
        while x != self.root && self.color(x) == Color::Black {
            // x is NIL only while its sibling is real, so comparing against
            // the left slot names x's side even when x is the sentinel
            let side = if self.nodes[xp].left == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut s = self.child(xp, side.flip());

            if self.color(s) == Color::Red {
                // case 1: make the sibling black
                trace!("delete fixup case 1 at {}", self.nodes[xp].key);
                self.set_color(s, Color::Black);
                self.set_color(xp, Color::Red);
                self.rotate(xp, side);
                s = self.child(xp, side.flip());
            }

            let near = self.child(s, side);
            let far = self.child(s, side.flip());
            let near_black = self.color(near) == Color::Black;
            if near_black && self.color(far) == Color::Black {
                // case 2: move the extra black up
                trace!("delete fixup case 2 at {}", self.nodes[xp].key);
                self.set_color(s, Color::Red);
                x = xp;
                xp = self.parent(x);
                continue;
            }

            if self.color(far) == Color::Black {
                // case 3: make the far nephew red
                trace!("delete fixup case 3 at {}", self.nodes[s].key);
                self.set_color(near, Color::Black);
                self.set_color(s, Color::Red);
                self.rotate(s, side.flip());
                s = self.child(xp, side.flip());
            }

            // case 4: absorb the extra black with a rotation
            trace!("delete fixup case 4 at {}", self.nodes[xp].key);
            let pc = self.color(xp);
            self.set_color(s, pc);
            self.set_color(xp, Color::Black);
            let far = self.child(s, side.flip());
            self.set_color(far, Color::Black);
            self.rotate(xp, side);
            x = self.root;
            xp = NIL;
        }

        if x != NIL {
            self.set_color(x, Color::Black);
        }
    }

    //
    // Traversal
    //

    // Leftmost node of the subtree at `i`; NIL for an empty subtree.
    fn minimum_of(&self, mut i: usize) -> usize {
        if i == NIL {
            return NIL;
        }
        while self.nodes[i].left != NIL {
            i = self.nodes[i].left;
        }
        i
    }

    fn maximum_of(&self, mut i: usize) -> usize {
        if i == NIL {
            return NIL;
        }
        while self.nodes[i].right != NIL {
            i = self.nodes[i].right;
        }
        i
    }

    // In-order neighbor of real node `i` toward `side`; NIL if there is none.
    fn neighbor_of(&self, mut i: usize, side: Side) -> usize {
        let c = self.child(i, side);
        if c != NIL {
            return match side {
                Side::Left => self.maximum_of(c),
                Side::Right => self.minimum_of(c),
            };
        }

        let mut p = self.parent(i);
        while p != NIL && i == self.child(p, side) {
            i = p;
            p = self.parent(p);
        }
        p
    }

    fn successor_of(&self, i: usize) -> usize {
        self.neighbor_of(i, Side::Right)
    }

    fn predecessor_of(&self, i: usize) -> usize {
        self.neighbor_of(i, Side::Left)
    }

    /// Returns the node with the smallest key.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// for k in [10, 35, 5, 22] {
    ///     t.insert(k, ()).unwrap();
    /// }
    /// assert_eq!(t.minimum().map(|n| n.key()), Some(5));
    /// assert_eq!(t.maximum().map(|n| n.key()), Some(35));
    /// ```
    pub fn minimum(&self) -> Option<NodeRef<'_, V>> {
        self.node_ref(self.minimum_of(self.root))
    }

    /// Returns the node with the largest key.
    pub fn maximum(&self) -> Option<NodeRef<'_, V>> {
        self.node_ref(self.maximum_of(self.root))
    }

    /// Returns the node with the smallest key in the subtree rooted at `id`.
    pub fn subtree_minimum(&self, id: NodeId) -> Result<NodeRef<'_, V>, Error> {
        let i = self.live(id)?;
        self.node_ref(self.minimum_of(i))
            .ok_or(Error::InvalidArgument)
    }

    /// Returns the node with the largest key in the subtree rooted at `id`.
    pub fn subtree_maximum(&self, id: NodeId) -> Result<NodeRef<'_, V>, Error> {
        let i = self.live(id)?;
        self.node_ref(self.maximum_of(i))
            .ok_or(Error::InvalidArgument)
    }

    /// Returns the in-order successor of the node named by `id`, or `None` if
    /// that node holds the largest key.
    pub fn successor(
        &self,
        id: NodeId,
    ) -> Result<Option<NodeRef<'_, V>>, Error> {
        let i = self.live(id)?;
        Ok(self.node_ref(self.successor_of(i)))
    }

    /// Returns the in-order predecessor of the node named by `id`, or `None`
    /// if that node holds the smallest key.
    pub fn predecessor(
        &self,
        id: NodeId,
    ) -> Result<Option<NodeRef<'_, V>>, Error> {
        let i = self.live(id)?;
        Ok(self.node_ref(self.predecessor_of(i)))
    }

    /// Creates an iterator over the entries, sorted by key.
    ///
    /// # Examples
    /// ```
    /// use rbtree_map::RbTree;
    ///
    /// let mut t = RbTree::new();
    /// for k in [3, 1, 2] {
    ///     t.insert(k, k * 10).unwrap();
    /// }
    /// let entries: Vec<_> = t.iter().collect();
    /// assert_eq!(entries, [(1, &10), (2, &20), (3, &30)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            next: self.minimum_of(self.root),
            len: self.len,
        }
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over the payloads in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    //
    // Shape
    //

    // Black nodes below `i` on its leftmost path, plus the sentinel.  Equal
    // to the count on every other downward path while the tree is valid.
    fn black_height_at(&self, i: usize) -> usize {
        if i == NIL {
            return 0;
        }

        let mut bh = 1;
        let mut curr = self.nodes[i].left;
        while curr != NIL {
            bh += (self.color(curr) == Color::Black) as usize;
            curr = self.nodes[curr].left;
        }
        bh
    }

    /// Returns the tree's black-height: the black nodes on any path from the
    /// root down to the sentinel, counting the sentinel but not the root.
    /// An empty tree has black-height 0.
    pub fn black_height(&self) -> usize {
        self.black_height_at(self.root)
    }

    /// Returns the black-height of the subtree rooted at `key`.
    pub fn black_height_of(&self, key: Key) -> Result<usize, Error> {
        match self.find(key) {
            NIL => Err(Error::NotFound),
            i => Ok(self.black_height_at(i)),
        }
    }

    /// Returns the number of nodes on the longest path from the root down to
    /// a leaf; 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.height_at(self.root)
    }

    fn height_at(&self, i: usize) -> usize {
        match i {
            NIL => 0,
            _ => {
                let n = &self.nodes[i];
                1 + self.height_at(n.left).max(self.height_at(n.right))
            }
        }
    }
}

impl<V> Drop for RbTree<V> {
    fn drop(&mut self) {
        self.release_subtree(self.root);
    }
}

impl<V> Default for RbTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for RbTree<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.root {
            NIL => f.write_str("RbTree(EMPTY)"),
            root => {
                f.write_fmt(format_args!("RbTree(#{}, ", self.len))?;
                self.fmt_subtree(root, f)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ins_test(ks: Vec<u16>) {
        let mut t = RbTree::new();
        for &k in ks.iter() {
            t.insert(k as Key, k).unwrap();
            // insert already runs check() under cfg(test)
        }
        let mut want = ks.clone();
        want.sort();
        want.dedup();
        assert!(t.keys().eq(want.iter().map(|&k| k as Key)));
    }

    fn rm_test(vs: Vec<(i8, u32)>) {
        let mut t = RbTree::new();
        let mut btree = std::collections::BTreeMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = (k % 32) as Key;
                    assert_eq!(t.insert(k, v).unwrap(), btree.insert(k, v));
                }

                0 | i8::MIN => (),

                _ => {
                    let k = (-k % 32) as Key;
                    assert_eq!(t.remove(k), btree.remove(&k));
                }
            }

            assert!(t.iter().map(|(k, v)| (k, *v)).eq(btree
                .iter()
                .map(|(&k, &v)| (k, v))));
        }
    }

    // systematically try deleting each key of t
    fn chk_all_removes(keys: &[Key]) {
        let build = || {
            let mut t = RbTree::new();
            for &k in keys {
                t.insert(k, k + 100).unwrap();
            }
            t
        };

        for &k in keys {
            let mut t = build();
            assert_eq!(t.delete(k), Ok(k + 100));
            assert!(!t.contains_key(k));
            assert_eq!(t.len(), keys.len() - 1);
        }
    }

    // Payload that counts its drops.
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn empty_tree() {
        let t: RbTree<()> = RbTree::new();
        assert_eq!(t.len(), 0);
        assert_eq!(t.black_height(), 0);
        assert_eq!(t.height(), 0);
        assert!(t.root().is_none());
        assert!(t.maximum().is_none());
        assert_eq!(format!("{:?}", t), "RbTree(EMPTY)");
    }

    #[test]
    fn rotate_preserves_order() {
        let mut t = RbTree::new();
        for k in [2, 1, 3] {
            t.insert(k, ()).unwrap();
        }
        let root = t.root;
        t.rotate(root, Side::Left);
        assert_eq!(t.nodes[t.root].key, 3);
        assert!(t.keys().eq([1, 2, 3]));
        let root = t.root;
        t.rotate(root, Side::Right);
        assert_eq!(t.nodes[t.root].key, 2);
        assert!(t.keys().eq([1, 2, 3]));
        assert_eq!(t.nodes[t.root].parent, NIL);
        assert_eq!(t.nodes[NIL].parent, NIL);
    }

    #[test]
    fn ascending_inserts() {
        ins_test((0..64).collect());
    }

    #[test]
    fn descending_inserts() {
        ins_test((0..64).rev().collect());
    }

    #[test]
    fn debug_dump() {
        let mut t = RbTree::new();
        for k in [2, 1, 3] {
            t.insert(k, k).unwrap();
        }
        assert_eq!(
            format!("{:?}", t),
            "RbTree(#3, (B {2: 2} (R {1: 1} . .) (R {3: 3} . .)))"
        );
    }

    #[test]
    fn rm_each_test() {
        // ascending and descending builds skew the fixups toward each side
        chk_all_removes(&(0..32).collect::<Vec<_>>());
        chk_all_removes(&(0..32).rev().collect::<Vec<_>>());
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![(101, 0), (100, 0), (1, 0), (-100, 0)]);
    }

    #[test]
    fn rm_test_regr2() {
        rm_test(vec![
            (99, 0),
            (1, 0),
            (103, 0),
            (3, 0),
            (98, 0),
            (2, 0),
            (8, 0),
            (4, 0),
            (5, 0),
            (6, 0),
            (7, 0),
            (102, 0),
            (9, 0),
            (97, 0),
            (-102, 0),
            (10, 0),
            (-97, 0),
        ]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut t = RbTree::new();
        for k in 0..8 {
            t.insert(k, ()).unwrap();
        }
        let slots = t.nodes.len();
        for k in 0..4 {
            t.delete(k).unwrap();
        }
        for k in 10..14 {
            t.insert(k, ()).unwrap();
        }
        assert_eq!(t.nodes.len(), slots);
        assert!(t.free.is_empty());
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut t = RbTree::new();
        t.insert(1, ()).unwrap();
        t.insert(2, ()).unwrap();
        let id = t.search(1).unwrap().id();
        t.delete(1).unwrap();
        assert_eq!(t.successor(id).err(), Some(Error::InvalidArgument));
        assert_eq!(t.node(NodeId(NIL)).err(), Some(Error::InvalidArgument));
        assert_eq!(t.node(NodeId(999)).err(), Some(Error::InvalidArgument));
    }

    #[test]
    fn payloads_are_released() {
        let drops = Rc::new(Cell::new(0));
        let mut t = RbTree::new();
        for k in 0..10 {
            t.insert(k, Tracked(drops.clone())).unwrap();
        }

        // overwriting hands the old payload back
        let old = t.insert(3, Tracked(drops.clone())).unwrap();
        assert_eq!(drops.get(), 0);
        drop(old);
        assert_eq!(drops.get(), 1);

        drop(t.delete(4));
        assert_eq!(drops.get(), 2);

        t.clear();
        assert_eq!(drops.get(), 11);
        assert!(t.is_empty());

        t.insert(1, Tracked(drops.clone())).unwrap();
        drop(t);
        assert_eq!(drops.get(), 12);
    }

    quickcheck! {
        fn qc_ins_test(ks: Vec<u16>) -> () {
            ins_test(ks);
        }

        fn qc_rm_test(vs: Vec<(i8, u32)>) -> () {
            rm_test(vs);
        }

        fn qc_rm_test2(ks: Vec<u8>) -> () {
            let mut ks: Vec<Key> = ks.into_iter().map(Key::from).collect();
            ks.sort();
            ks.dedup();
            chk_all_removes(&ks);
        }

        fn qc_height_bound(ks: Vec<u32>) -> bool {
            let mut t = RbTree::new();
            for k in ks {
                t.insert(k as Key, ()).unwrap();
            }
            (t.height() as f64) <= 2.0 * ((t.len() + 1) as f64).log2()
        }
    }
}

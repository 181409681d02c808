use std::iter::FusedIterator;

use super::{Key, RbTree, NIL};

/// In-order iterator over the entries of an [`RbTree`].
///
/// Created by [`RbTree::iter`].  The walk follows parent links, so it needs
/// no work stack.
pub struct Iter<'a, V> {
    pub(super) tree: &'a RbTree<V>,
    pub(super) next: usize,
    pub(super) len: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NIL {
            return None;
        }

        let n = &self.tree.nodes[self.next];
        self.next = self.tree.successor_of(self.next);
        self.len -= 1;
        n.payload.as_ref().map(|v| (n.key, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, V> FusedIterator for Iter<'a, V> {}

impl<'a, V> Clone for Iter<'a, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            next: self.next,
            len: self.len,
        }
    }
}

impl<'a, V> IntoIterator for &'a RbTree<V> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

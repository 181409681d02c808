use proptest::prelude::*;
use rbtree_map::{Key, RbTree};

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

// Routes the tree's log output through the test harness.  Safe to call from
// every test; only the first call installs the logger.
#[allow(dead_code)]
pub(super) fn init_logging() {
    use simplelog::*;
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

// Walks the tree from its minimum through successor links.
#[allow(dead_code)]
pub(super) fn walk_up<V>(t: &RbTree<V>) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut curr = t.minimum();
    while let Some(n) = curr {
        keys.push(n.key());
        curr = n.successor();
    }
    keys
}

// Walks the tree from its maximum through predecessor links.
#[allow(dead_code)]
pub(super) fn walk_down<V>(t: &RbTree<V>) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut curr = t.maximum();
    while let Some(n) = curr {
        keys.push(n.key());
        curr = n.predecessor();
    }
    keys
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub(super) enum Op {
    Insert(u16, u16),
    Delete(u16),
}

#[allow(dead_code)]
pub(super) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

// Mixed inserts and deletes over a narrow key range, so that deletes often
// hit present keys and inserts often overwrite.
#[allow(dead_code)]
pub(super) fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0u16..128, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (0u16..128).prop_map(Op::Delete),
    ];
    prop::collection::vec(op, 0..512)
}

//! The mark phase: which cells can the root still see?

use std::collections::VecDeque;

use fnv::FnvHashSet;
use tracing::trace;

use crate::error::HeapResult;
use crate::store::CellStore;
use crate::Address;

/// The cells reachable from one root, as computed by [`mark`].
///
/// Never contains [`Address::NULL`]. Marking from null yields the empty set,
/// which makes the next sweep reclaim everything.
#[derive(Debug, Clone, Default)]
pub struct Reachable {
    seen: FnvHashSet<Address>,
    order: Vec<Address>,
}

impl Reachable {
    pub fn empty() -> Reachable {
        Reachable::default()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.seen.contains(&address)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Addresses in the order the traversal discovered them, root first.
    pub fn in_visit_order(&self) -> &[Address] {
        &self.order
    }

    fn visit(&mut self, address: Address) -> bool {
        if self.seen.insert(address) {
            self.order.push(address);
            true
        } else {
            false
        }
    }
}

impl core::iter::FromIterator<Address> for Reachable {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Reachable {
        let mut r = Reachable::empty();
        for a in iter {
            if !a.is_null() {
                r.visit(a);
            }
        }
        r
    }
}

/// Breadth-first traversal of `store` from `root`.
///
/// An address is recorded as seen when it is enqueued, not when it is
/// dequeued, so no cell enters the queue twice. That is all cycles and
/// shared substructure need.
///
/// Fails with `AddressOutOfRange` if `root` is neither null nor a usable
/// address of `store`.
#[track_caller]
pub fn mark(store: &CellStore, root: Address) -> HeapResult<Reachable> {
    let mut reachable = Reachable::empty();
    if root.is_null() {
        return Ok(reachable);
    }
    store.check(root)?;

    let mut queue = VecDeque::new();
    reachable.visit(root);
    queue.push_back(root);

    while let Some(address) = queue.pop_front() {
        for child in store.get(address).children() {
            if reachable.visit(child) {
                queue.push_back(child);
            }
        }
    }

    trace!(%root, count = reachable.len(), "marked");
    Ok(reachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{reference_reachable, ArbGraph};
    use crate::{Cell, HeapErrorKind};

    fn a(n: usize) -> Address {
        Address::new(n)
    }

    #[test]
    fn null_root_reaches_nothing() {
        let store = CellStore::new(3);
        assert!(mark(&store, Address::NULL).unwrap().is_empty());
    }

    #[test]
    fn root_past_the_end_is_refused() {
        let store = CellStore::new(2);
        let e = mark(&store, a(3)).unwrap_err();
        assert_eq!(
            e.kind(),
            &HeapErrorKind::AddressOutOfRange {
                address: a(3),
                capacity: 2
            }
        );
        assert_eq!(e.caller().file(), file!());
    }

    #[test]
    fn lone_root_reaches_itself() {
        let store = CellStore::new(3);
        let r = mark(&store, a(2)).unwrap();
        assert_eq!(r.in_visit_order(), &[a(2)]);
    }

    #[test]
    fn breadth_first_order() {
        // 1 -> (2, 3), 2 -> (4, nil), 3 -> (4, 5)
        let mut store = CellStore::new(6);
        store.write(a(1), Cell::new(a(2), a(3))).unwrap();
        store.write(a(2), Cell::new(a(4), Address::NULL)).unwrap();
        store.write(a(3), Cell::new(a(4), a(5))).unwrap();
        let r = mark(&store, a(1)).unwrap();
        assert_eq!(r.in_visit_order(), &[a(1), a(2), a(3), a(4), a(5)]);
        assert!(!r.contains(a(6)));
    }

    #[test]
    fn two_cycle_terminates() {
        let mut store = CellStore::new(4);
        store.write(a(1), Cell::new(a(2), Address::NULL)).unwrap();
        store.write(a(2), Cell::new(a(1), Address::NULL)).unwrap();
        let r = mark(&store, a(1)).unwrap();
        assert_eq!(r.len(), 2);
        assert!(r.contains(a(1)) && r.contains(a(2)));
    }

    #[test]
    fn self_loop_on_both_fields() {
        let mut store = CellStore::new(1);
        store.write(a(1), Cell::new(a(1), a(1))).unwrap();
        assert_eq!(mark(&store, a(1)).unwrap().in_visit_order(), &[a(1)]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let n = 100_000;
        let mut store = CellStore::new(n);
        for i in 1..n {
            store.write(a(i), Cell::new(a(i + 1), Address::NULL)).unwrap();
        }
        assert_eq!(mark(&store, a(1)).unwrap().len(), n);
    }

    #[quickcheck_macros::quickcheck]
    fn matches_reference_traversal(g: ArbGraph) -> bool {
        let store = g.store();
        let r = mark(&store, g.root).unwrap();
        let expected = reference_reachable(&store, g.root);
        let mut got = r.in_visit_order().to_vec();
        got.sort();
        // sorted and deduplicated equal means each address appears exactly once
        got == expected && r.len() == r.seen.len()
    }
}

//! The sweep phase: everything the mark phase didn't see is free.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::mark::Reachable;
use crate::Address;

/// Usable addresses eligible for allocation. Hands out the smallest first so
/// allocation order is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FreeSet(BTreeSet<Address>);

impl FreeSet {
    pub fn contains(&self, address: Address) -> bool {
        self.0.contains(&address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn take_lowest(&mut self) -> Option<Address> {
        let lowest = *self.0.iter().next()?;
        self.0.remove(&lowest);
        Some(lowest)
    }
}

/// `{1..=capacity} \ reachable`. Replaces, rather than extends, whatever was
/// free before.
pub fn sweep(capacity: usize, reachable: &Reachable) -> FreeSet {
    FreeSet(
        (1..=capacity)
            .map(Address)
            .filter(|&a| !reachable.contains(a))
            .collect(),
    )
}

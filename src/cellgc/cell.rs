//! Addresses and the two-field cells they name.

use core::fmt;

use serde::Serialize;
use smallvec::SmallVec;

/// A handle into a [`Heap`](./struct.Heap.html), or [`Address::NULL`].
///
/// Usable addresses of a heap with capacity `N` are `1..=N`. Zero is the
/// "no reference" sentinel and never names a cell.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Address(pub(crate) usize);

impl Address {
    pub const NULL: Address = Address(0);

    pub const fn new(raw: usize) -> Address {
        Address(raw)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Is this a usable address in a heap of `capacity` cells?
    pub(crate) fn in_range(self, capacity: usize) -> bool {
        !self.is_null() && self.0 <= capacity
    }

    /// Null, or usable in a heap of `capacity` cells. This is what a cell
    /// field is allowed to hold.
    pub(crate) fn storable(self, capacity: usize) -> bool {
        self.0 <= capacity
    }
}

impl From<usize> for Address {
    fn from(raw: usize) -> Address {
        Address(raw)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_null() {
            write!(f, "nil")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pair of addresses. The heap attaches no meaning to either field; they
/// are just the outgoing edges of this node in the cell graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Cell {
    pub first: Address,
    pub second: Address,
}

impl Cell {
    /// `(nil nil)`, the contents of every freshly allocated cell.
    pub const EMPTY: Cell = Cell {
        first: Address::NULL,
        second: Address::NULL,
    };

    pub fn new(first: Address, second: Address) -> Cell {
        Cell { first, second }
    }

    /// The non-null fields, `first` before `second`.
    pub fn children(&self) -> SmallVec<[Address; 2]> {
        [self.first, self.second]
            .iter()
            .copied()
            .filter(|a| !a.is_null())
            .collect()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {})", self.first, self.second)
    }
}

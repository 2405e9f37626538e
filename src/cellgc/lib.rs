//! A tiny tracing garbage collector over a fixed pool of two-field cells.
//!
//! A [`Heap`] of capacity `N` owns cells `1..=N`. Each cell holds two
//! [`Address`]es, each either null or another cell, so the heap is an arbitrary
//! directed graph (cycles welcome). Cells are never freed explicitly: when
//! [`Heap::allocate`] finds nothing free, it marks everything reachable from
//! the root it was handed and sweeps the rest back into the free set.
//!
//! ## Using
//!
//! ```
//! use cellgc::{Address, Heap};
//!
//! let mut heap = Heap::new(3).unwrap();
//! let root = heap.allocate(Address::NULL).unwrap();
//! let kid = heap.allocate(root).unwrap();
//! heap.set_first(root, kid).unwrap();
//! assert_eq!(heap.mark(root).unwrap().len(), 2);
//! ```
//!
//! Anything not yet linked under the root passed to `allocate` can be
//! reclaimed by that very call. Link first, allocate again second.
//!
//! ## Internals
//!
//! - [`CellStore`]: the fixed array, with slot zero reserved for null.
//! - [`mark()`]: breadth-first reachability from one root.
//! - [`sweep()`]: the free set is the complement of what was marked.
//! - [`Heap`]: hands out the lowest free address and collects on exhaustion.

mod cell;
mod error;
mod heap;
pub mod mark;
mod store;
pub mod sweep;

pub use cell::{Address, Cell};
pub use error::{HeapError, HeapErrorKind, HeapResult};
pub use heap::{CollectionStats, Heap, Snapshot};
pub use mark::{mark, Reachable};
pub use store::CellStore;
pub use sweep::{sweep, FreeSet};

fn phase<T>(label: &'static str, f: impl FnOnce() -> T) -> T {
    tracing::trace_span!("phase", label).in_scope(f)
}

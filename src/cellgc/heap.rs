use core::fmt::{Display, Formatter as Fmt, Result as FR};

use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::error::{err, HeapResult};
use crate::mark::{mark, Reachable};
use crate::store::CellStore;
use crate::sweep::{sweep, FreeSet};
use crate::HeapErrorKind::{OutOfMemory, ZeroCapacity};
use crate::{phase, Address, Cell};

/// A fixed pool of cells plus the collector that recycles them.
///
/// There is no root set. Whoever calls [`allocate`](#method.allocate) names
/// the one root that matters for that call, and only if the pool is exhausted.
/// A cell that was allocated earlier but not yet linked under that root looks
/// exactly like garbage and will be reclaimed. Keeping things alive is the
/// caller's job.
#[derive(Debug)]
pub struct Heap {
    store: CellStore,
    free: FreeSet,
    collections: u64,
}

/// What one mark-and-sweep cycle found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    /// 1 for the first collection of a heap, and so on.
    pub cycle: u64,
    pub reachable: usize,
    pub freed: usize,
}

impl Display for CollectionStats {
    fn fmt(&self, f: &mut Fmt) -> FR {
        write!(
            f,
            "collection #{}: {} reachable, {} free",
            self.cycle, self.reachable, self.freed
        )
    }
}

/// A copy of the whole heap, for dumping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub capacity: usize,
    /// Cells `1..=capacity`, in address order.
    pub cells: Vec<Cell>,
    pub free: FreeSet,
}

impl Heap {
    /// A heap of `capacity` cells, all of them free and `(nil nil)`.
    #[track_caller]
    pub fn new(capacity: usize) -> HeapResult<Heap> {
        if capacity == 0 {
            return err(ZeroCapacity);
        }
        let store = CellStore::new(capacity);
        // bootstrapping is just a sweep with nothing live
        let free = sweep(capacity, &Reachable::empty());
        Ok(Heap {
            store,
            free,
            collections: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_free(&self, address: Address) -> bool {
        self.free.contains(address)
    }

    pub fn free_set(&self) -> &FreeSet {
        &self.free
    }

    /// How many collections have run so far.
    pub fn collections(&self) -> u64 {
        self.collections
    }

    #[track_caller]
    pub fn read(&self, address: Address) -> HeapResult<Cell> {
        self.store.read(address)
    }

    #[track_caller]
    pub fn write(&mut self, address: Address, cell: Cell) -> HeapResult<()> {
        self.store.write(address, cell)
    }

    #[track_caller]
    pub fn set_first(&mut self, address: Address, value: Address) -> HeapResult<()> {
        let cell = self.store.read(address)?;
        self.store.write(address, Cell { first: value, ..cell })
    }

    #[track_caller]
    pub fn set_second(&mut self, address: Address, value: Address) -> HeapResult<()> {
        let cell = self.store.read(address)?;
        self.store.write(address, Cell { second: value, ..cell })
    }

    /// Hand out a free cell, reset to `(nil nil)`.
    ///
    /// If nothing is free, collects first, keeping only what is reachable from
    /// `root`. Fails with `OutOfMemory` if that still leaves nothing free.
    /// Each call may therefore cost a full pass over the heap.
    #[track_caller]
    pub fn allocate(&mut self, root: Address) -> HeapResult<Address> {
        self.check_root(root)?;
        if self.free.is_empty() {
            debug!(%root, "heap exhausted, collecting");
            self.collect(root)?;
        }
        let address = match self.free.take_lowest() {
            Some(address) => address,
            None => {
                return err(OutOfMemory {
                    root,
                    capacity: self.capacity(),
                })
            }
        };
        self.store.clear(address);
        trace!(%address, free = self.free.len(), "allocated");
        Ok(address)
    }

    /// The cells reachable from `root`. Does not touch the free set.
    #[track_caller]
    pub fn mark(&self, root: Address) -> HeapResult<Reachable> {
        mark(&self.store, root)
    }

    /// What the free set would be if exactly `reachable` were live.
    pub fn sweep(&self, reachable: &Reachable) -> FreeSet {
        sweep(self.capacity(), reachable)
    }

    /// Run a full mark-and-sweep from `root`, replacing the free set.
    #[instrument(skip(self))]
    pub fn collect(&mut self, root: Address) -> HeapResult<CollectionStats> {
        let reachable = phase("mark", || mark(&self.store, root))?;
        let capacity = self.capacity();
        self.free = phase("sweep", || sweep(capacity, &reachable));
        self.collections += 1;

        let stats = CollectionStats {
            cycle: self.collections,
            reachable: reachable.len(),
            freed: self.free.len(),
        };
        info!(
            cycle = stats.cycle,
            reachable = stats.reachable,
            freed = stats.freed,
            "collected"
        );
        Ok(stats)
    }

    /// Every usable address with its cell, in address order.
    pub fn cells(&self) -> impl Iterator<Item = (Address, Cell)> + '_ {
        self.store.addresses().zip(self.store.cells().iter().copied())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            capacity: self.capacity(),
            cells: self.store.cells().to_vec(),
            free: self.free.clone(),
        }
    }

    #[track_caller]
    fn check_root(&self, root: Address) -> HeapResult<()> {
        if root.is_null() {
            Ok(())
        } else {
            self.store.check(root)
        }
    }
}

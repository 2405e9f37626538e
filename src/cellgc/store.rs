//! Fixed-capacity backing storage for cells.

use crate::error::{out_of_range, HeapResult};
use crate::{Address, Cell};

/// `capacity + 1` cells, indexed directly by address. Slot zero stands in for
/// [`Address::NULL`] and is never handed out or read through the public API.
///
/// Every field stored here is either null or a usable address; `write`
/// refuses anything else, so the collector can follow edges without checks.
#[derive(Debug, Clone)]
pub struct CellStore {
    cells: Vec<Cell>,
}

impl CellStore {
    pub fn new(capacity: usize) -> CellStore {
        CellStore {
            cells: vec![Cell::EMPTY; capacity + 1],
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len() - 1
    }

    /// Every usable address, in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = Address> {
        (1..=self.capacity()).map(Address)
    }

    #[track_caller]
    pub fn read(&self, address: Address) -> HeapResult<Cell> {
        self.check(address)?;
        Ok(self.cells[address.0])
    }

    #[track_caller]
    pub fn write(&mut self, address: Address, cell: Cell) -> HeapResult<()> {
        self.check(address)?;
        let capacity = self.capacity();
        for field in [cell.first, cell.second].iter() {
            if !field.storable(capacity) {
                return out_of_range(*field, capacity);
            }
        }
        self.cells[address.0] = cell;
        Ok(())
    }

    /// Read without the range check. Only for addresses that came out of the
    /// store itself (a field, or something already checked).
    pub(crate) fn get(&self, address: Address) -> Cell {
        self.cells[address.0]
    }

    pub(crate) fn clear(&mut self, address: Address) {
        self.cells[address.0] = Cell::EMPTY;
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells[1..]
    }

    #[track_caller]
    pub(crate) fn check(&self, address: Address) -> HeapResult<()> {
        if address.in_range(self.capacity()) {
            Ok(())
        } else {
            out_of_range(address, self.capacity())
        }
    }
}

//! Human-readable views of a heap.

use cellgc::{Address, Heap, HeapResult};
use either::Either::{self, Left, Right};
use fnv::FnvHashSet;
use joinery::JoinableIterator;

/// Render the graph hanging off `root` as nested pairs.
///
/// A cell `(l r)` prints as `(l -> <l's cell> r -> <r's cell> )`, where a null
/// field is just `0` with no arrow. A cell that has already been printed once
/// shows up as `...` instead of being expanded again, so shared structure and
/// cycles both stay finite. Uses an explicit stack, not recursion, so long
/// chains are fine too.
pub fn render(heap: &Heap, root: Address) -> HeapResult<String> {
    let mut out = String::new();
    let mut printed = FnvHashSet::default();
    // Left: a cell to expand. Right: literal text.
    let mut stack: Vec<Either<Address, String>> = vec![Left(root)];

    while let Some(item) = stack.pop() {
        let address = match item {
            Right(text) => {
                out.push_str(&text);
                continue;
            }
            Left(address) => address,
        };
        if !printed.insert(address) {
            out.push_str("...");
            continue;
        }
        let cell = heap.read(address)?;

        let mut parts = vec![];
        for field in [cell.first, cell.second].iter().copied() {
            parts.push(Right(format!("{} ", field)));
            if !field.is_null() {
                parts.push(Right("-> ".to_owned()));
                parts.push(Left(field));
                parts.push(Right(" ".to_owned()));
            }
        }
        stack.push(Right(")".to_owned()));
        stack.extend(parts.into_iter().rev());
        stack.push(Right("(".to_owned()));
    }

    Ok(out)
}

/// The free set, then every usable cell on its own line.
pub fn dump(heap: &Heap) -> String {
    let free: Vec<Address> = heap.free_set().iter().collect();
    let mut out = format!("free=({})\n", free.iter().join_with(" "));
    for (address, cell) in heap.cells() {
        out.push_str(&format!("{}: {}\n", address, cell));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgc::Cell;

    const NIL: Address = Address::NULL;

    #[test]
    fn leaf() {
        let mut h = Heap::new(1).unwrap();
        let root = h.allocate(NIL).unwrap();
        assert_eq!(render(&h, root).unwrap(), "(0 0 )");
    }

    #[test]
    fn tree() {
        let mut h = Heap::new(3).unwrap();
        let root = h.allocate(NIL).unwrap();
        let l = h.allocate(root).unwrap();
        let r = h.allocate(root).unwrap();
        h.write(root, Cell::new(l, r)).unwrap();
        assert_eq!(render(&h, root).unwrap(), "(2 -> (0 0 ) 3 -> (0 0 ) )");
    }

    #[test]
    fn cycles_and_sharing_print_once() {
        let mut h = Heap::new(2).unwrap();
        let x = h.allocate(NIL).unwrap();
        let y = h.allocate(x).unwrap();
        h.write(x, Cell::new(y, y)).unwrap();
        h.write(y, Cell::new(x, NIL)).unwrap();
        assert_eq!(
            render(&h, x).unwrap(),
            "(2 -> (1 -> ... 0 ) 2 -> ... )"
        );
    }

    #[test]
    fn long_chain() {
        let n = 50_000;
        let mut h = Heap::new(n).unwrap();
        for i in 1..=n {
            assert_eq!(h.allocate(NIL).unwrap(), Address::new(i));
        }
        for i in 1..n {
            h.set_second(Address::new(i), Address::new(i + 1)).unwrap();
        }
        let s = render(&h, Address::new(1)).unwrap();
        assert_eq!(s.matches('(').count(), n);
    }

    #[test]
    fn bad_root() {
        let h = Heap::new(1).unwrap();
        assert!(render(&h, NIL).is_err());
    }

    #[test]
    fn dump_lists_free_then_cells() {
        let mut h = Heap::new(3).unwrap();
        let root = h.allocate(NIL).unwrap();
        h.set_first(root, root).unwrap();
        assert_eq!(dump(&h), "free=(2 3)\n1: (1 0)\n2: (0 0)\n3: (0 0)\n");
    }

    #[quickcheck_macros::quickcheck]
    fn expands_each_reachable_cell_once(edges: Vec<(u8, u8)>) -> bool {
        let n = edges.len().max(1);
        let mut h = Heap::new(n).unwrap();
        for _ in 0..n {
            h.allocate(NIL).unwrap();
        }
        let clamp = |x: u8| Address::new(x as usize % (n + 1));
        for (i, &(l, r)) in edges.iter().enumerate() {
            h.write(Address::new(i + 1), Cell::new(clamp(l), clamp(r)))
                .unwrap();
        }
        let root = Address::new(1);
        let s = render(&h, root).unwrap();
        let opened = s.matches('(').count();
        opened == h.mark(root).unwrap().len() && opened == s.matches(')').count()
    }
}

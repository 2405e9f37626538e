//! A playground for the `cellgc` collector: a graph printer, a heap dump, and
//! a repl for poking at a heap by hand.

#[path = "repl.rs"]
mod repl_;

pub use repl_::{exec, repl};

pub mod command;
pub mod print;

use cellgc::{Address, Heap, HeapError, HeapResult};

/// How big a heap the binary makes when not told otherwise.
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error("parsing error: {}", .0)]
    Parsing(#[from] command::ParsingError),
    #[error("could not encode heap: {}", .0)]
    Json(#[from] serde_json::Error),
}

/// Build a little tree in a five-cell heap and keep replacing one of its
/// leaves, so that the collector has to recycle the discarded ones.
///
/// Returns the rendering of the tree before and after the churn.
pub fn demo() -> HeapResult<(String, String)> {
    let mut heap = Heap::new(DEFAULT_CAPACITY)?;
    let root = heap.allocate(Address::NULL)?;
    let first = heap.allocate(root)?;
    heap.set_first(root, first)?;
    let second = heap.allocate(root)?;
    heap.set_second(root, second)?;
    let before = print::render(&heap, root)?;

    for _ in 0..6 {
        let leaf = heap.allocate(root)?;
        heap.set_first(first, leaf)?;
    }
    let leaf = heap.allocate(root)?;
    heap.set_second(first, leaf)?;
    let after = print::render(&heap, root)?;

    tracing::debug!(collections = heap.collections(), "demo finished");
    Ok((before, after))
}

enum TestTrace {
    DemoFailed(HeapError),
    CheckFailed(&'static str, &'static str, String),
}
pub struct TestReport {
    reports: Vec<TestTrace>,
}

impl std::fmt::Debug for TestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let fail_count = self.reports.len();
        for rep in &self.reports {
            match rep {
                DemoFailed(err) => writeln!(f, "error while running the demo: {}", err)?,
                CheckFailed(what, expected, got) => {
                    writeln!(f, "{} mismatch: {} != {}", what, got, expected)?
                }
            }
            writeln!(f, "-----------------------------------------")?
        }
        writeln!(f, "{} checks failed", fail_count)
    }
}
use TestTrace::*;

#[test]
fn basic_tests() -> Result<(), TestReport> {
    self_test()
}

pub fn self_test() -> Result<(), TestReport> {
    let mut reports = vec![];
    match demo() {
        Ok((before, after)) => {
            let expected_before = "(2 -> (0 0 ) 3 -> (0 0 ) )";
            let expected_after = "(2 -> (5 -> (0 0 ) 4 -> (0 0 ) ) 3 -> (0 0 ) )";
            if before != expected_before {
                reports.push(CheckFailed("initial tree", expected_before, before));
            }
            if after != expected_after {
                reports.push(CheckFailed("final tree", expected_after, after));
            }
        }
        Err(e) => reports.push(DemoFailed(e)),
    }

    if reports.is_empty() {
        Ok(())
    } else {
        Err(TestReport { reports })
    }
}

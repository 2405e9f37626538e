use core::fmt::{Display, Formatter as Fmt, Result as FR};

use tracing_error::SpanTrace;

use crate::Address;

pub type HeapResult<T> = Result<T, HeapError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapErrorKind {
    #[error(
        "out of memory: all {} cells are still reachable from root {}",
        .capacity,
        .root
    )]
    OutOfMemory { root: Address, capacity: usize },
    #[error(
        "address {} is out of range for a heap of {} cells",
        .address,
        .capacity
    )]
    AddressOutOfRange { address: Address, capacity: usize },
    #[error("a heap needs room for at least one cell")]
    ZeroCapacity,
}

use HeapErrorKind::*;

#[derive(Debug, thiserror::Error)]
pub struct HeapError {
    kind: HeapErrorKind,
    caller: &'static std::panic::Location<'static>,
    span: SpanTrace,
}

impl HeapError {
    #[track_caller]
    pub(crate) fn new(kind: HeapErrorKind) -> HeapError {
        HeapError {
            kind,
            caller: std::panic::Location::caller(),
            span: SpanTrace::capture(),
        }
    }

    pub fn kind(&self) -> &HeapErrorKind {
        &self.kind
    }

    /// Where in the program the failing heap call was made.
    pub fn caller(&self) -> &'static std::panic::Location<'static> {
        self.caller
    }

    /// The spans that were open when the error was made. Empty unless the
    /// current subscriber has a `tracing_error::ErrorLayer`.
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.kind, OutOfMemory { .. })
    }
}

impl Display for HeapError {
    fn fmt(&self, f: &mut Fmt) -> FR {
        write!(f, "{} (at {})", self.kind, self.caller)
    }
}

#[track_caller]
pub(crate) fn err<T>(source: HeapErrorKind) -> HeapResult<T> {
    Err(HeapError::new(source))
}

#[track_caller]
pub(crate) fn out_of_range<T>(address: Address, capacity: usize) -> HeapResult<T> {
    err(AddressOutOfRange { address, capacity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_the_caller() {
        let e = out_of_range::<()>(Address::new(9), 3).unwrap_err();
        assert_eq!(e.caller().file(), file!());
        assert_eq!(
            e.kind(),
            &AddressOutOfRange {
                address: Address::new(9),
                capacity: 3
            }
        );
        assert!(!e.is_out_of_memory());
        assert!(e.to_string().starts_with("address 9 is out of range"));
        // the kind is the message, not a nested cause
        assert!(std::error::Error::source(&e).is_none());
        assert_eq!(e.to_string().matches("out of range").count(), 1);
    }
}

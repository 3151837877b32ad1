use std::alloc::{handle_alloc_error, Layout};
use std::fmt;

/// Errors reported by the set, its cursors and the tree engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The cursor points at the end position, past the last element.
    CursorAtEnd,
    /// The cursor cannot move before the first element.
    BeforeBegin,
    /// The allocator could not provide a block for a new tree node.
    AllocFailed { layout: Layout },
}

impl Error {
    /// Turns an error from an infallible operation into a fatal signal.
    pub(crate) fn fatal(self) -> ! {
        match self {
            Error::AllocFailed { layout } => handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CursorAtEnd => f.write_str("cursor is at the end position"),
            Error::BeforeBegin => f.write_str("cursor cannot move before the first element"),
            Error::AllocFailed { layout } => write!(
                f,
                "failed to allocate tree node ({} bytes, align {})",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for Error {}

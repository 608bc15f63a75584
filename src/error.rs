//! Error types for blkseq operations.

use std::io;
use thiserror::Error;

/// The main error type for blkseq operations.
///
/// Argument errors are returned before any I/O is attempted, so receiving
/// one means nothing happened. [`Error::ReadFailure`] means a read pass was
/// partially completed and then aborted at the named block.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument is structurally valid but semantically unusable: neither
    /// a handle nor a non-empty path, a zero block size or length override,
    /// or querying disallowed with no explicit sizes available.
    #[error("invalid argument value: {0}")]
    InvalidArgumentValue(String),

    /// An individual block read failed. The sequence is aborted; no further
    /// blocks are read.
    #[error("read failed for handle {handle} at block {block} (offset {offset}): {source}")]
    ReadFailure {
        /// Identity of the handle the read was issued against.
        handle: i64,
        /// Zero-based index of the block that failed.
        block: u64,
        /// Byte offset the failed read was issued at.
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Closing an internally-owned handle failed. Never masks a prior
    /// [`Error::ReadFailure`] from the same session.
    #[error("close failed for handle {handle}: {source}")]
    CloseFailure {
        /// Identity of the handle that failed to close.
        handle: i64,
        #[source]
        source: io::Error,
    },

    /// An I/O error outside the read loop (opening or stat'ing a file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for blkseq operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand used by validation paths.
    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        Error::InvalidArgumentValue(message.into())
    }
}

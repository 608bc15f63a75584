//! Configuration options for a read session.

use crate::handle::Metadata;

/// Options controlling how a session resolves its read parameters.
///
/// Everything is optional; anything left unset is filled in from the file
/// itself (or, for `close_on_finish`, from how the handle was obtained).
#[derive(Debug, Clone)]
pub struct Options {
    /// Close the handle after the pass finishes.
    ///
    /// When unset the default depends on the handle's origin: `true` for a
    /// handle opened internally from a path, `false` for a caller-supplied
    /// handle.
    pub close_on_finish: Option<bool>,

    /// Bytes per read operation, overriding the file's natural block size.
    ///
    /// Must be positive when set.
    pub block_size: Option<u64>,

    /// Total byte count to read, overriding the file's actual size.
    ///
    /// Must be positive when set.
    pub length: Option<u64>,

    /// Pre-fetched size facts, skipping the stat query entirely.
    pub metadata: Option<Metadata>,

    /// Allow querying the file for its metadata when needed.
    ///
    /// When false and neither explicit overrides nor `metadata` determine
    /// both the block size and the length, the session fails instead of
    /// stat'ing the file.
    pub allow_query: bool,

    /// Byte offset to start reading at.
    pub start: u64,

    /// Exclusive byte offset to stop reading at.
    ///
    /// Unset, or a value at or below `start`, means "read to the end of the
    /// file". Clamped to the resolved length.
    pub end: Option<u64>,

    /// Resolve and validate all parameters but read nothing and touch no
    /// file.
    pub noop: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            close_on_finish: None,
            block_size: None,
            length: None,
            metadata: None,
            allow_query: true,
            start: 0,
            end: None,
            noop: false,
        }
    }
}

impl Options {
    /// Create a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the handle is closed when the pass finishes.
    pub fn with_close_on_finish(mut self, close: bool) -> Self {
        self.close_on_finish = Some(close);
        self
    }

    /// Override the read block size, in bytes.
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Override the total number of bytes to read.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Supply pre-fetched metadata instead of querying the file.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Allow or forbid querying the file for metadata.
    pub fn with_allow_query(mut self, allow: bool) -> Self {
        self.allow_query = allow;
        self
    }

    /// Set the starting byte offset.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Set the exclusive end byte offset.
    pub fn with_end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    /// Enable or disable no-op mode (resolve options, read nothing).
    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }
}

//! Result state returned from a completed session.

use crate::handle::Metadata;
use std::fs::File;

/// The outcome of a successful read pass.
///
/// Carries the parameters the session actually resolved (as opposed to what
/// the caller supplied) and the aggregate of what was read. The handle moves
/// back to the caller here when the session did not close it.
#[derive(Debug)]
pub struct SessionResult<H = File> {
    /// The handle the pass read from; `None` if the session closed it.
    pub handle: Option<H>,

    /// The size facts the pass was planned from, explicit or queried.
    pub metadata: Metadata,

    /// The block size each read was issued with.
    pub block_size: u64,

    /// The total length the range was resolved against.
    pub length: u64,

    /// Total bytes read across all blocks.
    pub bytes_read: u64,

    /// Number of blocks read.
    pub blocks: u64,
}

impl<H> SessionResult<H> {
    /// A result for a pass that resolved its parameters but read nothing.
    pub(crate) fn empty(metadata: Metadata, block_size: u64, length: u64) -> Self {
        Self {
            handle: None,
            metadata,
            block_size,
            length,
            bytes_read: 0,
            blocks: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result: SessionResult = SessionResult::empty(Metadata::new(4096, 8206), 4096, 8206);
        assert!(result.handle.is_none());
        assert_eq!(result.metadata, Metadata::new(4096, 8206));
        assert_eq!(result.block_size, 4096);
        assert_eq!(result.length, 8206);
        assert_eq!(result.bytes_read, 0);
        assert_eq!(result.blocks, 0);
    }
}

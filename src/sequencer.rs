//! Sequential block reading over a resolved byte range.
//!
//! This module is the read engine: it partitions a `[start, end)` range into
//! consecutive blocks of a fixed size and reads them strictly in ascending
//! offset order, one at a time, invoking a callback after each block. No two
//! reads are ever outstanding simultaneously, so callbacks with side effects
//! (incremental hashing, streaming output) observe blocks in order.

use crate::error::{Error, Result};
use crate::handle::BlockHandle;

/// One block of a read pass, handed to the per-block callback.
///
/// `buf` is a view into a single reusable buffer shared by every read of the
/// pass; the next read overwrites it. A callback that retains data must copy
/// the valid prefix `&buf[..bytes_read]` before returning.
#[derive(Debug)]
pub struct Block<'a> {
    /// Zero-based index of this block within the pass.
    pub index: u64,
    /// Byte offset in the file this block was read from.
    pub offset: u64,
    /// Number of bytes actually read; may be short of `buf.len()` at end of
    /// file.
    pub bytes_read: usize,
    /// The requested portion of the reusable read buffer.
    pub buf: &'a [u8],
}

impl Block<'_> {
    /// The bytes actually read into this block.
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.bytes_read]
    }
}

/// Resolve the exclusive upper bound of the range actually read.
///
/// An `end` at or below `start` (or absent) means "read to the end of the
/// file"; an explicit end is clamped to the file length.
pub(crate) fn effective_end(length: u64, start: u64, end: Option<u64>) -> u64 {
    match end {
        Some(end) if end > start => end.min(length),
        _ => length,
    }
}

/// Read `[start, end)` of `handle` one block at a time, in offset order.
///
/// Each block's requested length is `block_size`, clamped down for the final
/// block so the pass never requests bytes past the effective end. A read
/// returning fewer bytes than requested is a valid short read (typical at end
/// of file), not an error. A block whose computed offset already equals the
/// effective end is not issued, so an exactly-divisible range never produces
/// a trailing zero-length read.
///
/// `on_block` runs after every read; an `Err` from it aborts the pass. A
/// failed read aborts with [`Error::ReadFailure`] naming the handle, block
/// index and offset.
///
/// Returns the total number of bytes read across all blocks.
pub fn sequence<H, F>(
    handle: &H,
    block_size: u64,
    length: u64,
    start: u64,
    end: Option<u64>,
    mut on_block: F,
) -> Result<u64>
where
    H: BlockHandle + ?Sized,
    F: FnMut(Block<'_>) -> Result<()>,
{
    if block_size == 0 {
        return Err(Error::invalid_value("block size must be positive"));
    }

    let end = effective_end(length, start, end);
    if end <= start {
        return Ok(0);
    }

    log::debug!(
        "sequencing handle {}: range [{start}, {end}) in {block_size}-byte blocks",
        handle.descriptor()
    );

    // One buffer for the whole pass; every read overwrites it.
    let mut buf = vec![0u8; block_size as usize];
    let mut total = 0u64;
    let mut index = 0u64;

    loop {
        let offset = start + index * block_size;
        if offset >= end {
            break;
        }
        let requested = (end - offset).min(block_size) as usize;

        let bytes_read = handle
            .read_at(&mut buf[..requested], offset)
            .map_err(|source| Error::ReadFailure {
                handle: handle.descriptor(),
                block: index,
                offset,
                source,
            })?;
        total += bytes_read as u64;
        log::trace!("block {index} at offset {offset}: {bytes_read}/{requested} bytes");

        on_block(Block {
            index,
            offset,
            bytes_read,
            buf: &buf[..requested],
        })?;
        index += 1;
    }

    Ok(total)
}

//! # blkseq
//!
//! Sequential, block-granular file reading.
//!
//! ## Overview
//!
//! `blkseq` reads a byte range of a file one I/O block at a time, strictly
//! in ascending offset order, invoking a callback after every block and
//! reporting an aggregate result when the whole range is done. The block
//! size defaults to the filesystem's preferred I/O size for the file and the
//! range defaults to the whole file; both can be overridden. This is useful
//! whenever per-block side effects must be applied in order, such as
//! incremental hashing or streaming a large file without loading it whole.
//!
//! ## Features
//!
//! - Resolve the read unit from the file's natural block size via `stat`,
//!   caller-supplied metadata, or an explicit override
//! - Read an arbitrary `[start, end)` range, clamped to the file length
//! - Strictly sequential reads over a single reusable buffer, never two
//!   outstanding at once
//! - Explicit handle ownership: a handle opened from a path is closed when
//!   the pass finishes, a caller-supplied handle is returned still open
//! - Abstracted over [`BlockHandle`], so any positional-read source works
//!
//! ## Example
//!
//! ```no_run
//! use blkseq::{Options, Session};
//!
//! let mut total = 0u64;
//! let result = Session::with_path("/path/to/file")
//!     .options(Options::new().with_block_size(4096))
//!     .on_block(|block| {
//!         // block.data() is only valid until the next read; copy to keep.
//!         total += block.bytes_read as u64;
//!         Ok(())
//!     })
//!     .run()?;
//! println!("read {} bytes in {} blocks", result.bytes_read, result.blocks);
//! # Ok::<(), blkseq::Error>(())
//! ```
//!
//! ## Errors
//!
//! Argument problems fail synchronously before any I/O; a validation error
//! means nothing was opened or read. I/O problems surface as
//! [`Error::ReadFailure`] naming the block index and offset that failed, and
//! abort the remaining blocks. Nothing is retried. A failed
//! [`Session::run`] returns a [`SessionFailure`] that carries a
//! caller-supplied handle back, still open, whenever the session did not
//! close it.

mod error;
mod handle;
mod options;
mod sequencer;
mod session;
mod state;

pub use error::{Error, Result};
pub use handle::{BlockHandle, Metadata};
pub use options::Options;
pub use sequencer::{sequence, Block};
pub use session::{read_by_block, Session, SessionFailure};
pub use state::SessionResult;

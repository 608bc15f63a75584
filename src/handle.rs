//! The filesystem collaborator boundary.
//!
//! Sessions issue all of their I/O through the [`BlockHandle`] trait so the
//! read engine stays independent of the concrete file type. The only
//! implementation shipped here is for [`std::fs::File`]; tests substitute
//! in-memory handles to exercise short reads and forced failures.

use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, IntoRawFd};
use std::os::unix::fs::{FileExt, MetadataExt};
use std::path::Path;

/// The size facts about a file needed to plan a read pass.
///
/// Either queried from the file via [`BlockHandle::stat`] or supplied by the
/// caller up front to skip the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// The filesystem's preferred I/O block size for this file, in bytes.
    pub block_size: u64,
    /// Total size of the file in bytes.
    pub size: u64,
}

impl Metadata {
    /// Create metadata from explicit values.
    pub fn new(block_size: u64, size: u64) -> Self {
        Self { block_size, size }
    }
}

/// An open file as seen by the read engine.
///
/// Positional reads only; the handle carries no cursor. `close` is explicit
/// and fallible so close errors are observable instead of vanishing in a
/// `Drop` impl.
pub trait BlockHandle {
    /// Open a new handle for the given path.
    fn open(path: &Path) -> io::Result<Self>
    where
        Self: Sized;

    /// Query the file's block size and total length.
    fn stat(&self) -> io::Result<Metadata>;

    /// Read up to `buf.len()` bytes at the given byte offset.
    ///
    /// Returns the number of bytes actually read; fewer than requested is a
    /// valid short read at end of file.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Close the handle, surfacing any error the platform reports.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;

    /// A stable identity for this handle, used in error reports.
    fn descriptor(&self) -> i64;
}

impl BlockHandle for File {
    fn open(path: &Path) -> io::Result<Self> {
        File::open(path)
    }

    fn stat(&self) -> io::Result<Metadata> {
        let meta = self.metadata()?;
        Ok(Metadata {
            block_size: meta.blksize(),
            size: meta.len(),
        })
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        FileExt::read_at(self, buf, offset)
    }

    fn close(self) -> io::Result<()> {
        // Take the fd out of the File so close(2) runs exactly once and its
        // result is observable.
        let fd = self.into_raw_fd();
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn descriptor(&self) -> i64 {
        self.as_raw_fd() as i64
    }
}

//! Session resolution and handle lifecycle.
//!
//! A [`Session`] turns heterogeneous caller options into a concrete read
//! pass: it adopts or opens a handle, resolves the effective block size and
//! length (explicitly supplied, or queried from the file), drives the
//! sequencer over the resolved range, and closes the handle afterwards when
//! it owns it.

use crate::error::{Error, Result};
use crate::handle::{BlockHandle, Metadata};
use crate::options::Options;
use crate::sequencer::{self, Block};
use crate::state::SessionResult;

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Where the session's handle comes from.
///
/// A caller-supplied handle is borrowed: it moves back to the caller in the
/// [`SessionResult`] unless closing was explicitly requested. A path is
/// opened internally and the resulting handle is owned, closed by default
/// when the pass finishes.
enum Source<H> {
    Handle(H),
    Path(PathBuf),
}

type OnBlock<'a> = Box<dyn FnMut(Block<'_>) -> Result<()> + 'a>;
type OnClose<'a> = Box<dyn FnOnce(&io::Result<()>) + 'a>;
type OnFinish<'a, H> = Box<dyn FnOnce(&SessionResult<H>) + 'a>;

/// A failed pass, carrying a caller-supplied handle back to the caller.
///
/// A session takes its handle by value, so a plain error return would drop
/// it (and, for [`File`], close the fd) even though the caller never asked
/// for a close. This wrapper hands the handle back whenever the session did
/// not close it, the way [`std::io::IntoInnerError`] returns the writer from
/// a failed [`std::io::BufWriter::into_inner`]. Converting into [`Error`]
/// with `?` discards the handle.
#[derive(Debug)]
pub struct SessionFailure<H> {
    /// What went wrong.
    pub error: Error,
    /// The caller-supplied handle, still open, when the session did not
    /// close it.
    pub handle: Option<H>,
}

impl<H> SessionFailure<H> {
    fn new(error: Error, handle: Option<H>) -> Self {
        Self { error, handle }
    }

    /// Discard any returned handle and keep the error.
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<H> fmt::Display for SessionFailure<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<H: fmt::Debug> std::error::Error for SessionFailure<H> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<H> From<SessionFailure<H>> for Error {
    fn from(failure: SessionFailure<H>) -> Self {
        failure.error
    }
}

/// A single read pass over one file.
///
/// Built with [`Session::with_handle`] or [`Session::with_path`], configured
/// through [`Options`] and the callback setters, and consumed by
/// [`Session::run`]. A session is never reused; run a fresh one per pass.
///
/// # Example
///
/// ```no_run
/// use blkseq::{Options, Session};
///
/// let mut total = 0u64;
/// let result = Session::with_path("/path/to/file")
///     .options(Options::new().with_block_size(4096))
///     .on_block(|block| {
///         total += block.bytes_read as u64;
///         Ok(())
///     })
///     .run()?;
/// assert_eq!(result.bytes_read, total);
/// # Ok::<(), blkseq::Error>(())
/// ```
pub struct Session<'a, H = File> {
    source: Option<Source<H>>,
    options: Options,
    on_block: Option<OnBlock<'a>>,
    on_close: Option<OnClose<'a>>,
    on_finish: Option<OnFinish<'a, H>>,
}

impl<'a> Session<'a, File> {
    /// A session that opens the given path itself.
    ///
    /// The opened handle is owned by the session and closed when the pass
    /// finishes, unless `close_on_finish` is explicitly set to false.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(Source::Path(path.into())),
            options: Options::new(),
            on_block: None,
            on_close: None,
            on_finish: None,
        }
    }
}

impl<'a, H: BlockHandle> Session<'a, H> {
    /// A session with no source; [`Session::run`] will fail until one of the
    /// source constructors is used instead.
    pub fn new() -> Self {
        Self {
            source: None,
            options: Options::new(),
            on_block: None,
            on_close: None,
            on_finish: None,
        }
    }

    /// A session over a caller-supplied open handle.
    ///
    /// The handle stays open and moves back to the caller in the
    /// [`SessionResult`], unless `close_on_finish` is explicitly set to
    /// true.
    pub fn with_handle(handle: H) -> Self {
        Self {
            source: Some(Source::Handle(handle)),
            options: Options::new(),
            on_block: None,
            on_close: None,
            on_finish: None,
        }
    }

    /// Set the session options.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the per-block callback, invoked after every read in offset order.
    ///
    /// Returning an `Err` aborts the pass.
    pub fn on_block(mut self, f: impl FnMut(Block<'_>) -> Result<()> + 'a) -> Self {
        self.on_block = Some(Box::new(f));
        self
    }

    /// Set a callback invoked with the outcome of closing the handle.
    ///
    /// Only runs when the session actually closes the handle.
    pub fn on_close(mut self, f: impl FnOnce(&io::Result<()>) + 'a) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Set a callback invoked with the final result after a successful pass,
    /// after any close.
    pub fn on_finish(mut self, f: impl FnOnce(&SessionResult<H>) + 'a) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }

    /// Validate the option set without any I/O.
    ///
    /// Argument errors are reported here, before a handle is opened or
    /// touched, so a validation failure always means nothing happened.
    fn validate(&self) -> Result<()> {
        match &self.source {
            Some(Source::Handle(_)) => {}
            Some(Source::Path(path)) if !path.as_os_str().is_empty() => {}
            Some(Source::Path(_)) => {
                return Err(Error::invalid_value("path is empty"));
            }
            None => {
                return Err(Error::invalid_value(
                    "neither a handle nor a path was supplied",
                ));
            }
        }

        let opts = &self.options;
        if opts.block_size == Some(0) {
            return Err(Error::invalid_value("block size override must be positive"));
        }
        if opts.length == Some(0) {
            return Err(Error::invalid_value("length override must be positive"));
        }
        if let Some(meta) = &opts.metadata {
            if meta.block_size == 0 {
                return Err(Error::invalid_value("metadata block size must be positive"));
            }
            if meta.size == 0 {
                return Err(Error::invalid_value("metadata size must be positive"));
            }
        }
        if opts.metadata.is_none()
            && !opts.allow_query
            && (opts.block_size.is_none() || opts.length.is_none())
        {
            return Err(Error::invalid_value(
                "querying is disallowed and the block size and length are not fully specified",
            ));
        }
        Ok(())
    }

    /// Resolve the session and perform the read pass.
    ///
    /// Resolution order: validate, acquire the handle, resolve metadata
    /// (lazily; the file is stat'd only if a size is still unknown), resolve
    /// the effective block size and length, sequence the blocks, close the
    /// handle if the session owns that duty, then report. Callbacks run in
    /// the order `on_block* -> on_close -> on_finish`.
    ///
    /// A read failure aborts the pass but an owned handle is still closed
    /// best-effort; a close failure never masks the read failure that
    /// preceded it. When the session fails without closing a caller-supplied
    /// handle, the [`SessionFailure`] carries the handle back still open.
    pub fn run(mut self) -> std::result::Result<SessionResult<H>, SessionFailure<H>> {
        if self.options.noop {
            return Ok(self.resolve_noop());
        }
        if let Err(err) = self.validate() {
            // Nothing happened; a supplied handle goes back untouched.
            return Err(SessionFailure::new(err, self.take_supplied_handle()));
        }

        // Dynamic default: a handle opened from a path is ours to close.
        let opened_internally = matches!(self.source, Some(Source::Path(_)));
        let close_on_finish = self.options.close_on_finish.unwrap_or(opened_internally);

        let handle = match self.source.take() {
            Some(Source::Handle(handle)) => handle,
            Some(Source::Path(path)) => match H::open(&path) {
                Ok(handle) => handle,
                Err(err) => return Err(SessionFailure::new(err.into(), None)),
            },
            None => unreachable!("validated above"),
        };

        let metadata = match self.resolve_metadata(&handle) {
            Ok(metadata) => metadata,
            Err(err) => {
                return Err(if close_on_finish {
                    // Best-effort cleanup; the stat error is the one reported.
                    let _ = handle.close();
                    SessionFailure::new(err, None)
                } else {
                    SessionFailure::new(err, Some(handle))
                });
            }
        };
        let block_size = self.options.block_size.unwrap_or(metadata.block_size);
        let length = self.options.length.unwrap_or(metadata.size);

        log::debug!(
            "session resolved: handle {} ({}), block_size {block_size}, length {length}, \
             start {}, end {:?}, close_on_finish {close_on_finish}",
            handle.descriptor(),
            if opened_internally { "owned" } else { "borrowed" },
            self.options.start,
            self.options.end,
        );

        let mut on_block = self.on_block.take();
        let mut blocks = 0u64;
        let outcome = sequencer::sequence(
            &handle,
            block_size,
            length,
            self.options.start,
            self.options.end,
            |block| {
                blocks += 1;
                match on_block.as_mut() {
                    Some(f) => f(block),
                    None => Ok(()),
                }
            },
        );

        let returned_handle = if close_on_finish {
            let descriptor = handle.descriptor();
            let close_result = handle.close();
            if let Some(on_close) = self.on_close.take() {
                on_close(&close_result);
            }
            if let Err(source) = close_result {
                let close_err = Error::CloseFailure {
                    handle: descriptor,
                    source,
                };
                // A read failure takes precedence over the close failure.
                return Err(match outcome {
                    Err(read_err) => SessionFailure::new(read_err, None),
                    Ok(_) => SessionFailure::new(close_err, None),
                });
            }
            None
        } else {
            Some(handle)
        };

        let bytes_read = match outcome {
            Ok(bytes_read) => bytes_read,
            // The pass failed but the handle stays open; return it.
            Err(err) => return Err(SessionFailure::new(err, returned_handle)),
        };
        let result = SessionResult {
            handle: returned_handle,
            metadata,
            block_size,
            length,
            bytes_read,
            blocks,
        };
        if let Some(on_finish) = self.on_finish.take() {
            on_finish(&result);
        }
        Ok(result)
    }

    /// Take back a caller-supplied handle, if that is what the source was.
    fn take_supplied_handle(&mut self) -> Option<H> {
        match self.source.take() {
            Some(Source::Handle(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Resolve the size facts, stat'ing the file only when needed.
    fn resolve_metadata(&self, handle: &H) -> Result<Metadata> {
        if let Some(metadata) = self.options.metadata {
            return Ok(metadata);
        }
        if let (Some(block_size), Some(length)) = (self.options.block_size, self.options.length) {
            // Both sizes are explicit; no query required.
            return Ok(Metadata::new(block_size, length));
        }
        log::debug!("stat'ing handle {}", handle.descriptor());
        Ok(handle.stat()?)
    }

    /// Resolve what can be resolved without touching a file.
    fn resolve_noop(&self) -> SessionResult<H> {
        let metadata = self.options.metadata.unwrap_or(Metadata::new(
            self.options.block_size.unwrap_or(0),
            self.options.length.unwrap_or(0),
        ));
        let block_size = self.options.block_size.unwrap_or(metadata.block_size);
        let length = self.options.length.unwrap_or(metadata.size);
        log::debug!("noop session resolved: block_size {block_size}, length {length}");
        SessionResult::empty(metadata, block_size, length)
    }
}

impl<'a, H: BlockHandle> Default for Session<'a, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole file at its natural block size, one block per callback.
///
/// Convenience wrapper over [`Session::with_path`] with default options.
pub fn read_by_block<F>(path: impl AsRef<Path>, on_block: F) -> Result<SessionResult<File>>
where
    F: FnMut(Block<'_>) -> Result<()>,
{
    Session::with_path(path.as_ref())
        .on_block(on_block)
        .run()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    /// In-memory handle with injectable failures and close tracking.
    #[derive(Debug)]
    struct MemHandle {
        data: Vec<u8>,
        block_size: u64,
        fail_at_block: Option<u64>,
        fail_close: bool,
        stats: Rc<RefCell<u32>>,
        closed: Rc<RefCell<bool>>,
        reads: Rc<RefCell<u32>>,
    }

    impl MemHandle {
        fn new(len: usize, block_size: u64) -> Self {
            Self {
                data: (0..len).map(|i| (i % 251) as u8).collect(),
                block_size,
                fail_at_block: None,
                fail_close: false,
                stats: Rc::new(RefCell::new(0)),
                closed: Rc::new(RefCell::new(false)),
                reads: Rc::new(RefCell::new(0)),
            }
        }

        fn failing_at(mut self, block: u64) -> Self {
            self.fail_at_block = Some(block);
            self
        }

        fn failing_close(mut self) -> Self {
            self.fail_close = true;
            self
        }

        fn closed_flag(&self) -> Rc<RefCell<bool>> {
            Rc::clone(&self.closed)
        }
    }

    impl BlockHandle for MemHandle {
        fn open(_path: &Path) -> io::Result<Self> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "memory handle"))
        }

        fn stat(&self) -> io::Result<Metadata> {
            *self.stats.borrow_mut() += 1;
            Ok(Metadata::new(self.block_size, self.data.len() as u64))
        }

        fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
            let issued = *self.reads.borrow() as u64;
            *self.reads.borrow_mut() += 1;
            if self.fail_at_block == Some(issued) {
                return Err(io::Error::new(io::ErrorKind::Other, "injected failure"));
            }
            let offset = offset as usize;
            if offset >= self.data.len() {
                return Ok(0);
            }
            let n = buf.len().min(self.data.len() - offset);
            buf[..n].copy_from_slice(&self.data[offset..offset + n]);
            Ok(n)
        }

        fn close(self) -> io::Result<()> {
            *self.closed.borrow_mut() = true;
            if self.fail_close {
                Err(io::Error::new(io::ErrorKind::Other, "injected close failure"))
            } else {
                Ok(())
            }
        }

        fn descriptor(&self) -> i64 {
            -1
        }
    }

    fn lorem_file(len: usize) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        tmp.write_all(&data).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_no_source_fails_before_io() {
        let err = Session::<MemHandle>::new().run().unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
    }

    #[test]
    fn test_empty_path_fails() {
        let err = Session::with_path("").run().unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
    }

    #[test]
    fn test_zero_overrides_fail() {
        let handle = MemHandle::new(16, 4);
        let err = Session::with_handle(handle)
            .options(Options::new().with_block_size(0))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));

        let handle = MemHandle::new(16, 4);
        let err = Session::with_handle(handle)
            .options(Options::new().with_length(0))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
    }

    #[test]
    fn test_zero_metadata_fields_fail() {
        let handle = MemHandle::new(16, 4);
        let err = Session::with_handle(handle)
            .options(Options::new().with_metadata(Metadata::new(0, 16)))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));

        let handle = MemHandle::new(16, 4);
        let err = Session::with_handle(handle)
            .options(Options::new().with_metadata(Metadata::new(4, 0)))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
    }

    #[test]
    fn test_validation_failure_returns_supplied_handle() {
        let handle = MemHandle::new(16, 4);
        let closed = handle.closed_flag();
        let err = Session::with_handle(handle)
            .options(Options::new().with_block_size(0))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
        let handle = err.handle.expect("handle should be returned");
        assert!(!*closed.borrow());
        let mut buf = [0u8; 4];
        assert_eq!(handle.read_at(&mut buf, 0).unwrap(), 4);
    }

    #[test]
    fn test_query_disallowed_without_sizes_fails_without_open() {
        // A nonexistent path: if the session tried to open it the error
        // would be Io, so an InvalidArgumentValue proves validation ran
        // first.
        let err = Session::with_path("/nonexistent/blkseq-test-file")
            .options(Options::new().with_allow_query(false))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgumentValue(_)));
    }

    #[test]
    fn test_query_disallowed_with_explicit_sizes_skips_stat() {
        let handle = MemHandle::new(16, 4);
        let stats = Rc::clone(&handle.stats);
        let result = Session::with_handle(handle)
            .options(
                Options::new()
                    .with_allow_query(false)
                    .with_block_size(4)
                    .with_length(16),
            )
            .run()
            .unwrap();
        assert_eq!(result.bytes_read, 16);
        assert_eq!(*stats.borrow(), 0);
    }

    #[test]
    fn test_metadata_skips_stat() {
        let handle = MemHandle::new(16, 4);
        let stats = Rc::clone(&handle.stats);
        let result = Session::with_handle(handle)
            .options(Options::new().with_metadata(Metadata::new(4, 16)))
            .run()
            .unwrap();
        assert_eq!(result.blocks, 4);
        assert_eq!(*stats.borrow(), 0);
    }

    #[test]
    fn test_supplied_handle_stays_open() {
        let handle = MemHandle::new(16, 4);
        let closed = handle.closed_flag();
        let result = Session::with_handle(handle).run().unwrap();
        assert!(result.handle.is_some());
        assert!(!*closed.borrow());
    }

    #[test]
    fn test_supplied_handle_closed_on_request() {
        let handle = MemHandle::new(16, 4);
        let closed = handle.closed_flag();
        let result = Session::with_handle(handle)
            .options(Options::new().with_close_on_finish(true))
            .run()
            .unwrap();
        assert!(result.handle.is_none());
        assert!(*closed.borrow());
    }

    #[test]
    fn test_path_handle_closed_by_default() {
        let tmp = lorem_file(100);
        let result = Session::with_path(tmp.path()).run().unwrap();
        assert!(result.handle.is_none());
        assert_eq!(result.bytes_read, 100);
    }

    #[test]
    fn test_path_handle_kept_open_on_request() {
        let tmp = lorem_file(100);
        let result = Session::with_path(tmp.path())
            .options(Options::new().with_close_on_finish(false))
            .run()
            .unwrap();
        let handle = result.handle.expect("handle should be returned");
        // Still readable.
        let mut buf = [0u8; 10];
        assert_eq!(handle.read_at(&mut buf, 0).unwrap(), 10);
    }

    #[test]
    fn test_scenario_8206_byte_file_in_4096_blocks() {
        let tmp = lorem_file(8206);
        let mut per_block = Vec::new();
        let result = Session::with_path(tmp.path())
            .options(Options::new().with_metadata(Metadata::new(4096, 8206)))
            .on_block(|block| {
                per_block.push((block.offset, block.bytes_read));
                Ok(())
            })
            .run()
            .unwrap();

        assert_eq!(result.blocks, 3);
        assert_eq!(result.bytes_read, 8206);
        assert_eq!(per_block, vec![(0, 4096), (4096, 4096), (8192, 14)]);
    }

    #[test]
    fn test_scenario_length_override_wins_over_true_size() {
        let tmp = lorem_file(8206);
        let mut per_block = Vec::new();
        let result = Session::with_path(tmp.path())
            .options(Options::new().with_block_size(2048).with_length(8192))
            .on_block(|block| {
                per_block.push(block.bytes_read);
                Ok(())
            })
            .run()
            .unwrap();

        assert_eq!(result.blocks, 4);
        assert_eq!(result.bytes_read, 8192);
        assert_eq!(per_block, vec![2048, 2048, 2048, 2048]);
    }

    #[test]
    fn test_end_at_or_below_start_reads_to_file_end() {
        let tmp = lorem_file(100);
        let to_end = Session::with_path(tmp.path())
            .options(Options::new().with_start(40))
            .run()
            .unwrap();
        let end_below = Session::with_path(tmp.path())
            .options(Options::new().with_start(40).with_end(10))
            .run()
            .unwrap();
        assert_eq!(to_end.bytes_read, 60);
        assert_eq!(end_below.bytes_read, 60);
    }

    #[test]
    fn test_run_is_idempotent_across_fresh_sessions() {
        let tmp = lorem_file(1000);
        let opts = Options::new().with_metadata(Metadata::new(256, 1000));

        let mut first = Vec::new();
        Session::with_path(tmp.path())
            .options(opts.clone())
            .on_block(|block| {
                first.push((block.offset, block.bytes_read));
                Ok(())
            })
            .run()
            .unwrap();

        let mut second = Vec::new();
        Session::with_path(tmp.path())
            .options(opts)
            .on_block(|block| {
                second.push((block.offset, block.bytes_read));
                Ok(())
            })
            .run()
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_read_failure_closes_owned_handle_best_effort() {
        // Block 2 of 3 fails; the handle is still closed.
        let handle = MemHandle::new(12, 4).failing_at(2);
        let closed = handle.closed_flag();
        let err = Session::with_handle(handle)
            .options(Options::new().with_close_on_finish(true))
            .run()
            .unwrap_err();

        match err.error {
            Error::ReadFailure { block, offset, .. } => {
                assert_eq!(block, 2);
                assert_eq!(offset, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.handle.is_none());
        assert!(*closed.borrow());
    }

    #[test]
    fn test_borrowed_handle_survives_read_failure() {
        // A pass over a caller-supplied handle fails mid-way; the handle
        // comes back still open and readable.
        let handle = MemHandle::new(12, 4).failing_at(2);
        let closed = handle.closed_flag();
        let err = Session::with_handle(handle).run().unwrap_err();

        assert!(matches!(err.error, Error::ReadFailure { block: 2, .. }));
        assert!(!*closed.borrow());
        let handle = err.handle.expect("handle should be returned");
        let mut buf = [0u8; 4];
        assert_eq!(handle.read_at(&mut buf, 0).unwrap(), 4);
    }

    #[test]
    fn test_close_failure_does_not_mask_read_failure() {
        let handle = MemHandle::new(12, 4).failing_at(2).failing_close();
        let err = Session::with_handle(handle)
            .options(Options::new().with_close_on_finish(true))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::ReadFailure { .. }));
    }

    #[test]
    fn test_close_failure_surfaces_after_clean_pass() {
        let handle = MemHandle::new(12, 4).failing_close();
        let err = Session::with_handle(handle)
            .options(Options::new().with_close_on_finish(true))
            .run()
            .unwrap_err();
        assert!(matches!(err.error, Error::CloseFailure { .. }));
        assert!(err.handle.is_none());
    }

    #[test]
    fn test_callback_order() {
        let handle = MemHandle::new(8, 4);
        let order = Rc::new(RefCell::new(Vec::new()));

        let for_block = Rc::clone(&order);
        let for_close = Rc::clone(&order);
        let for_finish = Rc::clone(&order);
        Session::with_handle(handle)
            .options(Options::new().with_close_on_finish(true))
            .on_block(move |block| {
                for_block.borrow_mut().push(format!("block{}", block.index));
                Ok(())
            })
            .on_close(move |result| {
                assert!(result.is_ok());
                for_close.borrow_mut().push("close".to_string());
            })
            .on_finish(move |result| {
                assert_eq!(result.bytes_read, 8);
                for_finish.borrow_mut().push("finish".to_string());
            })
            .run()
            .unwrap();

        assert_eq!(*order.borrow(), vec!["block0", "block1", "close", "finish"]);
    }

    #[test]
    fn test_on_close_not_invoked_when_handle_stays_open() {
        let handle = MemHandle::new(8, 4);
        let mut close_seen = false;
        let result = Session::with_handle(handle)
            .on_close(|_| close_seen = true)
            .run()
            .unwrap();
        assert!(result.handle.is_some());
        assert!(!close_seen);
    }

    #[test]
    fn test_noop_touches_nothing() {
        let result = Session::<MemHandle>::new()
            .options(
                Options::new()
                    .with_noop(true)
                    .with_block_size(4096)
                    .with_length(8192),
            )
            .run()
            .unwrap();
        assert!(result.handle.is_none());
        assert_eq!(result.block_size, 4096);
        assert_eq!(result.length, 8192);
        assert_eq!(result.blocks, 0);
    }

    #[test]
    fn test_read_by_block_convenience() {
        let tmp = lorem_file(100);
        let mut collected = Vec::new();
        let result = read_by_block(tmp.path(), |block| {
            collected.extend_from_slice(block.data());
            Ok(())
        })
        .unwrap();
        assert_eq!(result.bytes_read, 100);
        assert_eq!(collected.len(), 100);
        assert!(result.handle.is_none());
    }
}

//! CLI tool for reading a file sequentially by I/O blocks.
//!
//! Streams the file (or a byte range of it) to stdout or an output file,
//! one block at a time at the filesystem's preferred block size unless
//! overridden.

use blkseq::{Options, Session};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Read a file sequentially by I/O blocks.
///
/// The block size defaults to the filesystem's preferred I/O size for the
/// file; the range defaults to the whole file.
#[derive(Parser, Debug)]
#[command(name = "blkseq")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the file to read
    path: PathBuf,

    /// Byte offset to start reading from
    #[arg(short, long, default_value = "0")]
    start: u64,

    /// Exclusive byte offset to stop reading at (default: end of file)
    #[arg(short, long)]
    end: Option<u64>,

    /// Block size in bytes (default: the filesystem's preferred size)
    #[arg(short, long)]
    block_size: Option<u64>,

    /// Number of bytes to treat as the file's length
    #[arg(short, long)]
    length: Option<u64>,

    /// Output file path (default: stdout)
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Show resolved parameters and a per-block table
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> blkseq::Result<()> {
    let mut options = Options::new().with_start(args.start);
    if let Some(end) = args.end {
        options = options.with_end(end);
    }
    if let Some(block_size) = args.block_size {
        options = options.with_block_size(block_size);
    }
    if let Some(length) = args.length {
        options = options.with_length(length);
    }

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(blkseq::Error::from)?),
        None => Box::new(io::stdout().lock()),
    };

    if args.verbose {
        eprintln!("File: {}", args.path.display());
        eprintln!("Start: {} (0x{:x})", args.start, args.start);
        match args.end {
            Some(end) => eprintln!("End: {end} (0x{end:x})"),
            None => eprintln!("End: (end of file)"),
        }
        eprintln!();
        eprintln!("{:<8} {:<16} Bytes", "Block", "Offset");
        eprintln!("{}", "-".repeat(40));
    }

    let verbose = args.verbose;
    let result = Session::with_path(&args.path)
        .options(options)
        .on_block(|block| {
            if verbose {
                eprintln!("{:<8} {:<16} {}", block.index, block.offset, block.bytes_read);
            }
            sink.write_all(block.data()).map_err(blkseq::Error::from)
        })
        .run()?;

    sink.flush().map_err(blkseq::Error::from)?;

    if verbose {
        eprintln!("{}", "-".repeat(40));
        eprintln!(
            "Read {} bytes in {} block(s) of {} bytes (length {})",
            result.bytes_read, result.blocks, result.block_size, result.length
        );
        if let Some(output) = &args.output {
            eprintln!("Output written to: {}", output.display());
        }
    }

    Ok(())
}

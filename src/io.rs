//! Opening inputs and outputs by name.

use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// The name that refers to standard input.
pub const STANDARD_INPUT: &str = "stdin";

/// The name that refers to standard output.
pub const STANDARD_OUTPUT: &str = "stdout";

/// Opens a file for buffered reading.
///
/// Files ending in `.gz` are decompressed, including multi-member archives.
/// The name `stdin` reads from standard input.
pub fn open<P>(path: P) -> io::Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if path == Path::new(STANDARD_INPUT) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path)?;

    if path.extension() == Some(OsStr::new("gz")) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Creates a file for buffered writing.
///
/// The name `stdout` writes to standard output.
pub fn create<P>(path: P) -> io::Result<Box<dyn Write>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if path == Path::new(STANDARD_OUTPUT) {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }

    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

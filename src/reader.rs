//! Reading chains from chain files.

use std::io;
use std::io::BufRead;

use crate::Line;
use crate::alignment::chain::Chains;
use crate::line;

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line that is not a valid chain file line.
    Line(line::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(err) => write!(f, "line error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A chain file reader.
///
/// Lines may end in `\n` or `\r\n`. Plain and gzipped files can be opened
/// with [`crate::io::open`].
///
/// # Examples
///
/// ```
/// let data = b"chain 4900 chrY 58368225 + 25985403 25985638 chr5 151006098 - 43257292 43257528 1\n\
///              9\t1\t0\n\
///              10\t0\t5\n\
///              61\t4\t0\n\
///              16\t0\t4\n\
///              42\t3\t0\n\
///              16\t0\t8\n\
///              14\t1\t0\n\
///              3\t7\t0\n\
///              48\n";
///
/// let mut reader = chainkit::Reader::new(&data[..]);
/// let chain = reader.chains().next().unwrap()?;
///
/// assert_eq!(chain.blocks().len(), 9);
/// assert_eq!(chain.query_sequence().chromosome_name(), "chr5");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a chain file reader.
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Reads and classifies the next line, or returns [`None`] at the end of
    /// the input.
    pub(crate) fn next_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        match read_line(&mut self.0, buffer).map_err(Error::Io)? {
            0 => Ok(None),
            _ => buffer.parse::<Line>().map(Some).map_err(Error::Line),
        }
    }

    /// Returns an iterator over the chains in the underlying reader.
    ///
    /// Blank lines and `#` comments may appear between chains.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"#score filtered\nchain 10 t 8 + 0 8 q 8 + 0 8 1\n8\n\nchain 5 t 8 + 0 2 q 8 + 6 8\n2\n";
    /// let mut reader = chainkit::Reader::new(&data[..]);
    ///
    /// let chains = reader.chains().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(chains.len(), 2);
    /// assert_eq!(chains[1].id(), Some(2));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn chains(&mut self) -> Chains<'_, T> {
        Chains::new(self)
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

/// Reads a line into `buffer` without its `\n` or `\r\n` ending.
///
/// The buffer is cleared first. Returns the number of bytes consumed, so `0`
/// marks the end of the input.
pub(crate) fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    let read = reader.read_line(buffer)?;

    if buffer.ends_with('\n') {
        buffer.pop();

        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }

    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings_are_stripped() {
        let mut data = &b"chain 1 t 4 + 0 4 q 4 + 0 4 1\r\n4\n\n"[..];
        let mut buffer = String::from("stale");

        assert_eq!(read_line(&mut data, &mut buffer).unwrap(), 31);
        assert_eq!(buffer, "chain 1 t 4 + 0 4 q 4 + 0 4 1");

        assert_eq!(read_line(&mut data, &mut buffer).unwrap(), 2);
        assert_eq!(buffer, "4");

        assert_eq!(read_line(&mut data, &mut buffer).unwrap(), 1);
        assert_eq!(buffer, "");

        assert_eq!(read_line(&mut data, &mut buffer).unwrap(), 0);
    }

    #[test]
    fn lines_are_classified() {
        let mut reader = Reader::new(&b"# made by hand\nchain 1 t 4 + 0 4 q 4 + 0 4 1\n4\n"[..]);
        let mut buffer = String::new();

        assert!(matches!(reader.next_line(&mut buffer), Ok(Some(Line::Comment(_)))));
        assert!(matches!(reader.next_line(&mut buffer), Ok(Some(Line::Header(_)))));
        assert!(matches!(reader.next_line(&mut buffer), Ok(Some(Line::AlignmentData(_)))));
        assert!(matches!(reader.next_line(&mut buffer), Ok(None)));
    }

    #[test]
    fn crlf_chain_files() {
        let data = b"chain 1 t 10 + 0 10 q 12 - 2 12 7\r\n4\t1\t1\r\n5\r\n";
        let mut reader = Reader::new(&data[..]);

        let chain = reader.chains().next().unwrap().unwrap();
        assert_eq!(chain.to_string(), "chain 1 t 10 + 0 10 q 12 - 2 12 7\n4\t1\t1\n5");
    }

    #[test]
    fn invalid_lines_fail() {
        let mut reader = Reader::new(&b"chain 1 t 4 + 0 4 q 4 + 0 4 1\n4\tx\t0\n"[..]);
        let err = reader.chains().next().unwrap().unwrap_err();

        assert_eq!(
            err.to_string(),
            "parse error: reader error: line error: parse error: invalid alignment data record: \
             invalid dt: invalid digit found in string: line: 4\tx\t0"
        );
    }
}

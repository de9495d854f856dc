//! An AXT file reader.

use std::io;
use std::io::BufRead;
use std::num::ParseIntError;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use omics::coordinate::strand;

use crate::axt;
use crate::axt::Record;
use crate::axt::Span;
use crate::reader::read_line;

/// The prefix of a comment line.
const COMMENT_PREFIX: char = '#';

/// The number of fields in a summary line without a score.
const NUM_FIELDS_WITHOUT_SCORE: usize = 8;

/// The number of fields in a summary line with a score.
const NUM_FIELDS_WITH_SCORE: usize = 9;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A parse error related to an AXT record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the summary line.
    IncorrectNumberOfFields(usize),

    /// An invalid position.
    InvalidPosition(ParseIntError),

    /// A one-based start of zero.
    ZeroStart,

    /// An invalid query strand.
    InvalidStrand(strand::Error),

    /// An invalid score.
    InvalidScore(ParseIntError),

    /// The input ended before both symbol lines were read.
    MissingSymbols,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in summary line: expected \
                 {NUM_FIELDS_WITHOUT_SCORE} or {NUM_FIELDS_WITH_SCORE} fields, found {fields} \
                 fields"
            ),
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {err}"),
            ParseError::ZeroStart => write!(f, "starts are one-based and cannot be zero"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::InvalidScore(err) => write!(f, "invalid score: {err}"),
            ParseError::MissingSymbols => write!(f, "record ends before its symbol lines"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to reading AXT records.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parse error on the given line.
    Parse(usize, ParseError),

    /// An invalid record starting on the given line.
    Record(usize, axt::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(line_no, err) => write!(f, "parse error: line {line_no}: {err}"),
            Error::Record(line_no, err) => write!(f, "invalid record: line {line_no}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////////////
// Reader
////////////////////////////////////////////////////////////////////////////////////////

/// An AXT file reader.
#[derive(Clone, Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates an AXT file reader.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Returns an iterator over the records in the underlying reader.
    ///
    /// Blank lines and `#` comments between records are skipped. The
    /// ordinal in each summary line is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::axt::Reader;
    /// use omics::coordinate::Strand;
    ///
    /// let data = b"# comment\n0 chr1 11 14 chr2 1 3 - 120\nACGT\nAC-T\n\n";
    /// let mut reader = Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 1);
    ///
    /// let record = &records[0];
    /// assert_eq!(record.target().start(), 10);
    /// assert_eq!(record.query().end(), 3);
    /// assert_eq!(record.query_strand(), Strand::Negative);
    /// assert_eq!(record.score(), 120);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> Records<'_, T> {
        Records {
            reader: self,
            line_no: 0,
            buffer: String::new(),
        }
    }
}

/// An iterator over the records in an AXT file.
#[derive(Debug)]
pub struct Records<'a, T>
where
    T: BufRead,
{
    /// The reader.
    reader: &'a mut Reader<T>,

    /// The number of lines read so far.
    line_no: usize,

    /// The line buffer.
    buffer: String,
}

impl<T> Records<'_, T>
where
    T: BufRead,
{
    /// Reads the next line into the buffer, returning `false` at the end of
    /// input.
    fn advance(&mut self) -> Result<bool, Error> {
        let read = read_line(&mut self.reader.0, &mut self.buffer).map_err(Error::Io)?;
        self.line_no += 1;
        Ok(read > 0)
    }

    /// Reads a symbol line following the summary on `summary_line_no`.
    fn symbols(&mut self, summary_line_no: usize) -> Result<String, Error> {
        if !self.advance()? {
            return Err(Error::Parse(summary_line_no, ParseError::MissingSymbols));
        }

        Ok(self.buffer.trim().to_string())
    }

    /// Reads a full record once a summary line is in the buffer.
    fn read_record(&mut self) -> Result<Record, Error> {
        let line_no = self.line_no;
        let summary = parse_summary(&self.buffer).map_err(|e| Error::Parse(line_no, e))?;

        let target_symbols = self.symbols(line_no)?;
        let query_symbols = self.symbols(line_no)?;

        Record::try_new(
            summary.target,
            summary.query,
            summary.query_strand,
            summary.score,
            target_symbols,
            query_symbols,
        )
        .map_err(|e| Error::Record(line_no, e))
    }
}

impl<T> Iterator for Records<'_, T>
where
    T: BufRead,
{
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.advance() {
                Ok(false) => return None,
                Ok(true) => {}
                Err(err) => return Some(Err(err)),
            }

            let line = self.buffer.trim_start();

            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            return Some(self.read_record());
        }
    }
}

/// The parsed contents of a summary line.
#[derive(Debug)]
struct Summary {
    /// The target span.
    target: Span,

    /// The query span.
    query: Span,

    /// The query strand.
    query_strand: Strand,

    /// The score.
    score: i64,
}

/// Parses a summary line.
fn parse_summary(line: &str) -> Result<Summary, ParseError> {
    let fields = line.split_whitespace().collect::<Vec<_>>();

    if fields.len() != NUM_FIELDS_WITHOUT_SCORE && fields.len() != NUM_FIELDS_WITH_SCORE {
        return Err(ParseError::IncorrectNumberOfFields(fields.len()));
    }

    let target = span(fields[1], fields[2], fields[3])?;
    let query = span(fields[4], fields[5], fields[6])?;
    let query_strand = fields[7]
        .parse::<Strand>()
        .map_err(ParseError::InvalidStrand)?;
    let score = match fields.get(8) {
        Some(score) => score.parse::<i64>().map_err(ParseError::InvalidScore)?,
        None => 0,
    };

    Ok(Summary {
        target,
        query,
        query_strand,
        score,
    })
}

/// Parses a span with a one-based, inclusive start.
fn span(name: &str, start: &str, end: &str) -> Result<Span, ParseError> {
    let start = start
        .parse::<Number>()
        .map_err(ParseError::InvalidPosition)?;
    let end = end.parse::<Number>().map_err(ParseError::InvalidPosition)?;

    let start = start.checked_sub(1).ok_or(ParseError::ZeroStart)?;
    Ok(Span::new(name, start, end))
}

//! Gapped pairwise alignments in the AXT format.
//!
//! An AXT record holds the aligned symbols for both sequences, with `-`
//! marking a gap. Coordinates are kept zero-based and half-open in memory;
//! the text format uses one-based starts, and [`Writer`] and [`Reader`]
//! convert at the boundary. Query coordinates are expressed on the query
//! strand.

use std::io;
use std::io::Write;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

pub mod project;
pub mod reader;
pub mod score;
pub mod window;

pub use project::project;
pub use reader::Reader;
pub use window::Window;

/// The symbol that marks a gap.
pub const GAP: u8 = b'-';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// The end of a span came before its start.
    InvertedSpan(String, Number, Number),

    /// The two symbol strings were not the same length.
    SymbolLengthMismatch(usize, usize),

    /// The number of non-gap symbols did not match the span on that sequence.
    SymbolCountMismatch(String, Number, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvertedSpan(name, start, end) => {
                write!(f, "span on `{name}` ends ({end}) before it starts ({start})")
            }
            Error::SymbolLengthMismatch(target, query) => write!(
                f,
                "target symbols ({target}) and query symbols ({query}) differ in length"
            ),
            Error::SymbolCountMismatch(name, span, count) => write!(
                f,
                "span on `{name}` covers {span} bases but {count} symbols are aligned"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Span
////////////////////////////////////////////////////////////////////////////////////////

/// A named, half-open range on one of the aligned sequences.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    /// The sequence name.
    name: String,

    /// The start.
    start: Number,

    /// The end.
    end: Number,
}

impl Span {
    /// Creates a new [`Span`].
    pub fn new(name: impl Into<String>, start: Number, end: Number) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Gets the sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the start.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Number {
        self.end
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// An AXT record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The target span (always on the `+` strand).
    target: Span,

    /// The query span, on `query_strand`.
    query: Span,

    /// The query strand.
    query_strand: Strand,

    /// The alignment score.
    score: i64,

    /// The aligned target symbols.
    target_symbols: String,

    /// The aligned query symbols.
    query_symbols: String,
}

impl Record {
    /// Attempts to create a new [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::axt::Record;
    /// use chainkit::axt::Span;
    /// use omics::coordinate::Strand;
    ///
    /// let record = Record::try_new(
    ///     Span::new("chr1", 10, 14),
    ///     Span::new("chr2", 0, 3),
    ///     Strand::Positive,
    ///     120,
    ///     "ACGT".into(),
    ///     "AC-T".into(),
    /// )?;
    ///
    /// assert_eq!(record.symbol_count(), 4);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        target: Span,
        query: Span,
        query_strand: Strand,
        score: i64,
        target_symbols: String,
        query_symbols: String,
    ) -> Result<Self> {
        for span in [&target, &query] {
            if span.end < span.start {
                return Err(Error::InvertedSpan(span.name.clone(), span.start, span.end));
            }
        }

        if target_symbols.len() != query_symbols.len() {
            return Err(Error::SymbolLengthMismatch(
                target_symbols.len(),
                query_symbols.len(),
            ));
        }

        for (span, symbols) in [(&target, &target_symbols), (&query, &query_symbols)] {
            let count = aligned_bases(symbols);
            if count as Number != span.end - span.start {
                return Err(Error::SymbolCountMismatch(
                    span.name.clone(),
                    span.end - span.start,
                    count,
                ));
            }
        }

        Ok(Self {
            target,
            query,
            query_strand,
            score,
            target_symbols,
            query_symbols,
        })
    }

    /// Gets the target span.
    pub fn target(&self) -> &Span {
        &self.target
    }

    /// Gets the query span.
    pub fn query(&self) -> &Span {
        &self.query
    }

    /// Gets the query strand.
    pub fn query_strand(&self) -> Strand {
        self.query_strand
    }

    /// Gets the score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Gets the aligned target symbols.
    pub fn target_symbols(&self) -> &str {
        &self.target_symbols
    }

    /// Gets the aligned query symbols.
    pub fn query_symbols(&self) -> &str {
        &self.query_symbols
    }

    /// Gets the number of alignment columns.
    pub fn symbol_count(&self) -> usize {
        self.target_symbols.len()
    }

    /// Returns this record with new spans and query strand, keeping the
    /// symbols and score.
    pub(crate) fn relocated(self, target: Span, query: Span, query_strand: Strand) -> Self {
        Self {
            target,
            query,
            query_strand,
            ..self
        }
    }
}

/// Counts the non-gap symbols.
fn aligned_bases(symbols: &str) -> usize {
    symbols.bytes().filter(|&symbol| symbol != GAP).count()
}

////////////////////////////////////////////////////////////////////////////////////////
// Writer
////////////////////////////////////////////////////////////////////////////////////////

/// Writes AXT records, numbering them from zero.
///
/// # Examples
///
/// ```
/// use chainkit::axt::Record;
/// use chainkit::axt::Span;
/// use chainkit::axt::Writer;
/// use omics::coordinate::Strand;
///
/// let record = Record::try_new(
///     Span::new("chr1", 10, 14),
///     Span::new("chr2", 0, 3),
///     Strand::Negative,
///     120,
///     "ACGT".into(),
///     "AC-T".into(),
/// )?;
///
/// let mut writer = Writer::new(Vec::new());
/// writer.write_record(&record)?;
///
/// assert_eq!(
///     String::from_utf8(writer.into_inner())?,
///     "0 chr1 11 14 chr2 1 3 - 120\nACGT\nAC-T\n\n"
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Writer<W>
where
    W: Write,
{
    /// The inner writer.
    inner: W,

    /// The ordinal of the next record.
    next: usize,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a new AXT writer.
    pub fn new(inner: W) -> Self {
        Self { inner, next: 0 }
    }

    /// Writes a single record.
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        writeln!(
            self.inner,
            "{} {} {} {} {} {} {} {} {}",
            self.next,
            record.target.name,
            record.target.start + 1,
            record.target.end,
            record.query.name,
            record.query.start + 1,
            record.query.end,
            record.query_strand,
            record.score
        )?;
        writeln!(self.inner, "{}", record.target_symbols)?;
        writeln!(self.inner, "{}", record.query_symbols)?;
        writeln!(self.inner)?;

        self.next += 1;
        Ok(())
    }

    /// Consumes `self` and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

//! A sequence within a header record.

use std::num::ParseIntError;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use omics::coordinate::strand;

use crate::alignment::chain::header::DELIMITER;

/// Errors associated with parsing a sequence.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid chromosome size.
    InvalidChromosomeSize(ParseIntError),

    /// An invalid strand.
    InvalidStrand(strand::Error),

    /// An invalid alignment start.
    InvalidAlignmentStart(ParseIntError),

    /// An invalid alignment end.
    InvalidAlignmentEnd(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidChromosomeSize(err) => write!(f, "invalid chromosome size: {}", err),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {}", err),
            ParseError::InvalidAlignmentStart(err) => write!(f, "invalid alignment start: {}", err),
            ParseError::InvalidAlignmentEnd(err) => write!(f, "invalid alignment end: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Sequence`].
#[derive(Debug)]
pub enum Error {
    /// The alignment start was not strictly before the alignment end.
    EmptyAlignment(String, Number, Number),

    /// The alignment end exceeds the size of the chromosome.
    EndExceedsSize(String, Number, Number),

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyAlignment(chrom, start, end) => write!(
                f,
                "the alignment start ({start}) is not before the alignment end ({end}) on `{chrom}`"
            ),
            Error::EndExceedsSize(chrom, end, size) => write!(
                f,
                "the end position ({end}) exceeds the size of the chromosome `{chrom}` ({size})"
            ),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The sequence portion(s) of a header record.
///
/// The alignment start and end are expressed on the strand given by
/// [`Sequence::strand()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// The chromosome name.
    chromosome_name: String,

    /// The chromosome size.
    chromosome_size: Number,

    /// The strand.
    strand: Strand,

    /// The start of the alignment.
    alignment_start: Number,

    /// The end of the alignment.
    alignment_end: Number,
}

impl Sequence {
    /// Attempts to create a new sequence from already parsed values.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let sequence = Sequence::try_new("seq0", 10, Strand::Negative, 2, 5)?;
    /// assert_eq!(sequence.to_string(), "seq0 10 - 2 5");
    ///
    /// let err = Sequence::try_new("seq0", 10, Strand::Positive, 5, 5).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "the alignment start (5) is not before the alignment end (5) on `seq0`"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        chromosome_name: impl Into<String>,
        chromosome_size: Number,
        strand: Strand,
        alignment_start: Number,
        alignment_end: Number,
    ) -> Result<Self> {
        let chromosome_name = chromosome_name.into();

        if alignment_start >= alignment_end {
            return Err(Error::EmptyAlignment(
                chromosome_name,
                alignment_start,
                alignment_end,
            ));
        }

        if alignment_end > chromosome_size {
            return Err(Error::EndExceedsSize(
                chromosome_name,
                alignment_end,
                chromosome_size,
            ));
        }

        Ok(Self {
            chromosome_name,
            chromosome_size,
            strand,
            alignment_start,
            alignment_end,
        })
    }

    /// Attempts to create a new sequence from the five textual header fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let sequence = Sequence::try_from_str_parts("seq0", "2", "+", "0", "2")?;
    ///
    /// assert_eq!(sequence.chromosome_name(), "seq0");
    /// assert_eq!(sequence.chromosome_size(), 2);
    /// assert_eq!(sequence.strand(), Strand::Positive);
    /// assert_eq!(sequence.alignment_start(), 0);
    /// assert_eq!(sequence.alignment_end(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_str_parts(
        chromosome_name: &str,
        chromosome_size: &str,
        strand: &str,
        alignment_start: &str,
        alignment_end: &str,
    ) -> Result<Self> {
        let chromosome_size = chromosome_size
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidChromosomeSize(err)))?;
        let strand = strand
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidStrand(err)))?;
        let alignment_start = alignment_start
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignmentStart(err)))?;
        let alignment_end = alignment_end
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignmentEnd(err)))?;

        Self::try_new(
            chromosome_name,
            chromosome_size,
            strand,
            alignment_start,
            alignment_end,
        )
    }

    /// Creates a sequence whose bounds are already known to be valid.
    pub(crate) fn from_parts(
        chromosome_name: String,
        chromosome_size: Number,
        strand: Strand,
        alignment_start: Number,
        alignment_end: Number,
    ) -> Self {
        Self {
            chromosome_name,
            chromosome_size,
            strand,
            alignment_start,
            alignment_end,
        }
    }

    /// Returns a copy of this sequence with new alignment bounds.
    pub(crate) fn with_bounds(&self, alignment_start: Number, alignment_end: Number) -> Self {
        Self {
            alignment_start,
            alignment_end,
            ..self.clone()
        }
    }

    /// Returns the chromosome name.
    pub fn chromosome_name(&self) -> &str {
        &self.chromosome_name
    }

    /// Returns the chromosome size.
    pub fn chromosome_size(&self) -> Number {
        self.chromosome_size
    }

    /// Returns the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the alignment start.
    pub fn alignment_start(&self) -> Number {
        self.alignment_start
    }

    /// Returns the alignment end.
    pub fn alignment_end(&self) -> Number {
        self.alignment_end
    }

    /// Returns the number of bases between the alignment start and end.
    pub fn span(&self) -> Number {
        self.alignment_end - self.alignment_start
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.chromosome_name,
            self.chromosome_size,
            self.strand,
            self.alignment_start,
            self.alignment_end
        )
    }
}

//! A header record.

pub mod sequence;

use std::num::ParseFloatError;
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
pub use sequence::Sequence;

/// The prefix for a header record.
pub const HEADER_PREFIX: &str = "chain";

/// The delimiter for a header record.
pub const DELIMITER: char = ' ';

/// The number of fields in a header record that carries no id.
pub const NUM_HEADER_FIELDS_WITHOUT_ID: usize = 12;

/// The number of fields in a header record that carries an id.
pub const NUM_HEADER_FIELDS_WITH_ID: usize = 13;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a header record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the header line.
    IncorrectNumberOfFields(usize),

    /// An invalid prefix.
    InvalidPrefix(String),

    /// An invalid score.
    InvalidScore(ParseFloatError),

    /// An invalid target sequence.
    InvalidTargetSequence(sequence::Error),

    /// An invalid query sequence.
    InvalidQuerySequence(sequence::Error),

    /// An invalid id.
    InvalidId(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in header: expected {} or {} fields, found {} fields",
                NUM_HEADER_FIELDS_WITHOUT_ID, NUM_HEADER_FIELDS_WITH_ID, fields
            ),
            ParseError::InvalidPrefix(prefix) => {
                write!(
                    f,
                    "invalid prefix: expected \"{}\", found \"{}\"",
                    HEADER_PREFIX, prefix
                )
            }
            ParseError::InvalidScore(err) => write!(f, "invalid score: {}", err),
            ParseError::InvalidTargetSequence(err) => {
                write!(f, "invalid target sequence: {}", err)
            }
            ParseError::InvalidQuerySequence(err) => write!(f, "invalid query sequence: {}", err),
            ParseError::InvalidId(err) => write!(f, "invalid id: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// The target sequence was not on the positive strand.
    NegativeTargetStrand(String),

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NegativeTargetStrand(chrom) => write!(
                f,
                "the target sequence `{chrom}` must be on the positive strand"
            ),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// A header record within a chain file.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The chain score.
    score: f64,

    /// The target sequence.
    target_sequence: Sequence,

    /// The query sequence.
    query_sequence: Sequence,

    /// The chain id, if one was given.
    id: Option<usize>,
}

impl Record {
    /// Attempts to create a new header [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header;
    /// use chainkit::alignment::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let target = Sequence::try_new("chr1", 100, Strand::Positive, 0, 10)?;
    /// let query = Sequence::try_new("chr2", 50, Strand::Negative, 5, 15)?;
    /// let header = header::Record::try_new(42.0, target, query, None)?;
    ///
    /// assert_eq!(header.to_string(), "chain 42 chr1 100 + 0 10 chr2 50 - 5 15");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        score: f64,
        target_sequence: Sequence,
        query_sequence: Sequence,
        id: Option<usize>,
    ) -> Result<Self> {
        if target_sequence.strand() != Strand::Positive {
            return Err(Error::NegativeTargetStrand(
                target_sequence.chromosome_name().to_string(),
            ));
        }

        Ok(Self::from_parts(score, target_sequence, query_sequence, id))
    }

    /// Creates a header whose sequences are already known to be valid.
    pub(crate) fn from_parts(
        score: f64,
        target_sequence: Sequence,
        query_sequence: Sequence,
        id: Option<usize>,
    ) -> Self {
        Self {
            score,
            target_sequence,
            query_sequence,
            id,
        }
    }

    /// Consumes `self` and returns the score, the target sequence, the query
    /// sequence, and the id.
    pub fn into_parts(self) -> (f64, Sequence, Sequence, Option<usize>) {
        (
            self.score,
            self.target_sequence,
            self.query_sequence,
            self.id,
        )
    }

    /// Gets the score.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header;
    ///
    /// let header = "chain 4900 seq0 2 + 0 2 seq0 2 - 0 2 1".parse::<header::Record>()?;
    ///
    /// assert_eq!(header.score(), 4900.0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Gets the target sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header;
    /// use omics::coordinate::Strand;
    ///
    /// let header = "chain 0 seq0 2 + 0 2 seq1 3 - 0 2 1".parse::<header::Record>()?;
    ///
    /// assert_eq!(header.target_sequence().chromosome_name(), "seq0");
    /// assert_eq!(header.target_sequence().chromosome_size(), 2);
    /// assert_eq!(header.target_sequence().strand(), Strand::Positive);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn target_sequence(&self) -> &Sequence {
        &self.target_sequence
    }

    /// Gets the query sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header;
    /// use omics::coordinate::Strand;
    ///
    /// let header = "chain 0 seq0 2 + 0 2 seq1 3 - 0 2 1".parse::<header::Record>()?;
    ///
    /// assert_eq!(header.query_sequence().chromosome_name(), "seq1");
    /// assert_eq!(header.query_sequence().chromosome_size(), 3);
    /// assert_eq!(header.query_sequence().strand(), Strand::Negative);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn query_sequence(&self) -> &Sequence {
        &self.query_sequence
    }

    /// Gets the id, if one is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header;
    ///
    /// let header = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 7".parse::<header::Record>()?;
    /// assert_eq!(header.id(), Some(7));
    ///
    /// let header = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2".parse::<header::Record>()?;
    /// assert_eq!(header.id(), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    /// Returns this header with the provided id.
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns a copy of this header with a new score and new alignment
    /// bounds on both sequences.
    pub(crate) fn narrowed(
        &self,
        score: f64,
        target: (Number, Number),
        query: (Number, Number),
    ) -> Self {
        Self {
            score,
            target_sequence: self.target_sequence.with_bounds(target.0, target.1),
            query_sequence: self.query_sequence.with_bounds(query.0, query.1),
            id: self.id,
        }
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split_whitespace().collect::<Vec<_>>();
        if parts.len() != NUM_HEADER_FIELDS_WITHOUT_ID && parts.len() != NUM_HEADER_FIELDS_WITH_ID
        {
            return Err(Error::Parse(ParseError::IncorrectNumberOfFields(
                parts.len(),
            )));
        }

        let chain = parts[0];
        if chain != HEADER_PREFIX {
            return Err(Error::Parse(ParseError::InvalidPrefix(chain.into())));
        }

        let score = parts[1]
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidScore(err)))?;
        let target_sequence =
            Sequence::try_from_str_parts(parts[2], parts[3], parts[4], parts[5], parts[6])
                .map_err(|err| Error::Parse(ParseError::InvalidTargetSequence(err)))?;
        let query_sequence =
            Sequence::try_from_str_parts(parts[7], parts[8], parts[9], parts[10], parts[11])
                .map_err(|err| Error::Parse(ParseError::InvalidQuerySequence(err)))?;
        let id = parts
            .get(12)
            .map(|id| id.parse())
            .transpose()
            .map_err(|err| Error::Parse(ParseError::InvalidId(err)))?;

        Record::try_new(score, target_sequence, query_sequence, id)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{HEADER_PREFIX}{DELIMITER}{:.0}{DELIMITER}{}{DELIMITER}{}",
            self.score, self.target_sequence, self.query_sequence,
        )?;

        if let Some(id) = self.id {
            write!(f, "{DELIMITER}{id}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn parse() {
        let header = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap();

        assert_eq!(header.score(), 0.0);

        assert_eq!(header.target_sequence().chromosome_name(), "seq0");
        assert_eq!(header.target_sequence().chromosome_size(), 2);
        assert_eq!(header.target_sequence().strand(), Strand::Positive);
        assert_eq!(header.target_sequence().alignment_start(), 0);
        assert_eq!(header.target_sequence().alignment_end(), 2);

        assert_eq!(header.query_sequence().chromosome_name(), "seq0");
        assert_eq!(header.query_sequence().chromosome_size(), 2);
        assert_eq!(header.query_sequence().strand(), Strand::Negative);
        assert_eq!(header.query_sequence().alignment_start(), 0);
        assert_eq!(header.query_sequence().alignment_end(), 2);

        assert_eq!(header.id(), Some(1));
    }

    #[test]
    pub fn parse_with_runs_of_whitespace() {
        let header = "chain\t12.7  seq0 2 + 0 2\tseq0 2 - 0 2"
            .parse::<Record>()
            .unwrap();

        assert_eq!(header.score(), 12.7);
        assert_eq!(header.id(), None);
        assert_eq!(header.to_string(), "chain 13 seq0 2 + 0 2 seq0 2 - 0 2");
    }

    #[test]
    fn incorrect_number_of_fields() {
        let err = "chain 0 seq0 2 + 0 2 seq0 2 - 0"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::IncorrectNumberOfFields(11))
        ));

        assert_eq!(
            err.to_string(),
            "parse error: invalid number of fields in header: expected 12 or 13 fields, found 11 \
             fields"
        );
    }

    #[test]
    fn invalid_prefix() {
        let err = "foo 0 seq0 2 + 0 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::InvalidPrefix(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid prefix: expected \"chain\", found \"foo\""
        );
    }

    #[test]
    fn invalid_score() {
        let err = "chain ? seq0 2 + 0 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::InvalidScore(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid score: invalid float literal"
        );
    }

    #[test]
    fn invalid_target_sequence() {
        let err = "chain 0 seq0 ? + 0 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidTargetSequence(_))
        ));

        assert_eq!(
            err.to_string(),
            "parse error: invalid target sequence: parse error: invalid chromosome size: invalid \
             digit found in string"
        );
    }

    #[test]
    fn invalid_query_sequence() {
        let err = "chain 0 seq0 2 + 0 2 seq0 ? - 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidQuerySequence(_))
        ));
    }

    #[test]
    fn invalid_id() {
        let err = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 ?"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::InvalidId(_))));
        assert_eq!(
            err.to_string(),
            "parse error: invalid id: invalid digit found in string"
        );
    }

    #[test]
    fn start_not_before_end() {
        let err = "chain 0 seq0 2 + 2 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "parse error: invalid target sequence: the alignment start (2) is not before the \
             alignment end (2) on `seq0`"
        );
    }

    #[test]
    fn end_is_greater_than_size_query() {
        let err = "chain 0 seq0 2 + 0 1 seq0 2 - 0 3 1"
            .parse::<Record>()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "parse error: invalid query sequence: the end position (3) exceeds the size of the \
             chromosome `seq0` (2)"
        );
    }

    #[test]
    fn negative_target_strand() {
        let err = "chain 0 seq0 2 - 0 2 seq0 2 + 0 2 1"
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(err, Error::NegativeTargetStrand(_)));
        assert_eq!(
            err.to_string(),
            "the target sequence `seq0` must be on the positive strand"
        );
    }

    #[test]
    pub fn display() {
        let header = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1"
            .parse::<Record>()
            .unwrap();

        assert_eq!(header.to_string(), "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1");
    }
}

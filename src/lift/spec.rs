//! A single entry of a lift table.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::coordinate::flip_range;
use crate::coordinate::opposite;
use crate::lift::Error;

/// The number of fields in an entry without a strand.
const NUM_FIELDS_WITHOUT_STRAND: usize = 5;

/// The number of fields in an entry with a strand.
const NUM_FIELDS_WITH_STRAND: usize = 6;

/// The separator between a chromosome and a contig in an old name.
const CHROM_SEPARATOR: char = '/';

/// A parse error related to a [`Spec`].
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields.
    IncorrectNumberOfFields(usize),

    /// An invalid offset.
    InvalidOffset(ParseIntError),

    /// An invalid old sequence size.
    InvalidOldSize(ParseIntError),

    /// An invalid new sequence size.
    InvalidNewSize(ParseIntError),

    /// An invalid strand.
    InvalidStrand(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in lift spec: expected {NUM_FIELDS_WITHOUT_STRAND} or \
                 {NUM_FIELDS_WITH_STRAND} fields, found {fields} fields"
            ),
            ParseError::InvalidOffset(err) => write!(f, "invalid offset: {err}"),
            ParseError::InvalidOldSize(err) => write!(f, "invalid old size: {err}"),
            ParseError::InvalidNewSize(err) => write!(f, "invalid new size: {err}"),
            ParseError::InvalidStrand(strand) => write!(f, "invalid strand: {strand}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Removes a leading `chrom/` part from a contig name.
///
/// # Examples
///
/// ```
/// use chainkit::lift::spec::strip_chrom_prefix;
///
/// assert_eq!(strip_chrom_prefix("chr1/ctg5"), "ctg5");
/// assert_eq!(strip_chrom_prefix("ctg5"), "ctg5");
/// ```
pub fn strip_chrom_prefix(name: &str) -> &str {
    match name.split_once(CHROM_SEPARATOR) {
        Some((_, contig)) => contig,
        None => name,
    }
}

/// How the coordinates on one old sequence map onto a new sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Spec {
    /// The offset of the old sequence within the new one.
    offset: i64,

    /// The old sequence name.
    old_name: String,

    /// The old sequence size.
    old_size: Number,

    /// The new sequence name.
    new_name: String,

    /// The new sequence size.
    new_size: Number,

    /// The orientation of the old sequence within the new one.
    strand: Option<Strand>,
}

impl Spec {
    /// Creates a new [`Spec`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Spec;
    /// use omics::coordinate::Strand;
    ///
    /// let spec = Spec::new(20000, "ctg1", 1000, "chr1", 50000, Some(Strand::Positive));
    /// assert_eq!(spec.lift_range(10, 200)?, (20010, 20200));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        offset: i64,
        old_name: impl Into<String>,
        old_size: Number,
        new_name: impl Into<String>,
        new_size: Number,
        strand: Option<Strand>,
    ) -> Self {
        Self {
            offset,
            old_name: old_name.into(),
            old_size,
            new_name: new_name.into(),
            new_size,
            strand,
        }
    }

    /// Gets the offset.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Gets the old sequence name.
    pub fn old_name(&self) -> &str {
        &self.old_name
    }

    /// Gets the old sequence size.
    pub fn old_size(&self) -> Number {
        self.old_size
    }

    /// Gets the new sequence name.
    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    /// Gets the new sequence size.
    pub fn new_size(&self) -> Number {
        self.new_size
    }

    /// Gets the strand, if one was given.
    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// Whether the old sequence lies on the reverse strand of the new one.
    pub fn is_reverse(&self) -> bool {
        self.strand == Some(Strand::Negative)
    }

    /// Strips a leading `chrom/` part from the old name.
    pub(crate) fn strip_chrom_prefix(mut self) -> Self {
        self.old_name = strip_chrom_prefix(&self.old_name).to_string();
        self
    }

    /// Lifts a `+` strand range.
    ///
    /// For a reverse spec the range is first reflected through the old size.
    pub fn lift_range(&self, start: Number, end: Number) -> Result<(Number, Number), Error> {
        let (start, end) = (start as i64, end as i64);

        let (start, end) = if self.is_reverse() {
            flip_range(start, end, self.old_size as i64)
        } else {
            (start, end)
        };

        Ok((
            self.check(start + self.offset)?,
            self.check(end + self.offset)?,
        ))
    }

    /// Gets the shift to apply to coordinates on `strand` of the old
    /// sequence, along with the strand they end up on.
    ///
    /// A reverse spec flips the strand. Because the shift is the same for
    /// every coordinate, the order of stranded blocks is preserved.
    pub fn stranded_shift(&self, strand: Strand) -> (i64, Strand) {
        let far_side = self.new_size as i64 - self.offset - self.old_size as i64;

        match (self.is_reverse(), strand) {
            (false, Strand::Positive) => (self.offset, strand),
            (false, Strand::Negative) => (far_side, strand),
            (true, Strand::Positive) => (far_side, opposite(strand)),
            (true, Strand::Negative) => (self.offset, opposite(strand)),
        }
    }

    /// Applies a shift from [`Spec::stranded_shift()`] to one coordinate.
    pub fn shift(&self, value: Number, by: i64) -> Result<Number, Error> {
        self.check(value as i64 + by)
    }

    /// Ensures a lifted coordinate lies on the new sequence.
    fn check(&self, value: i64) -> Result<Number, Error> {
        if value < 0 || value > self.new_size as i64 {
            return Err(Error::CoordinateOutOfRange(
                self.new_name.clone(),
                value,
                self.new_size,
            ));
        }

        Ok(value as Number)
    }
}

impl FromStr for Spec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect::<Vec<_>>();

        if fields.len() != NUM_FIELDS_WITHOUT_STRAND && fields.len() != NUM_FIELDS_WITH_STRAND {
            return Err(ParseError::IncorrectNumberOfFields(fields.len()));
        }

        let offset = fields[0].parse().map_err(ParseError::InvalidOffset)?;
        let old_size = fields[2].parse().map_err(ParseError::InvalidOldSize)?;
        let new_size = fields[4].parse().map_err(ParseError::InvalidNewSize)?;

        let strand = match fields.get(5) {
            Some(strand) => Some(
                strand
                    .parse::<Strand>()
                    .map_err(|_| ParseError::InvalidStrand(strand.to_string()))?,
            ),
            None => None,
        };

        Ok(Self::new(
            offset, fields[1], old_size, fields[3], new_size, strand,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_and_without_strand() -> Result<(), Box<dyn std::error::Error>> {
        let spec = "100\tchr1/ctg1\t50\tchr1\t1000".parse::<Spec>()?;
        assert_eq!(spec.old_name(), "chr1/ctg1");
        assert_eq!(spec.strand(), None);
        assert_eq!(spec.strip_chrom_prefix().old_name(), "ctg1");

        let spec = "100 ctg1 50 chr1 1000 -".parse::<Spec>()?;
        assert!(spec.is_reverse());

        Ok(())
    }

    #[test]
    fn invalid_specs() {
        let err = "x ctg1 50 chr1 1000".parse::<Spec>().unwrap_err();
        assert_eq!(err.to_string(), "invalid offset: invalid digit found in string");

        let err = "0 ctg1 50 chr1 1000 ?".parse::<Spec>().unwrap_err();
        assert_eq!(err.to_string(), "invalid strand: ?");

        let err = "0 ctg1 50 chr1".parse::<Spec>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in lift spec: expected 5 or 6 fields, found 4 fields"
        );
    }

    #[test]
    fn reverse_ranges_reflect_through_the_old_size() {
        let spec = Spec::new(100, "ctg1", 50, "chr1", 1000, Some(Strand::Negative));
        assert_eq!(spec.lift_range(10, 20).unwrap(), (130, 140));
    }

    #[test]
    fn stranded_shifts() {
        let forward = Spec::new(100, "ctg1", 50, "chr1", 1000, None);
        assert_eq!(forward.stranded_shift(Strand::Positive), (100, Strand::Positive));
        assert_eq!(forward.stranded_shift(Strand::Negative), (850, Strand::Negative));

        let reverse = Spec::new(100, "ctg1", 50, "chr1", 1000, Some(Strand::Negative));
        assert_eq!(reverse.stranded_shift(Strand::Positive), (850, Strand::Negative));
        assert_eq!(reverse.stranded_shift(Strand::Negative), (100, Strand::Positive));

        // [10, 20) on `+` of the contig is [130, 140) on `+` of the chromosome,
        // which is [860, 870) on its `-` strand.
        assert_eq!(reverse.shift(10, 850).unwrap(), 860);
    }

    #[test]
    fn out_of_range_coordinates_fail() {
        let spec = Spec::new(990, "ctg1", 50, "chr1", 1000, None);
        let err = spec.lift_range(0, 20).unwrap_err();

        assert_eq!(
            err.to_string(),
            "lifted coordinate 1010 falls outside `chr1` (size 1000)"
        );
    }
}

//! PSL alignment records.
//!
//! A PSL line has 21 tab-separated columns: eight counts, the strand, the
//! query placement (name, size, start, end), the target placement, the block
//! count and three comma-terminated lists (block sizes, query starts, target
//! starts). Any further columns (such as the sequences of `pslx`) are kept
//! as-is.
//!
//! The overall starts and ends are always on the `+` strand. Block starts
//! are on the strand of their sequence: the first strand character for the
//! query, the second (if present, otherwise `+`) for the target.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

/// The delimiter between columns.
const DELIMITER: char = '\t';

/// The terminator after each entry of a block list.
const LIST_DELIMITER: char = ',';

/// The number of count columns.
pub const NUM_COUNT_FIELDS: usize = 8;

/// The number of required columns.
pub const NUM_FIELDS: usize = 21;

/// Whether `line` belongs to a PSL header rather than to a record.
///
/// Header lines (`psLayout version 3`, the column titles and the dashed
/// rule) and blank lines never start with a digit.
///
/// # Examples
///
/// ```
/// use chainkit::psl::is_header_line;
///
/// assert!(is_header_line("psLayout version 3"));
/// assert!(is_header_line("------------------------------"));
/// assert!(!is_header_line("10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t..."));
/// ```
pub fn is_header_line(line: &str) -> bool {
    !line
        .trim_start()
        .starts_with(|c: char| c.is_ascii_digit())
}

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A parse error related to a PSL record.
#[derive(Debug)]
pub enum ParseError {
    /// Fewer than the required number of columns.
    IncorrectNumberOfFields(usize),

    /// A column that should hold a number did not.
    InvalidNumber(usize, ParseIntError),

    /// An invalid strand column.
    InvalidStrand(String),

    /// The block count does not match the length of a block list.
    BlockCountMismatch(usize, usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in record: expected at least {NUM_FIELDS} fields, \
                 found {fields} fields"
            ),
            ParseError::InvalidNumber(column, err) => {
                write!(f, "invalid number in column {}: {err}", column + 1)
            }
            ParseError::InvalidStrand(strand) => write!(f, "invalid strand: {strand}"),
            ParseError::BlockCountMismatch(count, len) => write!(
                f,
                "block count ({count}) does not match a block list of length {len}"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Placement
////////////////////////////////////////////////////////////////////////////////////////

/// Where a record lies on one of its two sequences.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    /// The sequence name.
    name: String,

    /// The sequence size.
    size: Number,

    /// The start (`+` strand).
    start: Number,

    /// The end (`+` strand).
    end: Number,

    /// The block starts, on this sequence's strand.
    block_starts: Vec<Number>,
}

impl Placement {
    /// Gets the sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the sequence size.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the start.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the block starts.
    pub fn block_starts(&self) -> &[Number] {
        &self.block_starts
    }

    /// Replaces every coordinate of the placement.
    pub(crate) fn relocate(
        &mut self,
        name: &str,
        size: Number,
        (start, end): (Number, Number),
        block_starts: Vec<Number>,
    ) {
        self.name = name.to_string();
        self.size = size;
        self.start = start;
        self.end = end;
        self.block_starts = block_starts;
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// A PSL record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The counts (matches, mismatches, repeat matches, Ns, query insert
    /// count, query insert bases, target insert count, target insert bases).
    counts: [i64; NUM_COUNT_FIELDS],

    /// The query strand.
    query_strand: Strand,

    /// The target strand, when given explicitly.
    target_strand: Option<Strand>,

    /// The query placement.
    query: Placement,

    /// The target placement.
    target: Placement,

    /// The block sizes.
    block_sizes: Vec<Number>,

    /// Any columns after the required ones.
    extras: Vec<String>,
}

impl Record {
    /// Gets the counts columns.
    pub fn counts(&self) -> &[i64; NUM_COUNT_FIELDS] {
        &self.counts
    }

    /// Gets the query strand.
    pub fn query_strand(&self) -> Strand {
        self.query_strand
    }

    /// Gets the target strand, if one was given.
    pub fn target_strand(&self) -> Option<Strand> {
        self.target_strand
    }

    /// Gets the query placement.
    pub fn query(&self) -> &Placement {
        &self.query
    }

    /// Gets the target placement.
    pub fn target(&self) -> &Placement {
        &self.target
    }

    /// Gets the block sizes.
    pub fn block_sizes(&self) -> &[Number] {
        &self.block_sizes
    }

    /// Gets the columns after the required ones.
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// Gets mutable access to the query placement.
    pub(crate) fn query_mut(&mut self) -> &mut Placement {
        &mut self.query
    }

    /// Gets mutable access to the target placement.
    pub(crate) fn target_mut(&mut self) -> &mut Placement {
        &mut self.target
    }

    /// Replaces the strands.
    pub(crate) fn set_strands(&mut self, query: Strand, target: Option<Strand>) {
        self.query_strand = query;
        self.target_strand = target;
    }

    /// Reverses the order of the blocks.
    pub(crate) fn reverse_blocks(&mut self) {
        self.block_sizes.reverse();
        self.query.block_starts.reverse();
        self.target.block_starts.reverse();
    }
}

/// Parses one numeric column.
fn number<T: FromStr<Err = ParseIntError>>(fields: &[&str], i: usize) -> Result<T, ParseError> {
    fields[i]
        .parse()
        .map_err(|e| ParseError::InvalidNumber(i, e))
}

/// Parses a comma-terminated list column.
fn list(fields: &[&str], i: usize) -> Result<Vec<Number>, ParseError> {
    fields[i]
        .split(LIST_DELIMITER)
        .filter(|value| !value.is_empty())
        .map(|value| value.parse().map_err(|e| ParseError::InvalidNumber(i, e)))
        .collect()
}

/// Parses the strand column into the query and optional target strands.
fn strands(s: &str) -> Result<(Strand, Option<Strand>), ParseError> {
    let invalid = || ParseError::InvalidStrand(s.to_string());
    let parse = |c: char| c.to_string().parse::<Strand>().map_err(|_| invalid());

    let mut chars = s.chars();

    match (chars.next(), chars.next(), chars.next()) {
        (Some(query), None, None) => Ok((parse(query)?, None)),
        (Some(query), Some(target), None) => Ok((parse(query)?, Some(parse(target)?))),
        _ => Err(invalid()),
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(DELIMITER).collect::<Vec<_>>();

        if fields.len() < NUM_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(fields.len()));
        }

        let mut counts = [0; NUM_COUNT_FIELDS];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = number(&fields, i)?;
        }

        let (query_strand, target_strand) = strands(fields[8])?;

        let block_count: usize = number(&fields, 17)?;
        let block_sizes = list(&fields, 18)?;
        let query_starts = list(&fields, 19)?;
        let target_starts = list(&fields, 20)?;

        for len in [block_sizes.len(), query_starts.len(), target_starts.len()] {
            if len != block_count {
                return Err(ParseError::BlockCountMismatch(block_count, len));
            }
        }

        Ok(Self {
            counts,
            query_strand,
            target_strand,
            query: Placement {
                name: fields[9].to_string(),
                size: number(&fields, 10)?,
                start: number(&fields, 11)?,
                end: number(&fields, 12)?,
                block_starts: query_starts,
            },
            target: Placement {
                name: fields[13].to_string(),
                size: number(&fields, 14)?,
                start: number(&fields, 15)?,
                end: number(&fields, 16)?,
                block_starts: target_starts,
            },
            block_sizes,
            extras: fields[NUM_FIELDS..]
                .iter()
                .map(|field| field.to_string())
                .collect(),
        })
    }
}

/// Writes a comma-terminated list.
fn write_list(f: &mut std::fmt::Formatter<'_>, values: &[Number]) -> std::fmt::Result {
    for value in values {
        write!(f, "{value}{LIST_DELIMITER}")?;
    }

    Ok(())
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for count in self.counts {
            write!(f, "{count}{DELIMITER}")?;
        }

        write!(f, "{}", self.query_strand)?;
        if let Some(strand) = self.target_strand {
            write!(f, "{strand}")?;
        }

        for placement in [&self.query, &self.target] {
            write!(
                f,
                "{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
                placement.name, placement.size, placement.start, placement.end
            )?;
        }

        write!(f, "{DELIMITER}{}{DELIMITER}", self.block_sizes.len())?;
        write_list(f, &self.block_sizes)?;
        write!(f, "{DELIMITER}")?;
        write_list(f, &self.query.block_starts)?;
        write!(f, "{DELIMITER}")?;
        write_list(f, &self.target.block_starts)?;

        for extra in &self.extras {
            write!(f, "{DELIMITER}{extra}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "30\t1\t0\t0\t1\t2\t0\t0\t+-\tq1\t100\t10\t43\tt1\t200\t50\t81\t2\t\
                          10,21,\t10,22,\t119,129,";

    #[test]
    fn records_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let record = RECORD.parse::<Record>()?;

        assert_eq!(record.query_strand(), Strand::Positive);
        assert_eq!(record.target_strand(), Some(Strand::Negative));
        assert_eq!(record.query().block_starts(), &[10, 22]);
        assert_eq!(record.target().end(), 81);
        assert_eq!(record.block_sizes(), &[10, 21]);
        assert_eq!(record.to_string(), RECORD);

        Ok(())
    }

    #[test]
    fn extra_columns_are_kept() -> Result<(), Box<dyn std::error::Error>> {
        let line = format!("{RECORD}\tacgt,\tacgt,");
        let record = line.parse::<Record>()?;

        assert_eq!(record.extras(), &["acgt,", "acgt,"]);
        assert_eq!(record.to_string(), line);

        Ok(())
    }

    #[test]
    fn block_counts_must_match() {
        let line = RECORD.replace("\t2\t10,21,", "\t3\t10,21,");
        let err = line.parse::<Record>().unwrap_err();

        assert_eq!(
            err.to_string(),
            "block count (3) does not match a block list of length 2"
        );
    }

    #[test]
    fn strands_are_validated() {
        let line = RECORD.replace("+-", "+-+");
        let err = line.parse::<Record>().unwrap_err();
        assert_eq!(err.to_string(), "invalid strand: +-+");

        let line = RECORD.replace("+-", "x");
        let err = line.parse::<Record>().unwrap_err();
        assert_eq!(err.to_string(), "invalid strand: x");
    }

    #[test]
    fn short_records_fail() {
        let err = "1\t2\t3".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in record: expected at least 21 fields, found 3 fields"
        );
    }
}

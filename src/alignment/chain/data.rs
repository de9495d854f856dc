//! The size and gap lines that follow a chain header.
//!
//! Every line but the last holds `size dt dq`: a gapless block of `size`
//! bases followed by `dt` skipped target bases and `dq` skipped query bases.
//! The last line holds the size of the final block alone.

use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::position::Number;

/// The delimiter used when writing a data record.
///
/// Any run of whitespace separates fields when reading.
const DELIMITER: char = '\t';

/// A parse error related to a data [`Record`].
#[derive(Debug)]
pub enum ParseError {
    /// The line held neither one nor three fields.
    IncorrectNumberOfFields(usize),

    /// A field was not a valid number.
    ///
    /// Holds the name of the field (`size`, `dt` or `dq`).
    InvalidNumber(&'static str, ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "expected `size dt dq` or a final `size`, found {n} fields"
            ),
            ParseError::InvalidNumber(field, err) => write!(f, "invalid {field}: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The bases skipped on each sequence between two blocks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Gap {
    /// The bases skipped on the target.
    target: Number,

    /// The bases skipped on the query.
    query: Number,
}

impl Gap {
    /// Creates a new [`Gap`].
    pub fn new(target: Number, query: Number) -> Self {
        Self { target, query }
    }

    /// Gets the bases skipped on the target (`dt`).
    pub fn target(&self) -> Number {
        self.target
    }

    /// Gets the bases skipped on the query (`dq`).
    pub fn query(&self) -> Number {
        self.query
    }

    /// Whether bases are skipped on both sequences.
    pub fn is_double_sided(&self) -> bool {
        self.target > 0 && self.query > 0
    }
}

/// One data line of a chain.
///
/// # Examples
///
/// ```
/// use chainkit::alignment::chain::data::Gap;
/// use chainkit::alignment::chain::data::Record;
///
/// let record = "9\t1\t0".parse::<Record>()?;
/// assert_eq!(record.size(), 9);
/// assert_eq!(record.gap(), Some(Gap::new(1, 0)));
/// assert!(!record.is_terminating());
///
/// let last = "12".parse::<Record>()?;
/// assert!(last.is_terminating());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The size of the block.
    size: Number,

    /// The gap before the next block, absent on the last line of a chain.
    gap: Option<Gap>,
}

impl Record {
    /// Creates a record for a block followed by `gap`.
    pub fn new(size: Number, gap: Gap) -> Self {
        Self {
            size,
            gap: Some(gap),
        }
    }

    /// Creates the record for the last block of a chain.
    pub fn terminating(size: Number) -> Self {
        Self { size, gap: None }
    }

    /// Gets the size of the block.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the gap before the next block.
    pub fn gap(&self) -> Option<Gap> {
        self.gap
    }

    /// Whether this record closes its chain.
    pub fn is_terminating(&self) -> bool {
        self.gap.is_none()
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |field: &'static str, value: &str| {
            value
                .parse::<Number>()
                .map_err(|err| ParseError::InvalidNumber(field, err))
        };

        match s.split_whitespace().collect::<Vec<_>>()[..] {
            [size] => Ok(Self::terminating(number("size", size)?)),
            [size, dt, dq] => Ok(Self::new(
                number("size", size)?,
                Gap::new(number("dt", dt)?, number("dq", dq)?),
            )),
            ref fields => Err(ParseError::IncorrectNumberOfFields(fields.len())),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.size)?;

        if let Some(gap) = self.gap {
            write!(f, "{DELIMITER}{}{DELIMITER}{}", gap.target, gap.query)?;
        }

        Ok(())
    }
}

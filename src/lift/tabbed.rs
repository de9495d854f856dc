//! Tab-separated lines with a name and a range, such as BED and GFF.

use std::num::ParseIntError;

use omics::coordinate::position::Number;

use crate::lift::spec::strip_chrom_prefix;

/// The field separator.
const DELIMITER: char = '\t';

/// An error related to a [`Tabbed`] line.
#[derive(Debug)]
pub enum Error {
    /// A line with too few fields.
    ///
    /// Holds the required number of fields and the number found.
    IncorrectNumberOfFields(usize, usize),

    /// An invalid position in the given (one-based) column.
    InvalidPosition(usize, ParseIntError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IncorrectNumberOfFields(expected, found) => write!(
                f,
                "invalid number of fields: expected at least {expected} fields, found {found} \
                 fields"
            ),
            Error::InvalidPosition(column, err) => {
                write!(f, "invalid position in column {column}: {err}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// The (zero-based) columns holding the name, start and end of a line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Columns {
    /// The sequence name column.
    name: usize,

    /// The start column.
    start: usize,

    /// The end column.
    end: usize,
}

impl Columns {
    /// The columns of a BED line.
    pub const BED: Columns = Columns::new(0, 1, 2);

    /// The columns of a GFF line.
    pub const GFF: Columns = Columns::new(0, 3, 4);

    /// Creates a new [`Columns`].
    pub const fn new(name: usize, start: usize, end: usize) -> Self {
        Self { name, start, end }
    }

    /// The number of fields a line needs.
    fn required(&self) -> usize {
        self.name.max(self.start).max(self.end) + 1
    }
}

/// A parsed tab-separated line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tabbed {
    /// The fields, as read.
    fields: Vec<String>,

    /// The columns holding the name and range.
    columns: Columns,

    /// The sequence name without any `chrom/` prefix.
    chrom: String,

    /// The start.
    start: Number,

    /// The end.
    end: Number,
}

impl Tabbed {
    /// Parses a line.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Columns;
    /// use chainkit::lift::Tabbed;
    ///
    /// let line = Tabbed::parse("chr1/ctg1\t10\t20\tname", Columns::BED)?;
    /// assert_eq!(line.chrom(), "ctg1");
    /// assert_eq!(line.start(), 10);
    /// assert_eq!(line.end(), 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(line: &str, columns: Columns) -> Result<Self, Error> {
        let fields = line.split(DELIMITER).map(String::from).collect::<Vec<_>>();

        if fields.len() < columns.required() {
            return Err(Error::IncorrectNumberOfFields(
                columns.required(),
                fields.len(),
            ));
        }

        let position = |column: usize| {
            fields[column]
                .parse::<Number>()
                .map_err(|err| Error::InvalidPosition(column + 1, err))
        };

        let start = position(columns.start)?;
        let end = position(columns.end)?;
        let chrom = strip_chrom_prefix(&fields[columns.name]).to_string();

        Ok(Self {
            fields,
            columns,
            chrom,
            start,
            end,
        })
    }

    /// Gets the sequence name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Gets the start.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the line.
    pub fn line(&self) -> String {
        self.fields.join("\t")
    }

    /// Writes the name without its `chrom/` prefix, leaving the range as is.
    pub(crate) fn strip_name(&mut self) {
        self.fields[self.columns.name] = self.chrom.clone();
    }

    /// Moves the line onto a new sequence.
    pub(crate) fn relocate(&mut self, name: &str, start: Number, end: Number) {
        self.chrom = name.to_string();
        self.start = start;
        self.end = end;

        self.fields[self.columns.name] = self.chrom.clone();
        self.fields[self.columns.start] = start.to_string();
        self.fields[self.columns.end] = end.to_string();
    }
}

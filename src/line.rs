//! A line within a chain file.

use std::str::FromStr;

use crate::alignment::chain::data;
use crate::alignment::chain::header;
use crate::alignment::chain::header::HEADER_PREFIX;

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// An error associated with parsing a line.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid header record.
    InvalidHeaderRecord(header::Error, String),

    /// An invalid alignment data record.
    InvalidAlignmentDataRecord(data::ParseError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidHeaderRecord(err, line) => {
                write!(f, "invalid header record: {err}: line: {line}")
            }
            ParseError::InvalidAlignmentDataRecord(err, line) => {
                write!(f, "invalid alignment data record: {err}: line: {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Line`].
#[derive(Debug)]
pub enum Error {
    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A line within a chain file.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,

    /// A comment line (including the leading `#`).
    Comment(String),

    /// A header line.
    Header(header::Record),

    /// An alignment data line.
    AlignmentData(data::Record),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => Ok(()),
            Line::Comment(comment) => write!(f, "{comment}"),
            Line::Header(record) => write!(f, "{record}"),
            Line::AlignmentData(record) => write!(f, "{record}"),
        }
    }
}

impl FromStr for Line {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start();

        if trimmed.is_empty() {
            Ok(Self::Empty)
        } else if trimmed.starts_with(COMMENT_PREFIX) {
            Ok(Self::Comment(s.into()))
        } else if trimmed.starts_with(HEADER_PREFIX) {
            s.parse::<header::Record>()
                .map(Line::Header)
                .map_err(|e| Error::Parse(ParseError::InvalidHeaderRecord(e, s.into())))
        } else {
            s.parse::<data::Record>()
                .map(Line::AlignmentData)
                .map_err(|e| Error::Parse(ParseError::InvalidAlignmentDataRecord(e, s.into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_header_line() -> Result<(), Box<dyn std::error::Error>> {
        let line = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1".parse::<Line>()?;
        assert!(matches!(line, Line::Header(_)));
        Ok(())
    }

    #[test]
    fn test_valid_comment_line() -> Result<(), Box<dyn std::error::Error>> {
        let line = "#chain file".parse::<Line>()?;
        assert_eq!(line, Line::Comment(String::from("#chain file")));
        assert_eq!(line.to_string(), "#chain file");
        Ok(())
    }

    #[test]
    fn test_whitespace_only_line_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(" \t".parse::<Line>()?, Line::Empty);
        Ok(())
    }

    #[test]
    fn test_valid_alignment_data_lines() -> Result<(), Box<dyn std::error::Error>> {
        match "9\t0\t1".parse::<Line>()? {
            Line::AlignmentData(record) => assert!(!record.is_terminating()),
            line => panic!("unexpected line: {line:?}"),
        }

        match "9".parse::<Line>()? {
            Line::AlignmentData(record) => assert!(record.is_terminating()),
            line => panic!("unexpected line: {line:?}"),
        }

        Ok(())
    }

    #[test]
    fn test_invalid_header_line() {
        let err = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 ?"
            .parse::<Line>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid header record: parse error: invalid id: invalid digit found in \
             string: line: chain 0 seq0 2 + 0 2 seq0 2 - 0 2 ?"
        );
    }

    #[test]
    fn test_invalid_alignment_data_line() {
        let err = "9\t1".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: invalid alignment data record: expected `size dt dq` or a final \
             `size`, found 2 fields: line: 9\t1"
        );
    }
}

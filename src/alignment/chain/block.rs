//! Ungapped alignment blocks.

use omics::coordinate::position::Number;

/// An error related to a [`Block`].
#[derive(Debug)]
pub enum Error {
    /// The end of a range came before its start.
    InvertedRange(Number, Number),

    /// The target and query ranges were not the same length.
    LengthMismatch(Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvertedRange(start, end) => {
                write!(f, "range end ({end}) comes before its start ({start})")
            }
            Error::LengthMismatch(target, query) => write!(
                f,
                "target length ({target}) does not equal query length ({query})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A gapless run of aligned bases.
///
/// Both ranges are half-open. The query range is expressed in the coordinate
/// system of the query strand named by the owning chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Block {
    /// The start on the target.
    target_start: Number,

    /// The end on the target.
    target_end: Number,

    /// The start on the query.
    query_start: Number,

    /// The end on the query.
    query_end: Number,
}

impl Block {
    /// Attempts to create a new [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::Block;
    ///
    /// let block = Block::try_new(10, 20, 0, 10)?;
    /// assert_eq!(block.size(), 10);
    ///
    /// let err = Block::try_new(10, 20, 0, 9).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "target length (10) does not equal query length (9)"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        target_start: Number,
        target_end: Number,
        query_start: Number,
        query_end: Number,
    ) -> Result<Self> {
        if target_end < target_start {
            return Err(Error::InvertedRange(target_start, target_end));
        }

        if query_end < query_start {
            return Err(Error::InvertedRange(query_start, query_end));
        }

        if target_end - target_start != query_end - query_start {
            return Err(Error::LengthMismatch(
                target_end - target_start,
                query_end - query_start,
            ));
        }

        Ok(Self::from_parts(
            target_start,
            target_end,
            query_start,
            query_end,
        ))
    }

    /// Creates a block whose ranges are already known to be of equal length.
    pub(crate) fn from_parts(
        target_start: Number,
        target_end: Number,
        query_start: Number,
        query_end: Number,
    ) -> Self {
        Self {
            target_start,
            target_end,
            query_start,
            query_end,
        }
    }

    /// Gets the start on the target.
    pub fn target_start(&self) -> Number {
        self.target_start
    }

    /// Gets the end on the target.
    pub fn target_end(&self) -> Number {
        self.target_end
    }

    /// Gets the start on the query.
    pub fn query_start(&self) -> Number {
        self.query_start
    }

    /// Gets the end on the query.
    pub fn query_end(&self) -> Number {
        self.query_end
    }

    /// Gets the number of aligned bases.
    pub fn size(&self) -> Number {
        self.target_end - self.target_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_block() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let block = Block::try_new(5, 8, 100, 103)?;
        assert_eq!(block.target_start(), 5);
        assert_eq!(block.target_end(), 8);
        assert_eq!(block.query_start(), 100);
        assert_eq!(block.query_end(), 103);
        assert_eq!(block.size(), 3);
        Ok(())
    }

    #[test]
    fn inverted_range() {
        let err = Block::try_new(8, 5, 0, 3).unwrap_err();
        assert!(matches!(err, Error::InvertedRange(8, 5)));
        assert_eq!(err.to_string(), "range end (5) comes before its start (8)");
    }

    #[test]
    fn length_mismatch() {
        let err = Block::try_new(0, 4, 0, 5).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch(4, 5)));
    }
}

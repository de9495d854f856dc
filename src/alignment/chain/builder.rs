//! A builder for a chain.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;

use crate::alignment::Chain;
use crate::alignment::chain;
use crate::alignment::chain::Block;
use crate::alignment::chain::data;
use crate::alignment::chain::header;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No data was provided to the [`Builder`].
    Data,

    /// No header was provided to the [`Builder`].
    Header,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Data => write!(f, "data"),
            MissingError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The header field was provided multiple times to the [`Builder`].
    Header,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error where the data records do not describe the chain in the header.
#[derive(Debug)]
pub enum MalformedError {
    /// A terminating data record was followed by more data.
    DataAfterTerminatingRecord(usize),

    /// The last data record was not a terminating record.
    MissingTerminatingRecord,

    /// Walking the data records overflowed a coordinate.
    CoordinateOverflow,

    /// The walked blocks do not fit the header.
    Chain(chain::Error),
}

impl std::fmt::Display for MalformedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedError::DataAfterTerminatingRecord(index) => {
                write!(f, "data record {index} follows a terminating record")
            }
            MalformedError::MissingTerminatingRecord => {
                write!(f, "the last data record is not terminating")
            }
            MalformedError::CoordinateOverflow => {
                write!(f, "a block coordinate overflowed")
            }
            MalformedError::Chain(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MalformedError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// An error where the provided fields do not form a valid chain.
    Malformed(MalformedError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::Malformed(err) => write!(f, "malformed chain: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Chain`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The header record.
    header: Option<header::Record>,

    /// The data records.
    data: Option<NonEmpty<data::Record>>,
}

impl Builder {
    /// Sets the header record for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::Builder;
    /// use chainkit::alignment::chain::header::Record;
    ///
    /// let header = "chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1".parse::<Record>()?;
    /// let builder = Builder::default().header(header)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn header(mut self, record: header::Record) -> Result<Self> {
        if self.header.is_some() {
            return Err(Error::Multiple(MultipleError::Header));
        }

        self.header = Some(record);
        Ok(self)
    }

    /// Pushes a [data record](crate::alignment::chain::data::Record) into the
    /// [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::Builder;
    /// use chainkit::alignment::chain::data::Record;
    ///
    /// let data = "10".parse::<Record>()?;
    /// let builder = Builder::default().push_data(data);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push_data(mut self, record: data::Record) -> Self {
        let data = match self.data {
            Some(mut data) => {
                data.push(record);
                data
            }
            None => NonEmpty::new(record),
        };

        self.data = Some(data);
        self
    }

    /// Consumes `self` to attempt to build a [`Chain`].
    ///
    /// The data records are walked from the start of the alignment on both
    /// sequences. The walk must end exactly at the ends declared in the
    /// header.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::Builder;
    ///
    /// let chain = Builder::default()
    ///     .header("chain 0 seq0 4 + 0 4 seq0 5 - 0 5 1".parse()?)?
    ///     .push_data("3\t0\t1".parse()?)
    ///     .push_data("1".parse()?)
    ///     .try_build()?;
    ///
    /// assert_eq!(chain.header().id(), Some(1));
    /// assert_eq!(chain.blocks().len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Chain> {
        let header = self.header.ok_or(Error::Missing(MissingError::Header))?;
        let data = self.data.ok_or(Error::Missing(MissingError::Data))?;

        let blocks = walk(&header, &data).map_err(Error::Malformed)?;
        Chain::try_new(header, blocks).map_err(|err| Error::Malformed(MalformedError::Chain(err)))
    }
}

/// Converts the data records into blocks starting at the header's alignment
/// starts.
fn walk(
    header: &header::Record,
    data: &NonEmpty<data::Record>,
) -> std::result::Result<NonEmpty<Block>, MalformedError> {
    let mut t = header.target_sequence().alignment_start();
    let mut q = header.query_sequence().alignment_start();

    let advance = |position: Number, by: Number| {
        position
            .checked_add(by)
            .ok_or(MalformedError::CoordinateOverflow)
    };

    let mut blocks = Vec::with_capacity(data.len());
    let last = data.len() - 1;

    for (i, record) in data.iter().enumerate() {
        let target_end = advance(t, record.size())?;
        let query_end = advance(q, record.size())?;
        blocks.push(Block::from_parts(t, target_end, q, query_end));

        match (record.gap(), i == last) {
            (None, true) => {}
            (None, false) => return Err(MalformedError::DataAfterTerminatingRecord(i + 1)),
            (Some(_), true) => return Err(MalformedError::MissingTerminatingRecord),
            (Some(gap), false) => {
                t = advance(target_end, gap.target())?;
                q = advance(query_end, gap.query())?;
            }
        }
    }

    NonEmpty::from_vec(blocks).ok_or(MalformedError::MissingTerminatingRecord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fails_to_produce_a_chain_when_no_header_is_provided()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .push_data("1".parse()?)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: header");

        Ok(())
    }

    #[test]
    fn it_fails_to_produce_a_chain_when_the_header_field_is_provided_more_than_once()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1".parse()?)?
            .header("chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1".parse()?)
            .unwrap_err();

        assert_eq!(err.to_string(), "singular field set multiple times: header");

        Ok(())
    }

    #[test]
    fn it_fails_to_produce_a_chain_when_no_data_is_provided()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 2 + 0 2 seq0 2 - 0 2 1".parse()?)?
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: data");

        Ok(())
    }

    #[test]
    fn it_fails_when_the_walk_ends_short_of_the_header()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 10 + 0 10 seq0 10 + 0 10 1".parse()?)?
            .push_data("4\t1\t1".parse()?)
            .push_data("4".parse()?)
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "malformed chain: target bounds in header (0-10) do not match the blocks (0-9)"
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_the_query_walk_overshoots()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 10 + 0 10 seq1 20 - 0 10 1".parse()?)?
            .push_data("5\t0\t3".parse()?)
            .push_data("5".parse()?)
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "malformed chain: query bounds in header (0-10) do not match the blocks (0-13)"
        );

        Ok(())
    }

    #[test]
    fn it_fails_without_a_terminating_record()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 10 + 0 10 seq1 20 - 0 10 1".parse()?)?
            .push_data("10\t0\t0".parse()?)
            .try_build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Malformed(MalformedError::MissingTerminatingRecord)
        ));

        Ok(())
    }

    #[test]
    fn it_fails_on_data_after_a_terminating_record()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header("chain 0 seq0 10 + 0 10 seq1 20 - 0 10 1".parse()?)?
            .push_data("5".parse()?)
            .push_data("5".parse()?)
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "malformed chain: data record 1 follows a terminating record"
        );

        Ok(())
    }
}

//! Chains of ungapped alignment blocks.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;

use crate::alignment::chain::header::Sequence;

pub mod block;
mod builder;
pub mod chains;
pub mod data;
pub mod header;
pub mod id;
pub mod subset;
pub mod swap;

pub use block::Block;
pub use builder::Builder;
pub use chains::Chains;
pub use subset::Subset;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the construction of a [`Chain`].
#[derive(Debug)]
pub enum Error {
    /// The target bounds in the header do not match the bounds of the blocks.
    TargetBoundsMismatch((Number, Number), (Number, Number)),

    /// The query bounds in the header do not match the bounds of the blocks.
    QueryBoundsMismatch((Number, Number), (Number, Number)),

    /// A block starts before the previous block ends (on either sequence).
    UnorderedBlock(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TargetBoundsMismatch(header, blocks) => write!(
                f,
                "target bounds in header ({}-{}) do not match the blocks ({}-{})",
                header.0, header.1, blocks.0, blocks.1
            ),
            Error::QueryBoundsMismatch(header, blocks) => write!(
                f,
                "query bounds in header ({}-{}) do not match the blocks ({}-{})",
                header.0, header.1, blocks.0, blocks.1
            ),
            Error::UnorderedBlock(index) => {
                write!(f, "block {index} overlaps or precedes the block before it")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Chain
////////////////////////////////////////////////////////////////////////////////////////

/// A pairwise alignment made of ordered, ungapped blocks.
///
/// Between consecutive blocks there may be a gap on the target, on the query,
/// or on both. The header bounds always equal the outer bounds of the blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    /// The header record.
    header: header::Record,

    /// The blocks, ascending on both sequences.
    blocks: NonEmpty<Block>,
}

impl Chain {
    /// Attempts to create a new [`Chain`] from a header and its blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::Chain;
    /// use chainkit::alignment::chain::Block;
    /// use nonempty::nonempty;
    ///
    /// let header = "chain 10 t 100 + 0 10 q 100 + 0 12 1".parse()?;
    /// let blocks = nonempty![Block::try_new(0, 4, 0, 4)?, Block::try_new(4, 10, 6, 12)?];
    ///
    /// let chain = Chain::try_new(header, blocks)?;
    /// assert_eq!(chain.aligned_size(), 10);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(header: header::Record, blocks: NonEmpty<Block>) -> Result<Self> {
        let first = blocks.first();
        let last = blocks.last();

        let target = header.target_sequence();
        let header_bounds = (target.alignment_start(), target.alignment_end());
        let block_bounds = (first.target_start(), last.target_end());
        if header_bounds != block_bounds {
            return Err(Error::TargetBoundsMismatch(header_bounds, block_bounds));
        }

        let query = header.query_sequence();
        let header_bounds = (query.alignment_start(), query.alignment_end());
        let block_bounds = (first.query_start(), last.query_end());
        if header_bounds != block_bounds {
            return Err(Error::QueryBoundsMismatch(header_bounds, block_bounds));
        }

        for (i, (previous, current)) in blocks.iter().zip(blocks.iter().skip(1)).enumerate() {
            if current.target_start() < previous.target_end()
                || current.query_start() < previous.query_end()
            {
                return Err(Error::UnorderedBlock(i + 1));
            }
        }

        Ok(Self::from_parts(header, blocks))
    }

    /// Creates a chain whose invariants are already known to hold.
    pub(crate) fn from_parts(header: header::Record, blocks: NonEmpty<Block>) -> Self {
        Self { header, blocks }
    }

    /// Consumes `self` and returns the header and the blocks.
    pub fn into_parts(self) -> (header::Record, NonEmpty<Block>) {
        (self.header, self.blocks)
    }

    /// Gets the header record for the [`Chain`] by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::header::Record;
    ///
    /// let data = b"chain 0 seq0 4 + 0 4 seq0 5 - 0 5 1\n3\t0\t1\n1";
    /// let mut reader = chainkit::Reader::new(&data[..]);
    ///
    /// let chain = reader.chains().next().unwrap()?;
    /// assert_eq!(
    ///     chain.header(),
    ///     &"chain 0 seq0 4 + 0 4 seq0 5 - 0 5 1".parse::<Record>()?
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn header(&self) -> &header::Record {
        &self.header
    }

    /// Gets the blocks of the [`Chain`] by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::alignment::chain::Block;
    ///
    /// let data = b"chain 0 seq0 4 + 0 4 seq0 5 - 0 5 1\n3\t0\t1\n1";
    /// let mut reader = chainkit::Reader::new(&data[..]);
    ///
    /// let chain = reader.chains().next().unwrap()?;
    /// let blocks = chain.blocks().iter().copied().collect::<Vec<_>>();
    ///
    /// assert_eq!(
    ///     blocks,
    ///     vec![Block::try_new(0, 3, 0, 3)?, Block::try_new(3, 4, 4, 5)?]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn blocks(&self) -> &NonEmpty<Block> {
        &self.blocks
    }

    /// Gets the score.
    pub fn score(&self) -> f64 {
        self.header.score()
    }

    /// Gets the id.
    pub fn id(&self) -> Option<usize> {
        self.header.id()
    }

    /// Gets the target sequence.
    pub fn target_sequence(&self) -> &Sequence {
        self.header.target_sequence()
    }

    /// Gets the query sequence.
    pub fn query_sequence(&self) -> &Sequence {
        self.header.query_sequence()
    }

    /// Gets the total number of aligned bases across all blocks.
    pub fn aligned_size(&self) -> Number {
        self.blocks.iter().map(Block::size).sum()
    }

    /// Gets the number of aligned target bases that fall within `[start,
    /// end)`.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chain 0 t 20 + 0 10 q 20 + 0 12\n4\t0\t2\n6";
    /// let mut reader = chainkit::Reader::new(&data[..]);
    ///
    /// let chain = reader.chains().next().unwrap()?;
    /// assert_eq!(chain.target_overlap(2, 6), 4);
    /// assert_eq!(chain.target_overlap(10, 20), 0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn target_overlap(&self, start: Number, end: Number) -> Number {
        self.blocks
            .iter()
            .map(|block| {
                let s = block.target_start().max(start);
                let e = block.target_end().min(end);
                e.saturating_sub(s)
            })
            .sum()
    }

    /// Re-expresses the blocks as the size/gap records of the chain text
    /// format.
    pub fn data_records(&self) -> NonEmpty<data::Record> {
        let records = self
            .blocks
            .iter()
            .zip(self.blocks.iter().skip(1))
            .map(|(block, next)| {
                data::Record::new(
                    block.size(),
                    data::Gap::new(
                        next.target_start() - block.target_end(),
                        next.query_start() - block.query_end(),
                    ),
                )
            })
            .collect::<Vec<_>>();

        let terminating = data::Record::terminating(self.blocks.last().size());

        match NonEmpty::from_vec(records) {
            Some(mut records) => {
                records.push(terminating);
                records
            }
            None => NonEmpty::new(terminating),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header)?;

        for record in self.data_records() {
            write!(f, "\n{record}")?;
        }

        Ok(())
    }
}

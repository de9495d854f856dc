//! Restricting a chain to a range on one of its sequences.
//!
//! Subsetting never modifies the input chain. When the requested range
//! already covers the chain on the relevant side, the original chain is
//! handed back by reference; otherwise a new, narrower chain is built.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;

use crate::alignment::Chain;
use crate::alignment::chain::Block;

/// The outcome of subsetting a [`Chain`].
#[derive(Clone, Debug, PartialEq)]
pub enum Subset<'a> {
    /// The range covers the whole chain, so the chain is returned as-is.
    Unchanged(&'a Chain),

    /// A new chain restricted to the range.
    Narrowed(Chain),

    /// No block of the chain falls within the range.
    Empty,
}

impl Subset<'_> {
    /// Gets the resulting chain, if any.
    pub fn chain(&self) -> Option<&Chain> {
        match self {
            Subset::Unchanged(chain) => Some(chain),
            Subset::Narrowed(chain) => Some(chain),
            Subset::Empty => None,
        }
    }

    /// Converts the result into an owned chain, cloning when the original
    /// chain was returned unchanged.
    pub fn into_owned(self) -> Option<Chain> {
        match self {
            Subset::Unchanged(chain) => Some(chain.clone()),
            Subset::Narrowed(chain) => Some(chain),
            Subset::Empty => None,
        }
    }

    /// Whether no part of the chain fell within the range.
    pub fn is_empty(&self) -> bool {
        matches!(self, Subset::Empty)
    }
}

/// The sequence a subset range refers to.
#[derive(Clone, Copy, Debug)]
enum Side {
    /// The target sequence.
    Target,

    /// The query sequence, in the coordinates of the query strand.
    Query,
}

impl Side {
    /// Gets the range a block occupies on this side.
    fn range(&self, block: &Block) -> (Number, Number) {
        match self {
            Side::Target => (block.target_start(), block.target_end()),
            Side::Query => (block.query_start(), block.query_end()),
        }
    }
}

/// Restricts `chain` to the target range `[start, end)`.
///
/// Blocks that straddle a boundary are clipped, and the query side of a
/// clipped block moves by the same amount. The score is scaled by the
/// fraction of the original target span that remains.
///
/// # Examples
///
/// ```
/// use chainkit::alignment::chain::subset;
///
/// let data = b"chain 3000 t 100 + 0 30 q 100 + 0 30 1\n10\t10\t10\n10";
/// let mut reader = chainkit::Reader::new(&data[..]);
/// let chain = reader.chains().next().unwrap()?;
///
/// let narrowed = subset::on_target(&chain, 5, 25).into_owned().unwrap();
/// assert_eq!(
///     narrowed.to_string(),
///     "chain 2000 t 100 + 5 25 q 100 + 5 25 1\n5\t10\t10\n5"
/// );
///
/// assert!(subset::on_target(&chain, 10, 20).is_empty());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn on_target(chain: &Chain, start: Number, end: Number) -> Subset<'_> {
    subset(chain, start, end, Side::Target)
}

/// Restricts `chain` to the query range `[start, end)`.
///
/// The range is read in the coordinates of the chain's query strand, exactly
/// as the query bounds in the header are. The score is scaled by the fraction
/// of the original *target* span that remains.
pub fn on_query(chain: &Chain, start: Number, end: Number) -> Subset<'_> {
    subset(chain, start, end, Side::Query)
}

/// Performs the subset on either side.
fn subset(chain: &Chain, start: Number, end: Number, side: Side) -> Subset<'_> {
    if start >= end {
        return Subset::Empty;
    }

    let sequence = match side {
        Side::Target => chain.target_sequence(),
        Side::Query => chain.query_sequence(),
    };

    if start <= sequence.alignment_start() && end >= sequence.alignment_end() {
        return Subset::Unchanged(chain);
    }

    let mut kept = Vec::new();

    for block in chain.blocks() {
        let (block_start, block_end) = side.range(block);

        if block_end <= start || block_start >= end {
            continue;
        }

        let head = start.saturating_sub(block_start);
        let tail = block_end.saturating_sub(end);

        kept.push(Block::from_parts(
            block.target_start() + head,
            block.target_end() - tail,
            block.query_start() + head,
            block.query_end() - tail,
        ));
    }

    let blocks = match NonEmpty::from_vec(kept) {
        Some(blocks) => blocks,
        None => return Subset::Empty,
    };

    let target = (blocks.first().target_start(), blocks.last().target_end());
    let query = (blocks.first().query_start(), blocks.last().query_end());

    let old_span = chain.target_sequence().span() as f64;
    let new_span = (target.1 - target.0) as f64;
    let score = chain.score() * new_span / old_span;

    let header = chain.header().narrowed(score, target, query);
    Subset::Narrowed(Chain::from_parts(header, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reader;

    fn chain(text: &str) -> Chain {
        Reader::new(text.as_bytes())
            .chains()
            .next()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn superset_is_unchanged() {
        let chain = chain("chain 100 t 100 + 10 40 q 100 - 0 30 3\n30");

        match on_target(&chain, 0, 100) {
            Subset::Unchanged(inner) => assert!(std::ptr::eq(inner, &chain)),
            other => panic!("unexpected subset: {other:?}"),
        }

        assert!(matches!(on_query(&chain, 0, 30), Subset::Unchanged(_)));
    }

    #[test]
    fn touching_ranges_are_empty() {
        let chain = chain("chain 100 t 100 + 10 40 q 100 + 0 30 3\n30");

        assert_eq!(on_target(&chain, 0, 10), Subset::Empty);
        assert_eq!(on_target(&chain, 40, 50), Subset::Empty);
        assert_eq!(on_target(&chain, 20, 20), Subset::Empty);
    }

    #[test]
    fn clipping_moves_both_sides() {
        let chain = chain("chain 3000 t 100 + 0 30 q 100 - 50 80 1\n10\t5\t5\n5\t0\t0\n10");
        let narrowed = on_target(&chain, 3, 18).into_owned().unwrap();

        let blocks = narrowed.blocks().iter().copied().collect::<Vec<_>>();
        assert_eq!(
            blocks,
            vec![
                Block::from_parts(3, 10, 53, 60),
                Block::from_parts(15, 18, 65, 68)
            ]
        );
        assert_eq!(narrowed.target_sequence().alignment_start(), 3);
        assert_eq!(narrowed.target_sequence().alignment_end(), 18);
        assert_eq!(narrowed.query_sequence().alignment_start(), 53);
        assert_eq!(narrowed.query_sequence().alignment_end(), 68);
        assert_eq!(narrowed.score(), 1500.0);
        assert_eq!(narrowed.id(), Some(1));
    }

    #[test]
    fn blocks_ending_at_the_start_are_dropped() {
        let chain = chain("chain 1000 chrA 1000 + 100 300 chrB 2000 + 500 700 7\n50\t10\t10\n140");
        let narrowed = on_target(&chain, 150, 300).into_owned().unwrap();

        assert_eq!(
            narrowed.to_string(),
            "chain 700 chrA 1000 + 160 300 chrB 2000 + 560 700 7\n140"
        );
    }

    #[test]
    fn subsetting_is_idempotent() {
        let chain = chain("chain 3000 t 100 + 0 30 q 100 + 0 35 1\n10\t5\t10\n15");
        let once = on_target(&chain, 4, 22).into_owned().unwrap();
        let twice = on_target(&once, 4, 22).into_owned().unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn query_subset_uses_stored_coordinates() {
        let chain = chain("chain 200 t 100 + 0 20 q 50 - 10 30 1\n10\t0\t0\n10");
        let narrowed = on_query(&chain, 12, 15).into_owned().unwrap();

        assert_eq!(narrowed.to_string(), "chain 30 t 100 + 2 5 q 50 - 12 15 1\n3");
    }

    #[test]
    fn query_subset_skips_target_only_gaps() {
        let chain = chain("chain 100 t 100 + 0 30 q 100 + 0 20 1\n10\t10\t0\n10");
        let narrowed = on_query(&chain, 5, 15).into_owned().unwrap();

        let blocks = narrowed.blocks().iter().copied().collect::<Vec<_>>();
        assert_eq!(
            blocks,
            vec![
                Block::from_parts(5, 10, 5, 10),
                Block::from_parts(20, 25, 10, 15)
            ]
        );
    }
}

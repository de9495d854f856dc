//! Exchanging the target and query roles of a chain.

use nonempty::NonEmpty;
use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::alignment::Chain;
use crate::alignment::chain::Block;
use crate::alignment::chain::header;
use crate::alignment::chain::header::Sequence;
use crate::coordinate::reflect;

/// Swaps the target and query of `chain`.
///
/// The query strand letter carries over unchanged. When it is `-`, every
/// range is reflected onto the opposite strand of its sequence and the block
/// order is reversed, which keeps the new target on the `+` strand. Swapping
/// twice yields the original chain.
///
/// # Examples
///
/// ```
/// use chainkit::alignment::chain::swap::swap;
///
/// let data = b"chain 10 A 100 + 10 20 B 50 - 5 15 1\n10";
/// let mut reader = chainkit::Reader::new(&data[..]);
/// let chain = reader.chains().next().unwrap()?;
///
/// let swapped = swap(chain);
/// assert_eq!(swapped.to_string(), "chain 10 B 50 + 35 45 A 100 - 80 90 1\n10");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn swap(chain: Chain) -> Chain {
    let (header, blocks) = chain.into_parts();
    let (score, target, query, id) = header.into_parts();

    let strand = query.strand();
    let target_size = target.chromosome_size();
    let query_size = query.chromosome_size();

    let exchange = |block: &Block| {
        Block::from_parts(
            block.query_start(),
            block.query_end(),
            block.target_start(),
            block.target_end(),
        )
    };

    let (new_target, new_query, blocks) = match strand {
        Strand::Positive => {
            let blocks = blocks.map(|block| exchange(&block));
            (
                relabel(&query, Strand::Positive, query.alignment_start(), query.alignment_end()),
                relabel(&target, strand, target.alignment_start(), target.alignment_end()),
                blocks,
            )
        }
        Strand::Negative => {
            let (ts, te) = reflect(query.alignment_start(), query.alignment_end(), query_size);
            let (qs, qe) = reflect(target.alignment_start(), target.alignment_end(), target_size);

            let flip = |block: &Block| {
                let (ts, te) = reflect(block.query_start(), block.query_end(), query_size);
                let (qs, qe) = reflect(block.target_start(), block.target_end(), target_size);
                Block::from_parts(ts, te, qs, qe)
            };

            let head = flip(blocks.last());
            let ordered = blocks.iter().collect::<Vec<_>>();
            let tail = ordered.into_iter().rev().skip(1).map(flip).collect::<Vec<_>>();
            let blocks = NonEmpty::from((head, tail));

            (
                relabel(&query, Strand::Positive, ts, te),
                relabel(&target, strand, qs, qe),
                blocks,
            )
        }
    };

    let header = header::Record::from_parts(score, new_target, new_query, id);
    Chain::from_parts(header, blocks)
}

/// Builds the sequence that `sequence` becomes after a swap.
fn relabel(sequence: &Sequence, strand: Strand, start: Number, end: Number) -> Sequence {
    Sequence::from_parts(
        sequence.chromosome_name().to_string(),
        sequence.chromosome_size(),
        strand,
        start,
        end,
    )
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
    fn positive_query_swaps_fields() {
        let original = chain("chain 5 A 100 + 0 30 B 80 + 40 65 2\n10\t10\t5\n10");
        let swapped = swap(original.clone());

        assert_eq!(
            swapped.to_string(),
            "chain 5 B 80 + 40 65 A 100 + 0 30 2\n10\t5\t10\n10"
        );
        assert_eq!(swap(swapped), original);
    }

    #[test]
    fn negative_query_reflects_through_the_query_size() {
        let original = chain("chain 1000 chrA 1000 + 100 300 chrB 2000 - 500 700 7\n50\t10\t10\n140");
        let swapped = swap(original.clone());

        assert_eq!(
            swapped.to_string(),
            "chain 1000 chrB 2000 + 1300 1500 chrA 1000 - 700 900 7\n140\t10\t10\n50"
        );
        assert_eq!(swap(swapped), original);
    }

    #[test]
    fn negative_query_reflects_and_reverses() {
        let original = chain("chain 7 A 100 + 10 40 B 50 - 0 25 9\n10\t10\t5\n10");
        let swapped = swap(original.clone());

        let blocks = swapped.blocks().iter().copied().collect::<Vec<_>>();
        assert_eq!(
            blocks,
            vec![
                Block::from_parts(25, 35, 60, 70),
                Block::from_parts(40, 50, 80, 90)
            ]
        );
        assert_eq!(swapped.target_sequence().strand(), Strand::Positive);
        assert_eq!(swapped.query_sequence().strand(), Strand::Negative);
        assert_eq!(swapped.target_sequence().alignment_start(), 25);
        assert_eq!(swapped.query_sequence().alignment_end(), 90);

        assert_eq!(swap(swapped), original);
    }
}

//! Projection of chains into gapped AXT alignments.

use omics::coordinate::position::Number;

use crate::alignment::Chain;
use crate::alignment::chain::Block;
use crate::axt::GAP;
use crate::axt::Record;
use crate::axt::Span;
use crate::axt::Window;
use crate::axt::score::Scheme;

/// The default largest gap that may be kept inside a single record.
pub const DEFAULT_MAX_GAP: Number = 100;

/// The default largest target span of a single record.
pub const DEFAULT_MAX_SPAN: Number = Number::MAX;

/// An error related to projecting a chain.
#[derive(Debug)]
pub enum Error {
    /// A window did not cover a range the chain aligns.
    ///
    /// Holds the sequence name and the missing range.
    SequenceWindowMismatch(String, Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SequenceWindowMismatch(name, start, end) => write!(
                f,
                "no sequence is available for `{name}` at {start}-{end}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Projects `chain` into AXT records.
///
/// `target` must hold the target sequence in `+` strand coordinates and
/// `query` must hold the query sequence oriented to the chain's query strand
/// (see [`Window::oriented`]). The chain is broken into a new record whenever
/// both sequences skip bases between two blocks, either gap is longer than
/// `max_gap`, or the record would cover more than `max_span` target bases.
/// Each record is scored with the default [`Scheme`].
///
/// # Examples
///
/// ```
/// use chainkit::axt::Window;
/// use chainkit::axt::project::DEFAULT_MAX_GAP;
/// use chainkit::axt::project::DEFAULT_MAX_SPAN;
///
/// let data = b"chain 10 t 10 + 0 6 q 8 + 0 4 1\n2\t2\t0\n2";
/// let mut reader = chainkit::Reader::new(&data[..]);
/// let chain = reader.chains().next().unwrap()?;
///
/// let target = Window::new(b"ACGTAC".to_vec(), 0);
/// let query = Window::new(b"ACAC".to_vec(), 0);
///
/// let records = chainkit::axt::project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN)?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].target_symbols(), "ACGTAC");
/// assert_eq!(records[0].query_symbols(), "AC--AC");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn project(
    chain: &Chain,
    target: &Window<'_>,
    query: &Window<'_>,
    max_gap: Number,
    max_span: Number,
) -> Result<Vec<Record>, Error> {
    let scheme = Scheme::default();
    let blocks = chain.blocks().iter().collect::<Vec<_>>();

    let mut records = Vec::new();
    let mut run_start = 0;

    for i in 1..=blocks.len() {
        let split = match blocks.get(i) {
            Some(block) => breaks(blocks[run_start], blocks[i - 1], block, max_gap, max_span),
            None => true,
        };

        if split {
            records.push(build(chain, &blocks[run_start..i], target, query, &scheme)?);
            run_start = i;
        }
    }

    Ok(records)
}

/// Whether `block` must start a new record.
fn breaks(first: &Block, previous: &Block, block: &Block, max_gap: Number, max_span: Number) -> bool {
    let dt = block.target_start() - previous.target_end();
    let dq = block.query_start() - previous.query_end();

    (dt > 0 && dq > 0)
        || dt > max_gap
        || dq > max_gap
        || block.target_end() - first.target_start() > max_span
}

/// Builds a single record from a run of blocks with single-sided gaps.
fn build(
    chain: &Chain,
    run: &[&Block],
    target: &Window<'_>,
    query: &Window<'_>,
    scheme: &Scheme,
) -> Result<Record, Error> {
    let target_name = chain.target_sequence().chromosome_name();
    let query_name = chain.query_sequence().chromosome_name();

    let mut target_symbols = Vec::new();
    let mut query_symbols = Vec::new();
    let mut previous: Option<&Block> = None;

    for &block in run {
        if let Some(previous) = previous {
            let dt = block.target_start() - previous.target_end();
            let dq = block.query_start() - previous.query_end();

            if dq == 0 {
                let bases = fetch(target, target_name, previous.target_end(), block.target_start())?;
                target_symbols.extend_from_slice(bases);
                query_symbols.extend(std::iter::repeat(GAP).take(dt as usize));
            } else {
                let bases = fetch(query, query_name, previous.query_end(), block.query_start())?;
                target_symbols.extend(std::iter::repeat(GAP).take(dq as usize));
                query_symbols.extend_from_slice(bases);
            }
        }

        target_symbols.extend_from_slice(fetch(
            target,
            target_name,
            block.target_start(),
            block.target_end(),
        )?);
        query_symbols.extend_from_slice(fetch(
            query,
            query_name,
            block.query_start(),
            block.query_end(),
        )?);

        previous = Some(block);
    }

    // A run always holds at least one block.
    let first = run[0];
    let last = run[run.len() - 1];

    Ok(Record {
        target: Span::new(target_name, first.target_start(), last.target_end()),
        query: Span::new(query_name, first.query_start(), last.query_end()),
        query_strand: chain.query_sequence().strand(),
        score: scheme.score(&target_symbols, &query_symbols),
        target_symbols: String::from_utf8_lossy(&target_symbols).into_owned(),
        query_symbols: String::from_utf8_lossy(&query_symbols).into_owned(),
    })
}

/// Gets the bases of `name` in `[start, end)` from `window`.
fn fetch<'w>(
    window: &'w Window<'_>,
    name: &str,
    start: Number,
    end: Number,
) -> Result<&'w [u8], Error> {
    window
        .get(start, end)
        .ok_or_else(|| Error::SequenceWindowMismatch(name.to_string(), start, end))
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

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
    fn double_sided_gaps_split_records() {
        let chain = chain("chain 10 t 20 + 0 10 q 20 + 0 10 1\n4\t2\t2\n4");
        let target = Window::new(b"AAAACCGGGG".to_vec(), 0);
        let query = Window::new(b"AAAATTGGGG".to_vec(), 0);

        let records = project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target(), &Span::new("t", 0, 4));
        assert_eq!(records[1].target(), &Span::new("t", 6, 10));
        assert_eq!(records[1].query(), &Span::new("q", 6, 10));
        assert_eq!(records[0].score(), 4 * 91);
        assert_eq!(records[1].query_symbols(), "GGGG");
    }

    #[test]
    fn query_gaps_insert_target_dashes() {
        let chain = chain("chain 10 t 20 + 0 4 q 20 + 0 7 1\n2\t0\t3\n2");
        let target = Window::new(b"ACGT".to_vec(), 0);
        let query = Window::new(b"ACTTTGT".to_vec(), 0);

        let records = project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target_symbols(), "AC---GT");
        assert_eq!(records[0].query_symbols(), "ACTTTGT");
        assert_eq!(records[0].score(), 91 + 100 - 400 - 30 - 30 + 100 + 91);
    }

    #[test]
    fn long_gaps_split_records() {
        let chain = chain("chain 10 t 20 + 0 8 q 20 + 0 4 1\n2\t4\t0\n2");
        let target = Window::new(b"ACNNNNGT".to_vec(), 0);
        let query = Window::new(b"ACGT".to_vec(), 0);

        let records = project(&chain, &target, &query, 3, DEFAULT_MAX_SPAN).unwrap();
        assert_eq!(records.len(), 2);

        let records = project(&chain, &target, &query, 4, DEFAULT_MAX_SPAN).unwrap();
        assert_eq!(records.len(), 1);

        let records = project(&chain, &target, &query, 4, 7).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn negative_query_uses_oriented_window() {
        // The query aligns to the reverse complement of `TTGC`.
        let chain = chain("chain 10 t 4 + 0 4 q 4 - 0 4 1\n4");
        let target = Window::new(b"GCAA".to_vec(), 0);
        let query = Window::oriented(b"TTGC", 0, Strand::Negative, 4);

        let records = project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN).unwrap();

        assert_eq!(records[0].query_symbols(), "GCAA");
        assert_eq!(records[0].query_strand(), Strand::Negative);
    }

    #[test]
    fn windows_must_cover_the_chain() {
        let chain = chain("chain 10 t 20 + 0 4 q 20 + 0 4 1\n4");
        let target = Window::new(b"AC".to_vec(), 0);
        let query = Window::new(b"ACGT".to_vec(), 0);

        let err = project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN).unwrap_err();
        assert_eq!(err.to_string(), "no sequence is available for `t` at 0-4");
    }

    #[test]
    fn windows_may_cover_only_the_chain_span() {
        // target [3, 9) and query [2, 8) on the `-` strand of a 12 base query.
        let chain = chain("chain 10 t 20 + 3 9 q 12 - 2 8 1\n2\t2\t2\n2");
        let target_chromosome = b"NNNACGTACNNNNNNNNNNN";
        let query_chromosome = b"NNNNGTTTCANN";

        let target = Window::new(&target_chromosome[3..9], 3);
        let query = Window::oriented(&query_chromosome[4..10], 4, Strand::Negative, 12);

        let records = project(&chain, &target, &query, DEFAULT_MAX_GAP, DEFAULT_MAX_SPAN).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target_symbols(), "AC");
        assert_eq!(records[0].query_symbols(), "TG");
        assert_eq!(records[1].target(), &Span::new("t", 7, 9));
        assert_eq!(records[1].query(), &Span::new("q", 6, 8));
        assert_eq!(records[1].query_symbols(), "AC");

        let err = fetch(&query, "q", 1, 3).unwrap_err();
        assert_eq!(err.to_string(), "no sequence is available for `q` at 1-3");
    }
}

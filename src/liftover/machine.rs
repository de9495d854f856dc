//! A machine for lifting ranges from a target genome to a query genome.

use std::collections::HashMap;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::alignment::Chain;
use crate::alignment::chain::subset;
use crate::coordinate::reflect;

pub mod builder;

pub use builder::Builder;

/// The default minimum fraction of a range that must map.
pub const DEFAULT_MIN_RATIO: f64 = 0.95;

/// A range mapped through a single chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    /// The query sequence name.
    name: String,

    /// The query strand.
    strand: Strand,

    /// The start on the `+` strand of the query.
    start: Number,

    /// The end on the `+` strand of the query.
    end: Number,

    /// The score of the chain.
    score: f64,

    /// The id of the chain.
    chain_id: Option<usize>,

    /// The fraction of the input range covered by aligned blocks.
    ratio: f64,
}

impl Mapping {
    /// Gets the query sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the query strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the start on the `+` strand of the query.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end on the `+` strand of the query.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the score of the chain the range was mapped through.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Gets the id of the chain the range was mapped through.
    pub fn chain_id(&self) -> Option<usize> {
        self.chain_id
    }

    /// Gets the fraction of the input range covered by aligned blocks.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// A machine for lifting ranges through a set of chains.
///
/// Generally, you will want to use a [`builder::Builder`] to construct one of
/// these.
#[derive(Debug)]
pub struct Machine {
    /// The chains.
    chains: Vec<Chain>,

    /// An interval index over the target range of each chain, keyed by the
    /// target sequence name. Values are indices into `chains`.
    inner: HashMap<String, lapper::Lapper<Number, usize>>,
}

impl Machine {
    /// Gets the chains.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Gets the names of the target sequences with at least one chain.
    pub fn target_chromosomes(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Lifts the target range `[start, end)` on `name` through every chain
    /// that overlaps it.
    ///
    /// Each overlapping chain is subset to the range, and the resulting
    /// query range is kept when its aligned blocks cover at least
    /// `min_ratio` of the input. Mappings are sorted from the highest chain
    /// score to the lowest. A zero-length range is mapped as the single base
    /// following it and collapsed back to zero length afterwards. An inverted
    /// range (`start > end`) maps nowhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::liftover::machine::Builder;
    /// use omics::coordinate::Strand;
    ///
    /// let data = b"chain 100 seq0 100 + 0 100 seq1 200 - 50 150 1\n100";
    /// let machine = Builder.try_build_from(chainkit::Reader::new(&data[..]))?;
    ///
    /// let mappings = machine.liftover("seq0", 10, 20, 0.95);
    /// assert_eq!(mappings.len(), 1);
    ///
    /// let mapping = &mappings[0];
    /// assert_eq!(mapping.name(), "seq1");
    /// assert_eq!(mapping.strand(), Strand::Negative);
    /// assert_eq!((mapping.start(), mapping.end()), (130, 140));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn liftover(
        &self,
        name: &str,
        start: Number,
        end: Number,
        min_ratio: f64,
    ) -> Vec<Mapping> {
        let Some(index) = self.inner.get(name) else {
            return Vec::new();
        };

        if start > end {
            return Vec::new();
        }

        let inserted = start == end;
        let end = if inserted { end + 1 } else { end };
        let size = (end - start) as f64;

        let mut mappings = index
            .find(start, end)
            .filter_map(|interval| {
                let chain = &self.chains[interval.val];
                let subset = subset::on_target(chain, start, end);
                let narrowed = subset.chain()?;

                let ratio = narrowed.aligned_size() as f64 / size;

                if ratio < min_ratio {
                    return None;
                }

                let query = narrowed.query_sequence();
                let (start, end) = match query.strand() {
                    Strand::Positive => (query.alignment_start(), query.alignment_end()),
                    Strand::Negative => reflect(
                        query.alignment_start(),
                        query.alignment_end(),
                        query.chromosome_size(),
                    ),
                };

                // The point before the mapped base, in the target's orientation.
                let (start, end) = match (inserted, query.strand()) {
                    (true, Strand::Positive) => (start, start),
                    (true, Strand::Negative) => (end, end),
                    (false, _) => (start, end),
                };

                Some(Mapping {
                    name: query.chromosome_name().to_string(),
                    strand: query.strand(),
                    start,
                    end,
                    score: chain.score(),
                    chain_id: chain.id(),
                    ratio,
                })
            })
            .collect::<Vec<_>>();

        mappings.sort_by(|a, b| b.score.total_cmp(&a.score));
        mappings
    }
}

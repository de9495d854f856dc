//! Lifting records from contig coordinates to chromosome coordinates.
//!
//! A [`Table`] maps each old (contig) name to a [`Spec`] describing where the
//! contig lies within its new (chromosome) sequence. A [`Lifter`] applies the
//! table to chains, nets, AXT records, PSL records and tab-separated lines,
//! on either the target or the query side. Names missing from the table are
//! handled according to a [`Policy`].
//!
//! Specs on the `-` strand reverse the lifted coordinates. This is supported
//! for chains (both sides), PSL records (both sides), and the query side of
//! nets and AXT records. Everywhere else such a spec is an
//! [`Error::UnsupportedReverseLift`].

use std::str::FromStr;

use nonempty::NonEmpty;
use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use tracing::warn;

use crate::alignment::Chain;
use crate::alignment::chain::Block;
use crate::alignment::chain::header;
use crate::alignment::chain::header::Sequence;
use crate::axt;
use crate::coordinate::opposite;
use crate::coordinate::reflect;
use crate::net::Net;
use crate::net::Segment;
use crate::lift::spec::strip_chrom_prefix;
use crate::psl;

pub mod format;
pub mod spec;
pub mod table;
pub mod tabbed;

pub use format::Format;
pub use spec::Spec;
pub use table::Table;
pub use tabbed::Columns;
pub use tabbed::Tabbed;

/// The most warnings a single [`Lifter`] will log.
pub const MAX_WARNINGS: usize = 10;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to lifting.
#[derive(Debug)]
pub enum Error {
    /// A name was missing from the lift table under [`Policy::Error`].
    Missing(String),

    /// A `-` strand spec was found for a record that cannot be reversed.
    ///
    /// Holds the kind of record and the old sequence name.
    UnsupportedReverseLift(&'static str, String),

    /// A lifted coordinate fell outside the new sequence.
    ///
    /// Holds the new sequence name, the coordinate and the sequence size.
    CoordinateOutOfRange(String, i64, Number),

    /// A tab-separated line could not be lifted.
    Tabbed(tabbed::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(name) => write!(f, "`{name}` is not in the lift table"),
            Error::UnsupportedReverseLift(kind, name) => write!(
                f,
                "cannot lift the {kind} on `{name}` through a reverse strand lift spec"
            ),
            Error::CoordinateOutOfRange(name, value, size) => write!(
                f,
                "lifted coordinate {value} falls outside `{name}` (size {size})"
            ),
            Error::Tabbed(err) => write!(f, "tabbed error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Side and policy
////////////////////////////////////////////////////////////////////////////////////////

/// The sequence of a record whose coordinates are lifted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Side {
    /// The target sequence.
    #[default]
    Target,

    /// The query sequence.
    Query,
}

/// A parse error related to a [`Policy`].
#[derive(Debug)]
pub struct ParsePolicyError(String);

impl std::fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid policy: expected `carry`, `warn`, `drop` or `error`, found `{}`",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

/// What to do with a record whose sequence is missing from the lift table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Policy {
    /// Keep the record unchanged.
    Carry,

    /// Log a warning and drop the record.
    Warn,

    /// Drop the record silently.
    Drop,

    /// Fail.
    Error,
}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "carry" => Ok(Policy::Carry),
            "warn" => Ok(Policy::Warn),
            "drop" => Ok(Policy::Drop),
            "error" => Ok(Policy::Error),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// The outcome of looking a name up.
#[derive(Debug)]
enum Lookup<'t> {
    /// The name has a spec.
    Found(&'t Spec),

    /// The record passes through unchanged.
    Carry,

    /// The record is dropped.
    Drop,
}

/// Looks `name` up, applying `policy` when it is missing.
fn resolve<'t>(
    table: &'t Table,
    policy: Policy,
    warnings: &mut usize,
    name: &str,
) -> Result<Lookup<'t>> {
    if let Some(spec) = table.get(name) {
        return Ok(Lookup::Found(spec));
    }

    match policy {
        Policy::Carry => Ok(Lookup::Carry),
        Policy::Drop => Ok(Lookup::Drop),
        Policy::Warn => {
            if *warnings < MAX_WARNINGS {
                *warnings += 1;
                warn!("`{name}` is not in the lift table, dropping record");
            }

            Ok(Lookup::Drop)
        }
        Policy::Error => Err(Error::Missing(name.to_string())),
    }
}

/// Maps every block, optionally reversing their order.
fn map_blocks<F>(blocks: &NonEmpty<Block>, reverse: bool, f: F) -> Result<NonEmpty<Block>>
where
    F: Fn(&Block) -> Result<Block>,
{
    let mut ordered = blocks.iter().collect::<Vec<_>>();

    if reverse {
        ordered.reverse();
    }

    let head = f(if reverse { blocks.last() } else { blocks.first() })?;
    let tail = ordered
        .into_iter()
        .skip(1)
        .map(&f)
        .collect::<Result<Vec<_>>>()?;

    Ok(NonEmpty::from((head, tail)))
}

////////////////////////////////////////////////////////////////////////////////////////
// Lifter
////////////////////////////////////////////////////////////////////////////////////////

/// Lifts records through a [`Table`].
#[derive(Debug)]
pub struct Lifter {
    /// The lift table.
    table: Table,

    /// The policy for missing names.
    policy: Policy,

    /// The number of warnings logged so far.
    warnings: usize,
}

impl Lifter {
    /// Creates a new [`Lifter`].
    pub fn new(table: Table, policy: Policy) -> Self {
        Self {
            table,
            policy,
            warnings: 0,
        }
    }

    /// Gets the lift table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Gets the policy for missing names.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Looks up a name, ignoring any `chrom/` prefix.
    fn lookup(&mut self, name: &str) -> Result<Lookup<'_>> {
        resolve(
            &self.table,
            self.policy,
            &mut self.warnings,
            strip_chrom_prefix(name),
        )
    }

    /// Lifts a chain.
    ///
    /// On the target side, a reverse spec reflects the query through its own
    /// size, flips the query strand and reverses the blocks so that the
    /// target stays on the `+` strand. On the query side, coordinates are
    /// shifted on the query strand, which flips for a reverse spec.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Lifter;
    /// use chainkit::lift::Policy;
    /// use chainkit::lift::Side;
    /// use chainkit::lift::Spec;
    ///
    /// let table = [Spec::new(20000, "ctg1", 1000, "chr1", 50000, None)]
    ///     .into_iter()
    ///     .collect();
    /// let mut lifter = Lifter::new(table, Policy::Error);
    ///
    /// let data = b"chain 100 ctg1 1000 + 10 200 q 500 + 0 190 1\n190";
    /// let chain = chainkit::Reader::new(&data[..]).chains().next().unwrap()?;
    ///
    /// let lifted = lifter.lift_chain(chain, Side::Target)?.unwrap();
    /// assert_eq!(
    ///     lifted.to_string(),
    ///     "chain 100 chr1 50000 + 20010 20200 q 500 + 0 190 1\n190"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lift_chain(&mut self, chain: Chain, side: Side) -> Result<Option<Chain>> {
        let name = match side {
            Side::Target => chain.target_sequence().chromosome_name(),
            Side::Query => chain.query_sequence().chromosome_name(),
        };

        let spec = match self.lookup(name)? {
            Lookup::Found(spec) => spec,
            Lookup::Carry => return Ok(Some(chain)),
            Lookup::Drop => return Ok(None),
        };

        let (header, blocks) = chain.into_parts();
        let (score, target, query, id) = header.into_parts();

        let (target, query, blocks) = match side {
            Side::Target if spec.is_reverse() => {
                let query_size = query.chromosome_size();

                let (ts, te) = spec.lift_range(target.alignment_start(), target.alignment_end())?;
                let (qs, qe) = reflect(query.alignment_start(), query.alignment_end(), query_size);

                let blocks = map_blocks(&blocks, true, |block| {
                    let (ts, te) = spec.lift_range(block.target_start(), block.target_end())?;
                    let (qs, qe) = reflect(block.query_start(), block.query_end(), query_size);
                    Ok(Block::from_parts(ts, te, qs, qe))
                })?;

                (
                    renamed(spec, Strand::Positive, ts, te),
                    Sequence::from_parts(
                        query.chromosome_name().to_string(),
                        query_size,
                        opposite(query.strand()),
                        qs,
                        qe,
                    ),
                    blocks,
                )
            }
            Side::Target => {
                let (ts, te) = spec.lift_range(target.alignment_start(), target.alignment_end())?;

                let blocks = map_blocks(&blocks, false, |block| {
                    let (ts, te) = spec.lift_range(block.target_start(), block.target_end())?;
                    Ok(Block::from_parts(ts, te, block.query_start(), block.query_end()))
                })?;

                (renamed(spec, Strand::Positive, ts, te), query, blocks)
            }
            Side::Query => {
                let (by, strand) = spec.stranded_shift(query.strand());

                let qs = spec.shift(query.alignment_start(), by)?;
                let qe = spec.shift(query.alignment_end(), by)?;

                let blocks = map_blocks(&blocks, false, |block| {
                    Ok(Block::from_parts(
                        block.target_start(),
                        block.target_end(),
                        spec.shift(block.query_start(), by)?,
                        spec.shift(block.query_end(), by)?,
                    ))
                })?;

                (target, renamed(spec, strand, qs, qe), blocks)
            }
        };

        let header = header::Record::from_parts(score, target, query, id);
        Ok(Some(Chain::from_parts(header, blocks)))
    }

    /// Lifts a net.
    ///
    /// On the target side the net's chromosome is renamed and every target
    /// start is shifted; reverse specs are unsupported there. On the query
    /// side every fill and gap is looked up by its own query name, and a
    /// segment that is dropped takes its nested segments with it.
    pub fn lift_net(&mut self, mut net: Net, side: Side) -> Result<Option<Net>> {
        match side {
            Side::Target => {
                let spec = match self.lookup(net.chrom_name())? {
                    Lookup::Found(spec) => spec,
                    Lookup::Carry => return Ok(Some(net)),
                    Lookup::Drop => return Ok(None),
                };

                if spec.is_reverse() {
                    return Err(Error::UnsupportedReverseLift(
                        "net",
                        spec.old_name().to_string(),
                    ));
                }

                shift_targets(net.fills_mut(), spec)?;
                net.set_chrom(spec.new_name(), spec.new_size());
            }
            Side::Query => {
                let fills = std::mem::take(net.fills_mut());
                *net.fills_mut() = self.lift_query_segments(fills)?;
            }
        }

        Ok(Some(net))
    }

    /// Lifts the query side of a list of net segments.
    fn lift_query_segments(&mut self, segments: Vec<Segment>) -> Result<Vec<Segment>> {
        let mut lifted = Vec::with_capacity(segments.len());

        for mut segment in segments {
            match self.lookup(segment.query_name())? {
                Lookup::Found(spec) => {
                    let (start, _) = spec.lift_range(
                        segment.query_start(),
                        segment.query_start() + segment.query_size(),
                    )?;

                    let strand = match spec.is_reverse() {
                        true => opposite(segment.query_strand()),
                        false => segment.query_strand(),
                    };

                    segment.set_query(spec.new_name(), strand, start);
                }
                Lookup::Carry => {}
                Lookup::Drop => continue,
            }

            let children = std::mem::take(segment.children_mut());
            *segment.children_mut() = self.lift_query_segments(children)?;
            lifted.push(segment);
        }

        Ok(lifted)
    }

    /// Lifts an AXT record.
    ///
    /// Reverse specs are supported on the query side only. The aligned
    /// symbols are unchanged.
    pub fn lift_axt(&mut self, record: axt::Record, side: Side) -> Result<Option<axt::Record>> {
        let name = match side {
            Side::Target => record.target().name(),
            Side::Query => record.query().name(),
        };

        let spec = match self.lookup(name)? {
            Lookup::Found(spec) => spec,
            Lookup::Carry => return Ok(Some(record)),
            Lookup::Drop => return Ok(None),
        };

        let (target, query, strand) = match side {
            Side::Target => {
                if spec.is_reverse() {
                    return Err(Error::UnsupportedReverseLift(
                        "AXT record",
                        spec.old_name().to_string(),
                    ));
                }

                let (start, end) = spec.lift_range(record.target().start(), record.target().end())?;
                (
                    axt::Span::new(spec.new_name(), start, end),
                    record.query().clone(),
                    record.query_strand(),
                )
            }
            Side::Query => {
                let (by, strand) = spec.stranded_shift(record.query_strand());
                let start = spec.shift(record.query().start(), by)?;
                let end = spec.shift(record.query().end(), by)?;

                (
                    record.target().clone(),
                    axt::Span::new(spec.new_name(), start, end),
                    strand,
                )
            }
        };

        Ok(Some(record.relocated(target, query, strand)))
    }

    /// Lifts a PSL record.
    ///
    /// Block starts are shifted on their own strand. A reverse spec on the
    /// target side of a record without an explicit target strand reverses
    /// the whole record instead, keeping the target on the `+` strand and
    /// flipping the query strand; this is unsupported when the record
    /// carries sequence columns.
    pub fn lift_psl(&mut self, mut record: psl::Record, side: Side) -> Result<Option<psl::Record>> {
        let name = match side {
            Side::Target => record.target().name(),
            Side::Query => record.query().name(),
        };

        let spec = match self.lookup(name)? {
            Lookup::Found(spec) => spec,
            Lookup::Carry => return Ok(Some(record)),
            Lookup::Drop => return Ok(None),
        };

        match side {
            Side::Query => {
                let placement = record.query();
                let range = spec.lift_range(placement.start(), placement.end())?;
                let (by, strand) = spec.stranded_shift(record.query_strand());
                let starts = shift_all(spec, placement.block_starts(), by)?;

                record.query_mut().relocate(spec.new_name(), spec.new_size(), range, starts);
                record.set_strands(strand, record.target_strand());
            }
            Side::Target if spec.is_reverse() && record.target_strand().is_none() => {
                if !record.extras().is_empty() {
                    return Err(Error::UnsupportedReverseLift(
                        "PSL record with sequences",
                        spec.old_name().to_string(),
                    ));
                }

                let range = spec.lift_range(record.target().start(), record.target().end())?;
                let query_size = record.query().size();

                let mut target_starts = Vec::with_capacity(record.block_sizes().len());
                let mut query_starts = Vec::with_capacity(record.block_sizes().len());

                for (i, &size) in record.block_sizes().iter().enumerate() {
                    let target_start = record.target().block_starts()[i];
                    let (start, _) = spec.lift_range(target_start, target_start + size)?;
                    target_starts.push(start);

                    let query_start = record.query().block_starts()[i];
                    query_starts.push(reflect(query_start, query_start + size, query_size).0);
                }

                let query = record.query().clone();
                record.target_mut().relocate(
                    spec.new_name(),
                    spec.new_size(),
                    range,
                    target_starts,
                );
                record.query_mut().relocate(
                    query.name(),
                    query.size(),
                    (query.start(), query.end()),
                    query_starts,
                );
                record.set_strands(opposite(record.query_strand()), None);
                record.reverse_blocks();
            }
            Side::Target => {
                let placement = record.target();
                let range = spec.lift_range(placement.start(), placement.end())?;
                let strand = record.target_strand().unwrap_or(Strand::Positive);
                let (by, strand) = spec.stranded_shift(strand);
                let starts = shift_all(spec, placement.block_starts(), by)?;

                let target_strand = record.target_strand().map(|_| strand);
                record.target_mut().relocate(spec.new_name(), spec.new_size(), range, starts);
                record.set_strands(record.query_strand(), target_strand);
            }
        }

        Ok(Some(record))
    }

    /// Lifts one tab-separated line.
    ///
    /// Reverse specs are unsupported. A carried line loses the `chrom/`
    /// prefix of its name. Returns [`None`] when the line is dropped.
    pub fn lift_tabbed(&mut self, line: &str, columns: Columns) -> Result<Option<Tabbed>> {
        let mut tabbed = Tabbed::parse(line, columns).map_err(Error::Tabbed)?;

        let spec = match self.lookup(tabbed.chrom())? {
            Lookup::Found(spec) => spec,
            Lookup::Carry => {
                tabbed.strip_name();
                return Ok(Some(tabbed));
            }
            Lookup::Drop => return Ok(None),
        };

        if spec.is_reverse() {
            return Err(Error::UnsupportedReverseLift(
                "line",
                spec.old_name().to_string(),
            ));
        }

        let (start, end) = spec.lift_range(tabbed.start(), tabbed.end())?;
        tabbed.relocate(spec.new_name(), start, end);

        Ok(Some(tabbed))
    }
}

/// Builds the sequence a lifted side ends up on.
fn renamed(spec: &Spec, strand: Strand, start: Number, end: Number) -> Sequence {
    Sequence::from_parts(
        spec.new_name().to_string(),
        spec.new_size(),
        strand,
        start,
        end,
    )
}

/// Shifts every value by the same amount.
fn shift_all(spec: &Spec, values: &[Number], by: i64) -> Result<Vec<Number>> {
    values.iter().map(|&value| spec.shift(value, by)).collect()
}

/// Shifts the target start of every segment in a net tree.
fn shift_targets(segments: &mut [Segment], spec: &Spec) -> Result<()> {
    for segment in segments {
        let start = segment.target_start();
        let (start, _) = spec.lift_range(start, start + segment.target_size())?;

        segment.set_target_start(start);
        shift_targets(segment.children_mut(), spec)?;
    }

    Ok(())
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

    fn net(text: &str) -> Net {
        crate::net::Reader::new(text.as_bytes())
            .nets()
            .next()
            .unwrap()
            .unwrap()
    }

    fn lifter(spec: Spec, policy: Policy) -> Lifter {
        Lifter::new([spec].into_iter().collect(), policy)
    }

    fn forward() -> Spec {
        Spec::new(100, "ctg1", 50, "chr1", 1000, Some(Strand::Positive))
    }

    fn reverse() -> Spec {
        Spec::new(100, "ctg1", 50, "chr1", 1000, Some(Strand::Negative))
    }

    #[test]
    fn policies() {
        let text = "chain 5 other 50 + 0 10 q 50 + 0 10 1\n10";

        let mut carry = lifter(forward(), Policy::Carry);
        let lifted = carry.lift_chain(chain(text), Side::Target).unwrap().unwrap();
        assert_eq!(lifted.to_string(), text);

        let mut drop = lifter(forward(), Policy::Drop);
        assert!(drop.lift_chain(chain(text), Side::Target).unwrap().is_none());

        let mut warn = lifter(forward(), Policy::Warn);
        for _ in 0..(MAX_WARNINGS + 5) {
            assert!(warn.lift_chain(chain(text), Side::Target).unwrap().is_none());
        }
        assert_eq!(warn.warnings, MAX_WARNINGS);

        let mut error = lifter(forward(), Policy::Error);
        let err = error.lift_chain(chain(text), Side::Target).unwrap_err();
        assert_eq!(err.to_string(), "`other` is not in the lift table");
    }

    #[test]
    fn policy_names() {
        assert_eq!("CARRY".parse::<Policy>().unwrap(), Policy::Carry);
        assert_eq!("drop".parse::<Policy>().unwrap(), Policy::Drop);

        let err = "keep".parse::<Policy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid policy: expected `carry`, `warn`, `drop` or `error`, found `keep`"
        );
    }

    #[test]
    fn chain_target_reverse_keeps_target_positive() {
        let mut lifter = lifter(reverse(), Policy::Error);
        let lifted = lifter
            .lift_chain(
                chain("chain 100 ctg1 50 + 0 30 q 100 + 10 40 1\n10\t5\t5\n15"),
                Side::Target,
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "chain 100 chr1 1000 + 120 150 q 100 - 60 90 1\n15\t5\t5\n10"
        );
    }

    #[test]
    fn chain_query_shifts_on_the_query_strand() {
        let mut lifter = lifter(forward(), Policy::Error);
        let lifted = lifter
            .lift_chain(chain("chain 5 t 100 + 0 10 ctg1 50 - 5 15 2\n10"), Side::Query)
            .unwrap()
            .unwrap();
        assert_eq!(lifted.to_string(), "chain 5 t 100 + 0 10 chr1 1000 - 855 865 2\n10");

        let mut lifter = self::lifter(reverse(), Policy::Error);
        let lifted = lifter
            .lift_chain(chain("chain 5 t 100 + 0 10 ctg1 50 + 5 15 2\n10"), Side::Query)
            .unwrap()
            .unwrap();
        assert_eq!(lifted.to_string(), "chain 5 t 100 + 0 10 chr1 1000 - 855 865 2\n10");
    }

    #[test]
    fn out_of_range_lifts_fail() {
        let spec = Spec::new(990, "ctg1", 50, "chr1", 1000, None);
        let mut lifter = lifter(spec, Policy::Error);
        let err = lifter
            .lift_chain(chain("chain 5 ctg1 50 + 0 20 q 50 + 0 20 1\n20"), Side::Target)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "lifted coordinate 1010 falls outside `chr1` (size 1000)"
        );
    }

    #[test]
    fn net_target_shifts_every_level() {
        let mut lifter = lifter(forward(), Policy::Error);
        let lifted = lifter
            .lift_net(
                net("net ctg1 50\n fill 0 30 q + 100 30 id 1\n  gap 10 5 q + 110 5"),
                Side::Target,
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "net chr1 1000\n fill 100 30 q + 100 30 id 1\n  gap 110 5 q + 110 5"
        );
    }

    #[test]
    fn net_target_reverse_is_unsupported() {
        let mut lifter = lifter(reverse(), Policy::Error);
        let err = lifter
            .lift_net(net("net ctg1 50\n fill 0 30 q + 100 30"), Side::Target)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "cannot lift the net on `ctg1` through a reverse strand lift spec"
        );
    }

    #[test]
    fn net_query_reverse_flips_strands() {
        let mut lifter = lifter(reverse(), Policy::Drop);
        let lifted = lifter
            .lift_net(
                net("net t 500\n fill 0 30 ctg1 + 10 30 id 1\n  gap 10 5 ctg1 + 20 5\n fill 40 5 other + 0 5"),
                Side::Query,
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "net t 500\n fill 0 30 chr1 - 110 30 id 1\n  gap 10 5 chr1 - 125 5"
        );
    }

    #[test]
    fn net_query_carry_still_lifts_children() {
        let mut lifter = lifter(forward(), Policy::Carry);
        let lifted = lifter
            .lift_net(
                net("net t 500\n fill 0 30 other + 0 30\n  gap 10 5 ctg1 + 20 5"),
                Side::Query,
            )
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "net t 500\n fill 0 30 other + 0 30\n  gap 10 5 chr1 + 120 5"
        );
    }

    fn axt_record() -> axt::Record {
        axt::Record::try_new(
            axt::Span::new("ctg1", 0, 4),
            axt::Span::new("ctg1", 10, 13),
            Strand::Positive,
            7,
            "ACGT".into(),
            "AC-T".into(),
        )
        .unwrap()
    }

    #[test]
    fn axt_sides() {
        let mut lifter = lifter(reverse(), Policy::Error);

        let err = lifter.lift_axt(axt_record(), Side::Target).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot lift the AXT record on `ctg1` through a reverse strand lift spec"
        );

        let lifted = lifter.lift_axt(axt_record(), Side::Query).unwrap().unwrap();
        assert_eq!(lifted.query(), &axt::Span::new("chr1", 860, 863));
        assert_eq!(lifted.query_strand(), Strand::Negative);
        assert_eq!(lifted.query_symbols(), "AC-T");

        let mut lifter = self::lifter(forward(), Policy::Error);
        let lifted = lifter.lift_axt(axt_record(), Side::Target).unwrap().unwrap();
        assert_eq!(lifted.target(), &axt::Span::new("chr1", 100, 104));
    }

    const PSL: &str = "10\t0\t0\t0\t0\t0\t0\t0\t+\tq1\t100\t5\t15\tctg1\t50\t0\t12\t2\t4,6,\t5,9,\t0,6,";

    #[test]
    fn psl_target_forward() {
        let mut lifter = lifter(forward(), Policy::Error);
        let lifted = lifter
            .lift_psl(PSL.parse().unwrap(), Side::Target)
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "10\t0\t0\t0\t0\t0\t0\t0\t+\tq1\t100\t5\t15\tchr1\t1000\t100\t112\t2\t4,6,\t5,9,\t100,106,"
        );
    }

    #[test]
    fn psl_target_reverse_reverses_the_record() {
        let mut lifter = lifter(reverse(), Policy::Error);
        let lifted = lifter
            .lift_psl(PSL.parse().unwrap(), Side::Target)
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "10\t0\t0\t0\t0\t0\t0\t0\t-\tq1\t100\t5\t15\tchr1\t1000\t138\t150\t2\t6,4,\t85,91,\t138,146,"
        );
    }

    #[test]
    fn psl_query_forward() {
        let spec = Spec::new(1000, "q1", 100, "chrQ", 5000, None);
        let mut lifter = lifter(spec, Policy::Error);
        let lifted = lifter
            .lift_psl(PSL.parse().unwrap(), Side::Query)
            .unwrap()
            .unwrap();

        assert_eq!(lifted.query().name(), "chrQ");
        assert_eq!(lifted.query().start(), 1005);
        assert_eq!(lifted.query().end(), 1015);
        assert_eq!(lifted.query().block_starts(), &[1005, 1009]);
    }

    #[test]
    fn psl_query_reverse_shifts_from_the_far_end() {
        let spec = Spec::new(1000, "q1", 100, "chrQ", 5000, Some(Strand::Negative));
        let mut lifter = lifter(spec, Policy::Error);
        let lifted = lifter
            .lift_psl(PSL.parse().unwrap(), Side::Query)
            .unwrap()
            .unwrap();

        assert_eq!(
            lifted.to_string(),
            "10\t0\t0\t0\t0\t0\t0\t0\t-\tchrQ\t5000\t1085\t1095\tctg1\t50\t0\t12\t2\t4,6,\t3905,3909,\t0,6,"
        );
    }

    #[test]
    fn chrom_prefixes_are_ignored_on_lookup() {
        let mut lifter = lifter(forward(), Policy::Error);

        let lifted = lifter
            .lift_chain(chain("chain 5 chr1/ctg1 50 + 0 10 q 50 + 0 10 1\n10"), Side::Target)
            .unwrap()
            .unwrap();
        assert_eq!(
            lifted.to_string(),
            "chain 5 chr1 1000 + 100 110 q 50 + 0 10 1\n10"
        );

        let psl = PSL.replace("\tctg1\t", "\tchr1/ctg1\t");
        let lifted = lifter
            .lift_psl(psl.parse().unwrap(), Side::Target)
            .unwrap()
            .unwrap();
        assert_eq!(lifted.target().name(), "chr1");

        let err = lifter
            .lift_chain(chain("chain 5 chr1/ctg9 50 + 0 10 q 50 + 0 10 1\n10"), Side::Target)
            .unwrap_err();
        assert_eq!(err.to_string(), "`ctg9` is not in the lift table");
    }

    #[test]
    fn tabbed_lines() {
        let mut lifter = lifter(forward(), Policy::Carry);

        let lifted = lifter
            .lift_tabbed("chr1/ctg1\t10\t20\tname", Columns::BED)
            .unwrap()
            .unwrap();
        assert_eq!(lifted.line(), "chr1\t110\t120\tname");

        let carried = lifter
            .lift_tabbed("ctg9\t10\t20\tname", Columns::BED)
            .unwrap()
            .unwrap();
        assert_eq!(carried.line(), "ctg9\t10\t20\tname");

        let carried = lifter
            .lift_tabbed("chr9/ctg9\t10\t20\tname", Columns::BED)
            .unwrap()
            .unwrap();
        assert_eq!(carried.line(), "ctg9\t10\t20\tname");

        let mut lifter = self::lifter(reverse(), Policy::Carry);
        let err = lifter
            .lift_tabbed("ctg1\tsrc\tgene\t10\t20", Columns::GFF)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot lift the line on `ctg1` through a reverse strand lift spec"
        );
    }
}

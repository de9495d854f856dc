//! A binary for transforming chain files.
//!
//! ```shell
//! cargo run --release --bin=chaintools --features=binaries -- swap in.chain
//! ```
//!
//! Every subcommand writes to standard output.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chainkit::alignment::Chain;
use chainkit::alignment::chain::header::Sequence;
use chainkit::alignment::chain::subset;
use chainkit::alignment::chain::swap;
use chainkit::axt;
use chainkit::axt::Window;
use chainkit::axt::project::DEFAULT_MAX_GAP;
use chainkit::axt::project::DEFAULT_MAX_SPAN;
use chainkit::liftover::machine::Builder;
use chainkit::liftover::machine::DEFAULT_MIN_RATIO;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use noodles::fasta;
use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// The number of leading BED columns that hold the name and range.
const BED_RANGE_COLUMNS: usize = 3;

/// The BED column that holds the strand.
const BED_STRAND_COLUMN: usize = 5;

/// Transforms chain files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

/// A subcommand.
#[derive(Subcommand, Debug)]
enum Command {
    /// Projects chains onto their sequences as AXT alignments.
    ToAxt {
        /// The chain file.
        chain: PathBuf,

        /// The FASTA file holding the target sequences.
        target: PathBuf,

        /// The FASTA file holding the query sequences.
        query: PathBuf,

        /// The largest single-sided gap kept within one record.
        #[arg(long, default_value_t = DEFAULT_MAX_GAP)]
        max_gap: Number,

        /// The largest target span of one record.
        #[arg(long, default_value_t = DEFAULT_MAX_SPAN)]
        max_span: Number,
    },

    /// Exchanges the target and query of every chain.
    Swap {
        /// The chain file.
        chain: PathBuf,
    },

    /// Restricts chains on one sequence to a range.
    Subset {
        /// The chain file.
        chain: PathBuf,

        /// The sequence name.
        name: String,

        /// The start of the range.
        start: Number,

        /// The end of the range.
        end: Number,

        /// Treat the name and range as referring to the query (on the query
        /// strand) instead of the target.
        #[arg(long)]
        query: bool,
    },

    /// Lifts BED ranges from the target assembly to the query assembly.
    Liftover {
        /// The chain file.
        chain: PathBuf,

        /// The BED file.
        bed: PathBuf,

        /// The minimum fraction of each range that must map.
        #[arg(long, default_value_t = DEFAULT_MIN_RATIO)]
        min_ratio: f64,
    },
}

/// Reads every chain in a file.
fn read_chains(path: &Path) -> Result<Vec<Chain>> {
    let reader = chainkit::io::open(path)
        .with_context(|| format!("opening chain file `{}`", path.display()))?;

    chainkit::Reader::new(reader)
        .chains()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading chains from `{}`", path.display()))
}

/// Reads every sequence in a FASTA file.
fn read_sequences(path: &Path) -> Result<HashMap<String, Vec<u8>>> {
    let mut sequences = HashMap::new();

    for result in fasta::reader::Builder
        .build_from_path(path)
        .with_context(|| format!("opening FASTA file `{}`", path.display()))?
        .records()
    {
        let record = result.with_context(|| format!("reading `{}`", path.display()))?;
        let name = String::from_utf8_lossy(record.name()).to_string();
        sequences.insert(name, record.sequence().as_ref().to_vec());
    }

    info!("read {} sequences from `{}`", sequences.len(), path.display());

    Ok(sequences)
}

/// Builds the window covering the aligned span of one side of a chain.
///
/// `bases` holds the whole `+` strand chromosome, which must have the size
/// the chain declares.
fn window<'a>(sequence: &Sequence, bases: &'a [u8]) -> Result<Window<'a>> {
    let name = sequence.chromosome_name();
    let size = sequence.chromosome_size();

    if bases.len() as Number != size {
        bail!(
            "`{name}` has {} bases in the FASTA file but the chain declares a size of {size}",
            bases.len()
        );
    }

    let (start, end) = match sequence.strand() {
        Strand::Positive => (sequence.alignment_start(), sequence.alignment_end()),
        Strand::Negative => (
            size - sequence.alignment_end(),
            size - sequence.alignment_start(),
        ),
    };

    let Some(forward) = bases.get(start as usize..end as usize) else {
        bail!("`{name}` does not cover {start}-{end}");
    };

    Ok(Window::oriented(forward, start, sequence.strand(), size))
}

fn to_axt(
    chain: &Path,
    target: &Path,
    query: &Path,
    max_gap: Number,
    max_span: Number,
) -> Result<()> {
    let chains = read_chains(chain)?;
    let targets = read_sequences(target)?;
    let queries = read_sequences(query)?;

    let mut writer = axt::Writer::new(chainkit::io::create(chainkit::io::STANDARD_OUTPUT)?);

    for chain in &chains {
        let target = chain.target_sequence();
        let query = chain.query_sequence();

        let Some(target_sequence) = targets.get(target.chromosome_name()) else {
            bail!("`{}` is missing from the target FASTA", target.chromosome_name());
        };

        let Some(query_sequence) = queries.get(query.chromosome_name()) else {
            bail!("`{}` is missing from the query FASTA", query.chromosome_name());
        };

        let target_window = window(target, target_sequence)?;
        let query_window = window(query, query_sequence)?;

        let records = axt::project(chain, &target_window, &query_window, max_gap, max_span)
            .with_context(|| format!("projecting chain {}", chain.header()))?;

        debug!("chain {:?}: {} records", chain.id(), records.len());

        for record in &records {
            writer.write_record(record)?;
        }
    }

    writer.into_inner().flush()?;

    Ok(())
}

fn swap_chains(chain: &Path) -> Result<()> {
    let mut writer = chainkit::io::create(chainkit::io::STANDARD_OUTPUT)?;

    for chain in read_chains(chain)? {
        write!(writer, "{}\n\n", swap::swap(chain))?;
    }

    writer.flush()?;

    Ok(())
}

fn subset_chains(chain: &Path, name: &str, start: Number, end: Number, query: bool) -> Result<()> {
    if start > end {
        bail!("the start ({start}) must not come after the end ({end})");
    }

    let mut writer = chainkit::io::create(chainkit::io::STANDARD_OUTPUT)?;
    let mut kept = 0usize;

    for chain in read_chains(chain)? {
        let subset = match query {
            true if chain.query_sequence().chromosome_name() == name => {
                subset::on_query(&chain, start, end)
            }
            false if chain.target_sequence().chromosome_name() == name => {
                subset::on_target(&chain, start, end)
            }
            _ => continue,
        };

        if let Some(chain) = subset.chain() {
            write!(writer, "{chain}\n\n")?;
            kept += 1;
        }
    }

    writer.flush()?;
    info!("{kept} chains overlap {name}:{start}-{end}");

    Ok(())
}

/// Parses the range of a BED line split into `fields`.
fn bed_range(fields: &[String], line_no: usize) -> Result<(Number, Number)> {
    if fields.len() < BED_RANGE_COLUMNS {
        bail!("line {line_no}: expected at least {BED_RANGE_COLUMNS} fields");
    }

    let start = fields[1]
        .parse::<Number>()
        .with_context(|| format!("line {line_no}: invalid start"))?;
    let end = fields[2]
        .parse::<Number>()
        .with_context(|| format!("line {line_no}: invalid end"))?;

    if start > end {
        bail!("line {line_no}: the start ({start}) must not come after the end ({end})");
    }

    Ok((start, end))
}

fn liftover(chain: &Path, bed: &Path, min_ratio: f64) -> Result<()> {
    let reader = chainkit::io::open(chain)
        .with_context(|| format!("opening chain file `{}`", chain.display()))?;

    let machine = Builder
        .try_build_from(chainkit::Reader::new(reader))
        .with_context(|| format!("indexing chains from `{}`", chain.display()))?;

    let mut writer = chainkit::io::create(chainkit::io::STANDARD_OUTPUT)?;
    let mut unmapped = 0usize;

    let mut lines = chainkit::io::open(bed)
        .with_context(|| format!("opening BED file `{}`", bed.display()))?;
    let mut buffer = String::new();
    let mut line_no = 0usize;

    while std::io::BufRead::read_line(&mut lines, &mut buffer)? > 0 {
        line_no += 1;
        let line = buffer.trim_end_matches(['\n', '\r']);

        if line.is_empty() || line.starts_with('#') {
            buffer.clear();
            continue;
        }

        let mut fields = line.split('\t').map(String::from).collect::<Vec<_>>();

        let (start, end) = bed_range(&fields, line_no)?;

        match machine.liftover(&fields[0], start, end, min_ratio).first() {
            Some(mapping) => {
                fields[0] = mapping.name().to_string();
                fields[1] = mapping.start().to_string();
                fields[2] = mapping.end().to_string();

                if mapping.strand() == Strand::Negative {
                    if let Some(strand) = fields.get_mut(BED_STRAND_COLUMN) {
                        *strand = match strand.as_str() {
                            "+" => String::from("-"),
                            "-" => String::from("+"),
                            other => other.to_string(),
                        };
                    }
                }

                writeln!(writer, "{}", fields.join("\t"))?;
            }
            None => {
                unmapped += 1;
                debug!("line {line_no} did not map: {line}");
            }
        }

        buffer.clear();
    }

    writer.flush()?;

    if unmapped > 0 {
        warn!("{unmapped} ranges did not map");
    }

    Ok(())
}

fn throw(args: Args) -> Result<()> {
    match args.command {
        Command::ToAxt {
            chain,
            target,
            query,
            max_gap,
            max_span,
        } => to_axt(&chain, &target, &query, max_gap, max_span),
        Command::Swap { chain } => swap_chains(&chain),
        Command::Subset {
            chain,
            name,
            start,
            end,
            query,
        } => subset_chains(&chain, &name, start, end, query),
        Command::Liftover {
            chain,
            bed,
            min_ratio,
        } => liftover(&chain, &bed, min_ratio),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    throw(args)
}

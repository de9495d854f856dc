//! A binary to lift records from contig coordinates to chromosome coordinates.
//!
//! ```shell
//! cargo run --release --bin=liftup --features=binaries -- \
//!     out.chain contigs.lft warn contigs.chain
//! ```
//!
//! The format is inferred from the suffix of the destination unless `--type`
//! is given. The target side of each record is lifted unless one of the
//! query flags (`--psl-q`, `--chain-q`, `--net-q` or `--axt-q`) matches the
//! format.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chainkit::lift::Format;
use chainkit::lift::Lifter;
use chainkit::lift::Policy;
use chainkit::lift::Side;
use chainkit::lift::Table;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Lifts records from contig coordinates to chromosome coordinates.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The output file (`stdout` writes to standard output).
    dest: PathBuf,

    /// The lift table (`offset oldName oldSize newName newSize [strand]`).
    lift_spec: PathBuf,

    /// What to do with records whose sequence is not in the lift table
    /// (`carry`, `warn`, `drop` or `error`).
    policy: Policy,

    /// The files to lift (files ending in `.gz` are decompressed).
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// The format of the records, overriding the suffix of the destination.
    #[arg(long = "type")]
    format: Option<Format>,

    /// Lift the query side of PSL records.
    #[arg(long)]
    psl_q: bool,

    /// Lift the query side of chains.
    #[arg(long)]
    chain_q: bool,

    /// Lift the query side of nets.
    #[arg(long)]
    net_q: bool,

    /// Lift the query side of AXT records.
    #[arg(long)]
    axt_q: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

impl Args {
    /// Gets the side to lift for `format`.
    fn side(&self, format: Format) -> Result<Side> {
        let flags = [
            (Format::Psl, self.psl_q, "--psl-q"),
            (Format::Chain, self.chain_q, "--chain-q"),
            (Format::Net, self.net_q, "--net-q"),
            (Format::Axt, self.axt_q, "--axt-q"),
        ];

        let mut side = Side::Target;

        for (applies_to, set, flag) in flags {
            if !set {
                continue;
            }

            if applies_to != format {
                bail!("`{flag}` cannot be used when lifting {format} records");
            }

            side = Side::Query;
        }

        Ok(side)
    }
}

fn throw(args: &Args) -> Result<()> {
    let format = match args.format {
        Some(format) => format,
        None => match Format::from_path(&args.dest) {
            Some(format) => format,
            None => bail!(
                "cannot infer a format from `{}`: use `--type`",
                args.dest.display()
            ),
        },
    };

    let side = args.side(format)?;

    let table = chainkit::io::open(&args.lift_spec)
        .map_err(anyhow::Error::from)
        .and_then(|reader| Table::read(reader).map_err(anyhow::Error::from))
        .with_context(|| format!("reading lift table `{}`", args.lift_spec.display()))?;

    info!("read {} lift specs", table.len());

    let mut lifter = Lifter::new(table, args.policy);

    let writer = chainkit::io::create(&args.dest)
        .with_context(|| format!("creating `{}`", args.dest.display()))?;

    let lifted = format
        .lift_files(&mut lifter, side, &args.sources, writer)
        .with_context(|| format!("lifting {format} records"))?;

    info!("lifted {lifted} {format} records");

    Ok(())
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

    throw(&args)
}

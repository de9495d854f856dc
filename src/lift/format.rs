//! Lifting whole files of a single record format.

use std::collections::HashMap;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::Reader;
use crate::alignment::chain::chains;
use crate::axt;
use crate::lift;
use crate::lift::Columns;
use crate::lift::Lifter;
use crate::lift::Side;
use crate::net;
use crate::net::Net;
use crate::psl;
use crate::reader::read_line;

/// The suffix of gzipped files.
const GZIP_SUFFIX: &str = ".gz";

/// The prefix of comment lines in tab-separated files.
const COMMENT_PREFIX: char = '#';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A parse error related to a [`Format`].
#[derive(Debug)]
pub struct ParseError(String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown format: `{}`", self.0)
    }
}

impl std::error::Error for ParseError {}

/// An error related to lifting files.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// An error reading chains.
    Chains(chains::Error),

    /// An error reading nets.
    Net(net::Error),

    /// An error reading AXT records.
    Axt(axt::reader::Error),

    /// An invalid PSL record on the given line.
    Psl(usize, psl::ParseError),

    /// An error lifting a record.
    Lift(lift::Error),

    /// No lines survived lifting.
    NothingLifted,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Chains(err) => write!(f, "chain error: {err}"),
            Error::Net(err) => write!(f, "net error: {err}"),
            Error::Axt(err) => write!(f, "AXT error: {err}"),
            Error::Psl(line_no, err) => write!(f, "PSL error: line {line_no}: {err}"),
            Error::Lift(err) => write!(f, "lift error: {err}"),
            Error::NothingLifted => write!(f, "no lines lifted"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<lift::Error> for Error {
    fn from(err: lift::Error) -> Self {
        Error::Lift(err)
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Format
////////////////////////////////////////////////////////////////////////////////////////

/// A liftable record format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    /// Chains.
    Chain,

    /// Nets.
    Net,

    /// AXT records.
    Axt,

    /// PSL records (including pslx).
    Psl,

    /// BED lines.
    Bed,

    /// GFF and GTF lines.
    Gff,
}

impl Format {
    /// Infers the format from the suffix of a path.
    ///
    /// A trailing `.gz` is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Format;
    ///
    /// assert_eq!(Format::from_path("hg.chain.gz"), Some(Format::Chain));
    /// assert_eq!(Format::from_path("genes.gtf"), Some(Format::Gff));
    /// assert_eq!(Format::from_path("notes.txt"), None);
    /// ```
    pub fn from_path<P>(path: P) -> Option<Self>
    where
        P: AsRef<Path>,
    {
        let name = path.as_ref().file_name()?.to_str()?;
        let name = name.strip_suffix(GZIP_SUFFIX).unwrap_or(name);
        let (_, extension) = name.rsplit_once('.')?;

        extension.parse().ok()
    }

    /// Lifts every record from `sources` and writes the results to `writer`.
    ///
    /// Each source is labelled with a name for logging. Returns the number of
    /// records written. Nets that lift onto the same chromosome are merged,
    /// tab-separated lines are sorted by name and start, and PSL header lines
    /// are kept from the first source only.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Format;
    /// use chainkit::lift::Lifter;
    /// use chainkit::lift::Policy;
    /// use chainkit::lift::Side;
    /// use chainkit::lift::Table;
    ///
    /// let table = Table::read(&b"100\tctg1\t50\tchr1\t1000\n"[..])?;
    /// let mut lifter = Lifter::new(table, Policy::Error);
    ///
    /// let bed = b"ctg1\t20\t30\tb\nctg1\t0\t10\ta\n";
    /// let mut output = Vec::new();
    ///
    /// let lifted = Format::Bed.lift_readers(
    ///     &mut lifter,
    ///     Side::Target,
    ///     [("genes.bed", &bed[..])],
    ///     &mut output,
    /// )?;
    ///
    /// assert_eq!(lifted, 2);
    /// assert_eq!(output, b"chr1\t100\t110\ta\nchr1\t120\t130\tb\n");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lift_readers<I, S, R, W>(
        self,
        lifter: &mut Lifter,
        side: Side,
        sources: I,
        writer: W,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = (S, R)>,
        S: std::fmt::Display,
        R: BufRead,
        W: Write,
    {
        self.lift_sources(lifter, side, sources.into_iter().map(Ok), writer)
    }

    /// Lifts every record in the files at `paths`.
    ///
    /// Files ending in `.gz` are decompressed. Each file is opened only when
    /// its turn comes and is closed before the next one is opened.
    pub fn lift_files<P, W>(
        self,
        lifter: &mut Lifter,
        side: Side,
        paths: &[P],
        writer: W,
    ) -> Result<usize>
    where
        P: AsRef<Path>,
        W: Write,
    {
        let sources = paths.iter().map(|path| {
            let path = path.as_ref();
            crate::io::open(path).map(|reader| (path.display().to_string(), reader))
        });

        self.lift_sources(lifter, side, sources, writer)
    }

    /// Lifts every record from `sources`, which are opened as they are
    /// iterated.
    fn lift_sources<I, S, R, W>(
        self,
        lifter: &mut Lifter,
        side: Side,
        sources: I,
        mut writer: W,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = io::Result<(S, R)>>,
        S: std::fmt::Display,
        R: BufRead,
        W: Write,
    {
        let lifted = match self {
            Format::Chain => lift_chains(lifter, side, sources, &mut writer)?,
            Format::Net => lift_nets(lifter, side, sources, &mut writer)?,
            Format::Axt => lift_axts(lifter, side, sources, &mut writer)?,
            Format::Psl => lift_psls(lifter, side, sources, &mut writer)?,
            Format::Bed => lift_lines(lifter, Columns::BED, sources, &mut writer)?,
            Format::Gff => lift_lines(lifter, Columns::GFF, sources, &mut writer)?,
        };

        writer.flush()?;
        Ok(lifted)
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "chain" => Ok(Format::Chain),
            "net" => Ok(Format::Net),
            "axt" => Ok(Format::Axt),
            "psl" | "pslx" => Ok(Format::Psl),
            "bed" => Ok(Format::Bed),
            "gff" | "gtf" => Ok(Format::Gff),
            _ => Err(ParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Chain => write!(f, "chain"),
            Format::Net => write!(f, "net"),
            Format::Axt => write!(f, "axt"),
            Format::Psl => write!(f, "psl"),
            Format::Bed => write!(f, "bed"),
            Format::Gff => write!(f, "gff"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Per-format lifting
////////////////////////////////////////////////////////////////////////////////////////

/// Lifts chains, writing each one as soon as it is lifted.
fn lift_chains<I, S, R, W>(
    lifter: &mut Lifter,
    side: Side,
    sources: I,
    writer: &mut W,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<(S, R)>>,
    S: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let mut lifted = 0;

    for source in sources {
        let (name, source) = source?;

        debug!("lifting chains from {name}");

        let mut reader = Reader::new(source);

        for result in reader.chains() {
            let chain = result.map_err(Error::Chains)?;

            if let Some(chain) = lifter.lift_chain(chain, side)? {
                write!(writer, "{chain}\n\n")?;
                lifted += 1;
            }
        }
    }

    Ok(lifted)
}

/// Lifts nets, merging those that end up on the same chromosome.
fn lift_nets<I, S, R, W>(
    lifter: &mut Lifter,
    side: Side,
    sources: I,
    writer: &mut W,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<(S, R)>>,
    S: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let mut nets: Vec<Net> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for source in sources {
        let (name, source) = source?;

        debug!("lifting nets from {name}");

        let mut reader = net::Reader::new(source);

        for result in reader.nets() {
            let net = result.map_err(Error::Net)?;

            if let Some(net) = lifter.lift_net(net, side)? {
                match index.get(net.chrom_name()) {
                    Some(&i) => nets[i].merge(net),
                    None => {
                        index.insert(net.chrom_name().to_string(), nets.len());
                        nets.push(net);
                    }
                }
            }
        }
    }

    for net in &nets {
        writeln!(writer, "{net}")?;
    }

    Ok(nets.len())
}

/// Lifts AXT records, numbering them across all sources.
fn lift_axts<I, S, R, W>(
    lifter: &mut Lifter,
    side: Side,
    sources: I,
    writer: &mut W,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<(S, R)>>,
    S: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let mut output = axt::Writer::new(writer);
    let mut lifted = 0;

    for source in sources {
        let (name, source) = source?;

        debug!("lifting AXT records from {name}");

        let mut reader = axt::Reader::new(source);

        for result in reader.records() {
            let record = result.map_err(Error::Axt)?;

            if let Some(record) = lifter.lift_axt(record, side)? {
                output.write_record(&record)?;
                lifted += 1;
            }
        }
    }

    Ok(lifted)
}

/// Lifts PSL records.
fn lift_psls<I, S, R, W>(
    lifter: &mut Lifter,
    side: Side,
    sources: I,
    writer: &mut W,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<(S, R)>>,
    S: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let mut buffer = String::new();
    let mut lifted = 0;

    for (i, source) in sources.into_iter().enumerate() {
        let (name, mut source) = source?;

        debug!("lifting PSL records from {name}");

        let mut line_no = 0;

        while read_line(&mut source, &mut buffer)? > 0 {
            line_no += 1;

            if psl::is_header_line(&buffer) {
                if i == 0 {
                    writeln!(writer, "{buffer}")?;
                }

                continue;
            }

            let record = buffer
                .parse::<psl::Record>()
                .map_err(|err| Error::Psl(line_no, err))?;

            if let Some(record) = lifter.lift_psl(record, side)? {
                writeln!(writer, "{record}")?;
                lifted += 1;
            }
        }
    }

    Ok(lifted)
}

/// Lifts tab-separated lines, sorting them before they are written.
fn lift_lines<I, S, R, W>(
    lifter: &mut Lifter,
    columns: Columns,
    sources: I,
    writer: &mut W,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<(S, R)>>,
    S: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let mut buffer = String::new();
    let mut lines = Vec::new();

    for source in sources {
        let (name, mut source) = source?;

        debug!("lifting lines from {name}");

        while read_line(&mut source, &mut buffer)? > 0 {
            if buffer.is_empty() || buffer.starts_with(COMMENT_PREFIX) {
                continue;
            }

            if let Some(line) = lifter.lift_tabbed(&buffer, columns)? {
                lines.push(line);
            }
        }
    }

    if lines.is_empty() {
        return Err(Error::NothingLifted);
    }

    lines.sort_by(|a, b| a.chrom().cmp(b.chrom()).then(a.start().cmp(&b.start())));

    for line in &lines {
        writeln!(writer, "{}", line.line())?;
    }

    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Read;
    use std::rc::Rc;

    use super::*;
    use crate::lift::Policy;
    use crate::lift::Spec;

    /// A source that counts how many sources are open at once.
    struct Counted {
        /// The unread bytes.
        data: &'static [u8],

        /// The number of open sources.
        open: Rc<Cell<usize>>,

        /// The most sources ever open at once.
        peak: Rc<Cell<usize>>,
    }

    impl Counted {
        /// Opens a source over `data`.
        fn new(data: &'static [u8], open: &Rc<Cell<usize>>, peak: &Rc<Cell<usize>>) -> Self {
            open.set(open.get() + 1);
            peak.set(peak.get().max(open.get()));

            Self {
                data,
                open: Rc::clone(open),
                peak: Rc::clone(peak),
            }
        }
    }

    impl Read for Counted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl BufRead for Counted {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            Ok(self.data)
        }

        fn consume(&mut self, amount: usize) {
            self.data = &self.data[amount..];
        }
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.open.set(self.open.get() - 1);
        }
    }

    fn lifter(policy: Policy) -> Lifter {
        let table = [
            Spec::new(100, "ctg1", 50, "chr1", 1000, None),
            Spec::new(500, "ctg2", 50, "chr1", 1000, None),
        ]
        .into_iter()
        .collect();

        Lifter::new(table, policy)
    }

    fn lift(format: Format, side: Side, sources: &[&str]) -> Result<String> {
        let mut output = Vec::new();
        let sources = sources
            .iter()
            .enumerate()
            .map(|(i, source)| (i, source.as_bytes()));

        format.lift_readers(&mut lifter(Policy::Drop), side, sources, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn formats_from_names() {
        assert_eq!(".pslx".parse::<Format>().unwrap(), Format::Psl);
        assert_eq!("NET".parse::<Format>().unwrap(), Format::Net);
        assert_eq!(Format::from_path("/data/ctg.axt"), Some(Format::Axt));
        assert_eq!(Format::from_path("archive.gz"), None);

        let err = "agp".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format: `agp`");
    }

    #[test]
    fn chains_are_separated_by_blank_lines() {
        let output = lift(
            Format::Chain,
            Side::Target,
            &[
                "chain 5 ctg1 50 + 0 10 q 50 + 0 10 1\n10\n\nchain 5 ctg9 50 + 0 10 q 50 + 0 10 2\n10\n",
                "chain 7 ctg2 50 + 0 5 q 50 + 0 5 3\n5\n",
            ],
        )
        .unwrap();

        assert_eq!(
            output,
            "chain 5 chr1 1000 + 100 110 q 50 + 0 10 1\n10\n\nchain 7 chr1 1000 + 500 505 q 50 + 0 5 3\n5\n\n"
        );
    }

    #[test]
    fn nets_on_the_same_chromosome_merge() {
        let output = lift(
            Format::Net,
            Side::Target,
            &[
                "net ctg2 50\n fill 0 10 q + 0 10\n",
                "net ctg1 50\n fill 0 10 q + 20 10\n",
            ],
        )
        .unwrap();

        assert_eq!(
            output,
            "net chr1 1000\n fill 100 10 q + 20 10\n fill 500 10 q + 0 10\n"
        );
    }

    #[test]
    fn nets_merge_in_first_seen_order() {
        let output = lift(
            Format::Net,
            Side::Target,
            &[
                "net ctg1 50\n fill 10 5 q + 0 5\n",
                "net ctg9 50\n fill 0 10 q + 0 10\n",
                "net ctg2 50\n fill 0 5 q + 30 5\n",
                "net ctg1 50\n fill 0 5 q + 40 5\n",
            ],
        )
        .unwrap();

        assert_eq!(
            output,
            "net chr1 1000\n fill 100 5 q + 40 5\n fill 110 5 q + 0 5\n fill 500 5 q + 30 5\n"
        );
    }

    #[test]
    fn sources_are_opened_one_at_a_time() {
        let open = Rc::new(Cell::new(0));
        let peak = Rc::new(Cell::new(0));

        let sources = (0..50).map(|i| Ok((i, Counted::new(b"ctg1\t0\t10\n", &open, &peak))));

        let mut output = Vec::new();
        let lifted = Format::Bed
            .lift_sources(&mut lifter(Policy::Drop), Side::Target, sources, &mut output)
            .unwrap();

        assert_eq!(lifted, 50);
        assert_eq!(open.get(), 0);
        assert_eq!(peak.get(), 1);
    }

    #[test]
    fn sources_failing_to_open_stop_the_lift() {
        let sources = [
            Ok(("first", &b"chain 5 ctg1 50 + 0 10 q 50 + 0 10 1\n10\n"[..])),
            Err(io::Error::new(io::ErrorKind::NotFound, "missing.chain")),
        ];

        let mut output = Vec::new();
        let err = Format::Chain
            .lift_sources(&mut lifter(Policy::Drop), Side::Target, sources, &mut output)
            .unwrap_err();

        assert_eq!(err.to_string(), "i/o error: missing.chain");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "chain 5 chr1 1000 + 100 110 q 50 + 0 10 1\n10\n\n"
        );
    }

    #[test]
    fn files_are_lifted_in_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = std::env::temp_dir().join(format!("chainkit-format-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;

        let paths = (1..=2)
            .map(|i| dir.join(format!("ctg{i}.bed")))
            .collect::<Vec<_>>();
        std::fs::write(&paths[0], "ctg1\t0\t10\ta\n")?;
        std::fs::write(&paths[1], "ctg2\t0\t10\tb\n")?;

        let mut output = Vec::new();
        let lifted =
            Format::Bed.lift_files(&mut lifter(Policy::Error), Side::Target, &paths, &mut output)?;

        assert_eq!(lifted, 2);
        assert_eq!(output, b"chr1\t100\t110\ta\nchr1\t500\t510\tb\n");

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn psl_headers_come_from_the_first_source() {
        let record = "1\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t1\tctg1\t50\t0\t1\t1\t1,\t0,\t0,";
        let first = format!("psLayout version 3\n\n{record}\n");
        let second = format!("psLayout version 3\n{record}\n");

        let output = lift(Format::Psl, Side::Target, &[&first, &second]).unwrap();
        let lifted = "1\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t1\tchr1\t1000\t100\t101\t1\t1,\t0,\t100,";

        assert_eq!(output, format!("psLayout version 3\n\n{lifted}\n{lifted}\n"));
    }

    #[test]
    fn axt_ordinals_continue_across_sources() {
        let record = "0 ctg1 1 2 q 1 2 + 5\nAC\nAC\n";
        let output = lift(Format::Axt, Side::Target, &[record, record]).unwrap();

        assert_eq!(
            output,
            "0 chr1 101 102 q 1 2 + 5\nAC\nAC\n\n1 chr1 101 102 q 1 2 + 5\nAC\nAC\n\n"
        );
    }

    #[test]
    fn gff_lines_skip_comments() {
        let output = lift(
            Format::Gff,
            Side::Target,
            &["##gff-version 3\nctg1\tsrc\tgene\t1\t10\t.\t+\t.\tID=a\n"],
        )
        .unwrap();

        assert_eq!(output, "chr1\tsrc\tgene\t101\t110\t.\t+\t.\tID=a\n");
    }

    #[test]
    fn nothing_lifted_fails_for_lines() {
        let err = lift(Format::Bed, Side::Target, &["ctg9\t0\t10\n"]).unwrap_err();
        assert_eq!(err.to_string(), "no lines lifted");
    }
}

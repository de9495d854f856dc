//! Alignment nets.
//!
//! A net describes, for one target chromosome, a hierarchy of *fills*
//! (aligned regions taken from a chain) and *gaps* (unaligned regions within
//! a fill, which may themselves hold lower-level fills). In the text format
//! the hierarchy is given by indentation:
//!
//! ```text
//! net chr1 1000
//!  fill 10 500 chr2 + 100 480 id 1 score 2000 ali 450
//!   gap 100 20 chr2 + 190 15
//!    fill 105 10 chr3 - 40 10 id 7 score 80 ali 10
//! ```
//!
//! Query coordinates in a net are always on the `+` strand, whatever the
//! query strand letter says.

use std::io::BufRead;
use std::io::{self};
use std::num::ParseIntError;
use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use omics::coordinate::strand;

use crate::reader::read_line;

/// The prefix of a net line.
pub const NET_PREFIX: &str = "net";

/// The prefix of a comment line.
const COMMENT_PREFIX: char = '#';

/// The number of fields in a segment line before any key/value pairs.
const NUM_SEGMENT_FIELDS: usize = 7;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A parse error related to a net.
#[derive(Debug)]
pub enum ParseError {
    /// A `net` line without a name and size.
    InvalidNetLine(String),

    /// A segment line with fewer than the required fields.
    IncorrectNumberOfFields(usize),

    /// A line that starts with neither `fill` nor `gap`.
    InvalidKind(String),

    /// An invalid position or size.
    InvalidNumber(ParseIntError),

    /// An invalid query strand.
    InvalidStrand(strand::Error),

    /// A trailing key without a value.
    DanglingKey(String),

    /// A segment appearing before the first `net` line.
    SegmentOutsideNet,

    /// A fill nested directly in a fill, or a gap not nested in a fill.
    UnexpectedNesting(Kind),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidNetLine(line) => write!(f, "invalid net line: {line}"),
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in segment: expected at least {NUM_SEGMENT_FIELDS} \
                 fields, found {fields} fields"
            ),
            ParseError::InvalidKind(kind) => write!(f, "invalid segment kind: {kind}"),
            ParseError::InvalidNumber(err) => write!(f, "invalid number: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::DanglingKey(key) => write!(f, "key `{key}` has no value"),
            ParseError::SegmentOutsideNet => write!(f, "segment appears before any net line"),
            ParseError::UnexpectedNesting(kind) => {
                write!(f, "a {kind} cannot be nested at this depth")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to reading nets.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parse error on the given line.
    Parse(usize, ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(line_no, err) => write!(f, "parse error: line {line_no}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////////////
// Segments
////////////////////////////////////////////////////////////////////////////////////////

/// The kind of a [`Segment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// An aligned region.
    Fill,

    /// An unaligned region within a fill.
    Gap,
}

impl Kind {
    /// Gets the kind that nests directly inside this kind.
    fn child(&self) -> Kind {
        match self {
            Kind::Fill => Kind::Gap,
            Kind::Gap => Kind::Fill,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Fill => write!(f, "fill"),
            Kind::Gap => write!(f, "gap"),
        }
    }
}

impl FromStr for Kind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fill" => Ok(Kind::Fill),
            "gap" => Ok(Kind::Gap),
            _ => Err(ParseError::InvalidKind(s.to_string())),
        }
    }
}

/// A fill or gap, together with the segments nested inside it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    /// The kind.
    kind: Kind,

    /// The start on the target.
    target_start: Number,

    /// The size on the target.
    target_size: Number,

    /// The query sequence name.
    query_name: String,

    /// The query strand.
    query_strand: Strand,

    /// The start on the query (`+` strand).
    query_start: Number,

    /// The size on the query.
    query_size: Number,

    /// Trailing key/value annotations, in their original order.
    extras: Vec<(String, String)>,

    /// The nested segments.
    children: Vec<Segment>,
}

impl Segment {
    /// Gets the kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Gets the start on the target.
    pub fn target_start(&self) -> Number {
        self.target_start
    }

    /// Gets the size on the target.
    pub fn target_size(&self) -> Number {
        self.target_size
    }

    /// Gets the query sequence name.
    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    /// Gets the query strand.
    pub fn query_strand(&self) -> Strand {
        self.query_strand
    }

    /// Gets the start on the query.
    pub fn query_start(&self) -> Number {
        self.query_start
    }

    /// Gets the size on the query.
    pub fn query_size(&self) -> Number {
        self.query_size
    }

    /// Gets the annotation stored under `key`, if any.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets the nested segments.
    pub fn children(&self) -> &[Segment] {
        &self.children
    }

    /// Moves the target start.
    pub(crate) fn set_target_start(&mut self, start: Number) {
        self.target_start = start;
    }

    /// Moves the query side.
    pub(crate) fn set_query(&mut self, name: &str, strand: Strand, start: Number) {
        self.query_name = name.to_string();
        self.query_strand = strand;
        self.query_start = start;
    }

    /// Gets mutable access to the nested segments.
    pub(crate) fn children_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.children
    }

    /// Writes this segment and its children at `depth`.
    fn write(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        write!(
            f,
            "\n{:depth$}{} {} {} {} {} {} {}",
            "",
            self.kind,
            self.target_start,
            self.target_size,
            self.query_name,
            self.query_strand,
            self.query_start,
            self.query_size
        )?;

        for (key, value) in &self.extras {
            write!(f, " {key} {value}")?;
        }

        for child in &self.children {
            child.write(f, depth + 1)?;
        }

        Ok(())
    }
}

/// Parses a segment line whose indentation has already been removed.
fn parse_segment(line: &str) -> Result<Segment, ParseError> {
    let fields = line.split_whitespace().collect::<Vec<_>>();

    if fields.len() < NUM_SEGMENT_FIELDS {
        return Err(ParseError::IncorrectNumberOfFields(fields.len()));
    }

    let number = |s: &str| s.parse::<Number>().map_err(ParseError::InvalidNumber);

    let mut extras = Vec::new();

    for pair in fields[NUM_SEGMENT_FIELDS..].chunks(2) {
        match pair {
            [key, value] => extras.push((key.to_string(), value.to_string())),
            _ => return Err(ParseError::DanglingKey(pair.concat())),
        }
    }

    Ok(Segment {
        kind: fields[0].parse()?,
        target_start: number(fields[1])?,
        target_size: number(fields[2])?,
        query_name: fields[3].to_string(),
        query_strand: fields[4].parse().map_err(ParseError::InvalidStrand)?,
        query_start: number(fields[5])?,
        query_size: number(fields[6])?,
        extras,
        children: Vec::new(),
    })
}

////////////////////////////////////////////////////////////////////////////////////////
// Net
////////////////////////////////////////////////////////////////////////////////////////

/// A net over a single target chromosome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Net {
    /// The target chromosome name.
    chrom_name: String,

    /// The target chromosome size.
    chrom_size: Number,

    /// The top-level fills.
    fills: Vec<Segment>,
}

impl Net {
    /// Gets the target chromosome name.
    pub fn chrom_name(&self) -> &str {
        &self.chrom_name
    }

    /// Gets the target chromosome size.
    pub fn chrom_size(&self) -> Number {
        self.chrom_size
    }

    /// Gets the top-level fills.
    pub fn fills(&self) -> &[Segment] {
        &self.fills
    }

    /// Renames the target chromosome.
    pub(crate) fn set_chrom(&mut self, name: &str, size: Number) {
        self.chrom_name = name.to_string();
        self.chrom_size = size;
    }

    /// Gets mutable access to the top-level fills.
    pub(crate) fn fills_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.fills
    }

    /// Absorbs the fills of `other`, keeping fills ordered by target start.
    pub(crate) fn merge(&mut self, other: Net) {
        self.fills.extend(other.fills);
        self.fills.sort_by_key(|fill| fill.target_start);
    }
}

impl std::fmt::Display for Net {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{NET_PREFIX} {} {}", self.chrom_name, self.chrom_size)?;

        for fill in &self.fills {
            fill.write(f, 1)?;
        }

        Ok(())
    }
}

/// Attaches every open segment at `depth` or deeper to its parent.
fn close(stack: &mut Vec<(usize, Segment)>, roots: &mut Vec<Segment>, depth: usize) {
    while stack.last().is_some_and(|(open, _)| *open >= depth) {
        if let Some((_, segment)) = stack.pop() {
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(segment),
                None => roots.push(segment),
            }
        }
    }
}

/// Parses the name and size from a `net` line.
fn parse_net_line(line: &str) -> Result<(String, Number), ParseError> {
    let fields = line.split_whitespace().collect::<Vec<_>>();

    match fields.as_slice() {
        [NET_PREFIX, name, size] => {
            let size = size.parse::<Number>().map_err(ParseError::InvalidNumber)?;
            Ok((name.to_string(), size))
        }
        _ => Err(ParseError::InvalidNetLine(line.to_string())),
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Reader
////////////////////////////////////////////////////////////////////////////////////////

/// A net file reader.
#[derive(Clone, Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a net file reader.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns an iterator over the nets in the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::net::Reader;
    ///
    /// let data = b"net chr1 1000\n fill 10 500 chr2 + 100 480 id 1\n  gap 100 20 chr2 + 190 15\n";
    /// let mut reader = Reader::new(&data[..]);
    ///
    /// let nets = reader.nets().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(nets.len(), 1);
    ///
    /// let fill = &nets[0].fills()[0];
    /// assert_eq!(fill.extra("id"), Some("1"));
    /// assert_eq!(fill.children()[0].target_size(), 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn nets(&mut self) -> Nets<'_, T> {
        Nets {
            reader: self,
            buffer: String::new(),
            line_no: 0,
            next_net: None,
        }
    }
}

/// An iterator over the nets in a file.
#[derive(Debug)]
pub struct Nets<'a, T>
where
    T: BufRead,
{
    /// The reader.
    reader: &'a mut Reader<T>,

    /// The line buffer.
    buffer: String,

    /// The number of lines read so far.
    line_no: usize,

    /// The `net` line that ended the previous net, if any.
    next_net: Option<(String, Number)>,
}

/// A significant line within a net file.
enum Content {
    /// A `net` line.
    Net(String, Number),

    /// A fill or gap line, with its indentation.
    Segment(usize, Segment),
}

impl<T> Nets<'_, T>
where
    T: BufRead,
{
    /// Reads up to the next line that is neither blank nor a comment.
    fn next_content(&mut self) -> Result<Option<Content>, Error> {
        loop {
            let read = read_line(&mut self.reader.0, &mut self.buffer).map_err(Error::Io)?;

            if read == 0 {
                return Ok(None);
            }

            self.line_no += 1;

            let line = self.buffer.trim_start_matches(' ');
            let depth = self.buffer.len() - line.len();
            let line_no = self.line_no;

            if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let content = if line.starts_with(NET_PREFIX) {
                let (name, size) = parse_net_line(line).map_err(|e| Error::Parse(line_no, e))?;
                Content::Net(name, size)
            } else {
                let segment = parse_segment(line).map_err(|e| Error::Parse(line_no, e))?;
                Content::Segment(depth, segment)
            };

            return Ok(Some(content));
        }
    }

    /// Reads one complete net.
    fn read_net(&mut self) -> Result<Option<Net>, Error> {
        let (chrom_name, chrom_size) = match self.next_net.take() {
            Some(header) => header,
            None => match self.next_content()? {
                Some(Content::Net(name, size)) => (name, size),
                Some(Content::Segment(..)) => {
                    return Err(Error::Parse(self.line_no, ParseError::SegmentOutsideNet));
                }
                None => return Ok(None),
            },
        };

        let mut stack: Vec<(usize, Segment)> = Vec::new();
        let mut fills = Vec::new();

        while let Some(content) = self.next_content()? {
            let (depth, segment) = match content {
                Content::Net(name, size) => {
                    self.next_net = Some((name, size));
                    break;
                }
                Content::Segment(depth, segment) => (depth, segment),
            };

            close(&mut stack, &mut fills, depth);

            let expected = match stack.last() {
                Some((_, parent)) => parent.kind.child(),
                None => Kind::Fill,
            };

            if segment.kind != expected {
                return Err(Error::Parse(
                    self.line_no,
                    ParseError::UnexpectedNesting(segment.kind),
                ));
            }

            stack.push((depth, segment));
        }

        close(&mut stack, &mut fills, 0);

        Ok(Some(Net {
            chrom_name,
            chrom_size,
            fills,
        }))
    }
}

impl<T> Iterator for Nets<'_, T>
where
    T: BufRead,
{
    type Item = Result<Net, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_net().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETS: &str = "net chr1 1000
 fill 10 500 chr2 + 100 480 id 1 score 2000 ali 450
  gap 100 20 chr2 + 190 15
   fill 105 10 chr3 - 40 10 id 7 score 80 ali 10
  gap 300 5 chr2 + 390 0
 fill 600 50 chr4 - 0 50 id 2
net chr5 20
 fill 0 20 chr2 + 0 20";

    fn nets(text: &str) -> Result<Vec<Net>, Error> {
        Reader::new(text.as_bytes()).nets().collect()
    }

    #[test]
    fn nets_round_trip() {
        let nets = nets(NETS).unwrap();
        assert_eq!(nets.len(), 2);

        let text = nets
            .iter()
            .map(|net| net.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(text, NETS);
    }

    #[test]
    fn tree_follows_indentation() {
        let nets = nets(NETS).unwrap();
        let fills = nets[0].fills();

        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].children().len(), 2);
        assert_eq!(fills[0].children()[0].children()[0].query_name(), "chr3");
        assert_eq!(fills[1].query_strand(), Strand::Negative);
        assert!(fills[1].children().is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let nets = nets("# header\n\nnet chr1 10\n\n fill 0 10 chr2 + 0 10\n").unwrap();
        assert_eq!(nets[0].fills().len(), 1);
    }

    #[test]
    fn fills_cannot_nest_in_fills() {
        let err = nets("net chr1 10\n fill 0 10 chr2 + 0 10\n  fill 0 5 chr2 + 0 5").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: line 3: a fill cannot be nested at this depth"
        );
    }

    #[test]
    fn segments_need_a_net() {
        let err = nets(" fill 0 10 chr2 + 0 10").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: line 1: segment appears before any net line"
        );
    }

    #[test]
    fn dangling_keys_fail() {
        let err = nets("net chr1 10\n fill 0 10 chr2 + 0 10 id").unwrap_err();
        assert_eq!(err.to_string(), "parse error: line 2: key `id` has no value");
    }

    #[test]
    fn merge_orders_fills() {
        let mut nets = nets("net a 100\n fill 50 10 q + 0 10\nnet a 100\n fill 5 10 q + 20 10").unwrap();
        let second = nets.pop().unwrap();
        let mut first = nets.pop().unwrap();

        first.merge(second);
        let starts = first
            .fills()
            .iter()
            .map(|fill| fill.target_start())
            .collect::<Vec<_>>();
        assert_eq!(starts, vec![5, 50]);
    }
}

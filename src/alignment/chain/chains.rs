//! An iterator over a set of [chains](crate::alignment::Chain).

use std::io::BufRead;

use crate::Line;
use crate::Reader;
use crate::alignment::Chain;
use crate::alignment::chain::Builder;
use crate::alignment::chain::builder;
use crate::alignment::chain::data;
use crate::alignment::chain::header;
use crate::alignment::chain::id;
use crate::reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of a chain.
#[derive(Debug)]
pub enum ParseError {
    /// The file abruptly ended before closing a chain.
    AbruptEndInChain,

    /// There was a blank line within a chain.
    BlankLineInChain(usize),

    /// There was a comment line within a chain.
    CommentInChain(usize),

    /// Alignment data was found in between chains.
    DataBetweenChains(data::Record),

    /// There was a header record within a chain.
    HeaderInChain(header::Record),

    /// There was an issue reading from the underlying reader.
    Reader(reader::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::AbruptEndInChain => {
                write!(f, "the file abruptly ended in the middle of a chain")
            }
            ParseError::BlankLineInChain(line_no) => {
                write!(f, "found blank line in chain: line {line_no}")
            }
            ParseError::CommentInChain(line_no) => {
                write!(f, "found comment in chain: line {line_no}")
            }
            ParseError::DataBetweenChains(record) => {
                write!(f, "found alignment data between chains: record: {record}")
            }
            ParseError::HeaderInChain(record) => {
                write!(f, "found header in chain: record: {record}")
            }
            ParseError::Reader(err) => write!(f, "reader error: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to [`Chains`].
#[derive(Debug)]
pub enum Error {
    /// A builder error.
    Builder(usize, builder::Error),

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Builder(line_no, err) => write!(f, "builder error: line {line_no}: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Chains
////////////////////////////////////////////////////////////////////////////////////////

/// The state of the iterator.
#[derive(Debug)]
enum State {
    /// The reader is in-between chains.
    InBetweenChains,

    /// The reader is in the middle of a chain.
    ReadingChain,
}

/// An iterator struct the traverses the chains while keeping track of the
/// current state of the reader.
///
/// Headers without an id are assigned one from an [`id::Allocator`] owned by
/// the iterator, so ids are unique within a single pass over a file.
#[derive(Debug)]
pub struct Chains<'a, T>
where
    T: BufRead,
{
    /// The inner reader.
    reader: &'a mut Reader<T>,

    /// The state of the iterator.
    state: State,

    /// The line number.
    line_no: usize,

    /// The allocator for missing ids.
    ids: id::Allocator,
}

impl<'a, T> Chains<'a, T>
where
    T: BufRead,
{
    /// Creates a new [`Chains`].
    pub(crate) fn new(reader: &'a mut Reader<T>) -> Self {
        Self {
            reader,
            state: State::InBetweenChains,
            line_no: 0usize,
            ids: id::Allocator::default(),
        }
    }

    /// Fills in a missing id or records a present one.
    fn identify(&mut self, record: header::Record) -> header::Record {
        match record.id() {
            Some(id) => {
                self.ids.observe(id);
                record
            }
            None => record.with_id(self.ids.next()),
        }
    }
}

impl<T> Iterator for Chains<'_, T>
where
    T: BufRead,
{
    type Item = Result<Chain>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut builder: Option<Builder> = None;
        let mut buffer = String::new();

        loop {
            // (1) Reads the current line and returns an error if a parsing
            // error occurs within the reader.
            let line = match self.reader.next_line(&mut buffer) {
                Ok(l) => l,
                Err(err) => return Some(Err(Error::Parse(ParseError::Reader(err)))),
            };

            self.line_no += 1;

            // (2) Checks to see if the line read returned a result. If it did
            // not, we either exit gracefully (between chains) or error out
            // (in the middle of a chain).
            let line = match line {
                Some(l) => l,
                None => match self.state {
                    State::InBetweenChains => return None,
                    State::ReadingChain => {
                        return Some(Err(Error::Parse(ParseError::AbruptEndInChain)));
                    }
                },
            };

            // (3) Gets the current state and errors out if we encounter a parse error.
            self.state = match get_state(&self.state, &line, self.line_no) {
                Ok(s) => s,
                Err(err) => return Some(Err(err)),
            };

            // (4) Feeds the line to the builder for the current chain, starting
            // a new builder when a header opens a chain.
            builder = match (builder, line) {
                (Some(inner), Line::AlignmentData(record)) => Some(inner.push_data(record)),
                (None, Line::Header(record)) => {
                    let record = self.identify(record);
                    match Builder::default().header(record) {
                        Ok(inner) => Some(inner),
                        Err(err) => return Some(Err(Error::Builder(self.line_no, err))),
                    }
                }
                // `get_state()` rejects every other pairing of an open builder
                // with a line before this point.
                (builder, _) => builder,
            };

            // (5) Performs the associated action given our current state.
            match self.state {
                State::InBetweenChains => {
                    if let Some(builder) = builder {
                        return match builder.try_build() {
                            Ok(chain) => Some(Ok(chain)),
                            Err(err) => Some(Err(Error::Builder(self.line_no, err))),
                        };
                    }
                }
                State::ReadingChain => {}
            }
        }
    }
}

/// Gets the current state given the previous state and the line that was just
/// read in from the [`Reader`].
fn get_state(last: &State, line: &Line, line_no: usize) -> Result<State> {
    match (last, line) {
        (State::InBetweenChains, Line::Empty | Line::Comment(_)) => {
            // Blank lines and comments between chains are skipped.
            Ok(State::InBetweenChains)
        }
        (State::InBetweenChains, Line::Header(_)) => Ok(State::ReadingChain),
        (State::InBetweenChains, Line::AlignmentData(record)) => Err(Error::Parse(
            ParseError::DataBetweenChains(record.clone()),
        )),
        (State::ReadingChain, Line::Empty) => {
            Err(Error::Parse(ParseError::BlankLineInChain(line_no)))
        }
        (State::ReadingChain, Line::Comment(_)) => {
            Err(Error::Parse(ParseError::CommentInChain(line_no)))
        }
        (State::ReadingChain, Line::Header(record)) => {
            Err(Error::Parse(ParseError::HeaderInChain(record.clone())))
        }
        (State::ReadingChain, Line::AlignmentData(record)) => match record.is_terminating() {
            true => Ok(State::InBetweenChains),
            false => Ok(State::ReadingChain),
        },
    }
}

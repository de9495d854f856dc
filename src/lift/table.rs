//! Lift tables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io;
use std::io::BufRead;

use crate::lift::Spec;
use crate::lift::spec;
use crate::reader::read_line;

/// An error related to a [`Table`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// An invalid entry on the given line.
    Parse(usize, spec::ParseError),

    /// An old sequence name that appears more than once.
    Duplicate(String),

    /// A table without entries.
    Empty,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(line_no, err) => write!(f, "parse error: line {line_no}: {err}"),
            Error::Duplicate(name) => {
                write!(f, "`{name}` appears more than once in the lift table")
            }
            Error::Empty => write!(f, "the lift table is empty"),
        }
    }
}

impl std::error::Error for Error {}

/// A lookup from old sequence names to their [`Spec`]s.
#[derive(Clone, Debug, Default)]
pub struct Table(HashMap<String, Spec>);

impl Table {
    /// Reads a lift table.
    ///
    /// Each non-blank line holds `offset oldName oldSize newName newSize`
    /// and an optional strand. A leading `chrom/` part of an old name is
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::lift::Table;
    ///
    /// let data = b"0\tchr1/ctg1\t1000\tchr1\t5000\n1000\tchr1/ctg2\t4000\tchr1\t5000\t-\n";
    /// let table = Table::read(&data[..])?;
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get("ctg2").unwrap().offset(), 1000);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read<R>(mut reader: R) -> Result<Self, Error>
    where
        R: BufRead,
    {
        let mut specs = HashMap::new();
        let mut buffer = String::new();
        let mut line_no = 0;

        while read_line(&mut reader, &mut buffer).map_err(Error::Io)? > 0 {
            line_no += 1;

            if buffer.trim().is_empty() {
                continue;
            }

            let spec = buffer
                .parse::<Spec>()
                .map_err(|e| Error::Parse(line_no, e))?
                .strip_chrom_prefix();

            match specs.entry(spec.old_name().to_string()) {
                Entry::Occupied(entry) => return Err(Error::Duplicate(entry.key().clone())),
                Entry::Vacant(entry) => {
                    entry.insert(spec);
                }
            }
        }

        if specs.is_empty() {
            return Err(Error::Empty);
        }

        Ok(Self(specs))
    }

    /// Gets the spec for an old sequence name.
    pub fn get(&self, old_name: &str) -> Option<&Spec> {
        self.0.get(old_name)
    }

    /// Gets the number of specs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table holds no specs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Spec> for Table {
    fn from_iter<I: IntoIterator<Item = Spec>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|spec| (spec.old_name().to_string(), spec))
                .collect(),
        )
    }
}

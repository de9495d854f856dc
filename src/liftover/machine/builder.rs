//! A builder for a [`Machine`].

use std::collections::HashMap;
use std::io::BufRead;

use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::alignment::chain::chains;
use crate::liftover::Machine;
use crate::reader;

/// The inner value of the liftover lookup data structure.
type Iv = lapper::Interval<Number, usize>;

/// An error related to building a [`Machine`].
#[derive(Debug)]
pub enum Error {
    /// An error reading chains.
    InvalidChains(chains::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidChains(err) => write!(f, "invalid chain: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Machine`].
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    /// Builds a [`Machine`] from every chain in `reader`.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chain 0 seq0 4 + 0 4 seq0 5 - 0 5 1\n3\t0\t1\n1";
    /// let reader = chainkit::Reader::new(&data[..]);
    ///
    /// let machine = chainkit::liftover::machine::Builder.try_build_from(reader)?;
    /// assert_eq!(machine.chains().len(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<T>(&self, mut reader: reader::Reader<T>) -> Result<Machine>
    where
        T: BufRead,
    {
        let mut chains = Vec::new();
        let mut hm = HashMap::<String, Vec<Iv>>::default();

        for result in reader.chains() {
            let chain = result.map_err(Error::InvalidChains)?;
            let target = chain.target_sequence();

            hm.entry(target.chromosome_name().to_string())
                .or_default()
                .push(lapper::Interval {
                    start: target.alignment_start(),
                    stop: target.alignment_end(),
                    val: chains.len(),
                });

            chains.push(chain);
        }

        let inner = hm
            .into_iter()
            .map(|(k, v)| (k, lapper::Lapper::new(v)))
            .collect();

        Ok(Machine { chains, inner })
    }
}

//! `chainkit` is a crate for working with genomic chain alignments.
//!
//! The crate provides four main points of entry:
//!
//! - Reading, writing and transforming chains ([`alignment::Chain`]).
//! - Projecting chains onto sequences to produce AXT alignments
//!   ([`axt::project()`]).
//! - Lifting records from contig coordinates to chromosome coordinates
//!   through a lift table ([`lift::Lifter`]).
//! - Lifting ranges from one assembly to another through a set of chains
//!   ([`liftover::Machine`]).
//!
//! ## Reading and transforming chains
//!
//! Chains are read with the [`Reader`] facility via
//! [`Reader::chains()`](crate::Reader::chains()). Each [`alignment::Chain`]
//! holds a [header](crate::alignment::chain::header::Record) and a non-empty
//! list of gapless [blocks](crate::alignment::chain::Block), and is written
//! back out in the chain text format through its `Display` implementation.
//! A chain can be restricted to a range on either of its sequences
//! ([`alignment::chain::subset`]) or have its target and query exchanged
//! ([`alignment::chain::swap`]). Neither operation modifies its input.
//!
//! ```
//! use chainkit::alignment::chain::subset;
//! use chainkit::alignment::chain::swap;
//!
//! let data = b"chain 100 seq0 10 + 0 10 seq1 12 - 2 12 1\n4\t1\t1\n5";
//! let mut reader = chainkit::Reader::new(&data[..]);
//!
//! for result in reader.chains() {
//!     let chain = result?;
//!
//!     let narrowed = subset::on_target(&chain, 2, 8).into_owned().unwrap();
//!     assert_eq!(narrowed.target_sequence().alignment_start(), 2);
//!
//!     let swapped = swap::swap(chain);
//!     assert_eq!(swapped.target_sequence().chromosome_name(), "seq1");
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lifting through a lift table
//!
//! A [`lift::Table`] describes where each contig lies within its chromosome.
//! A [`lift::Lifter`] applies it to chains, nets, AXT records, PSL records,
//! and BED or GFF lines, on either the target or the query side.
//!
//! ```
//! use chainkit::lift::Lifter;
//! use chainkit::lift::Policy;
//! use chainkit::lift::Side;
//! use chainkit::lift::Table;
//!
//! let table = Table::read(&b"20000\tchr1/ctg1\t1000\tchr1\t50000\n"[..])?;
//! let mut lifter = Lifter::new(table, Policy::Warn);
//!
//! let data = b"chain 100 ctg1 1000 + 10 200 q 500 + 0 190 1\n190";
//! let mut reader = chainkit::Reader::new(&data[..]);
//!
//! for result in reader.chains() {
//!     if let Some(chain) = lifter.lift_chain(result?, Side::Target)? {
//!         assert_eq!(chain.target_sequence().alignment_start(), 20010);
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod axt;
pub mod coordinate;
pub mod io;
pub mod lift;
pub mod liftover;
pub mod line;
pub mod net;
pub mod psl;
pub mod reader;

pub use line::Line;

pub use self::reader::Reader;

//! Windows onto a sequence, oriented to one strand.

use std::borrow::Cow;

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

/// A slice of sequence together with the coordinate of its first base.
///
/// The bases are stored in the orientation of the strand the window was
/// built for, so the coordinates used to index into it are coordinates on
/// that strand. Forward-strand windows borrow their bases; only reverse
/// complemented windows own a copy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Window<'a> {
    /// The bases.
    sequence: Cow<'a, [u8]>,

    /// The coordinate of the first base.
    offset: Number,
}

impl<'a> Window<'a> {
    /// Creates a window over bases that are already oriented.
    pub fn new(sequence: impl Into<Cow<'a, [u8]>>, offset: Number) -> Self {
        Self {
            sequence: sequence.into(),
            offset,
        }
    }

    /// Creates a window from forward-strand bases.
    ///
    /// `forward` holds the `+` strand bases starting at `forward_start` on a
    /// sequence of `size` bases. For the `-` strand the bases are reverse
    /// complemented and the offset is moved onto that strand. Only the bases
    /// in `forward` are touched, so callers should pass the span they need
    /// rather than a whole chromosome.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::axt::Window;
    /// use omics::coordinate::Strand;
    ///
    /// // `ACGTT` occupies [2, 7) of a 10 base sequence.
    /// let window = Window::oriented(b"ACGTT", 2, Strand::Negative, 10);
    ///
    /// assert_eq!(window.offset(), 3);
    /// assert_eq!(window.get(3, 8), Some(&b"AACGT"[..]));
    /// ```
    pub fn oriented(forward: &'a [u8], forward_start: Number, strand: Strand, size: Number) -> Self {
        match strand {
            Strand::Positive => Self::new(forward, forward_start),
            Strand::Negative => {
                let forward_end = forward_start + forward.len() as Number;
                Self::new(
                    reverse_complement(forward),
                    size.saturating_sub(forward_end),
                )
            }
        }
    }

    /// Gets the coordinate of the first base.
    pub fn offset(&self) -> Number {
        self.offset
    }

    /// Gets the bases in the window.
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Gets the bases in `[start, end)`, if the window covers that range.
    pub fn get(&self, start: Number, end: Number) -> Option<&[u8]> {
        let from = usize::try_from(start.checked_sub(self.offset)?).ok()?;
        let to = usize::try_from(end.checked_sub(self.offset)?).ok()?;
        self.sequence.get(from..to)
    }
}

/// Reverse complements a nucleotide sequence, preserving case.
///
/// Symbols other than `ACGTN` (in either case) are passed through.
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev().map(|&base| complement(base)).collect()
}

/// Complements a single nucleotide.
fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        other => other,
    }
}

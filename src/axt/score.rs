//! Scoring of gapped alignments.

use crate::axt::GAP;

/// The default substitution matrix, indexed by `A`, `C`, `G`, `T`.
const BLASTZ_MATRIX: [[i64; 4]; 4] = [
    [91, -114, -31, -123],
    [-114, 100, -125, -31],
    [-31, -125, 100, -114],
    [-123, -31, -114, 91],
];

/// The default cost of opening a gap.
const BLASTZ_GAP_OPEN: i64 = 400;

/// The default cost of extending a gap by one symbol.
const BLASTZ_GAP_EXTEND: i64 = 30;

/// A substitution matrix with affine gap costs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scheme {
    /// The substitution scores.
    matrix: [[i64; 4]; 4],

    /// The cost of the first symbol of a gap.
    gap_open: i64,

    /// The cost of every following symbol of a gap.
    gap_extend: i64,
}

impl Scheme {
    /// Creates a new scoring scheme.
    pub fn new(matrix: [[i64; 4]; 4], gap_open: i64, gap_extend: i64) -> Self {
        Self {
            matrix,
            gap_open,
            gap_extend,
        }
    }

    /// Scores two aligned symbol strings of equal length.
    ///
    /// Substitutions are looked up case-insensitively; pairs involving any
    /// symbol other than a nucleotide score zero. A run of columns containing
    /// a gap on either side costs `gap_open` for the first column and
    /// `gap_extend` for each further column.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainkit::axt::score::Scheme;
    ///
    /// let scheme = Scheme::default();
    /// assert_eq!(scheme.score(b"ACGT", b"acgt"), 91 + 100 + 100 + 91);
    /// assert_eq!(scheme.score(b"AAA", b"A--"), 91 - 400 - 30);
    /// ```
    pub fn score(&self, target: &[u8], query: &[u8]) -> i64 {
        let mut score = 0;
        let mut in_gap = false;

        for (&t, &q) in target.iter().zip(query) {
            if t == GAP || q == GAP {
                score -= if in_gap { self.gap_extend } else { self.gap_open };
                in_gap = true;
                continue;
            }

            in_gap = false;

            if let (Some(t), Some(q)) = (index(t), index(q)) {
                score += self.matrix[q][t];
            }
        }

        score
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self::new(BLASTZ_MATRIX, BLASTZ_GAP_OPEN, BLASTZ_GAP_EXTEND)
    }
}

/// Gets the matrix index of a nucleotide.
fn index(symbol: u8) -> Option<usize> {
    match symbol.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

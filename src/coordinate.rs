//! Strand arithmetic on half-open coordinate ranges.

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

/// Reflects the half-open range `[start, end)` onto the opposite strand of a
/// sequence with `size` bases.
///
/// The reflection is its own inverse and is defined for every input: values
/// that would leave the representable range wrap rather than panic.
///
/// # Examples
///
/// ```
/// use chainkit::coordinate::flip_range;
///
/// assert_eq!(flip_range(10, 20, 100), (80, 90));
/// assert_eq!(flip_range(80, 90, 100), (10, 20));
/// ```
pub fn flip_range(start: i64, end: i64, size: i64) -> (i64, i64) {
    (size.wrapping_sub(end), size.wrapping_sub(start))
}

/// Reflects a range that is known to lie within `[0, size]`.
pub(crate) fn reflect(start: Number, end: Number, size: Number) -> (Number, Number) {
    (size.saturating_sub(end), size.saturating_sub(start))
}

/// Returns the opposite strand.
pub(crate) fn opposite(strand: Strand) -> Strand {
    match strand {
        Strand::Positive => Strand::Negative,
        Strand::Negative => Strand::Positive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_an_involution() {
        for (start, end, size) in [(0, 0, 0), (0, 5, 5), (3, 7, 10), (-4, 2, 9), (i64::MIN, 0, 3)] {
            let (s, e) = flip_range(start, end, size);
            assert_eq!(flip_range(s, e, size), (start, end));
        }
    }

    #[test]
    fn reflect_matches_flip_within_bounds() {
        assert_eq!(reflect(0, 3, 10), (7, 10));
        assert_eq!(flip_range(0, 3, 10), (7, 10));
    }

    #[test]
    fn opposite_strand() {
        assert_eq!(opposite(Strand::Positive), Strand::Negative);
        assert_eq!(opposite(Strand::Negative), Strand::Positive);
    }
}

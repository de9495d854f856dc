//! Allocation of chain ids.

/// The first id handed out by a fresh [`Allocator`].
const FIRST_ID: usize = 1;

/// Hands out ids to chains whose header records do not carry one.
///
/// An allocator is scoped to whatever owns it (typically a single file being
/// read). Ids that are seen on headers can be reported through
/// [`Allocator::observe()`] so that later allocations never reuse them.
///
/// # Examples
///
/// ```
/// use chainkit::alignment::chain::id::Allocator;
///
/// let mut ids = Allocator::default();
/// assert_eq!(ids.next(), 1);
///
/// ids.observe(10);
/// assert_eq!(ids.next(), 11);
/// assert_eq!(ids.next(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct Allocator {
    /// The next id to hand out.
    next: usize,
}

impl Allocator {
    /// Creates an allocator whose first id is `first`.
    pub fn starting_at(first: usize) -> Self {
        Self { next: first }
    }

    /// Allocates the next id.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Records that `id` is in use.
    pub fn observe(&mut self, id: usize) {
        self.next = self.next.max(id.saturating_add(1));
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::starting_at(FIRST_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut ids = Allocator::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.next(), 3);
    }

    #[test]
    fn observing_a_lower_id_does_not_rewind() {
        let mut ids = Allocator::starting_at(5);
        ids.observe(2);
        assert_eq!(ids.next(), 5);
    }
}

//! Maps a global curriculum cursor onto a tier and a lesson inside it.
//!
//! Tiers are concatenated end-to-end in catalog order. Each tier owns the
//! half-open range `[offset, offset + len)`, so a cursor sitting exactly on a
//! boundary belongs to the first lesson of the next tier.

/// Where a cursor points inside the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub tier: usize,
    pub index: usize,
}

/// Result of resolving a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    At(Position),
    /// The cursor is past the last lesson of the last tier.
    Completed,
}

impl Resolution {
    #[must_use]
    pub fn position(self) -> Option<Position> {
        match self {
            Resolution::At(position) => Some(position),
            Resolution::Completed => None,
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Resolution::Completed)
    }
}

/// Resolve `cursor` against ordered tier lengths.
///
/// Empty tiers are skipped. Returns [`Resolution::Completed`] when the cursor is
/// at or beyond the sum of all lengths, including when that sum is zero.
#[must_use]
pub fn resolve(cursor: u32, tier_lengths: &[usize]) -> Resolution {
    let Ok(mut remaining) = usize::try_from(cursor) else {
        return Resolution::Completed;
    };
    for (tier, &len) in tier_lengths.iter().enumerate() {
        if remaining < len {
            return Resolution::At(Position {
                tier,
                index: remaining,
            });
        }
        remaining -= len;
    }
    Resolution::Completed
}

/// Offset of `tier` inside the concatenation, or `None` if the tier does not exist.
#[must_use]
pub fn tier_offset(tier: usize, tier_lengths: &[usize]) -> Option<usize> {
    if tier >= tier_lengths.len() {
        return None;
    }
    Some(tier_lengths[..tier].iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_cursor_belongs_to_next_tier() {
        let lengths = [2, 3];
        assert_eq!(
            resolve(2, &lengths),
            Resolution::At(Position { tier: 1, index: 0 })
        );
        assert_eq!(resolve(5, &lengths), Resolution::Completed);
    }

    #[test]
    fn first_and_last_lessons_resolve() {
        let lengths = [2, 3];
        assert_eq!(
            resolve(0, &lengths),
            Resolution::At(Position { tier: 0, index: 0 })
        );
        assert_eq!(
            resolve(4, &lengths),
            Resolution::At(Position { tier: 1, index: 2 })
        );
    }

    #[test]
    fn empty_tiers_are_skipped() {
        let lengths = [0, 2, 0, 1];
        assert_eq!(
            resolve(0, &lengths),
            Resolution::At(Position { tier: 1, index: 0 })
        );
        assert_eq!(
            resolve(2, &lengths),
            Resolution::At(Position { tier: 3, index: 0 })
        );
    }

    #[test]
    fn empty_catalog_is_always_completed() {
        assert!(resolve(0, &[]).is_completed());
        assert!(resolve(0, &[0, 0]).is_completed());
    }

    #[test]
    fn offsets_accumulate_previous_tiers() {
        let lengths = [2, 3, 4];
        assert_eq!(tier_offset(0, &lengths), Some(0));
        assert_eq!(tier_offset(2, &lengths), Some(5));
        assert_eq!(tier_offset(3, &lengths), None);
    }
}

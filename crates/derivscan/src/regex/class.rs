use std::cmp::Ordering;

/// A set of characters given as inclusive ranges, optionally complemented.
///
/// Ranges are kept sorted and merged, so two classes describing the same set
/// of ranges compare equal regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharClass {
    ranges: Box<[(char, char)]>,
    negated: bool,
}

impl CharClass {
    /// Builds a class from `ranges`. Ranges with `lo > hi` are empty and
    /// dropped.
    pub fn new(ranges: impl IntoIterator<Item = (char, char)>, negated: bool) -> Self {
        let mut ranges: Vec<_> = ranges.into_iter().filter(|(lo, hi)| lo <= hi).collect();
        ranges.sort_unstable();
        let mut merged: Vec<(char, char)> = Vec::with_capacity(ranges.len());
        for (lo, hi) in ranges {
            if let Some(last) = merged.last_mut() {
                if lo <= last.1 || successor(last.1) == Some(lo) {
                    last.1 = last.1.max(hi);
                    continue;
                }
            }
            merged.push((lo, hi));
        }
        Self {
            ranges: merged.into_boxed_slice(),
            negated,
        }
    }

    /// The class matching every character.
    pub fn any() -> Self {
        Self::new([], true)
    }

    /// Whether `ch` is a member.
    pub fn contains(&self, ch: char) -> bool {
        let inside = self
            .ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < ch {
                    Ordering::Less
                } else if lo > ch {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok();
        inside != self.negated
    }

    /// Whether no character is a member.
    pub fn matches_nothing(&self) -> bool {
        if self.negated {
            *self.ranges == [('\0', char::MAX)]
        } else {
            self.ranges.is_empty()
        }
    }

    /// The sorted, merged ranges (before negation).
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    /// Whether membership is complemented.
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

/// The character after `ch`, stepping over the surrogate gap.
fn successor(ch: char) -> Option<char> {
    match ch {
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(u32::from(ch) + 1),
    }
}

/// Configuration options for a [`Matcher`](crate::Matcher).
///
/// # Default
///
/// The hopeless cache is enabled and `search` only reports non-empty matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Whether `search` remembers `(offset, state)` pairs proven unable to
    /// reach a match, so that later searches over the same input skip them.
    ///
    /// Turning this off never changes results, only running time: repeated
    /// tokenization of one input degrades from amortized linear to quadratic.
    ///
    /// # Default
    ///
    /// `true`
    pub cache_hopeless: bool,

    /// Whether `search` may report a zero-length match.
    ///
    /// When `false`, a pattern that matches the empty string is still
    /// searched for, but only a match that consumes at least one character is
    /// reported. This keeps tokenizing loops (`search`, `accept`, repeat)
    /// from stalling on an empty token.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_empty_match: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            cache_hopeless: true,
            allow_empty_match: false,
        }
    }
}

//! Matching and searching with derivatives.
//!
//! A [`Matcher`] owns the interner its pattern lives in and drives it over
//! text one character at a time: the state after reading `s` is the
//! derivative of the pattern by `s`, and the text matches when that state is
//! nullable. Derivatives are memoized in the interner, so the matcher gets
//! faster on inputs resembling ones it has seen.
//!
//! Search
//! - [`Matcher::search`] finds the leftmost, longest match in a [`Scanner`].
//!   It pushes a start mark, derives forward, and replaces an end mark each
//!   time the state becomes nullable. When the state dies (or input ends) it
//!   rolls back to the end mark, or, with no candidate, aborts the start mark
//!   and retries one character later.
//! - States seen after the last nullable point of a failed extension are
//!   provably dead at their offsets. They are kept in a hopeless cache keyed
//!   by `(offset, state)` across calls, so later attempts stop as soon as
//!   they land on one. This keeps repeated searches over the same text from
//!   going quadratic. Offsets behind the scanner's position are forgotten at
//!   the start of each search.
//!
//! Captures
//! - The derivative pass only decides whether and where a match exists.
//!   Captures are recovered afterwards by walking the pattern over the
//!   matched text; see [`Captures`]. The cuts the walk needs come from
//!   sweeping the text backwards through reversed expressions, which keeps
//!   the walk linear in the length of the match.
//!
//! Example
//! ```
//! use derivscan::{Matcher, Scanner};
//!
//! let mut m = Matcher::from_pattern("(ab)*c").unwrap();
//! let mut s = Scanner::from_text("xyz ababcc");
//! m.search(&mut s).unwrap();
//! assert_eq!(s.token(), "ababc");
//! s.accept();
//! assert_eq!(s.peek(), Some('c'));
//! ```

mod captures;
mod hopeless;

use captures::reconstruct;
pub use captures::{Capture, Captures};
use hopeless::HopelessCache;

use crate::{
    error::{FailedMatch, SyntaxError},
    options::MatcherOptions,
    parser,
    regex::{Interner, NodeId},
    scanner::Scanner,
};

/// Matches one pattern against strings and scanners.
#[derive(Debug)]
pub struct Matcher {
    interner: Interner,
    root: NodeId,
    options: MatcherOptions,
    hopeless: HopelessCache,
}

impl Matcher {
    /// A matcher for `root`, which must come from `interner`.
    pub fn new(interner: Interner, root: NodeId) -> Self {
        Self::with_options(interner, root, MatcherOptions::default())
    }

    /// A matcher for `root` configured by `options`.
    pub fn with_options(interner: Interner, root: NodeId, options: MatcherOptions) -> Self {
        Self {
            interner,
            root,
            options,
            hopeless: HopelessCache::default(),
        }
    }

    /// A matcher for pattern text in the syntax accepted by
    /// [`parse`](crate::parse).
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] if the pattern is malformed.
    pub fn from_pattern(pattern: &str) -> Result<Self, SyntaxError> {
        let mut interner = Interner::new();
        let root = parser::parse(&mut interner, pattern)?;
        Ok(Self::new(interner, root))
    }

    /// The pattern being matched.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The interner holding the pattern and every derivative computed so far.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// The options this matcher was built with.
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Number of states currently known to be hopeless.
    pub fn hopeless_len(&self) -> usize {
        self.hopeless.len()
    }

    /// Forgets every hopeless state.
    pub fn clear_hopeless(&mut self) {
        self.hopeless.clear();
    }

    /// Matches all of `text`.
    ///
    /// # Errors
    ///
    /// [`FailedMatch`] if the pattern does not match the whole text.
    pub fn match_str(&mut self, text: &str) -> Result<Captures, FailedMatch> {
        let mut state = self.root;
        for ch in text.chars() {
            state = self.interner.derivative(state, ch);
            if self.interner.is_void(state) {
                return Err(FailedMatch);
            }
        }
        if !self.interner.nullable(state) {
            return Err(FailedMatch);
        }
        Ok(self.captures(text.chars()))
    }

    /// Matches everything left in `scanner`, consuming it on success.
    ///
    /// # Errors
    ///
    /// [`FailedMatch`] if the pattern does not match the rest of the input.
    /// The scanner's position is then left where it was.
    pub fn match_scanner(&mut self, scanner: &mut Scanner<'_>) -> Result<Captures, FailedMatch> {
        scanner.mark();
        let mut state = self.root;
        while let Ok(ch) = scanner.advance() {
            state = self.interner.derivative(state, ch);
            if self.interner.is_void(state) {
                scanner.abort();
                return Err(FailedMatch);
            }
        }
        if !self.interner.nullable(state) {
            scanner.abort();
            return Err(FailedMatch);
        }
        let captures = if self.interner.has_captures(self.root) {
            self.captures(scanner.token().chars())
        } else {
            Captures::default()
        };
        scanner.accept();
        Ok(captures)
    }

    /// Finds the leftmost, longest match at or after the scanner's position.
    ///
    /// On success the scanner is positioned just after the match, with one
    /// extra mark at its start: [`Scanner::token`] returns the matched text,
    /// and the caller must [`accept`](Scanner::accept) or
    /// [`abort`](Scanner::abort) it. Empty matches are skipped unless
    /// [`MatcherOptions::allow_empty_match`] is set.
    ///
    /// # Errors
    ///
    /// [`FailedMatch`] if no match exists. The scanner is then at end of
    /// input with its mark stack as it was before the call.
    pub fn search(&mut self, scanner: &mut Scanner<'_>) -> Result<Captures, FailedMatch> {
        self.hopeless.sync(scanner.input_generation(), scanner.offset());
        loop {
            let start = scanner.offset();
            scanner.mark();
            if self.extend(scanner, start) {
                // Back to the end mark, leaving the start mark for the caller.
                scanner.abort();
                log::debug!("search: match at {start}..{}", scanner.offset());
                let captures = if self.interner.has_captures(self.root) {
                    self.captures(scanner.token().chars())
                } else {
                    Captures::default()
                };
                return Ok(captures);
            }
            scanner.abort();
            if scanner.advance().is_err() {
                log::debug!("search: no match before end of input");
                return Err(FailedMatch);
            }
            log::debug!("search: no match at {start}, retrying");
        }
    }

    /// One pass of [`search`](Self::search) starting at `start`. Returns
    /// whether a candidate was found, in which case an end mark sits on top
    /// of the start mark.
    fn extend(&mut self, scanner: &mut Scanner<'_>, start: usize) -> bool {
        let cache = self.options.cache_hopeless;
        let mut state = self.root;
        let mut found = false;
        // States visited since the last nullable one.
        let mut dead: Vec<(usize, NodeId)> = Vec::new();
        loop {
            let offset = scanner.offset();
            if self.interner.nullable(state) {
                if offset > start || self.options.allow_empty_match {
                    if found {
                        scanner.accept();
                    }
                    scanner.mark();
                    found = true;
                }
                dead.clear();
            } else {
                if cache && self.hopeless.contains(offset, state) {
                    break;
                }
                dead.push((offset, state));
            }
            let Ok(ch) = scanner.advance() else {
                break;
            };
            state = self.interner.derivative(state, ch);
            if self.interner.is_void(state) {
                break;
            }
        }
        if cache {
            self.hopeless.commit(&dead);
        }
        found
    }

    fn captures(&mut self, text: impl Iterator<Item = char>) -> Captures {
        let text: Vec<char> = text.collect();
        reconstruct(&mut self.interner, self.root, &text)
    }
}

use std::fmt;

use thiserror::Error;

use crate::scanner::Location;

/// Raised by position-advancing scanner operations when every source is
/// exhausted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unexpected end of input")]
pub struct EndOfInput;

/// Raised when the input does not contain an expected literal.
///
/// The caller is expected to hold an open mark to `abort()` back to; the
/// scanner helpers that raise this have already restored their own position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected:?} at {}", At(.location.as_ref()))]
pub struct UnexpectedInput {
    /// The text that was expected at this point.
    pub expected: String,
    /// Where the mismatch was found, or `None` at end of input.
    pub location: Option<Location>,
}

/// A malformed pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error: {kind} at {}", At(.location.as_ref()))]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// Location of the offending character, or `None` at end of input.
    pub location: Option<Location>,
}

/// The specific defect a [`SyntaxError`] reports.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A delimiter such as `)`, `]` or `|` was required here.
    #[error("expected '{0}'")]
    Expected(char),
    /// A closing delimiter with no matching opener.
    #[error("unbalanced '{0}'")]
    Unbalanced(char),
    /// A backslash with nothing after it.
    #[error("dangling escape")]
    DanglingEscape,
    /// A class range whose bounds are out of order, e.g. `[z-a]`.
    #[error("invalid class range {0:?}-{1:?}")]
    InvalidRange(char, char),
}

/// Raised by the matcher when no match can be established.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to match")]
pub struct FailedMatch;

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// See [`EndOfInput`].
    #[error(transparent)]
    EndOfInput(#[from] EndOfInput),
    /// See [`UnexpectedInput`].
    #[error(transparent)]
    UnexpectedInput(#[from] UnexpectedInput),
    /// See [`SyntaxError`].
    #[error(transparent)]
    SyntaxError(#[from] SyntaxError),
    /// See [`FailedMatch`].
    #[error(transparent)]
    FailedMatch(#[from] FailedMatch),
}

/// Formats an optional location, naming end of input when there is none.
struct At<'a>(Option<&'a Location>);

impl fmt::Display for At<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(loc) => loc.fmt(f),
            None => f.write_str("end of input"),
        }
    }
}

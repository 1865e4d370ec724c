//! Regular expressions matched by Brzozowski derivatives, over a
//! backtracking scanner that reads from any number of spliced sources.
//!
//! - [`Scanner`] reads characters from named sources with unlimited
//!   lookahead and a stack of backtrack marks.
//! - [`Interner`] builds canonical expression nodes and computes their
//!   derivatives.
//! - [`parse`] turns pattern text into nodes.
//! - [`Matcher`] matches whole inputs and searches scanners for the
//!   leftmost, longest match, reporting capture groups.
//!
//! ```
//! use derivscan::{Matcher, Scanner};
//!
//! let mut m = Matcher::from_pattern("[0-9][0-9]*|[a-z][a-z]*").unwrap();
//! let mut s = Scanner::from_text("x1 = 42");
//! let mut tokens = Vec::new();
//! while m.search(&mut s).is_ok() {
//!     tokens.push(s.token());
//!     s.accept();
//! }
//! assert_eq!(tokens, ["x", "1", "42"]);
//! ```

mod error;
mod matcher;
mod options;
mod parser;
mod regex;
mod scanner;

#[cfg(test)]
mod tests;

pub use error::{EndOfInput, Error, FailedMatch, SyntaxError, SyntaxErrorKind, UnexpectedInput};
pub use matcher::{Capture, Captures, Matcher};
pub use options::MatcherOptions;
pub use parser::{parse, parse_scanner};
pub use regex::{CharClass, Interner, Node, NodeDisplay, NodeId};
pub use scanner::{Location, ReaderSource, Scanner, TEXT_SOURCE_NAME};

//! Scanner: a backtracking reader over an ordered list of character sources.
//!
//! What it does
//! - Reads Unicode scalar values from one or more named sources, tracking the
//!   line and column each character came from.
//! - Supports arbitrary lookahead (`peek`) and a stack of marks. `mark()`
//!   saves the position, `accept()` commits everything read since the top
//!   mark, and `abort()` rolls back to it.
//! - Sources can be queued behind the current one (`append_source`) or
//!   spliced in front of it (`include_source`), the latter saving any
//!   lookahead already read so it resumes once the included source ends.
//!
//! Buffering
//! - Characters live in a window that starts at the earliest mark (or the
//!   position when no mark is set) and ends at the farthest lookahead. When
//!   the window fills, the dead prefix is discarded and the capacity grows to
//!   twice the live window, so memory is bounded by the distance between the
//!   oldest outstanding mark and the farthest lookahead rather than by the
//!   total input consumed.
//!
//! Invariants
//! - `marks[i] <= marks[i + 1] <= pos <= buffer.len()`.
//! - `discarded + pos` is the absolute offset of the position and never
//!   decreases except through `abort()`.
//!
//! Example
//! ```
//! use derivscan::Scanner;
//!
//! let mut s = Scanner::from_text("let x");
//! s.mark();
//! s.expect_str("let").unwrap();
//! assert_eq!(s.token(), "let");
//! s.abort();
//! assert_eq!(s.peek(), Some('l'));
//! ```

mod source;

use std::{
    collections::VecDeque,
    fmt,
    io::Read,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

pub use source::ReaderSource;

use crate::error::{EndOfInput, UnexpectedInput};

const INITIAL_CAPACITY: usize = 16;

/// Name given to the source created by [`Scanner::from_text`].
pub const TEXT_SOURCE_NAME: &str = "<string>";

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A character of input together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Diagnostic name of the source.
    pub source: Arc<str>,
    /// Line number, starting at 1.
    pub line: u32,
    /// Column within the line. A newline sits at column 0 of the line it
    /// starts; the first character after it is at column 1.
    pub column: u32,
    /// The character itself.
    pub ch: char,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\", line {}, char {} (",
            self.source, self.line, self.column
        )?;
        match self.ch {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{8}' => f.write_str("\\b")?,
            c if (c as u32) < 0x20 => write!(f, "\\x{{{:02x}}}", c as u32)?,
            c => write!(f, "{c}")?,
        }
        f.write_str(")")
    }
}

/// Compact per-character record kept in the scan buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Located {
    ch: char,
    source: u32,
    line: u32,
    column: u32,
}

/// A registered source that has not been exhausted yet.
struct Input<'src> {
    chars: Box<dyn Iterator<Item = char> + 'src>,
    source: u32,
    line: u32,
    column: u32,
    /// Lookahead read from the sources behind this one before it was
    /// included. Restored to the buffer once this source is exhausted.
    suspended: Vec<Located>,
}

impl Input<'_> {
    fn locate(&mut self, ch: char) -> Located {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Located {
            ch,
            source: self.source,
            line: self.line,
            column: self.column,
        }
    }
}

/// A buffered, backtracking scanner over one or more character sources.
///
/// Typical loop:
/// ```
/// use derivscan::Scanner;
///
/// let mut s = Scanner::from_text("ab12");
/// s.mark();
/// while s.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
///     s.advance().unwrap();
/// }
/// let word = s.token();
/// s.accept();
/// assert_eq!(word, "ab");
/// assert_eq!(s.peek(), Some('1'));
/// ```
pub struct Scanner<'src> {
    inputs: VecDeque<Input<'src>>,
    names: Vec<Arc<str>>,

    // Live window
    buffer: Vec<Located>,
    pos: usize,
    marks: Vec<usize>,
    discarded: usize,

    last_read: Option<Located>,
    generation: u64,
}

impl Default for Scanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> Scanner<'src> {
    /// Creates a scanner with no sources. Every read reports end of input
    /// until a source is added.
    pub fn new() -> Self {
        Self {
            inputs: VecDeque::new(),
            names: Vec::new(),
            buffer: Vec::with_capacity(INITIAL_CAPACITY),
            pos: 0,
            marks: Vec::new(),
            discarded: 0,
            last_read: None,
            generation: next_generation(),
        }
    }

    /// Creates a scanner over a single string, named [`TEXT_SOURCE_NAME`].
    pub fn from_text(text: &'src str) -> Self {
        let mut s = Self::new();
        s.append_source(text.chars(), TEXT_SOURCE_NAME);
        s
    }

    /// Creates a scanner over a UTF-8 byte stream.
    pub fn from_reader<R: Read + 'src>(reader: R, name: impl Into<Arc<str>>) -> Self {
        let mut s = Self::new();
        s.append_source(ReaderSource::new(reader), name);
        s
    }

    /// Adds `source` ahead of all pending input.
    ///
    /// Lookahead already read past the current position is set aside and
    /// delivered again once `source` is exhausted, so the included text
    /// appears exactly at the current position.
    pub fn include_source<I>(&mut self, source: I, name: impl Into<Arc<str>>)
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'src,
    {
        let suspended = self.buffer.split_off(self.pos);
        let input = self.register(Box::new(source.into_iter()), name.into(), suspended);
        self.inputs.push_front(input);
        debug_assert!(self.invariant());
    }

    /// Adds `source` after all currently registered sources.
    pub fn append_source<I>(&mut self, source: I, name: impl Into<Arc<str>>)
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'src,
    {
        let input = self.register(Box::new(source.into_iter()), name.into(), Vec::new());
        self.inputs.push_back(input);
    }

    fn register(
        &mut self,
        chars: Box<dyn Iterator<Item = char> + 'src>,
        name: Arc<str>,
        suspended: Vec<Located>,
    ) -> Input<'src> {
        let source = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        log::debug!("registering source {name:?}");
        self.names.push(name);
        self.generation = next_generation();
        Input {
            chars,
            source,
            line: 1,
            column: 0,
            suspended,
        }
    }

    /// Ensures `buffer[pos]` exists, pulling from the sources as needed.
    fn fill(&mut self) -> Option<Located> {
        while self.pos == self.buffer.len() {
            let input = self.inputs.front_mut()?;
            if let Some(ch) = input.chars.next() {
                let loc = input.locate(ch);
                self.last_read = Some(loc);
                self.push(loc);
            } else {
                let Some(done) = self.inputs.pop_front() else {
                    break;
                };
                log::debug!("source {:?} exhausted", self.names[done.source as usize]);
                for loc in done.suspended {
                    self.push(loc);
                }
            }
        }
        self.buffer.get(self.pos).copied()
    }

    fn push(&mut self, loc: Located) {
        if self.buffer.len() == self.buffer.capacity() {
            self.compact();
        }
        self.buffer.push(loc);
        debug_assert!(self.invariant());
    }

    /// Discards everything before the earliest live offset and makes room for
    /// at least twice the live window.
    fn compact(&mut self) {
        let start = self.marks.first().copied().unwrap_or(self.pos);
        let live = self.buffer.len() - start;
        if start > 0 {
            self.buffer.drain(..start);
            for mark in &mut self.marks {
                *mark -= start;
            }
            self.pos -= start;
            self.discarded += start;
        }
        let wanted = (live * 2).max(INITIAL_CAPACITY);
        if self.buffer.capacity() < wanted {
            self.buffer.reserve_exact(wanted - self.buffer.len());
        }
    }

    fn invariant(&self) -> bool {
        let ordered = self.marks.windows(2).all(|w| w[0] <= w[1]);
        let below_pos = self.marks.last().is_none_or(|&m| m <= self.pos);
        ordered && below_pos && self.pos <= self.buffer.len()
    }

    /// The next character, without consuming it. `None` once every source is
    /// exhausted.
    pub fn peek(&mut self) -> Option<char> {
        self.fill().map(|loc| loc.ch)
    }

    /// Whether any input remains.
    pub fn has_next(&mut self) -> bool {
        self.fill().is_some()
    }

    /// Consumes and returns the next character.
    ///
    /// # Errors
    ///
    /// [`EndOfInput`] when every source is exhausted.
    pub fn advance(&mut self) -> Result<char, EndOfInput> {
        let loc = self.fill().ok_or(EndOfInput)?;
        self.pos += 1;
        Ok(loc.ch)
    }

    /// Pushes the current position onto the mark stack.
    pub fn mark(&mut self) {
        debug_assert!(self.invariant());
        self.marks.push(self.pos);
    }

    /// Pops the top mark, keeping everything consumed since it.
    ///
    /// # Panics
    ///
    /// If no mark is set.
    pub fn accept(&mut self) {
        self.marks.pop().expect("accept() without a matching mark()");
    }

    /// Moves the position back to the top mark and pops it.
    ///
    /// # Panics
    ///
    /// If no mark is set.
    pub fn abort(&mut self) {
        self.pos = self.marks.pop().expect("abort() without a matching mark()");
    }

    /// Number of marks currently set.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// The characters between the top mark and the current position.
    ///
    /// # Panics
    ///
    /// If no mark is set.
    pub fn token(&self) -> String {
        let start = *self.marks.last().expect("token() requires an active mark");
        self.buffer[start..self.pos].iter().map(|loc| loc.ch).collect()
    }

    /// Where the next character comes from.
    ///
    /// # Errors
    ///
    /// [`EndOfInput`] when every source is exhausted.
    pub fn location(&mut self) -> Result<Location, EndOfInput> {
        let loc = self.fill().ok_or(EndOfInput)?;
        Ok(self.resolve(loc))
    }

    /// Location of the character at the top mark, if a mark is set and it is
    /// not at the end of the buffered input.
    pub fn mark_location(&self) -> Option<Location> {
        let &mark = self.marks.last()?;
        self.buffer.get(mark).map(|&loc| self.resolve(loc))
    }

    fn resolve(&self, loc: Located) -> Location {
        Location {
            source: Arc::clone(&self.names[loc.source as usize]),
            line: loc.line,
            column: loc.column,
            ch: loc.ch,
        }
    }

    /// Name of the source the next character comes from. At end of input,
    /// the source of the last character read.
    pub fn source_name(&mut self) -> Option<Arc<str>> {
        let loc = self.fill().or(self.last_read)?;
        Some(Arc::clone(&self.names[loc.source as usize]))
    }

    /// Line of the next character (or of the last character read, at end of
    /// input).
    pub fn line(&mut self) -> u32 {
        self.fill().or(self.last_read).map_or(1, |loc| loc.line)
    }

    /// Column of the next character (or of the last character read, at end
    /// of input).
    pub fn column(&mut self) -> u32 {
        self.fill().or(self.last_read).map_or(0, |loc| loc.column)
    }

    /// Number of characters before the current position since the scanner
    /// was created. Unaffected by buffer compaction.
    pub fn offset(&self) -> usize {
        self.discarded + self.pos
    }

    /// A token identifying this scanner's current set of sources.
    ///
    /// It differs between scanners and changes every time a source is added,
    /// so anything keyed by [`offset`](Self::offset) can tell when the text
    /// at those offsets may have changed.
    pub fn input_generation(&self) -> u64 {
        self.generation
    }

    /// Consumes exactly the characters of `s`.
    ///
    /// # Errors
    ///
    /// [`UnexpectedInput`] if the input differs; the position is left where
    /// it was before the call.
    pub fn expect_str(&mut self, s: &str) -> Result<(), UnexpectedInput> {
        self.mark();
        for expected in s.chars() {
            if self.peek() == Some(expected) {
                self.pos += 1;
            } else {
                let location = self.location().ok();
                self.abort();
                return Err(UnexpectedInput {
                    expected: s.into(),
                    location,
                });
            }
        }
        self.accept();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[cfg(test)]
    pub(crate) fn test_window_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Iterator for Scanner<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.advance().ok()
    }
}

impl fmt::Debug for Scanner<'_> {
    /// Shows the live window with `[` at each mark and `^` at the position,
    /// preceded by up to five characters of already discarded context.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.marks.first().copied().unwrap_or(self.pos);
        let mut window = String::new();
        let mut marks = self.marks.iter().peekable();
        for (i, loc) in self.buffer.iter().enumerate().skip(first.saturating_sub(5)) {
            while marks.next_if(|&&m| m == i).is_some() {
                window.push('[');
            }
            if i == self.pos {
                window.push('^');
            }
            window.push(loc.ch);
        }
        while marks.next().is_some() {
            window.push('[');
        }
        if self.pos == self.buffer.len() {
            window.push('^');
        }
        f.debug_struct("Scanner")
            .field("offset", &self.offset())
            .field("depth", &self.marks.len())
            .field("sources", &self.inputs.len())
            .field("window", &window)
            .finish()
    }
}

#[cfg(test)]
mod tests;

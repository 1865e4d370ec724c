//! Recursive-descent reader for pattern text.

use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    regex::{CharClass, Interner, NodeId},
    scanner::Scanner,
};

/// Parses all of `pattern` into `interner`.
///
/// Grammar, loosest binding first:
///
/// ```text
/// alternation := concat ('|' concat)*
/// concat      := repeat*
/// repeat      := atom '*'*
/// atom        := '((' alternation '))'     capture
///              | '(' alternation ')'       grouping
///              | '[' '^'? item* ']'        character class
///              | '\' any                   escaped character
///              | any other character       literal
/// item        := char ('-' char)?
/// ```
///
/// An empty alternative matches the empty string, so `a|` and `()` are
/// accepted. `[]` matches nothing and `[^]` any character. Inside a class,
/// `-` is literal at the start or just before `]`, and `\` escapes the next
/// character. A `*` with nothing to repeat is an ordinary character.
///
/// # Errors
///
/// [`SyntaxError`] if the pattern is malformed. Its location names the
/// source [`TEXT_SOURCE_NAME`](crate::TEXT_SOURCE_NAME).
pub fn parse(interner: &mut Interner, pattern: &str) -> Result<NodeId, SyntaxError> {
    let mut scanner = Scanner::from_text(pattern);
    parse_scanner(interner, &mut scanner)
}

/// Parses the rest of `scanner`'s input into `interner`.
///
/// # Errors
///
/// [`SyntaxError`] if the pattern is malformed. The scanner is left at the
/// offending character.
pub fn parse_scanner(
    interner: &mut Interner,
    scanner: &mut Scanner<'_>,
) -> Result<NodeId, SyntaxError> {
    let mut parser = Parser { interner, scanner };
    let node = parser.alternation()?;
    match parser.scanner.peek() {
        None => Ok(node),
        Some(ch) => Err(parser.error(SyntaxErrorKind::Unbalanced(ch))),
    }
}

struct Parser<'a, 'src> {
    interner: &'a mut Interner,
    scanner: &'a mut Scanner<'src>,
}

impl Parser<'_, '_> {
    fn error(&mut self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            kind,
            location: self.scanner.location().ok(),
        }
    }

    /// Skips a character already seen with `peek`.
    fn bump(&mut self) {
        let _ = self.scanner.advance();
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.scanner.peek() == Some(ch) {
            self.scanner.advance().is_ok()
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), SyntaxError> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(SyntaxErrorKind::Expected(ch)))
        }
    }

    fn alternation(&mut self) -> Result<NodeId, SyntaxError> {
        let mut alternatives = vec![self.concat()?];
        while self.eat('|') {
            alternatives.push(self.concat()?);
        }
        Ok(self.interner.alternation(alternatives))
    }

    fn concat(&mut self) -> Result<NodeId, SyntaxError> {
        let mut parts = Vec::new();
        while let Some(ch) = self.scanner.peek() {
            if ch == '|' || ch == ')' {
                break;
            }
            parts.push(self.repeat()?);
        }
        Ok(self.interner.concat(parts))
    }

    fn repeat(&mut self) -> Result<NodeId, SyntaxError> {
        let mut node = self.atom()?;
        while self.eat('*') {
            node = self.interner.star(node);
        }
        Ok(node)
    }

    fn atom(&mut self) -> Result<NodeId, SyntaxError> {
        let Some(ch) = self.scanner.peek() else {
            return Ok(self.interner.empty());
        };
        match ch {
            '(' => {
                self.bump();
                if self.eat('(') {
                    let group = self.interner.next_group();
                    let inner = self.alternation()?;
                    self.expect(')')?;
                    self.expect(')')?;
                    Ok(self.interner.capture_group(group, inner))
                } else {
                    let inner = self.alternation()?;
                    self.expect(')')?;
                    Ok(inner)
                }
            }
            '[' => {
                self.bump();
                self.class()
            }
            ']' => Err(self.error(SyntaxErrorKind::Unbalanced(']'))),
            _ => {
                let ch = self.literal_char()?;
                let mut buf = [0; 4];
                Ok(self.interner.literal(ch.encode_utf8(&mut buf)))
            }
        }
    }

    /// Consumes one character, resolving a `\` escape.
    fn literal_char(&mut self) -> Result<char, SyntaxError> {
        let location = self.scanner.location().ok();
        match self.scanner.advance() {
            Ok('\\') => self.scanner.advance().map_err(|_| SyntaxError {
                kind: SyntaxErrorKind::DanglingEscape,
                location,
            }),
            Ok(ch) => Ok(ch),
            Err(_) => Err(self.error(SyntaxErrorKind::Expected(']'))),
        }
    }

    /// Everything after the opening `[`.
    fn class(&mut self) -> Result<NodeId, SyntaxError> {
        let negated = self.eat('^');
        let mut ranges = Vec::new();
        loop {
            match self.scanner.peek() {
                None => return Err(self.error(SyntaxErrorKind::Expected(']'))),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }
            let range_location = self.scanner.location().ok();
            let lo = self.literal_char()?;
            if self.scanner.peek() != Some('-') {
                ranges.push((lo, lo));
                continue;
            }
            self.scanner.mark();
            self.bump();
            if matches!(self.scanner.peek(), None | Some(']')) {
                // Trailing '-' is a literal; leave it for the next item.
                self.scanner.abort();
                ranges.push((lo, lo));
                continue;
            }
            self.scanner.accept();
            let hi = self.literal_char()?;
            if lo > hi {
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::InvalidRange(lo, hi),
                    location: range_location,
                });
            }
            ranges.push((lo, hi));
        }
        Ok(self.interner.char_class(CharClass::new(ranges, negated)))
    }
}

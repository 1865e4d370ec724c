use super::*;

fn drain(s: &mut Scanner<'_>) -> String {
    s.by_ref().collect()
}

#[test]
fn peek_does_not_consume() {
    let mut s = Scanner::from_text("ab");
    assert_eq!(s.peek(), Some('a'));
    assert_eq!(s.peek(), Some('a'));
    assert_eq!(s.advance(), Ok('a'));
    assert_eq!(s.peek(), Some('b'));
    assert_eq!(s.advance(), Ok('b'));
    assert_eq!(s.peek(), None);
    assert!(!s.has_next());
    assert_eq!(s.advance(), Err(EndOfInput));
}

#[test]
fn empty_scanner_is_at_end() {
    let mut s = Scanner::new();
    assert_eq!(s.peek(), None);
    assert_eq!(s.location(), Err(EndOfInput));
    assert_eq!(s.source_name(), None);
    assert_eq!(s.line(), 1);
}

#[test]
fn abort_restores_position_and_depth() {
    let mut s = Scanner::from_text("hello world");
    s.advance().unwrap();
    s.mark();
    assert_eq!(s.depth(), 1);
    for _ in 0..4 {
        s.advance().unwrap();
    }
    assert_eq!(s.token(), "ello");
    s.abort();
    assert_eq!(s.depth(), 0);
    assert_eq!(s.offset(), 1);
    assert_eq!(s.peek(), Some('e'));
}

#[test]
fn accept_keeps_position() {
    let mut s = Scanner::from_text("hello");
    s.mark();
    s.advance().unwrap();
    s.advance().unwrap();
    s.accept();
    assert_eq!(s.depth(), 0);
    assert_eq!(s.offset(), 2);
    assert_eq!(drain(&mut s), "llo");
}

#[test]
fn nested_marks_unwind_in_order() {
    let mut s = Scanner::from_text("abcdef");
    s.mark();
    s.advance().unwrap();
    s.mark();
    s.advance().unwrap();
    s.mark();
    s.advance().unwrap();
    assert_eq!(s.token(), "c");
    s.accept();
    assert_eq!(s.token(), "bc");
    s.abort();
    assert_eq!(s.token(), "a");
    s.abort();
    assert_eq!(s.offset(), 0);
    assert_eq!(drain(&mut s), "abcdef");
}

#[test]
#[should_panic(expected = "abort() without a matching mark()")]
fn abort_without_mark_panics() {
    let mut s = Scanner::from_text("x");
    s.abort();
}

#[test]
fn appended_sources_read_in_order() {
    let mut s = Scanner::new();
    s.append_source("ab".chars(), "first");
    s.append_source("".chars(), "empty");
    s.append_source("cd".chars(), "second");
    s.mark();
    assert_eq!(drain(&mut s), "abcd");
    assert_eq!(s.token(), "abcd");
    s.abort();
    s.advance().unwrap();
    s.advance().unwrap();
    assert_eq!(s.source_name().as_deref(), Some("second"));
}

#[test]
fn include_splices_at_position() {
    let mut s = Scanner::new();
    s.append_source("abcdef".chars(), "outer");
    s.advance().unwrap();
    s.advance().unwrap();
    // read ahead past the splice point
    s.mark();
    s.advance().unwrap();
    s.advance().unwrap();
    s.abort();
    s.include_source("XY".chars(), "inner");
    assert_eq!(s.source_name().as_deref(), Some("inner"));
    assert_eq!(drain(&mut s), "XYcdef");
}

#[test]
fn include_inside_mark_is_part_of_token() {
    let mut s = Scanner::from_text("ab");
    s.mark();
    s.advance().unwrap();
    s.include_source("12".chars(), "inner");
    s.advance().unwrap();
    s.advance().unwrap();
    s.advance().unwrap();
    assert_eq!(s.token(), "a12b");
    s.abort();
    assert_eq!(drain(&mut s), "a12b");
}

#[test]
fn locations_track_lines_and_columns() {
    let mut s = Scanner::from_text("ab\ncd");
    let first = s.location().unwrap();
    assert_eq!((first.line, first.column, first.ch), (1, 1, 'a'));
    s.advance().unwrap();
    s.advance().unwrap();
    let newline = s.location().unwrap();
    assert_eq!((newline.line, newline.column, newline.ch), (2, 0, '\n'));
    s.advance().unwrap();
    let c = s.location().unwrap();
    assert_eq!((c.line, c.column, c.ch), (2, 1, 'c'));
    assert_eq!(&*c.source, TEXT_SOURCE_NAME);
}

#[test]
fn location_display_format() {
    let mut s = Scanner::new();
    s.append_source("x\n".chars(), "input.txt");
    assert_eq!(
        s.location().unwrap().to_string(),
        "\"input.txt\", line 1, char 1 (x)"
    );
    s.advance().unwrap();
    assert_eq!(
        s.location().unwrap().to_string(),
        "\"input.txt\", line 2, char 0 (\\n)"
    );
    let bell = Location {
        source: "s".into(),
        line: 3,
        column: 4,
        ch: '\u{7}',
    };
    assert_eq!(bell.to_string(), "\"s\", line 3, char 4 (\\x{07})");
}

#[test]
fn line_and_column_at_end_report_last_character() {
    let mut s = Scanner::from_text("a\nbc");
    drain(&mut s);
    assert_eq!(s.line(), 2);
    assert_eq!(s.column(), 2);
}

#[test]
fn mark_location_names_the_mark() {
    let mut s = Scanner::from_text("xyz");
    s.advance().unwrap();
    s.mark();
    s.advance().unwrap();
    let loc = s.mark_location().unwrap();
    assert_eq!(loc.ch, 'y');
    assert_eq!(loc.column, 2);
}

#[test]
fn expect_str_consumes_or_restores() {
    let mut s = Scanner::from_text("let lex");
    assert_eq!(s.expect_str("let"), Ok(()));
    assert_eq!(s.expect_str(" "), Ok(()));
    let err = s.expect_str("let").unwrap_err();
    assert_eq!(err.expected, "let");
    assert_eq!(err.location.as_ref().map(|l| l.ch), Some('x'));
    assert_eq!(s.depth(), 0);
    assert_eq!(drain(&mut s), "lex");
}

#[test]
fn expect_str_at_end_has_no_location() {
    let mut s = Scanner::from_text("le");
    let err = s.expect_str("let").unwrap_err();
    assert_eq!(err.location, None);
    assert_eq!(err.to_string(), "expected \"let\" at end of input");
    assert_eq!(s.offset(), 0);
}

#[test]
fn compaction_discards_dead_prefix() {
    let text: String = core::iter::repeat_n("abcdefgh", 1_000).collect();
    let mut s = Scanner::from_text(&text);
    for _ in 0..text.len() {
        s.mark();
        s.advance().unwrap();
        s.accept();
    }
    assert_eq!(s.offset(), text.len());
    // Nothing was held, so the window never outgrew its initial size.
    assert!(s.test_capacity() <= 2 * INITIAL_CAPACITY);
}

#[test]
fn compaction_keeps_marked_window() {
    let text: String = (0..500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let mut s = Scanner::from_text(&text);
    for _ in 0..100 {
        s.advance().unwrap();
    }
    s.mark();
    for _ in 0..300 {
        s.advance().unwrap();
    }
    assert_eq!(s.token(), &text[100..400]);
    assert!(s.test_window_len() <= 400);
    s.abort();
    assert_eq!(s.offset(), 100);
    assert_eq!(drain(&mut s), &text[100..]);
}

#[test]
fn generation_changes_with_sources() {
    let mut s = Scanner::from_text("a");
    let other = Scanner::from_text("a");
    let before = s.input_generation();
    assert_ne!(before, other.input_generation());
    s.append_source("b".chars(), "more");
    assert_ne!(before, s.input_generation());
}

#[test]
fn reader_source_decodes_utf8() {
    let bytes = "héllo → wörld".as_bytes();
    let mut s = Scanner::from_reader(bytes, "bytes");
    assert_eq!(drain(&mut s), "héllo → wörld");
}

#[test]
fn reader_source_replaces_invalid_bytes() {
    let bytes: &[u8] = b"a\xffb";
    let mut s = Scanner::from_reader(bytes, "bytes");
    assert_eq!(drain(&mut s), "a\u{FFFD}b");
}

#[test]
fn reader_source_reassembles_split_sequences() {
    /// Delivers one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some((&first, rest)) = self.0.split_first() else {
                return Ok(0);
            };
            buf[0] = first;
            self.0 = rest;
            Ok(1)
        }
    }

    let text = "a😀b€";
    let mut s = Scanner::from_reader(Trickle(text.as_bytes()), "trickle");
    assert_eq!(drain(&mut s), text);
}

#[test]
fn debug_shows_marks_and_position() {
    let mut s = Scanner::from_text("abcd");
    s.advance().unwrap();
    s.mark();
    s.advance().unwrap();
    s.peek();
    let dump = format!("{s:?}");
    assert!(dump.contains(r#"window: "a[b^c""#), "{dump}");
    assert!(dump.contains("depth: 1"), "{dump}");
}

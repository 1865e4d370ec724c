#![allow(missing_docs)]

use std::fmt::Write;

use derivscan::{Error, Interner, Scanner, parse};

fn render_syntax_errors(patterns: &[&str]) -> String {
    let mut out = String::new();
    for pattern in patterns {
        let mut re = Interner::new();
        let err = Error::from(parse(&mut re, pattern).unwrap_err());
        writeln!(out, "{pattern:?}: {err}").unwrap();
    }
    out
}

#[test]
fn snapshot_syntax_errors() {
    let patterns = ["(ab", "((a)", "ab)", "x]", "[z-a]", "a\\", "[ab"];
    insta::assert_snapshot!(render_syntax_errors(&patterns), @r#"
    "(ab": syntax error: expected ')' at end of input
    "((a)": syntax error: expected ')' at end of input
    "ab)": syntax error: unbalanced ')' at "<string>", line 1, char 3 ())
    "x]": syntax error: unbalanced ']' at "<string>", line 1, char 2 (])
    "[z-a]": syntax error: invalid class range 'z'-'a' at "<string>", line 1, char 2 (z)
    "a\\": syntax error: dangling escape at "<string>", line 1, char 2 (\)
    "[ab": syntax error: expected ']' at end of input
    "#);
}

#[test]
fn snapshot_scanner_errors() {
    let mut s = Scanner::from_text("let\tx");
    let mismatch = Error::from(s.expect_str("let x").unwrap_err());
    s.expect_str("let\tx").unwrap();
    let end = Error::from(s.advance().unwrap_err());
    insta::assert_snapshot!(format!("{mismatch}\n{end}"), @r#"
    expected "let x" at "<string>", line 1, char 4 (\t)
    unexpected end of input
    "#);
}

#[test]
fn pattern_display_alongside_fmt_display() {
    use std::fmt::Display;

    use derivscan::NodeDisplay;

    fn render(shown: &impl Display) -> String {
        shown.to_string()
    }

    let mut re = Interner::new();
    let node = parse(&mut re, "a((bc))*").unwrap();
    let shown: NodeDisplay<'_> = re.display(node);
    insta::assert_snapshot!(render(&shown), @"a((bc))*");
}

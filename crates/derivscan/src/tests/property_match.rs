use quickcheck::QuickCheck;

use super::arbitrary::{Pattern, Text, tests};
use crate::{Interner, Matcher, MatcherOptions, Scanner};

/// Property: deciding a whole match by derivatives agrees with the `regex`
/// crate on the same expression.
#[test]
fn whole_match_agrees_with_regex_crate() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(pattern: Pattern, text: Text) -> bool {
        let oracle = regex::Regex::new(&format!("^(?:{})$", pattern.to_regex())).unwrap();
        let mut re = Interner::new();
        let root = pattern.build(&mut re);
        let mut m = Matcher::new(re, root);
        m.match_str(&text.0).is_ok() == oracle.is_match(&text.0)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Pattern, Text) -> bool);
}

/// Property: construction is deterministic, and rebuilding a capture-free
/// expression in the same interner finds every node already interned.
#[test]
fn construction_is_canonical() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(pattern: Pattern) -> bool {
        let mut re = Interner::new();
        let first = pattern.build(&mut re);
        let mut fresh = Interner::new();
        if pattern.build(&mut fresh) != first {
            return false;
        }
        // Every capture takes a new group number, so a rebuilt capture is a
        // different node.
        if re.has_captures(first) {
            return true;
        }
        let nodes = re.node_count();
        pattern.build(&mut re) == first && re.node_count() == nodes
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Pattern) -> bool);
}

/// Brute-force leftmost, longest, non-empty match of `root` in `text`.
fn brute_force(re: Interner, root: crate::NodeId, text: &str) -> Option<(usize, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let mut m = Matcher::new(re, root);
    (0..chars.len()).find_map(|start| {
        (start + 1..=chars.len()).rev().find_map(|end| {
            let candidate: String = chars[start..end].iter().collect();
            m.match_str(&candidate).is_ok().then_some((start, end))
        })
    })
}

/// Property: `search` returns the leftmost, longest non-empty match, and
/// leaves the scanner at end of input with no extra mark when there is
/// none.
#[test]
fn search_is_leftmost_longest() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(pattern: Pattern, text: Text) -> bool {
        let mut re = Interner::new();
        let root = pattern.build(&mut re);
        let expected = brute_force(re, root, &text.0);

        let mut re = Interner::new();
        let root = pattern.build(&mut re);
        let mut m = Matcher::new(re, root);
        let mut s = Scanner::from_text(&text.0);
        match (m.search(&mut s), expected) {
            (Ok(_), Some((start, end))) => {
                let len = s.token().chars().count();
                s.depth() == 1 && s.offset() == end && end - len == start
            }
            (Err(_), None) => s.depth() == 0 && !s.has_next(),
            _ => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Pattern, Text) -> bool);
}

fn tokenize(m: &mut Matcher, text: &str) -> Vec<(usize, String)> {
    let mut s = Scanner::from_text(text);
    let mut out = Vec::new();
    while m.search(&mut s).is_ok() {
        let token = s.token();
        out.push((s.offset() - token.chars().count(), token));
        s.accept();
    }
    out
}

/// Property: the hopeless cache never changes what a tokenizing loop
/// produces.
#[test]
fn hopeless_cache_is_transparent() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(pattern: Pattern, text: Text) -> bool {
        let mut re = Interner::new();
        let root = pattern.build(&mut re);
        let mut cached = Matcher::new(re, root);

        let mut re = Interner::new();
        let root = pattern.build(&mut re);
        let options = MatcherOptions {
            cache_hopeless: false,
            ..MatcherOptions::default()
        };
        let mut uncached = Matcher::with_options(re, root, options);

        let first = tokenize(&mut cached, &text.0);
        // A second pass over a new scanner must not reuse stale states.
        let second = tokenize(&mut cached, &text.0);
        first == tokenize(&mut uncached, &text.0) && first == second
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Pattern, Text) -> bool);
}

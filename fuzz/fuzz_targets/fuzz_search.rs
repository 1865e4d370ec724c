#![no_main]

use arbitrary::Arbitrary;
use derivscan::{Interner, Matcher, MatcherOptions, Scanner, parse};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    pattern: String,
    /// Split into sources at each NUL.
    text: String,
    /// Where to splice `included` into the input, if anywhere.
    include_at: Option<u8>,
    included: String,
    cache_hopeless: bool,
}

fn tokenize(m: &mut Matcher, input: &Input) -> Vec<(usize, String)> {
    let mut s = Scanner::new();
    for (i, part) in input.text.split('\0').enumerate() {
        s.append_source(part.chars(), format!("part{i}"));
    }
    if let Some(at) = input.include_at {
        for _ in 0..at {
            if s.advance().is_err() {
                break;
            }
        }
        s.include_source(input.included.chars(), "included");
    }
    let mut tokens = Vec::new();
    while m.search(&mut s).is_ok() {
        let token = s.token();
        assert!(!token.is_empty());
        assert_eq!(s.depth(), 1);
        tokens.push((s.offset(), token));
        s.accept();
    }
    assert_eq!(s.depth(), 0);
    assert!(!s.has_next());
    tokens
}

fn search(input: &Input) {
    let mut interner = Interner::new();
    let Ok(root) = parse(&mut interner, &input.pattern) else {
        return;
    };

    let _ = interner.display(root).to_string();

    let options = MatcherOptions {
        cache_hopeless: input.cache_hopeless,
        ..MatcherOptions::default()
    };
    let mut m = Matcher::with_options(interner, root, options);
    let first = tokenize(&mut m, input);
    // A second scanner over the same text must not see stale cache entries.
    let second = tokenize(&mut m, input);
    assert_eq!(first, second);
    for (_, token) in &first {
        assert!(m.match_str(token).is_ok());
    }
}

fuzz_target!(|input: Input| search(&input));

use rustc_hash::FxHashMap;

use crate::regex::{Interner, Node, NodeId};

/// Text matched by one capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capture {
    /// Group number assigned when the capture was constructed.
    pub group: u32,
    /// The captured text.
    pub text: String,
}

/// The captures of one match, in the order their groups finished matching:
/// inner groups before the groups enclosing them, earlier text before later.
///
/// A group inside a repetition appears once per iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Captures {
    captures: Vec<Capture>,
}

impl Captures {
    /// Number of captures.
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Whether the match captured nothing.
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Captures in completion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Capture> {
        self.captures.iter()
    }

    /// Captures in completion order.
    pub fn as_slice(&self) -> &[Capture] {
        &self.captures
    }

    /// Text of the last completed capture of `group`.
    pub fn group(&self, group: u32) -> Option<&str> {
        self.captures
            .iter()
            .rev()
            .find(|c| c.group == group)
            .map(|c| c.text.as_str())
    }

    /// Just the texts, in completion order.
    pub fn texts(&self) -> Vec<&str> {
        self.captures.iter().map(|c| c.text.as_str()).collect()
    }
}

impl IntoIterator for Captures {
    type Item = Capture;
    type IntoIter = std::vec::IntoIter<Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.captures.into_iter()
    }
}

impl<'a> IntoIterator for &'a Captures {
    type Item = &'a Capture;
    type IntoIter = std::slice::Iter<'a, Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.captures.iter()
    }
}

/// Recovers the captures of `node` over `text`, which `node` must match.
///
/// Walks one accepting path: concatenation prefixes and star iterations take
/// the longest share that still lets the rest match, and alternations take
/// the first viable alternative in canonical order. Every character consumed
/// along the path is appended to each capture open at that point.
///
/// Each node is walked over disjoint stretches of `text`, and every cut is
/// found with one backward and one forward sweep over its stretch, so the
/// work is linear in the length of the match.
pub(crate) fn reconstruct(interner: &mut Interner, node: NodeId, text: &[char]) -> Captures {
    let mut run = CaptureRun {
        interner,
        text,
        open: Vec::new(),
        done: Vec::new(),
    };
    if run.interner.has_captures(node) {
        run.walk(node, 0, text.len());
    }
    Captures { captures: run.done }
}

/// Places where `text[base..end]` may be cut, given what has to match after
/// the cut.
struct Cuts {
    base: usize,
    /// Whether the expression after the cut matches `text[split..end]`,
    /// indexed by `split - base`.
    tails: Vec<bool>,
    /// Longest cut reachable from a head state at an offset.
    best: FxHashMap<(usize, NodeId), Option<usize>>,
}

impl Cuts {
    fn allows(&self, interner: &Interner, at: usize, state: NodeId) -> bool {
        interner.nullable(state) && self.tails[at - self.base]
    }
}

struct CaptureRun<'a> {
    interner: &'a mut Interner,
    text: &'a [char],
    open: Vec<(u32, String)>,
    done: Vec<Capture>,
}

impl CaptureRun<'_> {
    fn matches(&mut self, node: NodeId, start: usize, end: usize) -> bool {
        self.interner
            .matches(node, self.text[start..end].iter().copied())
    }

    fn consume(&mut self, start: usize, end: usize) {
        let chars = &self.text[start..end];
        for (_, buf) in &mut self.open {
            buf.extend(chars);
        }
    }

    /// Reads `text[start..end]` backwards through the reversal of `tail`.
    fn cuts(&mut self, tail: NodeId, start: usize, end: usize) -> Cuts {
        let mut tails = vec![false; end - start + 1];
        let mut state = self.interner.reverse(tail);
        let mut split = end;
        loop {
            tails[split - start] = self.interner.nullable(state);
            if split == start {
                break;
            }
            split -= 1;
            state = self.interner.derivative(state, self.text[split]);
            if self.interner.is_void(state) {
                break;
            }
        }
        Cuts {
            base: start,
            tails,
            best: FxHashMap::default(),
        }
    }

    /// Longest `split` in `min..=end` such that `head` matches
    /// `text[start..split]` and `cuts` allows a cut there. `min` is `start`
    /// or `start + 1`.
    fn longest(
        &mut self,
        head: NodeId,
        start: usize,
        min: usize,
        end: usize,
        cuts: &mut Cuts,
    ) -> Option<usize> {
        let mut path = Vec::new();
        let mut best = None;
        let mut state = head;
        let mut at = start;
        while at < end {
            state = self.interner.derivative(state, self.text[at]);
            at += 1;
            if self.interner.is_void(state) {
                break;
            }
            if let Some(&known) = cuts.best.get(&(at, state)) {
                best = known;
                break;
            }
            path.push((at, state));
        }
        for &(at, state) in path.iter().rev() {
            if best.is_none() && cuts.allows(self.interner, at, state) {
                best = Some(at);
            }
            cuts.best.insert((at, state), best);
        }
        if best.is_none() && min == start && cuts.allows(self.interner, start, head) {
            best = Some(start);
        }
        best
    }

    /// Walks `node` over `text[start..end]`, which it matches.
    fn walk(&mut self, node: NodeId, start: usize, end: usize) {
        if !self.interner.has_captures(node) {
            self.consume(start, end);
            return;
        }
        match self.interner.node(node).clone() {
            Node::Void | Node::Literal(_) | Node::Class(_) => self.consume(start, end),
            Node::Concat(children) => {
                let mut at = start;
                for (i, &child) in children.iter().enumerate() {
                    let rest = &children[i + 1..];
                    if rest.is_empty() {
                        self.walk(child, at, end);
                        break;
                    }
                    let tail = self.interner.concat(rest.iter().copied());
                    let mut cuts = self.cuts(tail, at, end);
                    let Some(split) = self.longest(child, at, at, end, &mut cuts) else {
                        return;
                    };
                    self.walk(child, at, split);
                    at = split;
                }
            }
            Node::Alternation(children) => {
                let viable = children
                    .iter()
                    .copied()
                    .find(|&child| self.matches(child, start, end));
                if let Some(child) = viable {
                    self.walk(child, start, end);
                }
            }
            Node::Star(inner) => {
                // One table serves every iteration: the rest is always this
                // star again.
                let mut cuts = self.cuts(node, start, end);
                let mut at = start;
                // Each iteration consumes at least one character.
                while at < end {
                    let Some(split) = self.longest(inner, at, at + 1, end, &mut cuts) else {
                        return;
                    };
                    self.walk(inner, at, split);
                    at = split;
                }
            }
            Node::Capture { group, inner } => {
                self.open.push((group, String::new()));
                self.walk(inner, start, end);
                if let Some((group, text)) = self.open.pop() {
                    self.done.push(Capture { group, text });
                }
            }
        }
    }
}

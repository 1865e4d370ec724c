//! Regular-expression algebra with structural interning.
//!
//! Every node lives in an [`Interner`] and is named by a [`NodeId`]. The
//! constructors canonicalize as they build (flattening, dropping identities,
//! sorting alternatives) and then intern, so two structurally equal
//! expressions always receive the same id. Identity comparison is therefore
//! equality, and ids can serve as cheap cache keys for derivatives and for
//! the matcher's dead-state cache.
//!
//! ```
//! use derivscan::Interner;
//!
//! let mut re = Interner::new();
//! let a = re.literal("a");
//! let b = re.literal("b");
//! let ab = re.alternation([a, b]);
//! let ba = re.alternation([b, a]);
//! assert_eq!(ab, ba);
//!
//! let star = re.star(ab);
//! assert_eq!(re.star(star), star);
//! ```

mod class;
mod derivative;
mod display;
mod reverse;

use std::{
    hash::{Hash, Hasher},
    mem,
};

use rustc_hash::{FxHashMap, FxHasher};

pub use class::CharClass;
pub use display::NodeDisplay;

/// Identifier of an interned node. Only meaningful for the [`Interner`] that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its interner.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A regular-expression node. Children are interned ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Matches nothing.
    Void,
    /// Matches exactly this text. The empty literal matches the empty string.
    Literal(Box<str>),
    /// Children matched in sequence. Always at least two, none of them a
    /// concatenation, the empty literal, or void.
    Concat(Box<[NodeId]>),
    /// Any one of the children. Always at least two distinct, non-void
    /// children, none of them an alternation, in canonical order.
    Alternation(Box<[NodeId]>),
    /// Zero or more repetitions of the child.
    Star(NodeId),
    /// One character from the class.
    Class(CharClass),
    /// The child, with the text it matches reported as capture `group`.
    Capture {
        /// Group number, unique per capture constructed by one interner.
        group: u32,
        /// The captured subexpression.
        inner: NodeId,
    },
}

/// Facts computed once when a node is interned.
#[derive(Debug)]
struct NodeData {
    node: Node,
    hash: u64,
    nullable: bool,
    void: bool,
    captures: bool,
}

const VOID: NodeId = NodeId(0);
const EMPTY: NodeId = NodeId(1);

/// Arena and canonicalization table for regular-expression nodes, together
/// with the memo of computed derivatives.
#[derive(Debug)]
pub struct Interner {
    nodes: Vec<NodeData>,
    table: FxHashMap<Node, NodeId>,
    derivatives: FxHashMap<(NodeId, char), NodeId>,
    reversed: FxHashMap<NodeId, NodeId>,
    steps: u64,
    next_group: u32,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates an interner holding only `void()` and `empty()`.
    pub fn new() -> Self {
        let mut interner = Self {
            nodes: Vec::new(),
            table: FxHashMap::default(),
            derivatives: FxHashMap::default(),
            reversed: FxHashMap::default(),
            steps: 0,
            next_group: 0,
        };
        let void = interner.intern(Node::Void);
        let empty = interner.intern(Node::Literal("".into()));
        debug_assert_eq!((void, empty), (VOID, EMPTY));
        interner
    }

    fn intern(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.table.get(&node) {
            return id;
        }
        let index = u32::try_from(self.nodes.len()).expect("interner holds over u32::MAX nodes");
        let id = NodeId(index);
        let data = NodeData {
            hash: self.structural_hash(&node),
            nullable: self.compute_nullable(&node),
            void: self.compute_void(&node),
            captures: self.compute_captures(&node),
            node: node.clone(),
        };
        self.nodes.push(data);
        self.table.insert(node, id);
        id
    }

    /// A hash of the node's structure that does not depend on id assignment,
    /// used to order alternatives canonically.
    fn structural_hash(&self, node: &Node) -> u64 {
        let mut h = FxHasher::default();
        mem::discriminant(node).hash(&mut h);
        match node {
            Node::Void => {}
            Node::Literal(text) => text.hash(&mut h),
            Node::Concat(children) | Node::Alternation(children) => {
                for &child in children {
                    self.data(child).hash.hash(&mut h);
                }
            }
            Node::Star(inner) => self.data(*inner).hash.hash(&mut h),
            Node::Class(class) => class.hash(&mut h),
            Node::Capture { group, inner } => {
                group.hash(&mut h);
                self.data(*inner).hash.hash(&mut h);
            }
        }
        h.finish()
    }

    fn compute_nullable(&self, node: &Node) -> bool {
        match node {
            Node::Void | Node::Class(_) => false,
            Node::Literal(text) => text.is_empty(),
            Node::Concat(children) => children.iter().all(|&c| self.nullable(c)),
            Node::Alternation(children) => children.iter().any(|&c| self.nullable(c)),
            Node::Star(_) => true,
            Node::Capture { inner, .. } => self.nullable(*inner),
        }
    }

    fn compute_void(&self, node: &Node) -> bool {
        match node {
            Node::Void => true,
            Node::Literal(_) | Node::Star(_) => false,
            Node::Concat(children) => children.iter().any(|&c| self.is_void(c)),
            Node::Alternation(children) => children.iter().all(|&c| self.is_void(c)),
            Node::Class(class) => class.matches_nothing(),
            Node::Capture { inner, .. } => self.is_void(*inner),
        }
    }

    fn compute_captures(&self, node: &Node) -> bool {
        match node {
            Node::Void | Node::Literal(_) | Node::Class(_) => false,
            Node::Concat(children) | Node::Alternation(children) => {
                children.iter().any(|&c| self.has_captures(c))
            }
            Node::Star(inner) => self.has_captures(*inner),
            Node::Capture { .. } => true,
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// The node named by `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.data(id).node
    }

    /// Whether `id` matches the empty string.
    pub fn nullable(&self, id: NodeId) -> bool {
        self.data(id).nullable
    }

    /// Whether `id` matches no string at all.
    pub fn is_void(&self, id: NodeId) -> bool {
        self.data(id).void
    }

    /// Whether a capture occurs anywhere inside `id`.
    pub fn has_captures(&self, id: NodeId) -> bool {
        self.data(id).captures
    }

    /// Number of distinct nodes interned so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The expression matching nothing.
    pub fn void(&self) -> NodeId {
        VOID
    }

    /// The expression matching only the empty string.
    pub fn empty(&self) -> NodeId {
        EMPTY
    }

    /// The expression matching exactly `text`.
    pub fn literal(&mut self, text: &str) -> NodeId {
        self.intern(Node::Literal(text.into()))
    }

    /// The expression matching `parts` in sequence.
    ///
    /// Nested concatenations are flattened, `empty()` parts dropped and
    /// adjacent literals joined; any void part makes the whole concatenation
    /// void.
    pub fn concat(&mut self, parts: impl IntoIterator<Item = NodeId>) -> NodeId {
        let mut flat: Vec<NodeId> = Vec::new();
        let mut pending = String::new();
        for part in parts {
            if self.is_void(part) {
                return VOID;
            }
            match self.node(part) {
                Node::Literal(text) => pending.push_str(text),
                Node::Concat(children) => {
                    let children = children.clone();
                    for child in children {
                        self.concat_push(&mut flat, &mut pending, child);
                    }
                }
                _ => self.concat_push(&mut flat, &mut pending, part),
            }
        }
        if !pending.is_empty() {
            flat.push(self.literal(&pending));
        }
        match flat.len() {
            0 => EMPTY,
            1 => flat[0],
            _ => self.intern(Node::Concat(flat.into_boxed_slice())),
        }
    }

    fn concat_push(&mut self, flat: &mut Vec<NodeId>, pending: &mut String, part: NodeId) {
        if let Node::Literal(text) = self.node(part) {
            pending.push_str(text);
            return;
        }
        if !pending.is_empty() {
            let literal = self.literal(pending);
            flat.push(literal);
            pending.clear();
        }
        flat.push(part);
    }

    /// The expression matching any one of `alternatives`.
    ///
    /// Nested alternations are flattened, void alternatives dropped and
    /// duplicates removed; survivors are sorted by structural hash so the
    /// result does not depend on argument order.
    pub fn alternation(&mut self, alternatives: impl IntoIterator<Item = NodeId>) -> NodeId {
        let mut flat: Vec<NodeId> = Vec::new();
        for alt in alternatives {
            match self.node(alt) {
                Node::Alternation(children) => flat.extend(children.iter().copied()),
                _ if self.is_void(alt) => {}
                _ => flat.push(alt),
            }
        }
        flat.sort_unstable_by_key(|&id| (self.data(id).hash, id));
        flat.dedup();
        match flat.len() {
            0 => VOID,
            1 => flat[0],
            _ => self.intern(Node::Alternation(flat.into_boxed_slice())),
        }
    }

    /// Zero or more repetitions of `r`.
    pub fn star(&mut self, r: NodeId) -> NodeId {
        if self.is_void(r) {
            return VOID;
        }
        if r == EMPTY {
            return EMPTY;
        }
        if let Node::Star(_) = self.node(r) {
            return r;
        }
        self.intern(Node::Star(r))
    }

    /// One or more repetitions of `r`.
    pub fn one_or_more(&mut self, r: NodeId) -> NodeId {
        let rest = self.star(r);
        self.concat([r, rest])
    }

    /// `r` or the empty string.
    pub fn optional(&mut self, r: NodeId) -> NodeId {
        self.alternation([r, EMPTY])
    }

    /// One character between `lo` and `hi` inclusive, or outside that range
    /// when `negated`. An empty range (`lo > hi`) matches nothing, or every
    /// character when negated.
    pub fn char_range(&mut self, lo: char, hi: char, negated: bool) -> NodeId {
        self.char_class(CharClass::new([(lo, hi)], negated))
    }

    /// One character from `class`.
    pub fn char_class(&mut self, class: CharClass) -> NodeId {
        if class.matches_nothing() {
            return VOID;
        }
        self.intern(Node::Class(class))
    }

    /// Any single character.
    pub fn any_char(&mut self) -> NodeId {
        self.char_class(CharClass::any())
    }

    /// Captures the text matched by `r` under a fresh group number.
    pub fn capture(&mut self, r: NodeId) -> NodeId {
        let group = self.next_group;
        self.capture_group(group, r)
    }

    /// Captures the text matched by `r` as `group`.
    pub fn capture_group(&mut self, group: u32, r: NodeId) -> NodeId {
        if self.is_void(r) {
            return VOID;
        }
        self.next_group = self.next_group.max(group.saturating_add(1));
        self.intern(Node::Capture { group, inner: r })
    }

    /// Reserves a group number for a capture whose body is built later.
    pub fn next_group(&mut self) -> u32 {
        let group = self.next_group;
        self.next_group = group.saturating_add(1);
        group
    }

    /// Whether `id` matches all of `text`, by successive derivatives.
    pub fn matches(&mut self, id: NodeId, text: impl IntoIterator<Item = char>) -> bool {
        let mut state = id;
        for ch in text {
            state = self.derivative(state, ch);
            if state == VOID {
                return false;
            }
        }
        self.nullable(state)
    }

    /// Pattern text for `id`, in the syntax accepted by the parser.
    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay::new(self, id)
    }
}

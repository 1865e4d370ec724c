use std::fmt::{self, Write};

use super::{CharClass, Interner, Node, NodeId};

/// Binding strength of the context a node is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Top,
    Alternation,
    Concat,
    Star,
}

/// Writes a node as pattern text. Created by [`Interner::display`].
pub struct NodeDisplay<'a> {
    interner: &'a Interner,
    id: NodeId,
}

impl<'a> NodeDisplay<'a> {
    pub(super) fn new(interner: &'a Interner, id: NodeId) -> Self {
        Self { interner, id }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, id: NodeId, prec: Prec) -> fmt::Result {
        match self.interner.node(id) {
            Node::Void => f.write_str("[]"),
            Node::Literal(text) => {
                let group = prec > Prec::Concat && text.chars().nth(1).is_some();
                parenthesized(f, group, |f| write_quoted(f, text))
            }
            Node::Concat(children) => parenthesized(f, prec > Prec::Concat, |f| {
                children
                    .iter()
                    .try_for_each(|&child| self.write(f, child, Prec::Concat))
            }),
            Node::Alternation(children) => parenthesized(f, prec > Prec::Alternation, |f| {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_char('|')?;
                    }
                    self.write(f, child, Prec::Alternation)?;
                }
                Ok(())
            }),
            Node::Star(inner) => {
                self.write(f, *inner, Prec::Star)?;
                f.write_char('*')
            }
            Node::Class(class) => write_class(f, class),
            Node::Capture { inner, .. } => {
                f.write_str("((")?;
                self.write(f, *inner, Prec::Top)?;
                f.write_str("))")
            }
        }
    }
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.id, Prec::Top)
    }
}

fn parenthesized(
    f: &mut fmt::Formatter<'_>,
    group: bool,
    body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    if group {
        f.write_char('(')?;
    }
    body(f)?;
    if group {
        f.write_char(')')?;
    }
    Ok(())
}

/// Characters with a meaning of their own outside a class.
pub(crate) const SPECIAL: &[char] = &['*', '|', '(', ')', '[', ']', '\\'];

/// Characters with a meaning of their own inside a class.
pub(crate) const CLASS_SPECIAL: &[char] = &[']', '\\', '^', '-'];

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for ch in text.chars() {
        if SPECIAL.contains(&ch) {
            f.write_char('\\')?;
        }
        f.write_char(ch)?;
    }
    Ok(())
}

fn write_class_char(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    if CLASS_SPECIAL.contains(&ch) {
        f.write_char('\\')?;
    }
    f.write_char(ch)
}

fn write_class(f: &mut fmt::Formatter<'_>, class: &CharClass) -> fmt::Result {
    f.write_char('[')?;
    if class.is_negated() {
        f.write_char('^')?;
    }
    for &(lo, hi) in class.ranges() {
        write_class_char(f, lo)?;
        if hi != lo {
            f.write_char('-')?;
            write_class_char(f, hi)?;
        }
    }
    f.write_char(']')
}

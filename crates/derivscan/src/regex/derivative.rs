//! Brzozowski derivatives.
//!
//! `D_x(r)` is the expression matching every `s` such that `r` matches `xs`.
//! Results are interned and memoized by `(node, x)`, so walking the same
//! input twice from the same node reaches identical ids.

use std::iter;

use super::{EMPTY, Interner, Node, NodeId, VOID};

impl Interner {
    /// The derivative of `id` with respect to `ch`.
    pub fn derivative(&mut self, id: NodeId, ch: char) -> NodeId {
        self.steps += 1;
        match self.node(id) {
            Node::Void => return VOID,
            Node::Class(class) => return if class.contains(ch) { EMPTY } else { VOID },
            Node::Literal(text) if !text.starts_with(ch) => return VOID,
            _ => {}
        }
        if let Some(&d) = self.derivatives.get(&(id, ch)) {
            return d;
        }
        let d = self.compute_derivative(id, ch);
        log::trace!("D[{ch:?}] {} = {}", self.display(id), self.display(d));
        self.derivatives.insert((id, ch), d);
        d
    }

    fn compute_derivative(&mut self, id: NodeId, ch: char) -> NodeId {
        match self.node(id).clone() {
            Node::Void => VOID,
            Node::Literal(text) => match text.strip_prefix(ch) {
                Some(rest) => self.literal(rest),
                None => VOID,
            },
            Node::Class(class) => {
                if class.contains(ch) {
                    EMPTY
                } else {
                    VOID
                }
            }
            // D(r s t) = D(r) s t | D(s) t | D(t), keeping each term only
            // while every child before it is nullable.
            Node::Concat(children) => {
                let mut result = VOID;
                for (i, &child) in children.iter().enumerate() {
                    let head = self.derivative(child, ch);
                    let rest = children[i + 1..].iter().copied();
                    let term = self.concat(iter::once(head).chain(rest));
                    result = self.alternation([result, term]);
                    if !self.nullable(child) {
                        break;
                    }
                }
                result
            }
            Node::Alternation(children) => {
                let derivatives: Vec<_> = children
                    .iter()
                    .map(|&child| self.derivative(child, ch))
                    .collect();
                self.alternation(derivatives)
            }
            Node::Star(inner) => {
                let head = self.derivative(inner, ch);
                self.concat([head, id])
            }
            Node::Capture { group, inner } => {
                let inner = self.derivative(inner, ch);
                self.capture_group(group, inner)
            }
        }
    }

    /// Number of memoized derivatives.
    pub fn derivative_count(&self) -> usize {
        self.derivatives.len()
    }

    /// Number of derivatives asked for so far, memoized or not.
    pub fn derivative_steps(&self) -> u64 {
        self.steps
    }
}

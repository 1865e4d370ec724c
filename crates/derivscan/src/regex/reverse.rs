use super::{Interner, Node, NodeId};

impl Interner {
    /// An expression matching exactly the reversals of the strings `id`
    /// matches. Capture groups are dropped.
    ///
    /// Reading text backwards through derivatives of the reversal tells, for
    /// every suffix at once, whether `id` matches it.
    pub fn reverse(&mut self, id: NodeId) -> NodeId {
        if let Some(&reversed) = self.reversed.get(&id) {
            return reversed;
        }
        let reversed = match self.node(id).clone() {
            Node::Void | Node::Class(_) => id,
            Node::Literal(text) => {
                let text: String = text.chars().rev().collect();
                self.literal(&text)
            }
            Node::Concat(children) => {
                let parts: Vec<_> = children.iter().rev().map(|&c| self.reverse(c)).collect();
                self.concat(parts)
            }
            Node::Alternation(children) => {
                let parts: Vec<_> = children.iter().map(|&c| self.reverse(c)).collect();
                self.alternation(parts)
            }
            Node::Star(inner) => {
                let inner = self.reverse(inner);
                self.star(inner)
            }
            Node::Capture { inner, .. } => self.reverse(inner),
        };
        self.reversed.insert(id, reversed);
        reversed
    }
}

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::regex::NodeId;

/// States proven unable to reach a match: from `node` at absolute scanner
/// offset `offset`, the derivatives of the remaining input never become
/// nullable.
///
/// Entries are only meaningful for the input they were observed on, so the
/// cache remembers the scanner generation it was filled against and empties
/// itself when asked about another one. Offsets the scanner has moved past
/// are dropped, which keeps the cache as small as the live input window.
#[derive(Debug, Default)]
pub(crate) struct HopelessCache {
    states: BTreeMap<usize, FxHashSet<NodeId>>,
    len: usize,
    generation: Option<u64>,
}

impl HopelessCache {
    /// Prepares the cache for a search starting at `offset` in a scanner
    /// whose sources are identified by `generation`.
    pub(crate) fn sync(&mut self, generation: u64, offset: usize) {
        if self.generation != Some(generation) {
            if self.len > 0 {
                log::debug!("hopeless cache: input changed, dropping {} states", self.len);
            }
            self.states.clear();
            self.len = 0;
            self.generation = Some(generation);
            return;
        }
        self.prune(offset);
    }

    /// Forgets every state before `offset`.
    fn prune(&mut self, offset: usize) {
        if self.states.first_key_value().is_none_or(|(&first, _)| first >= offset) {
            return;
        }
        let kept = self.states.split_off(&offset);
        let dropped: usize = self.states.values().map(FxHashSet::len).sum();
        log::trace!("hopeless cache: pruned {dropped} states before {offset}");
        self.len -= dropped;
        self.states = kept;
    }

    pub(crate) fn contains(&self, offset: usize, node: NodeId) -> bool {
        self.states
            .get(&offset)
            .is_some_and(|nodes| nodes.contains(&node))
    }

    pub(crate) fn commit(&mut self, dead: &[(usize, NodeId)]) {
        if dead.is_empty() {
            return;
        }
        log::debug!("hopeless cache: committing {} states", dead.len());
        for &(offset, node) in dead {
            if self.states.entry(offset).or_default().insert(node) {
                self.len += 1;
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
        self.len = 0;
        self.generation = None;
    }
}

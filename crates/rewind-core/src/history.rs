//! History store - past/future snapshot stacks.
//!
//! The store is a pure state machine over two stacks:
//! - **past**: recorded snapshots, oldest first. The last entry is the
//!   current recorded state and the stack never shrinks below one entry.
//! - **future**: undone snapshots, most recently undone last. Cleared on
//!   every organic record.
//!
//! It does not know where snapshots come from. Deciding whether a mutation
//! is organic is the engine's job.

use crate::codec::Snapshot;

/// Snapshot stacks for one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryStore {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum number of undo steps kept, if bounded.
    max_history: Option<usize>,
}

impl HistoryStore {
    /// Create a store whose past holds only `initial`.
    pub fn seed(initial: Snapshot) -> Self {
        Self {
            past: vec![initial],
            future: Vec::new(),
            max_history: None,
        }
    }

    /// Create a seeded store that keeps at most `max` undo steps.
    pub fn with_max_history(initial: Snapshot, max: usize) -> Self {
        let mut store = Self::seed(initial);
        store.max_history = Some(max);
        store
    }

    /// Drop both stacks and start over from `initial`.
    pub fn reseed(&mut self, initial: Snapshot) {
        self.past.clear();
        self.future.clear();
        self.past.push(initial);
    }

    /// Set the undo depth bound. Existing history is trimmed immediately.
    pub fn set_max_history(&mut self, max: Option<usize>) {
        self.max_history = max;
        self.trim_history();
    }

    pub fn max_history(&self) -> Option<usize> {
        self.max_history
    }

    /// Record an organic mutation.
    pub fn record_organic(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();
        self.trim_history();
    }

    /// Move the current snapshot to the future stack.
    ///
    /// Returns the snapshot to restore, or `None` (without touching either
    /// stack) when only the initial snapshot is left.
    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if self.past.len() <= 1 {
            return None;
        }
        let current = self.past.pop()?;
        self.future.push(current);
        self.past.last()
    }

    /// Move the most recently undone snapshot back onto the past stack.
    ///
    /// Returns that snapshot, or `None` when nothing has been undone.
    pub fn step_forward(&mut self) -> Option<&Snapshot> {
        let next = self.future.pop()?;
        self.past.push(next);
        self.past.last()
    }

    /// The snapshot `step_back` would return, without moving anything.
    pub fn peek_back(&self) -> Option<&Snapshot> {
        if self.past.len() <= 1 {
            return None;
        }
        self.past.get(self.past.len() - 2)
    }

    /// The snapshot `step_forward` would return, without moving anything.
    pub fn peek_forward(&self) -> Option<&Snapshot> {
        self.future.last()
    }

    /// The current recorded state.
    pub fn current(&self) -> &Snapshot {
        // seed() guarantees at least one entry and nothing pops the last one
        &self.past[self.past.len() - 1]
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Past snapshots, oldest first.
    pub fn past(&self) -> &[Snapshot] {
        &self.past
    }

    /// Future snapshots, most recently undone last.
    pub fn future(&self) -> &[Snapshot] {
        &self.future
    }

    /// Trim the oldest past entries to the depth bound.
    fn trim_history(&mut self) {
        if let Some(max) = self.max_history {
            let keep = max + 1;
            if self.past.len() > keep {
                let excess = self.past.len() - keep;
                self.past.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> Snapshot {
        Snapshot::from_bytes(text.as_bytes().to_vec())
    }

    #[test]
    fn test_seed() {
        let store = HistoryStore::seed(snap("a"));

        assert_eq!(store.past_len(), 1);
        assert_eq!(store.future_len(), 0);
        assert_eq!(store.current(), &snap("a"));
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_step_back_at_initial_is_noop() {
        let mut store = HistoryStore::seed(snap("a"));
        let before = store.clone();

        assert!(store.step_back().is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_step_forward_without_future_is_noop() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        let before = store.clone();

        assert!(store.step_forward().is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_step_back_returns_new_top() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        store.record_organic(snap("c"));

        assert_eq!(store.step_back(), Some(&snap("b")));
        assert_eq!(store.past(), &[snap("a"), snap("b")]);
        assert_eq!(store.future(), &[snap("c")]);

        assert_eq!(store.step_back(), Some(&snap("a")));
        assert_eq!(store.future(), &[snap("c"), snap("b")]);

        assert_eq!(store.step_back(), None);
        assert_eq!(store.past_len(), 1);
    }

    #[test]
    fn test_step_forward_returns_moved_snapshot() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        store.record_organic(snap("c"));
        store.step_back();
        store.step_back();

        assert_eq!(store.step_forward(), Some(&snap("b")));
        assert_eq!(store.step_forward(), Some(&snap("c")));
        assert_eq!(store.step_forward(), None);
        assert_eq!(store.past(), &[snap("a"), snap("b"), snap("c")]);
    }

    #[test]
    fn test_record_clears_future() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        store.step_back();
        assert!(store.can_redo());

        store.record_organic(snap("z"));

        assert!(!store.can_redo());
        assert_eq!(store.past(), &[snap("a"), snap("z")]);
    }

    #[test]
    fn test_peek_matches_step() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));

        let peeked = store.peek_back().cloned();
        assert_eq!(store.past_len(), 2);
        assert_eq!(store.step_back().cloned(), peeked);

        let peeked = store.peek_forward().cloned();
        assert_eq!(store.future_len(), 1);
        assert_eq!(store.step_forward().cloned(), peeked);
    }

    #[test]
    fn test_max_history_trims_oldest() {
        let mut store = HistoryStore::with_max_history(snap("0"), 3);
        for i in 1..10 {
            store.record_organic(snap(&i.to_string()));
        }

        assert_eq!(store.past_len(), 4);
        assert_eq!(store.past()[0], snap("6"));
        assert_eq!(store.current(), &snap("9"));
    }

    #[test]
    fn test_max_history_zero_keeps_current() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        store.set_max_history(Some(0));

        assert_eq!(store.past(), &[snap("b")]);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_reseed() {
        let mut store = HistoryStore::seed(snap("a"));
        store.record_organic(snap("b"));
        store.step_back();

        store.reseed(snap("fresh"));

        assert_eq!(store.past(), &[snap("fresh")]);
        assert_eq!(store.future_len(), 0);
    }
}

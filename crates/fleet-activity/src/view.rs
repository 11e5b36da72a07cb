//! Immutable log snapshots

use std::sync::Arc;

use crate::reader::Iterable;
use crate::sequence::{EntryIndex, EntrySequence, SequenceId};

/// A frozen description of which entries existed when it was taken
///
/// The view keeps the underlying sequence alive, so it stays readable after
/// the [`Log`](crate::Log) that produced it is dropped. Entries appended
/// after the snapshot are never visible through it.
#[derive(Debug, Clone)]
pub struct View {
    shared: Arc<EntrySequence>,
    /// First entry in the sequence, `None` if it was empty
    begin: Option<EntryIndex>,
    /// Last entry present at snapshot time (inclusive), `None` if empty
    last: Option<EntryIndex>,
}

impl View {
    pub(crate) fn snapshot(shared: Arc<EntrySequence>) -> Self {
        let extent = shared.extent();
        Self {
            shared,
            begin: extent.map(|(begin, _)| begin),
            last: extent.map(|(_, last)| last),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<EntrySequence> {
        &self.shared
    }

    /// Identity of the sequence this view was taken from
    pub fn sequence_id(&self) -> SequenceId {
        self.shared.id()
    }

    pub fn begin(&self) -> Option<EntryIndex> {
        self.begin
    }

    pub fn last(&self) -> Option<EntryIndex> {
        self.last
    }

    /// Number of entries covered by the snapshot
    pub fn len(&self) -> usize {
        match (self.begin, self.last) {
            (Some(begin), Some(last)) => last.0 - begin.0 + 1,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Every entry in the snapshot, independent of any reader
    pub fn entries(&self) -> Iterable {
        Iterable::new(Arc::clone(&self.shared), self.begin, self.last)
    }
}

#[cfg(test)]
mod tests {
    use crate::Log;

    #[test]
    fn test_empty_view() {
        let log = Log::new();
        let view = log.view();

        assert!(view.is_empty());
        assert!(view.begin().is_none());
        assert!(view.last().is_none());
        assert_eq!(view.entries().count(), 0);
    }

    #[test]
    fn test_view_is_frozen() {
        let log = Log::new();
        log.info("a");
        log.info("b");
        let view = log.view();

        log.info("c");
        log.info("d");

        assert_eq!(view.len(), 2);
        let texts: Vec<_> = view.entries().map(|e| e.text().to_string()).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(log.view().len(), 4);
    }

    #[test]
    fn test_views_share_identity() {
        let log = Log::new();
        let first = log.view();
        log.warn("x");
        let second = log.view();

        assert_eq!(first.sequence_id(), second.sequence_id());
        assert_eq!(first.sequence_id(), log.sequence_id());
    }

    #[test]
    fn test_view_outlives_log() {
        let log = Log::new();
        log.error("last words");
        let view = log.view();
        drop(log);

        let entry = view.entries().next().unwrap();
        assert_eq!(entry.text(), "last words");
    }
}

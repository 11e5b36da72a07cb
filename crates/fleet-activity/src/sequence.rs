//! Append-only entry storage shared between a log and its views
//!
//! An [`EntrySequence`] only ever grows. Positions are [`EntryIndex`]
//! handles rather than references, and because nothing is ever removed a
//! handle handed out once stays valid for the lifetime of the sequence.
//! Entries are stored behind `Arc` so a reader can hold one without keeping
//! the storage lock.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

static NEXT_SEQUENCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one entry sequence
///
/// Every new sequence mints a fresh id, independent of which [`Log`]
/// owns it. Owners that rebuild a log under a known identity (for example
/// a task restored from a backup) can supply the id explicitly through
/// [`Log::with_sequence_id`].
///
/// [`Log`]: crate::Log
/// [`Log::with_sequence_id`]: crate::Log::with_sequence_id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub u64);

impl SequenceId {
    /// Mint a process-unique id
    pub fn generate() -> Self {
        Self(NEXT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seq#{}", self.0)
    }
}

/// Stable position of an entry within its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryIndex(pub usize);

impl EntryIndex {
    /// The position immediately after this one in log order
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The append-only backing store of a log
pub struct EntrySequence {
    id: SequenceId,
    entries: RwLock<Vec<Arc<Entry>>>,
}

impl EntrySequence {
    pub(crate) fn new(id: SequenceId) -> Arc<Self> {
        Arc::new(Self {
            id,
            entries: RwLock::new(Vec::new()),
        })
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    /// Append an entry, returning its position
    pub(crate) fn push(&self, entry: Entry) -> EntryIndex {
        let mut entries = self.entries.write();
        entries.push(Arc::new(entry));
        EntryIndex(entries.len() - 1)
    }

    /// Fetch the entry at `index`
    pub(crate) fn get(&self, index: EntryIndex) -> Option<Arc<Entry>> {
        self.entries.read().get(index.0).cloned()
    }

    /// First and last positions currently present, or `None` when empty
    pub(crate) fn extent(&self) -> Option<(EntryIndex, EntryIndex)> {
        let len = self.entries.read().len();
        (len > 0).then(|| (EntryIndex(0), EntryIndex(len - 1)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for EntrySequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrySequence")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

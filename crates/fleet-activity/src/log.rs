//! The activity log
//!
//! A [`Log`] is written by whatever narrates a task's progress. Consumers
//! never touch the log directly: they take a [`View`] and hand it to their
//! own [`Reader`](crate::Reader).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::entry::{Entry, Tier};
use crate::sequence::{EntrySequence, SequenceId};
use crate::view::View;

/// Time source for log entries
///
/// Implemented for any `Fn() -> DateTime<Utc>`, so tests can pass a closure
/// over a fixed or stepped time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Append-only activity log
pub struct Log {
    clock: Box<dyn Clock>,
    entries: Arc<EntrySequence>,
}

impl Log {
    /// Create an empty log stamped with wall-clock time
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty log with a custom time source
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_sequence_id(SequenceId::generate(), clock)
    }

    /// Create an empty log whose storage carries a known identity
    ///
    /// Readers that tracked an earlier sequence under the same id start
    /// over once that sequence is gone.
    pub fn with_sequence_id(id: SequenceId, clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            entries: EntrySequence::new(id),
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(Tier::Info, text.into());
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.push(Tier::Warning, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Tier::Error, text.into());
    }

    /// Append an existing entry, keeping its tier, time and text
    pub fn insert(&self, entry: Entry) {
        let index = self.entries.push(entry);
        trace!(sequence = %self.entries.id(), index = index.0, "Inserted log entry");
    }

    /// Take a snapshot of the entries present right now
    pub fn view(&self) -> View {
        View::snapshot(Arc::clone(&self.entries))
    }

    pub fn sequence_id(&self) -> SequenceId {
        self.entries.id()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&self, tier: Tier, text: String) {
        let index = self.entries.push(Entry::new(tier, self.clock.now(), text));
        trace!(sequence = %self.entries.id(), index = index.0, %tier, "Appended log entry");
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log").field("entries", &self.entries).finish()
    }
}

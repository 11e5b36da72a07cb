//! Incremental, per-consumer log reading
//!
//! A [`Reader`] remembers, separately for every sequence identity it has
//! been shown, the position it should resume from. Each call to
//! [`Reader::iterate`] yields only the entries of the given [`View`] that
//! this reader has not seen yet, then moves the resume point past the
//! view's last entry.
//!
//! ## Resume semantics
//!
//! The resume point is exclusive: once an entry has been delivered as the
//! last item of one `iterate` call it is not delivered again by the next
//! call on the same identity. The resume point never moves backwards, so
//! handing a reader an older view after a newer one yields nothing.
//!
//! ## Identity reuse
//!
//! Memory is keyed by [`SequenceId`], but each slot also keeps a weak handle
//! to the sequence it was tracking. If that sequence has been destroyed, or
//! a different live sequence turns up under the same id, the slot starts
//! over from the new view's first entry instead of trusting a stale resume
//! point.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::entry::Entry;
use crate::sequence::{EntryIndex, EntrySequence, SequenceId};
use crate::view::View;

/// What a reader remembers about one sequence identity
#[derive(Debug)]
struct Memory {
    weak: Weak<EntrySequence>,
    /// Next position to deliver, `None` until a non-empty view is read
    next: Option<EntryIndex>,
}

impl Memory {
    fn new() -> Self {
        Self {
            weak: Weak::new(),
            next: None,
        }
    }

    /// Whether this slot is still tracking `shared`
    fn tracks(&self, shared: &Arc<EntrySequence>) -> bool {
        self.weak
            .upgrade()
            .is_some_and(|tracked| Arc::ptr_eq(&tracked, shared))
    }
}

/// Per-consumer read progress across any number of logs
#[derive(Debug, Default)]
pub struct Reader {
    memories: HashMap<SequenceId, Memory>,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entries of `view` that this reader has not been given yet
    ///
    /// Progress is recorded here, not while the returned [`Iterable`] is
    /// consumed, so dropping it early does not rewind the reader.
    pub fn iterate(&mut self, view: &View) -> Iterable {
        let id = view.sequence_id();
        let shared = view.shared();
        let memory = self.memories.entry(id).or_insert_with(Memory::new);

        if memory.tracks(shared) {
            if memory.next.is_none() {
                memory.next = view.begin();
            }
        } else {
            if memory.next.is_some() {
                debug!(sequence = %id, "Sequence identity reused, resetting reader position");
            }
            memory.weak = Arc::downgrade(shared);
            memory.next = view.begin();
        }

        let iterable = Iterable::new(Arc::clone(shared), memory.next, view.last());

        if let Some(last) = view.last() {
            let resume = last.next();
            memory.next = Some(memory.next.map_or(resume, |next| next.max(resume)));
        }

        iterable
    }

    /// Number of sequence identities this reader has memory for
    pub fn tracked(&self) -> usize {
        self.memories.len()
    }
}

/// Forward-only position within an [`Iterable`]
#[derive(Debug, Clone, Copy)]
pub enum Cursor {
    /// Pointing at `position`; `boundary` is the last entry to deliver
    Active {
        position: EntryIndex,
        boundary: EntryIndex,
    },
    /// Exhausted
    Done,
}

impl Cursor {
    /// Move to the next entry, or to [`Cursor::Done`] after the boundary
    ///
    /// A cursor already past its boundary finishes immediately.
    pub fn advance(&mut self) {
        if let Self::Active { position, boundary } = *self {
            *self = if position >= boundary {
                Self::Done
            } else {
                Self::Active {
                    position: position.next(),
                    boundary,
                }
            };
        }
    }

    /// The entry this cursor points at, `None` once done or past the boundary
    pub fn position(&self) -> Option<EntryIndex> {
        match self {
            Self::Active { position, boundary } if position <= boundary => Some(*position),
            _ => None,
        }
    }

    /// Entries left to deliver, including the current one
    pub fn remaining(&self) -> usize {
        match self {
            Self::Active { position, boundary } => boundary
                .0
                .checked_sub(position.0)
                .map_or(0, |left| left + 1),
            Self::Done => 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.position().is_none()
    }
}

impl PartialEq for Cursor {
    /// Active cursors are equal when they point at the same entry; `Done`
    /// only equals `Done`
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Active { position: a, .. }, Self::Active { position: b, .. }) => a == b,
            (Self::Done, Self::Done) => true,
            _ => false,
        }
    }
}

impl Eq for Cursor {}

/// A single pass over newly available entries
///
/// Holds the sequence alive until it is dropped, even if the producing log
/// and every view are gone.
#[derive(Debug)]
pub struct Iterable {
    shared: Arc<EntrySequence>,
    cursor: Cursor,
}

impl Iterable {
    pub(crate) fn new(
        shared: Arc<EntrySequence>,
        start: Option<EntryIndex>,
        last: Option<EntryIndex>,
    ) -> Self {
        let cursor = match (start, last) {
            (Some(position), Some(boundary)) if position <= boundary => {
                Cursor::Active { position, boundary }
            }
            _ => Cursor::Done,
        };

        Self { shared, cursor }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn sequence_id(&self) -> SequenceId {
        self.shared.id()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_done()
    }
}

impl Iterator for Iterable {
    type Item = Arc<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.cursor.position()?;
        let entry = self.shared.get(position);
        match entry {
            Some(_) => self.cursor.advance(),
            None => self.cursor = Cursor::Done,
        }
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iterable {}

impl std::iter::FusedIterator for Iterable {}

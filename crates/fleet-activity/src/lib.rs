//! # Fleet Activity
//!
//! Append-only activity logs for fleet tasks, read incrementally by any
//! number of independent consumers.
//!
//! A task narrates its progress into a [`Log`]. A consumer takes a [`View`]
//! (an immutable snapshot) and passes it to its own [`Reader`], which hands
//! back only the entries that consumer has not seen yet.
//!
//! ## Guarantees
//!
//! - **Snapshot isolation**: a view never exposes entries appended after it
//!   was taken.
//! - **Forward progress**: a reader delivers every entry of a growing log
//!   exactly once, in log order.
//! - **Independent readers**: one reader's progress never affects another's.
//! - **Identity reuse**: when a log's storage is destroyed and a new one
//!   appears under the same [`SequenceId`], readers start over instead of
//!   resuming from a stale position.
//!
//! ## Example
//!
//! ```rust
//! use fleet_activity::{Log, Reader};
//!
//! let log = Log::new();
//! log.info("Going to pick up");
//! log.warn("Corridor blocked, rerouting");
//!
//! let mut reader = Reader::new();
//! let seen: Vec<_> = reader.iterate(&log.view()).collect();
//! assert_eq!(seen.len(), 2);
//!
//! log.info("Picked up");
//! let seen: Vec<_> = reader.iterate(&log.view()).collect();
//! assert_eq!(seen[0].text(), "Picked up");
//! ```
//!
//! ## Threading
//!
//! Appends and snapshots are serialized internally, so a [`Log`] may be
//! shared across threads and views read while the log keeps growing.

pub mod entry;
pub mod log;
pub mod reader;
pub mod sequence;
pub mod sink;
pub mod view;

pub use entry::{Entry, Tier};
pub use log::{Clock, Log, SystemClock};
pub use reader::{Cursor, Iterable, Reader};
pub use sequence::{EntryIndex, EntrySequence, SequenceId};
pub use sink::ActivitySink;
pub use view::View;

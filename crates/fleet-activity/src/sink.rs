//! Forwarding activity into `tracing`
//!
//! An [`ActivitySink`] is a diagnostic consumer that polls log views and
//! re-emits every entry it has not seen yet as a tracing event at the
//! matching level.

use tracing::{error, info, warn};

use crate::entry::Tier;
use crate::reader::Reader;
use crate::view::View;

/// Polling consumer that mirrors log entries into the tracing pipeline
#[derive(Debug)]
pub struct ActivitySink {
    label: String,
    reader: Reader,
}

impl ActivitySink {
    /// Create a sink; `label` is attached to every forwarded event
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reader: Reader::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Forward the entries of `view` not yet forwarded by this sink
    ///
    /// Returns how many entries were emitted.
    pub fn drain(&mut self, view: &View) -> usize {
        let sequence = view.sequence_id();
        let mut forwarded = 0;

        for entry in self.reader.iterate(view) {
            let time = entry.time();
            match entry.tier() {
                Tier::Info => info!(
                    sink = %self.label,
                    %sequence,
                    entry_time = %time,
                    "{}",
                    entry.text()
                ),
                Tier::Warning => warn!(
                    sink = %self.label,
                    %sequence,
                    entry_time = %time,
                    "{}",
                    entry.text()
                ),
                Tier::Error => error!(
                    sink = %self.label,
                    %sequence,
                    entry_time = %time,
                    "{}",
                    entry.text()
                ),
            }
            forwarded += 1;
        }

        forwarded
    }
}

//! Task bookings
//!
//! A [`Booking`] is the task-side record of the request a task was created
//! for. It carries the same identifying information as a [`Tag`] so a task
//! can report on itself after the request is gone.

use chrono::{DateTime, Utc};

use crate::priority::ConstPriorityPtr;
use crate::request::Tag;

/// Booking information for an active task
#[derive(Debug, Clone)]
pub struct Booking {
    id: String,
    earliest_start_time: DateTime<Utc>,
    priority: Option<ConstPriorityPtr>,
    automatic: bool,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        earliest_start_time: DateTime<Utc>,
        priority: Option<ConstPriorityPtr>,
        automatic: bool,
    ) -> Self {
        Self {
            id: id.into(),
            earliest_start_time,
            priority,
            automatic,
        }
    }

    /// The unique id of the request this task was booked for
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The earliest time the task may begin
    pub fn earliest_start_time(&self) -> DateTime<Utc> {
        self.earliest_start_time
    }

    pub fn priority(&self) -> Option<&ConstPriorityPtr> {
        self.priority.as_ref()
    }

    /// Whether the originating request was generated automatically
    pub fn automatic(&self) -> bool {
        self.automatic
    }
}

impl From<&Tag> for Booking {
    fn from(tag: &Tag) -> Self {
        Self::new(
            tag.id(),
            tag.earliest_start_time(),
            tag.priority().cloned(),
            tag.automatic(),
        )
    }
}

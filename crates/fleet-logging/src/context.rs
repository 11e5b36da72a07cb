//! Task context injection for logging
//!
//! This module provides thread-local storage for the task a thread is
//! currently working on. [`TaskContextGuard::span`] opens a span whose
//! fields carry the task and instance ids into formatted output, and
//! [`TaskContextLayer`](crate::TaskContextLayer) attaches the same data as
//! a span extension for layers that read it directly.

use std::cell::RefCell;

use fleet_core::{Booking, Tag};
use uuid::Uuid;

/// Task context data stored in thread-local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContextData {
    /// Id of the request the task was booked for
    pub task_id: String,
    /// Whether the request was generated automatically
    pub automatic: bool,
    /// Unique id for this run of the task
    pub instance_id: Uuid,
}

thread_local! {
    static TASK_CONTEXT: RefCell<Option<TaskContextData>> = const { RefCell::new(None) };
}

/// RAII guard for task context
///
/// Creating the guard sets the task context for the current thread; dropping
/// it restores whatever context was active before.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use fleet_core::Booking;
/// use fleet_logging::context::TaskContextGuard;
///
/// let booking = Booking::new("delivery-12", Utc::now(), None, false);
/// let _guard = TaskContextGuard::new(&booking);
///
/// assert_eq!(TaskContextGuard::current_task_id().as_deref(), Some("delivery-12"));
///
/// // Events inside this span carry `task_id` and `instance_id`
/// let _span = _guard.span().entered();
/// ```
pub struct TaskContextGuard {
    data: TaskContextData,
    previous: Option<TaskContextData>,
}

impl TaskContextGuard {
    /// Enter the context of a booked task
    pub fn new(booking: &Booking) -> Self {
        Self::with_instance_id(booking, Uuid::new_v4())
    }

    /// Enter the context of a task with a known instance id
    ///
    /// Useful to keep the same instance id when a task is resumed.
    pub fn with_instance_id(booking: &Booking, instance_id: Uuid) -> Self {
        Self::enter(TaskContextData {
            task_id: booking.id().to_string(),
            automatic: booking.automatic(),
            instance_id,
        })
    }

    /// Enter the context of a request that has not been booked yet
    pub fn from_tag(tag: &Tag) -> Self {
        Self::new(&Booking::from(tag))
    }

    fn enter(data: TaskContextData) -> Self {
        let previous = TASK_CONTEXT.with(|ctx| ctx.borrow_mut().replace(data.clone()));
        Self { data, previous }
    }

    /// The context this guard installed
    pub fn data(&self) -> &TaskContextData {
        &self.data
    }

    /// Open an `info` span recording this task's ids as span fields
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "task",
            task_id = %self.data.task_id,
            instance_id = %self.data.instance_id,
            automatic = self.data.automatic,
        )
    }

    /// Get the current task context (if any)
    pub fn current() -> Option<TaskContextData> {
        TASK_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    pub fn current_task_id() -> Option<String> {
        Self::current().map(|ctx| ctx.task_id)
    }

    pub fn current_instance_id() -> Option<Uuid> {
        Self::current().map(|ctx| ctx.instance_id)
    }
}

impl Drop for TaskContextGuard {
    fn drop(&mut self) {
        TASK_CONTEXT.with(|ctx| *ctx.borrow_mut() = self.previous.take());
    }
}

/// Convenience macro to run a block inside a task context and its span
///
/// # Example
///
/// ```ignore
/// with_task_context!(&booking, {
///     tracing::info!("Starting phase");
/// });
/// ```
#[macro_export]
macro_rules! with_task_context {
    ($booking:expr, $body:block) => {{
        let _guard = $crate::context::TaskContextGuard::new($booking);
        let _span = _guard.span().entered();
        $body
    }};
}

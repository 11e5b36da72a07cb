//! Custom tracing layers
//!
//! This module provides the layer that attaches task context to spans and
//! the JSONL formatting layer used for console and file output.

use tracing::{Subscriber, span};
use tracing_subscriber::{
    layer::{Context, Layer},
    registry::LookupSpan,
};

use crate::config::JsonlConfig;
use crate::context::{TaskContextData, TaskContextGuard};

/// Layer that attaches the active task context to new spans
///
/// When a [`TaskContextGuard`] is active, every span created on that
/// thread gets a [`TaskContextExtension`] recording which task opened it.
/// The fmt layers only print declared span fields, so output that should
/// show the ids goes through [`TaskContextGuard::span`].
#[derive(Debug, Default)]
pub struct TaskContextLayer;

impl TaskContextLayer {
    pub fn new() -> Self {
        Self
    }
}

/// Extension data stored on spans, read through `extensions()` by layers
/// that correlate spans with tasks
#[derive(Debug, Clone)]
pub struct TaskContextExtension {
    pub data: TaskContextData,
}

impl<S> Layer<S> for TaskContextLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, _attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            // Spans opened outside any task scope are left untouched
            if let Some(task_ctx) = TaskContextGuard::current() {
                span.extensions_mut()
                    .insert(TaskContextExtension { data: task_ctx });
            }
        }
    }
}

/// Create a JSONL formatting layer
///
/// Used for both JSONL console output and file output, configured by
/// [`JsonlConfig`].
pub fn jsonl_layer<S, W>(writer: W, config: &JsonlConfig) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup> + 'static,
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(config.include_current_span)
        .with_span_list(config.include_spans)
        .flatten_event(config.flatten_events)
        .with_target(config.include_target)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_ids(config.include_thread_info)
        .with_thread_names(config.include_thread_info)
        .with_writer(writer)
}

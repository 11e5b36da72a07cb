//! Task requests and their cost models
//!
//! This module provides the [`Description`] and [`Model`] traits that every
//! kind of request implements, plus the [`Tag`] and [`Request`] types that
//! carry them through the allocator.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::RequestError;
use crate::estimate::{Constraints, Estimate, EstimateCache, Parameters, State};
use crate::priority::ConstPriorityPtr;

/// Cost model for one request on one robot
///
/// Implementations must be deterministic for the same inputs so the
/// allocator can compare candidate assignments.
pub trait Model: Send + Sync {
    /// Estimate the state of the robot when the request is finished, along
    /// with the time the robot has to wait before commencing it
    ///
    /// Returns `None` if the request cannot be feasibly performed starting
    /// from `initial_state` under `constraints`.
    fn estimate_finish(
        &self,
        initial_state: &State,
        constraints: &Constraints,
        estimate_cache: &EstimateCache,
    ) -> Option<Estimate>;

    /// The component of the request's duration that does not depend on the
    /// robot's starting state; `Duration::MAX` if it cannot be represented
    fn invariant_duration(&self) -> Duration;
}

/// What a request asks for
///
/// Each kind of request (delivery, patrol, clean, ...) implements this to
/// produce a [`Model`] tailored to a particular robot.
pub trait Description: Debug + Send + Sync {
    /// Build a model for this request
    ///
    /// # Arguments
    ///
    /// * `earliest_start_time` - The earliest time execution should begin
    /// * `parameters` - The parameters describing the robot
    fn make_model(
        &self,
        earliest_start_time: DateTime<Utc>,
        parameters: &Parameters,
    ) -> Arc<dyn Model>;
}

pub type ConstDescriptionPtr = Arc<dyn Description>;

/// Identifying information for a request
#[derive(Debug, Clone)]
pub struct Tag {
    id: String,
    earliest_start_time: DateTime<Utc>,
    priority: Option<ConstPriorityPtr>,
    automatic: bool,
}

impl Tag {
    /// Create a new tag
    ///
    /// `priority` is `None` for requests outside any priority scheme.
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

    /// Create a new tag, rejecting an empty id
    pub fn try_new(
        id: impl Into<String>,
        earliest_start_time: DateTime<Utc>,
        priority: Option<ConstPriorityPtr>,
        automatic: bool,
    ) -> Result<Self, RequestError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RequestError::EmptyId);
        }
        Ok(Self::new(id, earliest_start_time, priority, automatic))
    }

    /// The unique id for this request
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The earliest time this request may begin
    pub fn earliest_start_time(&self) -> DateTime<Utc> {
        self.earliest_start_time
    }

    /// The priority of this request
    pub fn priority(&self) -> Option<&ConstPriorityPtr> {
        self.priority.as_ref()
    }

    /// Whether this request was generated automatically
    pub fn automatic(&self) -> bool {
        self.automatic
    }
}

pub type ConstTagPtr = Arc<Tag>;

/// A request: a tag plus a description
#[derive(Debug, Clone)]
pub struct Request {
    tag: ConstTagPtr,
    description: ConstDescriptionPtr,
}

impl Request {
    /// Create a request from an existing tag
    pub fn new(tag: ConstTagPtr, description: ConstDescriptionPtr) -> Self {
        Self { tag, description }
    }

    /// Create a request, building its tag in place
    pub fn from_parts(
        id: impl Into<String>,
        earliest_start_time: DateTime<Utc>,
        priority: Option<ConstPriorityPtr>,
        description: ConstDescriptionPtr,
        automatic: bool,
    ) -> Self {
        Self::new(
            Arc::new(Tag::new(id, earliest_start_time, priority, automatic)),
            description,
        )
    }

    pub fn tag(&self) -> &ConstTagPtr {
        &self.tag
    }

    pub fn description(&self) -> &ConstDescriptionPtr {
        &self.description
    }

    /// Build the model for this request on a robot with `parameters`
    pub fn make_model(&self, parameters: &Parameters) -> Arc<dyn Model> {
        self.description
            .make_model(self.tag.earliest_start_time(), parameters)
    }
}

pub type ConstRequestPtr = Arc<Request>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDescription;
    use crate::priority::BinaryPriority;

    /// Test that the traits are object-safe
    fn _assert_object_safe(_: &dyn Model, _: &dyn Description) {}

    #[test]
    fn test_tag_accessors() {
        let start = Utc::now();
        let tag = Tag::new("delivery-1", start, Some(BinaryPriority::high()), true);

        assert_eq!(tag.id(), "delivery-1");
        assert_eq!(tag.earliest_start_time(), start);
        assert!(tag.automatic());
        let priority = tag.priority().unwrap();
        assert_eq!(BinaryPriority::from_ptr(priority), Some(BinaryPriority::High));
    }

    #[test]
    fn test_tag_without_priority() {
        let tag = Tag::new("patrol", Utc::now(), None, false);
        assert!(tag.priority().is_none());
        assert!(!tag.automatic());
    }

    #[test]
    fn test_try_new_rejects_empty_id() {
        let result = Tag::try_new("", Utc::now(), None, false);
        assert_eq!(result.unwrap_err(), RequestError::EmptyId);
    }

    #[test]
    fn test_request_shares_tag() {
        let tag = Arc::new(Tag::new("r", Utc::now(), None, false));
        let description: ConstDescriptionPtr = Arc::new(MockDescription::new(1, 2));
        let request = Request::new(tag.clone(), description);

        assert!(Arc::ptr_eq(request.tag(), &tag));
    }

    #[test]
    fn test_request_builds_model() {
        let description: ConstDescriptionPtr = Arc::new(MockDescription::new(0, 3));
        let request = Request::from_parts("r", Utc::now(), None, description, false);

        let model = request.make_model(&Parameters::default());
        // Pickup to dropoff is 3 hops of 10s each
        assert_eq!(model.invariant_duration(), Duration::from_secs(30));
    }
}

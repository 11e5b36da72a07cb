//! # Fleet Core
//!
//! Core contracts for describing task requests to a fleet task allocator.
//!
//! A [`Request`] pairs a [`Tag`] (who, when, how urgent) with a
//! [`Description`] (what). The allocator asks the description for a
//! [`Model`] of the robot that will perform it, and the model answers two
//! questions:
//!
//! - How long does this request take no matter where the robot starts
//!   ([`Model::invariant_duration`])? Used for coarse filtering.
//! - Starting from a given [`State`], when would the robot finish and how
//!   long must it wait before starting ([`Model::estimate_finish`])? `None`
//!   means the request cannot be feasibly scheduled from that state.
//!
//! ## Key Types
//!
//! - [`Tag`] / [`Booking`]: Identity, earliest start time, priority and
//!   the automatic-generation flag
//! - [`State`], [`Constraints`], [`Parameters`]: Inputs to estimation
//! - [`Estimate`]: Finish state plus the time to wait until
//! - [`EstimateCache`]: Shared memo of expensive travel estimates

pub mod booking;
pub mod error;
pub mod estimate;
pub mod mock;
pub mod priority;
pub mod request;

// Re-export main types
pub use booking::*;
pub use error::*;
pub use estimate::*;
pub use priority::*;
pub use request::*;

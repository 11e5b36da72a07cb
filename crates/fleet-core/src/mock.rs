//! Mock request description for testing
//!
//! Provides a pickup-then-dropoff delivery whose travel cost is a fixed
//! amount per waypoint hop, so allocator and logging code can be exercised
//! without a navigation graph.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use fleet_core::mock::MockDescription;
//! use fleet_core::{Constraints, EstimateCache, Parameters, Request, State};
//!
//! let request = Request::from_parts(
//!     "delivery-1",
//!     Utc::now(),
//!     None,
//!     Arc::new(MockDescription::new(2, 5)),
//!     false,
//! );
//!
//! let model = request.make_model(&Parameters::default());
//! let start = State::new(0, Utc::now(), 1.0).unwrap();
//! let estimate = model
//!     .estimate_finish(&start, &Constraints::default(), &EstimateCache::new())
//!     .unwrap();
//! assert_eq!(estimate.finish_state.waypoint, 5);
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::estimate::{CacheElement, Constraints, Estimate, EstimateCache, Parameters, State};
use crate::request::{Description, Model};

/// A delivery from `pickup` to `dropoff`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDescription {
    pub pickup: usize,
    pub dropoff: usize,
}

impl MockDescription {
    pub fn new(pickup: usize, dropoff: usize) -> Self {
        Self { pickup, dropoff }
    }
}

impl Description for MockDescription {
    fn make_model(
        &self,
        earliest_start_time: DateTime<Utc>,
        parameters: &Parameters,
    ) -> Arc<dyn Model> {
        Arc::new(MockModel::new(*self, earliest_start_time, *parameters))
    }
}

/// Model for [`MockDescription`]
///
/// A delivery whose pickup-to-dropoff leg cannot be represented (too many
/// hops, or a travel time that overflows) is infeasible from every state.
#[derive(Debug, Clone)]
pub struct MockModel {
    description: MockDescription,
    earliest_start_time: DateTime<Utc>,
    parameters: Parameters,
    invariant: Option<CacheElement>,
}

impl MockModel {
    pub fn new(
        description: MockDescription,
        earliest_start_time: DateTime<Utc>,
        parameters: Parameters,
    ) -> Self {
        let invariant = travel(&parameters, description.pickup, description.dropoff);
        Self {
            description,
            earliest_start_time,
            parameters,
            invariant,
        }
    }
}

impl Model for MockModel {
    fn estimate_finish(
        &self,
        initial_state: &State,
        constraints: &Constraints,
        estimate_cache: &EstimateCache,
    ) -> Option<Estimate> {
        let invariant = self.invariant?;
        let approach = estimate_cache.try_get_or_insert_with(
            initial_state.waypoint,
            self.description.pickup,
            || travel(&self.parameters, initial_state.waypoint, self.description.pickup),
        )?;

        // Leave late enough to arrive no earlier than the requested start
        let approach_delta = to_delta(approach.duration)?;
        let departure = self
            .earliest_start_time
            .checked_sub_signed(approach_delta)
            .unwrap_or(initial_state.time);
        let wait_until = departure.max(initial_state.time);
        let finish_time = wait_until
            .checked_add_signed(approach_delta)?
            .checked_add_signed(to_delta(invariant.duration)?)?;

        let mut battery_soc = initial_state.battery_soc;
        if constraints.drain_battery {
            battery_soc -= approach.dsoc + invariant.dsoc;
            if battery_soc < constraints.threshold_soc {
                debug!(
                    battery_soc,
                    threshold = constraints.threshold_soc,
                    "Mock delivery infeasible from this state"
                );
                return None;
            }
        }

        let finish_state = State {
            waypoint: self.description.dropoff,
            time: finish_time,
            battery_soc,
        };

        Some(Estimate::new(finish_state, wait_until))
    }

    /// Saturates at `Duration::MAX` when the leg cannot be represented
    fn invariant_duration(&self) -> Duration {
        self.invariant.map_or(Duration::MAX, |leg| leg.duration)
    }
}

/// Cost of travelling between two waypoints, `None` if it overflows
fn travel(parameters: &Parameters, from: usize, to: usize) -> Option<CacheElement> {
    let hops = u32::try_from(from.abs_diff(to)).ok()?;
    Some(CacheElement {
        duration: parameters.hop_duration.checked_mul(hops)?,
        dsoc: parameters.hop_soc_drain * f64::from(hops),
    })
}

fn to_delta(duration: Duration) -> Option<TimeDelta> {
    TimeDelta::from_std(duration).ok()
}

//! Inputs and outputs of request estimation
//!
//! A [`Model`](crate::Model) turns an initial [`State`] into an
//! [`Estimate`], subject to [`Constraints`] and using an [`EstimateCache`]
//! to avoid recomputing travel between the same pair of waypoints.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::RequestError;

/// Snapshot of a robot's situation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Waypoint the robot is at (or will be at)
    pub waypoint: usize,
    /// Time at which the robot is at `waypoint`
    pub time: DateTime<Utc>,
    /// Battery state of charge in `[0.0, 1.0]`
    pub battery_soc: f64,
}

impl State {
    /// Create a new state, validating the state of charge
    pub fn new(
        waypoint: usize,
        time: DateTime<Utc>,
        battery_soc: f64,
    ) -> Result<Self, RequestError> {
        if !(0.0..=1.0).contains(&battery_soc) {
            return Err(RequestError::InvalidStateOfCharge(battery_soc.to_string()));
        }

        Ok(Self {
            waypoint,
            time,
            battery_soc,
        })
    }
}

/// Planning constraints shared by every request in a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// The robot must never drop below this state of charge
    pub threshold_soc: f64,
    /// State of charge a recharge brings the robot back to
    pub recharge_soc: f64,
    /// Whether battery drain is accounted for at all
    pub drain_battery: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            threshold_soc: 0.2,
            recharge_soc: 1.0,
            drain_battery: true,
        }
    }
}

/// Robot parameters used when building a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Travel time between two adjacent waypoints
    pub hop_duration: Duration,
    /// State of charge consumed per waypoint hop
    pub hop_soc_drain: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            hop_duration: Duration::from_secs(10),
            hop_soc_drain: 0.005,
        }
    }
}

/// Result of estimating a request from an initial state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Where and when the robot ends up
    pub finish_state: State,
    /// Time the robot must wait until before it can begin
    pub wait_until: DateTime<Utc>,
}

impl Estimate {
    pub fn new(finish_state: State, wait_until: DateTime<Utc>) -> Self {
        Self {
            finish_state,
            wait_until,
        }
    }
}

/// Memoized travel cost between two waypoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheElement {
    pub duration: Duration,
    pub dsoc: f64,
}

/// Thread-safe cache of travel estimates keyed by (start, finish) waypoint
#[derive(Debug, Default)]
pub struct EstimateCache {
    memory: DashMap<(usize, usize), CacheElement>,
}

impl EstimateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached travel estimate
    pub fn get(&self, start: usize, finish: usize) -> Option<CacheElement> {
        self.memory.get(&(start, finish)).map(|e| *e.value())
    }

    /// Record a travel estimate
    pub fn set(&self, start: usize, finish: usize, element: CacheElement) {
        trace!(start, finish, duration = ?element.duration, "Caching travel estimate");
        self.memory.insert((start, finish), element);
    }

    /// Fetch the estimate, computing and caching it on a miss
    pub fn get_or_insert_with<F>(&self, start: usize, finish: usize, compute: F) -> CacheElement
    where
        F: FnOnce() -> CacheElement,
    {
        *self
            .memory
            .entry((start, finish))
            .or_insert_with(compute)
            .value()
    }

    /// Fetch the estimate, computing it on a miss; a failed computation is
    /// not cached
    pub fn try_get_or_insert_with<F>(
        &self,
        start: usize,
        finish: usize,
        compute: F,
    ) -> Option<CacheElement>
    where
        F: FnOnce() -> Option<CacheElement>,
    {
        if let Some(element) = self.get(start, finish) {
            return Some(element);
        }

        let element = compute()?;
        self.set(start, finish, element);
        Some(element)
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_rejects_bad_soc() {
        let now = Utc::now();
        assert!(State::new(0, now, 0.5).is_ok());
        assert!(matches!(
            State::new(0, now, 1.5),
            Err(RequestError::InvalidStateOfCharge(_))
        ));
    }

    #[test]
    fn test_cache_get_set() {
        let cache = EstimateCache::new();
        assert!(cache.get(1, 2).is_none());

        let element = CacheElement {
            duration: Duration::from_secs(30),
            dsoc: 0.01,
        };
        cache.set(1, 2, element);

        assert_eq!(cache.get(1, 2), Some(element));
        // Direction matters
        assert!(cache.get(2, 1).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_computes_once() {
        let cache = EstimateCache::new();
        let mut calls = 0;
        let element = CacheElement {
            duration: Duration::from_secs(5),
            dsoc: 0.0,
        };

        cache.get_or_insert_with(3, 4, || {
            calls += 1;
            element
        });
        let second = cache.get_or_insert_with(3, 4, || {
            calls += 1;
            element
        });

        assert_eq!(calls, 1);
        assert_eq!(second, element);
    }

    #[test]
    fn test_failed_compute_is_not_cached() {
        let cache = EstimateCache::new();
        assert!(cache.try_get_or_insert_with(1, 9, || None).is_none());
        assert!(cache.is_empty());

        let element = CacheElement {
            duration: Duration::from_secs(80),
            dsoc: 0.04,
        };
        assert_eq!(cache.try_get_or_insert_with(1, 9, || Some(element)), Some(element));
        assert_eq!(cache.try_get_or_insert_with(1, 9, || None), Some(element));
    }
}

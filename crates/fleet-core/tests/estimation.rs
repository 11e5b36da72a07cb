//! Integration tests for request models sharing an estimate cache
//!
//! Several candidate robots are evaluated against the same set of requests
//! in parallel, the way an allocator would fan out its search.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use fleet_core::mock::MockDescription;
use fleet_core::{
    BinaryPriority, Booking, ConstDescriptionPtr, Constraints, EstimateCache, Parameters, Request,
    State,
};

fn requests() -> Vec<Request> {
    let now = Utc::now();
    (0..8)
        .map(|i| {
            let description: ConstDescriptionPtr = Arc::new(MockDescription::new(i, i + 2));
            let priority = if i % 2 == 0 {
                Some(BinaryPriority::high())
            } else {
                None
            };
            Request::from_parts(format!("delivery-{i}"), now, priority, description, false)
        })
        .collect()
}

#[test]
fn test_invariant_duration_filters_before_estimation() {
    let parameters = Parameters::default();
    let limit = Duration::from_secs(15);

    let short: Vec<_> = requests()
        .into_iter()
        .filter(|r| r.make_model(&parameters).invariant_duration() <= limit)
        .collect();

    // Every mock request spans two hops of 10s
    assert!(short.is_empty());
}

#[test]
fn test_concurrent_estimates_share_cache() {
    const NUM_THREADS: usize = 8;

    let cache = Arc::new(EstimateCache::new());
    let requests = Arc::new(requests());
    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let mut handles = vec![];

    for _ in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        let requests = Arc::clone(&requests);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let parameters = Parameters::default();
            let start = State::new(0, Utc::now(), 1.0).unwrap();
            barrier.wait();

            requests
                .iter()
                .filter_map(|r| {
                    r.make_model(&parameters)
                        .estimate_finish(&start, &Constraints::default(), &cache)
                })
                .count()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 8);
    }

    // One approach leg per distinct pickup
    assert_eq!(cache.len(), 8);
}

#[test]
fn test_booking_preserves_request_tag() {
    let request = &requests()[0];
    let booking = Booking::from(request.tag().as_ref());

    assert_eq!(booking.id(), "delivery-0");
    assert!(booking.priority().is_some());
    assert!(!booking.automatic());
}

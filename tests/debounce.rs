use std::time::{Duration, Instant};

use imagegrabber::debounce::*;

#[test]
fn burst_collapses_into_one_execution() {
    let mut debouncer = Debouncer::new(Duration::from_millis(200));
    let start = Instant::now();
    for step in 0..10 {
        let now = start + Duration::from_millis(step * 50);
        debouncer.trigger(now);
        assert!(!debouncer.poll(now));
    }
    let last = start + Duration::from_millis(450);
    assert!(!debouncer.poll(last + Duration::from_millis(199)));
    assert!(debouncer.poll(last + Duration::from_millis(200)));
    assert!(!debouncer.poll(last + Duration::from_millis(400)));
    assert!(!debouncer.is_pending());
}

#[test]
fn remaining_reports_time_to_deadline() {
    let mut debouncer = Debouncer::default();
    let now = Instant::now();
    assert_eq!(debouncer.remaining(now), None);
    debouncer.trigger(now);
    assert_eq!(debouncer.remaining(now), Some(FILTER_DEBOUNCE));
    assert_eq!(
        debouncer.remaining(now + Duration::from_secs(1)),
        Some(Duration::ZERO)
    );
}

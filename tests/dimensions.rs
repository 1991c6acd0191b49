use imagegrabber::dimensions::*;

mod common;
use common::{urls, FakeSource};

#[test]
fn ensure_requests_only_new_tail_in_order() {
    let mut cache = DimensionCache::new(FakeSource::default());
    assert_eq!(cache.ensure(&urls(&["a", "b"])), 2);
    assert_eq!(cache.ensure(&urls(&["a", "b"])), 0);
    assert_eq!(cache.ensure(&urls(&["a", "b", "c"])), 1);
    assert_eq!(cache.source().requested, urls(&["a", "b", "c"]));
}

#[test]
fn out_of_order_request_is_not_repeated() {
    let mut cache = DimensionCache::new(FakeSource::default());
    assert!(cache.request("b"));
    assert!(!cache.request("b"));
    assert_eq!(cache.ensure(&urls(&["a", "b"])), 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn update_records_measurements_and_failures() {
    let mut source = FakeSource::with_sizes(&[("a", 640, 480)]);
    source.hold = true;
    let mut cache = DimensionCache::new(source);
    cache.ensure(&urls(&["a", "broken"]));
    assert_eq!(cache.update(), 0);
    assert_eq!(cache.pending(), 2);
    assert_eq!(cache.dimensions("a"), None);

    cache.source_mut().release();
    assert_eq!(cache.update(), 2);
    assert_eq!(cache.pending(), 0);
    assert_eq!(cache.dimensions("a"), Some(Dimensions::new(640, 480)));
    assert_eq!(cache.dimensions("broken"), None);
    assert!(matches!(cache.entry("broken"), Some(CacheEntry::Failed)));
}

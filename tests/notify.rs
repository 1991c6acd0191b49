use std::time::{Duration, Instant};

use imagegrabber::notify::*;

#[test]
fn text_uses_singular_for_one_image() {
    let now = Instant::now();
    let phase = Duration::from_millis(100);
    assert_eq!(Notification::downloading(1, phase, now).text, "Downloading 1 image...");
    assert_eq!(Notification::downloading(3, phase, now).text, "Downloading 3 images...");
}

#[test]
fn flash_lasts_seven_phases() {
    let now = Instant::now();
    let phase = Duration::from_millis(100);
    let notification = Notification::downloading(2, phase, now);
    assert!(!notification.is_expired(now + Duration::from_millis(699)));
    assert!(notification.is_expired(now + Duration::from_millis(700)));
}

#[test]
fn opacity_fades_out_then_in() {
    let now = Instant::now();
    let phase = Duration::from_millis(100);
    let notification = Notification::downloading(2, phase, now);
    assert!(notification.opacity(now) > 0.99);
    assert!(notification.opacity(now + Duration::from_millis(90)) < 0.2);
    assert!(notification.opacity(now + Duration::from_millis(190)) > 0.8);
    assert_eq!(notification.opacity(now + Duration::from_secs(1)), 0.0);
}

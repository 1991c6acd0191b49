use imagegrabber::app::loader::Loader;
use imagegrabber::dimensions::{DimensionSource, Dimensions, LoadedImage};
use std::{thread, time::Duration};
use tempfile::tempdir;

mod common;
use common::temp_image_url;

fn wait_for(loader: &mut Loader, count: usize) -> Vec<LoadedImage> {
    let mut loaded = Vec::new();
    for _ in 0..100 {
        loaded.extend(loader.poll());
        if loaded.len() >= count {
            break;
        }
        thread::sleep(Duration::from_millis(25));
    }
    loaded
}

#[test]
fn loader_measures_local_images() {
    let tmp = tempdir().unwrap();
    let url = temp_image_url(tmp.path(), "sample.png", 12, 7);

    let mut loader = Loader::new(1).unwrap();
    loader.request(&url);
    let loaded = wait_for(&mut loader, 1);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].url, url);
    let decoded = loaded[0].outcome.as_ref().unwrap();
    assert_eq!(decoded.dimensions, Dimensions::new(12, 7));
    assert!(decoded.thumbnail.is_some());
    assert_eq!(loader.in_flight, 0);
}

#[test]
fn loader_reports_failures() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("missing.png").to_string_lossy().into_owned();
    let not_image = tmp.path().join("text.png");
    std::fs::write(&not_image, b"hello").unwrap();

    let mut loader = Loader::new(2).unwrap();
    loader.request(&missing);
    loader.request(&not_image.to_string_lossy());
    let loaded = wait_for(&mut loader, 2);
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|l| l.outcome.is_err()));
}

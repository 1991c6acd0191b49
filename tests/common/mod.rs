#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use image::{DynamicImage, Rgba, RgbaImage};
use imagegrabber::{
    controller::{DownloadManager, PopupController},
    debounce::Debouncer,
    dimensions::{Decoded, DimensionSource, Dimensions, LoadedImage},
    naming::{suggest_filename, url_filename},
    settings::{Settings, SettingsStore},
};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}

pub fn urls(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Decoder stand-in with known sizes. While `hold` is set, requests stay
/// unanswered until `release` is called.
#[derive(Default)]
pub struct FakeSource {
    pub sizes: HashMap<String, Dimensions>,
    pub requested: Vec<String>,
    pub hold: bool,
    held: Vec<String>,
    ready: Vec<String>,
}

impl FakeSource {
    pub fn with_sizes(sizes: &[(&str, u32, u32)]) -> Self {
        Self {
            sizes: sizes
                .iter()
                .map(|(url, w, h)| (url.to_string(), Dimensions::new(*w, *h)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn release(&mut self) {
        self.ready.append(&mut self.held);
    }
}

impl DimensionSource for FakeSource {
    fn request(&mut self, url: &str) {
        self.requested.push(url.to_string());
        if self.hold {
            self.held.push(url.to_string());
        } else {
            self.ready.push(url.to_string());
        }
    }

    fn poll(&mut self) -> Vec<LoadedImage> {
        self.ready
            .drain(..)
            .map(|url| {
                let outcome = match self.sizes.get(&url) {
                    Some(dimensions) => Ok(Decoded {
                        dimensions: *dimensions,
                        thumbnail: None,
                    }),
                    None => Err(format!("no such image {url}")),
                };
                LoadedImage { url, outcome }
            })
            .collect()
    }
}

/// Download manager stand-in that asks the rename rule for each file, the
/// way a real one does when it determines the filename.
pub struct RecordingDownloads {
    pub settings: Settings,
    pub urls: Vec<String>,
    pub filenames: Vec<String>,
}

impl RecordingDownloads {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            urls: Vec::new(),
            filenames: Vec::new(),
        }
    }
}

impl DownloadManager for RecordingDownloads {
    fn download(&mut self, url: &str) -> Result<()> {
        self.urls.push(url.to_string());
        let name = suggest_filename(&mut self.settings, &url_filename(url));
        self.filenames.push(name);
        Ok(())
    }
}

pub type TestController = PopupController<Settings, FakeSource, RecordingDownloads>;

/// Settings with every optional filter hidden.
pub fn plain_settings() -> Settings {
    let mut settings = Settings::in_memory();
    settings.set("show_url_filter", false);
    settings.set("show_only_images_from_links", false);
    settings.set("show_image_width_filter", false);
    settings.set("show_image_height_filter", false);
    settings
}

pub fn controller(settings: Settings, source: FakeSource) -> TestController {
    let downloads = RecordingDownloads::new(settings.clone());
    PopupController::with_debouncer(
        settings,
        source,
        downloads,
        Debouncer::new(Duration::from_millis(200)),
    )
}

/// Advances past the debounce window and runs every due pass.
pub fn settle(controller: &mut TestController, start: Instant) -> Instant {
    let mut now = start;
    for _ in 0..5 {
        now += Duration::from_millis(250);
        controller.tick(now);
    }
    now
}

pub fn temp_image_url(dir: &std::path::Path, name: &str, width: u32, height: u32) -> String {
    let path = dir.join(name);
    write_image(&path, &solid_image(width, height, [120, 40, 200, 255]));
    path.to_string_lossy().into_owned()
}

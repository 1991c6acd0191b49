use std::collections::HashMap;

use eframe::egui;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub struct Decoded {
    pub dimensions: Dimensions,
    pub thumbnail: Option<egui::ColorImage>,
}

/// Completion report for one requested URL.
pub struct LoadedImage {
    pub url: String,
    pub outcome: Result<Decoded, String>,
}

/// Something that decodes images off the UI thread and reports back later.
pub trait DimensionSource {
    fn request(&mut self, url: &str);
    fn poll(&mut self) -> Vec<LoadedImage>;
}

pub enum CacheEntry {
    Pending,
    Loaded(Dimensions),
    Failed,
}

/// One decode per unique URL, requested in list order and never evicted.
pub struct DimensionCache<S: DimensionSource> {
    source: S,
    entries: HashMap<String, CacheEntry>,
    thumbnails: HashMap<String, egui::ColorImage>,
    requested: usize,
}

impl<S: DimensionSource> DimensionCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            thumbnails: HashMap::new(),
            requested: 0,
        }
    }

    /// Requests loads for the tail of `images` not yet covered.
    /// `images` is the append-only accumulated list.
    pub fn ensure(&mut self, images: &[String]) -> usize {
        let start = self.requested.min(images.len());
        let mut issued = 0;
        for url in &images[start..] {
            if self.request(url) {
                issued += 1;
            }
        }
        self.requested = images.len();
        issued
    }

    /// Requests a single URL outside list order, e.g. for a thumbnail.
    pub fn request(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), CacheEntry::Pending);
        self.source.request(url);
        true
    }

    /// Drains completed loads. Returns how many arrived.
    pub fn update(&mut self) -> usize {
        let loaded = self.source.poll();
        let count = loaded.len();
        for LoadedImage { url, outcome } in loaded {
            let entry = match outcome {
                Ok(decoded) => {
                    debug!(%url, width = decoded.dimensions.width, height = decoded.dimensions.height, "measured image");
                    if let Some(thumbnail) = decoded.thumbnail {
                        self.thumbnails.insert(url.clone(), thumbnail);
                    }
                    CacheEntry::Loaded(decoded.dimensions)
                }
                Err(err) => {
                    warn!(%url, "failed to load image: {err}");
                    CacheEntry::Failed
                }
            };
            self.entries.insert(url, entry);
        }
        count
    }

    pub fn dimensions(&self, url: &str) -> Option<Dimensions> {
        match self.entries.get(url) {
            Some(CacheEntry::Loaded(dimensions)) => Some(*dimensions),
            _ => None,
        }
    }

    pub fn entry(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    pub fn take_thumbnail(&mut self, url: &str) -> Option<egui::ColorImage> {
        self.thumbnails.remove(url)
    }

    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, CacheEntry::Pending))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::feed::ImageBatch;

/// Everything the popup has learned about the page so far.
#[derive(Default, Debug, Clone)]
pub struct Session {
    all_images: Vec<String>,
    seen: HashSet<String>,
    linked_images: HashMap<String, bool>,
    visible: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one delivery. Returns how many new URLs were appended.
    pub fn ingest(&mut self, batch: ImageBatch) -> usize {
        self.linked_images.extend(batch.linked_images);
        let before = self.all_images.len();
        for image in batch.images {
            if self.seen.insert(image.clone()) {
                self.all_images.push(image);
            }
        }
        let added = self.all_images.len() - before;
        debug!(added, total = self.all_images.len(), "merged image batch");
        added
    }

    pub fn all_images(&self) -> &[String] {
        &self.all_images
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn is_linked(&self, url: &str) -> bool {
        self.linked_images.get(url).copied().unwrap_or(false)
    }

    pub fn set_visible(&mut self, visible: Vec<String>) {
        self.visible = visible;
    }
}

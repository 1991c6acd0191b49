use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One inbound message: the images a single frame of the page reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBatch {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "linkedImages", default)]
    pub linked_images: HashMap<String, bool>,
}

impl ImageBatch {
    pub fn from_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: images.into_iter().map(Into::into).collect(),
            linked_images: HashMap::new(),
        }
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Malformed image batch")
    }
}

#[derive(Debug, Clone)]
pub enum FeedSource {
    /// JSON-lines file, `-` meaning stdin.
    Lines(PathBuf),
    Page(String),
}

/// Background producer of image batches. Poll it from the UI thread.
pub struct FeedReader {
    batch_rx: Receiver<ImageBatch>,
}

impl FeedReader {
    pub fn new(sources: Vec<FeedSource>) -> Self {
        let (batch_tx, batch_rx) = mpsc::channel();
        for source in sources {
            let tx = batch_tx.clone();
            thread::spawn(move || {
                if let Err(err) = Self::run_source(&source, &tx) {
                    warn!(?source, "feed source failed: {err:#}");
                }
            });
        }
        Self { batch_rx }
    }

    fn run_source(source: &FeedSource, tx: &Sender<ImageBatch>) -> Result<()> {
        match source {
            FeedSource::Lines(path) => {
                let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
                    Box::new(BufReader::new(io::stdin()))
                } else {
                    let file = File::open(path)
                        .with_context(|| format!("Unable to open feed {}", path.display()))?;
                    Box::new(BufReader::new(file))
                };
                for line in reader.lines() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match ImageBatch::parse_line(&line) {
                        Ok(batch) => {
                            if tx.send(batch).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!("skipping feed line: {err:#}"),
                    }
                }
            }
            FeedSource::Page(url) => {
                let batch = scrape_page(url)?;
                info!(page = %url, images = batch.images.len(), "scraped page");
                let _ = tx.send(batch);
            }
        }
        Ok(())
    }

    pub fn poll(&self) -> Vec<ImageBatch> {
        self.batch_rx.try_iter().collect()
    }
}

pub fn scrape_page(url: &str) -> Result<ImageBatch> {
    let base = Url::parse(url).with_context(|| format!("Invalid page URL {url}"))?;
    let body = reqwest::blocking::get(base.clone())
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Unable to fetch {url}"))?
        .text()
        .with_context(|| format!("Unable to read body of {url}"))?;
    Ok(extract_images(&body, &base))
}

/// Collects `<img>` sources and `<a>` links that point straight at an image file.
pub fn extract_images(html: &str, base: &Url) -> ImageBatch {
    let document = Html::parse_document(html);
    let img_selector = Selector::parse("img[src]").expect("static selector");
    let link_selector = Selector::parse("a[href]").expect("static selector");
    let image_path =
        Regex::new(r"(?i)\.(png|jpe?g|gif|webp|bmp|svg|avif|ico|tiff?)$").expect("static regex");

    let mut batch = ImageBatch::default();
    for element in document.select(&img_selector) {
        if let Some(src) = element.value().attr("src").and_then(|s| base.join(s.trim()).ok()) {
            batch.images.push(src.to_string());
        }
    }
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href").and_then(|h| base.join(h.trim()).ok())
        else {
            continue;
        };
        if image_path.is_match(href.path()) {
            let href = href.to_string();
            batch.linked_images.insert(href.clone(), true);
            batch.images.push(href);
        }
    }
    batch
}

use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    thread,
    time::Instant,
};

use anyhow::Result;
use tracing::debug;

use crate::{
    dimensions::{DimensionSource, LoadedImage},
    fs_utils::{fetch_bytes, http_client},
    image_utils::decode_with_thumbnail,
};

/// Off-screen decoder: fetches and decodes images on worker threads.
pub struct Loader {
    url_tx: Sender<String>,
    loaded_rx: Receiver<LoadedImage>,
    pub in_flight: usize,
}

impl Loader {
    pub fn new(concurrency: usize) -> Result<Self> {
        let client = http_client()?;
        let (url_tx, url_rx) = mpsc::channel::<String>();
        let (loaded_tx, loaded_rx) = mpsc::channel();
        let rx = Arc::new(Mutex::new(url_rx));

        for _ in 0..concurrency.max(1) {
            Self::spawn_loader_thread(rx.clone(), loaded_tx.clone(), client.clone());
        }

        Ok(Self {
            url_tx,
            loaded_rx,
            in_flight: 0,
        })
    }

    fn spawn_loader_thread(
        rx: Arc<Mutex<Receiver<String>>>,
        tx: Sender<LoadedImage>,
        client: reqwest::blocking::Client,
    ) {
        thread::spawn(move || loop {
            let url = {
                let Ok(lock) = rx.lock() else { break };
                match lock.recv() {
                    Ok(url) => url,
                    Err(_) => break,
                }
            };

            let start = Instant::now();
            let outcome = fetch_bytes(&client, &url)
                .and_then(|bytes| decode_with_thumbnail(&bytes))
                .map_err(|err| format!("{err:#}"));
            debug!(%url, elapsed = ?start.elapsed(), ok = outcome.is_ok(), "decoded image");

            if tx.send(LoadedImage { url, outcome }).is_err() {
                break;
            }
        });
    }
}

impl DimensionSource for Loader {
    fn request(&mut self, url: &str) {
        if self.url_tx.send(url.to_string()).is_ok() {
            self.in_flight += 1;
        }
    }

    fn poll(&mut self) -> Vec<LoadedImage> {
        let loaded: Vec<_> = self.loaded_rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(loaded.len());
        loaded
    }
}

use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    thread,
};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::{
    controller::DownloadManager,
    fs_utils::{fetch_bytes, http_client, prepare_dir, relative_target, write_unique},
    naming::{suggest_filename, url_filename},
    settings::Settings,
};

pub struct DownloadStatus {
    pub url: String,
    pub result: Result<PathBuf>,
}

/// Download manager backed by worker threads. Target names are asked from
/// the rename rule in queue order, one call per file.
pub struct Downloader {
    url_tx: Sender<String>,
    status_rx: Receiver<DownloadStatus>,
    pub pending: Vec<String>,
}

impl Downloader {
    pub fn new(concurrency: usize, download_dir: PathBuf, settings: Settings) -> Result<Self> {
        let client = http_client()?;
        let (url_tx, url_rx) = mpsc::channel::<String>();
        let (status_tx, status_rx) = mpsc::channel();

        let rx = Arc::new(Mutex::new(url_rx));

        for _ in 0..concurrency.max(1) {
            Self::spawn_download_thread(
                rx.clone(),
                status_tx.clone(),
                client.clone(),
                download_dir.clone(),
                settings.clone(),
            );
        }

        Ok(Self {
            url_tx,
            status_rx,
            pending: Vec::new(),
        })
    }

    fn spawn_download_thread(
        rx: Arc<Mutex<Receiver<String>>>,
        tx: Sender<DownloadStatus>,
        client: reqwest::blocking::Client,
        download_dir: PathBuf,
        mut settings: Settings,
    ) {
        thread::spawn(move || loop {
            // The name is chosen while holding the queue so numbering follows queue order.
            let (url, suggested) = {
                let Ok(lock) = rx.lock() else { break };
                match lock.recv() {
                    Ok(url) => {
                        let suggested = suggest_filename(&mut settings, &url_filename(&url));
                        (url, suggested)
                    }
                    Err(_) => break,
                }
            };

            let result = (|| -> Result<PathBuf> {
                let relative = relative_target(&suggested)?;
                let target = download_dir.join(&relative);
                let parent = target
                    .parent()
                    .ok_or_else(|| anyhow!("{} has no parent", target.display()))?;
                let dir = prepare_dir(parent)?;
                let file_name = target
                    .file_name()
                    .ok_or_else(|| anyhow!("No filename"))?;
                let bytes = fetch_bytes(&client, &url)?;
                write_unique(&dir, file_name, &bytes)
            })();

            if tx.send(DownloadStatus { url, result }).is_err() {
                break;
            }
        });
    }

    pub fn check_completions(&mut self) -> Vec<DownloadStatus> {
        let mut completed = Vec::new();
        while let Ok(status) = self.status_rx.try_recv() {
            if let Some(idx) = self.pending.iter().position(|u| *u == status.url) {
                self.pending.remove(idx);
            }
            match &status.result {
                Ok(path) => info!(url = %status.url, path = %path.display(), "downloaded"),
                Err(err) => warn!(url = %status.url, "download failed: {err:#}"),
            }
            completed.push(status);
        }
        completed
    }
}

impl DownloadManager for Downloader {
    fn download(&mut self, url: &str) -> Result<()> {
        self.pending.push(url.to_string());
        self.url_tx
            .send(url.to_string())
            .map_err(|e| anyhow!("Failed to send download request: {}", e))
    }
}

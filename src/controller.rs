//! Root controller of the popup. Owns the session and drives the
//! feed → debounce → filter → measure → select → download cycle. All methods
//! take the current time so the cycle can be driven deterministically.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    debounce::Debouncer,
    dimensions::{DimensionCache, DimensionSource, Dimensions},
    feed::ImageBatch,
    filter::{filter_images, FilterConfig},
    naming::begin_batch,
    notify::Notification,
    selection::{Selection, SelectionState},
    session::Session,
    settings::SettingsStore,
};

/// The browser's download manager, seen from the popup.
pub trait DownloadManager {
    fn download(&mut self, url: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRequest {
    /// Nothing is checked.
    Ignored,
    AwaitingConfirmation,
    Started(usize),
}

/// The confirmation panel currently on screen.
#[derive(Debug, Clone, Default)]
pub struct Confirmation {
    pub dont_show_again: bool,
}

pub struct PopupController<S, D, M>
where
    S: SettingsStore,
    D: DimensionSource,
    M: DownloadManager,
{
    pub settings: S,
    pub session: Session,
    pub cache: DimensionCache<D>,
    pub selection: Selection,
    pub confirmation: Option<Confirmation>,
    pub notification: Option<Notification>,
    pub downloads: M,
    debouncer: Debouncer,
    passes: usize,
}

impl<S, D, M> PopupController<S, D, M>
where
    S: SettingsStore,
    D: DimensionSource,
    M: DownloadManager,
{
    pub fn new(settings: S, source: D, downloads: M) -> Self {
        Self::with_debouncer(settings, source, downloads, Debouncer::default())
    }

    pub fn with_debouncer(settings: S, source: D, downloads: M, debouncer: Debouncer) -> Self {
        Self {
            settings,
            session: Session::new(),
            cache: DimensionCache::new(source),
            selection: Selection::new(),
            confirmation: None,
            notification: None,
            downloads,
            debouncer,
            passes: 0,
        }
    }

    pub fn on_batch(&mut self, batch: ImageBatch, now: Instant) {
        self.session.ingest(batch);
        self.request_filter(now);
    }

    pub fn request_filter(&mut self, now: Instant) {
        self.debouncer.trigger(now);
    }

    /// Writes one setting and schedules a filter pass.
    pub fn update_setting(&mut self, key: &str, value: impl ToString, now: Instant) {
        self.settings.set(key, value);
        self.request_filter(now);
    }

    /// Drains finished loads and runs the filter when it is due.
    /// Returns true when the visible list was rebuilt.
    pub fn tick(&mut self, now: Instant) -> bool {
        // Loads only feed back into filtering while dimension bounds are shown.
        if self.cache.update() > 0 && FilterConfig::from_store(&self.settings).dimensions_shown() {
            self.request_filter(now);
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
        if self.debouncer.poll(now) {
            self.run_filter();
            return true;
        }
        false
    }

    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn filter_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// One full pass. Also discards the selection, since the rendering it
    /// belonged to is replaced.
    pub fn run_filter(&mut self) {
        let config = FilterConfig::from_store(&self.settings);
        if config.dimensions_shown() {
            let issued = self.cache.ensure(self.session.all_images());
            if issued > 0 {
                debug!(issued, "requested dimension loads");
            }
        }
        let cache = &self.cache;
        let visible = filter_images(&self.session, &config, |url| cache.dimensions(url));
        info!(
            visible = visible.len(),
            total = self.session.all_images().len(),
            "filtered images"
        );
        self.session.set_visible(visible);
        self.selection.clear();
        self.passes += 1;
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn visible(&self) -> &[String] {
        self.session.visible()
    }

    pub fn dimensions(&self, url: &str) -> Option<Dimensions> {
        self.cache.dimensions(url)
    }

    pub fn toggle(&mut self, url: &str) {
        self.selection.toggle(url);
    }

    pub fn select_all(&mut self, checked: bool) {
        self.selection.set_all(self.session.visible(), checked);
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(self.session.visible())
    }

    pub fn download_enabled(&self) -> bool {
        self.selection_state() != SelectionState::None
    }

    pub fn request_download(&mut self, now: Instant) -> DownloadRequest {
        if !self.download_enabled() {
            return DownloadRequest::Ignored;
        }
        if self.settings.flag("show_download_confirmation") {
            self.confirmation = Some(Confirmation::default());
            return DownloadRequest::AwaitingConfirmation;
        }
        DownloadRequest::Started(self.start_download(now))
    }

    /// Closes the confirmation panel. Both answers remember the opt-out.
    pub fn confirm(&mut self, proceed: bool, now: Instant) -> DownloadRequest {
        let Some(confirmation) = self.confirmation.take() else {
            return DownloadRequest::Ignored;
        };
        self.settings
            .set("show_download_confirmation", !confirmation.dont_show_again);
        self.persist();
        info!(proceed, dont_show_again = confirmation.dont_show_again, "download confirmation answered");
        if proceed {
            DownloadRequest::Started(self.start_download(now))
        } else {
            DownloadRequest::Ignored
        }
    }

    pub fn set_dont_show_again(&mut self, value: bool) {
        if let Some(confirmation) = self.confirmation.as_mut() {
            confirmation.dont_show_again = value;
        }
    }

    fn start_download(&mut self, now: Instant) -> usize {
        let checked = self.selection.checked_in_order(self.session.visible());
        self.issue(&checked, now)
    }

    /// Per-card download button: a batch of one.
    pub fn download_single(&mut self, url: &str, now: Instant) -> usize {
        self.issue(&[url.to_string()], now)
    }

    fn issue(&mut self, urls: &[String], now: Instant) -> usize {
        if urls.is_empty() {
            return 0;
        }
        begin_batch(&mut self.settings, urls.len());
        for url in urls {
            if let Err(err) = self.downloads.download(url) {
                warn!(%url, "failed to queue download: {err:#}");
            }
        }
        info!(count = urls.len(), "queued downloads");
        if self.settings.flag("show_download_notification") {
            let phase = self.settings.number("animation_duration").unwrap_or(0).max(0) as u64;
            self.notification = Some(Notification::downloading(
                urls.len(),
                Duration::from_millis(phase),
                now,
            ));
        }
        urls.len()
    }

    pub fn persist(&self) {
        if let Err(err) = self.settings.persist() {
            warn!("failed to save settings: {err:#}");
        }
    }
}

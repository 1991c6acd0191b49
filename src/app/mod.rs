pub mod downloader;
pub mod grid;
pub mod loader;

use std::{
    collections::HashMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use eframe::{
    egui::{self, Color32, RichText},
    App, Frame,
};
use tracing::info;

use crate::{
    controller::{DownloadRequest, PopupController},
    feed::FeedReader,
    filter::UrlFilterMode,
    selection::SelectionState,
    settings::{Settings, SettingsStore},
    ui::{snap, DimensionSlider, GridLayout},
};

use self::{
    downloader::Downloader,
    grid::{CardOptions, GridAction},
    loader::Loader,
};

pub type Controller = PopupController<Settings, Loader, Downloader>;

const LOADER_THREADS: usize = 4;
const WILDCARD_HINT: &str = "You can also use these special symbols:\n\
* → zero or more characters\n\
? → zero or one character\n\
+ → one or more characters";
const REGEX_HINT: &str = "Regular expressions (advanced):\n\
[abc] → A single character of: a, b or c\n\
[^abc] → Any single character except: a, b, or c\n\
[a-z] → Any single character in the range a-z\n\
^ → Start of line\n\
$ → End of line\n\
. → Any single character\n\
\\d → Any digit\n\
\\w → Any word character\n\
(a|b) → a or b\n\
a? → Zero or one of a\n\
a* → Zero or more of a\n\
a+ → One or more of a\n\
a{3,6} → Between 3 and 6 of a";

pub struct ImageGrabberApp {
    pub controller: Controller,
    pub feed: FeedReader,
    pub textures: HashMap<String, egui::TextureHandle>,
    pub filter_text: String,
    pub rename_text: String,
    pub folder_text: String,
    pub status: String,
}

impl ImageGrabberApp {
    pub fn new(
        settings: Settings,
        feed: FeedReader,
        download_dir: PathBuf,
        parallel: usize,
    ) -> Result<Self> {
        let loader = Loader::new(LOADER_THREADS)?;
        let downloader = Downloader::new(parallel, download_dir.clone(), settings.clone())?;
        let filter_text = settings.text("filter_url");
        let rename_text = settings.text("new_file_name");
        let folder_text = settings.text("folder_name");
        info!(download_dir = %download_dir.display(), "popup ready");
        Ok(Self {
            controller: PopupController::new(settings, loader, downloader),
            feed,
            textures: HashMap::new(),
            filter_text,
            rename_text,
            folder_text,
            status: String::from("Waiting for images..."),
        })
    }

    fn store_setting(&mut self, key: &str, value: impl ToString, now: Instant) {
        self.controller.update_setting(key, value, now);
        self.controller.persist();
    }

    fn upload_thumbnails(&mut self, ctx: &egui::Context) {
        for url in self.controller.visible().to_vec() {
            if self.textures.contains_key(&url) {
                continue;
            }
            // Thumbnails are loaded for display even when no dimension bound is shown.
            self.controller.cache.request(&url);
            if let Some(image) = self.controller.cache.take_thumbnail(&url) {
                let texture = ctx.load_texture(url.clone(), image, egui::TextureOptions::LINEAR);
                self.textures.insert(url, texture);
            }
        }
    }

    fn filters_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        let settings = &self.controller.settings;
        if settings.flag("show_url_filter") {
            let mut mode: UrlFilterMode = settings
                .text("filter_url_mode")
                .parse()
                .unwrap_or_default();
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.filter_text)
                        .hint_text("Filter by URL")
                        .desired_width(ui.available_width() - 110.0),
                );
                let response =
                    response.on_hover_text("Filter by parts of the URL or regular expressions.");
                if response.changed() {
                    let text = self.filter_text.clone();
                    self.store_setting("filter_url", text.trim(), now);
                }

                let before = mode;
                egui::ComboBox::from_id_salt("filter_url_mode")
                    .selected_text(mode.label())
                    .width(100.0)
                    .show_ui(ui, |ui| {
                        for option in UrlFilterMode::ALL {
                            let hint = match option {
                                UrlFilterMode::Normal => "A plain text search",
                                UrlFilterMode::Wildcard => WILDCARD_HINT,
                                UrlFilterMode::Regex => REGEX_HINT,
                            };
                            ui.selectable_value(&mut mode, option, option.label())
                                .on_hover_text(hint);
                        }
                    });
                if mode != before {
                    self.store_setting("filter_url_mode", mode.as_str(), now);
                }
            });
        }

        for (dimension, label) in [("width", "Width:"), ("height", "Height:")] {
            if self.controller.settings.flag(&format!("show_image_{dimension}_filter")) {
                self.dimension_filter_ui(ui, dimension, label, now);
            }
        }

        if self.controller.settings.flag("show_only_images_from_links") {
            let mut only_links = self.controller.settings.flag("only_images_from_links");
            let response = ui
                .checkbox(&mut only_links, "Only images from links")
                .on_hover_text(
                    "Only show images from direct links on the page; this can be useful on sites like Reddit",
                );
            if response.changed() {
                self.store_setting("only_images_from_links", only_links, now);
            }
        }
    }

    fn dimension_filter_ui(&mut self, ui: &mut egui::Ui, dimension: &str, label: &str, now: Instant) {
        let mut slider = DimensionSlider::from_store(&self.controller.settings, dimension);
        let before = slider;
        let range = slider.range_min..=slider.range_max;

        ui.horizontal(|ui| {
            ui.label(label);
            ui.checkbox(&mut slider.lower_enabled, format!("{}px", slider.lower));
            ui.add_enabled(
                slider.lower_enabled,
                egui::Slider::new(&mut slider.lower, range.clone())
                    .step_by(10.0)
                    .show_value(false),
            );
            ui.add_enabled(
                slider.upper_enabled,
                egui::Slider::new(&mut slider.upper, range)
                    .step_by(10.0)
                    .show_value(false),
            );
            ui.checkbox(&mut slider.upper_enabled, format!("{}px", slider.upper));
        });

        let (min, max) = (slider.range_min, slider.range_max);
        if slider.lower != before.lower {
            self.store_setting(&format!("filter_min_{dimension}"), snap(slider.lower, min, max), now);
        }
        if slider.upper != before.upper {
            self.store_setting(&format!("filter_max_{dimension}"), snap(slider.upper, min, max), now);
        }
        if slider.lower_enabled != before.lower_enabled {
            self.store_setting(&format!("filter_min_{dimension}_enabled"), slider.lower_enabled, now);
        }
        if slider.upper_enabled != before.upper_enabled {
            self.store_setting(&format!("filter_max_{dimension}_enabled"), slider.upper_enabled, now);
        }
    }

    fn downloads_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        if let Some(confirmation) = self.controller.confirmation.clone() {
            ui.separator();
            ui.label(RichText::new(
                "Take a quick look at your download location settings.",
            ));
            ui.label(
                RichText::new(
                    "If your system asks where to save each file, proceeding might open a lot of dialogs. Proceed with the download?",
                )
                .color(ui.visuals().error_fg_color),
            );
            ui.horizontal(|ui| {
                let mut dont_show_again = confirmation.dont_show_again;
                if ui
                    .checkbox(&mut dont_show_again, "Got it, don't show again")
                    .changed()
                {
                    self.controller.set_dont_show_again(dont_show_again);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Yes, Download").clicked() {
                        let outcome = self.controller.confirm(true, now);
                        self.report(outcome);
                    }
                    if ui.button("Cancel").clicked() {
                        self.controller.confirm(false, now);
                    }
                });
            });
        }

        ui.horizontal(|ui| {
            let show_renaming = self.controller.settings.flag("show_file_renaming");
            let fields = if show_renaming { 2.0 } else { 1.0 };
            let field_width = ((ui.available_width() - 110.0) / fields).max(60.0);
            if show_renaming {
                let response = ui
                    .add(
                        egui::TextEdit::singleline(&mut self.rename_text)
                            .hint_text("Rename files")
                            .desired_width(field_width),
                    )
                    .on_hover_text("Set a new file name for the images you want to download.");
                if response.changed() {
                    self.controller
                        .settings
                        .set("new_file_name", self.rename_text.trim());
                    self.controller.persist();
                }
            }
            let response = ui
                .add(
                    egui::TextEdit::singleline(&mut self.folder_text)
                        .hint_text("Save to subfolder")
                        .desired_width(field_width),
                )
                .on_hover_text("Set the name of the subfolder you want to download the images to.");
            if response.changed() {
                self.controller
                    .settings
                    .set("folder_name", self.folder_text.trim());
                self.controller.persist();
            }

            let enabled = self.controller.download_enabled();
            if ui
                .add_enabled(enabled, egui::Button::new("Download").min_size(egui::vec2(100.0, 0.0)))
                .clicked()
            {
                let outcome = self.controller.request_download(now);
                self.report(outcome);
            }
        });
    }

    fn report(&mut self, outcome: DownloadRequest) {
        if let DownloadRequest::Started(count) = outcome {
            self.status = format!("Queued {count} downloads");
        }
    }

    fn select_all_ui(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.selection_state();
        let mut checked = state == SelectionState::All;
        let response = ui.add(
            egui::Checkbox::new(
                &mut checked,
                RichText::new(format!("Select all ({})", self.controller.visible().len())).strong(),
            )
            .indeterminate(state == SelectionState::Partial),
        );
        if response.changed() {
            self.controller.select_all(checked);
        }
    }

    fn apply_grid_actions(&mut self, ctx: &egui::Context, actions: Vec<GridAction>, now: Instant) {
        for action in actions {
            match action {
                GridAction::Toggle(url) => self.controller.toggle(&url),
                GridAction::Open(url) => ctx.open_url(egui::OpenUrl::new_tab(url)),
                GridAction::Download(url) => {
                    self.controller.download_single(&url, now);
                }
            }
        }
    }
}

impl App for ImageGrabberApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();

        for batch in self.feed.poll() {
            self.controller.on_batch(batch, now);
        }
        if self.controller.tick(now) {
            self.status = format!(
                "Showing {} of {} images",
                self.controller.visible().len(),
                self.controller.session.all_images().len()
            );
        }
        for status in self.controller.downloads.check_completions() {
            if let Err(err) = status.result {
                self.status = format!("Error downloading {}: {err:#}", status.url);
            }
        }
        self.upload_thumbnails(ctx);

        egui::TopBottomPanel::top("filters_container").show(ctx, |ui| {
            ui.add_space(4.0);
            self.filters_ui(ui, now);
            if let Some(notification) = &self.controller.notification {
                let color = Color32::from_rgb(0x2e, 0xcc, 0x71).gamma_multiply(notification.opacity(now));
                ui.label(RichText::new(&notification.text).color(color).strong());
            }
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("downloads_container").show(ctx, |ui| {
            ui.add_space(4.0);
            self.downloads_ui(ui, now);
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.status).small().weak());
                if self.controller.filter_pending() {
                    ui.spinner();
                }
                let pending = self.controller.downloads.pending.len();
                if pending > 0 {
                    ui.label(RichText::new(format!("{pending} downloading")).small());
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.select_all_ui(ui);
            let layout = GridLayout::from_store(&self.controller.settings);
            let options = CardOptions {
                show_url: self.controller.settings.flag("show_image_url"),
                show_open_button: self.controller.settings.flag("show_open_image_button"),
                show_download_button: self.controller.settings.flag("show_download_image_button"),
            };
            let actions = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let controller = &self.controller;
                    grid::show(
                        ui,
                        controller.visible(),
                        &controller.selection,
                        &self.textures,
                        |url| controller.dimensions(url),
                        &layout,
                        &options,
                    )
                })
                .inner;
            self.apply_grid_actions(ctx, actions, now);
        });

        let busy = self.controller.notification.is_some()
            || self.controller.cache.source().in_flight > 0
            || !self.controller.downloads.pending.is_empty();
        match self.controller.next_deadline(now) {
            Some(remaining) => ctx.request_repaint_after(remaining),
            None if busy => ctx.request_repaint_after(Duration::from_millis(50)),
            None => ctx.request_repaint_after(Duration::from_millis(250)),
        }
    }
}

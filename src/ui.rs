use eframe::egui::{self, Color32};

use crate::settings::SettingsStore;

pub const SLIDER_STEP: i64 = 10;
pub const CARD_GAP: f32 = 8.0;
pub const CONTAINER_PADDING: f32 = 8.0;

/// Presentation settings for the image grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub image_min_width: f32,
    pub image_max_width: f32,
    pub border_width: f32,
    pub border_color: Color32,
}

impl GridLayout {
    pub fn from_store(store: &impl SettingsStore) -> Self {
        let columns = store.number("columns").unwrap_or(2).max(1) as usize;
        let image_min_width = store.number("image_min_width").unwrap_or(50).max(1) as f32;
        let image_max_width = (store.number("image_max_width").unwrap_or(200) as f32).max(image_min_width);
        Self {
            columns,
            image_min_width,
            image_max_width,
            border_width: store.number("image_border_width").unwrap_or(3).max(0) as f32,
            border_color: parse_hex_color(&store.text("image_border_color"))
                .unwrap_or(Color32::from_rgb(0x34, 0x98, 0xdb)),
        }
    }

    /// Width of the whole grid when every column uses the maximum image width.
    /// The window opens at this width.
    pub fn container_width(&self) -> f32 {
        let columns = self.columns as f32;
        2.0 * CONTAINER_PADDING + columns * self.image_max_width + (columns - 1.0) * CARD_GAP
    }

    /// Display size of an image, scaled into `[min, max]` width keeping aspect.
    pub fn display_size(&self, natural: egui::Vec2) -> egui::Vec2 {
        let natural = egui::vec2(natural.x.max(1.0), natural.y.max(1.0));
        let width = natural.x.clamp(self.image_min_width, self.image_max_width);
        egui::vec2(width, natural.y * width / natural.x)
    }
}

/// `#rrggbb` or `#rgb`.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |c: &str| channel(&c.repeat(2));
            Some(Color32::from_rgb(
                expand(&hex[0..1])?,
                expand(&hex[1..2])?,
                expand(&hex[2..3])?,
            ))
        }
        _ => None,
    }
}

/// Range and current thumbs of one dimension slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSlider {
    pub range_min: i64,
    pub range_max: i64,
    pub lower: i64,
    pub upper: i64,
    pub lower_enabled: bool,
    pub upper_enabled: bool,
}

impl DimensionSlider {
    pub fn from_store(store: &impl SettingsStore, dimension: &str) -> Self {
        let range_min = store
            .number(&format!("filter_min_{dimension}_default"))
            .unwrap_or(0);
        let range_max = store
            .number(&format!("filter_max_{dimension}_default"))
            .unwrap_or(3000)
            .max(range_min);
        let clamp = |v: i64| snap(v, range_min, range_max);
        Self {
            range_min,
            range_max,
            lower: clamp(store.number(&format!("filter_min_{dimension}")).unwrap_or(range_min)),
            upper: clamp(store.number(&format!("filter_max_{dimension}")).unwrap_or(range_max)),
            lower_enabled: store.flag(&format!("filter_min_{dimension}_enabled")),
            upper_enabled: store.flag(&format!("filter_max_{dimension}_enabled")),
        }
    }
}

/// Clamps into the range and rounds to the slider step.
pub fn snap(value: i64, min: i64, max: i64) -> i64 {
    let stepped = min + ((value - min) as f64 / SLIDER_STEP as f64).round() as i64 * SLIDER_STEP;
    stepped.clamp(min, max)
}

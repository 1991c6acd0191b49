use eframe::egui::{self, Color32};
use imagegrabber::settings::{Settings, SettingsStore};
use imagegrabber::ui::*;

#[test]
fn layout_reads_grid_settings() {
    let mut settings = Settings::in_memory();
    settings.set("columns", 3);
    settings.set("image_border_color", "#ff0000");
    let layout = GridLayout::from_store(&settings);
    assert_eq!(layout.columns, 3);
    assert_eq!(layout.border_color, Color32::from_rgb(255, 0, 0));
    assert_eq!(
        layout.container_width(),
        2.0 * CONTAINER_PADDING + 3.0 * 200.0 + 2.0 * CARD_GAP
    );
}

#[test]
fn display_size_clamps_width_and_keeps_aspect() {
    let layout = GridLayout::from_store(&Settings::in_memory());
    assert_eq!(layout.display_size(egui::vec2(400.0, 200.0)), egui::vec2(200.0, 100.0));
    assert_eq!(layout.display_size(egui::vec2(10.0, 20.0)), egui::vec2(50.0, 100.0));
}

#[test]
fn hex_colors_parse_long_and_short_forms() {
    assert_eq!(parse_hex_color("#3498db"), Some(Color32::from_rgb(0x34, 0x98, 0xdb)));
    assert_eq!(parse_hex_color("#fff"), Some(Color32::WHITE));
    assert_eq!(parse_hex_color("blue"), None);
    assert_eq!(parse_hex_color("#aéabc"), None);
    assert_eq!(parse_hex_color("#é"), None);
}

#[test]
fn non_ascii_border_color_falls_back_to_default() {
    let mut settings = Settings::in_memory();
    settings.set("image_border_color", "#aéabc");
    let layout = GridLayout::from_store(&settings);
    assert_eq!(layout.border_color, Color32::from_rgb(0x34, 0x98, 0xdb));
}

#[test]
fn slider_values_snap_to_step_within_range() {
    assert_eq!(snap(147, 0, 3000), 150);
    assert_eq!(snap(-40, 0, 3000), 0);
    assert_eq!(snap(5000, 0, 3000), 3000);

    let mut settings = Settings::in_memory();
    settings.set("filter_min_width", 123);
    settings.set("filter_min_width_enabled", true);
    let slider = DimensionSlider::from_store(&settings, "width");
    assert_eq!(slider.lower, 120);
    assert_eq!(slider.upper, 3000);
    assert!(slider.lower_enabled);
    assert!(!slider.upper_enabled);
}

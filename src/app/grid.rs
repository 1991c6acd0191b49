use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, Stroke};

use crate::{
    dimensions::Dimensions,
    selection::Selection,
    ui::{GridLayout, CARD_GAP, CONTAINER_PADDING},
};

/// What the user did to the grid during one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    Toggle(String),
    Open(String),
    Download(String),
}

pub struct CardOptions {
    pub show_url: bool,
    pub show_open_button: bool,
    pub show_download_button: bool,
}

/// Draws the cards for `visible`. Purely a projection of the selection; all
/// changes are returned as actions.
pub fn show(
    ui: &mut egui::Ui,
    visible: &[String],
    selection: &Selection,
    textures: &HashMap<String, egui::TextureHandle>,
    dimensions: impl Fn(&str) -> Option<Dimensions>,
    layout: &GridLayout,
    options: &CardOptions,
) -> Vec<GridAction> {
    let mut actions = Vec::new();

    egui::Frame::new()
        .inner_margin(CONTAINER_PADDING)
        .show(ui, |ui| {
            egui::Grid::new("images_grid")
                .num_columns(layout.columns)
                .spacing(egui::vec2(CARD_GAP, CARD_GAP))
                .min_col_width(layout.image_min_width)
                .max_col_width(layout.image_max_width)
                .show(ui, |ui| {
                    for (index, url) in visible.iter().enumerate() {
                        let checked = selection.is_checked(url);
                        card(
                            ui,
                            url,
                            checked,
                            textures.get(url),
                            dimensions(url),
                            layout,
                            options,
                            &mut actions,
                        );
                        if (index + 1) % layout.columns == 0 {
                            ui.end_row();
                        }
                    }
                });
        });

    actions
}

#[allow(clippy::too_many_arguments)]
fn card(
    ui: &mut egui::Ui,
    url: &str,
    checked: bool,
    texture: Option<&egui::TextureHandle>,
    dimensions: Option<Dimensions>,
    layout: &GridLayout,
    options: &CardOptions,
    actions: &mut Vec<GridAction>,
) {
    let stroke = if checked {
        Stroke::new(layout.border_width, layout.border_color)
    } else {
        Stroke::new(layout.border_width, Color32::TRANSPARENT)
    };

    // The card senses clicks behind its children, so buttons keep their own clicks.
    let scope = ui.scope_builder(egui::UiBuilder::new().sense(egui::Sense::click()), |ui| {
        egui::Frame::new()
            .stroke(stroke)
            .corner_radius(4)
            .inner_margin(4.0)
            .show(ui, |ui| {
                ui.set_max_width(layout.image_max_width);
                ui.vertical(|ui| {
                    match texture {
                        Some(texture) => {
                            let size = layout.display_size(texture.size_vec2());
                            ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                        }
                        None => {
                            let size = egui::vec2(layout.image_min_width, layout.image_min_width);
                            ui.add_sized(size, egui::Spinner::new());
                        }
                    }

                    if let Some(d) = dimensions {
                        ui.label(RichText::new(format!("{}×{}", d.width, d.height)).small().weak());
                    }

                    if options.show_url {
                        ui.add(egui::Label::new(RichText::new(url).small().monospace()).truncate())
                            .on_hover_text(url);
                    }

                    if options.show_open_button || options.show_download_button {
                        ui.horizontal(|ui| {
                            if options.show_open_button && ui.small_button("Open").clicked() {
                                actions.push(GridAction::Open(url.to_string()));
                            }
                            if options.show_download_button && ui.small_button("Download").clicked() {
                                actions.push(GridAction::Download(url.to_string()));
                            }
                        });
                    }
                });
            });
    });

    let response = scope.response;
    if response.hovered() && !checked {
        ui.painter().rect_stroke(
            response.rect,
            4,
            Stroke::new(layout.border_width, ui.visuals().weak_text_color()),
            egui::StrokeKind::Inside,
        );
    }
    if response.clicked() {
        actions.push(GridAction::Toggle(url.to_string()));
    }
}

//! Chart Viewer Widget
//! Central panel: dataset preview grid, rendered chart and PNG download.

use crate::charts::RenderedImage;
use crate::data::Dataset;
use egui::{RichText, ScrollArea, TextureHandle, TextureOptions};
use tracing::warn;

/// Rows shown in the dataset preview.
const PREVIEW_ROWS: usize = 10;
const PREVIEW_HEIGHT: f32 = 260.0;

/// Displays the current dataset preview and the latest rendered chart.
#[derive(Default)]
pub struct ChartViewer {
    image: Option<RenderedImage>,
    texture: Option<TextureHandle>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, image: RenderedImage) {
        self.image = Some(image);
        self.texture = None;
    }

    pub fn clear(&mut self) {
        self.image = None;
        self.texture = None;
    }

    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.as_ref()
    }

    /// Upload the PNG as a texture on first display.
    fn texture(&mut self, ctx: &egui::Context) -> Option<&TextureHandle> {
        if self.texture.is_none() {
            let rendered = self.image.as_ref()?;
            let decoded = match image::load_from_memory(&rendered.bytes) {
                Ok(decoded) => decoded.to_rgba8(),
                Err(e) => {
                    warn!(error = %e, "rendered chart could not be decoded");
                    return None;
                }
            };
            let size = [decoded.width() as usize, decoded.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
            self.texture = Some(ctx.load_texture("chart", color, TextureOptions::LINEAR));
        }
        self.texture.as_ref()
    }

    /// Draw the viewer; returns true when the download button was clicked.
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, dataset: Option<&Dataset>) -> bool {
        let Some(dataset) = dataset else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return false;
        };

        ui.label(RichText::new("Dataset Preview").size(16.0).strong());
        ui.add_space(5.0);
        Self::draw_preview(ui, dataset);

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        let mut download = false;
        if let Some(texture) = self.texture(ctx) {
            ScrollArea::vertical()
                .id_salt("chart_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add(
                        egui::Image::new(texture)
                            .max_width(ui.available_width())
                            .maintain_aspect_ratio(true),
                    );
                    ui.add_space(8.0);
                    let button = egui::Button::new(RichText::new("💾 Download Plot as PNG").size(14.0))
                        .min_size(egui::vec2(200.0, 30.0));
                    download = ui.add(button).clicked();
                });
        }
        download
    }

    fn draw_preview(ui: &mut egui::Ui, dataset: &Dataset) {
        let names = dataset.column_names();
        ScrollArea::both()
            .id_salt("preview_scroll")
            .max_height(PREVIEW_HEIGHT)
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for name in &names {
                            ui.label(RichText::new(name).strong());
                        }
                        ui.end_row();

                        for row in 0..dataset.row_count().min(PREVIEW_ROWS) {
                            for col in 0..dataset.column_count() {
                                ui.label(dataset.cell_text(row, col));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

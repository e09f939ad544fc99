//! QuickPlot Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{RenderedImage, Theme};
use crate::data::{DataLoader, Dataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StatusLevel};
use crate::pipeline::{self, ErrorKind, PlotError};
use egui::SidePanel;
use tracing::{info, warn};

/// Main application window.
///
/// Each interaction runs one synchronous validate → render cycle; only the
/// loaded dataset persists between cycles.
pub struct QuickPlotApp {
    dataset: Option<Dataset>,
    theme: Theme,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl QuickPlotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, theme: Theme) -> Self {
        Self {
            dataset: None,
            theme,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.chart_viewer.clear();
        self.control_panel.settings.csv_path = Some(path.clone());

        match DataLoader::load_csv(&path) {
            Ok(dataset) => {
                self.control_panel.set_status(
                    StatusLevel::Info,
                    &format!(
                        "Loaded {} rows, {} columns",
                        dataset.row_count(),
                        dataset.column_count()
                    ),
                );
                self.control_panel.sync_selections(&dataset);
                self.dataset = Some(dataset);
                self.refresh();
            }
            Err(e) => {
                self.dataset = None;
                let err = PlotError::from(e);
                self.control_panel
                    .set_status(StatusLevel::Error, &err.user_message());
            }
        }
    }

    /// Rebuild the request from the panel and run one plot cycle.
    fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.control_panel.sync_selections(dataset);
        let request = self.control_panel.request();

        match pipeline::plot(dataset, &request, &self.theme) {
            Ok(image) => {
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("{} ready ({}x{} px)", request.plot_type, image.width, image.height),
                );
                self.chart_viewer.set_image(image);
            }
            Err(e) => {
                self.chart_viewer.clear();
                let level = match e.kind() {
                    ErrorKind::Validation => StatusLevel::Warning,
                    ErrorKind::Unexpected => StatusLevel::Error,
                };
                self.control_panel.set_status(level, &e.user_message());
            }
        }
    }

    /// Save the current chart through a save dialog.
    fn handle_download(&mut self) {
        let Some(image) = self.chart_viewer.image() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(RenderedImage::FILE_NAME)
            .save_file()
        else {
            return;
        };

        match image.save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "plot downloaded");
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("Saved {}", path.display()),
                );
            }
            Err(e) => {
                warn!(error = %e, "plot download failed");
                self.control_panel
                    .set_status(StatusLevel::Error, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for QuickPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.dataset.as_ref());

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SettingsChanged => self.refresh(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dataset preview and chart
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.chart_viewer.show(ctx, ui, self.dataset.as_ref()) {
                self.handle_download();
            }
        });
    }
}

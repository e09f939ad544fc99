//! Control Panel Widget
//! Left side panel: data source, plot type, palette, column selectors, bins.

use crate::charts::{
    eligible_columns, requirements, ColorScheme, ColumnRole, PlotRequest, PlotType, DEFAULT_BINS,
    MAX_BINS, MIN_BINS,
};
use crate::data::Dataset;
use egui::{Color32, ComboBox, RichText};
use std::collections::HashMap;
use std::path::PathBuf;

/// User plot settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub csv_path: Option<PathBuf>,
    pub plot_type: PlotType,
    pub color_scheme: ColorScheme,
    pub selections: HashMap<ColumnRole, String>,
    pub bins: usize,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            plot_type: PlotType::Line,
            color_scheme: ColorScheme::default(),
            selections: HashMap::new(),
            bins: DEFAULT_BINS,
        }
    }
}

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: PlotSettings,
    pub status: String,
    pub status_level: StatusLevel,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: PlotSettings::default(),
            status: "Upload a CSV file to get started.".to_string(),
            status_level: StatusLevel::Info,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every role's selection within its eligible columns, defaulting to the first.
    pub fn sync_selections(&mut self, dataset: &Dataset) {
        let plot_type = self.settings.plot_type;
        for requirement in requirements(plot_type) {
            let options = eligible_columns(dataset, plot_type, requirement.role);
            let current = self.settings.selections.get(&requirement.role);
            if current.is_some_and(|c| options.contains(c)) {
                continue;
            }
            match options.into_iter().next() {
                Some(first) => {
                    self.settings.selections.insert(requirement.role, first);
                }
                None => {
                    self.settings.selections.remove(&requirement.role);
                }
            }
        }
    }

    /// Build a fresh request from the current settings.
    pub fn request(&self) -> PlotRequest {
        let plot_type = self.settings.plot_type;
        let columns = requirements(plot_type)
            .iter()
            .filter_map(|r| self.settings.selections.get(&r.role).cloned())
            .collect();

        let mut request =
            PlotRequest::new(plot_type, columns).with_color_scheme(self.settings.color_scheme);
        if plot_type == PlotType::Histogram {
            request = request.with_bins(self.settings.bins);
        }
        request
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, dataset: Option<&Dataset>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 QuickPlot")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("CSV Dataset Plotting Tool")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let Some(dataset) = dataset else {
            self.show_status(ui);
            return action;
        };

        // ===== Plot Section =====
        ui.label(RichText::new("📈 Plot").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Plot type:"));
            ComboBox::from_id_salt("plot_type")
                .width(combo_width)
                .selected_text(self.settings.plot_type.label())
                .show_ui(ui, |ui| {
                    for plot_type in PlotType::ALL {
                        changed |= ui
                            .selectable_value(&mut self.settings.plot_type, plot_type, plot_type.label())
                            .changed();
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Color scheme:"));
            ComboBox::from_id_salt("color_scheme")
                .width(combo_width)
                .selected_text(self.settings.color_scheme.name())
                .show_ui(ui, |ui| {
                    for scheme in ColorScheme::ALL {
                        changed |= ui
                            .selectable_value(&mut self.settings.color_scheme, scheme, scheme.name())
                            .changed();
                    }
                });
        });

        if changed {
            self.sync_selections(dataset);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Column Configuration Section =====
        let plot_type = self.settings.plot_type;
        let slots = requirements(plot_type);
        if !slots.is_empty() {
            ui.label(RichText::new("🔧 Columns").size(14.0).strong());
            ui.add_space(8.0);
        }

        for requirement in slots {
            let options = eligible_columns(dataset, plot_type, requirement.role);
            let selected = self
                .settings
                .selections
                .get(&requirement.role)
                .cloned()
                .unwrap_or_default();

            ui.label(requirement.prompt);
            ComboBox::from_id_salt(("column", requirement.role))
                .width(label_width + combo_width)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for col in &options {
                        if ui.selectable_label(selected == *col, col).clicked() {
                            self.settings.selections.insert(requirement.role, col.clone());
                            changed = true;
                        }
                    }
                });
            ui.add_space(5.0);
        }

        if plot_type == PlotType::Histogram {
            ui.add_space(5.0);
            ui.label("Number of bins:");
            changed |= ui
                .add(egui::Slider::new(&mut self.settings.bins, MIN_BINS..=MAX_BINS))
                .changed();
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        self.show_status(ui);

        if changed {
            action = ControlPanelAction::SettingsChanged;
        }
        action
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        let status_color = match self.status_level {
            StatusLevel::Info => Color32::GRAY,
            StatusLevel::Success => Color32::from_rgb(40, 167, 69),
            StatusLevel::Warning => Color32::from_rgb(255, 193, 7),
            StatusLevel::Error => Color32::from_rgb(220, 53, 69),
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
    }

    /// Set status line text and severity
    pub fn set_status(&mut self, level: StatusLevel, status: &str) {
        self.status_level = level;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SettingsChanged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataColumn;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            DataColumn::categorical("city", vec![Some("a".into()), Some("b".into())]),
            DataColumn::numeric("temp", vec![Some(1.0), Some(2.0)]),
            DataColumn::numeric("rain", vec![Some(3.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn selections_default_to_first_eligible_column() {
        let mut panel = ControlPanel::new();
        panel.sync_selections(&dataset());
        assert_eq!(panel.request(), PlotRequest::line("city", "temp"));

        panel.settings.plot_type = PlotType::Scatter;
        panel.sync_selections(&dataset());
        assert_eq!(panel.request().columns, vec!["temp", "temp"]);
    }

    #[test]
    fn histogram_request_carries_bins_and_scheme() {
        let mut panel = ControlPanel::new();
        panel.settings.plot_type = PlotType::Histogram;
        panel.settings.bins = 35;
        panel.settings.color_scheme = ColorScheme::Inferno;
        panel.sync_selections(&dataset());

        let request = panel.request();
        assert_eq!(request.columns, vec!["temp"]);
        assert_eq!(request.bin_count, Some(35));
        assert_eq!(request.color_scheme, ColorScheme::Inferno);
    }

    #[test]
    fn ineligible_selection_is_replaced() {
        let mut panel = ControlPanel::new();
        panel.settings.plot_type = PlotType::Box;
        panel.settings.selections.insert(ColumnRole::Value, "city".into());
        panel.sync_selections(&dataset());
        assert_eq!(panel.request(), PlotRequest::box_plot("city", "temp"));
    }
}

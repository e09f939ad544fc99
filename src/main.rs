//! QuickPlot - CSV Dataset Plotting Tool
//!
//! Desktop front end: pick a CSV file, choose a plot and download it as PNG.

use anyhow::Context;
use eframe::egui;
use quickplot::charts::Theme;
use quickplot::gui::QuickPlotApp;

fn main() -> anyhow::Result<()> {
    quickplot::logging::init();

    // Optional theme override: `quickplot [theme.json]`
    let theme = match std::env::args_os().nth(1) {
        Some(path) => Theme::from_json_file(&path)
            .with_context(|| format!("loading theme {}", path.to_string_lossy()))?,
        None => Theme::default(),
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("QuickPlot"),
        ..Default::default()
    };

    eframe::run_native(
        "QuickPlot",
        options,
        Box::new(|cc| Ok(Box::new(QuickPlotApp::new(cc, theme)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start window: {}", e))
}

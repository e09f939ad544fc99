//! Theme Module
//! Shared chart styling, passed to the renderer as a plain value.

use plotters::style::{IntoFont, RGBColor, TextStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Points per inch; font and stroke sizes are given in points.
const POINTS_PER_INCH: f64 = 72.0;
/// Upper bound on either canvas side, in pixels.
const MAX_CANVAS_PX: u32 = 12_000;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid theme: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Figure width in inches.
    pub width_in: f64,
    /// Figure height in inches.
    pub height_in: f64,
    pub dpi: u32,
    pub font_family: String,
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    /// Font size of the values written into correlation cells.
    pub annotation_size: f64,
    pub background: [u8; 3],
    pub text_color: [u8; 3],
    pub grid_color: [u8; 3],
    pub grid_alpha: f64,
    /// Line width in points.
    pub line_width: f64,
    /// Line marker radius in points.
    pub marker_radius: f64,
    /// Scatter marker radius in points.
    pub scatter_radius: f64,
    pub scatter_alpha: f64,
    pub box_alpha: f64,
    /// Whitespace kept around the content after cropping, in inches.
    pub crop_padding_in: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 6.0,
            dpi: 300,
            font_family: "sans-serif".to_string(),
            title_size: 14.0,
            label_size: 12.0,
            tick_size: 10.0,
            annotation_size: 10.0,
            background: [255, 255, 255],
            text_color: [0, 0, 0],
            grid_color: [203, 203, 203],
            grid_alpha: 0.7,
            line_width: 2.0,
            marker_radius: 3.0,
            scatter_radius: 5.0,
            scatter_alpha: 0.6,
            box_alpha: 0.7,
            crop_padding_in: 0.1,
        }
    }
}

impl Theme {
    /// Load a theme override; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let text = std::fs::read_to_string(path)?;
        let theme: Theme = serde_json::from_str(&text)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.dpi == 0 {
            return Err(ThemeError::Invalid("dpi must be positive".into()));
        }
        if !(self.width_in > 0.0 && self.height_in > 0.0) {
            return Err(ThemeError::Invalid("figure size must be positive".into()));
        }
        let (w, h) = self.canvas_size();
        if w > MAX_CANVAS_PX || h > MAX_CANVAS_PX {
            return Err(ThemeError::Invalid(format!(
                "canvas {}x{} exceeds {} px",
                w, h, MAX_CANVAS_PX
            )));
        }
        for (name, alpha) in [
            ("grid_alpha", self.grid_alpha),
            ("scatter_alpha", self.scatter_alpha),
            ("box_alpha", self.box_alpha),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ThemeError::Invalid(format!("{} must be within [0, 1]", name)));
            }
        }
        for (name, value) in [
            ("title_size", self.title_size),
            ("label_size", self.label_size),
            ("tick_size", self.tick_size),
            ("annotation_size", self.annotation_size),
            ("line_width", self.line_width),
            ("marker_radius", self.marker_radius),
            ("scatter_radius", self.scatter_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ThemeError::Invalid(format!("{} must be positive", name)));
            }
        }
        if !(self.crop_padding_in.is_finite() && self.crop_padding_in >= 0.0) {
            return Err(ThemeError::Invalid("crop_padding_in must not be negative".into()));
        }
        Ok(())
    }

    /// Canvas size in pixels before cropping.
    pub fn canvas_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Convert points to pixels at the theme's DPI.
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / POINTS_PER_INCH
    }

    /// Same as [`Theme::px`], rounded to whole pixels (at least 1).
    pub fn px_u32(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    pub fn crop_padding_px(&self) -> u32 {
        (self.crop_padding_in * self.dpi as f64).round() as u32
    }

    pub fn background_color(&self) -> RGBColor {
        rgb(self.background)
    }

    pub fn text_rgb(&self) -> RGBColor {
        rgb(self.text_color)
    }

    pub fn grid_rgb(&self) -> RGBColor {
        rgb(self.grid_color)
    }

    fn text_style(&self, points: f64) -> TextStyle<'_> {
        (self.font_family.as_str(), self.px(points))
            .into_font()
            .color(&self.text_rgb())
    }

    pub fn title_style(&self) -> TextStyle<'_> {
        self.text_style(self.title_size)
    }

    pub fn label_style(&self) -> TextStyle<'_> {
        self.text_style(self.label_size)
    }

    pub fn tick_style(&self) -> TextStyle<'_> {
        self.text_style(self.tick_size)
    }

    pub fn annotation_style(&self) -> TextStyle<'_> {
        self.text_style(self.annotation_size)
    }
}

fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_canvas_is_ten_by_six_inches_at_300_dpi() {
        let theme = Theme::default();
        assert_eq!(theme.canvas_size(), (3000, 1800));
        assert_eq!(theme.px(72.0), 300.0);
        assert_eq!(theme.crop_padding_px(), 30);
        assert!(theme.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dpi": 100, "font_family": "serif"}}"#).unwrap();

        let theme = Theme::from_json_file(file.path()).unwrap();
        assert_eq!(theme.dpi, 100);
        assert_eq!(theme.font_family, "serif");
        assert_eq!(theme.width_in, 10.0);
        assert_eq!(theme.canvas_size(), (1000, 600));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let theme = Theme {
            box_alpha: 1.5,
            ..Theme::default()
        };
        assert!(matches!(theme.validate(), Err(ThemeError::Invalid(_))));

        let huge = Theme {
            dpi: 5000,
            ..Theme::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn rejects_bad_sizes() {
        for theme in [
            Theme { title_size: -4.0, ..Theme::default() },
            Theme { tick_size: f64::NAN, ..Theme::default() },
            Theme { scatter_radius: 0.0, ..Theme::default() },
            Theme { crop_padding_in: -0.1, ..Theme::default() },
        ] {
            assert!(matches!(theme.validate(), Err(ThemeError::Invalid(_))));
        }
        let flush = Theme { crop_padding_in: 0.0, ..Theme::default() };
        assert!(flush.validate().is_ok());
    }
}

//! Chart Renderer
//! Draws a validated ChartSpec onto a bitmap canvas and exports a cropped PNG.
//!
//! Layout per chart:
//! 1. Title centered above the plotting area
//! 2. Left and bottom axes with light horizontal/vertical grid
//! 3. Category tick labels drawn by hand (rotated 45° on crowded axes)
//! 4. Side color bar for scatter and correlation charts

use image::RgbImage;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::DrawingErrorKind;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::raster::{self, LabelMask};
use super::spec::{
    BarChart, BoxChart, ChartBody, ChartSpec, CorrelationChart, HistogramChart, LineChart,
    ScatterChart, TextTone, XAxis,
};
use super::theme::{Theme, ThemeError};

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Fill for correlation cells whose coefficient is undefined.
const NAN_FILL: RGBColor = RGBColor(224, 224, 224);
/// Vertical resolution of color bars.
const COLOR_BAR_STEPS: usize = 256;
/// Half the width of a bar, in category slots.
const BAR_HALF_WIDTH: f64 = 0.4;
/// Half the width of a box, in category slots.
const BOX_HALF_WIDTH: f64 = 0.25;
/// Fraction of the data span added on each side of an axis.
const AXIS_PADDING: f64 = 0.05;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font error: {0}")]
    Font(String),
    #[error("Drawing error: {0}")]
    Drawing(String),
    #[error("Canvas buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        match err {
            DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(e)) => {
                RenderError::Font(e.to_string())
            }
            other => RenderError::Drawing(other.to_string()),
        }
    }
}

/// Encoded chart plus the metadata needed to show or download it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

impl RenderedImage {
    pub const FILE_NAME: &'static str = "plot.png";
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        info!(path = %path.as_ref().display(), bytes = self.bytes.len(), "chart saved");
        Ok(())
    }
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Draw `spec` with `theme` and return the tightly cropped PNG.
    pub fn render(spec: &ChartSpec, theme: &Theme) -> Result<RenderedImage, RenderError> {
        theme.validate()?;
        let (width, height) = theme.canvas_size();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&theme.background_color())?;

            let painter = Painter {
                root: &root,
                spec,
                theme,
            };
            match spec.body() {
                ChartBody::Line(chart) => painter.line(chart)?,
                ChartBody::Bar(chart) => painter.bar(chart)?,
                ChartBody::Scatter(chart) => painter.scatter(chart)?,
                ChartBody::Histogram(chart) => painter.histogram(chart)?,
                ChartBody::Box(chart) => painter.box_plot(chart)?,
                ChartBody::Correlation(chart) => painter.correlation(chart)?,
            }
            root.present()?;
        }

        let canvas = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer { width, height })?;
        let cropped = raster::crop_to_content(&canvas, theme.background, theme.crop_padding_px());
        let bytes = raster::encode_png(&cropped, theme.dpi)?;

        info!(
            plot_type = %spec.plot_type(),
            width = cropped.width(),
            height = cropped.height(),
            "chart rendered"
        );
        Ok(RenderedImage {
            bytes,
            width: cropped.width(),
            height: cropped.height(),
            dpi: theme.dpi,
        })
    }
}

/// Borrowed drawing context for one render.
struct Painter<'a, 'b> {
    root: &'a Canvas<'b>,
    spec: &'a ChartSpec,
    theme: &'a Theme,
}

impl<'a, 'b> Painter<'a, 'b> {
    fn gap(&self) -> u32 {
        self.theme.px_u32(4.0)
    }

    fn margin(&self) -> u32 {
        self.theme.px_u32(10.0)
    }

    fn text_size(&self, text: &str, style: &TextStyle) -> Result<(u32, u32), RenderError> {
        Ok(self.root.estimate_text_size(text, style)?)
    }

    fn desc_height(&self) -> Result<u32, RenderError> {
        Ok(self.text_size("Ag", &self.theme.label_style())?.1)
    }

    /// Bottom label area for a numeric x axis.
    fn numeric_axis_height(&self) -> Result<u32, RenderError> {
        let tick_h = self.text_size("0", &self.theme.tick_style())?.1;
        Ok(tick_h + self.desc_height()? + 4 * self.gap())
    }

    /// Bottom label area for hand-drawn category labels.
    fn category_axis_height(&self, labels: &[String], rotation: f64) -> Result<u32, RenderError> {
        let tick = self.theme.tick_style();
        let (sin, cos) = rotation.to_radians().sin_cos();
        let mut extent = 0u32;
        for label in labels {
            let (w, h) = self.text_size(label, &tick)?;
            extent = extent.max((w as f64 * sin + h as f64 * cos).ceil() as u32);
        }
        let (_, canvas_h) = self.root.dim_in_pixel();
        Ok(extent.min(canvas_h * 2 / 5) + self.desc_height()? + 4 * self.gap())
    }

    /// Left label area wide enough for tick labels over `range`.
    fn value_axis_width(&self, range: &Range<f64>) -> Result<u32, RenderError> {
        let tick = self.theme.tick_style();
        let slack = self.text_size("00", &tick)?.0;
        let mut widest = 0u32;
        for v in [range.start, range.end, (range.start + range.end) / 2.0] {
            widest = widest.max(self.text_size(&tick_text(v), &tick)?.0);
        }
        Ok(widest + slack + self.desc_height()? + 4 * self.gap())
    }

    fn build<'c, 'd>(
        &self,
        area: &'c Canvas<'d>,
        x: Range<f64>,
        y: Range<f64>,
        x_area: u32,
        y_area: u32,
    ) -> Result<Chart<'c, 'd>, RenderError> {
        let chart = ChartBuilder::on(area)
            .caption(self.spec.title(), self.theme.title_style())
            .margin(self.margin())
            .x_label_area_size(x_area)
            .y_label_area_size(y_area)
            .build_cartesian_2d(x, y)?;
        Ok(chart)
    }

    /// Axes, grid and numeric tick labels; categorical x ticks are left blank.
    fn draw_mesh(&self, chart: &mut Chart<'_, '_>, categorical_x: bool) -> Result<(), RenderError> {
        let numeric = |v: &f64| tick_text(*v);
        let blank = |_: &f64| String::new();
        let grid = self.theme.grid_rgb().mix(self.theme.grid_alpha);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.spec.x_label())
            .y_desc(self.spec.y_label())
            .label_style(self.theme.tick_style())
            .axis_desc_style(self.theme.label_style())
            .axis_style(self.theme.text_rgb().stroke_width(self.theme.px_u32(0.8)))
            .bold_line_style(grid.stroke_width(self.theme.px_u32(0.5)))
            .max_light_lines(0)
            .y_label_formatter(&numeric);
        if categorical_x {
            mesh.disable_x_mesh()
                .x_label_formatter(&blank)
                .set_tick_mark_size(LabelAreaPosition::Bottom, 0);
        } else {
            mesh.x_label_formatter(&numeric);
        }
        mesh.draw()?;
        Ok(())
    }

    /// Tick labels for categories placed at `i + offset` along the x axis.
    fn category_labels(
        &self,
        chart: &Chart<'_, '_>,
        labels: &[String],
        rotation: f64,
        y_base: f64,
        offset: f64,
    ) -> Result<(), RenderError> {
        let tick = self.theme.tick_style();
        let color = self.theme.text_rgb();
        let gap = self.gap() as i32;

        for (i, label) in labels.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(i as f64 + offset, y_base));
            if rotation == 0.0 {
                let style = tick.pos(Pos::new(HPos::Center, VPos::Top));
                self.root.draw_text(label, &style, (x, y + gap))?;
            } else if let Some(mask) = LabelMask::render(self.root, label, &tick)? {
                mask.stamp_rotated(self.root, (x, y + gap), rotation, &color)?;
            }
        }
        Ok(())
    }

    fn color_bar_width(&self, range: &Range<f64>) -> Result<u32, RenderError> {
        Ok(6 * self.gap() + self.theme.px_u32(14.0) + self.value_axis_width(range)?)
    }

    /// Vertical palette strip aligned with the plotting rows of the main chart.
    fn color_bar(
        &self,
        area: &Canvas<'_>,
        range: Range<f64>,
        label: Option<&str>,
        plot_rows: Range<i32>,
    ) -> Result<(), RenderError> {
        let scheme = self.spec.color_scheme();
        let (_, area_h) = area.dim_in_pixel();
        let top = plot_rows.start.max(0) as u32;
        let bottom = area_h.saturating_sub(plot_rows.end.max(0) as u32);
        let (lo, hi) = (range.start, range.end);

        let mut bar = ChartBuilder::on(area)
            .margin_top(top)
            .margin_bottom(bottom)
            .margin_left(6 * self.gap())
            .right_y_label_area_size(self.value_axis_width(&range)?)
            .build_cartesian_2d(0.0..1.0, range)?;

        bar.draw_series((0..COLOR_BAR_STEPS).map(|k| {
            let step = (hi - lo) / COLOR_BAR_STEPS as f64;
            let from = lo + step * k as f64;
            let t = k as f64 / (COLOR_BAR_STEPS - 1) as f64;
            Rectangle::new([(0.0, from), (1.0, from + step)], scheme.sample(t).filled())
        }))?;

        let numeric = |v: &f64| tick_text(*v);
        let mut mesh = bar.configure_mesh();
        mesh.disable_mesh()
            .disable_x_axis()
            .y_labels(6)
            .y_label_formatter(&numeric)
            .label_style(self.theme.tick_style())
            .axis_desc_style(self.theme.label_style())
            .axis_style(self.theme.text_rgb().stroke_width(self.theme.px_u32(0.8)));
        if let Some(label) = label {
            mesh.y_desc(label);
        }
        mesh.draw()?;

        bar.draw_series(std::iter::once(Rectangle::new(
            [(0.0, lo), (1.0, hi)],
            self.theme.text_rgb().stroke_width(self.theme.px_u32(0.8)),
        )))?;
        Ok(())
    }

    fn line(&self, data: &LineChart) -> Result<(), RenderError> {
        let rotation = self.spec.x_tick_rotation();
        let categories = data.x_axis.categories();
        let categorical = matches!(data.x_axis, XAxis::Categorical(_));

        let x_range = if categorical {
            category_range(categories.len())
        } else {
            let (lo, hi) = extent(data.points.iter().map(|p| p.0));
            padded(lo, hi)
        };
        let (lo, hi) = extent(data.points.iter().map(|p| p.1));
        let y_range = padded(lo, hi);

        let x_area = if categorical {
            self.category_axis_height(categories, rotation)?
        } else {
            self.numeric_axis_height()?
        };
        let y_area = self.value_axis_width(&y_range)?;
        let y_base = y_range.start;
        let mut chart = self.build(self.root, x_range, y_range, x_area, y_area)?;
        self.draw_mesh(&mut chart, categorical)?;

        let stroke = data.color.stroke_width(self.theme.px_u32(self.theme.line_width));
        chart.draw_series(LineSeries::new(data.points.iter().copied(), stroke))?;
        let radius = self.theme.px_u32(self.theme.marker_radius);
        chart.draw_series(
            data.points
                .iter()
                .map(|&p| Circle::new(p, radius, data.color.filled())),
        )?;

        if categorical {
            self.category_labels(&chart, categories, rotation, y_base, 0.0)?;
        }
        debug!(points = data.points.len(), categorical, "line chart drawn");
        Ok(())
    }

    fn bar(&self, data: &BarChart) -> Result<(), RenderError> {
        let rotation = self.spec.x_tick_rotation();
        let (lo, hi) = extent(data.bars.iter().map(|b| b.value));
        let y_range = baseline_range(lo, hi);

        let x_area = self.category_axis_height(&data.categories, rotation)?;
        let y_area = self.value_axis_width(&y_range)?;
        let y_base = y_range.start;
        let mut chart = self.build(
            self.root,
            category_range(data.categories.len()),
            y_range,
            x_area,
            y_area,
        )?;
        self.draw_mesh(&mut chart, true)?;

        chart.draw_series(data.bars.iter().map(|b| {
            let slot = b.slot as f64;
            Rectangle::new(
                [(slot - BAR_HALF_WIDTH, 0.0), (slot + BAR_HALF_WIDTH, b.value)],
                b.color.filled(),
            )
        }))?;

        self.category_labels(&chart, &data.categories, rotation, y_base, 0.0)?;
        debug!(bars = data.bars.len(), categories = data.categories.len(), "bar chart drawn");
        Ok(())
    }

    fn scatter(&self, data: &ScatterChart) -> Result<(), RenderError> {
        let (x_lo, x_hi) = extent(data.points.iter().map(|p| p.x));
        let (y_lo, y_hi) = extent(data.points.iter().map(|p| p.y));
        let y_range = padded(y_lo, y_hi);
        let index_range = bar_range(data.index_range);

        let (width, _) = self.root.dim_in_pixel();
        let bar_w = self.color_bar_width(&index_range)?;
        let (plot_area, bar_area) = self.root.split_horizontally(width.saturating_sub(bar_w));

        let x_area = self.numeric_axis_height()?;
        let y_area = self.value_axis_width(&y_range)?;
        let mut chart = self.build(&plot_area, padded(x_lo, x_hi), y_range, x_area, y_area)?;
        self.draw_mesh(&mut chart, false)?;

        let radius = self.theme.px_u32(self.theme.scatter_radius);
        let alpha = self.theme.scatter_alpha;
        chart.draw_series(
            data.points
                .iter()
                .map(|p| Circle::new((p.x, p.y), radius, p.color.mix(alpha).filled())),
        )?;

        let (_, rows) = chart.plotting_area().get_pixel_range();
        self.color_bar(&bar_area, index_range, Some("Index"), rows)?;
        debug!(points = data.points.len(), "scatter chart drawn");
        Ok(())
    }

    fn histogram(&self, data: &HistogramChart) -> Result<(), RenderError> {
        let (lo, hi) = data.span();
        let peak = data.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        let y_range = 0.0..if peak > 0.0 { peak * (1.0 + AXIS_PADDING) } else { 1.0 };

        let x_area = self.numeric_axis_height()?;
        let y_area = self.value_axis_width(&y_range)?;
        let mut chart = self.build(self.root, padded(lo, hi), y_range, x_area, y_area)?;
        self.draw_mesh(&mut chart, false)?;

        chart.draw_series(data.bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], b.color.filled())
        }))?;
        let edge = WHITE.stroke_width(self.theme.px_u32(1.0));
        chart.draw_series(
            data.bins
                .iter()
                .filter(|b| b.count > 0)
                .map(|b| Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], edge)),
        )?;

        debug!(bins = data.bins.len(), total = data.total(), "histogram drawn");
        Ok(())
    }

    fn box_plot(&self, data: &BoxChart) -> Result<(), RenderError> {
        let rotation = self.spec.x_tick_rotation();
        let labels: Vec<String> = data.groups.iter().map(|g| g.label.clone()).collect();
        let (lo, hi) = extent(
            data.groups
                .iter()
                .filter_map(|g| g.stats.as_ref())
                .flat_map(|s| [s.min, s.max]),
        );
        let y_range = padded(lo, hi);

        let x_area = self.category_axis_height(&labels, rotation)?;
        let y_area = self.value_axis_width(&y_range)?;
        let y_base = y_range.start;
        let mut chart = self.build(self.root, category_range(labels.len()), y_range, x_area, y_area)?;
        self.draw_mesh(&mut chart, true)?;

        let ink = self.theme.text_rgb();
        let outline = ink.stroke_width(self.theme.px_u32(1.0));
        let median = ink.stroke_width(self.theme.px_u32(self.theme.line_width));
        let radius = self.theme.px_u32(self.theme.marker_radius);
        let cap = BOX_HALF_WIDTH / 2.0;

        for (i, group) in data.groups.iter().enumerate() {
            let Some(stats) = &group.stats else {
                continue;
            };
            let x = i as f64;
            let body = [(x - BOX_HALF_WIDTH, stats.q1), (x + BOX_HALF_WIDTH, stats.q3)];

            chart.draw_series([
                Rectangle::new(body, group.color.mix(self.theme.box_alpha).filled()),
                Rectangle::new(body, outline),
            ])?;
            chart.draw_series([
                PathElement::new(vec![(x, stats.q1), (x, stats.whisker_low)], outline),
                PathElement::new(vec![(x, stats.q3), (x, stats.whisker_high)], outline),
                PathElement::new(
                    vec![(x - cap, stats.whisker_low), (x + cap, stats.whisker_low)],
                    outline,
                ),
                PathElement::new(
                    vec![(x - cap, stats.whisker_high), (x + cap, stats.whisker_high)],
                    outline,
                ),
                PathElement::new(
                    vec![(x - BOX_HALF_WIDTH, stats.median), (x + BOX_HALF_WIDTH, stats.median)],
                    median,
                ),
            ])?;
            chart.draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), radius, outline)),
            )?;
        }

        self.category_labels(&chart, &labels, rotation, y_base, 0.0)?;
        debug!(groups = data.groups.len(), "box plot drawn");
        Ok(())
    }

    fn correlation(&self, data: &CorrelationChart) -> Result<(), RenderError> {
        let names = &data.matrix.columns;
        let n = names.len();
        let size = n as f64;
        let rotation = self.spec.x_tick_rotation();
        let tick = self.theme.tick_style();
        let gap = self.gap();

        let x_area = self.category_axis_height(names, rotation)?;
        let mut widest = 0u32;
        for name in names {
            widest = widest.max(self.text_size(name, &tick)?.0);
        }
        let y_area = widest + 3 * gap;
        let range = bar_range(data.value_range);
        let bar_w = self.color_bar_width(&range)?;

        // Keep cells roughly square; the unused canvas is cropped away.
        let (canvas_w, canvas_h) = self.root.dim_in_pixel();
        let title_h = self.text_size(self.spec.title(), &self.theme.title_style())?.1 + 2 * gap;
        let side = canvas_h.saturating_sub(2 * self.margin() + title_h + x_area);
        let heat_w = (side + y_area + 2 * self.margin()).min(canvas_w.saturating_sub(bar_w));
        let (heat_area, rest) = self.root.split_horizontally(heat_w);
        let (bar_area, _) = rest.split_horizontally(bar_w);

        let mut chart = self.build(&heat_area, 0.0..size, 0.0..size, x_area, y_area)?;
        let blank = |_: &f64| String::new();
        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&blank)
            .y_label_formatter(&blank)
            .set_tick_mark_size(LabelAreaPosition::Bottom, 0)
            .set_tick_mark_size(LabelAreaPosition::Left, 0)
            .axis_style(self.theme.text_rgb().stroke_width(self.theme.px_u32(0.8)))
            .draw()?;

        // Row 0 sits at the top.
        let top = |row: usize| size - row as f64;
        chart.draw_series(data.cells.iter().map(|cell| {
            let fill = cell.color.unwrap_or(NAN_FILL);
            Rectangle::new(
                [
                    (cell.col as f64, top(cell.row) - 1.0),
                    (cell.col as f64 + 1.0, top(cell.row)),
                ],
                fill.filled(),
            )
        }))?;

        let centered = self
            .theme
            .annotation_style()
            .pos(Pos::new(HPos::Center, VPos::Center));
        let light = centered.color(&WHITE);
        let dark = centered.color(&BLACK);
        chart.draw_series(data.cells.iter().map(|cell| {
            let style = match cell.tone {
                TextTone::Light => light.clone(),
                TextTone::Dark => dark.clone(),
            };
            Text::new(
                cell.text.clone(),
                (cell.col as f64 + 0.5, top(cell.row) - 0.5),
                style,
            )
        }))?;

        self.category_labels(&chart, names, rotation, 0.0, 0.5)?;
        let row_style = tick.pos(Pos::new(HPos::Right, VPos::Center));
        for (row, name) in names.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(0.0, top(row) - 0.5));
            self.root.draw_text(name, &row_style, (x - gap as i32, y))?;
        }

        let (_, rows) = chart.plotting_area().get_pixel_range();
        self.color_bar(&bar_area, range, None, rows)?;
        debug!(columns = n, "correlation matrix drawn");
        Ok(())
    }
}

/// Short tick text: integers without decimals, others trimmed to 4 places.
fn tick_text(value: f64) -> String {
    let text = if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        let fixed = format!("{:.4}", value);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// Min and max of finite values; `(inf, -inf)` when there are none.
fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = span * AXIS_PADDING;
    (lo - pad)..(hi + pad)
}

/// Value range for bars, anchored at zero on the side the data does not cross.
fn baseline_range(lo: f64, hi: f64) -> Range<f64> {
    let full = padded(lo.min(0.0), hi.max(0.0));
    let start = if lo >= 0.0 { 0.0 } else { full.start };
    let end = if hi <= 0.0 { 0.0 } else { full.end };
    if end > start {
        start..end
    } else {
        0.0..1.0
    }
}

fn category_range(count: usize) -> Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

fn bar_range((lo, hi): (f64, f64)) -> Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        (lo - 0.5)..(lo + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{validate, PlotRequest};
    use crate::data::{DataColumn, Dataset};

    fn small_theme() -> Theme {
        Theme {
            dpi: 50,
            ..Theme::default()
        }
    }

    /// Render, or skip when the host has no usable system font.
    fn render_or_skip(spec: &ChartSpec) -> Option<RenderedImage> {
        match ChartRenderer::render(spec, &small_theme()) {
            Ok(image) => Some(image),
            Err(RenderError::Font(msg)) => {
                eprintln!("skipping render check, no usable font: {}", msg);
                None
            }
            Err(e) => panic!("render failed: {}", e),
        }
    }

    fn dataset() -> Dataset {
        let labels = (0..12).map(|i| Some(format!("item {}", i))).collect();
        let a: Vec<Option<f64>> = (0..12).map(|i| Some(i as f64)).collect();
        let b: Vec<Option<f64>> = (0..12).map(|i| Some((i * i % 7) as f64)).collect();
        Dataset::new(vec![
            DataColumn::categorical("name", labels),
            DataColumn::numeric("a", a),
            DataColumn::numeric("b", b),
        ])
        .unwrap()
    }

    #[test]
    fn every_chart_type_renders_a_cropped_png() {
        let ds = dataset();
        let requests = [
            PlotRequest::line("name", "a"),
            PlotRequest::line("a", "b"),
            PlotRequest::bar("name", "b"),
            PlotRequest::scatter("a", "b"),
            PlotRequest::histogram("b", 5),
            PlotRequest::box_plot("name", "a"),
            PlotRequest::correlation(),
        ];
        for request in requests {
            let spec = validate(&ds, &request).unwrap();
            let Some(image) = render_or_skip(&spec) else {
                return;
            };
            assert_eq!(&image.bytes[..4], b"\x89PNG");
            assert_eq!(image.dpi, 50);
            assert!(image.width > 0 && image.width <= 500 + 2 * 5);
            assert!(image.height > 0 && image.height <= 300 + 2 * 5);
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let spec = validate(&dataset(), &PlotRequest::bar("name", "a")).unwrap();
        let (Some(first), Some(second)) = (render_or_skip(&spec), render_or_skip(&spec)) else {
            return;
        };
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_theme_is_rejected_before_drawing() {
        let spec = validate(&dataset(), &PlotRequest::histogram("a", 10)).unwrap();
        let theme = Theme {
            scatter_alpha: 2.0,
            ..Theme::default()
        };
        assert!(matches!(
            ChartRenderer::render(&spec, &theme),
            Err(RenderError::Theme(_))
        ));
    }

    #[test]
    fn saved_file_matches_bytes() {
        let image = RenderedImage {
            bytes: vec![1, 2, 3],
            width: 1,
            height: 1,
            dpi: 300,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RenderedImage::FILE_NAME);
        image.save(&path).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
        assert_eq!(RenderedImage::MIME_TYPE, "image/png");
    }

    #[test]
    fn tick_text_is_compact() {
        assert_eq!(tick_text(20.0), "20");
        assert_eq!(tick_text(2.5), "2.5");
        assert_eq!(tick_text(-0.0), "0");
        assert_eq!(tick_text(0.12345), "0.1235");
    }

    #[test]
    fn axis_ranges() {
        assert_eq!(padded(0.0, 10.0), -0.5..10.5);
        assert_eq!(padded(3.0, 3.0), 2.5..3.5);
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY), 0.0..1.0);
        assert_eq!(baseline_range(10.0, 20.0), 0.0..21.0);
        assert_eq!(baseline_range(0.0, 0.0), 0.0..1.0);
        assert_eq!(category_range(3), -0.5..2.5);
        assert_eq!(bar_range((2.0, 2.0)), 1.5..2.5);
    }
}

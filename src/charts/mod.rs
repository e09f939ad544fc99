//! Charts module - Plot selection, validation and rendering

mod palette;
mod raster;
mod renderer;
mod request;
mod spec;
mod theme;
mod validator;

pub use palette::{element_fraction, normalize, LINE_SAMPLE};
pub use raster::{content_bounds, crop_to_content, encode_png, LabelMask};
pub use renderer::{ChartRenderer, RenderError, RenderedImage};
pub use request::{ColorScheme, ParseError, PlotRequest, PlotType, DEFAULT_BINS, MAX_BINS, MIN_BINS};
pub use spec::{
    tick_rotation_for, Bar, BarChart, BoxChart, BoxGroup, ChartBody, ChartSpec, CorrelationCell,
    CorrelationChart, HistogramBin, HistogramChart, LineChart, ScatterChart, ScatterPoint,
    TextTone, XAxis, ROTATED_TICK_DEGREES, ROTATE_LABELS_ABOVE,
};
pub use theme::{Theme, ThemeError};
pub use validator::{
    eligible_columns, requirements, validate, ColumnRequirement, ColumnRole, ValidationError,
};

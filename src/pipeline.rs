//! Plot Pipeline
//! One validate → render cycle, with failures classified for display.

use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::charts::{
    validate, ChartRenderer, PlotRequest, RenderError, RenderedImage, Theme, ValidationError,
};
use crate::data::{DataLoader, Dataset, LoadError};

/// Shown under every unexpected error.
pub const FORMAT_GUIDANCE: &str =
    "Please make sure your dataset is properly formatted and contains appropriate data types for the selected plot type.";

/// How a failure should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Expected rejection of the request; shown as a warning.
    Validation,
    /// Anything else; shown as an error with formatting guidance.
    Unexpected,
}

#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoadError),
    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),
}

impl PlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::Validation(_) => ErrorKind::Validation,
            PlotError::Load(_) | PlotError::Render(_) => ErrorKind::Unexpected,
        }
    }

    /// Message for the user; unexpected errors carry the guidance line.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Unexpected => format!("An error occurred: {}\n{}", self, FORMAT_GUIDANCE),
        }
    }
}

/// Validate `request` against `dataset` and render it.
pub fn plot(
    dataset: &Dataset,
    request: &PlotRequest,
    theme: &Theme,
) -> Result<RenderedImage, PlotError> {
    let spec = validate(dataset, request).inspect_err(|e| {
        warn!(plot_type = %request.plot_type, reason = %e, "plot request rejected");
    })?;
    let image = ChartRenderer::render(&spec, theme)?;
    info!(title = spec.title(), bytes = image.bytes.len(), "plot ready");
    Ok(image)
}

/// Load a CSV file and run one plot cycle on it.
pub fn plot_csv(
    path: impl AsRef<Path>,
    request: &PlotRequest,
    theme: &Theme,
) -> Result<RenderedImage, PlotError> {
    let dataset = DataLoader::load_csv(path)?;
    plot(&dataset, request, theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataColumn;

    #[test]
    fn validation_failures_are_warnings() {
        let dataset =
            Dataset::new(vec![DataColumn::categorical("name", vec![Some("a".into())])]).unwrap();
        let err = plot(&dataset, &PlotRequest::correlation(), &Theme::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "No numeric columns found.");
    }

    #[test]
    fn load_failures_are_unexpected_and_carry_guidance() {
        let err = plot_csv("/nonexistent/data.csv", &PlotRequest::correlation(), &Theme::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.user_message().ends_with(FORMAT_GUIDANCE));
    }
}

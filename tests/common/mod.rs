use quickplot::charts::{RenderError, RenderedImage};
use quickplot::PlotError;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.csv` file kept alive by the returned handle.
pub fn csv_fixture(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Unwrap a rendered image, or `None` when the host has no usable font.
#[allow(dead_code)]
pub fn rendered_or_skip(result: Result<RenderedImage, PlotError>) -> Option<RenderedImage> {
    match result {
        Ok(image) => Some(image),
        Err(PlotError::Render(RenderError::Font(msg))) => {
            eprintln!("skipping render assertions, no usable font: {}", msg);
            None
        }
        Err(e) => panic!("plot failed: {}", e),
    }
}

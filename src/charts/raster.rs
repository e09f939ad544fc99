//! Raster Module
//! Pixel-level work on the canvas: rotated labels, tight cropping, PNG encoding.

use image::{imageops, Rgb, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::renderer::RenderError;

/// Ink coverage of a rendered label, cropped to its glyphs.
pub struct LabelMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl LabelMask {
    /// Rasterize `text` dark-on-white into a scratch bitmap and keep its coverage.
    ///
    /// `area` is only used to measure the text.
    pub fn render<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        text: &str,
        style: &TextStyle,
    ) -> Result<Option<Self>, RenderError> {
        let (text_w, text_h) = area.estimate_text_size(text, style)?;
        if text_w == 0 || text_h == 0 {
            return Ok(None);
        }

        // Glyphs may overhang the estimated box.
        let pad = text_h;
        let (width, height) = (text_w + 2 * pad, text_h + 2 * pad);
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let scratch = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let ink = style.color(&BLACK).pos(Pos::new(HPos::Left, VPos::Top));
            scratch.draw_text(text, &ink, (pad as i32, pad as i32))?;
            scratch.present()?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer { width, height })?;
        let Some((x0, y0, x1, y1)) = content_bounds(&image, [255, 255, 255]) else {
            return Ok(None);
        };

        let (w, h) = (x1 - x0 + 1, y1 - y0 + 1);
        let mut coverage = Vec::with_capacity((w * h) as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let Rgb([r, g, b]) = *image.get_pixel(x, y);
                coverage.push(255 - r.min(g).min(b));
            }
        }
        Ok(Some(Self {
            width: w,
            height: h,
            coverage,
        }))
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn coverage_at(&self, x: f64, y: f64) -> u8 {
        if x < 0.0 || y < 0.0 {
            return 0;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }

    /// Draw the label rotated counter-clockwise by `degrees`, pinned at its
    /// top-right corner to `anchor`, so the text ends at the anchor.
    pub fn stamp_rotated<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        anchor: (i32, i32),
        degrees: f64,
        color: &RGBColor,
    ) -> Result<(), RenderError> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f64, self.height as f64);

        let x_from = (-w * cos).floor() as i32;
        let x_to = (h * sin).ceil() as i32;
        let y_to = (w * sin + h * cos).ceil() as i32;

        for dy in 0..=y_to {
            for dx in x_from..=x_to {
                let (fx, fy) = (dx as f64 + 0.5, dy as f64 + 0.5);
                // Inverse rotation back into the unrotated label.
                let sx = fx * cos - fy * sin + w;
                let sy = fx * sin + fy * cos;
                let ink = self.coverage_at(sx, sy);
                if ink == 0 {
                    continue;
                }
                area.draw_pixel(
                    (anchor.0 + dx, anchor.1 + dy),
                    &color.mix(ink as f64 / 255.0),
                )?;
            }
        }
        Ok(())
    }
}

/// Inclusive bounding box `(x0, y0, x1, y1)` of pixels that differ from `background`.
pub fn content_bounds(image: &RgbImage, background: [u8; 3]) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

/// Crop to the drawn content and surround it with `padding` pixels of background.
///
/// A blank canvas is returned unchanged.
pub fn crop_to_content(image: &RgbImage, background: [u8; 3], padding: u32) -> RgbImage {
    let Some((x0, y0, x1, y1)) = content_bounds(image, background) else {
        return image.clone();
    };
    let (w, h) = (x1 - x0 + 1, y1 - y0 + 1);
    let content = imageops::crop_imm(image, x0, y0, w, h).to_image();

    let mut out = RgbImage::from_pixel(w + 2 * padding, h + 2 * padding, Rgb(background));
    imageops::replace(&mut out, &content, padding as i64, padding as i64);
    out
}

const INCHES_PER_METER: f64 = 1.0 / 0.0254;

/// Encode as 8-bit RGB PNG with a pHYs chunk recording `dpi`.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = (dpi as f64 * INCHES_PER_METER).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_with_block() -> RgbImage {
        let mut image = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        for y in 20..30 {
            for x in 40..60 {
                image.put_pixel(x, y, Rgb([10, 20, 30]));
            }
        }
        image
    }

    #[test]
    fn bounds_cover_drawn_pixels_only() {
        let image = canvas_with_block();
        assert_eq!(content_bounds(&image, [255, 255, 255]), Some((40, 20, 59, 29)));
        let blank = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        assert_eq!(content_bounds(&blank, [255, 255, 255]), None);
    }

    #[test]
    fn crop_keeps_padding_around_content() {
        let cropped = crop_to_content(&canvas_with_block(), [255, 255, 255], 5);
        assert_eq!(cropped.dimensions(), (30, 20));
        assert_eq!(cropped.get_pixel(4, 4), &Rgb([255, 255, 255]));
        assert_eq!(cropped.get_pixel(5, 5), &Rgb([10, 20, 30]));
    }

    #[test]
    fn padding_may_extend_past_the_canvas() {
        let mut image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        image.put_pixel(0, 0, Rgb([0, 0, 0]));
        let cropped = crop_to_content(&image, [255, 255, 255], 3);
        assert_eq!(cropped.dimensions(), (7, 7));
        assert_eq!(cropped.get_pixel(3, 3), &Rgb([0, 0, 0]));
    }

    #[test]
    fn encoded_output_is_png() {
        let bytes = encode_png(&canvas_with_block(), 300).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 80));
        assert_eq!(decoded.to_rgb8(), canvas_with_block());
    }

    #[test]
    fn resolution_is_stored_in_the_file() {
        let bytes = encode_png(&canvas_with_block(), 300).unwrap();
        let reader = png::Decoder::new(std::io::Cursor::new(bytes)).read_info().unwrap();
        let dims = reader.info().pixel_dims.expect("pHYs chunk");
        assert_eq!((dims.xppu, dims.yppu), (11811, 11811));
        assert!(matches!(dims.unit, png::Unit::Meter));
    }
}

//! Palette Module
//! Continuous colormaps sampled by fractional position.

use palette::{Mix, Srgb};
use plotters::style::RGBColor;

use super::request::ColorScheme;

// Anchor stops, evenly spaced over [0, 1].
const VIRIDIS: [[u8; 3]; 10] = [
    [68, 1, 84], [72, 40, 120], [62, 74, 137], [49, 104, 142], [38, 130, 142],
    [31, 158, 137], [53, 183, 121], [110, 206, 88], [181, 222, 43], [253, 231, 37],
];

const PLASMA: [[u8; 3]; 10] = [
    [13, 8, 135], [70, 3, 159], [114, 1, 168], [156, 23, 158], [189, 55, 134],
    [216, 87, 107], [237, 121, 83], [251, 159, 58], [253, 202, 38], [240, 249, 33],
];

const MAGMA: [[u8; 3]; 10] = [
    [0, 0, 4], [24, 15, 61], [68, 15, 118], [114, 31, 129], [158, 47, 127],
    [205, 64, 113], [241, 96, 93], [253, 150, 104], [254, 202, 141], [252, 253, 191],
];

const INFERNO: [[u8; 3]; 10] = [
    [0, 0, 4], [27, 12, 65], [74, 12, 107], [120, 28, 109], [165, 44, 96],
    [207, 68, 70], [237, 105, 37], [251, 155, 6], [247, 209, 61], [252, 255, 164],
];

const CIVIDIS: [[u8; 3]; 10] = [
    [0, 34, 78], [18, 53, 112], [59, 73, 108], [87, 93, 109], [112, 113, 115],
    [138, 134, 120], [165, 156, 116], [195, 179, 105], [225, 204, 85], [253, 234, 69],
];

/// Fixed sample point used for single-color charts.
pub const LINE_SAMPLE: f64 = 0.6;

impl ColorScheme {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            ColorScheme::Viridis => &VIRIDIS,
            ColorScheme::Magma => &MAGMA,
            ColorScheme::Plasma => &PLASMA,
            ColorScheme::Inferno => &INFERNO,
            ColorScheme::Cividis => &CIVIDIS,
        }
    }

    /// Color at position `t`; values outside [0, 1] are clamped, NaN maps to 0.
    pub fn sample(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let segments = stops.len() - 1;
        let scaled = t * segments as f64;
        let segment = (scaled.floor() as usize).min(segments - 1);
        let local = (scaled - segment as f64) as f32;

        let from = to_srgb(stops[segment]);
        let to = to_srgb(stops[segment + 1]);
        let mixed: Srgb<u8> = from.mix(to, local).into_format();
        RGBColor(mixed.red, mixed.green, mixed.blue)
    }
}

fn to_srgb([r, g, b]: [u8; 3]) -> Srgb<f32> {
    Srgb::new(r, g, b).into_format()
}

/// Even spacing of element `index` among `total` elements: `index / total`.
pub fn element_fraction(index: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        index as f64 / total as f64
    }
}

/// Position of `value` in `[lo, hi]`, 0 when the range is degenerate.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

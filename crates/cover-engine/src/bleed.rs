//! Bleed margins per binding type, and bleed coverage inspection

use crate::constants::*;
use crate::dimensions::Dimensions;
use crate::render::RasterSurface;

/// Margin applied symmetrically on both edges of each axis (mm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleedMeasurement {
    pub horizontal_mm: f64,
    pub vertical_mm: f64,
}

/// Bleed margins for a binding.
///
/// Hardcover: 14.5 mm left/right and 13 mm top/bottom for board turn-in.
/// Softcover: 3 mm trim bleed on every edge.
pub fn bleed_for(is_hardcover: bool) -> BleedMeasurement {
    if is_hardcover {
        BleedMeasurement {
            horizontal_mm: HARDCOVER_EDGE_HORIZONTAL_MM,
            vertical_mm: HARDCOVER_EDGE_VERTICAL_MM,
        }
    } else {
        BleedMeasurement {
            horizontal_mm: SOFTCOVER_EDGE_MM,
            vertical_mm: SOFTCOVER_EDGE_MM,
        }
    }
}

/// Which sheet edges carry artwork inside their bleed strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BleedStatus {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl BleedStatus {
    pub fn is_complete(&self) -> bool {
        self.top && self.bottom && self.left && self.right
    }

    /// Names of the edges whose bleed strip is blank
    pub fn missing_edges(&self) -> Vec<&'static str> {
        [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ]
        .into_iter()
        .filter(|(_, filled)| !filled)
        .map(|(edge, _)| edge)
        .collect()
    }
}

/// Scan a guides-off surface for non-white pixels along each sheet edge.
///
/// The strip holds the pixels lying wholly within [`BLEED_CHECK_MM`] of the
/// edge, converted with the surface's own pixels-per-millimeter ratio.
pub fn inspect_bleed(surface: &RasterSurface, dimensions: &Dimensions) -> BleedStatus {
    let width = surface.width();
    let height = surface.height();
    if width == 0 || height == 0 || dimensions.cover_width_mm <= 0.0 {
        return BleedStatus::default();
    }

    let px_per_mm = width as f64 / dimensions.cover_width_mm;
    let strip = ((BLEED_CHECK_MM * px_per_mm).floor() as u32).clamp(1, width.min(height));

    let has_content = |x0: u32, y0: u32, w: u32, h: u32| {
        (y0..y0 + h).any(|y| {
            (x0..x0 + w).any(|x| {
                let [r, g, b, _] = surface.pixel_rgba(x, y);
                r != 255 || g != 255 || b != 255
            })
        })
    };

    BleedStatus {
        top: has_content(0, 0, width, strip),
        bottom: has_content(0, height - strip, width, strip),
        left: has_content(0, 0, strip, height),
        right: has_content(width - strip, 0, strip, height),
    }
}

//! Cover sheet dimensions derived from the book's physical model

use crate::bleed::bleed_for;
use crate::constants::*;
use crate::options::BookSpecification;
use crate::types::{CoverError, TrimFormat};

/// Final trim size of a single page in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Overall cover sheet geometry in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub spine_width_mm: f64,
    pub cover_width_mm: f64,
    pub cover_height_mm: f64,
}

impl TrimFormat {
    /// Resolve the trim size, substituting A4 for missing custom dimensions
    pub fn trim_size(self) -> TrimSize {
        if let Some((width_mm, height_mm)) = self.named_dimensions_mm() {
            return TrimSize {
                width_mm,
                height_mm,
            };
        }

        let (width, height) = self.custom_parts();
        TrimSize {
            width_mm: width.unwrap_or(FALLBACK_TRIM_WIDTH_MM),
            height_mm: height.unwrap_or(FALLBACK_TRIM_HEIGHT_MM),
        }
    }

    /// Describe the fallback `trim_size` applied, if any
    pub fn fallback_notice(self) -> Option<CoverError> {
        if self.named_dimensions_mm().is_some() {
            return None;
        }

        match self.custom_parts() {
            (None, None) => Some(CoverError::InvalidFormatInput {
                missing: "width and height",
                fallback_mm: FALLBACK_TRIM_WIDTH_MM,
            }),
            (None, Some(_)) => Some(CoverError::InvalidFormatInput {
                missing: "width",
                fallback_mm: FALLBACK_TRIM_WIDTH_MM,
            }),
            (Some(_), None) => Some(CoverError::InvalidFormatInput {
                missing: "height",
                fallback_mm: FALLBACK_TRIM_HEIGHT_MM,
            }),
            (Some(_), Some(_)) => None,
        }
    }

    /// Custom width/height with zero and NaN treated as missing
    fn custom_parts(self) -> (Option<f64>, Option<f64>) {
        match self {
            TrimFormat::Custom {
                width_mm,
                height_mm,
            } => {
                let usable = |v: Option<f64>| v.filter(|v| *v != 0.0 && !v.is_nan());
                (usable(width_mm), usable(height_mm))
            }
            _ => (None, None),
        }
    }
}

/// Compute spine width and cover sheet size for a specification.
///
/// Pure and deterministic. The wrap allowance on each axis is exactly twice
/// the bleed returned by [`bleed_for`] for the same binding.
pub fn compute_dimensions(spec: &BookSpecification) -> Dimensions {
    let trim = spec.format.trim_size();
    let hardcover = spec.binding.is_hardcover();

    let block_mm = spec.page_count as f64 * spec.paper.caliper_mm();
    let spine_width_mm = if hardcover {
        block_mm + HARDCOVER_SPINE_BOARD_MM
    } else {
        block_mm
    };

    let bleed = bleed_for(hardcover);
    let cover_width_mm = 2.0 * trim.width_mm + spine_width_mm + 2.0 * bleed.horizontal_mm;
    let cover_height_mm = trim.height_mm + 2.0 * bleed.vertical_mm;

    Dimensions {
        spine_width_mm,
        cover_width_mm,
        cover_height_mm,
    }
}

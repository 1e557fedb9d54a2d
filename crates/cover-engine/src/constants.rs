//! Shared constants for cover geometry and rendering
//!
//! This module centralizes the physical-process parameters and styling
//! values used throughout the engine.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter, as used for the exported page size
pub const POINTS_PER_MM: f64 = 2.83465;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Binding Allowances
// =============================================================================
//
// The cover sheet grows by twice the per-edge margin on each axis. Bleed and
// wrap allowance are both derived from these values, so they cannot drift
// apart. Confirm with the print vendor before changing any of them.

/// Hardcover board turn-in plus hinge, per left/right edge (mm)
pub const HARDCOVER_EDGE_HORIZONTAL_MM: f64 = 14.5;

/// Hardcover board turn-in, per top/bottom edge (mm)
pub const HARDCOVER_EDGE_VERTICAL_MM: f64 = 13.0;

/// Softcover trim bleed on every edge (mm)
pub const SOFTCOVER_EDGE_MM: f64 = 3.0;

/// Board material absorbed into a hardcover spine block (mm)
pub const HARDCOVER_SPINE_BOARD_MM: f64 = 6.0;

/// Trim size used when a custom format leaves a dimension out (A4)
pub const FALLBACK_TRIM_WIDTH_MM: f64 = 210.0;
pub const FALLBACK_TRIM_HEIGHT_MM: f64 = 297.0;

// =============================================================================
// Accepted Input Ranges
// =============================================================================

pub const MIN_PAGE_COUNT: u32 = 20;
pub const MAX_PAGE_COUNT: u32 = 800;
pub const MIN_PANEL_SCALE: f64 = 1.0;
pub const MAX_PANEL_SCALE: f64 = 1.2;

// =============================================================================
// Raster Resolutions
// =============================================================================

pub const PREVIEW_DPI_DESKTOP: f64 = 96.0;
pub const PREVIEW_DPI_CONSTRAINED: f64 = 72.0;
pub const EXPORT_DPI_DESKTOP: f64 = 300.0;
pub const EXPORT_DPI_CONSTRAINED: f64 = 150.0;

/// Largest surface edge we are willing to allocate (pixels)
pub const MAX_SURFACE_SIDE_PX: i64 = 32_767;

/// PDF pages are rasterized once at this multiple of their native size
pub const PDF_SUPERSAMPLE_SCALE: f32 = 2.0;

// =============================================================================
// Guides
// =============================================================================

/// Guide stroke colour (#2563eb)
pub const GUIDE_COLOR: (u8, u8, u8) = (0x25, 0x63, 0xeb);

/// Guide stroke width in device pixels
pub const GUIDE_LINE_WIDTH_PX: f32 = 1.0;

/// Dash and gap length of the center crosshair (mm)
pub const GUIDE_DASH_MM: f32 = 4.0;

/// Cap height of measurement labels (mm)
pub const LABEL_HEIGHT_MM: f32 = 2.0;

/// Distance of the rotated height label from the back panel's left edge (mm)
pub const HEIGHT_LABEL_INSET_MM: f64 = 12.0;

/// Distance of the spine width label below the front panel's top edge (mm)
pub const SPINE_LABEL_OFFSET_MM: f64 = 20.0;

// =============================================================================
// Bleed Inspection
// =============================================================================

/// Width of the edge strip scanned for artwork (mm)
pub const BLEED_CHECK_MM: f64 = 3.0;

//! Canvas rendering of the cover sheet
//!
//! This module handles:
//! - Raster surfaces sized from the sheet dimensions
//! - Drawing panel artwork into its placed rectangle
//! - Preview guide overlays and their measurement labels

mod canvas;
mod glyphs;
mod guides;
mod surface;

pub use canvas::render;
pub use surface::{RasterSurface, Resolution};

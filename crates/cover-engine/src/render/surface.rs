//! Raster surfaces and their resolution

use tiny_skia::Pixmap;

use crate::constants::*;
use crate::dimensions::Dimensions;
use crate::types::{CoverError, DeviceClass, Result};

/// Device pixels per millimeter of a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub px_per_mm: f64,
}

impl Resolution {
    pub fn from_px_per_mm(px_per_mm: f64) -> Self {
        Self { px_per_mm }
    }

    pub fn from_dpi(dpi: f64) -> Self {
        Self {
            px_per_mm: dpi / MM_PER_INCH,
        }
    }

    /// Interactive preview resolution
    pub fn preview(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Desktop => Self::from_dpi(PREVIEW_DPI_DESKTOP),
            DeviceClass::Constrained => Self::from_dpi(PREVIEW_DPI_CONSTRAINED),
        }
    }

    /// Production export resolution
    pub fn export(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Desktop => Self::from_dpi(EXPORT_DPI_DESKTOP),
            DeviceClass::Constrained => Self::from_dpi(EXPORT_DPI_CONSTRAINED),
        }
    }

    pub fn dpi(&self) -> f64 {
        self.px_per_mm * MM_PER_INCH
    }
}

/// A pixel buffer covering the whole cover sheet.
///
/// Lives for one render or export call; never persisted.
pub struct RasterSurface {
    pixmap: Pixmap,
    resolution: Resolution,
}

impl RasterSurface {
    /// Allocate a surface of `ceil(cover_width * px_per_mm)` by
    /// `ceil(cover_height * px_per_mm)` pixels.
    ///
    /// Fails with [`CoverError::CanvasContextUnavailable`] when the size is
    /// empty, not finite or larger than [`MAX_SURFACE_SIDE_PX`].
    pub fn for_dimensions(dimensions: &Dimensions, resolution: Resolution) -> Result<Self> {
        let width = (dimensions.cover_width_mm * resolution.px_per_mm).ceil();
        let height = (dimensions.cover_height_mm * resolution.px_per_mm).ceil();

        let unavailable = || CoverError::CanvasContextUnavailable {
            width: width as i64,
            height: height as i64,
        };

        let usable = |side: f64| (1.0..=MAX_SURFACE_SIDE_PX as f64).contains(&side);
        if !usable(width) || !usable(height) {
            return Err(unavailable());
        }

        let pixmap = Pixmap::new(width as u32, height as u32).ok_or_else(unavailable)?;
        log::debug!(
            "Allocated {}x{} px surface at {:.1} DPI",
            pixmap.width(),
            pixmap.height(),
            resolution.dpi()
        );

        Ok(Self { pixmap, resolution })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Straight RGBA value of one pixel; transparent black outside the surface
    pub fn pixel_rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixmap
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .unwrap_or([0; 4])
    }

    /// Straight RGBA bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Opaque RGB bytes, row-major, alpha dropped
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect()
    }

    /// Encode the surface as PNG for host display
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| CoverError::Export(format!("Failed to encode PNG: {}", e)))
    }
}

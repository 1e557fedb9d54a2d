//! PDF sources: page-order convention, page counting and rasterization
//!
//! PDF pages are vector content. Each requested page is rasterized once at
//! [`PDF_SUPERSAMPLE_SCALE`] times its native size so it stays sharp when the
//! renderer later scales it up for export.

use thiserror::Error;

use crate::types::PanelKind;

#[cfg(feature = "pdfium")]
use pdfium_render::prelude::*;

/// Page order of every PDF source: page 1 is the back cover, page 2 the
/// spine, page 3 the front cover.
///
/// This is a compatibility contract with the production pipeline. Nothing in
/// the file marks it, so a combined PDF in any other order silently puts
/// artwork on the wrong panel. Do not reorder.
pub const COMBINED_PDF_PAGE_ORDER: [PanelKind; 3] =
    [PanelKind::Back, PanelKind::Spine, PanelKind::Front];

/// 1-based page number a panel reads from a PDF source
pub fn page_number_for(kind: PanelKind) -> usize {
    COMBINED_PDF_PAGE_ORDER
        .iter()
        .position(|k| *k == kind)
        .map_or(1, |index| index + 1)
}

/// Count the pages of a PDF held in memory
pub fn pdf_page_count(bytes: &[u8]) -> Result<usize, lopdf::Error> {
    let document = lopdf::Document::load_mem(bytes)?;
    Ok(document.get_pages().len())
}

/// Straight (non-premultiplied) RGBA pixels of one rendered page
#[derive(Debug, Clone)]
pub struct RgbaPage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum RasterizeError {
    #[error("PDF rasterizer unavailable: {0}")]
    Unavailable(String),
    #[error("PDF rendering failed: {0}")]
    Backend(String),
}

#[cfg(feature = "pdfium")]
impl From<PdfiumError> for RasterizeError {
    fn from(e: PdfiumError) -> Self {
        RasterizeError::Backend(e.to_string())
    }
}

/// Renders a single PDF page to pixels.
///
/// Implementations are called from blocking worker threads.
pub trait PageRasterizer: Send + Sync {
    /// Render the zero-based `page_index` at `scale` times its native size
    fn rasterize(
        &self,
        pdf: &[u8],
        page_index: usize,
        scale: f32,
    ) -> Result<RgbaPage, RasterizeError>;
}

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdfium")]
fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Production rasterizer backed by the Pdfium library
#[cfg(feature = "pdfium")]
#[derive(Debug, Default)]
pub struct PdfiumRasterizer;

#[cfg(feature = "pdfium")]
impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        page_index: usize,
        scale: f32,
    ) -> Result<RgbaPage, RasterizeError> {
        // Bindings are not shareable across threads, bind per call
        let pdfium = init_pdfium()?;
        let document = pdfium.load_pdf_from_byte_slice(pdf, None)?;
        let page = document.pages().get(page_index as u16)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&config)?;

        Ok(RgbaPage {
            width: bitmap.width() as u32,
            height: bitmap.height() as u32,
            rgba: bitmap.as_rgba_bytes().to_vec(),
        })
    }
}

/// Stand-in used when the crate is built without a PDF backend
#[derive(Debug, Default)]
pub struct UnavailableRasterizer;

impl PageRasterizer for UnavailableRasterizer {
    fn rasterize(
        &self,
        _pdf: &[u8],
        _page_index: usize,
        _scale: f32,
    ) -> Result<RgbaPage, RasterizeError> {
        Err(RasterizeError::Unavailable(
            "built without the `pdfium` feature".to_string(),
        ))
    }
}

/// Best rasterizer available in this build
pub fn default_rasterizer() -> std::sync::Arc<dyn PageRasterizer> {
    #[cfg(feature = "pdfium")]
    {
        std::sync::Arc::new(PdfiumRasterizer)
    }
    #[cfg(not(feature = "pdfium"))]
    {
        std::sync::Arc::new(UnavailableRasterizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_order_is_back_spine_front() {
        assert_eq!(page_number_for(PanelKind::Back), 1);
        assert_eq!(page_number_for(PanelKind::Spine), 2);
        assert_eq!(page_number_for(PanelKind::Front), 3);
    }

    #[test]
    fn test_page_count_rejects_garbage() {
        assert!(pdf_page_count(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_unavailable_rasterizer_reports_error() {
        let result = UnavailableRasterizer.rasterize(b"%PDF-1.5", 0, 2.0);
        assert!(matches!(result, Err(RasterizeError::Unavailable(_))));
    }
}

//! Production PDF export
//!
//! The exported file has exactly one page, sized to the cover sheet in
//! points, with the rendered surface embedded as a single full-bleed image.

use std::path::Path;

use lopdf::{Document, Object};
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt,
    RawImage, RawImageData, RawImageFormat, XObjectTransform,
};

use crate::constants::{mm_to_pt, pt_to_mm};
use crate::dimensions::Dimensions;
use crate::render::RasterSurface;
use crate::types::{CoverError, Orientation, Result};

/// Image DPI at which one surface pixel spans one point before scaling
const NATIVE_IMAGE_DPI: f32 = 72.0;

/// A finished single-page print PDF
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub bytes: Vec<u8>,
    pub width_pt: f64,
    pub height_pt: f64,
    pub orientation: Orientation,
}

impl ExportedPdf {
    pub fn width_mm(&self) -> f64 {
        pt_to_mm(self.width_pt)
    }

    pub fn height_mm(&self) -> f64 {
        pt_to_mm(self.height_pt)
    }
}

/// Embed `surface` as a full-page image in a PDF sized to `dimensions`.
///
/// The surface must come from a guides-off pass. Identical surfaces and
/// dimensions always give a page of identical physical size.
pub fn export_pdf(surface: &RasterSurface, dimensions: &Dimensions) -> Result<ExportedPdf> {
    let width_pt = mm_to_pt(dimensions.cover_width_mm);
    let height_pt = mm_to_pt(dimensions.cover_height_mm);
    let orientation = Orientation::for_size(width_pt, height_pt);

    let width_px = surface.width() as usize;
    let height_px = surface.height() as usize;
    if width_px == 0 || height_px == 0 {
        return Err(CoverError::Export("Cannot export an empty surface".to_string()));
    }

    let raw = RawImage {
        pixels: RawImageData::U8(surface.to_rgb8()),
        width: width_px,
        height: height_px,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let mut doc = PdfDocument::new("Book cover");
    let image_id = doc.add_image(&raw);

    // At 72 DPI the image is width_px points wide; stretch it to the page
    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(width_pt as f32 / width_px as f32),
            scale_y: Some(height_pt as f32 / height_px as f32),
            dpi: Some(NATIVE_IMAGE_DPI),
            rotate: None,
        },
    }];

    doc.pages.push(PdfPage::new(
        Mm::from(Pt(width_pt as f32)),
        Mm::from(Pt(height_pt as f32)),
        ops,
    ));

    let mut warnings = Vec::new();
    let written = doc.save(&save_options(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warning(s)", warnings.len());
    }
    let bytes = set_page_boxes(&written, width_pt, height_pt)?;

    log::info!(
        "Exported {:.1} x {:.1} mm {:?} cover ({}x{} px, {} bytes)",
        dimensions.cover_width_mm,
        dimensions.cover_height_mm,
        orientation,
        width_px,
        height_px,
        bytes.len()
    );

    Ok(ExportedPdf {
        bytes,
        width_pt,
        height_pt,
        orientation,
    })
}

/// Lossless, full-resolution image embedding.
///
/// The writer's defaults downsample large images and may convert them to
/// greyscale, which would undo the export resolution.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// Overwrite every page box with the exact sheet size in points.
///
/// The page builder rounds its boxes to whole points, which is off by up to
/// 0.18 mm.
fn set_page_boxes(bytes: &[u8], width_pt: f64, height_pt: f64) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)?;
    let page_box = Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width_pt as f32),
        Object::Real(height_pt as f32),
    ]);

    let page_ids: Vec<_> = doc.get_pages().values().copied().collect();
    for page_id in page_ids {
        let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page_dict.set("MediaBox", page_box.clone());
        for key in ["TrimBox", "CropBox", "BleedBox"] {
            if page_dict.has(key.as_bytes()) {
                page_dict.set(key, page_box.clone());
            }
        }
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Write an exported PDF to disk
pub async fn save_pdf(exported: &ExportedPdf, path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, &exported.bytes).await?;
    Ok(())
}

/// Read the first page's MediaBox back as (width, height) in millimeters
pub fn read_page_size_mm(bytes: &[u8]) -> Result<(f64, f64)> {
    let doc = Document::load_mem(bytes)?;
    let page_id = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| CoverError::Export("PDF has no pages".to_string()))?;

    let page_dict = doc.get_dictionary(page_id)?;
    let media_box = page_dict.get(b"MediaBox").and_then(|obj| obj.as_array())?;

    let coords: Vec<f64> = media_box.iter().filter_map(extract_number).collect();
    let [x0, y0, x1, y1] = coords[..] else {
        return Err(CoverError::Export("Malformed MediaBox".to_string()));
    };

    Ok((pt_to_mm(x1 - x0), pt_to_mm(y1 - y0)))
}

fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

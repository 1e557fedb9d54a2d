mod common;

use common::*;
use cover_engine::source::{LoadedPanels, PanelLoad};
use cover_engine::*;
use std::sync::Arc;
use tempfile::TempDir;
use tiny_skia::{Color, Pixmap};

fn solid_panel(kind: PanelKind, [r, g, b]: [u8; 3]) -> PanelLoad {
    let mut pixmap = Pixmap::new(2, 2).unwrap();
    pixmap.fill(Color::from_rgba8(r, g, b, 255));
    PanelLoad::Loaded(Arc::new(PanelImage::new(kind, pixmap)))
}

fn export_at(spec: &BookSpecification, px_per_mm: f64) -> (Dimensions, ExportedPdf) {
    let dims = compute_dimensions(spec);
    let mut surface =
        RasterSurface::for_dimensions(&dims, Resolution::from_px_per_mm(px_per_mm)).unwrap();
    render(&mut surface, &CoverStyle::default(), &PanelSet::default(), &dims, false);
    let exported = export_pdf(&surface, &dims).unwrap();
    (dims, exported)
}

#[test]
fn test_page_size_round_trips_to_dimensions() {
    for spec in [hardcover_a4(), softcover_a5()] {
        let (dims, exported) = export_at(&spec, 1.0);
        let (width_mm, height_mm) = read_page_size_mm(&exported.bytes).unwrap();

        assert!((width_mm - dims.cover_width_mm).abs() < 0.01, "{}", width_mm);
        assert!((height_mm - dims.cover_height_mm).abs() < 0.01, "{}", height_mm);
        assert!((exported.width_mm() - dims.cover_width_mm).abs() < 1e-9);
    }
}

#[test]
fn test_page_size_uses_point_ratio() {
    let (dims, exported) = export_at(&hardcover_a4(), 1.0);
    assert!((exported.width_pt - dims.cover_width_mm * 2.83465).abs() < 1e-9);
    assert!((exported.height_pt - 323.0 * 2.83465).abs() < 1e-9);
}

#[test]
fn test_page_size_does_not_depend_on_resolution() {
    let (_, low) = export_at(&softcover_a5(), 0.5);
    let (_, high) = export_at(&softcover_a5(), 2.0);

    let low_size = read_page_size_mm(&low.bytes).unwrap();
    let high_size = read_page_size_mm(&high.bytes).unwrap();
    assert!((low_size.0 - high_size.0).abs() < 1e-6);
    assert!((low_size.1 - high_size.1).abs() < 1e-6);
}

#[test]
fn test_orientation_follows_aspect() {
    let (_, wide) = export_at(&softcover_a5(), 0.5);
    assert_eq!(wide.orientation, Orientation::Landscape);

    // 127.1 x 406 mm sheet
    let tall = BookSpecification {
        binding: BindingType::Softcover,
        format: TrimFormat::custom(60.0, 400.0),
        page_count: 20,
        ..Default::default()
    };
    let (_, portrait) = export_at(&tall, 0.5);
    assert_eq!(portrait.orientation, Orientation::Portrait);
}

#[test]
fn test_exported_pdf_has_one_page() {
    let (_, exported) = export_at(&softcover_a5(), 0.5);
    let doc = lopdf::Document::load_mem(&exported.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

/// (width, height, colour space) of every image XObject in the file
fn embedded_images(bytes: &[u8]) -> Vec<(i64, i64, Vec<u8>)> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image")
        })
        .map(|stream| {
            let dict = &stream.dict;
            (
                dict.get(b"Width").and_then(|w| w.as_i64()).unwrap(),
                dict.get(b"Height").and_then(|h| h.as_i64()).unwrap(),
                dict.get(b"ColorSpace").and_then(|c| c.as_name()).unwrap().to_vec(),
            )
        })
        .collect()
}

#[test]
fn test_surface_is_embedded_at_full_resolution() {
    let dims = compute_dimensions(&hardcover_a4());
    let mut surface =
        RasterSurface::for_dimensions(&dims, Resolution::from_px_per_mm(4.0)).unwrap();
    // Mixed colour content so nothing could pass as greyscale
    let layout = place_panels(&dims, &bleed_for(true), 1.0, 1.0);
    let loads = LoadedPanels {
        back: solid_panel(PanelKind::Back, [200, 30, 30]),
        spine: PanelLoad::Absent,
        front: solid_panel(PanelKind::Front, [30, 30, 200]),
    };
    let panels = assemble_panels(&layout, &loads);
    render(&mut surface, &CoverStyle::default(), &panels, &dims, false);

    let exported = export_pdf(&surface, &dims).unwrap();

    let images = embedded_images(&exported.bytes);
    assert_eq!(images.len(), 1);
    let (width, height, colour_space) = &images[0];
    assert_eq!(*width, surface.width() as i64);
    assert_eq!(*height, surface.height() as i64);
    assert_eq!(colour_space.as_slice(), b"DeviceRGB");
}

#[test]
fn test_media_box_is_not_rounded() {
    // 304.2 mm is 862.299 pt, which whole points would miss by 0.1 mm
    let (dims, exported) = export_at(&softcover_a5(), 0.5);
    let (width_mm, height_mm) = read_page_size_mm(&exported.bytes).unwrap();

    assert!((width_mm - dims.cover_width_mm).abs() < 0.001, "{}", width_mm);
    assert!((height_mm - dims.cover_height_mm).abs() < 0.001, "{}", height_mm);
}

#[tokio::test]
async fn test_save_pdf() {
    let (_, exported) = export_at(&softcover_a5(), 0.5);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cover.pdf");

    save_pdf(&exported, &path).await.unwrap();

    let written = tokio::fs::read(&path).await.unwrap();
    assert_eq!(written, exported.bytes);
}

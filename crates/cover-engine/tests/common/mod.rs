#![allow(dead_code)]

use cover_engine::source::{PageRasterizer, RasterizeError, RgbaPage};
use cover_engine::*;
use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::{Dictionary, Document, Object, Stream};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Colour each test rasterizer page is filled with: back red, spine green, front blue
pub const PAGE_COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

pub fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(420),
                    Object::Integer(595),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn pdf_upload(name: &str, num_pages: usize) -> UploadedFile {
    let mut doc = create_test_pdf(num_pages);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    UploadedFile::new(name, "application/pdf", bytes)
}

pub fn png_upload(name: &str, color: [u8; 3], width: u32, height: u32) -> UploadedFile {
    let [r, g, b] = color;
    let image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    UploadedFile::new(name, "image/png", bytes)
}

/// In-process rasterizer: each page becomes a solid block of its page colour
#[derive(Default)]
pub struct SolidRasterizer {
    pub calls: AtomicUsize,
}

impl PageRasterizer for SolidRasterizer {
    fn rasterize(
        &self,
        _pdf: &[u8],
        page_index: usize,
        scale: f32,
    ) -> std::result::Result<RgbaPage, RasterizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let width = (20.0 * scale) as u32;
        let height = (30.0 * scale) as u32;
        let [r, g, b] = PAGE_COLORS[page_index % PAGE_COLORS.len()];

        Ok(RgbaPage {
            width,
            height,
            rgba: [r, g, b, 255].repeat((width * height) as usize),
        })
    }
}

pub fn test_engine() -> (CoverEngine, Arc<SolidRasterizer>) {
    let rasterizer = Arc::new(SolidRasterizer::default());
    let engine = CoverEngine::new(rasterizer.clone());
    (engine, rasterizer)
}

pub fn softcover_a5() -> BookSpecification {
    BookSpecification {
        binding: BindingType::Softcover,
        format: TrimFormat::A5,
        paper: PaperType::Offset80,
        page_count: 40,
        ..Default::default()
    }
}

pub fn hardcover_a4() -> BookSpecification {
    BookSpecification {
        binding: BindingType::Hardcover,
        format: TrimFormat::A4,
        paper: PaperType::ArtMatt135,
        page_count: 100,
        ..Default::default()
    }
}

pub fn rgb_at(surface: &RasterSurface, x: f64, y: f64) -> [u8; 3] {
    let [r, g, b, _] = surface.pixel_rgba(x as u32, y as u32);
    [r, g, b]
}

//! Bitmap decoding into premultiplied pixmaps

use image::ImageFormat;
use tiny_skia::Pixmap;

/// Decode an encoded bitmap, preferring the format named by `mime`
pub(crate) fn decode_bitmap(data: &[u8], mime: &str) -> Result<Pixmap, String> {
    let format = ImageFormat::from_mime_type(mime).or_else(|| image::guess_format(data).ok());

    let decoded = match format {
        Some(format) => image::load_from_memory_with_format(data, format),
        None => image::load_from_memory(data),
    }
    .map_err(|e| e.to_string())?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    pixmap_from_rgba(width, height, rgba.as_raw())
        .ok_or_else(|| format!("Cannot hold a {}x{} px bitmap", width, height))
}

/// Copy straight RGBA pixels into a premultiplied pixmap.
///
/// Returns `None` for empty sizes or a buffer that does not match them.
pub(crate) fn pixmap_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Pixmap> {
    if rgba.len() != width as usize * height as usize * 4 {
        return None;
    }

    let mut pixmap = Pixmap::new(width, height)?;
    for (src, dst) in rgba.chunks_exact(4).zip(pixmap.data_mut().chunks_exact_mut(4)) {
        let a = src[3];
        dst[0] = premultiply(src[0], a);
        dst[1] = premultiply(src[1], a);
        dst[2] = premultiply(src[2], a);
        dst[3] = a;
    }
    Some(pixmap)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let mut src = RgbaImage::new(3, 2);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let pixmap = decode_bitmap(&encode_png(&src), "image/png").unwrap();

        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        assert_eq!(&pixmap.data()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_with_generic_mime_guesses_format() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
        assert!(decode_bitmap(&encode_png(&src), "image/x-unknown").is_ok());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_bitmap(b"not an image", "image/png").is_err());
    }

    #[test]
    fn test_premultiplies_alpha() {
        let pixmap = pixmap_from_rgba(1, 1, &[255, 255, 255, 128]).unwrap();
        assert_eq!(pixmap.data(), &[128, 128, 128, 128]);
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        assert!(pixmap_from_rgba(2, 2, &[0; 4]).is_none());
        assert!(pixmap_from_rgba(0, 0, &[]).is_none());
    }
}

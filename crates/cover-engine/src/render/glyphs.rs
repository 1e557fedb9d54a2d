//! Built-in 5x7 bitmap glyphs for measurement labels
//!
//! Labels only ever show values like `210mm`, so a handful of glyphs drawn
//! as filled cells avoids shipping a font file.

use tiny_skia::{Path, PathBuilder, Rect};

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// Horizontal advance per glyph, in cells
const ADVANCE: usize = GLYPH_COLUMNS + 1;

/// Rows top to bottom; bit 4 is the leftmost column
fn glyph(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'm' => [0x00, 0x00, 0x1a, 0x15, 0x15, 0x11, 0x11],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c],
        '-' => [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00],
        _ => return None,
    };
    Some(rows)
}

/// Build the outline of `text` with the given cap height, centered on the
/// origin. Unknown characters leave a blank cell.
pub(crate) fn text_path(text: &str, cap_height: f32) -> Option<Path> {
    let cell = cap_height / GLYPH_ROWS as f32;
    let columns = text.chars().count() * ADVANCE;
    if columns == 0 {
        return None;
    }

    let total_width = (columns - 1) as f32 * cell;
    let left = -total_width / 2.0;
    let top = -cap_height / 2.0;

    let mut pb = PathBuilder::new();
    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let origin_x = left + (index * ADVANCE) as f32 * cell;

        for (row, bits) in rows.iter().enumerate() {
            for column in 0..GLYPH_COLUMNS {
                if bits & (1 << (GLYPH_COLUMNS - 1 - column)) == 0 {
                    continue;
                }
                if let Some(rect) = Rect::from_xywh(
                    origin_x + column as f32 * cell,
                    top + row as f32 * cell,
                    cell,
                    cell,
                ) {
                    pb.push_rect(rect);
                }
            }
        }
    }

    pb.finish()
}

//! Non-printing guide overlays for the interactive preview
//!
//! Guides for one panel consist of:
//! - A width label at the panel center (plus a rotated height label on the back panel)
//! - A 1 px trim outline around the panel rectangle
//! - Spine separator lines (not drawn for the spine panel itself)
//! - Dashed center crosshairs
//!
//! Everything is specified in millimeters and drawn through a transform that
//! maps millimeters to device pixels.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::glyphs::text_path;
use crate::constants::*;
use crate::dimensions::Dimensions;
use crate::layout::{CoverPanel, Rect};
use crate::types::{PanelKind, Rgb};

/// Pen for guide strokes and labels at a given resolution
pub(crate) struct GuidePen {
    paint: Paint<'static>,
    /// Millimeter-to-pixel transform
    base: Transform,
    /// One device pixel expressed in millimeters
    hairline_mm: f32,
}

impl GuidePen {
    pub(crate) fn new(color: Rgb, px_per_mm: f32) -> Self {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(color.r, color.g, color.b, 255));
        paint.anti_alias = true;

        Self {
            paint,
            base: Transform::from_scale(px_per_mm, px_per_mm),
            hairline_mm: GUIDE_LINE_WIDTH_PX / px_per_mm,
        }
    }

    fn stroke(&self, dashed: bool) -> Stroke {
        let mut stroke = Stroke {
            width: self.hairline_mm,
            ..Stroke::default()
        };
        if dashed {
            stroke.dash = StrokeDash::new(vec![GUIDE_DASH_MM, GUIDE_DASH_MM], 0.0);
        }
        stroke
    }

    fn line(&self, pixmap: &mut Pixmap, segments: &[((f64, f64), (f64, f64))], dashed: bool) {
        let mut pb = PathBuilder::new();
        for ((x0, y0), (x1, y1)) in segments {
            pb.move_to(*x0 as f32, *y0 as f32);
            pb.line_to(*x1 as f32, *y1 as f32);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &self.paint, &self.stroke(dashed), self.base, None);
        }
    }

    fn outline(&self, pixmap: &mut Pixmap, rect: &Rect) {
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &self.paint, &self.stroke(false), self.base, None);
    }

    /// Draw `text` centered on (`x`, `y`), rotated by `degrees`
    fn label(&self, pixmap: &mut Pixmap, text: &str, x: f64, y: f64, degrees: f32) {
        let Some(path) = text_path(text, LABEL_HEIGHT_MM) else {
            return;
        };
        let transform = self
            .base
            .pre_concat(Transform::from_translate(x as f32, y as f32))
            .pre_concat(Transform::from_rotate(degrees));
        pixmap.fill_path(&path, &self.paint, FillRule::Winding, transform, None);
    }
}

/// Label text for a length in millimeters
pub(crate) fn mm_label(value_mm: f64) -> String {
    format!("{}mm", value_mm.round() as i64)
}

/// Draw every guide belonging to one panel.
///
/// Spine separators come from the sheet dimensions, so they still render
/// when the spine panel itself is absent.
pub(crate) fn draw_panel_guides(
    pixmap: &mut Pixmap,
    pen: &GuidePen,
    panel: &CoverPanel,
    dimensions: &Dimensions,
) {
    let rect = &panel.rect;

    // The rectangle already carries the panel's scale
    pen.label(pixmap, &mm_label(rect.width), rect.center_x(), rect.center_y(), 0.0);
    if panel.kind == PanelKind::Back {
        pen.label(
            pixmap,
            &mm_label(rect.height),
            rect.x + HEIGHT_LABEL_INSET_MM,
            rect.center_y(),
            -90.0,
        );
    }

    pen.outline(pixmap, rect);

    if panel.kind != PanelKind::Spine {
        let center = dimensions.cover_width_mm / 2.0;
        let half_spine = dimensions.spine_width_mm / 2.0;
        let bottom = dimensions.cover_height_mm;
        pen.line(
            pixmap,
            &[
                ((center - half_spine, 0.0), (center - half_spine, bottom)),
                ((center + half_spine, 0.0), (center + half_spine, bottom)),
            ],
            false,
        );

        if panel.kind == PanelKind::Front {
            pen.label(
                pixmap,
                &mm_label(dimensions.spine_width_mm),
                center,
                rect.y + SPINE_LABEL_OFFSET_MM,
                0.0,
            );
        }
    }

    pen.line(
        pixmap,
        &[
            ((rect.center_x(), rect.y), (rect.center_x(), rect.bottom())),
            ((rect.x, rect.center_y()), (rect.right(), rect.center_y())),
        ],
        true,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_label_rounds() {
        assert_eq!(mm_label(148.0), "148mm");
        assert_eq!(mm_label(11.8), "12mm");
        assert_eq!(mm_label(2.2), "2mm");
        assert_eq!(mm_label(177.6), "178mm");
    }
}

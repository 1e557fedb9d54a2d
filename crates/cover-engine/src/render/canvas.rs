use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::RasterSurface;
use super::guides::{GuidePen, draw_panel_guides};
use crate::dimensions::Dimensions;
use crate::layout::{PanelSet, Rect};
use crate::options::CoverStyle;

/// Draw one frame of the cover onto `surface`.
///
/// Fills the background, stretches each present panel's artwork into its
/// rectangle, then overlays guides when `guides` is set. Panels without a
/// source (failed loads) show guides only. Export passes must use
/// `guides = false`.
pub fn render(
    surface: &mut RasterSurface,
    style: &CoverStyle,
    panels: &PanelSet,
    dimensions: &Dimensions,
    guides: bool,
) {
    let px_per_mm = surface.resolution().px_per_mm as f32;
    let base = Transform::from_scale(px_per_mm, px_per_mm);
    let pixmap = surface.pixmap_mut();

    let bg = style.background;
    pixmap.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));

    for panel in panels.iter() {
        if let Some(image) = &panel.source {
            draw_image(pixmap, image.pixmap(), &panel.rect, base);
        }
    }

    // Guides go on top of every image so neighbouring artwork cannot hide them
    if guides {
        let pen = GuidePen::new(style.guide_color, px_per_mm);
        for panel in panels.iter() {
            draw_panel_guides(pixmap, &pen, panel, dimensions);
        }
    }

    log::debug!(
        "Rendered {} panel(s) on {}x{} px surface (guides: {})",
        panels.len(),
        pixmap.width(),
        pixmap.height(),
        guides
    );
}

/// Stretch `image` to exactly fill `rect`
fn draw_image(pixmap: &mut Pixmap, image: &Pixmap, rect: &Rect, base: Transform) {
    let src_w = image.width() as f64;
    let src_h = image.height() as f64;
    if src_w <= 0.0 || src_h <= 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }

    let sx = (rect.width / src_w) as f32;
    let sy = (rect.height / src_h) as f32;
    let image_ts = Transform::from_row(sx, 0.0, 0.0, sy, rect.x as f32, rect.y as f32);

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, base.pre_concat(image_ts), None);
}

//! Panel placement within the cover sheet
//!
//! Positions back, spine and front panels inside the bleed-inset area:
//! - The spine is centered between the two side slots and never scaled
//! - Side panels may be drawn larger than their slot (scale 1.0-1.2)
//! - Scaled side panels stay flush against the spine and vertically centered

use crate::bleed::BleedMeasurement;
use crate::dimensions::Dimensions;
use crate::source::{LoadedPanels, PanelLoad};
use crate::types::PanelKind;

use super::{CoverPanel, PanelGeometry, PanelLayout, PanelSet, Rect};

/// Calculate the geometry of all three panels.
///
/// # Arguments
/// * `dimensions` - Cover sheet dimensions
/// * `bleed` - Bleed margins for the binding
/// * `scale_front` - Visual scale of the front panel
/// * `scale_back` - Visual scale of the back panel
pub fn place_panels(
    dimensions: &Dimensions,
    bleed: &BleedMeasurement,
    scale_front: f64,
    scale_back: f64,
) -> PanelLayout {
    let safe_width = dimensions.cover_width_mm - 2.0 * bleed.horizontal_mm;
    let safe_height = dimensions.cover_height_mm - 2.0 * bleed.vertical_mm;
    let spine_width = dimensions.spine_width_mm;
    let side_width = (safe_width - spine_width) / 2.0;

    // Left edge of the spine; the back panel ends here, the front panel
    // starts at spine_x + spine_width
    let spine_x = bleed.horizontal_mm + side_width;

    let spine = PanelGeometry {
        kind: PanelKind::Spine,
        rect: Rect::new(spine_x, bleed.vertical_mm, spine_width, safe_height),
        scale: 1.0,
    };

    let back = side_panel(
        PanelKind::Back,
        side_width,
        safe_height,
        bleed.vertical_mm,
        scale_back,
        |scaled_width| spine_x - scaled_width,
    );

    let front = side_panel(
        PanelKind::Front,
        side_width,
        safe_height,
        bleed.vertical_mm,
        scale_front,
        |_| spine_x + spine_width,
    );

    log::debug!(
        "Placed panels: back={:?} spine={:?} front={:?}",
        back.rect,
        spine.rect,
        front.rect
    );

    PanelLayout { back, spine, front }
}

/// Scale a side slot and anchor it horizontally with `anchor_x`, which maps
/// the scaled width to the panel's left edge.
fn side_panel(
    kind: PanelKind,
    side_width: f64,
    safe_height: f64,
    top: f64,
    scale: f64,
    anchor_x: impl Fn(f64) -> f64,
) -> PanelGeometry {
    let scaled_width = side_width * scale;
    let scaled_height = safe_height * scale;

    // Grow symmetrically above and below the nominal slot
    let vertical_offset = (scaled_height - safe_height) / 2.0;

    PanelGeometry {
        kind,
        rect: Rect::new(
            anchor_x(scaled_width),
            top - vertical_offset,
            scaled_width,
            scaled_height,
        ),
        scale,
    }
}

/// Attach load results to the layout, producing the frame's panel set.
///
/// Panels without an upload are omitted. Panels whose upload failed keep
/// their rectangle but carry no source.
pub fn assemble_panels(layout: &PanelLayout, loads: &LoadedPanels) -> PanelSet {
    let panels = PanelKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let geometry = layout.get(kind);
            let source = match loads.get(kind) {
                PanelLoad::Absent => return None,
                PanelLoad::Loaded(image) => Some(image.clone()),
                PanelLoad::Failed(_) => None,
            };
            Some(CoverPanel {
                kind,
                rect: geometry.rect,
                scale: geometry.scale,
                source,
            })
        })
        .collect();

    PanelSet::from_sorted(panels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bleed::bleed_for;

    const EPS: f64 = 1e-9;

    fn hardcover_a4() -> (Dimensions, BleedMeasurement) {
        (
            Dimensions {
                spine_width_mm: 11.8,
                cover_width_mm: 460.8,
                cover_height_mm: 323.0,
            },
            bleed_for(true),
        )
    }

    #[test]
    fn test_unscaled_panels_tile() {
        let (dims, bleed) = hardcover_a4();
        let layout = place_panels(&dims, &bleed, 1.0, 1.0);

        assert!((layout.back.rect.x - 14.5).abs() < EPS);
        assert!((layout.back.rect.right() - layout.spine.rect.x).abs() < EPS);
        assert!((layout.spine.rect.right() - layout.front.rect.x).abs() < EPS);
        assert!((layout.front.rect.right() - (460.8 - 14.5)).abs() < EPS);
        assert!((layout.back.rect.width - 210.0).abs() < EPS);
        assert!((layout.spine.rect.height - 297.0).abs() < EPS);
    }

    #[test]
    fn test_scaled_back_stays_flush_with_spine() {
        let (dims, bleed) = hardcover_a4();
        let nominal = place_panels(&dims, &bleed, 1.0, 1.0);
        let scaled = place_panels(&dims, &bleed, 1.0, 1.2);

        assert_eq!(scaled.spine, nominal.spine);
        assert!((scaled.back.rect.right() - scaled.spine.rect.x).abs() < EPS);
        assert!((scaled.back.rect.width - 252.0).abs() < EPS);
        assert!(scaled.back.rect.x < nominal.back.rect.x);
    }

    #[test]
    fn test_scaled_front_stays_flush_with_spine() {
        let (dims, bleed) = hardcover_a4();
        let scaled = place_panels(&dims, &bleed, 1.1, 1.0);

        assert!((scaled.front.rect.x - scaled.spine.rect.right()).abs() < EPS);
        assert!((scaled.front.rect.width - 231.0).abs() < EPS);
        assert_eq!(scaled.front.scale, 1.1);
    }

    #[test]
    fn test_scaled_panel_is_vertically_centered() {
        let (dims, bleed) = hardcover_a4();
        let nominal = place_panels(&dims, &bleed, 1.0, 1.0);
        let scaled = place_panels(&dims, &bleed, 1.2, 1.2);

        assert!((scaled.front.rect.center_y() - nominal.front.rect.center_y()).abs() < EPS);
        assert!((scaled.back.rect.center_y() - nominal.back.rect.center_y()).abs() < EPS);
        assert!(scaled.front.rect.y < bleed.vertical_mm);
    }
}

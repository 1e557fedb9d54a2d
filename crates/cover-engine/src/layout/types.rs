//! Layout data types for cover panels
//!
//! All coordinates are millimeters in sheet space: origin at the top-left
//! corner of the cover sheet, y growing downward.

use crate::source::PanelImage;
use crate::types::PanelKind;
use std::sync::Arc;

/// A rectangular area in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Placement of one panel before any artwork is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub kind: PanelKind,
    /// Drawn rectangle, scale already applied
    pub rect: Rect,
    /// Visual scale factor (always 1.0 for the spine)
    pub scale: f64,
}

/// Geometry of all three panels, as produced by the placement engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub back: PanelGeometry,
    pub spine: PanelGeometry,
    pub front: PanelGeometry,
}

impl PanelLayout {
    pub fn get(&self, kind: PanelKind) -> &PanelGeometry {
        match kind {
            PanelKind::Back => &self.back,
            PanelKind::Spine => &self.spine,
            PanelKind::Front => &self.front,
        }
    }
}

/// A placed panel handed to the renderer.
///
/// `source` is `None` when the panel's upload failed to load; the renderer
/// then draws guides only.
#[derive(Debug, Clone)]
pub struct CoverPanel {
    pub kind: PanelKind,
    pub rect: Rect,
    pub scale: f64,
    pub source: Option<Arc<PanelImage>>,
}

impl CoverPanel {
    /// Stable identity, equal to the panel kind
    pub fn id(&self) -> PanelKind {
        self.kind
    }
}

/// Complete set of panels for one frame, in sheet order.
///
/// Replaced as a whole whenever any input changes; never patched.
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    panels: Vec<CoverPanel>,
}

impl PanelSet {
    pub(crate) fn from_sorted(panels: Vec<CoverPanel>) -> Self {
        Self { panels }
    }

    pub fn get(&self, kind: PanelKind) -> Option<&CoverPanel> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverPanel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

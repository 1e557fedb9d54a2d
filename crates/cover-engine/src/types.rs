use crate::session::RequestToken;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Custom format is missing its {missing}; using the {fallback_mm} mm fallback")]
    InvalidFormatInput {
        missing: &'static str,
        fallback_mm: f64,
    },
    #[error(
        "PDF for the {panel} panel has {page_count} page(s), but page {requested} was requested"
    )]
    PageIndexOutOfRange {
        panel: PanelKind,
        requested: usize,
        page_count: usize,
    },
    #[error("Unsupported source type '{mime}' for the {panel} panel")]
    UnsupportedSourceType { panel: PanelKind, mime: String },
    #[error("Failed to decode '{file_name}' ({file_size} bytes) for the {panel} panel: {reason}")]
    SourceDecodeError {
        panel: PanelKind,
        file_name: String,
        file_size: usize,
        reason: String,
    },
    #[error("Canvas context unavailable for a {width}x{height} px surface")]
    CanvasContextUnavailable { width: i64, height: i64 },
    #[error("Request {0} was superseded by a newer request")]
    Superseded(RequestToken),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl CoverError {
    /// Panel a per-panel source error refers to, if any
    pub fn panel(&self) -> Option<PanelKind> {
        match self {
            CoverError::PageIndexOutOfRange { panel, .. }
            | CoverError::UnsupportedSourceType { panel, .. }
            | CoverError::SourceDecodeError { panel, .. } => Some(*panel),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoverError>;

/// Page orientation of the exported sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// height >= width
    #[default]
    Portrait,
    /// width > height
    Landscape,
}

impl Orientation {
    pub fn for_size(width: f64, height: f64) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Binding methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BindingType {
    /// Case binding: boards wrapped by the cover sheet
    #[default]
    Hardcover,
    /// Perfect binding with a flat, trimmed cover
    Softcover,
}

impl BindingType {
    pub fn is_hardcover(self) -> bool {
        matches!(self, BindingType::Hardcover)
    }

    pub fn name(self) -> &'static str {
        match self {
            BindingType::Hardcover => "hardcover",
            BindingType::Softcover => "softcover",
        }
    }
}

/// Paper stocks offered for the book block.
///
/// Each stock maps to a caliper (sheet thickness) used for the spine width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperType {
    #[cfg_attr(feature = "serde", serde(rename = "80g_recycling"))]
    Recycling80,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "80g_offset"))]
    Offset80,
    #[cfg_attr(feature = "serde", serde(rename = "100g_offset"))]
    Offset100,
    #[cfg_attr(feature = "serde", serde(rename = "120g_offset"))]
    Offset120,
    #[cfg_attr(feature = "serde", serde(rename = "160g_offset"))]
    Offset160,
    #[cfg_attr(feature = "serde", serde(rename = "80g_volume_1_5"))]
    Volume80,
    #[cfg_attr(feature = "serde", serde(rename = "90g_volume_1_8"))]
    Volume90,
    #[cfg_attr(feature = "serde", serde(rename = "100g_art_matt"))]
    ArtMatt100,
    #[cfg_attr(feature = "serde", serde(rename = "100g_art_gloss"))]
    ArtGloss100,
    #[cfg_attr(feature = "serde", serde(rename = "135g_art_matt"))]
    ArtMatt135,
    #[cfg_attr(feature = "serde", serde(rename = "135g_art_gloss"))]
    ArtGloss135,
    #[cfg_attr(feature = "serde", serde(rename = "170g_art_matt"))]
    ArtMatt170,
    #[cfg_attr(feature = "serde", serde(rename = "170g_art_gloss"))]
    ArtGloss170,
}

impl PaperType {
    pub const ALL: [PaperType; 13] = [
        PaperType::Recycling80,
        PaperType::Offset80,
        PaperType::Offset100,
        PaperType::Offset120,
        PaperType::Offset160,
        PaperType::Volume80,
        PaperType::Volume90,
        PaperType::ArtMatt100,
        PaperType::ArtGloss100,
        PaperType::ArtMatt135,
        PaperType::ArtGloss135,
        PaperType::ArtMatt170,
        PaperType::ArtGloss170,
    ];

    /// Sheet thickness in millimeters
    pub fn caliper_mm(self) -> f64 {
        match self {
            PaperType::Recycling80 => 0.05,
            PaperType::Offset80 => 0.055,
            PaperType::Offset100 => 0.065,
            PaperType::Offset120 => 0.08,
            PaperType::Offset160 => 0.098,
            PaperType::Volume80 => 0.061,
            PaperType::Volume90 => 0.0783,
            PaperType::ArtMatt100 => 0.042,
            PaperType::ArtGloss100 => 0.036,
            PaperType::ArtMatt135 => 0.058,
            PaperType::ArtGloss135 => 0.052,
            PaperType::ArtMatt170 => 0.07,
            PaperType::ArtGloss170 => 0.064,
        }
    }

    /// Stable key used in configuration files
    pub fn key(self) -> &'static str {
        match self {
            PaperType::Recycling80 => "80g_recycling",
            PaperType::Offset80 => "80g_offset",
            PaperType::Offset100 => "100g_offset",
            PaperType::Offset120 => "120g_offset",
            PaperType::Offset160 => "160g_offset",
            PaperType::Volume80 => "80g_volume_1_5",
            PaperType::Volume90 => "90g_volume_1_8",
            PaperType::ArtMatt100 => "100g_art_matt",
            PaperType::ArtGloss100 => "100g_art_gloss",
            PaperType::ArtMatt135 => "135g_art_matt",
            PaperType::ArtGloss135 => "135g_art_gloss",
            PaperType::ArtMatt170 => "170g_art_matt",
            PaperType::ArtGloss170 => "170g_art_gloss",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaperType::Recycling80 => "80 g/m² recycling",
            PaperType::Offset80 => "80 g/m² offset",
            PaperType::Offset100 => "100 g/m² offset",
            PaperType::Offset120 => "120 g/m² offset",
            PaperType::Offset160 => "160 g/m² offset",
            PaperType::Volume80 => "80 g/m² volume 1.5",
            PaperType::Volume90 => "90 g/m² volume 1.8",
            PaperType::ArtMatt100 => "100 g/m² art matt",
            PaperType::ArtGloss100 => "100 g/m² art gloss",
            PaperType::ArtMatt135 => "135 g/m² art matt",
            PaperType::ArtGloss135 => "135 g/m² art gloss",
            PaperType::ArtMatt170 => "170 g/m² art matt",
            PaperType::ArtGloss170 => "170 g/m² art gloss",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|paper| paper.key() == key)
    }
}

/// Final (post-trim) page size of the book
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrimFormat {
    A4,
    #[default]
    A5,
    A6,
    #[cfg_attr(feature = "serde", serde(rename = "A4_landscape"))]
    A4Landscape,
    #[cfg_attr(feature = "serde", serde(rename = "A5_landscape"))]
    A5Landscape,
    #[cfg_attr(feature = "serde", serde(rename = "17x24"))]
    F17x24,
    #[cfg_attr(feature = "serde", serde(rename = "15.5x22"))]
    F15_5x22,
    #[cfg_attr(feature = "serde", serde(rename = "21x21"))]
    F21x21,
    #[cfg_attr(feature = "serde", serde(rename = "21x28"))]
    F21x28,
    #[cfg_attr(feature = "serde", serde(rename = "13x19"))]
    F13x19,
    /// Caller-supplied size; missing fields fall back to A4
    #[cfg_attr(feature = "serde", serde(rename = "custom"))]
    Custom {
        #[cfg_attr(feature = "serde", serde(default))]
        width_mm: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        height_mm: Option<f64>,
    },
}

impl TrimFormat {
    pub const NAMED: [TrimFormat; 10] = [
        TrimFormat::A4,
        TrimFormat::A5,
        TrimFormat::A6,
        TrimFormat::A4Landscape,
        TrimFormat::A5Landscape,
        TrimFormat::F17x24,
        TrimFormat::F15_5x22,
        TrimFormat::F21x21,
        TrimFormat::F21x28,
        TrimFormat::F13x19,
    ];

    pub fn custom(width_mm: f64, height_mm: f64) -> Self {
        TrimFormat::Custom {
            width_mm: Some(width_mm),
            height_mm: Some(height_mm),
        }
    }

    /// Fixed (width, height) in mm for named formats; `None` for custom
    pub fn named_dimensions_mm(self) -> Option<(f64, f64)> {
        match self {
            TrimFormat::A4 => Some((210.0, 297.0)),
            TrimFormat::A5 => Some((148.0, 210.0)),
            TrimFormat::A6 => Some((105.0, 148.0)),
            TrimFormat::A4Landscape => Some((297.0, 210.0)),
            TrimFormat::A5Landscape => Some((210.0, 148.0)),
            TrimFormat::F17x24 => Some((170.0, 240.0)),
            TrimFormat::F15_5x22 => Some((155.0, 220.0)),
            TrimFormat::F21x21 => Some((210.0, 210.0)),
            TrimFormat::F21x28 => Some((210.0, 280.0)),
            TrimFormat::F13x19 => Some((130.0, 190.0)),
            TrimFormat::Custom { .. } => None,
        }
    }

    /// Price multiplier applied per format by the order pipeline
    pub fn price_multiplier(self) -> f64 {
        match self {
            TrimFormat::A4 | TrimFormat::A4Landscape => 1.2,
            TrimFormat::A5 | TrimFormat::A5Landscape | TrimFormat::F15_5x22 => 1.0,
            TrimFormat::A6 => 0.8,
            TrimFormat::F17x24 | TrimFormat::F21x21 => 1.1,
            TrimFormat::F21x28 => 1.15,
            TrimFormat::F13x19 => 0.9,
            TrimFormat::Custom { .. } => 1.3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TrimFormat::A4 => "A4",
            TrimFormat::A5 => "A5",
            TrimFormat::A6 => "A6",
            TrimFormat::A4Landscape => "A4_landscape",
            TrimFormat::A5Landscape => "A5_landscape",
            TrimFormat::F17x24 => "17x24",
            TrimFormat::F15_5x22 => "15.5x22",
            TrimFormat::F21x21 => "21x21",
            TrimFormat::F21x28 => "21x28",
            TrimFormat::F13x19 => "13x19",
            TrimFormat::Custom { .. } => "custom",
        }
    }
}

/// One of the three cover panels, in sheet order left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PanelKind {
    Back,
    Spine,
    Front,
}

impl PanelKind {
    /// Sheet order: back, spine, front
    pub const ALL: [PanelKind; 3] = [PanelKind::Back, PanelKind::Spine, PanelKind::Front];

    pub fn name(self) -> &'static str {
        match self {
            PanelKind::Back => "back",
            PanelKind::Spine => "spine",
            PanelKind::Front => "front",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque RGB colour, written as `#rrggbb` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        // Lengths and slicing below count bytes, one per digit
        if !hex.is_ascii() {
            return Err(CoverError::Config(format!("Invalid colour '{}'", value)));
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => {
                return Err(CoverError::Config(format!(
                    "Invalid colour '{}': expected #rgb or #rrggbb",
                    value
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|_| CoverError::Config(format!("Invalid colour '{}'", value)))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl TryFrom<String> for Rgb {
    type Error = CoverError;

    fn try_from(value: String) -> Result<Self> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Class of device the host is running on; selects raster resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceClass {
    #[default]
    Desktop,
    /// Phones and tablets: lower resolution, no preview guides
    Constrained,
}

pub mod bleed;
pub mod constants;
mod dimensions;
mod engine;
pub mod export;
pub mod layout;
mod options;
pub mod render;
mod session;
pub mod source;
mod types;

pub use bleed::{BleedMeasurement, BleedStatus, bleed_for, inspect_bleed};
pub use dimensions::*;
pub use engine::{CoverEngine, PreparedCover};
pub use export::{ExportedPdf, export_pdf, read_page_size_mm, save_pdf};
pub use layout::{CoverPanel, PanelLayout, PanelSet, Rect, assemble_panels, place_panels};
pub use options::*;
pub use render::{RasterSurface, Resolution, render};
pub use session::*;
pub use source::{
    COMBINED_PDF_PAGE_ORDER, CoverUploads, PageRasterizer, PanelFailure, PanelImage,
    SourceNormalizer, UploadedFile,
};
pub use types::*;

//! Image/source normalization
//!
//! Turns uploaded artwork (bitmaps or PDFs) into drawable pixmaps, one per
//! panel. Decoding runs on blocking worker threads; the three panels of one
//! pass are loaded concurrently and resolved together.

mod bitmap;
mod handle;
mod pdf;

pub use handle::{ResourceTracker, SourceHandle};
pub use pdf::*;

pub(crate) use bitmap::pixmap_from_rgba;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;
use tiny_skia::Pixmap;

use crate::constants::PDF_SUPERSAMPLE_SCALE;
use crate::types::{CoverError, PanelKind, Result};

const PDF_MIME: &str = "application/pdf";

/// An uploaded artwork file, as handed over by the host
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, mime_for_path(path), bytes))
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_pdf(&self) -> bool {
        self.mime.eq_ignore_ascii_case(PDF_MIME)
    }

    pub fn is_image(&self) -> bool {
        self.mime.to_ascii_lowercase().starts_with("image/")
    }
}

/// MIME type for a path, based on its extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "application/octet-stream";
    };

    if ext.eq_ignore_ascii_case("pdf") {
        return PDF_MIME;
    }

    ImageFormat::from_extension(ext)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Artwork for up to three panels
#[derive(Debug, Clone, Default)]
pub struct CoverUploads {
    pub back: Option<UploadedFile>,
    pub spine: Option<UploadedFile>,
    pub front: Option<UploadedFile>,
}

impl CoverUploads {
    /// One PDF feeding all three panels, read in [`COMBINED_PDF_PAGE_ORDER`]
    pub fn combined(file: UploadedFile) -> Self {
        Self {
            back: Some(file.clone()),
            spine: Some(file.clone()),
            front: Some(file),
        }
    }

    pub fn with(mut self, kind: PanelKind, file: UploadedFile) -> Self {
        *self.slot_mut(kind) = Some(file);
        self
    }

    pub fn get(&self, kind: PanelKind) -> Option<&UploadedFile> {
        match kind {
            PanelKind::Back => self.back.as_ref(),
            PanelKind::Spine => self.spine.as_ref(),
            PanelKind::Front => self.front.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        PanelKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }

    fn slot_mut(&mut self, kind: PanelKind) -> &mut Option<UploadedFile> {
        match kind {
            PanelKind::Back => &mut self.back,
            PanelKind::Spine => &mut self.spine,
            PanelKind::Front => &mut self.front,
        }
    }
}

/// Decoded artwork for one panel, ready to draw
pub struct PanelImage {
    pub kind: PanelKind,
    pixmap: Pixmap,
}

impl PanelImage {
    pub fn new(kind: PanelKind, pixmap: Pixmap) -> Self {
        Self { kind, pixmap }
    }

    /// Natural pixel size (width, height)
    pub fn natural_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl fmt::Debug for PanelImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.natural_size();
        f.debug_struct("PanelImage")
            .field("kind", &self.kind)
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

/// A panel whose upload could not be turned into artwork
#[derive(Debug)]
pub struct PanelFailure {
    pub kind: PanelKind,
    pub error: CoverError,
}

/// Outcome of loading one panel's upload
#[derive(Debug)]
pub enum PanelLoad {
    /// Nothing was uploaded for the panel
    Absent,
    Loaded(Arc<PanelImage>),
    Failed(PanelFailure),
}

/// Load outcomes of all three panels of one pass
#[derive(Debug)]
pub struct LoadedPanels {
    pub back: PanelLoad,
    pub spine: PanelLoad,
    pub front: PanelLoad,
}

impl LoadedPanels {
    pub fn get(&self, kind: PanelKind) -> &PanelLoad {
        match kind {
            PanelKind::Back => &self.back,
            PanelKind::Spine => &self.spine,
            PanelKind::Front => &self.front,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &PanelFailure> {
        [&self.back, &self.spine, &self.front]
            .into_iter()
            .filter_map(|load| match load {
                PanelLoad::Failed(failure) => Some(failure),
                _ => None,
            })
    }

    pub fn into_failures(self) -> Vec<PanelFailure> {
        [self.back, self.spine, self.front]
            .into_iter()
            .filter_map(|load| match load {
                PanelLoad::Failed(failure) => Some(failure),
                _ => None,
            })
            .collect()
    }
}

/// Decodes uploads into panel artwork
pub struct SourceNormalizer {
    rasterizer: Arc<dyn PageRasterizer>,
    tracker: ResourceTracker,
}

impl SourceNormalizer {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            rasterizer,
            tracker: ResourceTracker::new(),
        }
    }

    /// Live decode resources, for diagnostics and tests
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Decode `file` into the artwork for panel `kind`.
    ///
    /// PDFs are read at the page [`page_number_for`] assigns to the panel.
    /// The decode holds a [`SourceHandle`] that is released when the blocking
    /// task finishes, even if this future has been dropped by then.
    pub async fn load_source(&self, file: &UploadedFile, kind: PanelKind) -> Result<PanelImage> {
        let handle = self.tracker.acquire(file, kind);
        let rasterizer = Arc::clone(&self.rasterizer);

        tokio::task::spawn_blocking(move || decode_source(&handle, rasterizer.as_ref())).await?
    }

    /// Load every uploaded panel concurrently and wait for all of them
    pub async fn load_panels(&self, uploads: &CoverUploads) -> LoadedPanels {
        let (back, spine, front) = tokio::join!(
            self.load_slot(uploads, PanelKind::Back),
            self.load_slot(uploads, PanelKind::Spine),
            self.load_slot(uploads, PanelKind::Front),
        );

        LoadedPanels { back, spine, front }
    }

    async fn load_slot(&self, uploads: &CoverUploads, kind: PanelKind) -> PanelLoad {
        let Some(file) = uploads.get(kind) else {
            return PanelLoad::Absent;
        };

        match self.load_source(file, kind).await {
            Ok(image) => {
                let (width, height) = image.natural_size();
                log::debug!(
                    "Loaded {} panel from '{}' ({}x{} px)",
                    kind,
                    file.name,
                    width,
                    height
                );
                PanelLoad::Loaded(Arc::new(image))
            }
            Err(error) => {
                log::warn!("Failed to load {} panel: {}", kind, error);
                PanelLoad::Failed(PanelFailure { kind, error })
            }
        }
    }
}

fn decode_source(handle: &SourceHandle, rasterizer: &dyn PageRasterizer) -> Result<PanelImage> {
    let file = handle.file();
    let kind = handle.kind();

    let pixmap = if file.is_pdf() {
        decode_pdf_page(handle, rasterizer)?
    } else if file.is_image() {
        bitmap::decode_bitmap(handle.bytes(), &file.mime)
            .map_err(|reason| decode_error(file, kind, reason))?
    } else {
        return Err(CoverError::UnsupportedSourceType {
            panel: kind,
            mime: file.mime.clone(),
        });
    };

    Ok(PanelImage::new(kind, pixmap))
}

fn decode_pdf_page(handle: &SourceHandle, rasterizer: &dyn PageRasterizer) -> Result<Pixmap> {
    let file = handle.file();
    let kind = handle.kind();

    let page_count =
        pdf_page_count(handle.bytes()).map_err(|e| decode_error(file, kind, e.to_string()))?;
    let requested = page_number_for(kind);
    if requested > page_count {
        return Err(CoverError::PageIndexOutOfRange {
            panel: kind,
            requested,
            page_count,
        });
    }

    let page = rasterizer
        .rasterize(handle.bytes(), requested - 1, PDF_SUPERSAMPLE_SCALE)
        .map_err(|e| decode_error(file, kind, e.to_string()))?;

    pixmap_from_rgba(page.width, page.height, &page.rgba).ok_or_else(|| {
        decode_error(
            file,
            kind,
            format!(
                "Rasterizer returned an unusable {}x{} page",
                page.width, page.height
            ),
        )
    })
}

fn decode_error(file: &UploadedFile, kind: PanelKind, reason: String) -> CoverError {
    CoverError::SourceDecodeError {
        panel: kind,
        file_name: file.name.clone(),
        file_size: file.size(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("cover.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("front.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("back.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_combined_uploads_feed_every_panel() {
        let uploads =
            CoverUploads::combined(UploadedFile::new("cover.pdf", "application/pdf", vec![0u8]));
        for kind in PanelKind::ALL {
            assert_eq!(uploads.get(kind).map(|f| f.name.as_str()), Some("cover.pdf"));
        }
    }

    #[test]
    fn test_with_sets_single_slot() {
        let uploads = CoverUploads::default()
            .with(PanelKind::Spine, UploadedFile::new("spine.png", "image/png", vec![0u8]));
        assert!(uploads.back.is_none());
        assert!(uploads.spine.is_some());
        assert!(!uploads.is_empty());
        assert!(CoverUploads::default().is_empty());
    }

    #[test]
    fn test_unsupported_mime_is_rejected() {
        let tracker = ResourceTracker::new();
        let file = UploadedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let handle = tracker.acquire(&file, PanelKind::Front);

        match decode_source(&handle, &UnavailableRasterizer) {
            Err(CoverError::UnsupportedSourceType { panel, mime }) => {
                assert_eq!(panel, PanelKind::Front);
                assert_eq!(mime, "text/plain");
            }
            other => panic!("Expected UnsupportedSourceType, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_bitmap_reports_file_details() {
        let tracker = ResourceTracker::new();
        let file = UploadedFile::new("back.png", "image/png", vec![0u8; 16]);
        let handle = tracker.acquire(&file, PanelKind::Back);

        match decode_source(&handle, &UnavailableRasterizer) {
            Err(CoverError::SourceDecodeError {
                panel,
                file_name,
                file_size,
                ..
            }) => {
                assert_eq!(panel, PanelKind::Back);
                assert_eq!(file_name, "back.png");
                assert_eq!(file_size, 16);
            }
            other => panic!("Expected SourceDecodeError, got {:?}", other),
        }
    }
}

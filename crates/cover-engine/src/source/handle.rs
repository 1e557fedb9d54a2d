//! Scoped ownership of decode resources
//!
//! Every decode holds a [`SourceHandle`] for the bytes it reads. The handle
//! is released when it drops, so success, failure and abandoned-task paths
//! all give the resource back the same way.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::UploadedFile;
use crate::types::PanelKind;

/// Counts decode resources that are currently alive
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    live: Arc<AtomicUsize>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles not yet released
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Acquire a handle over an upload for one panel's decode
    pub fn acquire(&self, file: &UploadedFile, kind: PanelKind) -> SourceHandle {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        log::trace!(
            "Acquired source handle for {} ('{}'), {} live",
            kind,
            file.name,
            live
        );
        SourceHandle {
            kind,
            file: file.clone(),
            tracker: self.clone(),
        }
    }
}

/// Guard over one upload's bytes for the duration of a decode
#[derive(Debug)]
pub struct SourceHandle {
    kind: PanelKind,
    file: UploadedFile,
    tracker: ResourceTracker,
}

impl SourceHandle {
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }

    pub fn bytes(&self) -> &[u8] {
        &self.file.bytes
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        let remaining = self.tracker.live.fetch_sub(1, Ordering::SeqCst) - 1;
        log::trace!(
            "Released source handle for {} ('{}'), {} live",
            self.kind,
            self.file.name,
            remaining
        );
    }
}

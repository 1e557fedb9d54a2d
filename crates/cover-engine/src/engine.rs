//! Orchestration of one cover pass
//!
//! specification -> dimensions, bleed, placement (pure) -> request-versioned
//! panel loading -> drawing. Results of a superseded request never reach a
//! surface.

use std::sync::Arc;

use crate::bleed::{BleedMeasurement, BleedStatus, bleed_for, inspect_bleed};
use crate::dimensions::{Dimensions, compute_dimensions};
use crate::export::{ExportedPdf, export_pdf};
use crate::layout::{PanelLayout, PanelSet, assemble_panels, place_panels};
use crate::options::{BookSpecification, CoverStyle};
use crate::render::{RasterSurface, Resolution, render};
use crate::session::{CoverSession, RequestToken};
use crate::source::{
    CoverUploads, PageRasterizer, PanelFailure, SourceNormalizer, default_rasterizer,
};
use crate::types::{DeviceClass, Result};

/// Everything needed to draw one consistent frame
#[derive(Debug)]
pub struct PreparedCover {
    pub token: RequestToken,
    pub spec: BookSpecification,
    pub dimensions: Dimensions,
    pub bleed: BleedMeasurement,
    pub layout: PanelLayout,
    /// Panels with an upload; failed loads carry no source
    pub panels: PanelSet,
    pub failures: Vec<PanelFailure>,
}

pub struct CoverEngine {
    normalizer: SourceNormalizer,
    session: CoverSession,
    style: CoverStyle,
}

impl Default for CoverEngine {
    fn default() -> Self {
        Self::new(default_rasterizer())
    }
}

impl CoverEngine {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            normalizer: SourceNormalizer::new(rasterizer),
            session: CoverSession::new(),
            style: CoverStyle::default(),
        }
    }

    pub fn with_style(mut self, style: CoverStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &CoverStyle {
        &self.style
    }

    pub fn session(&self) -> &CoverSession {
        &self.session
    }

    pub fn normalizer(&self) -> &SourceNormalizer {
        &self.normalizer
    }

    /// Start a new request; earlier requests become stale
    pub fn begin_request(&self) -> RequestToken {
        self.session.begin()
    }

    /// Tear down the engine; in-flight work is abandoned on completion
    pub fn close(&self) {
        self.session.close();
    }

    /// Derive geometry and load every panel for `token`.
    ///
    /// All three panel loads resolve before this returns. Per-panel load
    /// errors land in [`PreparedCover::failures`]; the call itself only fails
    /// when `token` has been superseded.
    pub async fn prepare(
        &self,
        token: RequestToken,
        spec: &BookSpecification,
        uploads: &CoverUploads,
    ) -> Result<PreparedCover> {
        self.session.ensure_current(token)?;

        for finding in spec.validate() {
            log::warn!("{}", finding);
        }
        if let Some(notice) = spec.format.fallback_notice() {
            log::warn!("{}", notice);
        }

        let dimensions = compute_dimensions(spec);
        let bleed = bleed_for(spec.binding.is_hardcover());
        let layout = place_panels(&dimensions, &bleed, spec.scale_front, spec.scale_back);
        log::debug!(
            "Request {}: spine {:.2} mm, sheet {:.2} x {:.2} mm",
            token,
            dimensions.spine_width_mm,
            dimensions.cover_width_mm,
            dimensions.cover_height_mm
        );

        let loads = self.normalizer.load_panels(uploads).await;

        // A newer request may have started while decoding
        self.session.ensure_current(token)?;

        let panels = assemble_panels(&layout, &loads);
        let failures = loads.into_failures();

        Ok(PreparedCover {
            token,
            spec: spec.clone(),
            dimensions,
            bleed,
            layout,
            panels,
            failures,
        })
    }

    /// Draw a prepared cover onto a fresh surface
    pub fn render(
        &self,
        prepared: &PreparedCover,
        resolution: Resolution,
        guides: bool,
    ) -> Result<RasterSurface> {
        self.session.ensure_current(prepared.token)?;

        let mut surface = RasterSurface::for_dimensions(&prepared.dimensions, resolution)?;
        render(
            &mut surface,
            &self.style,
            &prepared.panels,
            &prepared.dimensions,
            guides,
        );
        Ok(surface)
    }

    /// Interactive preview: guides on desktop, plain artwork on constrained devices
    pub fn render_preview(
        &self,
        prepared: &PreparedCover,
        device: DeviceClass,
    ) -> Result<RasterSurface> {
        let guides = device == DeviceClass::Desktop;
        self.render(prepared, Resolution::preview(device), guides)
    }

    /// Guides-off pass at export resolution
    pub fn render_export(
        &self,
        prepared: &PreparedCover,
        device: DeviceClass,
    ) -> Result<RasterSurface> {
        self.render(prepared, Resolution::export(device), false)
    }

    /// Report which sheet edges carry artwork in their bleed strip
    pub fn check_bleed(
        &self,
        prepared: &PreparedCover,
        device: DeviceClass,
    ) -> Result<BleedStatus> {
        let surface = self.render(prepared, Resolution::preview(device), false)?;
        Ok(inspect_bleed(&surface, &prepared.dimensions))
    }

    /// Render at export resolution and produce the print PDF.
    ///
    /// Drawing and encoding run on a blocking thread.
    pub async fn export_pdf(
        &self,
        prepared: &PreparedCover,
        device: DeviceClass,
    ) -> Result<ExportedPdf> {
        self.session.ensure_current(prepared.token)?;

        let style = self.style;
        let panels = prepared.panels.clone();
        let dimensions = prepared.dimensions;
        let resolution = Resolution::export(device);

        let exported = tokio::task::spawn_blocking(move || {
            let mut surface = RasterSurface::for_dimensions(&dimensions, resolution)?;
            render(&mut surface, &style, &panels, &dimensions, false);
            export_pdf(&surface, &dimensions)
        })
        .await??;

        self.session.ensure_current(prepared.token)?;
        Ok(exported)
    }
}

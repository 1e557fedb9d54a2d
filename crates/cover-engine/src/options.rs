use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical specification of one book, immutable per computation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookSpecification {
    pub binding: BindingType,
    pub format: TrimFormat,
    pub paper: PaperType,
    /// Interior page count (20-800)
    pub page_count: u32,
    /// Front panel draw scale (1.0-1.2)
    pub scale_front: f64,
    /// Back panel draw scale (1.0-1.2)
    pub scale_back: f64,
}

impl Default for BookSpecification {
    fn default() -> Self {
        Self {
            binding: BindingType::Hardcover,
            format: TrimFormat::A5,
            paper: PaperType::Offset80,
            page_count: 100,
            scale_front: 1.0,
            scale_back: 1.0,
        }
    }
}

impl BookSpecification {
    /// Load a specification from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let spec = serde_json::from_slice(&bytes)
            .map_err(|e| CoverError::Config(format!("Failed to parse specification: {}", e)))?;
        Ok(spec)
    }

    /// Save the specification to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            CoverError::Config(format!("Failed to serialize specification: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Report values outside the ranges the host is expected to enforce.
    ///
    /// Nothing here is fatal: the engine still computes (possibly nonsensical)
    /// geometry for out-of-range input.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();

        if !(MIN_PAGE_COUNT..=MAX_PAGE_COUNT).contains(&self.page_count) {
            findings.push(format!(
                "Page count {} is outside {}-{}",
                self.page_count, MIN_PAGE_COUNT, MAX_PAGE_COUNT
            ));
        }

        for (name, scale) in [("front", self.scale_front), ("back", self.scale_back)] {
            if !(MIN_PANEL_SCALE..=MAX_PANEL_SCALE).contains(&scale) {
                findings.push(format!(
                    "{} scale {} is outside {}-{}",
                    name, scale, MIN_PANEL_SCALE, MAX_PANEL_SCALE
                ));
            }
        }

        if let TrimFormat::Custom {
            width_mm,
            height_mm,
        } = self.format
        {
            for (name, value) in [("width", width_mm), ("height", height_mm)] {
                if let Some(v) = value.filter(|v| *v <= 0.0) {
                    findings.push(format!("Custom {} {} mm is not positive", name, v));
                }
            }
        }

        findings
    }
}

/// Colours used by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoverStyle {
    /// Sheet background, visible wherever no artwork is drawn
    pub background: Rgb,
    /// Stroke and label colour of preview guides
    pub guide_color: Rgb,
}

impl Default for CoverStyle {
    fn default() -> Self {
        let (r, g, b) = GUIDE_COLOR;
        Self {
            background: Rgb::WHITE,
            guide_color: Rgb::new(r, g, b),
        }
    }
}

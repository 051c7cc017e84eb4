use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// DPI values that give pages a sensible physical size. Lower values make
/// bigger pages.
pub const DPI_RANGE: RangeInclusive<u32> = 50..=600;

/// PDF output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct PDF {
    /// Pixels per inch used to size each page from its image. Only affects the
    /// page size; images are never resampled.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Author written into the document properties
    #[serde(default = "default_author")]
    pub author: String,
}

fn default_dpi() -> u32 {
    150
}
pub(crate) fn default_author() -> String {
    "Comic Compiler".to_string()
}

impl Default for PDF {
    fn default() -> Self {
        PDF {
            dpi: default_dpi(),
            author: default_author(),
        }
    }
}

impl PDF {
    /// Check the configured DPI is inside [`DPI_RANGE`].
    pub fn validate(&self) -> Result<()> {
        if DPI_RANGE.contains(&self.dpi) {
            Ok(())
        } else {
            Err(anyhow!(
                "DPI must be between {} and {}, got {}",
                DPI_RANGE.start(),
                DPI_RANGE.end(),
                self.dpi
            ))
        }
    }
}

/// Statistics from rendering a PDF, used for user feedback.
#[derive(Debug)]
pub struct RenderStats {
    /// Number of pages in the PDF
    pub page_count: usize,
}

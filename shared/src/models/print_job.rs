//! Print Request Model

use serde::{Deserialize, Serialize};

use super::LabelItem;

/// Physical label preset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaperSize {
    /// 3×2 inch (76.2 × 50.8 mm)
    #[default]
    #[serde(rename = "3x2inch", alias = "3x2in")]
    Inch3x2,
    #[serde(rename = "50x30mm")]
    Mm50x30,
    #[serde(rename = "40x30mm")]
    Mm40x30,
}

impl PaperSize {
    /// Physical page size as (width, height) in millimeters
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperSize::Inch3x2 => (76.2, 50.8),
            PaperSize::Mm50x30 => (50.0, 30.0),
            PaperSize::Mm40x30 => (40.0, 30.0),
        }
    }

    /// Maximum raw title length before the shrink-to-fit search runs
    pub fn title_char_cap(&self) -> usize {
        match self {
            PaperSize::Inch3x2 => 30,
            PaperSize::Mm50x30 | PaperSize::Mm40x30 => 26,
        }
    }
}

/// Supported print resolutions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u16", into = "u16")]
pub enum Dpi {
    #[default]
    Dpi203,
    Dpi300,
}

impl Dpi {
    pub fn dots_per_inch(&self) -> f32 {
        match self {
            Dpi::Dpi203 => 203.0,
            Dpi::Dpi300 => 300.0,
        }
    }
}

impl TryFrom<u16> for Dpi {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            203 => Ok(Dpi::Dpi203),
            300 => Ok(Dpi::Dpi300),
            other => Err(format!("Unsupported dpi: {other} (expected 203 or 300)")),
        }
    }
}

impl From<Dpi> for u16 {
    fn from(value: Dpi) -> Self {
        match value {
            Dpi::Dpi203 => 203,
            Dpi::Dpi300 => 300,
        }
    }
}

/// Which rendering path produces the artifact
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Paginated PDF document
    #[default]
    Document,
    /// Device-native ZPL command stream
    Protocol,
}

/// Rendering options for one print request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    #[serde(default)]
    pub paper_size: PaperSize,
    /// Copies per item; values below 1 are treated as 1
    #[serde(default = "default_copies")]
    pub copies: u32,
    #[serde(default)]
    pub dpi: Dpi,
    /// Render the payload as human-readable text next to the bars
    #[serde(default)]
    pub human_readable: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_copies() -> u32 {
    1
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::default(),
            copies: 1,
            dpi: Dpi::default(),
            human_readable: false,
            output: OutputFormat::default(),
        }
    }
}

/// A complete print request as received from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    /// Target queue name, opaque to the pipeline until dispatch
    pub printer_name: String,
    pub items: Vec<LabelItem>,
    #[serde(flatten)]
    pub options: PrintOptions,
}

//! Printer Descriptor Model

use serde::{Deserialize, Serialize};

/// Queue status as reported by the OS print subsystem
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    Available,
    Offline,
    #[default]
    Unknown,
}

/// One enumerated printer queue
///
/// Transient snapshot produced by discovery; never cached across requests
/// because queue state can change between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterDescriptor {
    pub name: String,
    #[serde(default)]
    pub share_name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub status: PrinterStatus,
    #[serde(default)]
    pub port: Option<String>,
}

impl PrinterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            share_name: None,
            is_default: false,
            status: PrinterStatus::Unknown,
            port: None,
        }
    }

    /// Placeholder entry used when discovery fails entirely
    pub fn synthetic_default() -> Self {
        Self {
            name: "default".to_string(),
            share_name: None,
            is_default: true,
            status: PrinterStatus::Unknown,
            port: None,
        }
    }
}

//! Label Item Model

use serde::{Deserialize, Serialize};

/// One product record to render as a label
///
/// Immutable input to the pipeline; the renderers never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelItem {
    pub id: String,
    /// Display name, uppercased and shrunk-to-fit by the layout engine
    pub name: String,
    /// Code 128 payload
    pub barcode: String,
    /// Free-form net weight text (e.g. "1KG"), rendered verbatim
    #[serde(default)]
    pub net_weight: Option<String>,
    /// Unit price; non-finite values are treated as absent
    #[serde(default)]
    pub price: Option<f64>,
    /// ISO-8601 packaging date; absent or unparsable renders a placeholder
    #[serde(default)]
    pub packed_on: Option<String>,
    /// ISO-8601 expiry date; absent or unparsable renders a placeholder
    #[serde(default)]
    pub expires_on: Option<String>,
}

//! Renderer capability
//!
//! The PDF and ZPL paths are two variants of one render capability, so the
//! dispatcher stays artifact-agnostic and new output formats slot in
//! without touching transmission code.

use shared::models::{LabelItem, OutputFormat, PrintOptions};

use crate::document::DocumentRenderer;
use crate::error::PrintResult;
use crate::protocol::ZplRenderer;

/// A finished, transmissible rendering of a print request
#[derive(Debug, Clone)]
pub enum Artifact {
    Pdf(Vec<u8>),
    Zpl(String),
}

impl Artifact {
    /// Raw bytes handed to the transport layer
    pub fn bytes(&self) -> &[u8] {
        match self {
            Artifact::Pdf(bytes) => bytes,
            Artifact::Zpl(stream) => stream.as_bytes(),
        }
    }

    /// Spool file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Pdf(_) => "pdf",
            Artifact::Zpl(_) => "zpl",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// Rendering path selector
#[derive(Debug, Clone, Copy)]
pub enum Renderer {
    Document(DocumentRenderer),
    Protocol(ZplRenderer),
}

impl Renderer {
    /// Pick the path requested by the options
    pub fn for_options(options: &PrintOptions) -> Self {
        match options.output {
            OutputFormat::Document => Renderer::Document(DocumentRenderer),
            OutputFormat::Protocol => Renderer::Protocol(ZplRenderer),
        }
    }

    /// Render the item set to an artifact
    pub async fn render(
        &self,
        items: &[LabelItem],
        options: &PrintOptions,
    ) -> PrintResult<Artifact> {
        match self {
            Renderer::Document(renderer) => renderer.render(items, options).await,
            Renderer::Protocol(renderer) => renderer.render(items, options),
        }
    }
}

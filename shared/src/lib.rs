//! Shared domain models for the Krill back office
//!
//! Data types that cross the boundary between the excluded application
//! layers (catalog, HTTP surface) and the label pipeline:
//!
//! - [`models`]: label items, print requests, paper presets, printer
//!   descriptors
//! - [`response`]: the structured success/failure envelope returned to
//!   callers
//!
//! No I/O lives here; everything is plain data with serde derives.

pub mod models;
pub mod response;

// Re-exports
pub use models::{
    Dpi, LabelItem, OutputFormat, PaperSize, PrintOptions, PrintRequest, PrinterDescriptor,
    PrinterStatus,
};
pub use response::PrintOutcome;

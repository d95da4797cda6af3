//! # krill-printer
//!
//! Label rendering and printer dispatch - the delivery half of the Krill
//! back office.
//!
//! ## Scope
//!
//! This crate handles HOW a label reaches paper:
//! - Code 128 barcode rasterization
//! - Physical-unit layout (shrink-to-fit titles, aspect-preserving barcodes)
//! - Paginated PDF assembly
//! - ZPL command-stream generation for native label printers
//! - Printer queue discovery and ordered-fallback transmission
//!
//! Catalog persistence, image hosting and the HTTP surface stay in
//! application code; the only inbound contract is
//! [`LabelPrintService::print_labels`], which always resolves to a
//! structured [`shared::PrintOutcome`].
//!
//! ## Example
//!
//! ```ignore
//! use krill_printer::LabelPrintService;
//! use shared::models::{LabelItem, PrintOptions};
//!
//! let service = LabelPrintService::new();
//! let items = vec![LabelItem {
//!     id: "p-1".into(),
//!     name: "Sugar 1kg".into(),
//!     barcode: "1234567890".into(),
//!     net_weight: Some("1KG".into()),
//!     price: Some(180.0),
//!     packed_on: None,
//!     expires_on: None,
//! }];
//! let outcome = service
//!     .print_labels("Zebra-ZD420", &items, &PrintOptions::default())
//!     .await;
//! assert!(outcome.success);
//! ```

pub mod barcode;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod layout;
pub mod logger;
pub mod metrics;
pub mod protocol;
pub mod render;
pub mod service;
pub mod units;

// Re-exports
pub use dispatch::{DispatchConfig, PrinterDispatcher};
pub use error::{PrintError, PrintResult};
pub use render::{Artifact, Renderer};
pub use service::LabelPrintService;

// Re-export logger functions
pub use logger::{init_logger, init_logger_with_file};

//! Label print service
//!
//! The inbound boundary of the pipeline: validates the request, renders
//! through the selected path, and dispatches the artifact. Every failure is
//! translated into a structured [`PrintOutcome`]; nothing throws past this
//! boundary.

use tracing::{error, info, instrument};

use shared::models::{LabelItem, PrintOptions, PrintRequest, PrinterDescriptor};
use shared::response::PrintOutcome;

use crate::dispatch::PrinterDispatcher;
use crate::render::Renderer;

/// Message returned when the caller omits required fields
const MISSING_FIELDS: &str = "printerName and items[] are required";

/// High-level entry point used by the application layer
pub struct LabelPrintService {
    dispatcher: PrinterDispatcher,
}

impl LabelPrintService {
    /// Service with environment-derived dispatch configuration
    pub fn new() -> Self {
        Self {
            dispatcher: PrinterDispatcher::new(),
        }
    }

    pub fn with_dispatcher(dispatcher: PrinterDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Render the items and transmit the artifact to the named queue
    ///
    /// A missing printer name or empty item list is a caller error,
    /// rejected before any rendering happens.
    #[instrument(skip(self, items, options), fields(items = items.len()))]
    pub async fn print_labels(
        &self,
        printer_name: &str,
        items: &[LabelItem],
        options: &PrintOptions,
    ) -> PrintOutcome {
        if printer_name.trim().is_empty() || items.is_empty() {
            return PrintOutcome::failure(MISSING_FIELDS);
        }

        let artifact = match Renderer::for_options(options).render(items, options).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(error = %e, "rendering failed");
                return PrintOutcome::failure(format!("Rendering failed: {e}"));
            }
        };

        match self.dispatcher.dispatch(printer_name, &artifact).await {
            Ok(()) => {
                let pages = items.len() * options.copies.max(1) as usize;
                info!(pages, "print job delivered");
                PrintOutcome::ok(format!("{pages} label(s) sent to {printer_name}"))
            }
            Err(e) => {
                error!(error = %e, "dispatch failed");
                PrintOutcome::failure(e.to_string())
            }
        }
    }

    /// Convenience wrapper for a fully assembled request
    pub async fn print(&self, request: &PrintRequest) -> PrintOutcome {
        self.print_labels(&request.printer_name, &request.items, &request.options)
            .await
    }

    /// Snapshot of visible printer queues (best-effort, never fails)
    pub async fn list_printers(&self) -> Vec<PrinterDescriptor> {
        self.dispatcher.enumerate().await
    }
}

impl Default for LabelPrintService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_item() -> LabelItem {
        LabelItem {
            id: "p-1".to_string(),
            name: "Sugar 1kg".to_string(),
            barcode: "1234567890".to_string(),
            net_weight: Some("1KG".to_string()),
            price: Some(180.0),
            packed_on: None,
            expires_on: None,
        }
    }

    #[tokio::test]
    async fn test_empty_items_rejected_before_pipeline() {
        let service = LabelPrintService::new();
        let outcome = service
            .print_labels("Zebra-ZD420", &[], &PrintOptions::default())
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_missing_printer_rejected() {
        let service = LabelPrintService::new();
        let outcome = service
            .print_labels("  ", &[create_test_item()], &PrintOptions::default())
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_request_wrapper_validates() {
        let service = LabelPrintService::new();
        let request: PrintRequest = serde_json::from_str(
            r#"{"printerName": "", "items": []}"#,
        )
        .unwrap();

        let outcome = service.print(&request).await;
        assert!(!outcome.success);
    }
}

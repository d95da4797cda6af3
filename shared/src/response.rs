//! Print result envelope
//!
//! Every print call resolves to this structure; the pipeline never lets an
//! error escape past its boundary.

use serde::{Deserialize, Serialize};

/// Structured success/failure result handed back to the caller
///
/// ```json
/// { "success": true, "message": "2 label(s) sent to Zebra-ZD420" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl PrintOutcome {
    /// Create a successful outcome
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Create a failed outcome
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let ok = PrintOutcome::ok("done");
        assert!(ok.success);
        assert_eq!(ok.message, "done");

        let failure = PrintOutcome::failure("printer unreachable");
        assert!(!failure.success);
    }
}

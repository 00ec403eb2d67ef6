//! # Error Types
//!
//! Domain-specific error types for fiskal-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fiskal-core errors (this file)                                        │
//! │  ├── CoreError        - Document / precision failures                  │
//! │  └── ValidationError  - Input validation failures (cashbox ID)         │
//! │                                                                         │
//! │  fiskal-client errors (separate crate)                                 │
//! │  └── ClientError      - Config, service and session failures           │
//! │                                                                         │
//! │  Flow: CoreError → ClientError::Core, ValidationError → InvalidConfig  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is local to ONE document. The example loader skips the
//! document and keeps going; nothing in this crate is fatal to the process.
//!
//! Absent values are never errors. A missing `Moment` or a zero amount simply
//! produces no wire value.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning a receipt document into its wire shape.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document is not valid JSON or is structurally incomplete.
    ///
    /// ## When This Occurs
    /// - Bytes are not JSON, or the root is not an object
    /// - `cbChargeItems` / `cbPayItems` is missing or not an array
    /// - A case field is missing or not an integer
    /// - A decimal or moment field holds text that is not a number / instant
    ///
    /// `path` names the offending field, e.g. `cbChargeItems[1].Amount`.
    #[error("Malformed receipt document at {path}: {reason}")]
    DocumentMalformed { path: String, reason: String },

    /// A decimal does not fit the 15 character wire budget.
    ///
    /// Only raised under `PrecisionPolicy::Reject`. The default policy
    /// truncates and reports a `PrecisionLoss` instead.
    #[error("{path}: decimal '{text}' exceeds the {budget} character wire budget")]
    UnsupportedPrecision {
        path: String,
        text: String,
        budget: usize,
    },
}

impl CoreError {
    /// Shorthand for a `DocumentMalformed` error.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::DocumentMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any document is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., invalid GUID, invalid decimal text).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::malformed("cbPayItems", "missing array");
        assert_eq!(
            err.to_string(),
            "Malformed receipt document at cbPayItems: missing array"
        );

        let err = CoreError::UnsupportedPrecision {
            path: "cbReceiptAmount".to_string(),
            text: "1234567890.1234567".to_string(),
            budget: 15,
        };
        assert_eq!(
            err.to_string(),
            "cbReceiptAmount: decimal '1234567890.1234567' exceeds the 15 character wire budget"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "cashbox_id".to_string(),
        };
        assert_eq!(err.to_string(), "cashbox_id is required");
    }
}

//! # Validation Module
//!
//! Input validation for values the caller supplies alongside a document.
//!
//! ## Usage
//! ```rust
//! use fiskal_core::validation::CashboxId;
//!
//! let id = CashboxId::parse("737e2889-7d32-435d-a9e7-3de40e0fa156").unwrap();
//! assert_eq!(id.as_str(), "737e2889-7d32-435d-a9e7-3de40e0fa156");
//!
//! assert!(CashboxId::parse("not-a-guid").is_err());
//! ```

use std::fmt;

use serde::Serialize;
use uuid::{Uuid, Variant};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cashbox ID
// =============================================================================

/// A validated cashbox identifier.
///
/// ## Rules
/// - Lowercase, hyphenated 8-4-4-4-12 form (no braces, no `urn:uuid:`)
/// - RFC 4122 variant, version 1 through 5
///
/// The text is kept exactly as given, since it is injected verbatim into
/// `ftCashBoxID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CashboxId(String);

impl CashboxId {
    /// Validates and wraps a cashbox ID.
    pub fn parse(input: &str) -> ValidationResult<Self> {
        validate_cashbox_id(input)?;
        Ok(CashboxId(input.to_string()))
    }

    /// Returns the ID text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CashboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CashboxId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CashboxId::parse(s)
    }
}

/// Validates a cashbox ID (see [`CashboxId`] for the rules).
///
/// ## Example
/// ```rust
/// use fiskal_core::validation::validate_cashbox_id;
///
/// assert!(validate_cashbox_id("737e2889-7d32-435d-a9e7-3de40e0fa156").is_ok());
/// assert!(validate_cashbox_id("").is_err());
/// assert!(validate_cashbox_id("737E2889-7D32-435D-A9E7-3DE40E0FA156").is_err());
/// ```
pub fn validate_cashbox_id(input: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "cashbox_id".to_string(),
        reason: reason.to_string(),
    };

    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cashbox_id".to_string(),
        });
    }

    // Uuid::parse_str also takes braced, urn and simple forms; only the
    // plain hyphenated form is allowed here.
    if input.len() != 36 || input.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid("must be a lowercase hyphenated GUID"));
    }

    let uuid = Uuid::parse_str(input).map_err(|e| invalid(&e.to_string()))?;

    if uuid.get_variant() != Variant::RFC4122 {
        return Err(invalid("must be an RFC 4122 GUID"));
    }
    if !(1..=5).contains(&uuid.get_version_num()) {
        return Err(invalid("GUID version must be 1 to 5"));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cashbox_id() {
        assert!(CashboxId::parse("737e2889-7d32-435d-a9e7-3de40e0fa156").is_ok());
        assert!(CashboxId::parse(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn test_empty_is_required() {
        assert!(matches!(
            validate_cashbox_id("  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_rejects_other_forms() {
        // Uppercase
        assert!(CashboxId::parse("737E2889-7D32-435D-A9E7-3DE40E0FA156").is_err());
        // Simple and braced forms
        assert!(CashboxId::parse("737e28897d32435da9e73de40e0fa156").is_err());
        assert!(CashboxId::parse("{737e2889-7d32-435d-a9e7-3de40e0fa156}").is_err());
        // Version 0 (nil)
        assert!(CashboxId::parse("00000000-0000-0000-0000-000000000000").is_err());
        // Wrong variant nibble
        assert!(CashboxId::parse("737e2889-7d32-435d-c9e7-3de40e0fa156").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = CashboxId::parse("737e2889-7d32-435d-a9e7-3de40e0fa156").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"737e2889-7d32-435d-a9e7-3de40e0fa156\""
        );
    }
}

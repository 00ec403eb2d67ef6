//! # fiskal-core: Wire Codecs for Receipt Requests
//!
//! This crate converts human-authored receipt request examples into the
//! exact wire shape a receipt-signing service expects. It contains pure
//! functions only, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   example.json (bytes)                                                  │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │               ★ fiskal-core (THIS CRATE) ★                        │  │
//! │  │                                                                  │  │
//! │  │   receipt ───────┬──────────────┬──────────────┐                 │  │
//! │  │   (transformer)  ▼              ▼              ▼                 │  │
//! │  │              decimal        temporal         case                │  │
//! │  │           {lo,hi,signScale} {value,scale,kind} "decimal string"  │  │
//! │  │                                                                  │  │
//! │  │   NO I/O • NO NETWORK • NO CLIENT STATE                          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   ReceiptRequest ──► fiskal-client ──► PosService::sign                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`decimal`] - Decimal → `{lo, hi, signScale}`, with the 15 character cut
//! - [`temporal`] - Date-time → `{value, scale, kind}`
//! - [`case`] - Receipt / charge item / pay item case enumerants
//! - [`receipt`] - The document transformer
//! - [`validation`] - Cashbox ID validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fiskal_core::decimal::{self, DecimalText};
//!
//! let amount: DecimalText = "-0.5".parse().unwrap();
//! let wire = decimal::encode(Some(&amount)).unwrap();
//!
//! assert_eq!(wire.lo, "05");
//! assert_eq!(wire.hi, 0);
//! assert_eq!(wire.sign_scale, (1 << 1) | 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod case;
pub mod decimal;
pub mod error;
pub mod receipt;
pub mod temporal;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use case::{ChargeItemCase, PayItemCase, ReceiptCase};
pub use decimal::{DecimalText, PrecisionLoss, WireDecimal};
pub use error::{CoreError, CoreResult, ValidationError};
pub use receipt::{
    transform, transform_with_report, ChargeItem, PayItem, PrecisionPolicy, ReceiptRequest,
    TransformOptions, TransformReport,
};
pub use temporal::WireTimestamp;
pub use validation::CashboxId;

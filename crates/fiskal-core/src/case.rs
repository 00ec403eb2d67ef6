//! # Case Enumerants
//!
//! A "case" is the 64-bit code that tells the signing service the fiscal
//! category of a receipt, a charge item or a pay item. The top 16 bits hold
//! the country (`0x4445` = "DE"), the rest is country specific.
//!
//! ```text
//!   0x4445_0000_0000_0001
//!     └─┬─┘ └──────┬──────┘
//!    country    category / flags
//! ```
//!
//! On the wire every case travels as a decimal string, because the RPC
//! layer maps 64-bit integers to strings. Going through `f64` would corrupt
//! them (`6000000000000000001` is not representable), so cases are read
//! from the exact JSON literal and kept as `i64`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

macro_rules! case_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn new(code: i64) -> Self {
                $name(code)
            }

            #[inline]
            pub const fn code(&self) -> i64 {
                self.0
            }

            /// Decimal string form used on the wire.
            pub fn to_wire_string(&self) -> String {
                self.0.to_string()
            }

            /// Reads the case from a document value.
            ///
            /// `Err` carries a reason suitable for `DocumentMalformed`.
            pub fn from_json(value: &Value) -> Result<Self, String> {
                parse_case(value).map($name)
            }
        }

        /// Hex form, as cases are usually written in documentation.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_wire_string())
            }
        }
    };
}

case_type!(
    /// `ftReceiptCase` of a receipt request.
    ReceiptCase
);

case_type!(
    /// `ftChargeItemCase` of a charge item.
    ChargeItemCase
);

case_type!(
    /// `ftPayItemCase` of a pay item.
    PayItemCase
);

// =============================================================================
// Helpers
// =============================================================================

/// Accepts an integer literal, a decimal digit string or a `0x` hex string.
fn parse_case(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            let literal = n.to_string();
            literal
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not a 64-bit integer case", literal))
        }
        Value::String(s) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => i64::from_str_radix(&hex.replace('_', ""), 16),
                None => s.parse::<i64>(),
            };
            parsed.map_err(|_| format!("'{}' is not a 64-bit integer case", s))
        }
        Value::Null => Err("case is required".to_string()),
        other => Err(format!("expected an integer case, got {}", other)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

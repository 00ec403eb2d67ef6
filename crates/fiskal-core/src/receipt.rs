//! # Receipt Request Transformer
//!
//! Turns the raw bytes of a receipt request example into the wire-shaped
//! [`ReceiptRequest`] the signing service accepts.
//!
//! ## What Gets Converted
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Header (first)                                                         │
//! │    ftCashBoxID       ← caller's CashboxId                               │
//! │    ftReceiptCase     → ReceiptCase → "decimal string"                   │
//! │    cbReceiptMoment   → WireTimestamp                                    │
//! │    cbReceiptAmount   → WireDecimal                                      │
//! │                                                                         │
//! │  cbChargeItems[i] (in order)                                            │
//! │    Quantity, Amount, VATRate, VATAmount, UnitQuantity → WireDecimal     │
//! │    Moment (optional)                                  → WireTimestamp   │
//! │    ftChargeItemCase                                   → "decimal string"│
//! │                                                                         │
//! │  cbPayItems[i] (in order)                                               │
//! │    Quantity, Amount   → WireDecimal                                     │
//! │    Moment (optional)  → WireTimestamp                                   │
//! │    ftPayItemCase      → "decimal string"                                │
//! │                                                                         │
//! │  Every other field is carried through untouched.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Item order is preserved: consumers correlate items by position.
//!
//! The transformation is a single pass into a different shape. Feeding a
//! transformed request back in is not supported.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::case::{ChargeItemCase, PayItemCase, ReceiptCase};
use crate::decimal::{self, DecimalText, PrecisionLoss, WireDecimal, WIRE_DIGIT_BUDGET};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::temporal::{self, WireTimestamp};
use crate::validation::CashboxId;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// =============================================================================
// Wire Document
// =============================================================================

/// A receipt request in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptRequest {
    #[serde(rename = "ftCashBoxID")]
    pub cashbox_id: CashboxId,

    #[serde(rename = "ftReceiptCase")]
    pub receipt_case: ReceiptCase,

    #[serde(rename = "cbReceiptMoment", skip_serializing_if = "Option::is_none")]
    pub receipt_moment: Option<WireTimestamp>,

    #[serde(rename = "cbReceiptAmount", skip_serializing_if = "Option::is_none")]
    pub receipt_amount: Option<WireDecimal>,

    #[serde(rename = "cbChargeItems")]
    pub charge_items: Vec<ChargeItem>,

    #[serde(rename = "cbPayItems")]
    pub pay_items: Vec<PayItem>,

    /// Fields this transformer does not touch (`cbTerminalID`,
    /// `cbReceiptReference`, ...), in document order.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A charge item in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeItem {
    #[serde(rename = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<WireDecimal>,

    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<WireDecimal>,

    #[serde(rename = "VATRate", skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<WireDecimal>,

    #[serde(rename = "VATAmount", skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<WireDecimal>,

    #[serde(rename = "UnitQuantity", skip_serializing_if = "Option::is_none")]
    pub unit_quantity: Option<WireDecimal>,

    #[serde(rename = "Moment", skip_serializing_if = "Option::is_none")]
    pub moment: Option<WireTimestamp>,

    #[serde(rename = "ftChargeItemCase")]
    pub case: ChargeItemCase,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A pay item in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayItem {
    #[serde(rename = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<WireDecimal>,

    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<WireDecimal>,

    #[serde(rename = "Moment", skip_serializing_if = "Option::is_none")]
    pub moment: Option<WireTimestamp>,

    #[serde(rename = "ftPayItemCase")]
    pub case: PayItemCase,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

// =============================================================================
// Options & Report
// =============================================================================

/// What to do with decimals longer than the wire budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionPolicy {
    /// Cut to the budget like the legacy encoder, warn and report.
    #[default]
    Truncate,

    /// Fail the document with `UnsupportedPrecision`.
    Reject,
}

impl std::fmt::Display for PrecisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionPolicy::Truncate => write!(f, "truncate"),
            PrecisionPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for PrecisionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(PrecisionPolicy::Truncate),
            "reject" => Ok(PrecisionPolicy::Reject),
            other => Err(ValidationError::InvalidFormat {
                field: "precision_policy".to_string(),
                reason: format!("unknown policy '{}', expected truncate or reject", other),
            }),
        }
    }
}

/// Knobs for [`transform_with_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub precision: PrecisionPolicy,
}

/// A truncated decimal together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPrecisionLoss {
    /// Field path, e.g. `cbChargeItems[2].Amount`.
    pub path: String,

    #[serde(flatten)]
    pub loss: PrecisionLoss,
}

/// Diagnostics collected while transforming one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub precision_losses: Vec<FieldPrecisionLoss>,
}

impl TransformReport {
    /// Returns true if every decimal reached the wire intact.
    pub fn is_lossless(&self) -> bool {
        self.precision_losses.is_empty()
    }

    /// Number of truncated decimals.
    pub fn loss_count(&self) -> usize {
        self.precision_losses.len()
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Transforms a JSON receipt request with the default options.
///
/// ## Example
/// ```rust
/// use fiskal_core::receipt::transform;
/// use fiskal_core::validation::CashboxId;
///
/// let cashbox = CashboxId::parse("737e2889-7d32-435d-a9e7-3de40e0fa156").unwrap();
/// let doc = br#"{
///     "ftReceiptCase": 4919338167972134913,
///     "cbReceiptAmount": 12.345,
///     "cbChargeItems": [],
///     "cbPayItems": []
/// }"#;
///
/// let request = transform(doc, &cashbox).unwrap();
/// assert_eq!(request.receipt_amount.unwrap().lo, "12345");
/// ```
pub fn transform(bytes: &[u8], cashbox_id: &CashboxId) -> CoreResult<ReceiptRequest> {
    transform_with_report(bytes, cashbox_id, TransformOptions::default()).map(|(request, _)| request)
}

/// Transforms a JSON receipt request and returns the diagnostics too.
pub fn transform_with_report(
    bytes: &[u8],
    cashbox_id: &CashboxId,
    options: TransformOptions,
) -> CoreResult<(ReceiptRequest, TransformReport)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| CoreError::malformed("$", e.to_string()))?;
    let Value::Object(mut fields) = document else {
        return Err(CoreError::malformed("$", "expected a JSON object"));
    };

    let mut transformer = Transformer {
        options,
        report: TransformReport::default(),
    };

    // Header
    fields.shift_remove("ftCashBoxID");
    let receipt_case = transformer.case(&mut fields, "ftReceiptCase", "", ReceiptCase::from_json)?;
    let receipt_moment = transformer.moment(&mut fields, "cbReceiptMoment", "")?;
    let receipt_amount = transformer.decimal(&mut fields, "cbReceiptAmount", "")?;

    // Items, in document order
    let charge_items = take_array(&mut fields, "cbChargeItems")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| transformer.charge_item(item, &format!("cbChargeItems[{}].", i)))
        .collect::<CoreResult<Vec<_>>>()?;

    let pay_items = take_array(&mut fields, "cbPayItems")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| transformer.pay_item(item, &format!("cbPayItems[{}].", i)))
        .collect::<CoreResult<Vec<_>>>()?;

    debug!(
        receipt_case = %receipt_case,
        charge_items = charge_items.len(),
        pay_items = pay_items.len(),
        truncated = transformer.report.loss_count(),
        "Receipt request transformed"
    );

    let request = ReceiptRequest {
        cashbox_id: cashbox_id.clone(),
        receipt_case,
        receipt_moment,
        receipt_amount,
        charge_items,
        pay_items,
        other: fields,
    };

    Ok((request, transformer.report))
}

// =============================================================================
// Transformer
// =============================================================================

struct Transformer {
    options: TransformOptions,
    report: TransformReport,
}

impl Transformer {
    fn charge_item(&mut self, item: Value, prefix: &str) -> CoreResult<ChargeItem> {
        let mut fields = into_object(item, prefix)?;

        Ok(ChargeItem {
            quantity: self.decimal(&mut fields, "Quantity", prefix)?,
            amount: self.decimal(&mut fields, "Amount", prefix)?,
            vat_rate: self.decimal(&mut fields, "VATRate", prefix)?,
            vat_amount: self.decimal(&mut fields, "VATAmount", prefix)?,
            unit_quantity: self.decimal(&mut fields, "UnitQuantity", prefix)?,
            moment: self.moment(&mut fields, "Moment", prefix)?,
            case: self.case(&mut fields, "ftChargeItemCase", prefix, ChargeItemCase::from_json)?,
            other: fields,
        })
    }

    fn pay_item(&mut self, item: Value, prefix: &str) -> CoreResult<PayItem> {
        let mut fields = into_object(item, prefix)?;

        Ok(PayItem {
            quantity: self.decimal(&mut fields, "Quantity", prefix)?,
            amount: self.decimal(&mut fields, "Amount", prefix)?,
            moment: self.moment(&mut fields, "Moment", prefix)?,
            case: self.case(&mut fields, "ftPayItemCase", prefix, PayItemCase::from_json)?,
            other: fields,
        })
    }

    fn decimal(
        &mut self,
        fields: &mut Map<String, Value>,
        key: &str,
        prefix: &str,
    ) -> CoreResult<Option<WireDecimal>> {
        let path = format!("{}{}", prefix, key);

        let text = match fields.shift_remove(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => DecimalText::from_number(&n),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.parse(),
            Some(other) => {
                return Err(CoreError::malformed(
                    path,
                    format!("expected a decimal, got {}", other),
                ))
            }
        }
        .map_err(|e| CoreError::malformed(&path, e.to_string()))?;

        let Some(encoded) = decimal::encode_reported(&text) else {
            return Ok(None);
        };

        if let Some(loss) = encoded.loss {
            if self.options.precision == PrecisionPolicy::Reject {
                return Err(CoreError::UnsupportedPrecision {
                    path,
                    text: loss.original,
                    budget: WIRE_DIGIT_BUDGET,
                });
            }

            warn!(
                path = %path,
                original = %loss.original,
                kept = %loss.kept,
                dropped = loss.dropped,
                "Decimal truncated to wire budget"
            );
            self.report
                .precision_losses
                .push(FieldPrecisionLoss { path, loss });
        }

        Ok(Some(encoded.wire))
    }

    fn moment(
        &mut self,
        fields: &mut Map<String, Value>,
        key: &str,
        prefix: &str,
    ) -> CoreResult<Option<WireTimestamp>> {
        let Some(value) = fields.shift_remove(key) else {
            return Ok(None);
        };

        temporal::parse_moment(&value)
            .map(temporal::encode_opt)
            .map_err(|reason| CoreError::malformed(format!("{}{}", prefix, key), reason))
    }

    fn case<T>(
        &mut self,
        fields: &mut Map<String, Value>,
        key: &str,
        prefix: &str,
        parse: fn(&Value) -> Result<T, String>,
    ) -> CoreResult<T> {
        let path = format!("{}{}", prefix, key);

        match fields.shift_remove(key) {
            Some(value) => parse(&value).map_err(|reason| CoreError::malformed(path, reason)),
            None => Err(CoreError::malformed(path, "case is required")),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn take_array(fields: &mut Map<String, Value>, key: &str) -> CoreResult<Vec<Value>> {
    match fields.shift_remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(CoreError::malformed(
            key,
            format!("expected an array, got {}", other),
        )),
        None => Err(CoreError::malformed(key, "required array is missing")),
    }
}

fn into_object(item: Value, prefix: &str) -> CoreResult<Map<String, Value>> {
    match item {
        Value::Object(fields) => Ok(fields),
        other => Err(CoreError::malformed(
            prefix.trim_end_matches('.'),
            format!("expected an object, got {}", other),
        )),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

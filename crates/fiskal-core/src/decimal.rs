//! # Decimal Codec
//!
//! Converts decimal values from receipt documents into the legacy
//! binary-decimal wire shape `{lo, hi, signScale}`.
//!
//! ## Wire Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WireDecimal                                                            │
//! │                                                                         │
//! │  lo         digits of the unscaled value, as a string ("12345")         │
//! │  hi         upper bits of the 96-bit mantissa, ALWAYS 0                 │
//! │  signScale  bit 0 = sign (1 = negative), bits 1.. = scale               │
//! │                                                                         │
//! │   12.345  →  lo "12345"  hi 0  signScale (3 << 1) | 0 = 6               │
//! │   -0.5    →  lo "05"     hi 0  signScale (1 << 1) | 1 = 3               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The 15 Character Budget
//! The receiving format could carry 28-29 significant digits split across
//! `lo` and `hi`. This codec only ever fills `lo`, and only with the first
//! 15 characters of the unsigned decimal text (the point counts as a
//! character). Anything past that is cut off, never rounded:
//!
//! ```text
//! "1234567890.1234567"  (18 chars)
//!  └─────15──────┘
//! "1234567890.1234"     →  lo "12345678901234", scale 4
//! ```
//!
//! Receivers depend on this exact behavior, so the cut is kept and reported
//! as a [`PrecisionLoss`] instead of being "fixed".
//!
//! ## Zero Is Absent
//! A zero amount encodes to `None`, the same as a missing amount. Receivers
//! read an absent decimal as zero.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::ValidationError;

/// Maximum characters (digits plus decimal point) that reach the wire.
pub const WIRE_DIGIT_BUDGET: usize = 15;

/// Bit of `signScale` that carries the sign.
pub const SIGN_BIT: u32 = 1;

/// Exponents beyond this are rejected instead of expanded.
const MAX_EXPONENT: i64 = 4096;

// =============================================================================
// Decimal Text (input)
// =============================================================================

/// A decimal number in canonical textual form.
///
/// Canonical means: no exponent, no leading zeros in the integer part (but
/// at least one digit), no trailing zeros in the fraction.
///
/// | Source text | Canonical |
/// |-------------|-----------|
/// | `12.345`    | `12.345`  |
/// | `1.50`      | `1.5`     |
/// | `2.0`       | `2`       |
/// | `-.5`       | `-0.5`    |
/// | `1e-7`      | `0.0000001` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalText {
    negative: bool,
    integer: String,
    fraction: String,
}

impl DecimalText {
    /// Builds the canonical form from a sign, a run of digits and the
    /// position of the decimal point within those digits.
    ///
    /// `point` may fall before the first digit (negative) or after the
    /// last one; missing positions are zero-filled.
    fn from_digits(negative: bool, digits: &str, point: i64) -> Self {
        let len = digits.len() as i64;

        let (integer, fraction) = if point <= 0 {
            let mut fraction = "0".repeat(point.unsigned_abs() as usize);
            fraction.push_str(digits);
            (String::from("0"), fraction)
        } else if point >= len {
            let mut integer = digits.to_string();
            integer.push_str(&"0".repeat((point - len) as usize));
            (integer, String::new())
        } else {
            let (int, frac) = digits.split_at(point as usize);
            (int.to_string(), frac.to_string())
        };

        let integer = match integer.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };

        DecimalText {
            negative,
            integer: integer.to_string(),
            fraction: fraction.trim_end_matches('0').to_string(),
        }
    }

    /// Parses the literal of a JSON number.
    ///
    /// With `serde_json`'s `arbitrary_precision` the literal is kept
    /// verbatim, so no digit is lost before we get here.
    pub fn from_number(number: &Number) -> Result<Self, ValidationError> {
        number.to_string().parse()
    }

    /// Returns true if the value is numerically zero (`0`, `-0.000`, ...).
    pub fn is_zero(&self) -> bool {
        self.integer == "0" && self.fraction.is_empty()
    }

    /// Returns true for values below zero.
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> usize {
        self.fraction.len()
    }

    /// The value without its sign, e.g. `0.5` for `-0.5`.
    pub fn unsigned_text(&self) -> String {
        if self.fraction.is_empty() {
            self.integer.clone()
        } else {
            format!("{}.{}", self.integer, self.fraction)
        }
    }
}

impl fmt::Display for DecimalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.unsigned_text())
    }
}

impl FromStr for DecimalText {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "decimal".to_string(),
            reason: format!("'{}' {}", s, reason),
        };

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exponent: i64 = body[pos + 1..]
                    .parse()
                    .map_err(|_| invalid("has an invalid exponent"))?;
                if exponent.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
                    return Err(invalid("has an exponent out of range"));
                }
                (&body[..pos], exponent)
            }
            None => (body, 0),
        };

        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid("has no digits"));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return Err(invalid("is not a decimal number"));
        }

        let digits = format!("{}{}", integer, fraction);
        Ok(DecimalText::from_digits(
            negative,
            &digits,
            integer.len() as i64 + exponent,
        ))
    }
}

impl From<Decimal> for DecimalText {
    fn from(value: Decimal) -> Self {
        let digits = value.mantissa().unsigned_abs().to_string();
        let point = digits.len() as i64 - i64::from(value.scale());
        DecimalText::from_digits(value.is_sign_negative(), &digits, point)
    }
}

// =============================================================================
// Wire Decimal (output)
// =============================================================================

/// The legacy binary-decimal wire shape.
///
/// Field names are the wire names; see the module docs for the bit layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDecimal {
    /// Unscaled digits, at most [`WIRE_DIGIT_BUDGET`] of them.
    pub lo: String,

    /// Always 0.
    pub hi: u32,

    /// `(scale << 1) | sign`.
    #[serde(rename = "signScale")]
    pub sign_scale: u32,
}

impl WireDecimal {
    /// Packs a scale and a sign into `signScale`.
    #[inline]
    pub const fn pack_sign_scale(scale: u32, negative: bool) -> u32 {
        (scale << 1) | if negative { SIGN_BIT } else { 0 }
    }

    /// Number of fractional digits.
    #[inline]
    pub const fn scale(&self) -> u32 {
        self.sign_scale >> 1
    }

    /// Sign flag from bit 0.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.sign_scale & SIGN_BIT != 0
    }

    /// Reassembles the value this wire shape stands for.
    ///
    /// Returns `None` if `lo` is not a digit string or the scale is out of
    /// `Decimal`'s range. After truncation this is the truncated value, not
    /// the original one.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let mantissa: i128 = self.lo.parse().ok()?;
        let mut value = Decimal::try_from_i128_with_scale(mantissa, self.scale()).ok()?;
        value.set_sign_negative(self.is_negative());
        Some(value)
    }
}

// =============================================================================
// Precision Loss
// =============================================================================

/// Report of a value that did not fit the wire budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecisionLoss {
    /// Canonical text before truncation (signed).
    pub original: String,

    /// Unsigned text that reached the wire, point included.
    pub kept: String,

    /// Characters cut off.
    pub dropped: usize,
}

/// Result of [`encode_reported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDecimal {
    pub wire: WireDecimal,
    pub loss: Option<PrecisionLoss>,
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes a decimal, dropping any precision loss report.
///
/// `None` in, zero in → `None` out.
pub fn encode(value: Option<&DecimalText>) -> Option<WireDecimal> {
    value.and_then(encode_reported).map(|encoded| encoded.wire)
}

/// Encodes a decimal and reports whether the 15 character cut removed
/// anything.
///
/// Returns `None` for zero.
pub fn encode_reported(value: &DecimalText) -> Option<EncodedDecimal> {
    if value.is_zero() {
        return None;
    }

    let unsigned = value.unsigned_text();
    // Canonical text is pure ASCII, so byte and char positions agree.
    let kept = &unsigned[..unsigned.len().min(WIRE_DIGIT_BUDGET)];

    let (integer, fraction) = kept.split_once('.').unwrap_or((kept, ""));
    let scale = fraction.len() as u32;

    let loss = (kept.len() < unsigned.len()).then(|| PrecisionLoss {
        original: value.to_string(),
        kept: kept.to_string(),
        dropped: unsigned.len() - kept.len(),
    });

    Some(EncodedDecimal {
        wire: WireDecimal {
            lo: format!("{}{}", integer, fraction),
            hi: 0,
            sign_scale: WireDecimal::pack_sign_scale(scale, value.is_negative()),
        },
        loss,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> DecimalText {
        s.parse().unwrap()
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(text("12.345").to_string(), "12.345");
        assert_eq!(text("1.50").to_string(), "1.5");
        assert_eq!(text("2.0").to_string(), "2");
        assert_eq!(text("-.5").to_string(), "-0.5");
        assert_eq!(text("+7").to_string(), "7");
        assert_eq!(text("100").to_string(), "100");
        assert_eq!(text("1e-7").to_string(), "0.0000001");
        assert_eq!(text("1.5E3").to_string(), "1500");
        assert_eq!(text("-0.000").to_string(), "0");
    }

    #[test]
    fn test_invalid_text_rejected() {
        assert!("".parse::<DecimalText>().is_err());
        assert!("-".parse::<DecimalText>().is_err());
        assert!(".".parse::<DecimalText>().is_err());
        assert!("12,5".parse::<DecimalText>().is_err());
        assert!("abc".parse::<DecimalText>().is_err());
        assert!("1e".parse::<DecimalText>().is_err());
        assert!("1e99999".parse::<DecimalText>().is_err());
        assert!("1e-9223372036854775808".parse::<DecimalText>().is_err());
        assert!("1e9223372036854775807".parse::<DecimalText>().is_err());
    }

    #[test]
    fn test_encode_positive() {
        let wire = encode(Some(&text("12.345"))).unwrap();
        assert_eq!(
            wire,
            WireDecimal {
                lo: "12345".to_string(),
                hi: 0,
                sign_scale: 6,
            }
        );
        assert_eq!(wire.scale(), 3);
        assert!(!wire.is_negative());
    }

    #[test]
    fn test_encode_negative_keeps_leading_zero() {
        let wire = encode(Some(&text("-0.5"))).unwrap();
        assert_eq!(wire.lo, "05");
        assert_eq!(wire.hi, 0);
        assert_eq!(wire.sign_scale, 3);
        assert_eq!(wire.scale(), 1);
        assert!(wire.is_negative());
    }

    #[test]
    fn test_encode_integer_has_scale_zero() {
        let wire = encode(Some(&text("-42"))).unwrap();
        assert_eq!(wire.lo, "42");
        assert_eq!(wire.sign_scale, 1);

        let wire = encode(Some(&text("42"))).unwrap();
        assert_eq!(wire.sign_scale, 0);
    }

    #[test]
    fn test_zero_and_absent_encode_to_none() {
        assert_eq!(encode(None), None);
        assert_eq!(encode(Some(&text("0"))), None);
        assert_eq!(encode(Some(&text("0.00"))), None);
        assert_eq!(encode(Some(&text("-0"))), None);
    }

    #[test]
    fn test_truncation_cuts_fraction() {
        let encoded = encode_reported(&text("1234567890.1234567")).unwrap();
        assert_eq!(encoded.wire.lo, "12345678901234");
        assert_eq!(encoded.wire.scale(), 4);

        let loss = encoded.loss.unwrap();
        assert_eq!(loss.original, "1234567890.1234567");
        assert_eq!(loss.kept, "1234567890.1234");
        assert_eq!(loss.dropped, 3);
    }

    #[test]
    fn test_truncation_at_point_gives_scale_zero() {
        let encoded = encode_reported(&text("12345678901234.56")).unwrap();
        assert_eq!(encoded.wire.lo, "12345678901234");
        assert_eq!(encoded.wire.scale(), 0);
        assert!(encoded.loss.is_some());
    }

    /// The integer part is cut too; the magnitude on the wire is wrong.
    /// This documents the limitation rather than endorsing it.
    #[test]
    fn test_truncation_of_long_integer_documented() {
        let encoded = encode_reported(&text("-12345678901234567")).unwrap();
        assert_eq!(encoded.wire.lo, "123456789012345");
        assert_eq!(encoded.wire.sign_scale, 1);
        assert_eq!(encoded.loss.unwrap().dropped, 2);
    }

    #[test]
    fn test_exactly_fifteen_chars_is_lossless() {
        let encoded = encode_reported(&text("1234567.1234567")).unwrap();
        assert_eq!(encoded.wire.lo, "12345671234567");
        assert_eq!(encoded.wire.scale(), 7);
        assert!(encoded.loss.is_none());
    }

    #[test]
    fn test_round_trip_within_budget() {
        for s in ["12.345", "0.5", "1", "999999999999999", "0.0000000000001", "7.25"] {
            let wire = encode(Some(&text(s))).unwrap();
            assert_eq!(wire.hi, 0);
            assert_eq!(wire.to_decimal().unwrap(), s.parse::<Decimal>().unwrap(), "{}", s);
        }
    }

    #[test]
    fn test_round_trip_negative() {
        let wire = encode(Some(&text("-19.99"))).unwrap();
        assert_eq!(wire.to_decimal().unwrap(), "-19.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_from_rust_decimal() {
        let value: Decimal = "-1.2500".parse().unwrap();
        assert_eq!(DecimalText::from(value).to_string(), "-1.25");

        let value: Decimal = "0.005".parse().unwrap();
        assert_eq!(DecimalText::from(value).to_string(), "0.005");
    }

    #[test]
    fn test_from_json_number_keeps_digits() {
        let number: Number = serde_json::from_str("0.1000000000000000055511151231257827").unwrap();
        let value = DecimalText::from_number(&number).unwrap();
        assert_eq!(value.to_string(), "0.1000000000000000055511151231257827");
    }
}

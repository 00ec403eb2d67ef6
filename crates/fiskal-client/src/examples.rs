//! # Example Loading
//!
//! Turns already-read example files into ready-to-sign requests.
//!
//! ```text
//!  (name, bytes) ─┬─► transform ── ok ──► Example { name, request, report }
//!                 │
//!                 └─────────────── err ─► ExampleFailure (logged, skipped)
//! ```
//!
//! One broken example never stops the others from loading. Finding and
//! reading the files is the caller's job.

use serde::Serialize;
use tracing::{info, warn};

use fiskal_core::{transform_with_report, CashboxId, ReceiptRequest, TransformOptions, TransformReport};

/// A transformed example.
#[derive(Debug, Clone)]
pub struct Example {
    /// Path relative to the example root, e.g. `pos-receipt/cash.json`.
    pub name: String,
    pub request: ReceiptRequest,
    pub report: TransformReport,
}

impl Example {
    /// Menu label: `<name> - (<receipt case in hex>)`.
    pub fn label(&self) -> String {
        format!("{} - ({})", self.name, self.request.receipt_case)
    }
}

/// An example that could not be transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of [`load_examples`].
#[derive(Debug, Clone, Default)]
pub struct LoadedExamples {
    /// Successfully transformed examples, sorted by name.
    pub examples: Vec<Example>,
    /// Skipped examples, in input order.
    pub failures: Vec<ExampleFailure>,
}

impl LoadedExamples {
    /// Total truncated decimals across all examples.
    pub fn precision_loss_count(&self) -> usize {
        self.examples.iter().map(|e| e.report.loss_count()).sum()
    }
}

/// Transforms every `(name, bytes)` source independently.
pub fn load_examples<I, N, B>(
    sources: I,
    cashbox_id: &CashboxId,
    options: TransformOptions,
) -> LoadedExamples
where
    I: IntoIterator<Item = (N, B)>,
    N: Into<String>,
    B: AsRef<[u8]>,
{
    let mut loaded = LoadedExamples::default();

    for (name, bytes) in sources {
        let name = name.into();
        match transform_with_report(bytes.as_ref(), cashbox_id, options) {
            Ok((request, report)) => loaded.examples.push(Example {
                name,
                request,
                report,
            }),
            Err(e) => {
                warn!(example = %name, error = %e, "Skipping example");
                loaded.failures.push(ExampleFailure {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    loaded.examples.sort_by(|a, b| a.name.cmp(&b.name));

    info!(
        loaded = loaded.examples.len(),
        skipped = loaded.failures.len(),
        truncated = loaded.precision_loss_count(),
        "Examples loaded"
    );

    loaded
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fiskal_core::PrecisionPolicy;

    const CASHBOX: &str = "737e2889-7d32-435d-a9e7-3de40e0fa156";

    const CASH_SALE: &str = r#"{
        "ftReceiptCase": 4919338167972134913,
        "cbReceiptAmount": 5.5,
        "cbChargeItems": [ { "Amount": 5.5, "ftChargeItemCase": 4919338167972134913 } ],
        "cbPayItems": [ { "Amount": 5.5, "ftPayItemCase": 4919338167972134913 } ]
    }"#;

    const LONG_AMOUNT: &str = r#"{
        "ftReceiptCase": 4919338167972134913,
        "cbReceiptAmount": 1234567890.1234567,
        "cbChargeItems": [],
        "cbPayItems": []
    }"#;

    fn cashbox() -> CashboxId {
        CashboxId::parse(CASHBOX).unwrap()
    }

    #[test]
    fn test_broken_example_is_skipped() {
        let loaded = load_examples(
            vec![
                ("z/cash.json", CASH_SALE),
                ("broken.json", "{ \"ftReceiptCase\": 1 }"),
                ("a/cash.json", CASH_SALE),
            ],
            &cashbox(),
            TransformOptions::default(),
        );

        let names: Vec<_> = loaded.examples.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a/cash.json", "z/cash.json"]);

        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].name, "broken.json");
        assert!(loaded.failures[0].reason.contains("cbChargeItems"));
    }

    #[test]
    fn test_label_shows_hex_case() {
        let loaded = load_examples(
            [("pos-receipt/cash.json", CASH_SALE)],
            &cashbox(),
            TransformOptions::default(),
        );
        assert_eq!(
            loaded.examples[0].label(),
            "pos-receipt/cash.json - (0x4445000000000001)"
        );
    }

    #[test]
    fn test_precision_losses_counted() {
        let loaded = load_examples(
            [("long.json", LONG_AMOUNT), ("cash.json", CASH_SALE)],
            &cashbox(),
            TransformOptions::default(),
        );
        assert_eq!(loaded.examples.len(), 2);
        assert_eq!(loaded.precision_loss_count(), 1);
    }

    #[test]
    fn test_reject_policy_skips_long_amounts() {
        let loaded = load_examples(
            [("long.json", LONG_AMOUNT)],
            &cashbox(),
            TransformOptions {
                precision: PrecisionPolicy::Reject,
            },
        );
        assert!(loaded.examples.is_empty());
        assert_eq!(loaded.failures[0].name, "long.json");
    }
}

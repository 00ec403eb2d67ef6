//! # POS Service Seam
//!
//! The remote signing service, seen from the client. This crate ships no
//! transport: callers implement [`PosService`] over whatever RPC stack
//! they use and hand it to [`crate::session::PosSession`].
//!
//! ## Calls
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Echo     EchoRequest { Message }   ──►  EchoResponse { Message }       │
//! │  Sign     ReceiptRequest            ──►  SignResponse                   │
//! │  Journal  JournalRequest            ──►  stream of JournalChunk         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names on the message types are the wire names.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fiskal_core::ReceiptRequest;

use crate::error::ClientResult;

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoRequest {
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Journal query; `from`/`to` of 0 mean "everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRequest {
    #[serde(rename = "ftJournalType")]
    pub journal_type: i64,

    #[serde(rename = "From", default)]
    pub from: i64,

    #[serde(rename = "To", default)]
    pub to: i64,
}

/// One piece of a streamed journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalChunk {
    #[serde(rename = "Chunk")]
    pub chunk: Vec<u8>,
}

/// Result of a Sign call.
///
/// Only the fields the client looks at are typed; signatures, state data and
/// everything else stay as JSON for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignResponse {
    #[serde(rename = "ftCashBoxID", default)]
    pub cashbox_id: String,

    #[serde(rename = "ftQueueID", default)]
    pub queue_id: String,

    #[serde(rename = "ftReceiptIdentification", default)]
    pub receipt_identification: String,

    #[serde(rename = "ftState", default)]
    pub state: i64,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Stream of journal chunks, in service order.
pub type JournalStream = BoxStream<'static, ClientResult<JournalChunk>>;

// =============================================================================
// Service Trait
// =============================================================================

/// Remote receipt-signing service.
///
/// Implementations map their transport failures to
/// [`crate::error::ClientError::Service`].
#[async_trait]
pub trait PosService: Send + Sync {
    /// Round trip check.
    async fn echo(&self, request: EchoRequest) -> ClientResult<EchoResponse>;

    /// Signs one receipt request.
    async fn sign(&self, request: &ReceiptRequest) -> ClientResult<SignResponse>;

    /// Streams a journal.
    async fn journal(&self, request: JournalRequest) -> ClientResult<JournalStream>;
}

// =============================================================================
// Tests
// =============================================================================

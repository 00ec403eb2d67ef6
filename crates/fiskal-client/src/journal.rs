//! # Journals
//!
//! The four journals a cashbox exposes, and reassembly of the streamed
//! byte chunks into one JSON document.
//!
//! ```text
//!  Journal(type) ──► [chunk 0][chunk 1] ... [chunk n] ──► concat ──► JSON
//! ```
//!
//! Chunk boundaries are arbitrary; a chunk may end mid-character.

use std::fmt;

use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::service::{JournalChunk, JournalRequest};

/// Journals offered by the signing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalType {
    /// `0x0` Version information.
    Version,
    /// `0x1` ActionJournal in internal format.
    Action,
    /// `0x2` ReceiptJournal in internal format.
    Receipt,
    /// `0x3` QueueItemJournal in internal format.
    QueueItem,
}

impl JournalType {
    /// All journals, in menu order.
    pub const ALL: [JournalType; 4] = [
        JournalType::Version,
        JournalType::Action,
        JournalType::Receipt,
        JournalType::QueueItem,
    ];

    /// `ftJournalType` value.
    pub const fn code(&self) -> i64 {
        match self {
            JournalType::Version => 0x0,
            JournalType::Action => 0x1,
            JournalType::Receipt => 0x2,
            JournalType::QueueItem => 0x3,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            JournalType::Version => "Version information",
            JournalType::Action => "ActionJournal in internal format",
            JournalType::Receipt => "ReceiptJournal in internal format",
            JournalType::QueueItem => "QueueItemJournal in internal format",
        }
    }

    /// Looks a journal up by its `ftJournalType` value.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|journal| journal.code() == code)
    }

    /// Request for the whole journal.
    pub fn request(&self) -> JournalRequest {
        JournalRequest {
            journal_type: self.code(),
            from: 0,
            to: 0,
        }
    }
}

/// Menu form: `Journal 0x0000000000000002 ReceiptJournal in internal format`.
impl fmt::Display for JournalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Journal {:#018x} {}", self.code(), self.description())
    }
}

/// Concatenates chunks in order and parses the result as JSON.
///
/// Numbers keep their exact literal text.
pub fn assemble_journal<I>(chunks: I) -> ClientResult<Value>
where
    I: IntoIterator<Item = JournalChunk>,
{
    let bytes: Vec<u8> = chunks.into_iter().flat_map(|c| c.chunk).collect();
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidJournal(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunks(parts: &[&[u8]]) -> Vec<JournalChunk> {
        parts
            .iter()
            .map(|p| JournalChunk { chunk: p.to_vec() })
            .collect()
    }

    #[test]
    fn test_menu_labels() {
        assert_eq!(
            JournalType::Version.to_string(),
            "Journal 0x0000000000000000 Version information"
        );
        assert_eq!(
            JournalType::QueueItem.to_string(),
            "Journal 0x0000000000000003 QueueItemJournal in internal format"
        );
    }

    #[test]
    fn test_codes() {
        for journal in JournalType::ALL {
            assert_eq!(JournalType::from_code(journal.code()), Some(journal));
        }
        assert_eq!(JournalType::from_code(4), None);
        assert_eq!(JournalType::Receipt.request().journal_type, 2);
    }

    #[test]
    fn test_assemble_across_chunk_boundaries() {
        // "ü" is split between two chunks
        let value = assemble_journal(chunks(&[
            b"{\"name\":\"Gr\xC3",
            b"\xBC\xC3\x9Fe\",\"ftQueueRow\":",
            b"6000000000000000001}",
        ]))
        .unwrap();

        assert_eq!(value["name"], json!("Grüße"));
        assert_eq!(value["ftQueueRow"].to_string(), "6000000000000000001");
    }

    #[test]
    fn test_assemble_rejects_garbage() {
        assert!(matches!(
            assemble_journal(chunks(&[b"{\"open\":"])),
            Err(ClientError::InvalidJournal(_))
        ));
        assert!(assemble_journal(Vec::new()).is_err());
    }
}

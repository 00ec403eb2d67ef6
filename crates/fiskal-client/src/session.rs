//! # POS Session
//!
//! An explicitly constructed handle bundling a [`PosService`] with the
//! loaded examples. There is no process-wide client; whoever builds the
//! service passes it in here.
//!
//! ## Menu Numbering
//! ```text
//!  <1> .. <n>        examples (sign)
//!  <n+1> .. <n+4>    journals 0x0 .. 0x3
//!  exit              leave
//! ```

use futures::TryStreamExt;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};
use crate::examples::{Example, LoadedExamples};
use crate::journal::{assemble_journal, JournalType};
use crate::service::{EchoRequest, JournalChunk, PosService, SignResponse};

/// Message sent by [`PosSession::echo`] when none is given.
pub const DEFAULT_ECHO_MESSAGE: &str = "Hello World!";

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Sign the example at this 1-based index.
    Sign(usize),
    /// Read a journal.
    Journal(JournalType),
    Exit,
}

pub struct PosSession<S> {
    service: S,
    examples: Vec<Example>,
}

impl<S: PosService> PosSession<S> {
    pub fn new(service: S, loaded: LoadedExamples) -> Self {
        PosSession {
            service,
            examples: loaded.examples,
        }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Sends `message` and checks it comes back unchanged.
    pub async fn echo(&self, message: &str) -> ClientResult<String> {
        let response = self
            .service
            .echo(EchoRequest {
                message: message.to_string(),
            })
            .await?;

        if response.message != message {
            return Err(ClientError::EchoMismatch {
                sent: message.to_string(),
                received: response.message,
            });
        }

        info!(message = %response.message, "Echo response");
        Ok(response.message)
    }

    /// Signs the example at `index` (1-based, as shown in the menu).
    pub async fn sign_example(&self, index: usize) -> ClientResult<SignResponse> {
        let example = index
            .checked_sub(1)
            .and_then(|i| self.examples.get(i))
            .ok_or(ClientError::UnknownExample {
                index,
                available: self.examples.len(),
            })?;

        debug!(example = %example.name, "Signing example");
        let response = self.service.sign(&example.request).await?;

        info!(
            example = %example.name,
            receipt = %response.receipt_identification,
            state = response.state,
            "Receipt signed"
        );
        Ok(response)
    }

    /// Reads a whole journal and parses it.
    pub async fn read_journal(&self, journal: JournalType) -> ClientResult<Value> {
        let chunks: Vec<JournalChunk> = self
            .service
            .journal(journal.request())
            .await?
            .try_collect()
            .await?;

        debug!(journal = journal.code(), chunks = chunks.len(), "Journal received");
        assemble_journal(chunks)
    }

    /// Menu lines in display order, numbered from 1.
    pub fn menu_entries(&self) -> Vec<String> {
        self.examples
            .iter()
            .map(Example::label)
            .chain(JournalType::ALL.iter().map(JournalType::to_string))
            .collect()
    }

    /// Parses menu input into a choice.
    pub fn select(&self, input: &str) -> ClientResult<MenuChoice> {
        let input = input.trim();
        if input == "exit" {
            return Ok(MenuChoice::Exit);
        }

        let invalid = || ClientError::InvalidChoice(input.to_string());
        let number: usize = input.parse().map_err(|_| invalid())?;
        let count = self.examples.len();

        match number {
            0 => Err(invalid()),
            n if n <= count => Ok(MenuChoice::Sign(n)),
            n => i64::try_from(n - count - 1)
                .ok()
                .and_then(JournalType::from_code)
                .map(MenuChoice::Journal)
                .ok_or_else(invalid),
        }
    }

    /// Runs a parsed choice. `Exit` yields `None`.
    pub async fn run(&self, choice: MenuChoice) -> ClientResult<Option<Value>> {
        match choice {
            MenuChoice::Sign(index) => {
                let response = self.sign_example(index).await?;
                serde_json::to_value(response)
                    .map(Some)
                    .map_err(|e| ClientError::service("Sign", e.to_string()))
            }
            MenuChoice::Journal(journal) => self.read_journal(journal).await.map(Some),
            MenuChoice::Exit => Ok(None),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! # fiskal-client: Example Client for a Receipt-Signing Service
//!
//! This crate drives a receipt-signing service with prepared example
//! receipts. It loads configuration, turns example documents into wire
//! requests through `fiskal-core`, and runs echo, sign and journal calls
//! over a caller-supplied [`PosService`].
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  pos-client.toml ─┐                                                     │
//! │  FISKAL_* env ────┴─► ClientConfig ──► CashboxId, TransformOptions      │
//! │                                              │                          │
//! │  example bytes ─────────────────────────────►│                          │
//! │                                              ▼                          │
//! │                                        load_examples                    │
//! │                                              │                          │
//! │                                              ▼                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        PosSession<S>                             │  │
//! │  │                                                                  │  │
//! │  │   echo ──────────► S::echo                                       │  │
//! │  │   sign_example ──► S::sign                                       │  │
//! │  │   read_journal ──► S::journal ──► chunks ──► assemble_journal    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML configuration with env overrides
//! - [`error`] - Client error types
//! - [`examples`] - Example loading
//! - [`journal`] - Journal types and chunk reassembly
//! - [`service`] - RPC messages and the [`PosService`] trait
//! - [`session`] - Menu and calls over one service handle

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod examples;
pub mod journal;
pub mod service;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use examples::{load_examples, Example, ExampleFailure, LoadedExamples};
pub use journal::{assemble_journal, JournalType};
pub use service::{
    EchoRequest, EchoResponse, JournalChunk, JournalRequest, JournalStream, PosService,
    SignResponse,
};
pub use session::{MenuChoice, PosSession, DEFAULT_ECHO_MESSAGE};

//! # checkout-core
//!
//! Domain types and control flow for the card checkout demo.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Confirmation round-trip                   │
//! │  ┌──────────────┐   ConfirmationRequest   ┌───────────────┐  │
//! │  │ Confirmation │ ──────────────────────▶ │ Orchestrator  │  │
//! │  │ Flow (client)│ ◀────────────────────── │ (server)      │  │
//! │  └──────────────┘   ConfirmationResponse  └───────┬───────┘  │
//! │         │ loops while action required             │          │
//! │         ▼                                         ▼          │
//! │   card challenge                          classify(intent)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate is deliberately I/O-free: the classifier is a pure function
//! over an [`IntentSnapshot`], and the client confirmation loop is an
//! event-driven state machine ([`ConfirmationFlow`]) whose commands are
//! executed by whichever frontend drives it. The server and WASM crates
//! both depend on it, so it stays free of native-only dependencies.

pub mod classify;
pub mod error;
pub mod flow;
pub mod intent;
pub mod wire;

pub use classify::{classify, IntentDisposition};
pub use error::{CheckoutError, Result};
pub use flow::{ConfirmationFlow, FlowCommand, FlowEvent, FlowState, Terminal};
pub use intent::{IntentSnapshot, IntentStatus, NextActionKind};
pub use wire::{ConfirmationKind, ConfirmationRequest, ConfirmationResponse};

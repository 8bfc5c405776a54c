//! # checkout-payments
//!
//! Payment processor integration and confirmation orchestration.
//!
//! ## Confirmation round-trip
//!
//! ```text
//! ┌─────────────┐  {payment_method_id}  ┌───────────────────────────┐
//! │   Browser   │ ────────────────────▶ │ ConfirmationOrchestrator  │
//! │             │                       │   │ one processor call    │
//! │  challenge  │ ◀──────────────────── │   ▼                       │
//! │  (3-D S)    │  {requires_action,    │ classify(IntentSnapshot)  │
//! │             │   client_secret}      └───────────────────────────┘
//! │             │  {payment_intent_id}              │
//! │             │ ────────────────────▶  confirm… loop until
//! └─────────────┘                        {success} or {error}
//! ```
//!
//! The orchestrator drives exactly one processor call per request and
//! never leaks a raw processor fault: anything that goes wrong past
//! request validation is folded into the `{error}` wire shape.
//!
//! ## Processor seam
//!
//! [`ProcessorClient`] abstracts the payments provider. [`StripeProcessor`]
//! is the real implementation; [`MockProcessor`] is a scripted in-memory
//! stand-in used by tests and by the server's keyless demo mode.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use checkout_payments::{
//!     ChargeSettings, ConfirmationOrchestrator, CustomerProfile,
//!     MemoryCustomerLedger, StripeProcessor,
//! };
//!
//! let orchestrator = ConfirmationOrchestrator::new(
//!     Arc::new(StripeProcessor::from_env()?),
//!     Arc::new(MemoryCustomerLedger::new()),
//!     ChargeSettings::default(),
//!     CustomerProfile::demo(),
//! );
//!
//! let response = orchestrator.confirm(&request).await?;
//! ```

mod catalog;
mod customer;
mod error;
mod mock;
mod orchestrator;
mod processor;

pub use catalog::{CatalogProduct, DemoCatalog, OrderItem, ProductCatalog, StripeCatalog};
pub use customer::{CustomerLedger, CustomerProfile, MemoryCustomerLedger};
pub use error::{PaymentError, Result};
pub use mock::MockProcessor;
pub use orchestrator::{ChargeSettings, ConfirmationOrchestrator};
pub use processor::{parse_currency, IntentParams, ProcessorClient, StripeProcessor};

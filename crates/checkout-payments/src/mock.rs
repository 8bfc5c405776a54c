//! Mock Processor Client
//!
//! For testing and the keyless demo mode. Behavior is scripted by token
//! prefix so the full confirmation loop can be exercised without a
//! Stripe account:
//!
//! - `tok_err…` — the processor call fails
//! - `tok_3ds…` — the intent requires an in-browser challenge first
//! - anything else — the payment settles immediately

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use checkout_core::{IntentSnapshot, IntentStatus, NextActionKind};

use crate::customer::CustomerProfile;
use crate::error::{PaymentError, Result};
use crate::processor::{IntentParams, ProcessorClient};

/// Scripted in-memory processor
pub struct MockProcessor {
    intents: RwLock<HashMap<String, IntentSnapshot>>,
    customers: RwLock<Vec<String>>,
    counter: AtomicU64,
    calls: AtomicU64,
    fail_customers: AtomicBool,
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessor {
    pub fn new() -> Self {
        Self {
            intents: RwLock::new(HashMap::new()),
            customers: RwLock::new(Vec::new()),
            counter: AtomicU64::new(0),
            calls: AtomicU64::new(0),
            fail_customers: AtomicBool::new(false),
        }
    }

    /// Make `create_customer` fail (for fulfillment-retry testing)
    pub fn with_failing_customers() -> Self {
        let mock = Self::new();
        mock.fail_customers.store(true, Ordering::SeqCst);
        mock
    }

    /// Stop failing customer creation
    pub fn heal_customers(&self) {
        self.fail_customers.store(false, Ordering::SeqCst);
    }

    /// Number of customer records created so far
    pub fn customers_created(&self) -> usize {
        self.customers.read().unwrap().len()
    }

    /// Total intent create + confirm calls observed
    pub fn intent_calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl ProcessorClient for MockProcessor {
    async fn create_intent(&self, params: IntentParams) -> Result<IntentSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if params.payment_method_id.starts_with("tok_err") {
            return Err(PaymentError::Processor("Your card was declined.".into()));
        }

        let n = self.next_id();
        let id = format!("pi_{}", n);
        let needs_challenge = params.payment_method_id.starts_with("tok_3ds");

        let intent = IntentSnapshot {
            id: id.clone(),
            status: if needs_challenge {
                IntentStatus::RequiresAction
            } else {
                IntentStatus::Succeeded
            },
            client_secret: Some(format!("{}_secret", id)),
            payment_method: Some(params.payment_method_id),
            next_action: needs_challenge.then_some(NextActionKind::UseSdk),
        };

        self.intents.write().unwrap().insert(id, intent.clone());
        Ok(intent)
    }

    async fn confirm_intent(&self, intent_id: &str) -> Result<IntentSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut intents = self.intents.write().unwrap();
        let intent = intents
            .get_mut(intent_id)
            .ok_or_else(|| PaymentError::Processor(format!("No such payment_intent: {}", intent_id)))?;

        // A confirm after the challenge settles the intent; confirming an
        // already-terminal intent is a no-op, as with the real processor.
        if intent.requires_sdk_action() {
            intent.status = IntentStatus::Succeeded;
            intent.next_action = None;
        }

        Ok(intent.clone())
    }

    async fn create_customer(
        &self,
        _profile: &CustomerProfile,
        payment_method: Option<&str>,
    ) -> Result<String> {
        if self.fail_customers.load(Ordering::SeqCst) {
            return Err(PaymentError::Processor("customer service unavailable".into()));
        }

        let mut customers = self.customers.write().unwrap();
        customers.push(payment_method.unwrap_or("none").to_string());
        Ok(format!("cus_{}", customers.len()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

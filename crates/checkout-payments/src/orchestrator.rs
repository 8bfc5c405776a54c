//! Confirmation Orchestrator
//!
//! Server-side half of the confirmation round-trip: one processor call
//! per request, classification of the resulting intent, and at-most-once
//! customer fulfillment on terminal success.

use std::sync::Arc;

use checkout_core::{
    classify, ConfirmationKind, ConfirmationRequest, ConfirmationResponse, IntentDisposition,
    IntentSnapshot,
};

use crate::customer::{CustomerLedger, CustomerProfile};
use crate::error::Result;
use crate::processor::{IntentParams, ProcessorClient};

/// Fixed demo charge applied to every submission
#[derive(Clone, Debug)]
pub struct ChargeSettings {
    /// Amount in minor currency units
    pub amount: i64,

    /// Lowercase ISO currency code
    pub currency: String,
}

impl Default for ChargeSettings {
    fn default() -> Self {
        Self {
            amount: 200,
            currency: "myr".into(),
        }
    }
}

/// Drives a confirmation request to a wire response
pub struct ConfirmationOrchestrator {
    processor: Arc<dyn ProcessorClient>,
    ledger: Arc<dyn CustomerLedger>,
    charge: ChargeSettings,
    profile: CustomerProfile,
}

impl ConfirmationOrchestrator {
    pub fn new(
        processor: Arc<dyn ProcessorClient>,
        ledger: Arc<dyn CustomerLedger>,
        charge: ChargeSettings,
        profile: CustomerProfile,
    ) -> Self {
        Self {
            processor,
            ledger,
            charge,
            profile,
        }
    }

    /// Processor backing this orchestrator
    pub fn processor_name(&self) -> &str {
        self.processor.name()
    }

    /// Handle one confirmation request.
    ///
    /// Only request validation surfaces as `Err` (the HTTP layer rejects
    /// those). Processor faults and unclassifiable intents are folded
    /// into the `{error}` wire shape so the client never sees a raw
    /// fault.
    pub async fn confirm(&self, request: &ConfirmationRequest) -> Result<ConfirmationResponse> {
        let kind = request.kind()?;

        let intent = match self.drive(kind).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(error = %e, retryable = e.is_retryable(), "processor call failed");
                return Ok(ConfirmationResponse::error(e.user_message()));
            }
        };

        match classify(&intent) {
            IntentDisposition::RequiresAction { client_secret } => {
                tracing::info!(intent = %intent.id, "client action required");
                Ok(ConfirmationResponse::requires_action(client_secret))
            }
            IntentDisposition::Succeeded => {
                tracing::info!(intent = %intent.id, "payment succeeded");
                self.fulfill(&intent).await;
                Ok(ConfirmationResponse::success())
            }
            IntentDisposition::Invalid => {
                tracing::warn!(
                    intent = %intent.id,
                    status = ?intent.status,
                    "intent not classifiable"
                );
                Ok(ConfirmationResponse::error("Invalid PaymentIntent status"))
            }
        }
    }

    /// Exactly one processor call per request
    async fn drive(&self, kind: ConfirmationKind<'_>) -> Result<IntentSnapshot> {
        match kind {
            ConfirmationKind::NewPaymentMethod(payment_method_id) => {
                self.processor
                    .create_intent(IntentParams {
                        payment_method_id: payment_method_id.to_string(),
                        amount: self.charge.amount,
                        currency: self.charge.currency.clone(),
                        retain_payment_method: true,
                    })
                    .await
            }
            ConfirmationKind::ExistingIntent(intent_id) => {
                self.processor.confirm_intent(intent_id).await
            }
        }
    }

    /// Create the customer record at most once per succeeded intent.
    ///
    /// Fulfillment failures never turn a captured payment into an error
    /// response; the claim is released so a later confirm can retry.
    async fn fulfill(&self, intent: &IntentSnapshot) {
        match self.ledger.claim(&intent.id) {
            Ok(true) => {
                let created = self
                    .processor
                    .create_customer(&self.profile, intent.payment_method.as_deref())
                    .await;

                match created {
                    Ok(customer_id) => {
                        tracing::info!(
                            intent = %intent.id,
                            customer = %customer_id,
                            "customer created"
                        );
                        // Card details would be persisted here for later
                        // off-session use.
                    }
                    Err(e) => {
                        tracing::error!(intent = %intent.id, error = %e, "customer creation failed");
                        if let Err(e) = self.ledger.release(&intent.id) {
                            tracing::error!(intent = %intent.id, error = %e, "ledger release failed");
                        }
                    }
                }
            }
            Ok(false) => {
                tracing::debug!(intent = %intent.id, "intent already fulfilled");
            }
            Err(e) => {
                tracing::error!(intent = %intent.id, error = %e, "fulfillment ledger unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::MemoryCustomerLedger;
    use crate::error::PaymentError;
    use crate::mock::MockProcessor;

    fn orchestrator_with(mock: Arc<MockProcessor>) -> ConfirmationOrchestrator {
        ConfirmationOrchestrator::new(
            mock,
            Arc::new(MemoryCustomerLedger::new()),
            ChargeSettings::default(),
            CustomerProfile::demo(),
        )
    }

    #[tokio::test]
    async fn test_plain_token_succeeds() {
        let mock = Arc::new(MockProcessor::new());
        let orchestrator = orchestrator_with(mock.clone());

        let response = orchestrator
            .confirm(&ConfirmationRequest::with_payment_method("tok_ok"))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(mock.intent_calls(), 1);
        assert_eq!(mock.customers_created(), 1);
    }

    #[tokio::test]
    async fn test_3ds_token_round_trips() {
        let mock = Arc::new(MockProcessor::new());
        let orchestrator = orchestrator_with(mock.clone());

        let response = orchestrator
            .confirm(&ConfirmationRequest::with_payment_method("tok_3ds"))
            .await
            .unwrap();

        assert_eq!(
            response,
            ConfirmationResponse::requires_action("pi_1_secret")
        );
        // No customer until the payment is terminal
        assert_eq!(mock.customers_created(), 0);

        // The client completed the challenge and re-posts the intent id
        let response = orchestrator
            .confirm(&ConfirmationRequest::with_intent("pi_1"))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(mock.intent_calls(), 2);
        assert_eq!(mock.customers_created(), 1);
    }

    #[tokio::test]
    async fn test_repeat_confirm_does_not_duplicate_customer() {
        let mock = Arc::new(MockProcessor::new());
        let orchestrator = orchestrator_with(mock.clone());

        orchestrator
            .confirm(&ConfirmationRequest::with_payment_method("tok_3ds"))
            .await
            .unwrap();

        for _ in 0..3 {
            let response = orchestrator
                .confirm(&ConfirmationRequest::with_intent("pi_1"))
                .await
                .unwrap();
            assert!(response.is_success());
        }

        assert_eq!(mock.customers_created(), 1);
    }

    #[tokio::test]
    async fn test_processor_fault_becomes_error_shape() {
        let mock = Arc::new(MockProcessor::new());
        let orchestrator = orchestrator_with(mock.clone());

        let response = orchestrator
            .confirm(&ConfirmationRequest::with_payment_method("tok_err"))
            .await
            .unwrap();

        assert_eq!(
            response,
            ConfirmationResponse::error("Your card was declined.")
        );
        assert_eq!(mock.customers_created(), 0);
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let orchestrator = orchestrator_with(Arc::new(MockProcessor::new()));

        let result = orchestrator.confirm(&ConfirmationRequest::default()).await;
        assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_fulfillment_failure_keeps_payment_successful() {
        let mock = Arc::new(MockProcessor::with_failing_customers());
        let orchestrator = orchestrator_with(mock.clone());

        let response = orchestrator
            .confirm(&ConfirmationRequest::with_payment_method("tok_ok"))
            .await
            .unwrap();

        // The payment settled even though fulfillment did not
        assert!(response.is_success());
        assert_eq!(mock.customers_created(), 0);

        // Once the processor recovers, a retried confirm fulfills
        mock.heal_customers();
        let response = orchestrator
            .confirm(&ConfirmationRequest::with_intent("pi_1"))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(mock.customers_created(), 1);
    }
}

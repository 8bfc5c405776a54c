//! Payment Processor Client
//!
//! The seam between the orchestrator and the payments provider.

use async_trait::async_trait;
use stripe::{
    Client, CreateCustomer, CreatePaymentIntent, Currency, Customer, PaymentIntent,
    PaymentIntentConfirmParams, PaymentIntentConfirmationMethod, PaymentIntentId,
    PaymentIntentSetupFutureUsage, PaymentIntentStatus, PaymentMethodId,
};

use checkout_core::{IntentSnapshot, IntentStatus, NextActionKind};

use crate::customer::CustomerProfile;
use crate::error::{PaymentError, Result};

/// Parameters for creating and confirming a new intent from a token
#[derive(Clone, Debug)]
pub struct IntentParams {
    /// Single-use payment method token from the browser
    pub payment_method_id: String,

    /// Charge amount in minor currency units
    pub amount: i64,

    /// Lowercase ISO currency code
    pub currency: String,

    /// Keep the payment method for off-session reuse
    pub retain_payment_method: bool,
}

/// Payment processor client trait (Strategy pattern)
///
/// One implementation per provider; the mock counts as a provider.
#[async_trait]
pub trait ProcessorClient: Send + Sync {
    /// Create a new intent from a payment method token and confirm it
    /// in one call (manual confirmation mode)
    async fn create_intent(&self, params: IntentParams) -> Result<IntentSnapshot>;

    /// Confirm an existing intent, no new parameters.
    ///
    /// Safe to repeat on an already-terminal intent per processor
    /// semantics.
    async fn confirm_intent(&self, intent_id: &str) -> Result<IntentSnapshot>;

    /// Create a customer record, optionally attaching a payment method
    async fn create_customer(
        &self,
        profile: &CustomerProfile,
        payment_method: Option<&str>,
    ) -> Result<String>;

    /// Processor name
    fn name(&self) -> &str;
}

/// Stripe-backed processor client
pub struct StripeProcessor {
    client: Client,
}

impl StripeProcessor {
    /// Create a new Stripe processor client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from the `STRIPE_SECRET_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }
}

#[async_trait]
impl ProcessorClient for StripeProcessor {
    async fn create_intent(&self, params: IntentParams) -> Result<IntentSnapshot> {
        let payment_method: PaymentMethodId = params.payment_method_id.parse().map_err(|_| {
            PaymentError::InvalidRequest(format!(
                "malformed payment method id: {}",
                params.payment_method_id
            ))
        })?;

        let mut create = CreatePaymentIntent::new(params.amount, parse_currency(&params.currency)?);
        create.payment_method = Some(payment_method);
        create.confirm = Some(true);
        create.confirmation_method = Some(PaymentIntentConfirmationMethod::Manual);
        if params.retain_payment_method {
            create.setup_future_usage = Some(PaymentIntentSetupFutureUsage::OffSession);
        }

        let intent = PaymentIntent::create(&self.client, create)
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        Ok(snapshot_from(intent))
    }

    async fn confirm_intent(&self, intent_id: &str) -> Result<IntentSnapshot> {
        let id: PaymentIntentId = intent_id.parse().map_err(|_| {
            PaymentError::InvalidRequest(format!("malformed payment intent id: {}", intent_id))
        })?;

        let intent = PaymentIntent::confirm(&self.client, &id, PaymentIntentConfirmParams::default())
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        Ok(snapshot_from(intent))
    }

    async fn create_customer(
        &self,
        profile: &CustomerProfile,
        payment_method: Option<&str>,
    ) -> Result<String> {
        let mut create = CreateCustomer::new();
        create.name = Some(&profile.name);
        create.email = Some(&profile.email);
        create.phone = Some(&profile.phone);
        if !profile.metadata.is_empty() {
            create.metadata = Some(profile.metadata.clone());
        }
        if let Some(pm) = payment_method {
            let id: PaymentMethodId = pm.parse().map_err(|_| {
                PaymentError::InvalidRequest(format!("malformed payment method id: {}", pm))
            })?;
            create.payment_method = Some(id);
        }

        let customer = Customer::create(&self.client, create)
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        Ok(customer.id.to_string())
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

/// Map an ISO code to the Stripe currency enum.
///
/// Unknown codes are a configuration error: a fallback would charge in
/// the wrong currency. The server validates this at startup so a
/// misconfigured store refuses to boot instead of failing per payment.
pub fn parse_currency(code: &str) -> Result<Currency> {
    match code.to_lowercase().as_str() {
        "usd" => Ok(Currency::USD),
        "eur" => Ok(Currency::EUR),
        "gbp" => Ok(Currency::GBP),
        "myr" => Ok(Currency::MYR),
        "sgd" => Ok(Currency::SGD),
        "aud" => Ok(Currency::AUD),
        "jpy" => Ok(Currency::JPY),
        other => Err(PaymentError::Config(format!(
            "unsupported currency: {}",
            other
        ))),
    }
}

fn snapshot_from(intent: PaymentIntent) -> IntentSnapshot {
    let next_action = intent.next_action.as_ref().map(|action| {
        match action.type_.as_str() {
            "use_stripe_sdk" => NextActionKind::UseSdk,
            "redirect_to_url" => NextActionKind::RedirectToUrl,
            other => NextActionKind::Other(other.to_string()),
        }
    });

    IntentSnapshot {
        id: intent.id.to_string(),
        status: status_from(intent.status),
        client_secret: intent.client_secret,
        payment_method: intent.payment_method.as_ref().map(|pm| pm.id().to_string()),
        next_action,
    }
}

fn status_from(status: PaymentIntentStatus) -> IntentStatus {
    match status {
        PaymentIntentStatus::RequiresPaymentMethod => IntentStatus::RequiresPaymentMethod,
        PaymentIntentStatus::RequiresConfirmation => IntentStatus::RequiresConfirmation,
        PaymentIntentStatus::RequiresAction => IntentStatus::RequiresAction,
        PaymentIntentStatus::RequiresCapture => IntentStatus::RequiresCapture,
        PaymentIntentStatus::Processing => IntentStatus::Processing,
        PaymentIntentStatus::Canceled => IntentStatus::Canceled,
        PaymentIntentStatus::Succeeded => IntentStatus::Succeeded,
    }
}

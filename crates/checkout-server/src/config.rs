//! Store Configuration

use serde::Serialize;

use checkout_payments::ChargeSettings;

/// Environment-backed configuration for the store and processor
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Publishable key handed to the browser
    pub publishable_key: String,

    /// Secret key; absent means keyless demo mode (mock processor)
    pub secret_key: Option<String>,

    /// Country of the processor account
    pub account_country: String,

    /// Country shown to payment-request clients
    pub country: String,

    /// Lowercase ISO currency code for the demo charge
    pub currency: String,

    /// Demo charge amount in minor currency units
    pub amount: i64,

    /// Payment method types the store accepts
    pub payment_methods: Vec<String>,

    /// Listen address
    pub bind_addr: String,
}

impl StoreConfig {
    /// Load from environment variables, with demo defaults
    pub fn from_env() -> Self {
        Self {
            publishable_key: std::env::var("STRIPE_PUBLISHABLE_KEY")
                .unwrap_or_else(|_| "pk_test_demo".into()),
            secret_key: std::env::var("STRIPE_SECRET_KEY").ok(),
            account_country: std::env::var("STRIPE_ACCOUNT_COUNTRY")
                .unwrap_or_else(|_| "MY".into()),
            country: std::env::var("CHECKOUT_COUNTRY").unwrap_or_else(|_| "MY".into()),
            currency: std::env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "myr".into()),
            amount: std::env::var("CHECKOUT_AMOUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            payment_methods: vec!["card".into()],
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
        }
    }

    /// Charge settings for the orchestrator
    pub fn charge(&self) -> ChargeSettings {
        ChargeSettings {
            amount: self.amount,
            currency: self.currency.clone(),
        }
    }
}

/// Shipping option advertised to payment-request clients
#[derive(Clone, Debug, Serialize)]
pub struct ShippingOption {
    pub id: String,
    pub label: String,
    pub detail: String,
    pub amount: i64,
}

/// The demo store's fixed shipping menu
pub fn shipping_options() -> Vec<ShippingOption> {
    vec![
        ShippingOption {
            id: "free".into(),
            label: "Free Shipping".into(),
            detail: "Delivery within 5 days".into(),
            amount: 0,
        },
        ShippingOption {
            id: "express".into(),
            label: "Express Shipping".into(),
            detail: "Next day delivery".into(),
            amount: 500,
        },
    ]
}

/// Payload of `GET /config`.
///
/// Key names match what the browser script expects.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub stripe_publishable_key: String,
    pub stripe_country: String,
    pub country: String,
    pub currency: String,
    pub payment_methods: Vec<String>,
    pub shipping_options: Vec<ShippingOption>,
}

impl From<&StoreConfig> for ConfigResponse {
    fn from(config: &StoreConfig) -> Self {
        Self {
            stripe_publishable_key: config.publishable_key.clone(),
            stripe_country: config.account_country.clone(),
            country: config.country.clone(),
            currency: config.currency.clone(),
            payment_methods: config.payment_methods.clone(),
            shipping_options: shipping_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_response_keys() {
        let config = StoreConfig {
            publishable_key: "pk_test_123".into(),
            secret_key: None,
            account_country: "MY".into(),
            country: "MY".into(),
            currency: "myr".into(),
            amount: 200,
            payment_methods: vec!["card".into()],
            bind_addr: "0.0.0.0:3000".into(),
        };

        let value = serde_json::to_value(ConfigResponse::from(&config)).unwrap();
        assert_eq!(value["stripePublishableKey"], "pk_test_123");
        assert_eq!(value["stripeCountry"], "MY");
        assert_eq!(value["currency"], "myr");
        assert!(value["paymentMethods"].is_array());
        assert!(value["shippingOptions"].is_array());
    }
}

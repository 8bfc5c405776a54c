//! Wire Contracts
//!
//! The request and response bodies exchanged on `POST /confirm_payment`.

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};

/// Body of a confirmation request.
///
/// Exactly one of the two identifiers must be present: a payment method
/// id on the first round, or the intent id on a follow-up round after a
/// completed authentication challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    /// Single-use token for card details collected in the browser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    /// Identifier of an intent that already went through a challenge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

impl ConfirmationRequest {
    /// First-round request carrying a fresh payment method token
    pub fn with_payment_method(id: impl Into<String>) -> Self {
        Self {
            payment_method_id: Some(id.into()),
            payment_intent_id: None,
        }
    }

    /// Follow-up request carrying an existing intent identifier
    pub fn with_intent(id: impl Into<String>) -> Self {
        Self {
            payment_method_id: None,
            payment_intent_id: Some(id.into()),
        }
    }

    /// Validate the mutual-exclusivity rule and classify the request.
    ///
    /// A body with neither or both identifiers is rejected rather than
    /// guessed at.
    pub fn kind(&self) -> Result<ConfirmationKind<'_>> {
        match (&self.payment_method_id, &self.payment_intent_id) {
            (Some(pm), None) => Ok(ConfirmationKind::NewPaymentMethod(pm)),
            (None, Some(pi)) => Ok(ConfirmationKind::ExistingIntent(pi)),
            (Some(_), Some(_)) => Err(CheckoutError::InvalidRequest(
                "both payment_method_id and payment_intent_id present".into(),
            )),
            (None, None) => Err(CheckoutError::InvalidRequest(
                "either payment_method_id or payment_intent_id is required".into(),
            )),
        }
    }
}

/// Which confirmation branch a valid request selects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationKind<'a> {
    /// Create and confirm a new intent from this payment method token
    NewPaymentMethod(&'a str),

    /// Confirm this existing intent, no new parameters
    ExistingIntent(&'a str),
}

/// Body of a confirmation response: one of three shapes.
///
/// Serializes to exactly `{"success":true}`,
/// `{"requires_action":true,"payment_intent_client_secret":"..."}`, or
/// `{"error":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfirmationResponse {
    /// The client must run an authentication challenge with this secret
    RequiresAction {
        requires_action: bool,
        payment_intent_client_secret: String,
    },

    /// The payment settled
    Success { success: bool },

    /// The payment did not settle; message is safe to display
    Error { error: String },
}

impl ConfirmationResponse {
    pub fn success() -> Self {
        Self::Success { success: true }
    }

    pub fn requires_action(client_secret: impl Into<String>) -> Self {
        Self::RequiresAction {
            requires_action: true,
            payment_intent_client_secret: client_secret.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_payment_method() {
        let request = ConfirmationRequest::with_payment_method("pm_123");
        assert_eq!(
            request.kind().unwrap(),
            ConfirmationKind::NewPaymentMethod("pm_123")
        );
    }

    #[test]
    fn test_request_kind_intent() {
        let request = ConfirmationRequest::with_intent("pi_123");
        assert_eq!(
            request.kind().unwrap(),
            ConfirmationKind::ExistingIntent("pi_123")
        );
    }

    #[test]
    fn test_empty_request_rejected() {
        let request = ConfirmationRequest::default();
        assert!(matches!(
            request.kind(),
            Err(CheckoutError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_ambiguous_request_rejected() {
        let request: ConfirmationRequest = serde_json::from_str(
            r#"{"payment_method_id":"pm_123","payment_intent_id":"pi_123"}"#,
        )
        .unwrap();
        assert!(matches!(
            request.kind(),
            Err(CheckoutError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(
            serde_json::to_string(&ConfirmationResponse::success()).unwrap(),
            r#"{"success":true}"#
        );
        assert_eq!(
            serde_json::to_string(&ConfirmationResponse::requires_action("secret_123")).unwrap(),
            r#"{"requires_action":true,"payment_intent_client_secret":"secret_123"}"#
        );
        assert_eq!(
            serde_json::to_string(&ConfirmationResponse::error("boom")).unwrap(),
            r#"{"error":"boom"}"#
        );
    }

    #[test]
    fn test_response_round_trip() {
        let parsed: ConfirmationResponse = serde_json::from_str(
            r#"{"requires_action":true,"payment_intent_client_secret":"secret_123"}"#,
        )
        .unwrap();
        assert_eq!(parsed, ConfirmationResponse::requires_action("secret_123"));

        let parsed: ConfirmationResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(parsed.is_success());
    }
}

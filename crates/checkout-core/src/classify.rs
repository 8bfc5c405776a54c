//! Intent Response Classifier
//!
//! Pure mapping from a processor intent snapshot to the outcome the
//! orchestrator reports to the client.

use crate::intent::{IntentSnapshot, IntentStatus};

/// Outcome of classifying an intent after a processor call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentDisposition {
    /// The browser must run an authentication challenge with this secret
    RequiresAction { client_secret: String },

    /// The payment settled; fulfillment may run
    Succeeded,

    /// Any other status; reported as "Invalid PaymentIntent status"
    Invalid,
}

/// Classify an intent snapshot into exactly one disposition.
///
/// The next-action check is deliberately permissive: an SDK challenge
/// request wins regardless of the status label, since processors have
/// reported the pending state under more than one status name. An SDK
/// action without a client secret cannot be challenged and is invalid.
pub fn classify(intent: &IntentSnapshot) -> IntentDisposition {
    if intent.requires_sdk_action() {
        return match &intent.client_secret {
            Some(secret) => IntentDisposition::RequiresAction {
                client_secret: secret.clone(),
            },
            None => IntentDisposition::Invalid,
        };
    }

    if intent.status == IntentStatus::Succeeded {
        IntentDisposition::Succeeded
    } else {
        IntentDisposition::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::NextActionKind;

    fn snapshot(status: IntentStatus, next_action: Option<NextActionKind>) -> IntentSnapshot {
        IntentSnapshot {
            id: "pi_123".into(),
            status,
            client_secret: Some("secret_123".into()),
            payment_method: Some("pm_123".into()),
            next_action,
        }
    }

    #[test]
    fn test_sdk_action_requires_action() {
        let intent = snapshot(IntentStatus::RequiresAction, Some(NextActionKind::UseSdk));
        assert_eq!(
            classify(&intent),
            IntentDisposition::RequiresAction {
                client_secret: "secret_123".into()
            }
        );
    }

    #[test]
    fn test_sdk_action_wins_over_status() {
        // Pending SDK action must be honored no matter how the status
        // field labels the intent.
        for status in [
            IntentStatus::RequiresAction,
            IntentStatus::RequiresConfirmation,
            IntentStatus::Processing,
            IntentStatus::Succeeded,
        ] {
            let intent = snapshot(status, Some(NextActionKind::UseSdk));
            assert!(matches!(
                classify(&intent),
                IntentDisposition::RequiresAction { .. }
            ));
        }
    }

    #[test]
    fn test_succeeded() {
        let intent = snapshot(IntentStatus::Succeeded, None);
        assert_eq!(classify(&intent), IntentDisposition::Succeeded);
    }

    #[test]
    fn test_other_statuses_invalid() {
        for status in [
            IntentStatus::RequiresPaymentMethod,
            IntentStatus::RequiresConfirmation,
            IntentStatus::RequiresCapture,
            IntentStatus::Processing,
            IntentStatus::Canceled,
        ] {
            let intent = snapshot(status, None);
            assert_eq!(classify(&intent), IntentDisposition::Invalid);
        }
    }

    #[test]
    fn test_redirect_action_invalid() {
        let intent = snapshot(
            IntentStatus::RequiresAction,
            Some(NextActionKind::RedirectToUrl),
        );
        assert_eq!(classify(&intent), IntentDisposition::Invalid);
    }

    #[test]
    fn test_sdk_action_without_secret_invalid() {
        let mut intent = snapshot(IntentStatus::RequiresAction, Some(NextActionKind::UseSdk));
        intent.client_secret = None;
        assert_eq!(classify(&intent), IntentDisposition::Invalid);
    }
}

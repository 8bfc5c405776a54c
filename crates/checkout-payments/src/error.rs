//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Payment processor call failed
    #[error("Processor error: {0}")]
    Processor(String),

    /// Malformed or ambiguous confirmation request
    #[error("Invalid confirmation request: {0}")]
    InvalidRequest(String),

    /// Product id not present in the catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fulfillment ledger error
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Processor(_) | PaymentError::Ledger(_))
    }

    /// Get the message to place in the `{error}` wire shape.
    ///
    /// Processor messages pass through; they are already written for
    /// cardholders ("Your card was declined.", etc.).
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::Processor(msg) => msg.clone(),
            PaymentError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            PaymentError::UnknownProduct(id) => format!("Unknown product: {}", id),
            PaymentError::Config(_) | PaymentError::Ledger(_) => {
                "Payment processing is unavailable. Please try again.".into()
            }
        }
    }
}

impl From<checkout_core::CheckoutError> for PaymentError {
    fn from(err: checkout_core::CheckoutError) -> Self {
        match err {
            checkout_core::CheckoutError::InvalidRequest(msg) => PaymentError::InvalidRequest(msg),
            other => PaymentError::Processor(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PaymentError::Processor("timeout".into()).is_retryable());
        assert!(PaymentError::Ledger("poisoned".into()).is_retryable());
        assert!(!PaymentError::InvalidRequest("bad body".into()).is_retryable());
        assert!(!PaymentError::Config("missing key".into()).is_retryable());
    }

    #[test]
    fn test_processor_message_passes_through() {
        let err = PaymentError::Processor("Your card was declined.".into());
        assert_eq!(err.user_message(), "Your card was declined.");
    }
}

//! Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout error types
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Malformed or ambiguous confirmation request
    #[error("Invalid confirmation request: {0}")]
    InvalidRequest(String),

    /// Client-side card authentication challenge failed or was abandoned
    #[error("Card authentication failed: {0}")]
    Challenge(String),

    /// Intent status not recognized as success or action-required
    #[error("Invalid PaymentIntent status")]
    InvalidIntentStatus,

    /// An event arrived in a state that cannot accept it
    #[error("Unexpected {event} event in {state} state")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },
}

impl CheckoutError {
    /// Convert to a message safe to render next to the card input
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            CheckoutError::Challenge(_) => {
                "Card authentication was not completed. Please try again.".into()
            }
            CheckoutError::InvalidIntentStatus => "Invalid PaymentIntent status".into(),
            CheckoutError::UnexpectedEvent { .. } => "An unexpected error occurred.".into(),
        }
    }
}

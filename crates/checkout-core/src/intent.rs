//! Payment Intent Snapshots
//!
//! Read-only view of a payment intent as reported by the processor after
//! a create or confirm call. The processor owns the record; this crate
//! only classifies what it sees.

/// Lifecycle status of a payment intent.
///
/// Mirrors the processor's status vocabulary. An intent only moves
/// forward through these states and never changes again once terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    RequiresCapture,
    Processing,
    Canceled,
    Succeeded,
}

impl IntentStatus {
    /// Whether no further transitions can occur
    pub fn is_terminal(self) -> bool {
        matches!(self, IntentStatus::Succeeded | IntentStatus::Canceled)
    }
}

/// Next step the processor wants performed before the payment can settle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextActionKind {
    /// In-browser authentication via the processor's JS SDK (3-D Secure)
    UseSdk,

    /// Redirect-based action; not part of the card flow
    RedirectToUrl,

    /// Action type this integration does not handle
    Other(String),
}

/// Snapshot of a payment intent returned by a processor call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentSnapshot {
    /// Provider-assigned opaque identifier
    pub id: String,

    /// Current lifecycle status
    pub status: IntentStatus,

    /// Opaque secret the browser needs to run an authentication challenge
    pub client_secret: Option<String>,

    /// Payment method attached to the intent
    pub payment_method: Option<String>,

    /// Pending client-side action, if any
    pub next_action: Option<NextActionKind>,
}

impl IntentSnapshot {
    /// Whether the pending action is an in-browser SDK challenge
    pub fn requires_sdk_action(&self) -> bool {
        matches!(self.next_action, Some(NextActionKind::UseSdk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(IntentStatus::Succeeded.is_terminal());
        assert!(IntentStatus::Canceled.is_terminal());
        assert!(!IntentStatus::RequiresAction.is_terminal());
        assert!(!IntentStatus::Processing.is_terminal());
    }
}

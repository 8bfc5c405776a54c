//! Client Confirmation Loop
//!
//! The browser-side half of the confirmation round-trip, expressed as an
//! explicit event-driven state machine instead of nested callbacks. The
//! machine owns no I/O: feeding it an event yields the single command the
//! driver must execute next (tokenize, post, run the challenge, finish).
//!
//! ```text
//! Idle ──Submit──▶ Submitting ──Tokenized──▶ AwaitingServerDecision
//!   ▲                  │                          │        ▲
//!   └──TokenizeFailed──┘        ServerReplied(requires_action)
//!                                                 ▼        │
//!                                        AwaitingChallenge ─┘
//!                                         ChallengeResolved
//! ```
//!
//! Terminal states are reached on a success reply, an error reply, a
//! failed challenge, or a timeout. The submit affordance is re-enabled on
//! every non-success exit so the user can retry, and a timeout never
//! assumes anything about the intent's server-side state.

use crate::error::{CheckoutError, Result};
use crate::wire::{ConfirmationRequest, ConfirmationResponse};

/// Final outcome of one submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    Success,
    Failure(String),
}

/// States of the confirmation loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for the user to submit the form
    Idle,

    /// Tokenizing card details in the browser
    Submitting,

    /// One round-trip to the server is in flight
    AwaitingServerDecision,

    /// The in-browser authentication challenge is running
    AwaitingChallenge,

    /// The submission finished
    Done(Terminal),
}

impl FlowState {
    fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "Idle",
            FlowState::Submitting => "Submitting",
            FlowState::AwaitingServerDecision => "AwaitingServerDecision",
            FlowState::AwaitingChallenge => "AwaitingChallenge",
            FlowState::Done(_) => "Done",
        }
    }
}

/// Inputs to the confirmation loop
#[derive(Clone, Debug)]
pub enum FlowEvent {
    /// The user pressed the pay button
    Submit,

    /// Card tokenization produced a payment method token
    Tokenized { payment_method_id: String },

    /// Card tokenization failed validation
    TokenizeFailed { message: String },

    /// The server answered a confirmation round-trip
    ServerReplied(ConfirmationResponse),

    /// The challenge completed; the intent can be confirmed again
    ChallengeResolved { payment_intent_id: String },

    /// The challenge failed or was abandoned
    ChallengeFailed { message: String },

    /// A round-trip or challenge exceeded its deadline
    TimedOut,
}

impl FlowEvent {
    fn name(&self) -> &'static str {
        match self {
            FlowEvent::Submit => "Submit",
            FlowEvent::Tokenized { .. } => "Tokenized",
            FlowEvent::TokenizeFailed { .. } => "TokenizeFailed",
            FlowEvent::ServerReplied(_) => "ServerReplied",
            FlowEvent::ChallengeResolved { .. } => "ChallengeResolved",
            FlowEvent::ChallengeFailed { .. } => "ChallengeFailed",
            FlowEvent::TimedOut => "TimedOut",
        }
    }
}

/// What the driver must do after handling an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowCommand {
    /// Tokenize the card details
    Tokenize,

    /// POST this body to the confirmation endpoint
    PostConfirmation(ConfirmationRequest),

    /// Run the in-browser challenge with this secret
    RunChallenge { client_secret: String },

    /// Render this message near the card input; affordance is re-enabled
    ShowError { message: String },

    /// The payment settled; navigate away
    CompleteSuccess,
}

/// The confirmation loop state machine
#[derive(Clone, Debug)]
pub struct ConfirmationFlow {
    state: FlowState,
}

impl Default for ConfirmationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Whether the pay button should accept a click.
    ///
    /// Disabled from `Submitting` through the terminal transition so a
    /// user cannot start a second tokenization or a concurrent round-trip
    /// for the same submission. A failed submission may be retried.
    pub fn submit_enabled(&self) -> bool {
        matches!(
            self.state,
            FlowState::Idle | FlowState::Done(Terminal::Failure(_))
        )
    }

    /// Advance the machine with one event and return the next command.
    ///
    /// An event that is not legal in the current state is a programming
    /// error in the driver and is reported, never silently dropped.
    pub fn on_event(&mut self, event: FlowEvent) -> Result<FlowCommand> {
        let (next, command) = match (&self.state, event) {
            (FlowState::Idle | FlowState::Done(Terminal::Failure(_)), FlowEvent::Submit) => {
                (FlowState::Submitting, FlowCommand::Tokenize)
            }

            (FlowState::Submitting, FlowEvent::Tokenized { payment_method_id }) => (
                FlowState::AwaitingServerDecision,
                FlowCommand::PostConfirmation(ConfirmationRequest::with_payment_method(
                    payment_method_id,
                )),
            ),
            (FlowState::Submitting, FlowEvent::TokenizeFailed { message }) => {
                // Validation error: back to Idle, not terminal
                (FlowState::Idle, FlowCommand::ShowError { message })
            }

            (FlowState::AwaitingServerDecision, FlowEvent::ServerReplied(response)) => {
                match response {
                    ConfirmationResponse::Success { .. } => (
                        FlowState::Done(Terminal::Success),
                        FlowCommand::CompleteSuccess,
                    ),
                    ConfirmationResponse::RequiresAction {
                        payment_intent_client_secret,
                        ..
                    } => (
                        FlowState::AwaitingChallenge,
                        FlowCommand::RunChallenge {
                            client_secret: payment_intent_client_secret,
                        },
                    ),
                    ConfirmationResponse::Error { error } => (
                        FlowState::Done(Terminal::Failure(error.clone())),
                        FlowCommand::ShowError { message: error },
                    ),
                }
            }

            (FlowState::AwaitingChallenge, FlowEvent::ChallengeResolved { payment_intent_id }) => (
                FlowState::AwaitingServerDecision,
                FlowCommand::PostConfirmation(ConfirmationRequest::with_intent(payment_intent_id)),
            ),
            (FlowState::AwaitingChallenge, FlowEvent::ChallengeFailed { message }) => (
                FlowState::Done(Terminal::Failure(message.clone())),
                FlowCommand::ShowError { message },
            ),

            (
                FlowState::AwaitingServerDecision | FlowState::AwaitingChallenge,
                FlowEvent::TimedOut,
            ) => {
                // The intent may or may not have advanced server-side;
                // claim nothing beyond "try again".
                let message =
                    "The payment is taking longer than expected. Please try again.".to_string();
                (
                    FlowState::Done(Terminal::Failure(message.clone())),
                    FlowCommand::ShowError { message },
                )
            }

            (state, event) => {
                return Err(CheckoutError::UnexpectedEvent {
                    state: state.name(),
                    event: event.name(),
                });
            }
        };

        tracing::debug!(from = self.state.name(), to = next.name(), "flow transition");
        self.state = next;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted() -> ConfirmationFlow {
        let mut flow = ConfirmationFlow::new();
        assert_eq!(
            flow.on_event(FlowEvent::Submit).unwrap(),
            FlowCommand::Tokenize
        );
        flow
    }

    fn awaiting_server(flow: &mut ConfirmationFlow) {
        let command = flow
            .on_event(FlowEvent::Tokenized {
                payment_method_id: "pm_123".into(),
            })
            .unwrap();
        assert_eq!(
            command,
            FlowCommand::PostConfirmation(ConfirmationRequest::with_payment_method("pm_123"))
        );
    }

    #[test]
    fn test_happy_path() {
        let mut flow = submitted();
        assert!(!flow.submit_enabled());

        awaiting_server(&mut flow);

        let command = flow
            .on_event(FlowEvent::ServerReplied(ConfirmationResponse::success()))
            .unwrap();
        assert_eq!(command, FlowCommand::CompleteSuccess);
        assert_eq!(flow.state(), &FlowState::Done(Terminal::Success));
    }

    #[test]
    fn test_challenge_round_trip() {
        let mut flow = submitted();
        awaiting_server(&mut flow);

        let command = flow
            .on_event(FlowEvent::ServerReplied(
                ConfirmationResponse::requires_action("secret_123"),
            ))
            .unwrap();
        assert_eq!(
            command,
            FlowCommand::RunChallenge {
                client_secret: "secret_123".into()
            }
        );
        assert!(!flow.submit_enabled());

        // Challenge resolves: exactly one follow-up confirm for that intent
        let command = flow
            .on_event(FlowEvent::ChallengeResolved {
                payment_intent_id: "pi_123".into(),
            })
            .unwrap();
        assert_eq!(
            command,
            FlowCommand::PostConfirmation(ConfirmationRequest::with_intent("pi_123"))
        );

        let command = flow
            .on_event(FlowEvent::ServerReplied(ConfirmationResponse::success()))
            .unwrap();
        assert_eq!(command, FlowCommand::CompleteSuccess);
    }

    #[test]
    fn test_tokenize_failure_returns_to_idle() {
        let mut flow = submitted();
        let command = flow
            .on_event(FlowEvent::TokenizeFailed {
                message: "Your card number is incomplete.".into(),
            })
            .unwrap();
        assert!(matches!(command, FlowCommand::ShowError { .. }));
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.submit_enabled());
    }

    #[test]
    fn test_server_error_is_terminal_and_retryable() {
        let mut flow = submitted();
        awaiting_server(&mut flow);

        let command = flow
            .on_event(FlowEvent::ServerReplied(ConfirmationResponse::error(
                "Your card was declined.",
            )))
            .unwrap();
        assert_eq!(
            command,
            FlowCommand::ShowError {
                message: "Your card was declined.".into()
            }
        );
        assert!(flow.submit_enabled());

        // A fresh submission may start from the failure state
        assert_eq!(
            flow.on_event(FlowEvent::Submit).unwrap(),
            FlowCommand::Tokenize
        );
    }

    #[test]
    fn test_challenge_failure_is_terminal() {
        let mut flow = submitted();
        awaiting_server(&mut flow);
        flow.on_event(FlowEvent::ServerReplied(
            ConfirmationResponse::requires_action("secret_123"),
        ))
        .unwrap();

        let command = flow
            .on_event(FlowEvent::ChallengeFailed {
                message: "Authentication failed".into(),
            })
            .unwrap();
        assert!(matches!(command, FlowCommand::ShowError { .. }));
        assert!(flow.submit_enabled());
    }

    #[test]
    fn test_timeout_re_enables_submit() {
        let mut flow = submitted();
        awaiting_server(&mut flow);

        let command = flow.on_event(FlowEvent::TimedOut).unwrap();
        assert!(matches!(command, FlowCommand::ShowError { .. }));
        assert!(flow.submit_enabled());
    }

    #[test]
    fn test_no_concurrent_submission() {
        let mut flow = submitted();
        awaiting_server(&mut flow);

        // A second submit while a round-trip is in flight is rejected
        assert!(!flow.submit_enabled());
        assert!(matches!(
            flow.on_event(FlowEvent::Submit),
            Err(CheckoutError::UnexpectedEvent { .. })
        ));
    }

    #[test]
    fn test_no_resubmit_after_success() {
        let mut flow = submitted();
        awaiting_server(&mut flow);
        flow.on_event(FlowEvent::ServerReplied(ConfirmationResponse::success()))
            .unwrap();

        assert!(!flow.submit_enabled());
        assert!(flow.on_event(FlowEvent::Submit).is_err());
    }

    #[test]
    fn test_stray_server_reply_rejected() {
        let mut flow = ConfirmationFlow::new();
        assert!(matches!(
            flow.on_event(FlowEvent::ServerReplied(ConfirmationResponse::success())),
            Err(CheckoutError::UnexpectedEvent { .. })
        ));
    }
}

//! Checkout Page
//!
//! Drives one [`ConfirmationFlow`] per user submission: each command the
//! machine emits is executed against Stripe.js or the confirmation
//! endpoint, and the result is fed back in until a terminal command.

use leptos::prelude::*;

use checkout_core::{ConfirmationFlow, ConfirmationResponse, FlowCommand, FlowEvent};

use crate::api::{self, ApiError};
use crate::components::SuccessPanel;
use crate::stripe::{self, JsCardElement, JsStripe};

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let (error, set_error) = signal(Option::<String>::None);
    let (processing, set_processing) = signal(false);
    let (succeeded, set_succeeded) = signal(false);
    let stripe_handles = StoredValue::new_local(Option::<(JsStripe, JsCardElement)>::None);

    // Fetch config and mount the card Element once the node exists
    Effect::new(move |_| {
        leptos::task::spawn_local(async move {
            match api::fetch_config().await {
                Ok(config) => {
                    match stripe::mount_card_element(
                        &config.stripe_publishable_key,
                        "#card-element",
                    ) {
                        Ok(handles) => stripe_handles.set_value(Some(handles)),
                        Err(e) => set_error.set(Some(e)),
                    }
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let on_pay = move |_| {
        if processing.get() {
            return;
        }
        let Some((stripe, card)) = stripe_handles.get_value() else {
            set_error.set(Some("The payment form is still loading.".into()));
            return;
        };

        set_processing.set(true);
        set_error.set(None);

        leptos::task::spawn_local(async move {
            let mut flow = ConfirmationFlow::new();
            let mut command = match flow.on_event(FlowEvent::Submit) {
                Ok(command) => command,
                Err(e) => {
                    set_error.set(Some(e.user_message()));
                    set_processing.set(false);
                    return;
                }
            };

            loop {
                let event = match command {
                    FlowCommand::Tokenize => match stripe::tokenize_card(&stripe, &card).await {
                        Ok(payment_method_id) => FlowEvent::Tokenized { payment_method_id },
                        Err(message) => FlowEvent::TokenizeFailed { message },
                    },

                    FlowCommand::PostConfirmation(request) => {
                        match api::post_confirm(&request).await {
                            Ok(response) => FlowEvent::ServerReplied(response),
                            Err(ApiError::TimedOut) => FlowEvent::TimedOut,
                            Err(ApiError::Failed(message)) => {
                                FlowEvent::ServerReplied(ConfirmationResponse::error(message))
                            }
                        }
                    }

                    FlowCommand::RunChallenge { client_secret } => {
                        match stripe::run_card_challenge(&stripe, &client_secret).await {
                            Ok(payment_intent_id) => {
                                FlowEvent::ChallengeResolved { payment_intent_id }
                            }
                            Err(message) => FlowEvent::ChallengeFailed { message },
                        }
                    }

                    FlowCommand::ShowError { message } => {
                        set_error.set(Some(message));
                        break;
                    }

                    FlowCommand::CompleteSuccess => {
                        set_succeeded.set(true);
                        break;
                    }
                };

                command = match flow.on_event(event) {
                    Ok(command) => command,
                    Err(e) => {
                        set_error.set(Some(e.user_message()));
                        break;
                    }
                };
            }

            set_processing.set(false);
        });
    };

    view! {
        <div class="checkout">
            <h1>"Checkout"</h1>

            <Show
                when=move || succeeded.get()
                fallback=move || {
                    view! {
                        <div class="payment-form">
                            <label for="card-element">"Card details"</label>
                            <div id="card-element"></div>

                            <Show when=move || error.get().is_some()>
                                <div id="card-errors" class="visible">
                                    {move || error.get().unwrap_or_default()}
                                </div>
                            </Show>

                            <button
                                class="btn btn-primary"
                                on:click=on_pay
                                disabled=move || processing.get()
                            >
                                {move || if processing.get() { "Processing…" } else { "Pay" }}
                            </button>
                        </div>
                    }
                }
            >
                <SuccessPanel />
            </Show>
        </div>
    }
}

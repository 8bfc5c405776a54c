//! Stripe.js Bindings
//!
//! Low-level wasm-bindgen bindings to Stripe.js v3 plus async wrappers
//! for the card flow: mount, tokenize, and run the authentication
//! challenge when the server asks for one.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Promise, Reflect};

#[wasm_bindgen]
extern "C" {
    /// Raw Stripe.js client handle
    #[wasm_bindgen(js_name = Stripe, js_namespace = window)]
    #[derive(Debug, Clone)]
    pub type JsStripe;

    /// Raw Elements factory handle
    #[derive(Debug, Clone)]
    pub type JsElements;

    /// Raw card Element handle
    #[derive(Debug, Clone)]
    pub type JsCardElement;

    /// `Stripe(publishableKey)` → `JsStripe`
    #[wasm_bindgen(js_name = Stripe, js_namespace = window)]
    pub fn new_stripe(publishable_key: &str) -> JsStripe;

    /// `stripe.elements()` → `JsElements`
    #[wasm_bindgen(method, catch)]
    pub fn elements(this: &JsStripe) -> Result<JsElements, JsValue>;

    /// `elements.create("card", options)` → `JsCardElement`
    #[wasm_bindgen(method, catch, js_name = create)]
    pub fn create_element(
        this: &JsElements,
        element_type: &str,
        options: &JsValue,
    ) -> Result<JsCardElement, JsValue>;

    /// `card.mount(selector)`
    #[wasm_bindgen(method, catch)]
    pub fn mount(this: &JsCardElement, selector: &str) -> Result<(), JsValue>;

    /// `stripe.createPaymentMethod("card", card)` → JS `Promise`
    #[wasm_bindgen(method, catch, js_name = createPaymentMethod)]
    pub fn create_payment_method(
        this: &JsStripe,
        method_type: &str,
        card: &JsCardElement,
    ) -> Result<Promise, JsValue>;

    /// `stripe.handleCardAction(clientSecret)` → JS `Promise`
    #[wasm_bindgen(method, catch, js_name = handleCardAction)]
    pub fn handle_card_action(this: &JsStripe, client_secret: &str) -> Result<Promise, JsValue>;
}

/// Create the Stripe client and mount a card Element on `selector`
pub fn mount_card_element(
    publishable_key: &str,
    selector: &str,
) -> Result<(JsStripe, JsCardElement), String> {
    let stripe = new_stripe(publishable_key);
    let elements = stripe.elements().map_err(js_message)?;

    let options = Object::new();
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("hidePostalCode"),
        &JsValue::TRUE,
    );

    let card = elements
        .create_element("card", &options.into())
        .map_err(js_message)?;
    card.mount(selector).map_err(js_message)?;

    Ok((stripe, card))
}

/// Tokenize the card details into a single-use payment method id.
///
/// Resolves with `{error}` on validation problems, `{paymentMethod}`
/// otherwise.
pub async fn tokenize_card(stripe: &JsStripe, card: &JsCardElement) -> Result<String, String> {
    let promise = stripe
        .create_payment_method("card", card)
        .map_err(js_message)?;
    let result = JsFuture::from(promise).await.map_err(js_message)?;

    if let Some(error) = field(&result, "error") {
        return Err(error_message(&error));
    }

    field(&result, "paymentMethod")
        .and_then(|pm| field(&pm, "id"))
        .and_then(|id| id.as_string())
        .ok_or_else(|| "Tokenization returned no payment method".to_string())
}

/// Run the in-browser authentication challenge.
///
/// On success the updated intent's id is returned for the follow-up
/// confirm round-trip.
pub async fn run_card_challenge(stripe: &JsStripe, client_secret: &str) -> Result<String, String> {
    let promise = stripe.handle_card_action(client_secret).map_err(js_message)?;
    let result = JsFuture::from(promise).await.map_err(js_message)?;

    if let Some(error) = field(&result, "error") {
        return Err(error_message(&error));
    }

    field(&result, "paymentIntent")
        .and_then(|intent| field(&intent, "id"))
        .and_then(|id| id.as_string())
        .ok_or_else(|| "Challenge returned no payment intent".to_string())
}

fn field(value: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn error_message(error: &JsValue) -> String {
    field(error, "message")
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| "Payment failed".to_string())
}

fn js_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

//! API Client

use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;

use checkout_core::{ConfirmationRequest, ConfirmationResponse};

/// Round-trip budget before the flow gives up and re-enables the form.
/// On expiry nothing is assumed about the intent's server-side state.
const CONFIRM_TIMEOUT_MS: u32 = 20_000;

/// Store config fetched at page load
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub stripe_publishable_key: String,
    pub stripe_country: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Failure modes of a confirmation round-trip
#[derive(Clone, Debug)]
pub enum ApiError {
    /// The deadline elapsed with no reply
    TimedOut,

    /// Transport or decoding failure
    Failed(String),
}

/// Absolute URL for a server route.
///
/// reqwest rejects bare paths ("relative URL without a base"), so every
/// call is anchored on the page's own origin.
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());

    join_origin(&origin, path)
}

fn join_origin(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

/// Retrieve the store configuration
pub async fn fetch_config() -> Result<StoreConfig, String> {
    let response = reqwest::Client::new()
        .get(endpoint("/config"))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    response.json().await.map_err(|e| e.to_string())
}

/// POST one confirmation round-trip, bounded by the timeout.
///
/// Validation rejections arrive with a 400 status but still carry the
/// `{error}` wire shape, so the body decodes either way.
pub async fn post_confirm(request: &ConfirmationRequest) -> Result<ConfirmationResponse, ApiError> {
    let call = async {
        let response = reqwest::Client::new()
            .post(endpoint("/confirm_payment"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Failed(e.to_string()))?;

        response
            .json::<ConfirmationResponse>()
            .await
            .map_err(|e| ApiError::Failed(e.to_string()))
    };

    match select(Box::pin(call), TimeoutFuture::new(CONFIRM_TIMEOUT_MS)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ApiError::TimedOut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_origin_builds_absolute_url() {
        assert_eq!(
            join_origin("http://localhost:3000", "/config"),
            "http://localhost:3000/config"
        );
        assert_eq!(
            join_origin("https://shop.example.com/", "/confirm_payment"),
            "https://shop.example.com/confirm_payment"
        );
    }
}

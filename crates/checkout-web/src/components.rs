//! UI Components

use leptos::prelude::*;

/// Panel shown once the payment settles
#[component]
pub fn SuccessPanel() -> impl IntoView {
    view! {
        <div class="success-panel">
            <h2>"Payment complete"</h2>
            <p>"Thanks! Your card was charged successfully."</p>
            <a href="/" class="btn">"Back to store"</a>
        </div>
    }
}

//! Loading indicators

use leptos::prelude::*;

/// Spinner loading indicator
#[component]
pub fn LoadingSpinner(#[prop(default = "Loading...")] message: &'static str) -> impl IntoView {
    view! {
        <div class="answer-meta">
            <div class="spinner"></div>
            <span>{message}</span>
        </div>
    }
}

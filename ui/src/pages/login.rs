//! Login page

use biblio::auth::Route;
use biblio::types::Credentials;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::state::AppState;

/// Login page
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    // Form state
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let credentials = Credentials::new(username.get(), password.get());
        let state = state.clone();
        let navigate = navigate.clone();

        spawn_local(async move {
            is_loading.set(true);
            error.set(None);

            let result = state.sessions().login(&credentials).await;
            is_loading.try_set(false);

            match result {
                Ok(session) => {
                    state.session.set(Some(session));
                    navigate(&Route::DEFAULT.path(), Default::default());
                }
                Err(e) => {
                    tracing::info!("Login rejected: {}", e);
                    error.try_set(Some("Invalid username or password".to_string()));
                }
            }
        });
    };

    view! {
        <div class="card auth-card">
            <h1>"Sign in"</h1>

            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>

            <form on:submit=on_submit>
                <label>"Username"</label>
                <input
                    type="text"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                    required=true
                />

                <label>"Password"</label>
                <input
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                    required=true
                />

                <button type="submit" class="btn btn-primary" disabled=move || is_loading.get()>
                    "Sign In"
                </button>
            </form>

            <p>
                "No account yet? "
                <a href=Route::Register.path()>"Register"</a>
            </p>
        </div>
    }
}

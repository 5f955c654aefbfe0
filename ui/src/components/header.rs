//! Header component

use biblio::auth::{live_session, Route, Session};
use chrono::Utc;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::AppState;

/// Main application header
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let signed_in = {
        let state = state.clone();
        Signal::derive(move || {
            state
                .session
                .with(|s| live_session(s.as_ref(), Utc::now()).is_some())
        })
    };
    let greeting = {
        let state = state.clone();
        move || {
            state.session.with(|s| {
                live_session(s.as_ref(), Utc::now())
                    .map(Session::greeting)
                    .unwrap_or_default()
            })
        }
    };
    let is_lecturer = {
        let state = state.clone();
        move || state.is_lecturer()
    };

    view! {
        <header class="header">
            <a href="/search"><strong>"Biblio"</strong></a>
            <nav>
                <Show when=move || signed_in.get()>
                    <span class="greeting">{greeting.clone()}</span>
                    <a href=Route::Search.path() class="btn">"Search"</a>
                </Show>
                <Show when=is_lecturer.clone()>
                    <a href=Route::Upload.path() class="btn">"Upload"</a>
                </Show>
                {
                    let state = state.clone();
                    let navigate = navigate.clone();
                    move || {
                        if signed_in.get() {
                            let state = state.clone();
                            let navigate = navigate.clone();
                            view! {
                                <button
                                    class="btn"
                                    on:click=move |_| {
                                        state.logout();
                                        navigate(&Route::Login.path(), Default::default());
                                    }
                                >
                                    "Sign Out"
                                </button>
                            }
                            .into_any()
                        } else {
                            view! { <a href=Route::Login.path() class="btn btn-primary">"Sign In"</a> }
                                .into_any()
                        }
                    }
                }
            </nav>
        </header>
    }
}

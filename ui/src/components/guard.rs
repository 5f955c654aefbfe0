//! Route guard wrapper

use biblio::auth::{authorize, Access, Route};
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::state::AppState;

/// Renders its children only if the guards of the current path allow it,
/// otherwise redirects where they say.
#[component]
pub fn Guarded(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();
    let location = use_location();

    move || {
        let route = Route::parse(&location.pathname.get());
        let access = state.session.with(|s| authorize(&route, s.as_ref()));
        match access {
            Access::Allow => children().into_any(),
            Access::Redirect(to) => view! { <Redirect path=to.path() /> }.into_any(),
        }
    }
}

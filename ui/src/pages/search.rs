//! Course and year picker

use biblio::views::search::load_catalog;
use biblio::views::{CourseCatalog, SearchForm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::api::alert_error;
use crate::components::LoadingSpinner;
use crate::state::AppState;

#[component]
pub fn SearchPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let catalog = RwSignal::new(CourseCatalog::default());
    let form = RwSignal::new(SearchForm::default());
    let query = RwSignal::new(String::new());
    let is_loading = RwSignal::new(true);

    let api = state.api();
    spawn_local(async move {
        match load_catalog(&api).await {
            Ok(loaded) => {
                catalog.try_set(loaded);
            }
            Err(e) => tracing::error!("Could not load available papers: {}", e),
        }
        is_loading.try_set(false);
    });

    let labels = move || {
        let query = query.get();
        catalog.with(|c| c.filter(&query).into_iter().map(str::to_string).collect::<Vec<_>>())
    };
    let selected_label = move || form.with(|f| f.course().map(|c| c.label()).unwrap_or_default());
    let years = move || {
        form.with(|f| f.course().map(|c| c.years.clone()).unwrap_or_default())
    };

    let on_course = move |ev: web_sys::Event| {
        let label = event_target_value(&ev);
        let result = catalog.with_untracked(|c| {
            let mut next = form.get_untracked();
            next.select_course(c, &label).map(|()| next)
        });
        match result {
            Ok(next) => form.set(next),
            Err(e) => tracing::debug!("Ignoring course selection: {}", e),
        }
    };

    let on_year = move |ev: web_sys::Event| {
        let Ok(year) = event_target_value(&ev).parse::<i32>() else {
            return;
        };
        let mut next = form.get_untracked();
        if next.select_year(year).is_ok() {
            form.set(next);
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.with_untracked(|f| f.paper_route()) {
            Ok(route) => navigate(&route.path(), Default::default()),
            Err(e) => alert_error(&e),
        }
    };

    view! {
        <div class="card">
            <h1>"Find a paper"</h1>

            <Show when=move || is_loading.get()>
                <LoadingSpinner message="Loading courses" />
            </Show>

            <form on:submit=on_submit>
                <label>"Course"</label>
                <input
                    type="search"
                    placeholder="Filter courses"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
                <select on:change=on_course prop:value=selected_label>
                    <option value="" disabled=true>"Select a course"</option>
                    {move || {
                        labels()
                            .into_iter()
                            .map(|label| view! { <option value=label.clone()>{label}</option> })
                            .collect_view()
                    }}
                </select>

                <label>"Year"</label>
                <select
                    on:change=on_year
                    prop:value=move || form.with(|f| f.year().map(|y| y.to_string()).unwrap_or_default())
                >
                    {move || {
                        years()
                            .into_iter()
                            .map(|year| view! { <option value=year.to_string()>{year}</option> })
                            .collect_view()
                    }}
                </select>

                <button type="submit" class="btn btn-primary">"Get paper"</button>
            </form>
        </div>
    }
}

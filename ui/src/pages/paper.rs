//! Paper page: the PDF and one panel per question

use biblio::auth::Route;
use biblio::types::QuestionId;
use biblio::views::solution_page::PAPER_DELETED_MESSAGE;
use biblio::views::SolutionPage;
use biblio::{ApiClient, Paper};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::api::{alert, refresh_solution};
use crate::components::{LoadingSpinner, SolutionPanel};
use crate::schedule::RefreshTimer;
use crate::state::AppState;

/// Paper and question list. A missing paper is tolerated, missing questions
/// leave the page empty.
async fn load_page(api: ApiClient, page: RwSignal<SolutionPage>, loading: RwSignal<bool>) {
    let Some((code, year)) =
        page.try_with_untracked(|p| (p.course_code().to_string(), p.year()))
    else {
        return;
    };

    match api.paper(&code, year).await {
        Ok(record) => {
            page.try_update(|p| p.set_paper(Paper::from_record(code.clone(), year, record)));
        }
        Err(e) => tracing::warn!(course = %code, year, "Could not load paper: {}", e),
    }

    match api.questions(&code, year).await {
        Ok(questions) => {
            page.try_update(|p| p.set_questions(questions));
            refresh_all(&api, page);
        }
        Err(e) => tracing::error!(course = %code, year, "Could not load questions: {}", e),
    }

    loading.try_set(false);
}

fn refresh_all(api: &ApiClient, page: RwSignal<SolutionPage>) {
    let targets = page
        .try_with_untracked(|p| p.page_refresh_targets())
        .unwrap_or_default();
    for id in targets {
        spawn_local(refresh_solution(api.clone(), page, id));
    }
}

/// Resolves `/:code/:year`; a year that is not a number goes to Login, the
/// same place `Route::parse` sends it.
#[component]
pub fn PaperPage() -> impl IntoView {
    let params = use_params_map();
    let path = params.with_untracked(|p| {
        format!(
            "/{}/{}",
            p.get("code").unwrap_or_default(),
            p.get("year").unwrap_or_default()
        )
    });

    match Route::parse(&path) {
        Route::Paper { course_code, year } => {
            view! { <PaperView course_code=course_code year=year /> }.into_any()
        }
        other => view! { <Redirect path=other.path() /> }.into_any(),
    }
}

#[component]
fn PaperView(course_code: String, year: i32) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let page = RwSignal::new(SolutionPage::new(course_code, year));
    let edit_html = RwSignal::new(String::new());
    let loading = RwSignal::new(true);

    spawn_local(load_page(state.api(), page, loading));

    // Every question refreshes slowly; the open one refreshes fast.
    let refresh = state.config.refresh;
    let timers = StoredValue::new_local(Vec::<RefreshTimer>::new());
    {
        let api = state.api();
        let page_timer = RefreshTimer::start(refresh.page(), {
            let api = api.clone();
            move || refresh_all(&api, page)
        });
        let active_timer = RefreshTimer::start(refresh.active_solution(), move || {
            if let Some(id) = page.try_with_untracked(|p| p.active_refresh_target()).flatten() {
                spawn_local(refresh_solution(api.clone(), page, id));
            }
        });
        timers.update_value(|t| t.extend([page_timer, active_timer]));
    }
    on_cleanup(move || {
        timers.try_update_value(|t| t.clear());
    });

    let delete_paper = {
        let state = state.clone();
        move || {
            let Some(paper_id) = page.with_untracked(|p| p.paper().map(|paper| paper.paper_id))
            else {
                return;
            };
            let api = state.api();
            let navigate = navigate.clone();
            spawn_local(async move {
                match api.delete_paper(paper_id).await {
                    Ok(()) => {
                        alert(PAPER_DELETED_MESSAGE);
                        navigate(&Route::Search.path(), Default::default());
                    }
                    Err(e) => tracing::error!(paper_id, "Delete failed: {}", e),
                }
            });
        }
    };

    let title = move || {
        page.with(|p| match p.paper() {
            Some(paper) if !paper.title.is_empty() => paper.title.clone(),
            _ => format!("{} {}", p.course_code(), p.year()),
        })
    };

    view! {
        <div>
            <section class="card">
                <div class="answer-meta">
                    <h1>{title}</h1>
                    {
                        let state = state.clone();
                        move || {
                            let delete_paper = delete_paper.clone();
                            state.is_lecturer().then(|| view! {
                                <button class="btn btn-danger" on:click=move |_| delete_paper()>
                                    "Delete paper"
                                </button>
                            })
                        }
                    }
                </div>
                {move || page.with(|p| p.paper().map(|paper| view! {
                    <object class="pdf-frame" type="application/pdf" data=paper.pdf_data_url()></object>
                }))}
            </section>

            <Show when=move || loading.get()>
                <LoadingSpinner message="Loading questions" />
            </Show>

            <For
                each=move || page.with(|p| p.page_refresh_targets())
                key=|id: &QuestionId| *id
                children=move |id| view! { <SolutionPanel id=id page=page edit_html=edit_html /> }
            />
        </div>
    }
}

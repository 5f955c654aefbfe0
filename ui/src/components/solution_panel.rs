//! One question and its answers

use biblio::model::SolutionDisplay;
use biblio::types::{AnswerAuthor, NewAnswer, QuestionId};
use biblio::views::solution_page::validate_answer;
use biblio::views::SolutionPage;
use biblio::Answer;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{alert_error, refresh_solution};
use crate::components::AnswerCard;
use crate::state::AppState;

#[component]
pub fn SolutionPanel(
    id: QuestionId,
    page: RwSignal<SolutionPage>,
    /// Shared buffer of the single answer being edited
    edit_html: RwSignal<String>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let viewer_id = state.viewer().map(|v| v.user_id).unwrap_or_default();

    let solution = Memo::new(move |_| page.with(|p| p.solution(id).cloned()));
    let display = move || {
        solution.with(|s| s.as_ref().map_or(SolutionDisplay::Hidden, |s| s.display()))
    };
    let draft = RwSignal::new(String::new());

    let on_toggle = {
        let state = state.clone();
        move |_| {
            let expanded = page.try_update(|p| p.toggle(id)).unwrap_or(false);
            if expanded {
                spawn_local(refresh_solution(state.api(), page, id));
            }
        }
    };

    let on_submit = {
        let state = state.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let html = draft.get_untracked();
            if let Err(e) = validate_answer(&html) {
                alert_error(&e);
                return;
            }
            let Some(viewer) = state.viewer() else {
                return;
            };

            let api = state.api();
            spawn_local(async move {
                let new_answer = NewAnswer {
                    question: id.to_string(),
                    user: AnswerAuthor {
                        id: viewer.user_id,
                        username: viewer.username,
                    },
                    html,
                };
                match api.submit_answer(&new_answer).await {
                    Ok(record) => {
                        page.try_update(|p| p.add_answer(id, Answer::from(record)));
                        draft.try_set(String::new());
                    }
                    Err(e) => tracing::error!(question = id, "Submitting answer failed: {}", e),
                }
            });
        }
    };

    view! {
        <section class="card">
            <div class="answer-meta">
                <button class="btn" on:click=on_toggle>
                    {move || if display() == SolutionDisplay::Hidden { "Show" } else { "Hide" }}
                </button>
                <h3>{move || solution.with(|s| s.as_ref().map(|s| s.header()).unwrap_or_default())}</h3>
            </div>

            {move || {
                if display() == SolutionDisplay::Hidden {
                    return ().into_any();
                }
                let answers = solution
                    .with(|s| s.as_ref().map(|s| s.displayed().to_vec()))
                    .unwrap_or_default();
                let can_submit = solution
                    .with(|s| s.as_ref().is_some_and(|s| s.can_submit_new_answer(viewer_id)));
                let on_submit = on_submit.clone();

                view! {
                    <div>
                        {answers
                            .into_iter()
                            .map(|answer| view! { <AnswerCard question=id answer=answer page=page edit_html=edit_html /> })
                            .collect_view()}

                        {(display() == SolutionDisplay::FirstOnly).then(|| view! {
                            <button class="btn" on:click=move |_| page.update(|p| p.show_more(id))>
                                "Show more"
                            </button>
                        })}

                        {can_submit.then(|| view! {
                            <form on:submit=on_submit>
                                <textarea
                                    placeholder="Write your answer (HTML allowed)"
                                    prop:value=move || draft.get()
                                    on:input=move |ev| draft.set(event_target_value(&ev))
                                ></textarea>
                                <button type="submit" class="btn btn-primary">"Submit answer"</button>
                            </form>
                        })}
                    </div>
                }
                .into_any()
            }}
        </section>
    }
}

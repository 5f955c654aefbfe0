use biblio::types::{EditAnswer, QuestionId};
use biblio::views::solution_page::validate_answer;
use biblio::views::SolutionPage;
use biblio::{Answer, Vote};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::alert_error;
use crate::state::AppState;

/// A single answer with its vote, edit and delete controls.
#[component]
pub fn AnswerCard(
    question: QuestionId,
    answer: Answer,
    page: RwSignal<SolutionPage>,
    edit_html: RwSignal<String>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let viewer_id = state.viewer().map(|v| v.user_id).unwrap_or_default();
    let answer_id = answer.id;
    let mine = answer.can_edit(viewer_id);
    let is_editing = move || page.with(|p| p.is_editing(answer_id));

    let vote = {
        let state = state.clone();
        move |vote: Vote| {
            page.update(|p| {
                p.cast_vote(question, answer_id, vote);
            });
            let api = state.api();
            spawn_local(async move {
                match api.vote(answer_id, vote).await {
                    Ok(count) => {
                        page.try_update(|p| p.confirm_vote(question, answer_id, count.votes));
                    }
                    Err(e) => tracing::warn!(answer = answer_id, "Vote failed: {}", e),
                }
            });
        }
    };

    let vote_button = if answer.can_vote {
        view! {
            <button class="btn" on:click=move |_| vote(Vote::Upvote)>"Upvote"</button>
        }
        .into_any()
    } else {
        view! {
            <button class="btn" on:click=move |_| vote(Vote::Downvote)>"Remove vote"</button>
        }
        .into_any()
    };

    let owner_controls = mine.then(|| {
        let html = answer.html.clone();
        let state = state.clone();
        let on_edit = move |_| {
            page.update(|p| {
                p.begin_edit(answer_id);
            });
            edit_html.set(html.clone());
        };
        let on_delete = move |_| {
            let api = state.api();
            spawn_local(async move {
                match api.delete_answer(answer_id).await {
                    Ok(_) => {
                        page.try_update(|p| p.remove_answer(question, answer_id));
                    }
                    Err(e) => tracing::error!(answer = answer_id, "Delete failed: {}", e),
                }
            });
        };

        view! {
            <button class="btn" on:click=on_edit>"Edit"</button>
            <button class="btn btn-danger" on:click=on_delete>"Delete"</button>
        }
    });

    let body = answer.html.clone();
    let body_or_editor = move || {
        if !is_editing() {
            return view! { <div class="answer-body" inner_html=body.clone()></div> }.into_any();
        }

        let state = state.clone();
        let on_save = move |_| {
            let html = edit_html.get_untracked();
            if let Err(e) = validate_answer(&html) {
                alert_error(&e);
                return;
            }
            let api = state.api();
            spawn_local(async move {
                match api.edit_answer(&EditAnswer { id: answer_id, html }).await {
                    Ok(edited) => {
                        page.try_update(|p| p.finish_edit(answer_id, edited.html));
                    }
                    Err(e) => tracing::error!(answer = answer_id, "Edit failed: {}", e),
                }
            });
        };

        view! {
            <div>
                <textarea
                    prop:value=move || edit_html.get()
                    on:input=move |ev| edit_html.set(event_target_value(&ev))
                ></textarea>
                <button class="btn btn-primary" on:click=on_save>"Save"</button>
                <button class="btn" on:click=move |_| page.update(|p| p.cancel_edit())>"Cancel"</button>
            </div>
        }
        .into_any()
    };

    view! {
        <article class="answer">
            <div class="answer-meta">
                <span class="votes">{answer.votes}</span>
                <span>{answer.username.clone()}</span>
                <span>{answer.timestamp.format("%d %b %Y %H:%M").to_string()}</span>
                {vote_button}
                {owner_controls}
            </div>
            {body_or_editor}
        </article>
    }
}

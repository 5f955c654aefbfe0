//! Paper upload, lecturers only

use biblio::types::AppError;
use biblio::views::upload::{UPLOAD_FAILED_MESSAGE, YEAR_RANGE};
use biblio::views::UploadForm;
use gloo_file::futures::read_as_bytes;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::api::{alert, alert_error};
use crate::state::AppState;

#[component]
pub fn UploadPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let form = RwSignal::new(UploadForm::default());
    let is_uploading = RwSignal::new(false);

    let on_file = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        spawn_local(async move {
            match read_as_bytes(&gloo_file::File::from(file)).await {
                Ok(bytes) => {
                    form.try_update(|f| f.attach_pdf(&bytes));
                }
                Err(e) => tracing::error!("Could not read file: {}", e),
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let upload = match form.with_untracked(UploadForm::validate) {
            Ok(upload) => upload,
            Err(e) => {
                alert_error(&e);
                return;
            }
        };

        let api = state.api();
        let navigate = navigate.clone();
        spawn_local(async move {
            is_uploading.set(true);
            let result = upload.submit(&api).await;
            is_uploading.try_set(false);

            match result {
                Ok(paper_id) => {
                    tracing::info!(paper_id, "Upload complete");
                    navigate(&upload.route().path(), Default::default());
                }
                Err(e @ AppError::PartialUpload { .. }) => {
                    tracing::error!("{}", e);
                    alert(UPLOAD_FAILED_MESSAGE);
                }
                Err(e) => {
                    tracing::error!("Upload failed: {}", e);
                    alert(&e.to_string());
                }
            }
        });
    };

    view! {
        <div class="card">
            <h1>"Upload a paper"</h1>

            <form on:submit=on_submit>
                <label>"Course code"</label>
                <input
                    type="text"
                    prop:value=move || form.with(|f| f.course_code.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.course_code = value);
                    }
                />

                <label>"Year"</label>
                <input
                    type="number"
                    min={(YEAR_RANGE.0 + 1).to_string()}
                    max={(YEAR_RANGE.1 - 1).to_string()}
                    prop:value=move || form.with(|f| f.year.map(|y| y.to_string()).unwrap_or_default())
                    on:input=move |ev| {
                        let year = event_target_value(&ev).trim().parse::<i32>().ok();
                        form.update(|f| f.year = year);
                    }
                />

                <label>"Title"</label>
                <input
                    type="text"
                    prop:value=move || form.with(|f| f.title.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.title = value);
                    }
                />

                <label>"Questions, comma separated"</label>
                <textarea
                    placeholder="1a, 1b, 2"
                    prop:value=move || form.with(|f| f.questions.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.questions = value);
                    }
                ></textarea>

                <label>"PDF"</label>
                <input type="file" accept="application/pdf" on:change=on_file />

                <button type="submit" class="btn btn-primary" disabled=move || is_uploading.get()>
                    "Upload"
                </button>
            </form>

            {move || form.with(|f| f.preview_url()).map(|url| view! {
                <object class="pdf-frame" type="application/pdf" data=url></object>
            })}
        </div>
    }
}

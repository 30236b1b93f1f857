//! Image uploader: drop zone, per-image metadata editing, and submission.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, AnalysisResult};
use crate::auth::session::SessionStore;
use crate::components::copy_button::CopyButton;
use crate::consolidate::consolidate_prompts;
use crate::upload::{SubmissionParts, SubmissionState, SubmitError, UploadBatch};

/// Uploader card: collects screenshots into an [`UploadBatch`], lets the
/// user title each page, and submits the whole selection as one analysis
/// request.
#[component]
pub fn ImageUploader() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let batch: RwSignal<UploadBatch<web_sys::File>, LocalStorage> =
        RwSignal::new_local(UploadBatch::new());
    let (result, set_result) = signal::<Option<AnalysisResult>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (session_name, set_session_name) = signal(String::new());

    let in_flight = move || batch.with(|b| b.submission() == SubmissionState::InFlight);
    let count = move || batch.with(|b| b.len());

    let on_submit = move |_| {
        let name = session_name.get_untracked();
        let mut begun: Result<SubmissionParts<web_sys::File>, SubmitError> =
            Err(SubmitError::EmptyBatch);
        batch.update(|b| {
            b.set_session_name(&name);
            begun = b.begin_submission().map(|()| b.submission_parts());
        });

        let parts = match begun {
            Ok(parts) => parts,
            Err(err) => {
                set_error.set(Some(err.to_string()));
                return;
            }
        };

        set_error.set(None);
        set_result.set(None);

        // Credentials are fixed at dispatch; a login or logout that happens
        // while the request is in flight does not touch it.
        let token = session.bearer_token();
        spawn_local(async move {
            match api::analyze_image(token.as_deref(), &parts).await {
                Ok(analysis) => {
                    batch.update(|b| b.finish_submission(true));
                    set_result.set(Some(analysis));
                }
                Err(err) => {
                    batch.update(|b| b.finish_submission(false));
                    set_error.set(Some(err.to_string()));
                }
            }
        });
    };

    view! {
        <div class="uploader card">
            <style>{include_str!("uploader.css")}</style>

            <h2 class="uploader-title">"Upload UI Screenshots for Analysis"</h2>

            <div class="field">
                <label class="field-label" for="session-name">
                    "Overall Session Name (Optional):"
                </label>
                <input
                    type="text"
                    id="session-name"
                    class="input"
                    placeholder="e.g., My E-commerce App"
                    prop:value=session_name
                    on:input=move |ev| set_session_name.set(event_target_value_input(&ev))
                />
            </div>

            <div class="field">
                <label class="field-label">"Choose or Drag Images Here:"</label>
                <DropZone batch=batch set_result=set_result set_error=set_error />
            </div>

            {move || {
                let entries: Vec<(u64, String, String, String)> = batch.with(|b| {
                    b.entries()
                        .iter()
                        .map(|entry| {
                            (
                                entry.id,
                                entry.title.clone(),
                                entry.preview_url.clone(),
                                entry.file.name(),
                            )
                        })
                        .collect()
                });
                (!entries.is_empty()).then(|| view! {
                    <div class="entry-list">
                        <div class="entry-list-header">
                            <h3>{format!("Selected Images ({})", entries.len())}</h3>
                            <button
                                class="btn-link"
                                on:click=move |_| {
                                    batch.update(|b| b.reset());
                                    set_result.set(None);
                                    set_error.set(None);
                                }
                            >
                                "Remove All"
                            </button>
                        </div>
                        {entries
                            .into_iter()
                            .map(|(id, title, preview_url, file_name)| view! {
                                <div class="entry-row">
                                    <img src=preview_url class="entry-preview" alt=file_name />
                                    <div class="entry-fields">
                                        <label class="entry-label">"Page Title:"</label>
                                        <input
                                            type="text"
                                            class="input"
                                            value=title
                                            placeholder="e.g., Landing Page, Product Details"
                                            on:change=move |ev| {
                                                let value = event_target_value_input(&ev);
                                                batch.update(|b| b.set_entry_title(id, &value));
                                            }
                                        />
                                    </div>
                                    <button
                                        class="entry-remove"
                                        title="Remove image"
                                        on:click=move |_| {
                                            batch.update(|b| {
                                                b.remove_entry(id);
                                            });
                                        }
                                    >
                                        "×"
                                    </button>
                                </div>
                            })
                            .collect::<Vec<_>>()}
                    </div>
                })
            }}

            <button
                class="btn btn-primary btn-submit"
                prop:disabled=move || in_flight() || count() == 0
                on:click=on_submit
            >
                {move || {
                    if in_flight() {
                        "Analyzing...".to_string()
                    } else if count() > 1 {
                        "Analyze Images".to_string()
                    } else {
                        "Analyze Image".to_string()
                    }
                }}
            </button>

            {move || error.get().map(|message| view! {
                <div class="error-banner">
                    <strong>"Error: "</strong>
                    {message}
                </div>
            })}

            {move || result.get().map(|analysis| {
                let consolidated = consolidate_prompts(&analysis.prompts);
                let session_label = analysis
                    .session_name
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string());
                let images_label = analysis.image_filename.clone().unwrap_or_else(|| {
                    batch.with_untracked(|b| {
                        let names: Vec<String> =
                            b.entries().iter().map(|entry| entry.file.name()).collect();
                        if names.is_empty() {
                            "N/A".to_string()
                        } else {
                            names.join(", ")
                        }
                    })
                });
                view! {
                    <div class="analysis-result">
                        <h3 class="analysis-result-title">"Analysis Complete!"</h3>
                        <p class="analysis-meta">
                            <strong>"Session: "</strong>
                            {session_label}
                        </p>
                        <p class="analysis-meta">
                            <strong>"Images Processed: "</strong>
                            {images_label}
                        </p>
                        {if consolidated.is_empty() {
                            view! {
                                <p class="muted">"No prompts were generated."</p>
                            }
                                .into_any()
                        } else {
                            view! {
                                <div class="consolidated">
                                    <strong class="consolidated-title">
                                        "Consolidated Prompt:"
                                    </strong>
                                    <pre class="consolidated-text">{consolidated.clone()}</pre>
                                    <CopyButton
                                        text=consolidated
                                        label="Copy Consolidated Prompt".to_string()
                                    />
                                </div>
                            }
                                .into_any()
                        }}
                    </div>
                }
            })}
        </div>
    }
}

/// Drop zone with drag-over highlight and a browse fallback.
#[component]
fn DropZone(
    batch: RwSignal<UploadBatch<web_sys::File>, LocalStorage>,
    set_result: WriteSignal<Option<AnalysisResult>>,
    set_error: WriteSignal<Option<String>>,
) -> impl IntoView {
    let (is_over, set_is_over) = signal(false);
    let file_input_id = "uploader-file-input";

    // Shared by drop and browse; only copyable handles are captured.
    let ingest = move |list: web_sys::FileList| {
        let files: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
        if files.is_empty() {
            return;
        }
        let added = batch.try_update(|b| b.add_files(files)).unwrap_or(0);
        if added > 0 {
            // Fresh selection: any previous outcome is stale.
            set_result.set(None);
            set_error.set(None);
        } else {
            set_error.set(Some(
                "Only PNG, JPEG, or WEBP images are accepted.".to_string(),
            ));
        }
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        if let Some(data_transfer) = ev.data_transfer() {
            if let Some(files) = data_transfer.files() {
                ingest(files);
            }
        }
    };

    let on_browse = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            ingest(files);
        }
    };

    view! {
        <div
            class="drop-zone"
            class:drop-zone-active=move || is_over.get()
            on:dragover=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                set_is_over.set(true);
            }
            on:dragleave=move |_| set_is_over.set(false)
            on:drop=on_drop
        >
            <div class="drop-zone-content">
                <p class="drop-main">"Drag and drop image files here"</p>
                <p class="drop-hint">"or"</p>
                <label for=file_input_id class="btn btn-secondary">
                    "Browse Files"
                </label>
                <input
                    type="file"
                    id=file_input_id
                    accept="image/png,image/jpeg,image/webp"
                    multiple=true
                    style="display: none"
                    on:change=on_browse
                />
                <p class="drop-formats">"Supports PNG, JPEG, WebP"</p>
            </div>
        </div>
    }
}

/// Helper to get event target value from input element
fn event_target_value_input(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|el| el.value())
        .unwrap_or_default()
}

/// Helper to get event target
fn event_target<T: wasm_bindgen::JsCast>(ev: &web_sys::Event) -> T {
    ev.target().unwrap().dyn_into::<T>().unwrap()
}

//! Details modal for one past analysis session.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::api::HistorySession;
use crate::components::copy_button::CopyButton;
use crate::consolidate::consolidate_prompts;

#[component]
pub fn SessionDetails(session: HistorySession, on_close: Callback<()>) -> impl IntoView {
    let title = session
        .session_name
        .clone()
        .unwrap_or_else(|| format!("Session {}", session.id));
    let filename = session
        .image_filename
        .clone()
        .unwrap_or_else(|| "N/A".to_string());
    let created = session
        .created_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "N/A".to_string());
    let consolidated = consolidate_prompts(&session.generated_prompts);

    view! {
        <div class="modal-overlay">
            <style>{include_str!("session_details.css")}</style>
            <div class="modal-card">
                <div class="modal-header">
                    <h2 class="modal-title">{format!("Session: {title}")}</h2>
                    <button class="modal-close" on:click=move |_| on_close.run(())>
                        "×"
                    </button>
                </div>
                <div class="modal-body">
                    <p class="modal-meta">
                        <strong>"Image: "</strong>
                        {filename}
                    </p>
                    <p class="modal-meta">
                        <strong>"Created: "</strong>
                        {created}
                    </p>
                    {if consolidated.is_empty() {
                        view! {
                            <p class="muted">"No consolidated prompt available."</p>
                        }
                            .into_any()
                    } else {
                        view! {
                            <div class="consolidated">
                                <strong class="consolidated-title">"Consolidated Prompt:"</strong>
                                <pre class="consolidated-text">{consolidated.clone()}</pre>
                                <CopyButton
                                    text=consolidated
                                    label="Copy Consolidated".to_string()
                                />
                            </div>
                        }
                            .into_any()
                    }}
                </div>
                <div class="modal-footer">
                    <button class="btn btn-primary" on:click=move |_| on_close.run(())>
                        "Close"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Render a server timestamp in the user's locale; fall back to the raw
/// string when the browser cannot parse it.
pub fn format_timestamp(value: &str) -> String {
    let parsed = js_sys::Date::new(&JsValue::from_str(value));
    if parsed.get_time().is_nan() {
        return value.to_string();
    }
    String::from(parsed.to_locale_string("default", &JsValue::UNDEFINED))
}

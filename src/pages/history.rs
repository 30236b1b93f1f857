//! Past analysis sessions, fetched from the history endpoint.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, HistorySession};
use crate::auth::session::SessionStore;
use crate::components::session_details::{format_timestamp, SessionDetails};
use crate::components::sidebar::Sidebar;
use crate::config;

const HISTORY_PAGE_SIZE: u32 = 10;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let navigate = use_navigate();
    let (sessions, set_sessions) = signal::<Vec<HistorySession>>(Vec::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);
    let (authorized, set_authorized) = signal(true);
    let (selected, set_selected) = signal::<Option<HistorySession>>(None);

    // Load history on mount. A missing or expired token never reaches the
    // server; it shows as a local sign-in prompt instead.
    spawn_local(async move {
        match session.bearer_token() {
            Some(token) => match api::fetch_history(&token, 0, HISTORY_PAGE_SIZE).await {
                Ok(list) => set_sessions.set(list),
                Err(err) => set_error.set(Some(err.to_string())),
            },
            None => {
                set_authorized.set(false);
                set_error.set(Some("Please log in to view your history.".to_string()));
            }
        }
        set_loading.set(false);
    });

    let on_sign_in = move |_| {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(&config::google_login_url()) {
                log::error!("failed to open login redirect: {err:?}");
            }
        }
    };

    view! {
        <div class="app-shell">
            <style>{include_str!("history.css")}</style>
            <Sidebar />
            <div class="content-pane">
                <header class="page-header">
                    <h1 class="page-title">"Prompt History"</h1>
                </header>
                <main class="page-body">
                    {move || {
                        if loading.get() {
                            return view! {
                                <p class="history-loading">"Loading history..."</p>
                            }
                                .into_any();
                        }

                        if let Some(message) = error.get() {
                            return view! {
                                <div class="history-error">
                                    <div class="error-banner">
                                        <strong>"Error: "</strong>
                                        {message}
                                    </div>
                                    {(!authorized.get()).then(|| view! {
                                        <button class="btn btn-primary" on:click=on_sign_in>
                                            "Sign in with Google"
                                        </button>
                                    })}
                                </div>
                            }
                                .into_any();
                        }

                        let list = sessions.get();
                        if list.is_empty() {
                            let navigate = navigate.clone();
                            view! {
                                <div class="history-empty card">
                                    <h3>"No History Found"</h3>
                                    <p class="muted">"You haven't analyzed any images yet."</p>
                                    <button
                                        class="btn btn-primary"
                                        on:click=move |_| navigate("/dashboard", Default::default())
                                    >
                                        "Analyze Your First Image"
                                    </button>
                                </div>
                            }
                                .into_any()
                        } else {
                            view! {
                                <div class="history-list">
                                    {list
                                        .into_iter()
                                        .map(|entry| {
                                            let title = entry
                                                .session_name
                                                .clone()
                                                .unwrap_or_else(|| format!("Session {}", entry.id));
                                            let filename = entry
                                                .image_filename
                                                .clone()
                                                .unwrap_or_else(|| "N/A".to_string());
                                            let created = entry
                                                .created_at
                                                .as_deref()
                                                .map(format_timestamp)
                                                .unwrap_or_else(|| "N/A".to_string());
                                            view! {
                                                <div class="history-card card">
                                                    <div class="history-card-info">
                                                        <h3 class="history-card-title">{title}</h3>
                                                        <p class="history-card-meta">
                                                            {format!("Analyzed: {filename}")}
                                                        </p>
                                                        <p class="history-card-meta">
                                                            {format!("Created: {created}")}
                                                        </p>
                                                    </div>
                                                    <button
                                                        class="btn btn-secondary btn-small"
                                                        on:click=move |_| set_selected.set(Some(entry.clone()))
                                                    >
                                                        "View Details"
                                                    </button>
                                                </div>
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                </div>
                            }
                                .into_any()
                        }
                    }}

                    {move || selected.get().map(|entry| view! {
                        <SessionDetails
                            session=entry
                            on_close=Callback::new(move |_| set_selected.set(None))
                        />
                    })}
                </main>
            </div>
        </div>
    }
}

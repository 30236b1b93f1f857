use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::session::SessionStore;
use crate::components::sidebar::Sidebar;
use crate::components::uploader::ImageUploader;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let navigate = use_navigate();

    let display_name = move || {
        session
            .state()
            .user
            .map(|user| {
                if user.display_name.is_empty() {
                    "User".to_string()
                } else {
                    user.display_name
                }
            })
            .unwrap_or_else(|| "User".to_string())
    };

    let on_sign_out = move |_| {
        session.logout();
        navigate("/", Default::default());
    };

    view! {
        <div class="app-shell">
            <style>{include_str!("dashboard.css")}</style>
            <Sidebar />
            <div class="content-pane">
                <header class="page-header">
                    <h1 class="page-title">"Dashboard"</h1>
                    <div class="header-user">
                        <span class="welcome">"Welcome, " {display_name}</span>
                        <button class="btn btn-danger btn-small" on:click=on_sign_out>
                            "Sign Out"
                        </button>
                    </div>
                </header>
                <main class="page-body">
                    <ImageUploader />
                </main>
            </div>
        </div>
    }
}

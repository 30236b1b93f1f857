use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::auth::gate::{self, Access};
use crate::auth::session::{BrowserTokenStorage, SessionStore};
use crate::pages::auth_callback::AuthCallbackPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::history::HistoryPage;
use crate::pages::landing::LandingPage;

#[component]
pub fn App() -> impl IntoView {
    let session = SessionStore::new(Rc::new(BrowserTokenStorage));
    // Restore any persisted session before the router takes its first
    // gating decision.
    session.initialize();
    provide_context(session);

    view! {
        <Router>
            <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                <Route path=path!("/") view=LandingPage />
                <Route path=path!("/auth/callback") view=AuthCallbackPage />
                <Route
                    path=path!("/dashboard")
                    view=|| view! { <RequireAuth><DashboardPage /></RequireAuth> }
                />
                <Route
                    path=path!("/history")
                    view=|| view! { <RequireAuth><HistoryPage /></RequireAuth> }
                />
            </Routes>
        </Router>
    }
}

/// Renders its children only when the route gate allows; otherwise lands on
/// the anonymous surface with no error reported.
#[component]
fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionStore>();

    view! {
        <Show
            when=move || {
                matches!(
                    gate::can_enter(&session.state(), session.storage_has_token()),
                    Access::Allow
                )
            }
            fallback=|| view! { <Redirect path=gate::LANDING_PATH /> }
        >
            {children()}
        </Show>
    }
}

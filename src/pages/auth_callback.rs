//! Identity-provider return path.
//!
//! The provider redirects here with the bearer token as a `token` query
//! parameter. A missing parameter or an undecodable token counts as a
//! failed login attempt and lands back on the anonymous surface.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::auth::session::SessionStore;

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let query = use_query_map();
    let navigate = use_navigate();

    Effect::new(move |_| {
        let token = query.with(|params| params.get("token"));
        match token.filter(|token| !token.is_empty()) {
            Some(token) => match session.login(&token) {
                Ok(()) => navigate("/dashboard", Default::default()),
                Err(err) => {
                    log::error!("login failed: {err}");
                    navigate("/", Default::default());
                }
            },
            None => {
                log::error!("auth callback reached without a token parameter");
                navigate("/", Default::default());
            }
        }
    });

    view! {
        <div class="processing-screen">
            <h2>"Processing login..."</h2>
            <p>"Please wait while we redirect you."</p>
        </div>
    }
}

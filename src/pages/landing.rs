use leptos::prelude::*;

use crate::config;

#[component]
pub fn LandingPage() -> impl IntoView {
    // The identity provider owns the login flow; we just hand the window
    // over and wait for the callback route.
    let on_get_started = move |_| {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_href(&config::google_login_url()) {
                log::error!("failed to open login redirect: {err:?}");
            }
        }
    };

    view! {
        <div class="landing-page">
            <style>{include_str!("landing.css")}</style>

            <p class="landing-brand">"VoidCoder"</p>

            <h1 class="landing-headline">
                "Create Powerful Prompts for AI Coding Tools"
            </h1>
            <p class="landing-tagline">
                "VoidCoder translates UI designs into actionable prompts, \
                 accelerating your AI-assisted development."
            </p>

            <button class="btn btn-primary btn-large" on:click=on_get_started>
                "Get Started with Google"
            </button>

            <footer class="landing-footer">
                <p>"© VoidCoder. All rights reserved."</p>
            </footer>
        </div>
    }
}

//! Copy-to-clipboard button with a transient confirmation label.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};

const COPIED_RESET_MS: u32 = 1_500;

/// Writes `text` to the platform clipboard on click. Success flips the
/// label to "Copied!" and reverts it after a short delay; rapid clicks each
/// start their own revert timer and the latest one wins. Failure is logged,
/// never thrown.
#[component]
pub fn CopyButton(text: String, label: String) -> impl IntoView {
    let (copied, set_copied) = signal(false);

    let on_copy = move |_| {
        let text = text.clone();
        spawn_local(async move {
            match write_clipboard(&text).await {
                Ok(()) => {
                    set_copied.set(true);
                    TimeoutFuture::new(COPIED_RESET_MS).await;
                    set_copied.set(false);
                }
                Err(err) => log::error!("failed to copy to clipboard: {err:?}"),
            }
        });
    };

    view! {
        <button class="btn btn-copy" on:click=on_copy>
            {move || if copied.get() { "Copied!".to_string() } else { label.clone() }}
        </button>
    }
}

async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    JsFuture::from(window.navigator().clipboard().write_text(text)).await?;
    Ok(())
}

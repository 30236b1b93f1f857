mod api;
mod app;
mod auth;
mod components;
mod config;
mod consolidate;
mod pages;
mod upload;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("VoidCoder client starting");

    leptos::mount::mount_to_body(App);
}

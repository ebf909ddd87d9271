mod app;
mod calendar;
mod error;
mod pages;
mod routing;
mod session;
mod supabase;
mod types;

use leptos::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    mount_to_body(app::App);
}

#![recursion_limit = "1024"]

mod app;
mod config;
mod hooks;
mod page;
mod services;
mod settings;
mod status;
mod tasks;

use wasm_bindgen::prelude::*;

pub fn main() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    browser_panic_hook::set_once_default();
    yew::Renderer::<app::Application>::new().render();
    Ok(())
}

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use amp_core::AmpEngine;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod host;
mod observe;
mod page;
mod surface;

use host::WebHost;
use page::WatchedNode;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("amp-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let engine = Rc::new(RefCell::new(AmpEngine::new(WebHost::new())));

    engine
        .borrow_mut()
        .scan(&WatchedNode(document.clone().into()));

    observe::install(&document, engine.clone())
        .map_err(|e| anyhow::anyhow!("watch install: {:?}", e))?;

    // Pages without the extension runtime still get the watch and the
    // startup scan; only the remote control is missing.
    if let Err(e) = surface::install(engine) {
        log::debug!("[surface] control channel unavailable: {:?}", e);
    }

    Ok(())
}

//! Runtime message channel: requests in, one response out per request.

use std::cell::RefCell;
use std::rc::Rc;

use amp_core::{AmpEngine, Request, Response};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::host::WebHost;

#[wasm_bindgen]
extern "C" {
    /// chrome.runtime.onMessage.addListener, looked up at call time so pages
    /// without the extension runtime fail the install call instead of the
    /// module load.
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(listener: &js_sys::Function) -> Result<(), JsValue>;
}

/// Hook the runtime message channel to the engine.
pub fn install(engine: Rc<RefCell<AmpEngine<WebHost>>>) -> Result<(), JsValue> {
    let listener = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| -> bool {
            let request = parse(&message);
            let response = engine.borrow_mut().handle(request);
            respond(&send_response, &response);
            // Returning true keeps the reply channel open for the response
            // already sent above.
            true
        },
    )
        as Box<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);

    add_message_listener(listener.as_ref().unchecked_ref())?;
    listener.forget();
    log::debug!("[surface] message listener installed");
    Ok(())
}

/// Malformed payloads degrade to `Unknown` so the sender still gets its
/// (empty) reply.
#[allow(deprecated)]
fn parse(message: &JsValue) -> Request {
    message.into_serde().unwrap_or(Request::Unknown)
}

#[allow(deprecated)]
fn respond(send_response: &js_sys::Function, response: &Response) {
    match JsValue::from_serde(response) {
        Ok(payload) => {
            if let Err(e) = send_response.call1(&JsValue::NULL, &payload) {
                log::debug!("[surface] reply delivery failed: {:?}", e);
            }
        }
        Err(e) => {
            log::debug!("[surface] reply encode failed: {}", e);
            _ = send_response.call1(&JsValue::NULL, &js_sys::Object::new());
        }
    }
}

//! Document-wide watch for inserted and removed nodes.

use std::cell::RefCell;
use std::rc::Rc;

use amp_core::AmpEngine;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::host::WebHost;
use crate::page::WatchedNode;

fn watched(list: web::NodeList) -> Vec<WatchedNode> {
    let mut nodes = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(node) = list.get(i) {
            nodes.push(WatchedNode(node));
        }
    }
    nodes
}

/// Stand a subtree child-list watch over the whole document for the life of
/// the page, feeding insertion and removal batches to the engine.
pub fn install(
    document: &web::Document,
    engine: Rc<RefCell<AmpEngine<WebHost>>>,
) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(
        move |records: js_sys::Array, _observer: web::MutationObserver| {
            for record in records.iter() {
                if let Ok(record) = record.dyn_into::<web::MutationRecord>() {
                    let added = watched(record.added_nodes());
                    if !added.is_empty() {
                        engine.borrow_mut().on_inserted(&added);
                    }
                    let removed = watched(record.removed_nodes());
                    if !removed.is_empty() {
                        engine.borrow_mut().on_removed(&removed);
                    }
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);

    let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = web::MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(document, &init)?;

    // The callback lives for the whole page lifetime.
    callback.forget();
    log::debug!("[watch] document watch installed");
    Ok(())
}

//! DOM node wrappers giving the engine its page view.

use amp_core::{MediaSearch, PageNode};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Selector covering the qualifying media tag types.
const MEDIA_SELECTOR: &str = "video, audio";

/// One DOM node as delivered by the page watch, or the document root at
/// startup.
#[derive(Clone)]
pub struct WatchedNode(pub web::Node);

/// Subtree query scope. Only element and document nodes can be searched;
/// text and comment nodes have no query surface.
pub enum SearchScope {
    Element(web::Element),
    Document(web::Document),
}

impl PageNode for WatchedNode {
    type Media = web::HtmlMediaElement;
    type Search = SearchScope;

    fn as_media(&self) -> Option<web::HtmlMediaElement> {
        self.0.dyn_ref::<web::HtmlMediaElement>().cloned()
    }

    fn as_searchable(&self) -> Option<SearchScope> {
        if let Some(element) = self.0.dyn_ref::<web::Element>() {
            return Some(SearchScope::Element(element.clone()));
        }
        if let Some(document) = self.0.dyn_ref::<web::Document>() {
            return Some(SearchScope::Document(document.clone()));
        }
        None
    }
}

impl MediaSearch for SearchScope {
    type Media = web::HtmlMediaElement;

    fn find_media(&self) -> Vec<web::HtmlMediaElement> {
        let list = match self {
            SearchScope::Element(element) => element.query_selector_all(MEDIA_SELECTOR),
            SearchScope::Document(document) => document.query_selector_all(MEDIA_SELECTOR),
        };
        let mut found = Vec::new();
        if let Ok(list) = list {
            for i in 0..list.length() {
                if let Some(node) = list.get(i) {
                    if let Ok(media) = node.dyn_into::<web::HtmlMediaElement>() {
                        found.push(media);
                    }
                }
            }
        }
        found
    }
}

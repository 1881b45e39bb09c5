//! Annotator: inline marker splicing for matched text nodes
//!
//! Each eligible text node is split around its matches, left to right, into
//! a DocumentFragment of verbatim text pieces and interactive markers, which
//! then replaces the original node. A region is fingerprinted into the
//! visited set before splicing; a repeated fingerprint means the region was
//! already transformed in an earlier pass and is left untouched.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, Text};

use crate::matcher;
use crate::popup;
use crate::visited::{VisitedSet, VisitedStats};

use super::{BADGE_SVG, CONTAINER_CLASS, LOGO_CLASS, TEXT_CLASS};

thread_local! {
    static VISITED: RefCell<VisitedSet> = RefCell::new(VisitedSet::new());
}

/// Visited-set counters (exposed through the crate status report)
pub fn visited_stats() -> VisitedStats {
    VISITED.with(|v| v.borrow().stats())
}

/// Scan the document body and annotate every eligible text node.
/// Returns the number of markers created.
pub fn annotate_page(document: &Document) -> Result<usize, JsValue> {
    let body = match document.body() {
        Some(b) => b,
        None => return Ok(0),
    };

    let nodes = super::scan::collect_matching_text_nodes(document, &body)?;
    let mut markers = 0;
    for node in &nodes {
        markers += annotate_text_node(document, node)?;
    }
    Ok(markers)
}

/// Split one text node around its matches and splice markers in place.
/// Returns the number of markers created (0 when the region was already
/// visited or the node no longer matches).
pub fn annotate_text_node(document: &Document, text_node: &Text) -> Result<usize, JsValue> {
    let parent = match text_node.parent_element() {
        Some(p) => p,
        None => return Ok(0),
    };

    let text = text_node.text_content().unwrap_or_default();
    let matches = matcher::with_matcher(|m| m.find_all(&text));
    if matches.is_empty() {
        return Ok(0);
    }

    let first_visit = VISITED.with(|v| {
        v.borrow_mut()
            .mark(&text, &parent.tag_name(), &parent.class_name())
    });
    if !first_visit {
        return Ok(0);
    }

    let fragment = document.create_document_fragment();
    let mut last = 0;
    for mat in &matches {
        if mat.start > last {
            fragment.append_child(&document.create_text_node(&text[last..mat.start]))?;
        }
        let marker = build_marker(document, &mat.matched_text, &mat.identifier)?;
        fragment.append_child(&marker)?;
        last = mat.end;
    }
    if last < text.len() {
        fragment.append_child(&document.create_text_node(&text[last..]))?;
    }

    parent.replace_child(&fragment, text_node)?;
    Ok(matches.len())
}

/// Build one interactive marker: clickable original text plus badge icon,
/// both wired to the same activation handler
fn build_marker(
    document: &Document,
    matched_text: &str,
    orcid_id: &str,
) -> Result<Element, JsValue> {
    let container = document.create_element("span")?;
    container.set_class_name(CONTAINER_CLASS);
    container.set_attribute("style", "position: relative; display: inline;")?;

    let text_span = document.create_element("span")?;
    text_span.set_class_name(TEXT_CLASS);
    text_span.set_text_content(Some(matched_text));
    text_span.set_attribute(
        "style",
        "cursor: pointer; color: #A6CE39; text-decoration: underline;",
    )?;
    text_span.set_attribute("title", "Click to view ORCID profile")?;

    let logo_span = document.create_element("span")?;
    logo_span.set_class_name(LOGO_CLASS);
    logo_span.set_inner_html(BADGE_SVG);
    logo_span.set_attribute("title", "View ORCID profile")?;

    let id = orcid_id.to_string();
    let anchor = container.clone();
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        event.stop_propagation();
        popup::show(&id, &anchor);
    });
    text_span.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    logo_span.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    // Marker handlers live for the page session
    handler.forget();

    container.append_child(&text_span)?;
    container.append_child(&logo_span)?;

    Ok(container)
}

//! Link augmentation for existing orcid.org hyperlinks
//!
//! Pages frequently already link identifiers through the ORCID badge image
//! (e.g. `orcid_16x16.png`). Those links keep working untouched; a clickable
//! badge is appended right after each one, wired to the same popup
//! activation as inline markers. Augmented links are marked with an
//! attribute so later passes skip them.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::matcher;
use crate::popup;

use super::{is_own_element, BADGE_SVG, EXTERNAL_LOGO_CLASS, PROCESSED_ATTR};

/// Augment every qualifying orcid.org link under the document.
/// Returns the number of badges appended.
pub fn augment_links(document: &Document) -> Result<usize, JsValue> {
    let links = document.query_selector_all("a[href*=\"orcid.org/\"]")?;

    let mut appended = 0;
    for i in 0..links.length() {
        let node = match links.item(i) {
            Some(n) => n,
            None => continue,
        };
        let link: Element = match node.dyn_into() {
            Ok(e) => e,
            Err(_) => continue,
        };

        if link.has_attribute(PROCESSED_ATTR) || is_own_element(&link) {
            continue;
        }

        let href = match link.get_attribute("href") {
            Some(h) => h,
            None => continue,
        };
        let orcid_id = match matcher::with_matcher(|m| m.id_from_href(&href)) {
            Some(id) => id,
            None => continue,
        };

        // Only links that visibly carry the ORCID badge image qualify
        if link.query_selector("img[src*=\"orcid\"]")?.is_none() {
            continue;
        }

        link.set_attribute(PROCESSED_ATTR, "1")?;

        let badge = build_external_badge(document, &orcid_id)?;
        if let Some(parent) = link.parent_node() {
            parent.insert_before(&badge, link.next_sibling().as_ref())?;
            appended += 1;
        }
    }
    Ok(appended)
}

fn build_external_badge(document: &Document, orcid_id: &str) -> Result<Element, JsValue> {
    let badge = document.create_element("span")?;
    badge.set_class_name(EXTERNAL_LOGO_CLASS);
    badge.set_attribute("style", "margin-left: 4px; display: inline-block;")?;
    badge.set_inner_html(BADGE_SVG);
    badge.set_attribute("title", "View ORCID profile details")?;

    let id = orcid_id.to_string();
    let anchor = badge.clone();
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        event.stop_propagation();
        popup::show(&id, &anchor);
    });
    badge.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();

    Ok(badge)
}

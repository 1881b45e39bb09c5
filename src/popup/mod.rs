//! Popup Presenter: loading -> {success, error} -> closed
//!
//! One popup at most exists at any time; every activation tears down the
//! previous popup before attaching its own. A monotonic activation token is
//! checked after the profile fetch settles, so a stale resolution (its
//! marker was superseded by a newer click) is dropped without touching the
//! DOM. The outside-click teardown listener is installed while a popup is
//! open and removed with it.

pub mod position;
pub mod view;

use std::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Document, Element, Event};

use crate::dom::{OWN_ROOTS_SELECTOR, POPUP_CLASS};
use crate::profile::fetch;
use crate::profile::summary::ProfileView;

thread_local! {
    // Monotonic activation counter; a resolution applies only while its
    // token is still the latest.
    static ACTIVATION: Cell<u64> = Cell::new(0);
    static OUTSIDE_CLICK: RefCell<Option<Closure<dyn FnMut(Event)>>> = RefCell::new(None);
}

/// Activation entry point for markers and badges. Runs the whole
/// loading/fetch/replace flow on the event loop; failures land in the
/// console, never in the host page.
pub fn show(orcid_id: &str, target: &Element) {
    let orcid_id = orcid_id.to_string();
    let target = target.clone();
    spawn_local(async move {
        if let Err(e) = activate(&orcid_id, &target).await {
            console::error_2(
                &JsValue::from_str("[OrcidDetector] popup activation failed"),
                &e,
            );
        }
    });
}

async fn activate(orcid_id: &str, target: &Element) -> Result<(), JsValue> {
    let document = current_document()?;
    let token = ACTIVATION.with(|t| {
        let next = t.get() + 1;
        t.set(next);
        next
    });

    close_popups(&document)?;

    let loading = view::build_loading(&document)?;
    attach(&document, &loading, target)?;

    let fetched = fetch::fetch_profile(orcid_id).await;

    if ACTIVATION.with(|t| t.get()) != token {
        // A newer activation owns the popup slot; drop this resolution
        return Ok(());
    }

    loading.remove();

    let popup = match fetched {
        Ok(summary) => {
            view::build_profile(&document, orcid_id, &ProfileView::from_summary(&summary))?
        }
        Err(e) => view::build_error(&document, orcid_id, &describe(&e))?,
    };
    present(&document, &popup, target)
}

/// Attach a built popup near its activation target and arm the
/// outside-click teardown listener
pub fn present(document: &Document, popup: &Element, target: &Element) -> Result<(), JsValue> {
    attach(document, popup, target)?;
    install_outside_click(document)
}

fn attach(document: &Document, popup: &Element, target: &Element) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(popup)?;
    position::place(popup, target)
}

/// Tear down any open popup; safe to call when none is open
pub fn close_all() {
    if let Ok(document) = current_document() {
        if let Err(e) = close_popups(&document) {
            console::error_2(
                &JsValue::from_str("[OrcidDetector] popup teardown failed"),
                &e,
            );
        }
    }
}

fn close_popups(document: &Document) -> Result<(), JsValue> {
    let popups = document.query_selector_all(&format!(".{}", POPUP_CLASS))?;
    for i in 0..popups.length() {
        if let Some(node) = popups.item(i) {
            if let Ok(popup) = node.dyn_into::<Element>() {
                popup.remove();
            }
        }
    }
    if let Some(handler) = OUTSIDE_CLICK.with(|slot| slot.borrow_mut().take()) {
        document.remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    }
    Ok(())
}

fn install_outside_click(document: &Document) -> Result<(), JsValue> {
    if OUTSIDE_CLICK.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let target = match event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => return,
        };
        if target.closest(OWN_ROOTS_SELECTOR).ok().flatten().is_none() {
            close_all();
        }
    });
    document.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    OUTSIDE_CLICK.with(|slot| *slot.borrow_mut() = Some(handler));
    Ok(())
}

fn current_document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

fn describe(error: &JsValue) -> String {
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    error
        .as_string()
        .unwrap_or_else(|| "profile request failed".to_string())
}

//! Change Watcher: mutation-driven incremental re-scanning
//!
//! A MutationObserver on `document.body` (childList + subtree) notices
//! dynamically inserted content. Nodes created by this crate never qualify,
//! which breaks the feedback loop between the annotator and the observer.
//! Qualifying additions restart a single shared 500 ms timer; when it
//! elapses, link augmentation and a fresh scan-and-annotate pass run over
//! the whole body. At most one timer is ever pending.

use std::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

use crate::dom;

/// Debounce window between a qualifying mutation and the re-scan
pub const DEBOUNCE_MS: i32 = 500;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

thread_local! {
    static OBSERVER: RefCell<Option<(MutationObserver, ObserverCallback)>> =
        RefCell::new(None);
    static RESCAN_TIMER: Cell<Option<i32>> = const { Cell::new(None) };
    static RESCAN_TASK: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

/// Start observing body mutations. Idempotent; a second call is a no-op.
pub fn start(document: &Document) -> Result<(), JsValue> {
    if OBSERVER.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            if has_new_content(&records) {
                schedule_rescan();
            }
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&body, &options)?;

    OBSERVER.with(|slot| *slot.borrow_mut() = Some((observer, callback)));
    Ok(())
}

/// Does any record add content this crate did not generate itself?
fn has_new_content(records: &js_sys::Array) -> bool {
    for record in records.iter() {
        let record: MutationRecord = match record.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if record.type_() != "childList" {
            continue;
        }
        let added = record.added_nodes();
        for i in 0..added.length() {
            let node = match added.item(i) {
                Some(n) => n,
                None => continue,
            };
            if let Some(element) = node.dyn_ref::<Element>() {
                if dom::is_own_element(element) {
                    continue;
                }
                return true;
            }
            if node.node_type() == Node::TEXT_NODE {
                return true;
            }
        }
    }
    false
}

/// Cancel-and-replace the shared debounce timer
fn schedule_rescan() {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    if let Some(handle) = RESCAN_TIMER.with(|t| t.take()) {
        window.clear_timeout_with_handle(handle);
    }

    RESCAN_TASK.with(|task| {
        let mut slot = task.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            Closure::<dyn FnMut()>::new(|| {
                RESCAN_TIMER.with(|t| t.set(None));
                if let Err(e) = rescan() {
                    console::error_2(&JsValue::from_str("[OrcidDetector] re-scan failed"), &e);
                }
            })
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            DEBOUNCE_MS,
        ) {
            Ok(handle) => RESCAN_TIMER.with(|t| t.set(Some(handle))),
            Err(e) => console::error_2(&JsValue::from_str("[OrcidDetector] timer failed"), &e),
        }
    });
}

fn rescan() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    crate::run_pass(&document)
}

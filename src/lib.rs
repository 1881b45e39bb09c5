//! ORCID ID Detector: in-page identifier scanning + profile preview
//!
//! A Rust/WASM implementation of the ORCID detector content library. It runs
//! inside a host page's document context, finds ORCID iDs in rendered text,
//! turns them into interactive markers, and shows a profile popup on demand.
//!
//! # Architecture
//!
//! - `matcher.rs` - OrcidMatcher: identifier pattern detection (Regex)
//! - `visited.rs` - VisitedSet: content-addressable processed-region tracking
//! - `dom/scan.rs` - text-node snapshot walker with exclusion policy
//! - `dom/annotate.rs` - inline marker splicing for matched text
//! - `dom/links.rs` - badge augmentation of existing orcid.org links
//! - `profile/` - ProfileFetcher: 5 concurrent registry lookups + cache,
//!   and the ProfileView render model
//! - `popup/` - Popup Presenter: loading/success/error popup lifecycle
//! - `watch.rs` - Change Watcher: debounced mutation-driven re-scans
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { init as startDetector } from 'orcid-detector';
//!
//! await init();
//!
//! // Idempotent: safe to call again if the script is injected twice
//! startDetector();
//! ```

pub mod dom;
pub mod matcher;
pub mod popup;
pub mod profile;
pub mod visited;
pub mod watch;

// Public exports - pure layers
pub use matcher::*;
pub use profile::*;
pub use visited::*;

use std::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("orcid-detector v{}", env!("CARGO_PKG_VERSION"))
}

// Process-wide already-loaded guard: the host may inject the script more
// than once, and only the first injection may wire the page.
thread_local! {
    static LOADED: Cell<bool> = const { Cell::new(false) };
}

/// Wire the detector into the current document. Idempotent: repeated calls
/// after the first are no-ops. When the document is still loading, startup
/// is deferred to `DOMContentLoaded`.
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    if LOADED.with(|loaded| loaded.replace(true)) {
        return Ok(());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    if document.ready_state() == "loading" {
        let callback = Closure::<dyn FnMut()>::new(|| {
            if let Err(e) = run() {
                console::error_2(&JsValue::from_str("[OrcidDetector] startup failed"), &e);
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            callback.as_ref().unchecked_ref(),
        )?;
        callback.forget();
        return Ok(());
    }

    run()
}

fn run() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    console::log_1(&JsValue::from_str("[OrcidDetector] initializing"));

    run_pass(&document)?;
    watch::start(&document)?;

    console::log_1(&JsValue::from_str("[OrcidDetector] initialized"));
    Ok(())
}

/// One full pass: augment existing orcid.org links, then scan and annotate
/// page text. Also the body of every debounced re-scan.
pub fn run_pass(document: &Document) -> Result<(), JsValue> {
    dom::links::augment_links(document)?;
    dom::annotate::annotate_page(document)?;
    Ok(())
}

/// Get detector status
#[wasm_bindgen]
pub fn status() -> JsValue {
    let visited = dom::annotate::visited_stats();
    let status = serde_json::json!({
        "loaded": LOADED.with(|loaded| loaded.get()),
        "visited_regions": visited.entries,
        "visited_checks": visited.check_count,
        "visited_skips": visited.skip_count,
        "cached_profiles": profile::fetch::cache_len(),
    });

    JsValue::from_str(&status.to_string())
}

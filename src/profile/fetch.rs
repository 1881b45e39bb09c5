//! Profile Fetcher: registry lookups with a page-session cache
//!
//! Resolves an identifier to a [`ProfileSummary`] by issuing five concurrent
//! GETs against the public registry. Each sub-fetch that fails (network
//! error, non-2xx status, unreadable body, bad JSON) degrades to a `None`
//! section. A summary with no sections at all is a total resolution failure
//! and propagates as an error instead of being cached, as does a missing
//! fetch layer. Resolved summaries are cached by identifier for the page
//! session and never evicted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{console, Request, RequestInit, Response, Window};

use super::summary::ProfileSummary;

/// Public registry base URL
pub const REGISTRY_BASE: &str = "https://pub.orcid.org";

/// Sub-resources fetched per identifier, in `ProfileSummary` field order
pub const RESOURCES: [&str; 5] = ["person", "works", "employments", "educations", "fundings"];

thread_local! {
    static PROFILE_CACHE: RefCell<HashMap<String, Rc<ProfileSummary>>> =
        RefCell::new(HashMap::new());
}

/// Endpoint for one sub-resource lookup
pub fn endpoint_url(orcid_id: &str, resource: &str) -> String {
    format!("{}/v3.0/{}/{}", REGISTRY_BASE, orcid_id, resource)
}

/// Cache lookup by exact identifier
pub fn cached(orcid_id: &str) -> Option<Rc<ProfileSummary>> {
    PROFILE_CACHE.with(|cache| cache.borrow().get(orcid_id).cloned())
}

fn store(orcid_id: &str, summary: Rc<ProfileSummary>) {
    PROFILE_CACHE.with(|cache| {
        cache.borrow_mut().insert(orcid_id.to_string(), summary);
    });
}

/// Number of cached summaries
pub fn cache_len() -> usize {
    PROFILE_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
fn reset_cache() {
    PROFILE_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Resolve an identifier to a profile summary.
///
/// Cache hit returns immediately with no network activity. On a miss, all
/// five sub-fetches run concurrently and the summary is assembled once every
/// one has settled, then cached before being returned. When every sub-fetch
/// degraded, the resolution fails as a whole and nothing is cached.
pub async fn fetch_profile(orcid_id: &str) -> Result<Rc<ProfileSummary>, JsValue> {
    if let Some(hit) = cached(orcid_id) {
        return Ok(hit);
    }

    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;

    // Each sub-fetch always resolves (to the body text or null), so the
    // combined promise settles only when all five have, and never rejects
    // on a partial failure.
    let promises = Array::new();
    for resource in RESOURCES {
        let url = endpoint_url(orcid_id, resource);
        let win = window.clone();
        promises.push(&future_to_promise(async move {
            Ok(match fetch_section(&win, &url).await {
                Some(body) => JsValue::from_str(&body),
                None => JsValue::NULL,
            })
        }));
    }

    let settled = JsFuture::from(Promise::all(&promises)).await?;
    let settled: Array = settled.dyn_into()?;

    let mut sections = settled.iter().map(|v| {
        v.as_string()
            .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
    });

    let summary = ProfileSummary {
        person: sections.next().flatten(),
        works: sections.next().flatten(),
        employments: sections.next().flatten(),
        educations: sections.next().flatten(),
        fundings: sections.next().flatten(),
    };

    finalize(orcid_id, summary).map_err(|reason| JsValue::from_str(&reason))
}

/// Reject an all-`None` summary as a total resolution failure; anything
/// with at least one section is cached and returned
fn finalize(orcid_id: &str, summary: ProfileSummary) -> Result<Rc<ProfileSummary>, String> {
    if summary.is_empty() {
        return Err(format!("All profile lookups failed for {}", orcid_id));
    }
    let summary = Rc::new(summary);
    store(orcid_id, Rc::clone(&summary));
    Ok(summary)
}

/// One sub-resource fetch; every failure path collapses to `None`
async fn fetch_section(window: &Window, url: &str) -> Option<String> {
    match try_fetch(window, url).await {
        Ok(body) => body,
        Err(e) => {
            console::warn_2(
                &JsValue::from_str(&format!("[OrcidDetector] sub-fetch failed: {}", url)),
                &e,
            );
            None
        }
    }
}

async fn try_fetch(window: &Window, url: &str) -> Result<Option<String>, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Accept", "application/json")?;

    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;
    if !response.ok() {
        return Ok(None);
    }

    let body = JsFuture::from(response.text()?).await?;
    Ok(body.as_string())
}

// ==================== TESTS ====================

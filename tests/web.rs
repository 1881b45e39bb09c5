//! Browser-side DOM scenarios (wasm-bindgen-test, run_in_browser)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use web_sys::{Document, Element};

use orcid_detector::dom::{annotate, links, CONTAINER_CLASS, EXTERNAL_LOGO_CLASS, PROCESSED_ATTR};
use orcid_detector::popup::view;
use orcid_detector::profile::summary::{ProfileSummary, ProfileView};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn host_with_html(html: &str) -> Element {
    let doc = document();
    let host = doc.create_element("div").unwrap();
    host.set_inner_html(html);
    doc.body().unwrap().append_child(&host).unwrap();
    host
}

fn host_with_text(text: &str) -> Element {
    let doc = document();
    let host = doc.create_element("div").unwrap();
    host.set_text_content(Some(text));
    doc.body().unwrap().append_child(&host).unwrap();
    host
}

#[wasm_bindgen_test]
fn inline_annotation_preserves_surrounding_text() {
    let doc = document();
    let host = host_with_text("Contact: 0000-0002-1825-0097 for details");

    annotate::annotate_page(&doc).unwrap();

    let markers = host
        .query_selector_all(&format!(".{}", CONTAINER_CLASS))
        .unwrap();
    assert_eq!(markers.length(), 1);

    let marker_text = host
        .query_selector(".orcid-detector-text")
        .unwrap()
        .unwrap()
        .text_content()
        .unwrap();
    assert_eq!(marker_text, "0000-0002-1825-0097");

    // The host's visible text is byte-for-byte what it was
    assert_eq!(
        host.text_content().unwrap(),
        "Contact: 0000-0002-1825-0097 for details"
    );

    host.remove();
}

#[wasm_bindgen_test]
fn second_pass_is_idempotent() {
    let doc = document();
    let host = host_with_text("Repeated pass target 0000-0001-5109-3700 here");

    annotate::annotate_page(&doc).unwrap();
    let after_first = host
        .query_selector_all(&format!(".{}", CONTAINER_CLASS))
        .unwrap()
        .length();

    annotate::annotate_page(&doc).unwrap();
    let after_second = host
        .query_selector_all(&format!(".{}", CONTAINER_CLASS))
        .unwrap()
        .length();

    assert_eq!(after_first, 1);
    assert_eq!(after_second, 1);

    host.remove();
}

#[wasm_bindgen_test]
fn multiple_matches_in_one_text_node() {
    let doc = document();
    let text = "A: 0000-0002-7183-4567 and B: https://orcid.org/0000-0003-1415-9268.";
    let host = host_with_text(text);

    annotate::annotate_page(&doc).unwrap();

    let markers = host
        .query_selector_all(&format!(".{}", CONTAINER_CLASS))
        .unwrap();
    assert_eq!(markers.length(), 2);
    assert_eq!(host.text_content().unwrap(), text);

    host.remove();
}

#[wasm_bindgen_test]
fn script_content_is_not_annotated() {
    let doc = document();
    let host = host_with_html("<script>var id = '0000-0002-9079-5930';</script>");

    annotate::annotate_page(&doc).unwrap();

    assert!(host
        .query_selector(&format!(".{}", CONTAINER_CLASS))
        .unwrap()
        .is_none());

    host.remove();
}

#[wasm_bindgen_test]
fn badge_link_gets_external_badge_once() {
    let doc = document();
    let host = host_with_html(
        "<a href=\"https://orcid.org/0000-0002-4317-1836\">\
         <img src=\"https://orcid.org/sites/default/files/images/orcid_16x16.png\"></a>",
    );

    links::augment_links(&doc).unwrap();
    links::augment_links(&doc).unwrap();

    let badges = host
        .query_selector_all(&format!(".{}", EXTERNAL_LOGO_CLASS))
        .unwrap();
    assert_eq!(badges.length(), 1);

    let link = host.query_selector("a").unwrap().unwrap();
    assert!(link.has_attribute(PROCESSED_ATTR));
    // Original link untouched
    assert_eq!(
        link.get_attribute("href").unwrap(),
        "https://orcid.org/0000-0002-4317-1836"
    );

    host.remove();
}

#[wasm_bindgen_test]
fn plain_link_without_badge_image_is_skipped() {
    let doc = document();
    let host = host_with_html("<a href=\"https://orcid.org/0000-0001-7857-2795\">profile</a>");

    links::augment_links(&doc).unwrap();

    assert!(host
        .query_selector(&format!(".{}", EXTERNAL_LOGO_CLASS))
        .unwrap()
        .is_none());

    host.remove();
}

#[wasm_bindgen_test]
fn error_popup_names_identifier_and_links_out() {
    let doc = document();
    let popup = view::build_error(&doc, "0000-0002-1825-0097", "all lookups failed").unwrap();

    let text = popup.text_content().unwrap();
    assert!(text.contains("0000-0002-1825-0097"));
    assert!(text.contains("all lookups failed"));

    let fallback = popup.query_selector("a").unwrap().unwrap();
    assert_eq!(
        fallback.get_attribute("href").unwrap(),
        "https://orcid.org/0000-0002-1825-0097"
    );
}

#[wasm_bindgen_test]
fn close_all_removes_every_popup() {
    let doc = document();
    let body = doc.body().unwrap();

    // Two stray popups; teardown must leave zero, restoring the
    // at-most-one invariant for the next activation
    body.append_child(&view::build_loading(&doc).unwrap()).unwrap();
    body.append_child(&view::build_loading(&doc).unwrap()).unwrap();

    orcid_detector::popup::close_all();

    let remaining = doc.query_selector_all(".orcid-detector-popup").unwrap();
    assert_eq!(remaining.length(), 0);
}

fn bubbling_click() -> web_sys::Event {
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    web_sys::Event::new_with_event_init_dict("click", &init).unwrap()
}

fn popup_count(doc: &Document) -> u32 {
    doc.query_selector_all(".orcid-detector-popup").unwrap().length()
}

#[wasm_bindgen_test]
fn outside_click_removes_popup_inside_click_keeps_it() {
    let doc = document();
    let body = doc.body().unwrap();

    let anchor = doc.create_element("span").unwrap();
    body.append_child(&anchor).unwrap();

    let popup = view::build_error(&doc, "0000-0003-4614-2353", "lookup failed").unwrap();
    orcid_detector::popup::present(&doc, &popup, &anchor).unwrap();
    assert_eq!(popup_count(&doc), 1);

    // A click landing inside the popup leaves it open
    popup.dispatch_event(&bubbling_click()).unwrap();
    assert_eq!(popup_count(&doc), 1);

    // A click outside both popup and markers tears it down
    body.dispatch_event(&bubbling_click()).unwrap();
    assert_eq!(popup_count(&doc), 0);

    anchor.remove();
}

#[wasm_bindgen_test]
fn marker_click_does_not_close_popup() {
    let doc = document();
    let body = doc.body().unwrap();

    let host = host_with_text("Marker target 0000-0001-8271-5617 here");
    annotate::annotate_page(&doc).unwrap();
    let marker = host
        .query_selector(&format!(".{}", CONTAINER_CLASS))
        .unwrap()
        .unwrap();

    let anchor = doc.create_element("span").unwrap();
    body.append_child(&anchor).unwrap();
    let popup = view::build_error(&doc, "0000-0001-8271-5617", "lookup failed").unwrap();
    orcid_detector::popup::present(&doc, &popup, &anchor).unwrap();

    // Clicks landing on a marker do not count as outside
    marker.dispatch_event(&bubbling_click()).unwrap();
    assert_eq!(popup_count(&doc), 1);

    orcid_detector::popup::close_all();
    host.remove();
    anchor.remove();
}

#[wasm_bindgen_test]
fn profile_popup_truncates_works_list() {
    let doc = document();

    let works: Vec<serde_json::Value> = (0..7)
        .map(|i| {
            serde_json::json!({
                "title": { "title": { "value": format!("Work {}", i) } },
                "type": "journal-article"
            })
        })
        .collect();
    let summary = ProfileSummary {
        works: Some(serde_json::json!({ "works-summary": works })),
        ..Default::default()
    };
    let view_model = ProfileView::from_summary(&summary);

    let popup = view::build_profile(&doc, "0000-0002-1825-0097", &view_model).unwrap();

    let items = popup.query_selector_all(".work-item").unwrap();
    assert_eq!(items.length(), 3);

    let more = popup
        .query_selector(".more-info")
        .unwrap()
        .unwrap()
        .text_content()
        .unwrap();
    assert_eq!(more, "+4 more works");
}

//! Popup DOM construction: loading, profile, and error variants
//!
//! Every dynamic string (names, biographies, work titles, error reasons)
//! enters the tree via `set_text_content`, so fetched data is never parsed
//! as markup. The only raw-HTML insertions are the constant logo SVGs.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::dom::POPUP_CLASS;
use crate::profile::summary::ProfileView;

/// White header variant of the ORCID logo (trusted constant markup)
const HEADER_SVG: &str = r#"<svg width="20" height="20" viewBox="-10 -10 300 300"><circle cx="120" cy="120" r="85" fill="none" stroke="white" stroke-width="24"/><circle cx="120" cy="120" r="42" fill="none" stroke="white" stroke-width="18"/><line x1="175" y1="175" x2="250" y2="250" stroke="white" stroke-width="28" stroke-linecap="round"/></svg>"#;

/// Build the transient loading popup
pub fn build_loading(document: &Document) -> Result<Element, JsValue> {
    let popup = document.create_element("div")?;
    popup.set_class_name(&format!("{} loading", POPUP_CLASS));

    let content = el(document, "div", "orcid-popup-content")?;
    content.append_child(&el(document, "div", "loading-spinner")?.into())?;
    content.append_child(&text_el(document, "p", "", "Loading ORCID profile...")?.into())?;
    popup.append_child(&content)?;

    Ok(popup)
}

/// Build the success popup from an extracted profile view
pub fn build_profile(
    document: &Document,
    orcid_id: &str,
    view: &ProfileView,
) -> Result<Element, JsValue> {
    let popup = document.create_element("div")?;
    popup.set_class_name(POPUP_CLASS);

    let content = el(document, "div", "orcid-popup-content")?;

    // Header: logo + close control
    let header = el(document, "div", "orcid-popup-header")?;
    let logo = el(document, "div", "orcid-logo-header")?;
    logo.set_inner_html(HEADER_SVG);
    header.append_child(&logo)?;
    header.append_child(&close_button(document)?.into())?;
    content.append_child(&header)?;

    let info = el(document, "div", "orcid-profile-info")?;

    info.append_child(&text_el(document, "h3", "", &view.name)?.into())?;
    info.append_child(&profile_link_line(document, orcid_id)?.into())?;

    if let Some(bio) = &view.biography {
        let section = section(document, "Biography")?;
        section.append_child(&text_el(document, "p", "biography", bio)?.into())?;
        info.append_child(&section)?;
    }

    if let Some(employment) = &view.employment {
        let section = section(document, "Current Position")?;
        section.append_child(&strong_line(document, &employment.role)?.into())?;
        section.append_child(&text_el(document, "p", "", &employment.organization)?.into())?;
        if let Some(year) = &employment.year {
            section.append_child(&text_el(
                document,
                "p",
                "date-info",
                &format!("Since {}", year),
            )?.into())?;
        }
        info.append_child(&section)?;
    }

    if let Some(education) = &view.education {
        let section = section(document, "Education")?;
        section.append_child(&strong_line(document, &education.role)?.into())?;
        section.append_child(&text_el(document, "p", "", &education.organization)?.into())?;
        if let Some(year) = &education.year {
            section.append_child(&text_el(document, "p", "date-info", year)?.into())?;
        }
        info.append_child(&section)?;
    }

    // Aggregate counts
    let stats = document.create_element("div")?;
    stats.set_class_name("orcid-section orcid-stats");
    stats.append_child(&text_el(document, "h4", "", "Research Activity")?.into())?;
    let grid = el(document, "div", "stats-grid")?;
    grid.append_child(&stat_item(document, view.works_count, "Works")?.into())?;
    grid.append_child(&stat_item(document, view.employments_count, "Positions")?.into())?;
    grid.append_child(&stat_item(document, view.educations_count, "Education")?.into())?;
    grid.append_child(&stat_item(document, view.fundings_count, "Funding")?.into())?;
    stats.append_child(&grid)?;
    info.append_child(&stats)?;

    if !view.keywords.is_empty() {
        let section = section(document, "Keywords")?;
        let tags = el(document, "div", "keywords")?;
        for keyword in &view.keywords {
            tags.append_child(&text_el(document, "span", "keyword-tag", keyword)?.into())?;
        }
        section.append_child(&tags)?;
        info.append_child(&section)?;
    }

    if !view.links.is_empty() {
        let section = section(document, "External Links")?;
        let list = el(document, "div", "external-links")?;
        for link in &view.links {
            let a = text_el(document, "a", "orcid-link", &link.label)?;
            a.set_attribute("href", &link.href)?;
            a.set_attribute("target", "_blank")?;
            a.set_attribute("rel", "noopener")?;
            list.append_child(&a)?;
        }
        section.append_child(&list)?;
        info.append_child(&section)?;
    }

    if !view.recent_works.is_empty() {
        let section = section(document, "Recent Works")?;
        for work in &view.recent_works {
            let item = el(document, "div", "work-item")?;
            item.append_child(&text_el(document, "p", "work-title", &work.title)?.into())?;
            let line = match &work.year {
                Some(year) => format!("{} ({})", work.kind, year),
                None => work.kind.clone(),
            };
            item.append_child(&text_el(document, "p", "work-type", &line)?.into())?;
            section.append_child(&item)?;
        }
        if view.more_works > 0 {
            section.append_child(&text_el(
                document,
                "p",
                "more-info",
                &format!("+{} more works", view.more_works),
            )?.into())?;
        }
        info.append_child(&section)?;
    }

    content.append_child(&info)?;
    popup.append_child(&content)?;

    Ok(popup)
}

/// Build the error popup: identifier, failure reason, fallback link
pub fn build_error(
    document: &Document,
    orcid_id: &str,
    message: &str,
) -> Result<Element, JsValue> {
    let popup = document.create_element("div")?;
    popup.set_class_name(&format!("{} error", POPUP_CLASS));

    let content = el(document, "div", "orcid-popup-content")?;

    let header = el(document, "div", "orcid-popup-header")?;
    header.append_child(&text_el(document, "h3", "", "Error Loading Profile")?.into())?;
    header.append_child(&close_button(document)?.into())?;
    content.append_child(&header)?;

    let info = el(document, "div", "orcid-profile-info")?;
    info.append_child(&text_el(
        document,
        "p",
        "",
        &format!("Could not load profile for {}", orcid_id),
    )?.into())?;
    info.append_child(&text_el(document, "p", "error-message", message)?.into())?;

    let line = el(document, "p", "orcid-id")?;
    let a = text_el(document, "a", "", "View on ORCID.org")?;
    a.set_attribute("href", &format!("https://orcid.org/{}", orcid_id))?;
    a.set_attribute("target", "_blank")?;
    a.set_attribute("rel", "noopener")?;
    line.append_child(&a)?;
    info.append_child(&line)?;

    content.append_child(&info)?;
    popup.append_child(&content)?;

    Ok(popup)
}

// ==================== BUILDING BLOCKS ====================

fn el(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    Ok(element)
}

fn text_el(document: &Document, tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let element = el(document, tag, class)?;
    element.set_text_content(Some(text));
    Ok(element)
}

fn section(document: &Document, title: &str) -> Result<Element, JsValue> {
    let section = el(document, "div", "orcid-section")?;
    section.append_child(&text_el(document, "h4", "", title)?.into())?;
    Ok(section)
}

fn strong_line(document: &Document, text: &str) -> Result<Element, JsValue> {
    let line = document.create_element("p")?;
    line.append_child(&text_el(document, "strong", "", text)?.into())?;
    Ok(line)
}

fn stat_item(document: &Document, count: usize, label: &str) -> Result<Element, JsValue> {
    let item = el(document, "div", "stat-item")?;
    item.append_child(&text_el(document, "span", "stat-number", &count.to_string())?.into())?;
    item.append_child(&text_el(document, "span", "stat-label", label)?.into())?;
    Ok(item)
}

fn profile_link_line(document: &Document, orcid_id: &str) -> Result<Element, JsValue> {
    let url = format!("https://orcid.org/{}", orcid_id);
    let line = el(document, "p", "orcid-id")?;
    let a = text_el(document, "a", "", &url)?;
    a.set_attribute("href", &url)?;
    a.set_attribute("target", "_blank")?;
    a.set_attribute("rel", "noopener")?;
    line.append_child(&a)?;
    Ok(line)
}

fn close_button(document: &Document) -> Result<Element, JsValue> {
    let button = text_el(document, "button", "orcid-popup-close", "\u{00d7}")?;
    let handler = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        super::close_all();
    });
    button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    // The button dies with its popup; the handler stays for the session
    handler.forget();
    Ok(button)
}

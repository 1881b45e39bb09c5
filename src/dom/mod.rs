//! DOM surface shared by the scanner, annotator, and popup
//!
//! All elements this crate writes into the host page carry one of the class
//! tags below; `is_own_element` is the single self-exclusion predicate used
//! by the scanner, the link augmenter, and the change watcher to keep
//! self-generated markup from being reprocessed.

pub mod annotate;
pub mod links;
pub mod scan;

pub use annotate::*;
pub use links::*;
pub use scan::*;

use web_sys::Element;

/// Inline marker wrapper (clickable text + badge)
pub const CONTAINER_CLASS: &str = "orcid-detector-container";
/// Clickable original-text span inside a marker
pub const TEXT_CLASS: &str = "orcid-detector-text";
/// Badge icon span inside a marker
pub const LOGO_CLASS: &str = "orcid-detector-logo";
/// Badge appended after an existing orcid.org link
pub const EXTERNAL_LOGO_CLASS: &str = "orcid-detector-logo-external";
/// Popup root (variants add `loading` / `error`)
pub const POPUP_CLASS: &str = "orcid-detector-popup";
/// Attribute marking an already-augmented external link
pub const PROCESSED_ATTR: &str = "data-orcid-detector";

/// Ancestor selector covering every root this crate creates
pub const OWN_ROOTS_SELECTOR: &str = ".orcid-detector-container, .orcid-detector-popup";

/// Magnifier badge rendered next to matched identifiers (trusted constant
/// markup; never carries page or registry data)
pub const BADGE_SVG: &str = r##"<svg width="16" height="16" viewBox="-10 -10 300 300" style="margin-left: -2px; vertical-align: 2px; cursor: pointer;"><circle cx="120" cy="120" r="85" fill="none" stroke="#8FB82B" stroke-width="24"/><circle cx="120" cy="120" r="42" fill="none" stroke="#8FB82B" stroke-width="18"/><line x1="175" y1="175" x2="250" y2="250" stroke="#8FB82B" stroke-width="28" stroke-linecap="round"/></svg>"##;

/// True when the element is, or sits inside, one of this crate's own
/// markers or popups
pub fn is_own_element(element: &Element) -> bool {
    let classes = element.class_list();
    if classes.contains(CONTAINER_CLASS)
        || classes.contains(TEXT_CLASS)
        || classes.contains(LOGO_CLASS)
        || classes.contains(EXTERNAL_LOGO_CLASS)
        || classes.contains(POPUP_CLASS)
    {
        return true;
    }
    element.closest(OWN_ROOTS_SELECTOR).ok().flatten().is_some()
}

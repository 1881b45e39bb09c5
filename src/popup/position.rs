//! Viewport-aware popup placement
//!
//! Default placement is just below the activation target, left-aligned.
//! After the first layout the popup is measured and clamped: pulled left
//! when it crosses the right viewport edge, flipped above the target when
//! it crosses the bottom.

use wasm_bindgen::prelude::*;
use web_sys::Element;

const GAP_PX: f64 = 5.0;
const EDGE_MARGIN_PX: f64 = 10.0;

/// Position an attached popup relative to its activation target
pub fn place(popup: &Element, target: &Element) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;

    let rect = target.get_bounding_client_rect();
    let scroll_top = window.page_y_offset()?;
    let scroll_left = window.page_x_offset()?;

    let mut top = rect.bottom() + scroll_top + GAP_PX;
    let mut left = rect.left() + scroll_left;
    apply(popup, top, left)?;

    // Measure after the first placement, then clamp into the viewport
    let popup_rect = popup.get_bounding_client_rect();
    let viewport_width = window.inner_width()?.as_f64().unwrap_or(f64::MAX);
    let viewport_height = window.inner_height()?.as_f64().unwrap_or(f64::MAX);

    if popup_rect.right() > viewport_width {
        left = viewport_width - popup_rect.width() - EDGE_MARGIN_PX;
    }
    if popup_rect.bottom() > viewport_height {
        top = rect.top() + scroll_top - popup_rect.height() - GAP_PX;
    }
    apply(popup, top, left)
}

fn apply(popup: &Element, top: f64, left: f64) -> Result<(), JsValue> {
    popup.set_attribute(
        "style",
        &format!(
            "position: absolute; top: {}px; left: {}px; z-index: 10000;",
            top, left
        ),
    )
}

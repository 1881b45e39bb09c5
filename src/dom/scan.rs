//! Document Scanner: text-node snapshot with exclusion policy
//!
//! Walks every text node under a root via `TreeWalker` and keeps the ones
//! eligible for annotation. The walk reflects a live, mutable document, so
//! results are collected into a one-time snapshot before any splicing
//! starts. Exclusions, in order: non-content containers (script / style /
//! noscript), this crate's own markers and popups, and nodes whose text
//! contains no identifier.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Node, Text};

use crate::matcher;

use super::is_own_element;

// NodeFilter.SHOW_TEXT
const SHOW_TEXT: u32 = 0x4;

/// Collect all text nodes under `root` that are eligible for annotation
pub fn collect_matching_text_nodes(
    document: &Document,
    root: &Node,
) -> Result<Vec<Text>, JsValue> {
    let walker = document.create_tree_walker_with_what_to_show(root, SHOW_TEXT)?;

    let mut nodes = Vec::new();
    while let Some(node) = walker.next_node()? {
        let text_node: Text = match node.dyn_into() {
            Ok(t) => t,
            Err(_) => continue,
        };
        if eligible(&text_node) {
            nodes.push(text_node);
        }
    }
    Ok(nodes)
}

fn eligible(node: &Text) -> bool {
    let parent = match node.parent_element() {
        Some(p) => p,
        None => return false,
    };

    let tag = parent.tag_name().to_ascii_uppercase();
    if matches!(tag.as_str(), "SCRIPT" | "STYLE" | "NOSCRIPT") {
        return false;
    }

    if is_own_element(&parent) {
        return false;
    }

    let text = node.text_content().unwrap_or_default();
    matcher::with_matcher(|m| m.contains(&text))
}

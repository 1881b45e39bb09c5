//! ProfileSummary and its render model
//!
//! The registry returns five loosely-shaped JSON documents per identifier.
//! `ProfileSummary` keeps them as raw `serde_json::Value` sections (any of
//! which may be absent after a failed sub-fetch); `ProfileView` is the pure
//! extraction the popup renders from, with all path navigation and fallback
//! text decided here rather than in DOM code.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Biography is cut at this many characters, plus an ellipsis
pub const BIO_LIMIT: usize = 150;
/// Keyword tags shown in the popup
pub const MAX_KEYWORDS: usize = 5;
/// External links shown in the popup
pub const MAX_LINKS: usize = 4;
/// Recent works shown before the "+N more works" line
pub const MAX_WORKS: usize = 3;

// ==================== TYPE DEFINITIONS ====================

/// Aggregated result of the five per-identifier sub-fetches.
/// A `None` section means that sub-fetch failed or returned non-JSON;
/// the summary as a whole stays valid.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProfileSummary {
    pub person: Option<Value>,
    pub works: Option<Value>,
    pub employments: Option<Value>,
    pub educations: Option<Value>,
    pub fundings: Option<Value>,
}

impl ProfileSummary {
    /// True when every section is absent: no sub-fetch produced data, which
    /// the fetcher treats as a total resolution failure rather than a
    /// degraded profile
    pub fn is_empty(&self) -> bool {
        self.person.is_none()
            && self.works.is_none()
            && self.employments.is_none()
            && self.educations.is_none()
            && self.fundings.is_none()
    }
}

/// One affiliation entry (employment or education)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AffiliationView {
    pub role: String,
    pub organization: String,
    pub year: Option<String>,
}

/// One recent-work entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorkView {
    pub title: String,
    pub kind: String,
    pub year: Option<String>,
}

/// One external researcher link
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkView {
    pub label: String,
    pub href: String,
}

/// Everything the success popup renders, already flattened and truncated
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProfileView {
    pub name: String,
    pub biography: Option<String>,
    pub employment: Option<AffiliationView>,
    pub education: Option<AffiliationView>,
    pub works_count: usize,
    pub employments_count: usize,
    pub educations_count: usize,
    pub fundings_count: usize,
    pub keywords: Vec<String>,
    pub links: Vec<LinkView>,
    pub recent_works: Vec<WorkView>,
    /// Works beyond the rendered `recent_works` slice
    pub more_works: usize,
}

// ==================== EXTRACTION ====================

impl ProfileView {
    /// Flatten a summary into its render model. Absent sections degrade to
    /// empty lists, zero counts, and fallback strings.
    pub fn from_summary(summary: &ProfileSummary) -> Self {
        let person = summary.person.as_ref();

        let works_list = list_at(summary.works.as_ref(), &["works-summary"]);
        let employments_list = list_at(summary.employments.as_ref(), &["employment-summary"]);
        let educations_list = list_at(summary.educations.as_ref(), &["education-summary"]);
        let fundings_list = list_at(summary.fundings.as_ref(), &["group"]);

        let works_count = works_list.len();
        let recent_works: Vec<WorkView> = works_list
            .iter()
            .take(MAX_WORKS)
            .map(extract_work)
            .collect();

        Self {
            name: extract_name(person),
            biography: str_at(person, &["biography", "content"]).map(truncate_bio),
            employment: employments_list.first().map(extract_employment),
            education: educations_list.first().map(extract_education),
            works_count,
            employments_count: employments_list.len(),
            educations_count: educations_list.len(),
            fundings_count: fundings_list.len(),
            keywords: extract_keywords(person),
            links: extract_links(person),
            more_works: works_count.saturating_sub(recent_works.len()),
            recent_works,
        }
    }
}

fn extract_name(person: Option<&Value>) -> String {
    let name = match person.and_then(|p| p.get("name")).filter(|n| !n.is_null()) {
        Some(name) => name,
        None => return "Name not available".to_string(),
    };
    let given = str_at(Some(name), &["given-names", "value"]).unwrap_or_default();
    let family = str_at(Some(name), &["family-name", "value"]).unwrap_or_default();
    let full = format!("{} {}", given, family);
    let full = full.trim();
    if full.is_empty() {
        "Name not provided".to_string()
    } else {
        full.to_string()
    }
}

fn extract_employment(entry: &Value) -> AffiliationView {
    AffiliationView {
        role: str_at(Some(entry), &["role-title"])
            .unwrap_or("Position not specified")
            .to_string(),
        organization: str_at(Some(entry), &["organization", "name"])
            .unwrap_or("Organization not specified")
            .to_string(),
        year: year_at(entry, "start-date"),
    }
}

fn extract_education(entry: &Value) -> AffiliationView {
    AffiliationView {
        role: str_at(Some(entry), &["role-title"])
            .unwrap_or("Degree not specified")
            .to_string(),
        organization: str_at(Some(entry), &["organization", "name"])
            .unwrap_or("Institution not specified")
            .to_string(),
        year: year_at(entry, "end-date"),
    }
}

fn extract_work(entry: &Value) -> WorkView {
    WorkView {
        title: str_at(Some(entry), &["title", "title", "value"])
            .unwrap_or("Untitled work")
            .to_string(),
        kind: str_at(Some(entry), &["type"])
            .unwrap_or("Unknown type")
            .to_string(),
        year: year_at(entry, "publication-date"),
    }
}

fn extract_keywords(person: Option<&Value>) -> Vec<String> {
    list_at(person, &["keywords", "keyword"])
        .iter()
        .filter_map(|k| {
            // Entries are either `{ "content": "..." }` or bare strings
            str_at(Some(k), &["content"])
                .map(str::to_string)
                .or_else(|| k.as_str().map(str::to_string))
        })
        .take(MAX_KEYWORDS)
        .collect()
}

fn extract_links(person: Option<&Value>) -> Vec<LinkView> {
    list_at(person, &["researcher-urls", "researcher-url"])
        .iter()
        .filter_map(|u| {
            let href = str_at(Some(u), &["url", "value"])?;
            Some(LinkView {
                label: str_at(Some(u), &["url-name"]).unwrap_or("Link").to_string(),
                href: href.to_string(),
            })
        })
        .take(MAX_LINKS)
        .collect()
}

/// Cut a biography at `BIO_LIMIT` characters (not bytes), appending an
/// ellipsis when anything was dropped.
pub fn truncate_bio(bio: &str) -> String {
    if bio.chars().count() <= BIO_LIMIT {
        return bio.to_string();
    }
    let cut: String = bio.chars().take(BIO_LIMIT).collect();
    format!("{}...", cut)
}

// ==================== VALUE NAVIGATION ====================

fn str_at<'a>(value: Option<&'a Value>, path: &[&str]) -> Option<&'a str> {
    let mut cur = value?;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_str()
}

fn list_at<'a>(value: Option<&'a Value>, path: &[&str]) -> &'a [Value] {
    let mut cur = match value {
        Some(v) => v,
        None => return &[],
    };
    for key in path {
        cur = match cur.get(key) {
            Some(v) => v,
            None => return &[],
        };
    }
    cur.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Year value under `<date_key>.year.value`, tolerating both string and
/// numeric encodings
fn year_at(entry: &Value, date_key: &str) -> Option<String> {
    let year = entry.get(date_key)?.get("year")?.get("value")?;
    match year {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ==================== TESTS ====================

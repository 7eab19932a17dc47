//! Markdown bill links in generated text

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

// Keyed on the `](` boundary alone, so labels may nest brackets
static BILL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\]\(([^)]*)\)").expect("Invalid bill link regex"));

/// Targets of every `[label](target)` link in `text`, in order
pub fn bill_links(text: &str) -> Vec<&str> {
    BILL_LINK
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Link targets that are not known bill ids. Matching is exact.
pub fn broken_bill_links(text: &str, valid_ids: &HashSet<String>) -> BTreeSet<String> {
    bill_links(text)
        .into_iter()
        .filter(|target| !valid_ids.contains(*target))
        .map(str::to_string)
        .collect()
}

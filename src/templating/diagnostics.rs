//! Human readable rendering failures.

use strsim::levenshtein;

/// Maximum Levenshtein distance, as a percentage of the name length, for a
/// template name to be suggested.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

const MAX_SUGGESTIONS: usize = 3;

/// Template names close to `target`, closest first.
pub fn similar_names<'a>(target: &str, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = (target.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    let mut scored: Vec<_> = available
        .into_iter()
        .map(|name| (levenshtein(target, name), name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();

    scored.sort();
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, name)| name.to_string()).collect()
}

/// Flatten a Tera error chain into one message per line.
///
/// Internal wrapper and one-off template names are hidden.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let cleaned = err
            .to_string()
            .replace("'__tera_one_off'", "template")
            .trim()
            .to_string();
        if !cleaned.is_empty() && !messages.contains(&cleaned) {
            messages.push(cleaned);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "Template error".to_string()
    } else {
        messages.join("\n  → ")
    }
}

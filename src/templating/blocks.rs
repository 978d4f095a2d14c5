//! Block lookup and single-block rendering.
//!
//! Tera renders whole templates only. To render one block, a wrapper template
//! extends the target, wraps the block's `super()` output in markers, and
//! empties every block unrelated to the target so the rest of the page
//! produces as little output (and as few side effects) as possible.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

/// Marks the start and end of the rendered block in wrapper output.
pub(crate) const BLOCK_MARKER: &str = "<!--tera-encore:block-->";

const WRAPPER_PREFIX: &str = "__block_wrapper__";

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*(block|endblock)\s+([A-Za-z_][A-Za-z0-9_]*)\s*-?%\}").expect("valid block pattern")
});

static EXTENDS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{%-?\s*extends\s+["']([^"']+)["']\s*-?%\}"#).expect("valid extends pattern")
});

/// Template named by the `{% extends %}` tag of `source`.
pub(crate) fn parent_template(source: &str) -> Option<&str> {
    EXTENDS_TAG.captures(source).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Whether `source` opens `{% block <block> %}`.
pub(crate) fn defines_block(source: &str, block: &str) -> bool {
    BLOCK_TAG
        .captures_iter(source)
        .any(|caps| &caps[1] == "block" && &caps[2] == block)
}

/// Every block of `source` with its directly enclosing block.
fn block_nesting(source: &str) -> Vec<(String, Option<String>)> {
    let mut stack: Vec<String> = Vec::new();
    let mut nesting = Vec::new();

    for caps in BLOCK_TAG.captures_iter(source) {
        let name = caps[2].to_string();
        if &caps[1] == "block" {
            nesting.push((name.clone(), stack.last().cloned()));
            stack.push(name);
        } else if let Some(pos) = stack.iter().rposition(|open| *open == name) {
            stack.truncate(pos);
        }
    }

    nesting
}

/// Name of the wrapper rendering `block` of `template`.
///
/// Keeps the template's suffix so auto-escaping applies the same way.
pub(crate) fn wrapper_name(template: &str, block: &str) -> String {
    format!("{WRAPPER_PREFIX}{block}:{template}")
}

/// Source of the wrapper rendering `block` of `template`.
///
/// `chain` holds the sources of `template` and its ancestors.
pub(crate) fn wrapper_source(template: &str, block: &str, chain: &[&str]) -> String {
    let mut enclosing: HashMap<String, HashSet<String>> = HashMap::new();
    let mut all = BTreeSet::new();
    for source in chain {
        for (name, parent) in block_nesting(source) {
            let parents = enclosing.entry(name.clone()).or_default();
            if let Some(parent) = parent {
                parents.insert(parent);
            }
            all.insert(name);
        }
    }

    let ancestors_of = |name: &str| -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            for parent in enclosing.get(&current).into_iter().flatten() {
                if seen.insert(parent.clone()) {
                    pending.push(parent.clone());
                }
            }
        }
        seen
    };

    let target_ancestors = ancestors_of(block);
    let mut wrapper = format!(
        "{{% extends \"{template}\" %}}{{% block {block} %}}{BLOCK_MARKER}{{{{ super() }}}}{BLOCK_MARKER}{{% endblock {block} %}}"
    );
    for other in &all {
        if other == block || target_ancestors.contains(other) || ancestors_of(other).contains(block) {
            continue;
        }
        wrapper.push_str(&format!("{{% block {other} %}}{{% endblock {other} %}}"));
    }
    wrapper
}

/// The block output between the wrapper markers.
pub(crate) fn extract(output: &str) -> Option<&str> {
    let start = output.find(BLOCK_MARKER)? + BLOCK_MARKER.len();
    let end = start + output[start..].find(BLOCK_MARKER)?;
    Some(&output[start..end])
}

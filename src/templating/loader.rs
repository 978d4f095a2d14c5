//! Namespaced template discovery.

use std::path::Path;
use walkdir::WalkDir;

use crate::constants::MAIN_NAMESPACE;
use crate::core::RenderError;

/// Name under which `relative` is registered for `namespace`.
///
/// ```
/// use tera_encore::templating::loader::template_name;
///
/// assert_eq!(template_name("__main__", "index.html"), "index.html");
/// assert_eq!(template_name("admin", "layout.html"), "@admin/layout.html");
/// ```
pub fn template_name(namespace: &str, relative: &str) -> String {
    if namespace == MAIN_NAMESPACE {
        relative.to_string()
    } else {
        format!("@{namespace}/{relative}")
    }
}

/// Read every file under `dir` as a template of `namespace`.
///
/// Names use `/` separators whatever the platform. A missing directory
/// yields no templates.
pub fn load_directory(dir: &Path, namespace: &str) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.is_dir() {
        tracing::warn!(
            "Template directory {} for namespace \"{}\" does not exist",
            dir.display(),
            namespace
        );
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| RenderError::Load {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        templates.push((template_name(namespace, &relative), source));
    }

    tracing::debug!(
        "Loaded {} template(s) from {} into namespace \"{}\"",
        templates.len(),
        dir.display(),
        namespace
    );
    Ok(templates)
}

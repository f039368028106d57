//! HTML views with `{{key}}` placeholders.
//!
//! Templates live under a views root as `<name>.html`. Placeholders are
//! looked up in a JSON object (dotted paths reach into nested objects) and
//! HTML-escaped. Unknown keys render as the empty string.

use std::path::{Component, Path, PathBuf};

use axum::response::Html;

/// Error type for view rendering.
#[derive(Debug)]
pub enum ViewError {
    /// No template file for this view name.
    NotFound(PathBuf),
    /// The view name escapes the views root or is empty.
    InvalidName(String),
    Io(std::io::Error),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::NotFound(path) => write!(f, "View not found: {}", path.display()),
            ViewError::InvalidName(name) => write!(f, "Invalid view name: '{name}'"),
            ViewError::Io(err) => write!(f, "View I/O error: {err}"),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        ViewError::Io(err)
    }
}

/// Template renderer rooted at a views directory.
#[derive(Debug, Clone)]
pub struct Views {
    root: PathBuf,
}

impl Views {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the template for `name` (`users/index` → `<root>/users/index.html`).
    pub fn template_path(&self, name: &str) -> Result<PathBuf, ViewError> {
        let relative = Path::new(name);
        let safe = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ViewError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.html")))
    }

    /// Render `name` with `context`.
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, ViewError> {
        let path = self.template_path(name)?;
        let template = match std::fs::read_to_string(&path) {
            Ok(template) => template,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ViewError::NotFound(path))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(render_template(&template, context))
    }

    pub fn render_html(
        &self,
        name: &str,
        context: &serde_json::Value,
    ) -> Result<Html<String>, ViewError> {
        self.render(name, context).map(Html)
    }
}

/// Substitute `{{key}}` placeholders in `template`.
pub fn render_template(template: &str, context: &serde_json::Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                if let Some(value) = lookup(context, key) {
                    out.push_str(&escape_html(&value));
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(context: &serde_json::Value, key: &str) -> Option<String> {
    let value = key
        .split('.')
        .try_fold(context, |current, part| current.get(part))?;
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

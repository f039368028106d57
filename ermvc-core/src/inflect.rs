//! Naming conventions: pluralization and case conversion.
//!
//! Every place that turns a human-chosen name into a route segment, a table
//! name, or a file name goes through this module, so a controller generated
//! by the CLI and the routes registered at runtime always agree.
//!
//! ```
//! use ermvc_core::inflect::{pluralize, resource_name};
//!
//! assert_eq!(pluralize("person"), "people");
//! assert_eq!(pluralize("City"), "Cities");
//! assert_eq!(resource_name("PostController").unwrap(), "posts");
//! ```

/// Marker suffix identifying a controller by name.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Marker suffix identifying a controller file stem in snake case.
pub const CONTROLLER_FILE_SUFFIX: &str = "_controller";

const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

/// Errors raised when a name cannot be turned into a resource segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Nothing is left once the controller marker is stripped.
    Empty(String),
    /// The derived resource contains characters that are not URL-safe.
    NotUrlSafe { name: String, resource: String },
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameError::Empty(name) => {
                write!(f, "Cannot derive a resource from '{name}': name is empty")
            }
            NameError::NotUrlSafe { name, resource } => write!(
                f,
                "Resource '{resource}' derived from '{name}' is not URL-safe \
                 (allowed: a-z, 0-9, '-', '_')"
            ),
        }
    }
}

impl std::error::Error for NameError {}

/// Pluralize an English word.
///
/// Rules are evaluated on the lower-cased word, first match wins:
///
/// 1. irregular table (`person` → `people`), keeping the case of the first letter
/// 2. ends in `s`: `ss`/`us`/`is` get `es`, anything else is already plural
/// 3. consonant + `y` → `ies`
/// 4. `ch`, `sh`, `x`, `z` → `es`
/// 5. `f` → `ves`, `fe` → `ves`
/// 6. otherwise append `s`
///
/// Outside the irregular table the suffix is applied to the input as given.
/// An empty input yields an empty output.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    if let Some((_, plural)) = IRREGULARS.iter().find(|(singular, _)| *singular == lower) {
        let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
        return if starts_upper {
            capitalize(plural)
        } else {
            (*plural).to_string()
        };
    }

    if lower.ends_with('s') {
        if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
            return format!("{word}es");
        }
        return word.to_string();
    }

    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    if lower.ends_with("ch") || lower.ends_with("sh") || lower.ends_with('x') || lower.ends_with('z')
    {
        return format!("{word}es");
    }

    if lower.ends_with('f') {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    if lower.ends_with("fe") {
        return format!("{}ves", &word[..word.len() - 2]);
    }

    format!("{word}s")
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    rev.next();
    matches!(rev.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Strip a trailing `Controller` marker. No-op when absent.
pub fn strip_controller_suffix(name: &str) -> &str {
    name.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(name)
}

/// Legacy resource derivation: strip the marker, lower-case, append `s`
/// unless the name already ends in `s`.
///
/// This disagrees with [`pluralize`] for irregular and sibilant words
/// (`PersonController` → `persons`, while `pluralize("person")` is `people`).
/// Route registration uses [`resource_name`]; this function only survives
/// for callers that depend on the old paths.
pub fn controller_name_to_resource(name: &str) -> String {
    let lower = strip_controller_suffix(name).to_lowercase();
    if lower.ends_with('s') {
        lower
    } else {
        lower + "s"
    }
}

/// Derive the URL segment for a controller: strip the marker, lower-case,
/// [`pluralize`].
///
/// # Errors
///
/// [`NameError::Empty`] when nothing is left after stripping the marker,
/// [`NameError::NotUrlSafe`] when the result contains anything but ASCII
/// letters, digits, `-` or `_`.
pub fn resource_name(controller_name: &str) -> Result<String, NameError> {
    let base = strip_controller_suffix(controller_name);
    if base.is_empty() {
        return Err(NameError::Empty(controller_name.to_string()));
    }

    let resource = pluralize(&base.to_lowercase());
    let url_safe = resource
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !url_safe {
        return Err(NameError::NotUrlSafe {
            name: controller_name.to_string(),
            resource,
        });
    }
    Ok(resource)
}

/// Turn a controller file stem into a controller name.
///
/// `user_controller` → `UserController`; `UserController` is returned as is.
pub fn controller_name_from_stem(stem: &str) -> String {
    if stem.ends_with(CONTROLLER_FILE_SUFFIX) {
        to_pascal_case(stem)
    } else {
        stem.to_string()
    }
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert snake_case (or a single word) to PascalCase.
pub fn to_pascal_case(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Convert to snake_case, splitting on lower→upper boundaries, spaces and dashes.
///
/// `UserProfile` → `user_profile`, `blog post` → `blog_post`.
pub fn snake_case(s: &str) -> String {
    separate_words(s, '_', |c| c.is_whitespace() || c == '-' || c == '_')
}

/// Convert to kebab-case, splitting on lower→upper boundaries, spaces and underscores.
///
/// `UserProfile` → `user-profile`, `blog_post` → `blog-post`.
pub fn kebab_case(s: &str) -> String {
    separate_words(s, '-', |c| c.is_whitespace() || c == '_' || c == '-')
}

fn separate_words(s: &str, sep: char, is_separator: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    let mut pending_sep = false;

    for c in s.chars() {
        if is_separator(c) {
            pending_sep = !out.is_empty();
            prev_lower = false;
            continue;
        }
        if pending_sep || (prev_lower && c.is_uppercase()) {
            out.push(sep);
            pending_sep = false;
        }
        prev_lower = c.is_lowercase();
        out.extend(c.to_lowercase());
    }
    out
}

pub mod project;
pub mod resource;

/// Marker in `src/controllers/mod.rs` above which module declarations go.
pub const CONTROLLERS_MARKER: &str = "// ermvc:controllers";

/// Marker in `src/controllers/mod.rs` above which registry entries go.
pub const REGISTRY_MARKER: &str = "// ermvc:registry";

/// Simple template rendering: replaces {{key}} with value.
///
/// Placeholders written with inner spaces (`{{ title }}`) are left for the
/// view renderer.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut output = template.to_string();
    for (key, value) in vars {
        output = output.replace(&format!("{{{{{}}}}}", key), value);
    }
    output
}

/// Insert `line` just above the line holding `marker`, with the marker's
/// indentation.
///
/// Returns `None` when the marker is missing. Content already holding
/// `line` is returned unchanged.
pub fn insert_before_marker(content: &str, marker: &str, line: &str) -> Option<String> {
    if content.lines().any(|l| l.trim() == line.trim()) {
        return Some(content.to_string());
    }

    let mut output = String::with_capacity(content.len() + line.len() + 8);
    let mut inserted = false;
    for current in content.split_inclusive('\n') {
        if !inserted && current.trim() == marker {
            let indent = &current[..current.len() - current.trim_start().len()];
            output.push_str(indent);
            output.push_str(line.trim());
            output.push('\n');
            inserted = true;
        }
        output.push_str(current);
    }
    inserted.then_some(output)
}

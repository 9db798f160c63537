/// Name used whenever a title sanitizes down to nothing.
pub const PLACEHOLDER_NAME: &str = "Untitled";

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make a binder title safe to use as a file or directory name.
///
/// Forbidden characters become `-`, leading/trailing spaces and dots are
/// trimmed, and runs of `-` collapse into one. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '-' } else { c })
        .collect();

    let mut out = String::with_capacity(replaced.len());
    for c in replaced.trim_matches(|c| c == ' ' || c == '.').chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    if out.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        out
    }
}

/// Slug used for `label/...` and `status/...` tags: lowercase, with anything
/// outside `[a-z0-9_-]` replaced by `-`.
pub fn tag_slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

//! File name hygiene for style ids.
//!
//! Style ids come from documents the user uploads or from a remote store, so
//! they are untrusted: path separators, control characters and leading dots
//! are stripped before an id is used as a file name.

const MAX_STEM_LEN: usize = 200;

/// Turn a style id into a file stem that stays inside its directory.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_file_stem(id: &str) -> Option<String> {
    // Keep only the last path component, whichever separator style is used
    let name = id.rsplit(['/', '\\']).next().unwrap_or(id);

    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != ':')
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.');

    if cleaned.is_empty() {
        return None;
    }

    let stem: String = cleaned.chars().take(MAX_STEM_LEN).collect();
    Some(stem)
}

/// `<stem>.json` for a style id, falling back to `style.json`.
pub fn style_file_name(id: &str) -> String {
    match sanitize_file_stem(id) {
        Some(stem) => format!("{}.json", stem),
        None => "style.json".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("k3x9q0a7m"), Some("k3x9q0a7m".into()));
        assert_eq!(sanitize_file_stem("../../../etc/passwd"), Some("passwd".into()));
        assert_eq!(
            sanitize_file_stem("..\\..\\windows\\system32"),
            Some("system32".into())
        );
        assert_eq!(sanitize_file_stem(".hidden"), Some("hidden".into()));
        assert_eq!(sanitize_file_stem("c:style"), Some("cstyle".into()));
        assert_eq!(sanitize_file_stem("..."), None);
        assert_eq!(sanitize_file_stem(""), None);
        assert_eq!(sanitize_file_stem("dark matter"), Some("dark matter".into()));
    }

    #[test]
    fn test_style_file_name() {
        assert_eq!(style_file_name("basic"), "basic.json");
        assert_eq!(style_file_name("a/b"), "b.json");
        assert_eq!(style_file_name("/"), "style.json");
        assert_eq!(style_file_name(&"x".repeat(300)).len(), MAX_STEM_LEN + 5);
    }
}

use std::sync::LazyLock;

use regex::Regex;

const ESCAPES: [(char, &str); 6] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
];

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("slug pattern compiles"));

/// Replaces `& < > " ' /` with their HTML entities. Single left-to-right
/// pass: entities emitted by the map are never re-escaped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ESCAPES.iter().find(|(raw, _)| *raw == ch) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}

/// Lowercases and collapses every run of non-alphanumerics into a single
/// hyphen, trimming hyphens at both ends.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{sanitize, slugify};

    #[test]
    fn escapes_every_mapped_character() {
        assert_eq!(
            sanitize(r#"a&b<c>d"e'f/g"#),
            "a&amp;b&lt;c&gt;d&quot;e&#x27;f&#x2F;g"
        );
    }

    #[test]
    fn escaping_is_single_pass() {
        // The ampersand inside an emitted entity must not be escaped again.
        assert_eq!(sanitize("&"), "&amp;");
        assert_eq!(sanitize("&amp;"), "&amp;amp;");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(sanitize("Buy milk"), "Buy milk");
    }

    #[test]
    fn slugifies_display_names() {
        assert_eq!(slugify("Work Stuff"), "work-stuff");
        assert_eq!(slugify("  Déjà   vu!  "), "d-j-vu");
        assert_eq!(slugify("---"), "");
    }
}

//! Abstract text cleanup.
//!
//! Registry payloads carry abstracts as raw markup (HTML fragments from
//! CrossRef, JATS-tagged text in particular). Every adapter runs its
//! extracted text through [`clean_abstract`] before handing it on, so the
//! rest of the pipeline only ever sees plain, bounded text.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder for absent fields, distinct from an empty string.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum length of a cleaned abstract, in characters.
pub const MAX_ABSTRACT_CHARS: usize = 500;

/// Marker appended when an abstract is cut at [`MAX_ABSTRACT_CHARS`].
pub const TRUNCATION_MARKER: &str = "...";

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn jats_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<jats:[^>]+>").expect("valid regex"))
}

fn jats_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</jats:[^>]+>").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Strips markup, collapses whitespace and bounds the result to
/// [`MAX_ABSTRACT_CHARS`] characters. Idempotent: cleaning already-clean
/// text returns it unchanged.
pub fn clean_abstract(raw: &str) -> String {
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return NOT_AVAILABLE.to_string();
    }

    let text = tag_re().replace_all(raw, "");
    let text = jats_open_re().replace_all(&text, "");
    let text = jats_close_re().replace_all(&text, "");
    let text = whitespace_re().replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() > MAX_ABSTRACT_CHARS {
        let mut truncated: String = text.chars().take(MAX_ABSTRACT_CHARS).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        text.to_string()
    }
}

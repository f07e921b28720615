//! Markup detection and repair of the malformed break-tag dialect.
//!
//! Some upstream producers spell out punctuation inside break tags, e.g.
//! `<break time equals "800ms " slash >`. Only tags of that shape are
//! rewritten; everything else passes through untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

pub(crate) static SPEAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?\s*speak[^>]*>").expect("invalid SPEAK_TAG regex"));

pub(crate) static BREAK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<\s*break\b[^>]*?\btime\s*=\s*"([^"]+)"[^>]*>"#)
        .expect("invalid BREAK_TAG regex")
});

static MALFORMED_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*break\b[^>]*(?:\bequals\b|\bslash\b)[^>]*>")
        .expect("invalid MALFORMED_BREAK regex")
});

static PROSODY_OR_EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(?:prosody|emphasis)\b").expect("invalid PROSODY_OR_EMPHASIS regex")
});

/// A single substitution applied inside a malformed break tag.
struct TagRewrite {
    pattern: Lazy<Regex>,
    replacement: &'static str,
}

/// Applied in this order to every malformed tag.
static TAG_REWRITES: [TagRewrite; 3] = [
    // time equals "x" -> time="x"
    TagRewrite {
        pattern: Lazy::new(|| Regex::new(r"(?i)(\btime)\s+equals\s+").expect("invalid regex")),
        replacement: "${1}=",
    },
    // ="800ms " -> ="800ms"
    TagRewrite {
        pattern: Lazy::new(|| Regex::new(r#"="([^"]*?)\s+""#).expect("invalid regex")),
        replacement: r#"="${1}""#,
    },
    // slash > -> />
    TagRewrite {
        pattern: Lazy::new(|| Regex::new(r"(?i)\s+slash\s*>").expect("invalid regex")),
        replacement: "/>",
    },
];

/// Whether `text` looks like speech markup rather than plain text.
pub fn is_markup(text: &str) -> bool {
    SPEAK_TAG.is_match(text) || BREAK_TAG.is_match(text) || MALFORMED_BREAK.is_match(text)
}

/// Whether `text` opens a `<prosody>` or `<emphasis>` element.
pub fn has_prosody_or_emphasis(text: &str) -> bool {
    PROSODY_OR_EMPHASIS.is_match(text)
}

/// Rewrite malformed break tags into canonical `<break time="..."/>` form.
///
/// Idempotent: a repaired tag no longer matches the malformed pattern.
pub fn normalize(text: &str) -> Cow<'_, str> {
    MALFORMED_BREAK.replace_all(text, |caps: &Captures<'_>| rewrite_tag(&caps[0]))
}

fn rewrite_tag(tag: &str) -> String {
    TAG_REWRITES.iter().fold(tag.to_string(), |acc, rewrite| {
        rewrite
            .pattern
            .replace_all(&acc, rewrite.replacement)
            .into_owned()
    })
}

//! Prosody tree compiler.
//!
//! Walks the element tree carrying the params inherited from ancestors. Each
//! element derives its own `local` params from `inherited` and its modifiers;
//! its text uses `local`, while its tail belongs to the parent scope and uses
//! `inherited`.

use crate::attrs::{emphasis_fx, parse_time_to_ms, pitch_to_cents, rate_to_tempo};
use crate::normalize::normalize;
use crate::tree::{self, Element};
use ssml_core::{EffectiveParams, Segment};
use tracing::{debug, instrument, warn};

const DEFAULT_BREAK_TIME: &str = "300ms";
const DEFAULT_EMPHASIS_LEVEL: &str = "moderate";

/// Result of reading markup as an element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Well-formed document.
    Parsed(Element),
    /// Not a well-formed tree; the raw input is kept as literal text.
    Fallback(String),
}

/// Parse `markup` as an element tree, never failing.
pub fn parse_markup(markup: &str) -> ParseOutcome {
    match tree::parse(&normalize(markup)) {
        Ok(root) => ParseOutcome::Parsed(root),
        Err(err) => {
            warn!(error = %err, "markup is not a well-formed tree, using raw text");
            ParseOutcome::Fallback(markup.to_string())
        }
    }
}

/// Compile markup into segments with their effective params.
///
/// Malformed markup degrades to a single text segment holding the raw input
/// with neutral params. Adjacent text segments with equal params are merged.
#[instrument(skip_all, fields(input_len = markup.len()))]
pub fn compile(markup: &str) -> Vec<Segment> {
    let root = match parse_markup(markup) {
        ParseOutcome::Parsed(root) => root,
        ParseOutcome::Fallback(raw) => return vec![Segment::text(raw, EffectiveParams::root())],
    };

    let mut segments = Vec::new();
    walk(&root, EffectiveParams::root(), &mut segments);
    let merged = merge_adjacent(segments);
    debug!(segments = merged.len(), "compiled prosody tree");
    merged
}

fn walk(node: &Element, inherited: EffectiveParams, out: &mut Vec<Segment>) {
    let mut local = inherited;

    match node.name.to_lowercase().as_str() {
        "break" => {
            let time = node.attr("time").unwrap_or(DEFAULT_BREAK_TIME);
            out.push(Segment::pause(parse_time_to_ms(time)));
            push_text(out, &node.tail, inherited);
            return;
        }
        "prosody" => {
            if let Some(rate) = node.attr("rate") {
                local = local.scale_tempo(rate_to_tempo(rate));
            }
            if let Some(pitch) = node.attr("pitch") {
                local = local.shift_pitch(pitch_to_cents(pitch));
            }
        }
        "emphasis" => {
            let level = node.attr("level").unwrap_or(DEFAULT_EMPHASIS_LEVEL);
            let (gain_db, tempo) = emphasis_fx(level);
            local = local.add_gain(gain_db).scale_tempo(tempo);
        }
        _ => {}
    }

    push_text(out, &node.text, local);
    for child in &node.children {
        walk(child, local, out);
    }
    push_text(out, &node.tail, inherited);
}

fn push_text(out: &mut Vec<Segment>, text: &str, params: EffectiveParams) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(Segment::text(text, params));
    }
}

/// Merge runs of adjacent text segments whose params match.
///
/// Contents are joined with a single space. One left-to-right pass; running
/// it again on its own output changes nothing.
pub fn merge_adjacent(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some(prev) = merged.last_mut()
            && absorb(prev, &segment)
        {
            continue;
        }
        merged.push(segment);
    }
    merged
}

/// Append `next` onto `prev` when both are text with mergeable params.
fn absorb(prev: &mut Segment, next: &Segment) -> bool {
    let (Some(a), Some(b)) = (prev.params(), next.params()) else {
        return false;
    };
    if !a.mergeable_with(&b) {
        return false;
    }
    match (prev, next) {
        (Segment::Text { content: joined, .. }, Segment::Text { content, .. }) => {
            *joined = format!("{joined} {content}").trim().to_string();
            true
        }
        _ => false,
    }
}

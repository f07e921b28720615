//! Flat text/break tokenization of speech markup.

use crate::normalize::{BREAK_TAG, SPEAK_TAG, normalize};
use ssml_core::{Token, clamp_break_ms};
use tracing::{debug, instrument};

/// Split markup into text and break tokens in document order.
///
/// `<speak>` wrappers are dropped, malformed breaks are repaired first, and
/// whitespace-only text between tags is discarded. Text is kept verbatim.
#[instrument(skip_all, fields(input_len = text.len()))]
pub fn tokenize(text: &str) -> Vec<Token> {
    let normalized = normalize(text);
    let stripped = SPEAK_TAG.replace_all(&normalized, "");

    let mut tokens = Vec::new();
    let mut pos = 0;
    for caps in BREAK_TAG.captures_iter(&stripped) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut tokens, &stripped[pos..whole.start()]);
        let duration_ms = parse_duration(&caps[1]);
        tokens.push(Token::Break { duration_ms });
        pos = whole.end();
    }
    push_text(&mut tokens, &stripped[pos..]);

    debug!(tokens = tokens.len(), "tokenized markup");
    tokens
}

fn push_text(tokens: &mut Vec<Token>, span: &str) {
    if !span.trim().is_empty() {
        tokens.push(Token::Text {
            content: span.to_string(),
        });
    }
}

/// Parse a break duration into milliseconds.
///
/// `"1500ms"` and `"1.5s"` both give 1500; a bare number is milliseconds.
/// Anything unparseable gives 0, and the result is clamped to `[0, 10000]`.
pub fn parse_duration(value: &str) -> u32 {
    let v = value.trim().to_lowercase();
    let ms = if let Some(num) = v.strip_suffix("ms") {
        parse_finite(num)
    } else if let Some(num) = v.strip_suffix('s') {
        parse_finite(num).map(|s| s * 1000.0)
    } else {
        parse_finite(&v)
    };
    ms.map_or(0, |ms| clamp_break_ms(ms.round_ties_even() as i64))
}

pub(crate) fn parse_finite(num: &str) -> Option<f64> {
    num.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render markup for engines that take inline `[pause:Ns]` markers.
///
/// Text tokens are emitted as-is; each break becomes a marker holding its
/// duration in seconds, e.g. 800 ms becomes `[pause:0.8s]`.
pub fn render_as_pause_markup(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .map(|token| match token {
            Token::Text { content } => content,
            Token::Break { duration_ms } => {
                format!("[pause:{}s]", format_seconds(duration_ms))
            }
        })
        .collect()
}

/// Seconds with up to 6 significant digits and no trailing zeros.
fn format_seconds(duration_ms: u32) -> String {
    const SIGNIFICANT: i32 = 6;

    let seconds = f64::from(duration_ms) / 1000.0;
    if seconds == 0.0 {
        return "0".to_string();
    }
    let magnitude = seconds.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT - 1 - magnitude).max(0) as usize;
    let formatted = format!("{seconds:.decimals$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

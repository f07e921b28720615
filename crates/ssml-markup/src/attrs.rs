//! Attribute value mappings for `<prosody>`, `<emphasis>` and `<break>`.
//!
//! Every mapping is total: unparseable values fall back to a neutral default.

use crate::breaks::parse_finite;
use once_cell::sync::Lazy;
use regex::Regex;
use ssml_core::clamp_break_ms;

static PERCENT_RATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)%$").expect("invalid PERCENT_RATE regex"));

static SEMITONES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)\s*st$").expect("invalid SEMITONES regex"));

static CENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)\s*c$").expect("invalid CENTS regex"));

/// Map a prosody `rate` value to a tempo multiplier.
///
/// Accepts the named rates (`x-slow` .. `x-fast`), whole percentages clamped
/// to `[50%, 200%]`, or a bare positive multiplier. Anything else is 1.0.
pub fn rate_to_tempo(rate: &str) -> f64 {
    let rate = rate.trim().to_lowercase();
    match rate.as_str() {
        "x-slow" => return 0.8,
        "slow" => return 0.9,
        "medium" => return 1.0,
        "fast" => return 1.1,
        "x-fast" => return 1.25,
        _ => {}
    }
    if let Some(caps) = PERCENT_RATE.captures(&rate) {
        // digits only; overflow means "very large" and clamps to the top
        let percent = caps[1].parse::<u64>().unwrap_or(u64::MAX).clamp(50, 200);
        return percent as f64 / 100.0;
    }
    parse_finite(&rate).filter(|v| *v > 0.0).unwrap_or(1.0)
}

/// Map a prosody `pitch` value to cents.
///
/// `"+2st"` is 200 cents, `"-50c"` is -50 cents, and a bare number is read as
/// semitones. Anything else is 0.
pub fn pitch_to_cents(pitch: &str) -> i32 {
    let pitch = pitch.trim().to_lowercase();
    if let Some(caps) = SEMITONES.captures(&pitch) {
        return parse_whole(&caps[1]).map_or(0, |st| saturate(st.saturating_mul(100)));
    }
    if let Some(caps) = CENTS.captures(&pitch) {
        return parse_whole(&caps[1]).map_or(0, saturate);
    }
    parse_finite(&pitch).map_or(0, |st| (st * 100.0).trunc() as i32)
}

fn parse_whole(digits: &str) -> Option<i64> {
    digits.trim_start_matches('+').parse::<i64>().ok()
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Map an emphasis `level` to `(gain_db, tempo_multiplier)`.
///
/// Matched by case-insensitive prefix; unknown levels are neutral.
pub fn emphasis_fx(level: &str) -> (f64, f64) {
    let level = level.trim().to_lowercase();
    if level.starts_with("strong") {
        (4.0, 0.94)
    } else if level.starts_with("moderate") {
        (2.0, 0.97)
    } else if level.starts_with("reduced") {
        (-2.0, 1.03)
    } else {
        (0.0, 1.0)
    }
}

/// Parse a `<break time>` value inside the prosody tree into milliseconds.
///
/// `ms` and `s` suffixes are honoured; a bare number is taken as seconds.
/// Unparseable values give 0, and the result is clamped to `[0, 10000]`.
pub fn parse_time_to_ms(value: &str) -> u32 {
    let v = value.trim().to_lowercase();
    let ms = if let Some(num) = v.strip_suffix("ms") {
        parse_finite(num)
    } else if let Some(num) = v.strip_suffix('s') {
        parse_finite(num).map(|s| s * 1000.0)
    } else {
        parse_finite(&v).map(|s| s * 1000.0)
    };
    ms.map_or(0, |ms| clamp_break_ms(ms.round_ties_even() as i64))
}

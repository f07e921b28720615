//! Core data types for markup compilation and audio rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for any break duration, in milliseconds.
pub const MAX_BREAK_MS: u32 = 10_000;

/// Tolerance used when comparing gains and testing for neutral params.
pub const PARAM_EPSILON: f64 = 1e-6;

/// Clamp a rounded millisecond value into `[0, MAX_BREAK_MS]`.
pub fn clamp_break_ms(ms: i64) -> u32 {
    ms.clamp(0, i64::from(MAX_BREAK_MS)) as u32
}

/// A token produced by the break tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Token {
    /// A verbatim run of text.
    Text { content: String },
    /// A pause of the given length.
    Break { duration_ms: u32 },
}

impl Token {
    /// Text content, or `None` for a break.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text { content } => Some(content),
            Token::Break { .. } => None,
        }
    }
}

/// Effective prosody parameters in scope at a point of the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParams {
    /// Playback-speed multiplier, 1.0 = unchanged.
    pub tempo: f64,
    /// Pitch shift in cents.
    pub pitch_cents: i32,
    /// Gain in decibels.
    pub gain_db: f64,
}

impl Default for EffectiveParams {
    fn default() -> Self {
        Self {
            tempo: 1.0,
            pitch_cents: 0,
            gain_db: 0.0,
        }
    }
}

impl EffectiveParams {
    /// Params at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Multiply the tempo by `factor`.
    pub fn scale_tempo(mut self, factor: f64) -> Self {
        self.tempo *= factor;
        self
    }

    /// Shift the pitch by `cents`.
    pub fn shift_pitch(mut self, cents: i32) -> Self {
        self.pitch_cents = self.pitch_cents.saturating_add(cents);
        self
    }

    /// Add `db` to the gain.
    pub fn add_gain(mut self, db: f64) -> Self {
        self.gain_db += db;
        self
    }

    /// Whether two param sets render identically and may share a segment.
    ///
    /// Tempo and pitch compare exactly, gain within [`PARAM_EPSILON`].
    pub fn mergeable_with(&self, other: &Self) -> bool {
        self.tempo == other.tempo
            && self.pitch_cents == other.pitch_cents
            && (self.gain_db - other.gain_db).abs() < PARAM_EPSILON
    }

    /// True when rendering with these params is the identity.
    pub fn is_neutral(&self) -> bool {
        (self.tempo - 1.0).abs() < PARAM_EPSILON
            && self.pitch_cents == 0
            && self.gain_db.abs() < PARAM_EPSILON
    }
}

/// A compiled unit of the document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// Text to synthesize, rendered with its effective params.
    Text {
        content: String,
        tempo: f64,
        pitch_cents: i32,
        gain_db: f64,
    },
    /// Silence of the given length.
    Break { duration_ms: u32 },
}

impl Segment {
    /// Create a text segment carrying `params`.
    pub fn text(content: impl Into<String>, params: EffectiveParams) -> Self {
        Segment::Text {
            content: content.into(),
            tempo: params.tempo,
            pitch_cents: params.pitch_cents,
            gain_db: params.gain_db,
        }
    }

    /// Create a break segment, clamping to [`MAX_BREAK_MS`].
    pub fn pause(duration_ms: u32) -> Self {
        Segment::Break {
            duration_ms: duration_ms.min(MAX_BREAK_MS),
        }
    }

    /// Effective params of a text segment.
    pub fn params(&self) -> Option<EffectiveParams> {
        match *self {
            Segment::Text {
                tempo,
                pitch_cents,
                gain_db,
                ..
            } => Some(EffectiveParams {
                tempo,
                pitch_cents,
                gain_db,
            }),
            Segment::Break { .. } => None,
        }
    }

    /// Text content, or `None` for a break.
    pub fn content(&self) -> Option<&str> {
        match self {
            Segment::Text { content, .. } => Some(content),
            Segment::Break { .. } => None,
        }
    }

    /// Whether this is a break segment.
    pub fn is_break(&self) -> bool {
        matches!(self, Segment::Break { .. })
    }
}

/// One named step of an audio filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStep {
    /// Reinterpret the stream as if sampled at the given rate.
    SetRate(u32),
    /// Resample the stream to the given rate.
    Resample(u32),
    /// Tempo change by a factor in `[0.5, 2.0]`, kept in its planned textual form.
    Tempo(String),
    /// Gain change in decibels.
    Volume(f64),
    /// Identity pass-through.
    Null,
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStep::SetRate(rate) => write!(f, "asetrate={rate}"),
            FilterStep::Resample(rate) => write!(f, "aresample={rate}"),
            FilterStep::Tempo(factor) => write!(f, "atempo={factor}"),
            FilterStep::Volume(db) => write!(f, "volume={db:.2}dB"),
            FilterStep::Null => write!(f, "anull"),
        }
    }
}

/// Ordered filter steps, applied first to last.
///
/// An empty chain is the identity and renders as `anull`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    steps: Vec<FilterStep>,
}

impl FilterChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(&mut self, step: FilterStep) {
        self.steps.push(step);
    }

    /// The steps in application order.
    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether applying the chain leaves audio unchanged.
    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(|s| matches!(s, FilterStep::Null))
    }
}

impl Extend<FilterStep> for FilterChain {
    fn extend<I: IntoIterator<Item = FilterStep>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

impl FromIterator<FilterStep> for FilterChain {
    fn from_iter<I: IntoIterator<Item = FilterStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "{}", FilterStep::Null);
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default() {
        let p = EffectiveParams::root();
        assert_eq!(p.tempo, 1.0);
        assert_eq!(p.pitch_cents, 0);
        assert_eq!(p.gain_db, 0.0);
        assert!(p.is_neutral());
    }

    #[test]
    fn test_params_composition() {
        let p = EffectiveParams::root()
            .scale_tempo(1.1)
            .shift_pitch(200)
            .add_gain(4.0)
            .scale_tempo(0.94);
        assert!((p.tempo - 1.034).abs() < 1e-9);
        assert_eq!(p.pitch_cents, 200);
        assert!(!p.is_neutral());
    }

    #[test]
    fn test_mergeable_gain_tolerance() {
        let a = EffectiveParams::root().add_gain(2.0);
        let b = EffectiveParams::root().add_gain(2.0 + 1e-9);
        let c = EffectiveParams::root().add_gain(2.1);
        assert!(a.mergeable_with(&b));
        assert!(!a.mergeable_with(&c));
        assert!(!a.mergeable_with(&a.scale_tempo(1.1)));
    }

    #[test]
    fn test_clamp_break_ms() {
        assert_eq!(clamp_break_ms(-5), 0);
        assert_eq!(clamp_break_ms(1500), 1500);
        assert_eq!(clamp_break_ms(15_000), MAX_BREAK_MS);
        assert_eq!(Segment::pause(20_000), Segment::Break { duration_ms: 10_000 });
    }

    #[test]
    fn test_segment_accessors() {
        let seg = Segment::text("hi", EffectiveParams::root().shift_pitch(-100));
        assert_eq!(seg.content(), Some("hi"));
        assert_eq!(seg.params().map(|p| p.pitch_cents), Some(-100));
        assert!(!seg.is_break());
        assert!(Segment::pause(300).params().is_none());
    }

    #[test]
    fn test_segment_json_shape() {
        let json = serde_json::to_string(&Segment::pause(800)).unwrap();
        assert_eq!(json, r#"{"type":"break","duration_ms":800}"#);

        let token: Token = serde_json::from_str(r#"{"type":"text","content":"Hi"}"#).unwrap();
        assert_eq!(token.as_text(), Some("Hi"));
    }

    #[test]
    fn test_filter_chain_display() {
        assert_eq!(FilterChain::new().to_string(), "anull");
        assert!(FilterChain::new().is_identity());

        let chain: FilterChain = vec![
            FilterStep::SetRate(26_959),
            FilterStep::Resample(24_000),
            FilterStep::Tempo("0.5".into()),
            FilterStep::Tempo("0.800000".into()),
            FilterStep::Volume(-2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            chain.to_string(),
            "asetrate=26959,aresample=24000,atempo=0.5,atempo=0.800000,volume=-2.00dB"
        );
        assert!(!chain.is_identity());
        assert_eq!(chain.len(), 5);
    }
}

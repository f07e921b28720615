//! # ssml-markup
//!
//! Speech-markup front end for the FX pipeline.
//!
//! This crate turns SSML-like text into renderable units:
//! - Detection and repair of a known malformed `<break>` dialect
//! - Flat text/break tokenization for engines that understand inline pauses
//! - Tree compilation of `<prosody>` and `<emphasis>` into segments that carry
//!   their effective tempo, pitch and gain
//!
//! # Example
//!
//! ```
//! use ssml_markup::compile;
//! use ssml_core::Segment;
//!
//! let segments = compile(r#"<speak>Hi<break time="500ms"/>there</speak>"#);
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1], Segment::Break { duration_ms: 500 });
//! ```

mod attrs;
mod breaks;
mod normalize;
mod prosody;
mod tree;

pub use attrs::{emphasis_fx, parse_time_to_ms, pitch_to_cents, rate_to_tempo};
pub use breaks::{parse_duration, render_as_pause_markup, tokenize};
pub use normalize::{has_prosody_or_emphasis, is_markup, normalize};
pub use prosody::{ParseOutcome, compile, merge_adjacent, parse_markup};
pub use tree::{Element, TreeError};

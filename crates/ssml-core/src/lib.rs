//! # ssml-core
//!
//! Core types, traits, and error definitions for the speech-markup FX pipeline.
//!
//! This crate provides the foundational abstractions shared by the markup
//! compiler and the audio renderer:
//!
//! - Data model (`Token`, `Segment`, `EffectiveParams`, `FilterChain`)
//! - Capability traits for the external collaborators (`AudioTransform`,
//!   `SpeechSynthesizer`)
//! - Unified error handling via `FxError`
//! - Configuration structures

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{FxConfig, LoggingConfig, RenderConfig, TransformConfig};
pub use error::{FxError, FxResult};
pub use traits::{AudioTransform, SpeechSynthesizer};
pub use types::{
    EffectiveParams, FilterChain, FilterStep, MAX_BREAK_MS, PARAM_EPSILON, Segment, Token,
    clamp_break_ms,
};

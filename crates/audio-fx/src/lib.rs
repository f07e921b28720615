//! # audio-fx
//!
//! PCM rendering for compiled speech markup.
//!
//! This crate decides which filters a segment needs and hands them to an
//! external transform facility:
//!
//! - Tempo chain planning within the `[0.5, 2.0]` per-step range
//! - Pitch shift by rate reinterpretation plus resampling, with the implied
//!   tempo change compensated
//! - Gain in decibels
//! - Silence for breaks
//! - An ffmpeg-backed [`AudioTransform`](ssml_core::AudioTransform)
//!
//! The renderer never owns the facility; it is injected, so tests can record
//! the requested chain without running anything.

pub mod document;
pub mod ffmpeg;
pub mod render;
pub mod tempo;
pub mod wav;

pub use document::{concat_pcm, render_segments, render_tokens};
pub use ffmpeg::FfmpegTransform;
pub use render::{AudioRenderer, MAX_SILENCE_SAMPLES, build_chain, render_silence};
pub use tempo::plan as plan_tempo;
pub use wav::{read_wav_mono_i16, write_wav_mono_i16};

//! Capability traits for the collaborators the pipeline depends on but does
//! not construct.

use crate::error::FxResult;
use crate::types::FilterChain;
use std::sync::Arc;

/// External audio transform facility.
///
/// Implementations apply a [`FilterChain`] to mono 16-bit PCM and return the
/// result in the same format and at the same sample rate. Each call must be
/// self-contained so that independent segments can be rendered concurrently.
pub trait AudioTransform: Send + Sync {
    /// Human-readable name used in errors and logs.
    fn name(&self) -> &str {
        "audio transform"
    }

    /// Whether the facility can be invoked at all.
    ///
    /// Implementations determine this once, up front; it is not a per-call probe.
    fn is_available(&self) -> bool;

    /// Apply `chain` to `pcm` sampled at `sample_rate`.
    ///
    /// # Arguments
    /// * `pcm` - Mono signed 16-bit samples
    /// * `sample_rate` - Sample rate in Hz
    /// * `chain` - Filters to apply in order; an empty chain is the identity
    fn apply(&self, pcm: &[i16], sample_rate: u32, chain: &FilterChain) -> FxResult<Vec<i16>>;
}

impl<T: AudioTransform + ?Sized> AudioTransform for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn apply(&self, pcm: &[i16], sample_rate: u32, chain: &FilterChain) -> FxResult<Vec<i16>> {
        (**self).apply(pcm, sample_rate, chain)
    }
}

/// Speech synthesis engine producing raw PCM per text segment.
pub trait SpeechSynthesizer: Send + Sync {
    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Synthesize `text` into mono signed 16-bit samples.
    fn synthesize(&self, text: &str) -> FxResult<Vec<i16>>;
}

//! Per-segment audio rendering.

use crate::tempo;
use ssml_core::{
    AudioTransform, EffectiveParams, FilterChain, FilterStep, FxError, FxResult, PARAM_EPSILON,
};
use std::borrow::Cow;
use tracing::{debug, instrument};

/// Applies tempo, pitch and gain to mono PCM through an injected transform.
#[derive(Debug)]
pub struct AudioRenderer<T> {
    transform: T,
}

impl<T: AudioTransform> AudioRenderer<T> {
    /// Create a renderer around `transform`.
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    /// The injected transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Render `pcm` with the given tempo, pitch and gain.
    ///
    /// Neutral params return the input slice itself without touching the
    /// transform. Otherwise the transform must be available, and its failure
    /// is returned as-is; nothing is retried.
    #[instrument(skip(self, pcm), fields(samples = pcm.len()))]
    pub fn render<'a>(
        &self,
        pcm: &'a [i16],
        sample_rate: u32,
        tempo: f64,
        pitch_cents: i32,
        gain_db: f64,
    ) -> FxResult<Cow<'a, [i16]>> {
        let params = EffectiveParams {
            tempo,
            pitch_cents,
            gain_db,
        };
        if params.is_neutral() {
            return Ok(Cow::Borrowed(pcm));
        }
        if !self.transform.is_available() {
            return Err(FxError::transform_unavailable(self.transform.name()));
        }
        if sample_rate == 0 {
            return Err(FxError::invalid_input("sample rate must be positive"));
        }

        let chain = build_chain(sample_rate, tempo, pitch_cents, gain_db);
        debug!(chain = %chain, "rendering with filter chain");
        self.transform
            .apply(pcm, sample_rate, &chain)
            .map(Cow::Owned)
    }

    /// Render `pcm` with a segment's effective params.
    pub fn render_params<'a>(
        &self,
        pcm: &'a [i16],
        sample_rate: u32,
        params: EffectiveParams,
    ) -> FxResult<Cow<'a, [i16]>> {
        self.render(
            pcm,
            sample_rate,
            params.tempo,
            params.pitch_cents,
            params.gain_db,
        )
    }
}

/// Build the filter chain for the given params.
///
/// Pitch is shifted by reinterpreting the rate as `sample_rate * R` with
/// `R = 2^(cents/1200)` and resampling back, which also speeds playback up by
/// `R`; the tempo steps therefore target `tempo / R`.
pub fn build_chain(sample_rate: u32, tempo: f64, pitch_cents: i32, gain_db: f64) -> FilterChain {
    let ratio = if pitch_cents != 0 {
        2f64.powf(f64::from(pitch_cents) / 1200.0)
    } else {
        1.0
    };
    let tempo_total = tempo / ratio;

    let mut chain = FilterChain::new();
    if pitch_cents != 0 {
        chain.push(FilterStep::SetRate((f64::from(sample_rate) * ratio) as u32));
        chain.push(FilterStep::Resample(sample_rate));
    }
    if (tempo_total - 1.0).abs() > PARAM_EPSILON {
        chain.extend(tempo::plan(tempo_total).into_iter().map(FilterStep::Tempo));
    }
    if gain_db.abs() > PARAM_EPSILON {
        chain.push(FilterStep::Volume(gain_db));
    }
    chain
}

/// Most 16-bit samples a WAV data chunk can hold.
pub const MAX_SILENCE_SAMPLES: usize = (u32::MAX / 2) as usize;

/// Zero-filled buffer of `round(duration_s * sample_rate)` samples.
///
/// Negative and NaN durations give an empty buffer. Lengths above
/// [`MAX_SILENCE_SAMPLES`] are rejected as invalid input.
pub fn render_silence(duration_s: f64, sample_rate: u32) -> FxResult<Vec<i16>> {
    let n = (duration_s * f64::from(sample_rate)).round_ties_even();
    if n.is_nan() || n <= 0.0 {
        return Ok(Vec::new());
    }
    if n > MAX_SILENCE_SAMPLES as f64 {
        return Err(FxError::invalid_input(format!(
            "silence of {duration_s}s at {sample_rate}Hz exceeds {MAX_SILENCE_SAMPLES} samples"
        )));
    }
    Ok(vec![0; n as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records requested chains and returns the input reversed.
    #[derive(Default)]
    struct RecordingTransform {
        calls: Mutex<Vec<String>>,
    }

    impl AudioTransform for RecordingTransform {
        fn is_available(&self) -> bool {
            true
        }

        fn apply(&self, pcm: &[i16], _rate: u32, chain: &FilterChain) -> FxResult<Vec<i16>> {
            self.calls.lock().unwrap().push(chain.to_string());
            Ok(pcm.iter().rev().copied().collect())
        }
    }

    struct MissingTransform;

    impl AudioTransform for MissingTransform {
        fn name(&self) -> &str {
            "ffmpeg"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn apply(&self, _pcm: &[i16], _rate: u32, _chain: &FilterChain) -> FxResult<Vec<i16>> {
            panic!("must not be invoked when unavailable");
        }
    }

    #[test]
    fn test_identity_fast_path() {
        let recorder = Arc::new(RecordingTransform::default());
        let renderer = AudioRenderer::new(Arc::clone(&recorder));
        let pcm = vec![1i16, 2, 3];

        let out = renderer.render(&pcm, 24_000, 1.0, 0, 0.0).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(std::ptr::eq(out.as_ptr(), pcm.as_ptr()));
        assert!(recorder.calls.lock().unwrap().is_empty());

        let out = renderer.render(&pcm, 24_000, 1.0 + 1e-9, 0, 1e-9).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_identity_skips_availability_check() {
        let renderer = AudioRenderer::new(MissingTransform);
        let out = renderer.render(&[5, 6], 16_000, 1.0, 0, 0.0).unwrap();
        assert_eq!(&*out, &[5, 6]);
    }

    #[test]
    fn test_unavailable_fails_fast() {
        let renderer = AudioRenderer::new(MissingTransform);
        let err = renderer.render(&[5, 6], 16_000, 1.2, 0, 0.0).unwrap_err();
        assert!(matches!(err, FxError::TransformUnavailable { .. }));
        assert_eq!(err.to_string(), "transform facility unavailable: ffmpeg");
    }

    #[test]
    fn test_transform_invoked_with_chain() {
        let recorder = Arc::new(RecordingTransform::default());
        let renderer = AudioRenderer::new(Arc::clone(&recorder));

        let out = renderer.render(&[1, 2, 3], 24_000, 3.0, 0, -3.0).unwrap();
        assert_eq!(&*out, &[3, 2, 1]);
        assert_eq!(
            recorder.calls.lock().unwrap().as_slice(),
            ["atempo=2.0,atempo=1.500000,volume=-3.00dB"]
        );
    }

    #[test]
    fn test_chain_pitch_octave_up() {
        let chain = build_chain(24_000, 1.0, 1200, 0.0);
        assert_eq!(
            chain.to_string(),
            "asetrate=48000,aresample=24000,atempo=0.500000"
        );
    }

    #[test]
    fn test_chain_pitch_compensates_tempo() {
        // an octave up doubles speed; asking for 2x tempo needs no tempo step
        let chain = build_chain(16_000, 2.0, 1200, 0.0);
        assert_eq!(chain.to_string(), "asetrate=32000,aresample=16000");

        let chain = build_chain(22_050, 1.0, -100, 0.0);
        let steps = chain.steps();
        assert_eq!(steps[0], FilterStep::SetRate(20_812));
        assert_eq!(steps[1], FilterStep::Resample(22_050));
        assert_eq!(steps[2], FilterStep::Tempo("1.059463".into()));
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_chain_slow_and_quiet() {
        let chain = build_chain(24_000, 0.2, 0, 4.0);
        assert_eq!(
            chain.to_string(),
            "atempo=0.5,atempo=0.5,atempo=0.800000,volume=4.00dB"
        );
    }

    #[test]
    fn test_chain_gain_only() {
        let chain = build_chain(24_000, 1.0, 0, -2.0);
        assert_eq!(chain.to_string(), "volume=-2.00dB");
    }

    #[test]
    fn test_render_params_matches_render() {
        let recorder = Arc::new(RecordingTransform::default());
        let renderer = AudioRenderer::new(Arc::clone(&recorder));
        let params = EffectiveParams::root().add_gain(4.0).scale_tempo(0.94);

        renderer.render_params(&[0; 4], 24_000, params).unwrap();
        assert_eq!(
            recorder.calls.lock().unwrap().as_slice(),
            ["atempo=0.940000,volume=4.00dB"]
        );
    }

    #[test]
    fn test_render_silence() {
        assert_eq!(render_silence(0.5, 24_000).unwrap().len(), 12_000);
        assert_eq!(render_silence(0.3, 22_050).unwrap().len(), 6615);
        assert!(render_silence(0.0, 24_000).unwrap().is_empty());
        assert!(render_silence(-1.0, 24_000).unwrap().is_empty());
        assert!(render_silence(f64::NAN, 24_000).unwrap().is_empty());
        assert!(render_silence(1.0, 16_000).unwrap().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_render_silence_rejects_oversized() {
        for duration in [1e300, f64::INFINITY, 1e7] {
            let err = render_silence(duration, 48_000).unwrap_err();
            assert!(matches!(err, FxError::InvalidInput(_)), "{duration}");
        }
        assert!(render_silence(f64::NEG_INFINITY, 48_000).unwrap().is_empty());
    }
}

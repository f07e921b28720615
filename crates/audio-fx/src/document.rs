//! Document-level rendering: one PCM buffer per compiled unit.

use crate::render::{AudioRenderer, render_silence};
use ssml_core::{AudioTransform, FxResult, Segment, SpeechSynthesizer, Token};
use tracing::{debug, instrument};

/// Render compiled segments in order.
///
/// Text goes through `synth` and then the renderer with the segment's
/// params; breaks become silence at the synthesizer's sample rate. The first
/// failure is returned and later segments are not attempted.
#[instrument(skip_all, fields(segments = segments.len()))]
pub fn render_segments<S, T>(
    segments: &[Segment],
    synth: &S,
    renderer: &AudioRenderer<T>,
) -> FxResult<Vec<Vec<i16>>>
where
    S: SpeechSynthesizer + ?Sized,
    T: AudioTransform,
{
    let sample_rate = synth.sample_rate();
    let mut buffers = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let pcm = match segment {
            Segment::Break { duration_ms } => silence_ms(*duration_ms, sample_rate)?,
            Segment::Text { content, .. } => {
                let params = segment.params().unwrap_or_default();
                debug!(index, chars = content.len(), ?params, "rendering text segment");
                let raw = synth.synthesize(content)?;
                renderer
                    .render_params(&raw, sample_rate, params)?
                    .into_owned()
            }
        };
        buffers.push(pcm);
    }

    Ok(buffers)
}

/// Render break-tokenized text in order, without prosody effects.
#[instrument(skip_all, fields(tokens = tokens.len()))]
pub fn render_tokens<S>(tokens: &[Token], synth: &S) -> FxResult<Vec<Vec<i16>>>
where
    S: SpeechSynthesizer + ?Sized,
{
    let sample_rate = synth.sample_rate();
    tokens
        .iter()
        .map(|token| match token {
            Token::Text { content } => synth.synthesize(content.trim()),
            Token::Break { duration_ms } => silence_ms(*duration_ms, sample_rate),
        })
        .collect()
}

fn silence_ms(duration_ms: u32, sample_rate: u32) -> FxResult<Vec<i16>> {
    render_silence(f64::from(duration_ms) / 1000.0, sample_rate)
}

/// Concatenate buffers into one.
pub fn concat_pcm(buffers: &[Vec<i16>]) -> Vec<i16> {
    buffers.concat()
}

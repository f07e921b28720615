//! Silence command implementation.

use anyhow::{Result, bail};
use audio_fx::{render_silence, write_wav_mono_i16};
use std::path::Path;
use tracing::info;

/// Run the silence command.
pub fn run(duration: &str, output: &Path, sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        bail!("sample rate must be positive");
    }
    let ms = ssml_markup::parse_duration(duration);
    let pcm = render_silence(f64::from(ms) / 1000.0, sample_rate)?;
    write_wav_mono_i16(output, &pcm, sample_rate)?;

    info!(
        duration_ms = ms,
        samples = pcm.len(),
        output = %output.display(),
        "Wrote silence"
    );
    println!("Wrote {} samples ({ms}ms) to {}", pcm.len(), output.display());
    Ok(())
}

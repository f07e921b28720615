//! Effects commands: tempo planning and WAV rendering.

use anyhow::{Result, bail};
use audio_fx::{
    AudioRenderer, FfmpegTransform, build_chain, plan_tempo, read_wav_mono_i16, write_wav_mono_i16,
};
use ssml_core::{EffectiveParams, TransformConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Options for the fx command.
#[derive(Debug, Clone, Default)]
pub struct FxOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub emphasis: Option<String>,
    pub tempo: Option<f64>,
    pub pitch_cents: Option<i32>,
    pub gain_db: Option<f64>,
    pub dry_run: bool,
}

impl FxOptions {
    /// Fold the markup-style and numeric options into one set of params.
    pub fn params(&self) -> EffectiveParams {
        let mut params = EffectiveParams::root();
        if let Some(rate) = &self.rate {
            params = params.scale_tempo(ssml_markup::rate_to_tempo(rate));
        }
        if let Some(pitch) = &self.pitch {
            params = params.shift_pitch(ssml_markup::pitch_to_cents(pitch));
        }
        if let Some(level) = &self.emphasis {
            let (gain_db, tempo) = ssml_markup::emphasis_fx(level);
            params = params.add_gain(gain_db).scale_tempo(tempo);
        }
        if let Some(tempo) = self.tempo {
            params = params.scale_tempo(tempo);
        }
        if let Some(cents) = self.pitch_cents {
            params = params.shift_pitch(cents);
        }
        if let Some(db) = self.gain_db {
            params = params.add_gain(db);
        }
        params
    }
}

/// Run the tempo-plan command.
pub fn tempo_plan(tempo: f64) {
    let steps = plan_tempo(tempo);
    let product: f64 = steps.iter().filter_map(|s| s.parse::<f64>().ok()).product();
    println!("Target:  {tempo}");
    println!("Steps:   {}", steps.join(" -> "));
    println!("Product: {product:.6}");
}

/// Run the fx command.
pub fn run(options: &FxOptions, config: &TransformConfig) -> Result<()> {
    let params = options.params();
    if let Some(tempo) = options.tempo
        && !(tempo.is_finite() && tempo > 0.0)
    {
        bail!("tempo must be a positive number, got {tempo}");
    }

    let (pcm, sample_rate) = read_wav_mono_i16(&options.input)?;
    let chain = build_chain(sample_rate, params.tempo, params.pitch_cents, params.gain_db);
    info!(
        input = %options.input.display(),
        samples = pcm.len(),
        sample_rate,
        ?params,
        %chain,
        "Loaded input"
    );

    if options.dry_run {
        println!("{chain}");
        return Ok(());
    }
    let Some(output) = &options.output else {
        bail!("--output is required unless --dry-run is given");
    };

    let start = Instant::now();
    let out = if chain.is_identity() {
        debug!("Identity chain, copying input");
        pcm
    } else {
        let renderer = AudioRenderer::new(FfmpegTransform::require(config)?);
        renderer.render_params(&pcm, sample_rate, params)?.into_owned()
    };
    write_wav_mono_i16(output, &out, sample_rate)?;

    info!(
        output = %output.display(),
        samples = out.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Wrote output"
    );
    println!(
        "Wrote {} samples ({:.2}s) to {}",
        out.len(),
        out.len() as f64 / f64::from(sample_rate),
        output.display()
    );
    Ok(())
}

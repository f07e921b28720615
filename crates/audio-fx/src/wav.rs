//! WAV container I/O for mono 16-bit PCM.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ssml_core::{FxError, FxResult};
use std::path::Path;

fn wav_err(e: hound::Error) -> FxError {
    FxError::wav(e.to_string())
}

/// Write mono signed 16-bit samples to a WAV file.
pub fn write_wav_mono_i16(
    path: impl AsRef<Path>,
    samples: &[i16],
    sample_rate: u32,
) -> FxResult<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec).map_err(wav_err)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)?;

    Ok(())
}

/// Read a WAV file as mono signed 16-bit samples.
///
/// Only the first channel of multi-channel files is kept. Integer formats of
/// other widths are rescaled to 16 bits and float samples are clamped to
/// `[-1.0, 1.0]` before conversion.
///
/// # Returns
/// The samples and the file's sample rate.
pub fn read_wav_mono_i16(path: impl AsRef<Path>) -> FxResult<(Vec<i16>, u32)> {
    let mut reader = WavReader::open(path.as_ref()).map_err(wav_err)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .step_by(channels)
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_err)?,
        (SampleFormat::Int, bits) if bits <= 32 => reader
            .samples::<i32>()
            .step_by(channels)
            .map(|s| s.map(|s| rescale_to_i16(s, bits)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_err)?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .step_by(channels)
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_err)?,
        (format, bits) => {
            return Err(FxError::wav(format!(
                "unsupported sample format {format:?} with {bits} bits"
            )));
        }
    };

    Ok((samples, spec.sample_rate))
}

fn rescale_to_i16(sample: i32, bits: u16) -> i16 {
    let shifted = if bits > 16 {
        sample >> (bits - 16)
    } else {
        sample << (16 - bits)
    };
    shifted.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

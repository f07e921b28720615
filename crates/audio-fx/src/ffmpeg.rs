//! ffmpeg-backed [`AudioTransform`].
//!
//! Each call works in its own scratch directory holding the input WAV, the
//! output WAV and ffmpeg's stderr log. The directory is removed when the call
//! returns, whether it succeeded, failed or timed out.

use crate::wav::{read_wav_mono_i16, write_wav_mono_i16};
use ssml_core::{AudioTransform, FilterChain, FxError, FxResult, TransformConfig};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs filter chains through an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct FfmpegTransform {
    bin: PathBuf,
    name: String,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
    available: bool,
}

impl FfmpegTransform {
    /// Create a transform from config, probing the executable once.
    ///
    /// A missing executable is not an error here; calls that need it fail
    /// with [`FxError::TransformUnavailable`]. Use [`Self::require`] to fail
    /// at construction instead.
    pub fn new(config: &TransformConfig) -> Self {
        let available = probe(&config.ffmpeg_bin);
        if available {
            info!(bin = ?config.ffmpeg_bin, "Detected ffmpeg binary");
        } else {
            warn!(bin = ?config.ffmpeg_bin, "ffmpeg not found; only identity renders will work");
        }
        Self {
            bin: config.ffmpeg_bin.clone(),
            name: config.ffmpeg_bin.display().to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
            temp_dir: config.temp_dir.clone(),
            available,
        }
    }

    /// Create a transform, failing immediately if ffmpeg cannot be run.
    pub fn require(config: &TransformConfig) -> FxResult<Self> {
        let transform = Self::new(config);
        if !transform.available {
            return Err(FxError::transform_unavailable(transform.name));
        }
        Ok(transform)
    }

    /// Path or name of the executable.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn scratch_dir(&self) -> FxResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ssml-fx-");
        let dir = match &self.temp_dir {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl AudioTransform for FfmpegTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    #[instrument(skip(self, pcm, chain), fields(samples = pcm.len(), filter = %chain))]
    fn apply(&self, pcm: &[i16], sample_rate: u32, chain: &FilterChain) -> FxResult<Vec<i16>> {
        if !self.available {
            return Err(FxError::transform_unavailable(self.name.as_str()));
        }

        let scratch = self.scratch_dir()?;
        let input = scratch.path().join("in.wav");
        let output = scratch.path().join("out.wav");
        let log = scratch.path().join("ffmpeg.log");

        write_wav_mono_i16(&input, pcm, sample_rate)?;

        let filter = chain.to_string();
        let started = Instant::now();
        let mut child = Command::new(&self.bin)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(&input)
            .arg("-af")
            .arg(&filter)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(File::create(&log)?))
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => FxError::transform_unavailable(self.name.as_str()),
                _ => FxError::Io(e),
            })?;

        let Some(status) = wait_with_timeout(&mut child, self.timeout)? else {
            let _ = child.kill();
            let _ = child.wait();
            warn!(timeout_ms = self.timeout_ms(), "ffmpeg timed out; killed");
            return Err(FxError::Timeout {
                ms: self.timeout_ms(),
            });
        };

        if !status.success() {
            let stderr = std::fs::read_to_string(&log).unwrap_or_default();
            return Err(FxError::TransformFailed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let (samples, out_rate) = read_wav_mono_i16(&output)?;
        if out_rate != sample_rate {
            debug!(out_rate, sample_rate, "transform changed the container rate");
        }
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            out_samples = samples.len(),
            "applied ffmpeg filter chain"
        );
        Ok(samples)
    }
}

/// Run `<bin> -version` and report whether it exits successfully.
fn probe(bin: &Path) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Wait for `child`, returning `None` once `timeout` elapses.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_config() -> TransformConfig {
        TransformConfig {
            ffmpeg_bin: PathBuf::from("/nonexistent/bin/ffmpeg-for-tests"),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_binary_detected_at_construction() {
        let transform = FfmpegTransform::new(&missing_config());
        assert!(!transform.is_available());
        assert_eq!(transform.name(), "/nonexistent/bin/ffmpeg-for-tests");
        assert_eq!(transform.bin(), Path::new("/nonexistent/bin/ffmpeg-for-tests"));
    }

    #[test]
    fn test_require_fails_fast() {
        let err = FfmpegTransform::require(&missing_config()).unwrap_err();
        assert!(matches!(err, FxError::TransformUnavailable { .. }));
    }

    #[test]
    fn test_apply_unavailable() {
        let transform = FfmpegTransform::new(&missing_config());
        let err = transform
            .apply(&[0; 16], 16_000, &FilterChain::new())
            .unwrap_err();
        assert!(matches!(err, FxError::TransformUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_timeout() {
        let mut fast = Command::new("true").spawn().unwrap();
        let status = wait_with_timeout(&mut fast, Duration::from_secs(5)).unwrap();
        assert!(status.is_some_and(|s| s.success()));

        let mut slow = Command::new("sleep").arg("5").spawn().unwrap();
        let status = wait_with_timeout(&mut slow, Duration::from_millis(50)).unwrap();
        assert!(status.is_none());
        slow.kill().unwrap();
        slow.wait().unwrap();
    }
}

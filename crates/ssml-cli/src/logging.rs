//! Subscriber setup for the `ssml-fx` binary.

use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if s.eq_ignore_ascii_case("text") || s.eq_ignore_ascii_case("pretty") {
            Ok(Self::Text)
        } else {
            Err(format!("unknown log format: {s}"))
        }
    }
}

/// Install the global subscriber; `RUST_LOG` wins over `level`.
///
/// Logs go to stderr so stdout carries only command output (JSON included).
/// A second call is a no-op.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(err) = installed {
        eprintln!("logging already initialized: {err}");
    }
}

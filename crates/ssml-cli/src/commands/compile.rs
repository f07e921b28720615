//! Compile command implementation.

use super::read_input;
use anyhow::Result;
use audio_fx::build_chain;
use ssml_core::Segment;
use tracing::info;

/// Run the compile command.
///
/// Prints the segment list as JSON. With `chains_at`, each text segment is
/// followed on stderr by the filter chain it would request at that rate.
pub fn run(input: &str, compact: bool, chains_at: Option<u32>) -> Result<()> {
    let text = read_input(input)?;
    let segments = ssml_markup::compile(&text);
    info!(
        segments = segments.len(),
        breaks = segments.iter().filter(|s| s.is_break()).count(),
        "Compiled markup"
    );

    let json = if compact {
        serde_json::to_string(&segments)?
    } else {
        serde_json::to_string_pretty(&segments)?
    };
    println!("{json}");

    if let Some(sample_rate) = chains_at {
        for (i, segment) in segments.iter().enumerate() {
            if let Segment::Text {
                tempo,
                pitch_cents,
                gain_db,
                ..
            } = segment
            {
                let chain = build_chain(sample_rate, *tempo, *pitch_cents, *gain_db);
                eprintln!("  {i}: {chain}");
            }
        }
    }
    Ok(())
}

//! Info command implementation.

use audio_fx::FfmpegTransform;
use ssml_core::{AudioTransform, FxConfig, MAX_BREAK_MS};

/// Run the info command.
pub fn run(config: &FxConfig) {
    println!("ssml-fx");
    println!("=======");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!();

    let transform = FfmpegTransform::new(&config.transform);
    println!("Transform:");
    println!("  Binary:      {}", transform.bin().display());
    println!("  Available:   {}", transform.is_available());
    println!("  Timeout:     {}ms", config.transform.timeout_ms);
    match &config.transform.temp_dir {
        Some(dir) => println!("  Temp dir:    {}", dir.display()),
        None => println!("  Temp dir:    {}", std::env::temp_dir().display()),
    }
    println!();
    println!("Render:");
    println!("  Sample rate: {}Hz", config.render.sample_rate);
    println!("  Max break:   {MAX_BREAK_MS}ms");
    println!();
    println!("Logging:");
    println!("  Level:       {}", config.logging.level);
    println!("  Format:      {}", config.logging.format);
    println!();
    println!("Crates:");
    println!("  ssml-core:   Shared types, errors and configuration");
    println!("  ssml-markup: Markup repair, tokenization and prosody compilation");
    println!("  audio-fx:    Tempo/pitch/gain rendering and WAV helpers");
    println!("  ssml-cli:    This CLI tool");
}

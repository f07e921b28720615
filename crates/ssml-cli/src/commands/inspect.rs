//! Text-only commands: detection, repair, tokenization and pause rewriting.

use super::read_input;
use anyhow::Result;
use ssml_core::Token;

/// Run the detect command.
pub fn detect(input: &str) -> Result<()> {
    let text = read_input(input)?;
    let markup = ssml_markup::is_markup(&text);
    let prosody = ssml_markup::has_prosody_or_emphasis(&text);
    let repaired = ssml_markup::normalize(&text) != text.as_str();

    println!("Markup:             {markup}");
    println!("Prosody/emphasis:   {prosody}");
    println!("Needs repair:       {repaired}");
    println!(
        "Path:               {}",
        if prosody {
            "compile"
        } else if markup {
            "tokenize"
        } else {
            "plain"
        }
    );
    Ok(())
}

/// Run the normalize command.
pub fn normalize(input: &str) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", ssml_markup::normalize(&text));
    Ok(())
}

/// Run the tokenize command.
pub fn tokenize(input: &str, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let tokens = ssml_markup::tokenize(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!("Tokens: {} total", tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Text { content } => println!("  {i}: text  {content:?}"),
            Token::Break { duration_ms } => println!("  {i}: break {duration_ms}ms"),
        }
    }
    Ok(())
}

/// Run the pauses command.
pub fn pauses(input: &str) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", ssml_markup::render_as_pause_markup(&text));
    Ok(())
}

//! Integration tests for the markup front end.

use ssml_core::{EffectiveParams, Segment, Token};
use ssml_markup::{
    compile, has_prosody_or_emphasis, is_markup, merge_adjacent, normalize,
    render_as_pause_markup, tokenize,
};

/// Documents exercised by several property checks.
const CORPUS: &[&str] = &[
    "<speak>Hello world</speak>",
    r#"<speak>Hi <break time="500ms"/> there <break time="2s"/>friend</speak>"#,
    r#"Intro <break time equals "800ms " slash > outro"#,
    r#"<speak><prosody rate="slow">Slow <emphasis level="reduced">soft</emphasis></prosody> normal</speak>"#,
    r#"<speak>a<break time="15000ms"/>b<break time="bogus"/>c</speak>"#,
    "No markup here at all.",
    "",
    "<speak>broken <prosody></speak>",
];

fn strip_tags(text: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[test]
fn test_tokenize_keeps_all_non_blank_text() {
    let input = r#"<speak>The quick <break time="200ms"/>brown fox <break time="1s"/>  <break time="1s"/>jumps.</speak>"#;
    let tokens = tokenize(input);

    let joined: String = tokens.iter().filter_map(Token::as_text).collect();
    let expected: String = strip_tags(input);
    assert_eq!(joined.split_whitespace().collect::<Vec<_>>(), expected.split_whitespace().collect::<Vec<_>>());
    assert_eq!(joined, "The quick brown fox jumps.");
    assert_eq!(
        tokens.iter().filter(|t| matches!(t, Token::Break { .. })).count(),
        3
    );
}

#[test]
fn test_break_durations_always_clamped() {
    for doc in CORPUS {
        for token in tokenize(doc) {
            if let Token::Break { duration_ms } = token {
                assert!(duration_ms <= 10_000);
            }
        }
        for segment in compile(doc) {
            if let Segment::Break { duration_ms } = segment {
                assert!(duration_ms <= 10_000);
            }
        }
    }
}

#[test]
fn test_clamped_and_bogus_breaks() {
    let tokens = tokenize(r#"<speak>a<break time="15000ms"/>b<break time="bogus"/>c</speak>"#);
    let breaks: Vec<u32> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Break { duration_ms } => Some(*duration_ms),
            Token::Text { .. } => None,
        })
        .collect();
    assert_eq!(breaks, vec![10_000, 0]);
}

#[test]
fn test_compile_never_empty_for_non_empty_text() {
    for doc in CORPUS.iter().filter(|d| !d.trim().is_empty()) {
        let segments = compile(doc);
        assert!(!segments.is_empty(), "no segments for {doc:?}");
    }
}

#[test]
fn test_compile_empty_document_has_no_segments() {
    // A well-formed document without text compiles to nothing; only
    // unparseable input falls back to a text segment.
    let docs = [
        "<speak/>",
        "<speak> </speak>",
        "<speak>\n  <prosody rate=\"fast\"/>\n</speak>",
    ];
    for doc in docs {
        assert!(compile(doc).is_empty(), "expected no segments for {doc:?}");
    }
    assert_eq!(compile("").len(), 1);
}

#[test]
fn test_compile_merge_is_stable() {
    for doc in CORPUS {
        let segments = compile(doc);
        assert_eq!(merge_adjacent(segments.clone()), segments);
    }
}

#[test]
fn test_normalize_idempotent_over_corpus() {
    for doc in CORPUS {
        let once = normalize(doc).into_owned();
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_detection_routes() {
    let prosody = r#"<speak><prosody rate="fast">quick</prosody></speak>"#;
    assert!(is_markup(prosody));
    assert!(has_prosody_or_emphasis(prosody));

    let breaks_only = r#"Wait <break time="1s"/> done"#;
    assert!(is_markup(breaks_only));
    assert!(!has_prosody_or_emphasis(breaks_only));
    assert_eq!(render_as_pause_markup(breaks_only), "Wait [pause:1s] done");

    assert!(!is_markup("plain"));
}

#[test]
fn test_full_document() {
    let segments = compile(
        r#"<speak>
            Welcome.
            <break time="750ms"/>
            <prosody rate="x-slow" pitch="-2st">This part is slow and low,
                <emphasis level="strong">especially this</emphasis>.
            </prosody>
            <prosody rate="120%">Back to a brisk pace.</prosody>
        </speak>"#,
    );

    let slow_low = EffectiveParams::root().scale_tempo(0.8).shift_pitch(-200);
    assert_eq!(segments.len(), 6);
    assert_eq!(segments[0], Segment::text("Welcome.", EffectiveParams::root()));
    assert_eq!(segments[1], Segment::Break { duration_ms: 750 });
    assert_eq!(segments[2], Segment::text("This part is slow and low,", slow_low));
    assert_eq!(
        segments[3],
        Segment::text("especially this", slow_low.add_gain(4.0).scale_tempo(0.94))
    );
    assert_eq!(segments[4], Segment::text(".", slow_low));
    assert_eq!(
        segments[5],
        Segment::text("Back to a brisk pace.", EffectiveParams::root().scale_tempo(1.2))
    );
}

#[test]
fn test_segments_serialize_for_downstream() {
    let segments = compile(r#"<speak>Hi<break time="1s"/></speak>"#);
    let json = serde_json::to_value(&segments).unwrap();
    assert_eq!(json[0]["type"], "text");
    assert_eq!(json[0]["content"], "Hi");
    assert_eq!(json[0]["tempo"], 1.0);
    assert_eq!(json[1]["type"], "break");
    assert_eq!(json[1]["duration_ms"], 1000);
}

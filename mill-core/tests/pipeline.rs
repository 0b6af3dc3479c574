//! End to end tests for the conversion pipeline (markup → HTML)
//!
//! Each stage has unit tests next to its code; these tests run whole
//! documents through lex → preprocess → generate and check the resulting
//! HTML, plus a few properties that must hold for arbitrary input.

use insta::assert_snapshot;
use proptest::prelude::*;

use mill_core::generator::{escape_html, generate};
use mill_core::lexer::lex;
use mill_core::preprocessor::{preprocess, InjectionRegistry};

/// Helper to convert a document to HTML with no injection extensions.
fn to_html(input: &[u8]) -> String {
    let (text, formats) = lex(input).unwrap();
    let formats = preprocess(&text, formats, &InjectionRegistry::new()).unwrap();
    String::from_utf8(generate(&text, &formats)).unwrap()
}

#[test]
fn test_kitchen_sink() {
    let src = b"+++\ntitle = \"Hello\"\n+++\n# Intro\n\nSome *emphasis* and a [link](/about).\n\n\
* one\n* two\n\n> quoted\n\n`1 < 2`\n\n|a|\n|b|\n";
    assert_snapshot!(to_html(src), @r###"
    <h1 class="title">Hello</h1><h1>Intro</h1>
    Some <em>emphasis</em> and a <a href="/about">link</a>.
    <ul><li>one</li>
    <li>two</li></ul>
    <blockquote>quoted</blockquote>
    <code>1 &lt; 2</code>
    <table><tbody><tr><td>|a|</td></tr>
    <tr><td>|b|</td></tr></tbody></table>
    "###);
}

#[test]
fn test_raw_html_survives_minus_markup() {
    let html = to_html(b"<p>kept <b>as-is</b></p>\n\nplain *text*");
    assert_snapshot!(html, @r###"
    <p>kept <b>as-is</b></p>
    plain <em>text</em>
    "###);
}

#[test]
fn test_injection_extension_end_to_end() {
    let mut registry = InjectionRegistry::new();
    registry.register(
        "shout",
        Box::new(|body: &[u8]| Ok(vec![body.to_ascii_uppercase()])),
    );

    let (text, formats) = lex(b"before\n\n```x,inject=shout\nloud```\n\nafter").unwrap();
    let formats = preprocess(&text, formats, &registry).unwrap();
    let html = String::from_utf8(generate(&text, &formats)).unwrap();
    assert_eq!(html, "before\nLOUD\nafter");
}

#[test]
fn test_conversion_is_deterministic() {
    // The stages are pure functions; converting the same bytes twice must
    // produce byte-identical markup.
    let src = b"+++\ntitle = \"T\"\n+++\n# Intro\n\n*text* and [a link](/x)\n\n* one\n* two\n\n|r|\n";
    assert_eq!(to_html(src), to_html(src));
}

#[test]
fn test_events_serialize_for_inspection() {
    let (_, formats) = lex(b"# hi\n\n*a*").unwrap();
    let value = serde_json::to_value(&formats).unwrap();
    let kinds: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event[1]["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["heading", "heading", "break", "emphasis", "emphasis"]);
}

#[test]
fn test_malformed_input_reports_position() {
    let err = lex(b"a\nb\n```rust\nnever closed").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("closing code fence"), "{msg}");
    assert!(msg.contains("4:0"), "{msg}");
}

proptest! {
    /// Lexing never panics, and when it succeeds the event offsets are
    /// non-decreasing and stay within the stripped text.
    #[test]
    fn lexer_offsets_are_ordered(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        if let Ok((text, formats)) = lex(&data) {
            prop_assert!(text.len() <= data.len());
            let mut last = 0;
            for (offset, _) in &formats {
                prop_assert!(*offset >= last);
                prop_assert!(*offset <= text.len());
                last = *offset;
            }
        }
    }

    /// Escaped output never contains a byte that could open markup.
    #[test]
    fn escaping_leaves_no_markup_bytes(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let escaped = escape_html(&data);
        for forbidden in [b'<', b'>', b'"', b'\''] {
            prop_assert!(!escaped.contains(&forbidden));
        }
    }

    /// Text with no markup bytes passes through the pipeline untouched.
    #[test]
    fn plain_text_round_trips(text in "[a-z ]{0,64}") {
        prop_assert_eq!(to_html(text.as_bytes()), text);
    }
}

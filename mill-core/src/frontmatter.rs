//! Restricted line-oriented front matter parser.
//!
//! Understands just enough of a TOML-like dialect for document metadata:
//! `key = value` and `key = [v1, v2]` lines with bare or double-quoted
//! scalars. `[section]` lines and blank lines are ignored, and so are lines
//! without a `=`. This is not a general-purpose configuration parser; site
//! configuration goes through mill-config instead.

use std::collections::BTreeMap;

/// Parsed front matter: each key maps to one or more values.
pub type Meta = BTreeMap<Vec<u8>, Vec<Vec<u8>>>;

fn trim_set<'a>(mut bytes: &'a [u8], set: &[u8]) -> &'a [u8] {
    while let Some(first) = bytes.first() {
        if !set.contains(first) {
            break;
        }
        bytes = &bytes[1..];
    }
    while let Some(last) = bytes.last() {
        if !set.contains(last) {
            break;
        }
        bytes = &bytes[..bytes.len() - 1];
    }
    bytes
}

fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    trim_set(bytes, b" \t\r\x0c")
}

/// Parses a front matter block (fences excluded) into a key/values map.
pub fn parse(content: &[u8]) -> Meta {
    let mut result = Meta::new();

    for line in content.split(|b| *b == b'\n') {
        let line = trim_whitespace(line);
        if line.is_empty() || line[0] == b'[' {
            continue;
        }
        let Some(eq) = line.iter().position(|b| *b == b'=') else {
            continue;
        };

        let name = trim_set(trim_whitespace(&line[..eq]), b"\" ");
        let value = trim_whitespace(&line[eq + 1..]);
        let values = if value.first() == Some(&b'[') {
            value
                .split(|b| *b == b',')
                .map(|v| trim_set(v, b"[\" ]").to_vec())
                .collect()
        } else {
            vec![trim_set(value, b"\" ").to_vec()]
        };

        result.insert(name.to_vec(), values);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(meta: &'a Meta, key: &[u8]) -> Vec<&'a [u8]> {
        meta[key].iter().map(|v| v.as_slice()).collect()
    }

    #[test]
    fn parses_scalars_lists_and_skips_sections() {
        let meta = parse(
            br#"
title = "Some, title"
date = 1234-56-78
[taxonomies]
category = ["cat"]
tags = ["t", "a", "g"]
"#,
        );

        assert_eq!(values(&meta, b"title"), [&b"Some, title"[..]]);
        assert_eq!(values(&meta, b"date"), [&b"1234-56-78"[..]]);
        assert_eq!(values(&meta, b"category"), [&b"cat"[..]]);
        assert_eq!(values(&meta, b"tags"), [&b"t"[..], b"a", b"g"]);
        assert_eq!(meta.len(), 4);
    }

    #[test]
    fn ignores_lines_without_an_equals_sign() {
        let meta = parse(b"not a pair\ntitle = ok");
        assert_eq!(values(&meta, b"title"), [&b"ok"[..]]);
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(parse(b"").is_empty());
        assert!(parse(b"\n\n").is_empty());
    }
}

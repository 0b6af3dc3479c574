//! HTML generator: stripped text + preprocessed events → HTML bytes.
//!
//! Each event is first rendered to a markup fragment anchored at its offset.
//! Pairable events follow the toggle protocol: a fragment whose format is
//! already on the open stack closes it, anything else opens. The fragments
//! are then spliced into the text in a single reverse pass, so that several
//! fragments anchored at the same offset come out in event order.
//!
//! The function is total: every [`Format`] variant has generator code, and
//! the exhaustive match makes an unrenderable event unrepresentable.

use crate::format::{Event, Format, GroupKind};
use crate::frontmatter;

/// Escapes text for safe inclusion in HTML content or attribute values.
pub fn escape_html(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for &b in text {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            b'\'' => out.extend_from_slice(b"&#x27;"),
            _ => out.push(b),
        }
    }
    out
}

fn level_tag(open: bool, level: u8) -> Vec<u8> {
    let mut tag = Vec::with_capacity(5);
    tag.push(b'<');
    if !open {
        tag.push(b'/');
    }
    tag.push(b'h');
    tag.push(b'0' + level);
    tag.push(b'>');
    tag
}

/// Renders the document body. Offsets must be non-decreasing and pairable
/// events paired, which [`crate::preprocessor::preprocess`] guarantees.
pub fn generate(text: &[u8], formats: &[Event]) -> Vec<u8> {
    let mut segments: Vec<(usize, Vec<u8>)> = Vec::with_capacity(formats.len());
    let mut open: Vec<Format> = Vec::new();

    for (i, f) in formats {
        let i = *i;
        let closing = match open.iter().position(|o| o == f) {
            Some(at) if f.is_pairable() => {
                open.remove(at);
                true
            }
            _ => {
                if f.is_pairable() {
                    open.push(f.clone());
                }
                false
            }
        };

        match f {
            Format::Metadata { content } => {
                let meta = frontmatter::parse(content);
                if let Some(title) = meta.get(&b"title"[..]).and_then(|v| v.first()) {
                    segments.push((
                        i,
                        [b"<h1 class=\"title\">", &title[..], b"</h1>"].concat(),
                    ));
                }
            }

            Format::Emphasis { strength } => {
                let markup: &[u8] = match (closing, strength) {
                    (false, 1) => b"<em>",
                    (false, 2) => b"<strong>",
                    (false, _) => b"<strong><em>",
                    (true, 1) => b"</em>",
                    (true, 2) => b"</strong>",
                    (true, _) => b"</em></strong>",
                };
                segments.push((i, markup.to_vec()));
            }

            Format::Reference { uri, id, .. } => {
                if closing {
                    segments.push((i, b"</a>".to_vec()));
                } else {
                    let mut markup = b"<a ".to_vec();
                    if !id.is_empty() {
                        markup.extend_from_slice(b"id=\"");
                        markup.extend_from_slice(id);
                        markup.extend_from_slice(b"\" ");
                    }
                    markup.extend_from_slice(b"href=\"");
                    markup.extend_from_slice(uri);
                    markup.extend_from_slice(b"\">");
                    segments.push((i, markup));
                }
            }

            Format::Heading { level } => segments.push((i, level_tag(!closing, *level))),

            Format::Item { .. } => {
                segments.push((i, if closing { b"</li>".to_vec() } else { b"<li>".to_vec() }))
            }

            Format::Quote => segments.push((
                i,
                if closing {
                    b"</blockquote>".to_vec()
                } else {
                    b"<blockquote>".to_vec()
                },
            )),

            Format::Fence { content, .. } => {
                segments.push((i, [b"<pre>", &escape_html(content)[..], b"</pre>"].concat()))
            }

            Format::Code { content } => segments.push((
                i,
                [b"<code>", &escape_html(content)[..], b"</code>"].concat(),
            )),

            Format::Row { content } => segments.push((
                i,
                [b"<tr><td>", &escape_html(content)[..], b"</td></tr>"].concat(),
            )),

            Format::Separator { .. } => segments.push((i, b"<hr />".to_vec())),

            Format::Break => {}

            Format::Raw { content } => segments.push((i, content.clone())),

            Format::Group { kind } => {
                let markup: &[u8] = match (closing, kind) {
                    (false, GroupKind::OrderedList) => b"<ol>",
                    (false, GroupKind::UnorderedList) => b"<ul>",
                    (false, GroupKind::Table) => b"<table><tbody>",
                    (true, GroupKind::OrderedList) => b"</ol>",
                    (true, GroupKind::UnorderedList) => b"</ul>",
                    (true, GroupKind::Table) => b"</tbody></table>",
                };
                segments.push((i, markup.to_vec()));
            }
        }
    }

    // Stable by offset, so same-offset fragments keep event order.
    segments.sort_by_key(|(p, _)| *p);

    let mut out = Vec::with_capacity(text.len() + segments.iter().map(|(_, a)| a.len()).sum::<usize>());

    // Fragments anchored at or past the end of the text (close events of
    // constructs that run to end of input) go after the last byte.
    while segments.last().map_or(false, |(p, _)| *p >= text.len()) {
        if let Some((_, markup)) = segments.pop() {
            out.extend(markup.iter().rev());
        }
    }

    for i in (0..text.len()).rev() {
        out.push(text[i]);
        while segments.last().map_or(false, |(p, _)| *p == i) {
            if let Some((_, markup)) = segments.pop() {
                out.extend(markup.iter().rev());
            }
        }
    }

    out.reverse();
    out
}

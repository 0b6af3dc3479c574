//! Byte-level lexer: raw bytes → (stripped text, offset-tagged events).
//!
//! A single forward scan tries fourteen rules in fixed priority order at
//! each cursor position; the first match wins and unmatched bytes are kept
//! verbatim. Matched syntax is never spliced out of the raw buffer. Instead
//! the lexer records *skip ranges*: half-open intervals of the raw buffer it
//! has already accounted for, each with an optional deferred event. When the
//! cursor enters a skip range it jumps to its end; when a range's end is
//! reached, its deferred event (if any) is anchored at the current stripped
//! length. Empty ranges carry the deferred "close" half of paired constructs
//! whose true end is discovered by lookahead (items, headings, quotes,
//! references) long before the cursor gets there.
//!
//! All event offsets index the stripped text buffer, never the raw buffer.

use std::ops::Range;

use crate::error::PipelineError;
use crate::format::{Event, Format};

/// Characters a backslash can escape. Anything else keeps the backslash.
const ESCAPABLE: &[u8] = b"\\[<`*+=_-";

/// Tags whose content is copied through completely unparsed.
const VERBATIM_TAGS: [&[u8]; 3] = [b"pre", b"script", b"style"];

/// Lexes one document.
///
/// Returns the stripped text and the event list, non-decreasing by offset.
/// Fails with [`PipelineError::MalformedFence`] when a delimited construct
/// has no terminator or its terminator does not match the opener.
pub fn lex(data: &[u8]) -> Result<(Vec<u8>, Vec<Event>), PipelineError> {
    let mut lexer = Lexer::new(data);
    while lexer.pos < data.len() {
        lexer.step()?;
        lexer.advance();
    }
    Ok((lexer.kept, lexer.formats))
}

struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    skips: Vec<(Range<usize>, Option<Format>)>,
    kept: Vec<u8>,
    formats: Vec<Event>,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            skips: Vec::new(),
            kept: Vec::new(),
            formats: Vec::new(),
        }
    }

    /// Moves the cursor one byte forward, then resolves skip ranges: jump
    /// out of any range containing the cursor (ranges may chain), and flush
    /// the deferred events of every range whose end has been reached.
    fn advance(&mut self) {
        self.pos += 1;
        loop {
            if self.skips.is_empty() {
                break;
            }
            let jump = self
                .skips
                .iter()
                .find(|(range, _)| range.contains(&self.pos))
                .map(|(range, _)| range.end);
            if let Some(end) = jump {
                self.pos = end;
                continue;
            }
            let mut i = 0;
            while i < self.skips.len() {
                if self.skips[i].0.end <= self.pos {
                    let (_, deferred) = self.skips.remove(i);
                    if let Some(format) = deferred {
                        self.emit(format);
                    }
                } else {
                    i += 1;
                }
            }
            break;
        }
    }

    fn step(&mut self) -> Result<(), PipelineError> {
        if self.try_escape()
            || self.try_verbatim_html()?
            || self.try_html_tag()
            || self.try_front_matter()?
            || self.try_separator()
            || self.try_item()
            || self.try_emphasis()
            || self.try_reference()?
            || self.try_heading()
            || self.try_fence()?
            || self.try_code()?
            || self.try_quote()
            || self.try_row()
            || self.try_break()
        {
            return Ok(());
        }
        self.kept.push(self.data[self.pos]);
        Ok(())
    }

    // --- helpers ---

    fn emit(&mut self, format: Format) {
        self.formats.push((self.kept.len(), format));
    }

    fn skip(&mut self, range: Range<usize>, deferred: Option<Format>) {
        self.skips.push((range, deferred));
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.data[self.pos - 1] == b'\n'
    }

    /// First occurrence of `needle` at or after `start`.
    fn find(&self, start: usize, needle: &[u8]) -> Option<usize> {
        if start > self.data.len() {
            return None;
        }
        self.data[start..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| start + i)
    }

    /// Position of the next newline at or after `start`, or end of input.
    fn line_end(&self, start: usize) -> usize {
        self.find(start, b"\n").unwrap_or(self.data.len())
    }

    /// First occurrence of `byte` in `start..end`.
    fn find_before(&self, start: usize, end: usize, byte: u8) -> Option<usize> {
        self.data[start..end]
            .iter()
            .position(|b| *b == byte)
            .map(|i| start + i)
    }

    fn unterminated(&self, search_start: usize, expected: String) -> PipelineError {
        let mut line = 1;
        let mut column = 0;
        for &b in &self.data[..search_start.min(self.data.len())] {
            if b == b'\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        PipelineError::MalformedFence {
            expected,
            line,
            column,
        }
    }

    // --- rules, in priority order ---

    /// Rule 1: `\` + escapable byte → keep the byte literally.
    fn try_escape(&mut self) -> bool {
        if self.data[self.pos] != b'\\' {
            return false;
        }
        match self.data.get(self.pos + 1) {
            Some(&c) if ESCAPABLE.contains(&c) => {
                self.skip(self.pos..self.pos + 2, None);
                self.kept.push(c);
                true
            }
            _ => false,
        }
    }

    /// Rule 2: `<pre`/`<script`/`<style` blocks are copied through verbatim
    /// until the matching literal end tag.
    fn try_verbatim_html(&mut self) -> Result<bool, PipelineError> {
        if self.data[self.pos] != b'<' {
            return Ok(false);
        }
        for tag in VERBATIM_TAGS {
            if !self.data[self.pos + 1..].starts_with(tag) {
                continue;
            }
            let close = [b"</", tag, b">"].concat();
            let search_start = self.pos + 1 + tag.len();
            let end = self
                .find(search_start, &close)
                .ok_or_else(|| {
                    self.unterminated(
                        search_start,
                        format!("closing </{}> tag", String::from_utf8_lossy(tag)),
                    )
                })?
                + close.len();
            self.skip(self.pos..end, None);
            self.kept.extend_from_slice(&self.data[self.pos..end]);
            return Ok(true);
        }
        Ok(false)
    }

    /// Rule 3: any other HTML tag is copied through verbatim until the next
    /// blank line or end of input, enabling multi-line inline HTML.
    fn try_html_tag(&mut self) -> bool {
        if self.data[self.pos] != b'<' {
            return false;
        }
        let mut i = self.pos + 1;
        if self.data.get(i) == Some(&b'/') {
            i += 1;
        }
        let word_start = i;
        while matches!(self.data.get(i), Some(c) if c.is_ascii_alphanumeric() || *c == b'_') {
            i += 1;
        }
        if i == word_start {
            return false;
        }
        let end = self.find(i, b"\n\n").unwrap_or(self.data.len());
        self.skip(self.pos..end, None);
        self.kept.extend_from_slice(&self.data[self.pos..end]);
        true
    }

    /// Rule 4: front matter, only valid at offset 0. Opened by 3+ `-`/`+`
    /// and a newline; closed by a newline, the exact same fence string and a
    /// newline or end of input. Any mismatch is fatal.
    fn try_front_matter(&mut self) -> Result<bool, PipelineError> {
        if self.pos != 0 {
            return Ok(false);
        }
        let mut i = 0;
        while matches!(self.data.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        if i < 3 || self.data.get(i) != Some(&b'\n') {
            return Ok(false);
        }
        let fence_len = i;
        let body_start = i + 1;

        // The closing fence must start right after a newline and be followed
        // by a newline or end of input; a shorter, longer or mixed-up fence
        // never matches.
        let mut search = body_start;
        let close = loop {
            let Some(nl) = self.find(search, b"\n") else {
                break None;
            };
            let after = nl + 1;
            if self.data.len() >= after + fence_len
                && self.data[after..after + fence_len] == self.data[..fence_len]
            {
                match self.data.get(after + fence_len) {
                    None => break Some((nl, after + fence_len)),
                    Some(&b'\n') => break Some((nl, after + fence_len + 1)),
                    _ => {}
                }
            }
            search = nl + 1;
        };

        let Some((body_end, skip_end)) = close else {
            return Err(self.unterminated(
                body_start,
                format!(
                    "closing front matter fence `{}`",
                    String::from_utf8_lossy(&self.data[..fence_len])
                ),
            ));
        };

        let content = self.data[body_start..body_end].to_vec();
        self.emit(Format::Metadata { content });
        self.skip(0..skip_end, None);
        Ok(true)
    }

    /// Rule 5: a line of `*`/`=`/`_`/`-` at line start. The style byte is the
    /// last of the run; the trailing newline is left for later rules.
    fn try_separator(&mut self) -> bool {
        if !self.at_line_start() {
            return false;
        }
        let mut i = self.pos;
        while matches!(self.data.get(i), Some(c) if b"*=_-".contains(c)) {
            i += 1;
        }
        if i == self.pos || !matches!(self.data.get(i), None | Some(&b'\n')) {
            return false;
        }
        self.emit(Format::Separator {
            style: self.data[i - 1],
        });
        self.skip(self.pos..i, None);
        true
    }

    /// Rule 6: `*`, `-` or `<digits>.` plus whitespace at line start. The
    /// close event is deferred to the end of the line, found by lookahead.
    fn try_item(&mut self) -> bool {
        if !self.at_line_start() {
            return false;
        }
        let start = self.pos;
        let (marker_end, ordered) = match self.data[start] {
            b'*' | b'-' => (start + 1, false),
            _ => {
                let mut i = start;
                while matches!(self.data.get(i), Some(c) if c.is_ascii_digit()) {
                    i += 1;
                }
                if i == start || self.data.get(i) != Some(&b'.') {
                    return false;
                }
                (i + 1, true)
            }
        };
        let mut after_marker = marker_end;
        while matches!(self.data.get(after_marker), Some(c) if c.is_ascii_whitespace()) {
            after_marker += 1;
        }
        if after_marker == marker_end {
            return false;
        }
        self.skip(start..after_marker, None);

        let close_at = self.line_end(after_marker);
        let item = Format::Item { ordered };
        self.emit(item.clone());
        self.skip(close_at..close_at, Some(item));
        true
    }

    /// Rule 7: 1-3 `*` not preceded by another `*`.
    fn try_emphasis(&mut self) -> bool {
        if self.data[self.pos] != b'*' || (self.pos > 0 && self.data[self.pos - 1] == b'*') {
            return false;
        }
        let mut run = 1;
        while run < 3 && self.data.get(self.pos + run) == Some(&b'*') {
            run += 1;
        }
        self.skip(self.pos..self.pos + run, None);
        self.emit(Format::Emphasis {
            strength: run as u8,
        });
        true
    }

    /// Rule 8: `[text]` or `![text]`, optionally followed by `(uri [alt])`.
    /// The closing bracket must be on the same line. The close event is
    /// deferred to the bracket/parenthetical span.
    fn try_reference(&mut self) -> Result<bool, PipelineError> {
        let start = self.pos;
        let bang = self.data[start] == b'!';
        let text_start = if bang {
            if self.data.get(start + 1) != Some(&b'[') {
                return Ok(false);
            }
            start + 2
        } else if self.data[start] == b'[' {
            start + 1
        } else {
            return Ok(false);
        };

        let line_end = self.line_end(text_start);
        let close = self
            .find_before(text_start, line_end, b']')
            .ok_or_else(|| self.unterminated(text_start, "closing `]` bracket".to_string()))?;

        let (uri, alt, span_end) = if self.data.get(close + 1) == Some(&b'(') {
            let paren = self
                .find_before(close + 1, line_end, b')')
                .ok_or_else(|| {
                    self.unterminated(close + 1, "closing `)` parenthesis".to_string())
                })?;
            let (uri, alt) = split_target(&self.data[close + 2..paren]);
            (uri, alt, paren + 1)
        } else {
            (Vec::new(), Vec::new(), close + 1)
        };

        self.skip(start..text_start, None);
        let reference = Format::Reference {
            bang,
            uri,
            alt,
            id: Vec::new(),
        };
        self.emit(reference.clone());
        self.skip(close..span_end, Some(reference));
        Ok(true)
    }

    /// Rule 9: `#` run at line start, capped at level 6; close deferred to
    /// the end of the line.
    fn try_heading(&mut self) -> bool {
        if !self.at_line_start() || self.data[self.pos] != b'#' {
            return false;
        }
        let mut i = self.pos;
        while self.data.get(i) == Some(&b'#') {
            i += 1;
        }
        let level = (i - self.pos).min(6) as u8;
        while matches!(self.data.get(i), Some(c) if c.is_ascii_whitespace()) {
            i += 1;
        }
        self.skip(self.pos..i, None);

        let close_at = self.line_end(i);
        let heading = Format::Heading { level };
        self.emit(heading.clone());
        self.skip(close_at..close_at, Some(heading));
        true
    }

    /// Rule 10: 3+ backticks, a language tag through the end of the line,
    /// then verbatim content until the first later occurrence of the exact
    /// same backtick run.
    fn try_fence(&mut self) -> Result<bool, PipelineError> {
        let start = self.pos;
        let mut i = start;
        while self.data.get(i) == Some(&b'`') {
            i += 1;
        }
        if i - start < 3 {
            return Ok(false);
        }
        let lang_end = self.line_end(i);
        if lang_end >= self.data.len() {
            // No newline after the opener; not a fence.
            return Ok(false);
        }
        let lang = self.data[i..lang_end].to_vec();
        let content_start = lang_end + 1;
        let fence = self.data[start..i].to_vec();
        let close = self.find(content_start, &fence).ok_or_else(|| {
            self.unterminated(
                content_start,
                format!("closing code fence `{}`", String::from_utf8_lossy(&fence)),
            )
        })?;

        self.emit(Format::Fence {
            content: self.data[content_start..close].to_vec(),
            lang,
        });
        self.skip(start..close + fence.len(), None);
        Ok(true)
    }

    /// Rule 11: single backtick; content until the next backtick on the same
    /// line. A lone backtick is fatal; escape it to keep it literal.
    fn try_code(&mut self) -> Result<bool, PipelineError> {
        if self.data[self.pos] != b'`' {
            return Ok(false);
        }
        let line_end = self.line_end(self.pos + 1);
        let close = self
            .find_before(self.pos + 1, line_end, b'`')
            .ok_or_else(|| self.unterminated(self.pos + 1, "closing backtick".to_string()))?;
        self.emit(Format::Code {
            content: self.data[self.pos + 1..close].to_vec(),
        });
        self.skip(self.pos..close + 1, None);
        Ok(true)
    }

    /// Rule 12: `>` at line start; close deferred to the end of the line.
    fn try_quote(&mut self) -> bool {
        if !self.at_line_start() || self.data[self.pos] != b'>' {
            return false;
        }
        let mut i = self.pos + 1;
        while matches!(self.data.get(i), Some(c) if c.is_ascii_whitespace()) {
            i += 1;
        }
        self.skip(self.pos..i, None);

        let close_at = self.line_end(i);
        self.emit(Format::Quote);
        self.skip(close_at..close_at, Some(Format::Quote));
        true
    }

    /// Rule 13: `|` at line start; the whole line, pipes included, is kept
    /// raw for the preprocessor to group and the generator to render.
    fn try_row(&mut self) -> bool {
        if !self.at_line_start() || self.data[self.pos] != b'|' {
            return false;
        }
        let line_end = self.line_end(self.pos + 1);
        self.emit(Format::Row {
            content: self.data[self.pos..line_end].to_vec(),
        });
        self.skip(self.pos..line_end, None);
        true
    }

    /// Rule 14: 2+ newlines collapse to a single kept newline plus a
    /// `Break` event, so later stages can detect block adjacency.
    fn try_break(&mut self) -> bool {
        if self.data[self.pos] != b'\n' || self.data.get(self.pos + 1) != Some(&b'\n') {
            return false;
        }
        let mut i = self.pos + 2;
        while self.data.get(i) == Some(&b'\n') {
            i += 1;
        }
        self.skip(self.pos..i, None);
        self.emit(Format::Break);
        self.kept.push(b'\n');
        true
    }
}

/// Splits a `(uri alt)` target: the URI is the first whitespace-delimited
/// token, the alt text is the remainder exactly as written.
fn split_target(target: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut i = 0;
    while i < target.len() && target[i].is_ascii_whitespace() {
        i += 1;
    }
    let uri_start = i;
    while i < target.len() && !target[i].is_ascii_whitespace() {
        i += 1;
    }
    let uri = target[uri_start..i].to_vec();
    while i < target.len() && target[i].is_ascii_whitespace() {
        i += 1;
    }
    (uri, target[i..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::GroupKind;

    fn lex_ok(data: &[u8]) -> (Vec<u8>, Vec<Event>) {
        lex(data).expect("input should lex")
    }

    #[test]
    fn escaping_known_characters() {
        for &c in ESCAPABLE {
            let input = [b"\\", &[c][..], b"\\text\\n\\", &[c][..]].concat();
            let expected = [&[c][..], b"\\text\\n", &[c][..]].concat();
            assert_eq!(lex_ok(&input), (expected, vec![]));
        }
    }

    #[test]
    fn html_passthrough() {
        let (text, events) =
            lex_ok(b"<p>p *tag*</p><details>\n\ndetails *tag*\n\n</details>\n\ntext");
        assert_eq!(
            text,
            b"<p>p *tag*</p><details>\ndetails tag\n</details>\ntext"
        );
        assert_eq!(
            events,
            vec![
                (23, Format::Break),
                (32, Format::Emphasis { strength: 1 }),
                (35, Format::Emphasis { strength: 1 }),
                (35, Format::Break),
                (46, Format::Break),
            ]
        );
    }

    #[test]
    fn front_matter() {
        for fence in [&b"---"[..], b"---------", b"+++", b"+++++++++"] {
            let input = [fence, b"\nmeta\n", fence].concat();
            let expected = vec![(
                0,
                Format::Metadata {
                    content: b"meta".to_vec(),
                },
            )];
            assert_eq!(lex_ok(&input), (vec![], expected.clone()));

            let input = [fence, b"\nmeta\n", fence, b"\ntext"].concat();
            assert_eq!(lex_ok(&input), (b"text".to_vec(), expected));
        }
    }

    #[test]
    fn front_matter_false_terminator() {
        assert!(matches!(
            lex(b"+++\nmeta\n+++false"),
            Err(PipelineError::MalformedFence { .. })
        ));

        let (text, events) = lex_ok(b"+++\nmeta\n+++false\n+++\ntext");
        assert_eq!(text, b"text");
        assert_eq!(
            events,
            vec![(
                0,
                Format::Metadata {
                    content: b"meta\n+++false".to_vec(),
                },
            )]
        );
    }

    #[test]
    fn front_matter_mismatching_terminator() {
        for input in [
            &b"+++\nmeta\n---"[..],
            b"---\nmeta\n+++",
            b"+++++\nmeta\n+++",
            b"---\nmeta\n-----",
        ] {
            assert!(matches!(
                lex(input),
                Err(PipelineError::MalformedFence { .. })
            ));
        }
    }

    #[test]
    fn separator() {
        for &c in b"*=_-" {
            for length in [1, 3, 10] {
                let line: Vec<u8> = vec![c; length];
                let expected = vec![(6, Format::Separator { style: c })];

                let input = [&b"start\n"[..], &line].concat();
                assert_eq!(lex_ok(&input), (b"start\n".to_vec(), expected.clone()));

                let input = [&b"start\n"[..], &line, b"\ntext"].concat();
                assert_eq!(lex_ok(&input), (b"start\n\ntext".to_vec(), expected));
            }
        }
    }

    #[test]
    fn item_markers() {
        for marker in [&b"*"[..], b"-", b"0.", b"1."] {
            let ordered = marker[0].is_ascii_digit();
            let input = [marker, b" text"].concat();
            assert_eq!(
                lex_ok(&input),
                (
                    b"text".to_vec(),
                    vec![(0, Format::Item { ordered }), (4, Format::Item { ordered })],
                )
            );
        }
    }

    #[test]
    fn item_runs() {
        let (text, events) = lex_ok(b"* star\n0. zero\n- dash\n1. one");
        assert_eq!(text, b"star\nzero\ndash\none");
        assert_eq!(
            events,
            vec![
                (0, Format::Item { ordered: false }),
                (4, Format::Item { ordered: false }),
                (5, Format::Item { ordered: true }),
                (9, Format::Item { ordered: true }),
                (10, Format::Item { ordered: false }),
                (14, Format::Item { ordered: false }),
                (15, Format::Item { ordered: true }),
                (18, Format::Item { ordered: true }),
            ]
        );
    }

    #[test]
    fn emphasis_strengths() {
        let (text, events) = lex_ok(b"*1* **2** ***3***");
        assert_eq!(text, b"1 2 3");
        assert_eq!(
            events,
            vec![
                (0, Format::Emphasis { strength: 1 }),
                (1, Format::Emphasis { strength: 1 }),
                (2, Format::Emphasis { strength: 2 }),
                (3, Format::Emphasis { strength: 2 }),
                (4, Format::Emphasis { strength: 3 }),
                (5, Format::Emphasis { strength: 3 }),
            ]
        );
    }

    #[test]
    fn references() {
        let reference = |bang: bool, uri: &[u8], alt: &[u8]| Format::Reference {
            bang,
            uri: uri.to_vec(),
            alt: alt.to_vec(),
            id: Vec::new(),
        };
        let (text, events) = lex_ok(b"[t](1) ![e](2) [x](3 \"a\") ![t](4 \"b\")");
        assert_eq!(text, b"t e x t");
        assert_eq!(
            events,
            vec![
                (0, reference(false, b"1", b"")),
                (1, reference(false, b"1", b"")),
                (2, reference(true, b"2", b"")),
                (3, reference(true, b"2", b"")),
                (4, reference(false, b"3", b"\"a\"")),
                (5, reference(false, b"3", b"\"a\"")),
                (6, reference(true, b"4", b"\"b\"")),
                (7, reference(true, b"4", b"\"b\"")),
            ]
        );
    }

    #[test]
    fn reference_without_target() {
        let (text, events) = lex_ok(b"[^note]");
        assert_eq!(text, b"^note");
        assert_eq!(
            events,
            vec![
                (
                    0,
                    Format::Reference {
                        bang: false,
                        uri: vec![],
                        alt: vec![],
                        id: vec![],
                    }
                ),
                (
                    5,
                    Format::Reference {
                        bang: false,
                        uri: vec![],
                        alt: vec![],
                        id: vec![],
                    }
                ),
            ]
        );
    }

    #[test]
    fn unclosed_reference_is_fatal() {
        assert!(matches!(
            lex(b"[never closed\n"),
            Err(PipelineError::MalformedFence { .. })
        ));
    }

    #[test]
    fn headings() {
        for level in 1..=6u8 {
            let input = [&vec![b'#'; level as usize][..], b" heading\ntext"].concat();
            assert_eq!(
                lex_ok(&input),
                (
                    b"heading\ntext".to_vec(),
                    vec![(0, Format::Heading { level }), (7, Format::Heading { level })],
                )
            );
        }
    }

    #[test]
    fn heading_level_is_capped() {
        let (text, events) = lex_ok(b"####### deep");
        assert_eq!(text, b"deep");
        assert_eq!(
            events,
            vec![(0, Format::Heading { level: 6 }), (4, Format::Heading { level: 6 })]
        );
    }

    #[test]
    fn fences() {
        let (text, events) = lex_ok(b"```lang\npre```\ntext");
        assert_eq!(text, b"\ntext");
        assert_eq!(
            events,
            vec![(
                0,
                Format::Fence {
                    content: b"pre".to_vec(),
                    lang: b"lang".to_vec(),
                },
            )]
        );

        // A shorter backtick run inside the content must not close the fence.
        let (text, events) = lex_ok(b"```````lang spaces\npre\n```\nfalse```````");
        assert_eq!(text, b"");
        assert_eq!(
            events,
            vec![(
                0,
                Format::Fence {
                    content: b"pre\n```\nfalse".to_vec(),
                    lang: b"lang spaces".to_vec(),
                },
            )]
        );
    }

    #[test]
    fn unterminated_fence_is_fatal() {
        assert!(matches!(
            lex(b"```rust\nfn main() {}\n"),
            Err(PipelineError::MalformedFence { .. })
        ));
    }

    #[test]
    fn inline_code() {
        let (text, events) = lex_ok(b"`co\\de`");
        assert_eq!(text, b"");
        assert_eq!(
            events,
            vec![(
                0,
                Format::Code {
                    content: b"co\\de".to_vec(),
                },
            )]
        );
    }

    #[test]
    fn quote() {
        let (text, events) = lex_ok(b"> quote");
        assert_eq!(text, b"quote");
        assert_eq!(events, vec![(0, Format::Quote), (5, Format::Quote)]);
    }

    #[test]
    fn row() {
        let (text, events) = lex_ok(b"|1|2|3|");
        assert_eq!(text, b"");
        assert_eq!(
            events,
            vec![(
                0,
                Format::Row {
                    content: b"|1|2|3|".to_vec(),
                },
            )]
        );
    }

    #[test]
    fn paragraph_breaks_collapse() {
        assert_eq!(lex_ok(b"\n\n"), (b"\n".to_vec(), vec![(0, Format::Break)]));
        assert_eq!(
            lex_ok(b"a\n\n\n\nb"),
            (b"a\nb".to_vec(), vec![(1, Format::Break)])
        );
    }

    #[test]
    fn events_are_non_decreasing_by_offset() {
        let (_, events) = lex_ok(
            b"---\ntitle = \"t\"\n---\n# head\n\nsome *emphasis* and [a link](/x)\n\n* one\n* two\n",
        );
        for pair in events.windows(2) {
            assert!(pair[0].0 <= pair[1].0, "events out of order: {pair:?}");
        }
    }

    #[test]
    fn group_kind_strings() {
        // Group events never come out of the lexer, but the vocabulary is
        // shared; keep the names locked down where the lexer tests live.
        assert_eq!(GroupKind::OrderedList.as_str(), "ordered-list");
        assert_eq!(GroupKind::UnorderedList.as_str(), "unordered-list");
        assert_eq!(GroupKind::Table.as_str(), "table");
    }
}

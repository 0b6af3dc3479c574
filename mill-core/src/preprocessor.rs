//! Format-stream preprocessor: rewrites the lexer's event list into one the
//! generator can render directly.
//!
//! The stripped text is never modified here. The pass walks the events once
//! and, per kind: demotes unpaired emphasis to raw asterisks, rewrites
//! footnote references, wraps item and row runs in synthetic [`Format::Group`]
//! events, promotes separators under a text line to setext headings, and runs
//! injection fences through the [`InjectionRegistry`].

use std::collections::{HashMap, HashSet};

use crate::error::PipelineError;
use crate::format::{Event, Format, GroupKind};

/// An injection extension: takes the fence body and produces output lines,
/// later joined with newlines and spliced into the document verbatim.
pub type InjectionFn = Box<dyn Fn(&[u8]) -> Result<Vec<Vec<u8>>, PipelineError> + Send + Sync>;

/// Registry of injection extensions, keyed by the name given in the fence
/// language tag as `inject=NAME`.
///
/// The set of extensions is closed at construction time; documents can only
/// call what the embedding application registered.
#[derive(Default)]
pub struct InjectionRegistry {
    extensions: HashMap<String, InjectionFn>,
}

impl InjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, f: InjectionFn) {
        self.extensions.insert(name.into(), f);
    }

    fn run(&self, name: &str, body: &[u8]) -> Result<Vec<Vec<u8>>, PipelineError> {
        let f = self
            .extensions
            .get(name)
            .ok_or_else(|| PipelineError::UnknownInjectionParameter(name.to_string()))?;
        f(body)
    }
}

/// Returns the injection name when the fence language tag carries an
/// `inject=NAME` segment, e.g. `python,inject=entry-list`. A bare `inject`
/// segment yields an empty name, which no registry accepts.
fn injection_name(lang: &[u8]) -> Option<&[u8]> {
    lang.split(|b| *b == b',').find_map(|segment| {
        if segment == b"inject" {
            Some(&b""[..])
        } else {
            segment.strip_prefix(b"inject=")
        }
    })
}

/// Rewrites the event stream. The stripped text is only read, never changed.
pub fn preprocess(
    text: &[u8],
    formats: Vec<Event>,
    registry: &InjectionRegistry,
) -> Result<Vec<Event>, PipelineError> {
    let mut out: Vec<Event> = Vec::with_capacity(formats.len());

    let mut list_item_open = false;
    let mut list_group = false;
    let mut table_group = false;
    let mut reference_open = false;
    let mut footnotes: HashSet<Vec<u8>> = HashSet::new();
    let mut skip_n = 0usize;

    for (i, (p, f)) in formats.iter().enumerate() {
        if skip_n > 0 {
            skip_n -= 1;
            continue;
        }
        let p = *p;

        match f {
            Format::Emphasis { strength } => {
                // Emphasis must come in adjacent pairs; a lone run is plain
                // asterisks, not an open span bleeding to the end.
                match formats.get(i + 1) {
                    Some((np, nf @ Format::Emphasis { .. })) => {
                        out.push((p, f.clone()));
                        out.push((*np, nf.clone()));
                        skip_n = 1;
                    }
                    _ => out.push((
                        p,
                        Format::Raw {
                            content: vec![b'*'; *strength as usize],
                        },
                    )),
                }
            }

            Format::Reference { uri, .. } => {
                reference_open = !reference_open;
                if !reference_open {
                    // The close was already pushed while handling the open.
                    continue;
                }
                let (np, nf) = formats[i + 1..]
                    .iter()
                    .find(|(_, f)| matches!(f, Format::Reference { .. }))
                    .ok_or(PipelineError::UnpairedReference)?;

                if uri.is_empty() && text.get(p) == Some(&b'^') {
                    // Footnote. First sighting of a label links forward to
                    // the note, second links back to the first sighting.
                    // TODO the label text stays in the document body; strip
                    // it once the stream can express text deletions.
                    // An empty pair right before a `^` gives np == p.
                    let label = text.get(p + 1..*np).unwrap_or(&[]);
                    let first = footnotes.insert(label.to_vec());
                    if !first {
                        footnotes.remove(label);
                    }
                    let anchor = Format::Reference {
                        bang: false,
                        uri: if first {
                            [b"#fnref:", label].concat()
                        } else {
                            [b"#fn:", label].concat()
                        },
                        alt: Vec::new(),
                        id: if first {
                            [b"fn:", label].concat()
                        } else {
                            [b"fnref:", label].concat()
                        },
                    };
                    out.push((p, anchor.clone()));
                    out.push((
                        p,
                        Format::Raw {
                            content: [b"<sup>", label, b"</sup>"].concat(),
                        },
                    ));
                    out.push((p, anchor));
                } else {
                    out.push((p, f.clone()));
                    out.push((*np, nf.clone()));
                }
            }

            Format::Item { ordered } => {
                let next_item = formats[i + 1..]
                    .iter()
                    .find(|(_, f)| matches!(f, Format::Item { .. }))
                    .map(|(np, _)| *np);
                list_item_open = !list_item_open;
                if list_group {
                    out.push((p, f.clone()));
                    // The group stays open while an item is open or the next
                    // item starts on the very next line.
                    if !list_item_open && next_item != Some(p + 1) {
                        out.push((
                            p,
                            Format::Group {
                                kind: if *ordered {
                                    GroupKind::OrderedList
                                } else {
                                    GroupKind::UnorderedList
                                },
                            },
                        ));
                        list_group = false;
                    }
                } else {
                    list_group = true;
                    out.push((
                        p,
                        Format::Group {
                            kind: if *ordered {
                                GroupKind::OrderedList
                            } else {
                                GroupKind::UnorderedList
                            },
                        },
                    ));
                    out.push((p, f.clone()));
                }
            }

            Format::Row { .. } => {
                if !table_group {
                    table_group = true;
                    out.push((
                        p,
                        Format::Group {
                            kind: GroupKind::Table,
                        },
                    ));
                }
                out.push((p, f.clone()));
                // The group runs while the next row is exactly one newline
                // away; anything else ends the table.
                let adjacent = matches!(
                    formats.get(i + 1),
                    Some((np, Format::Row { .. })) if &text[p..*np] == b"\n"
                );
                if !adjacent {
                    out.push((
                        p,
                        Format::Group {
                            kind: GroupKind::Table,
                        },
                    ));
                    table_group = false;
                }
            }

            Format::Separator { style } => match preceding_line(text, p) {
                Some(start) => {
                    let heading = Format::Heading {
                        level: if *style == b'=' { 1 } else { 2 },
                    };
                    out.push((start, heading.clone()));
                    out.push((p - 1, heading));
                }
                None => out.push((p, f.clone())),
            },

            Format::Fence { content, lang } => match injection_name(lang) {
                Some(name) => {
                    let name = String::from_utf8_lossy(name);
                    let lines = registry.run(&name, content)?;
                    out.push((
                        p,
                        Format::Raw {
                            content: lines.join(&b"\n"[..]),
                        },
                    ));
                }
                None => out.push((p, f.clone())),
            },

            _ => out.push((p, f.clone())),
        }
    }

    Ok(out)
}

/// When `text[..p]` ends with a non-empty line and its newline, returns the
/// offset where a setext heading over that line should open: the newline
/// before the line, or 0 when the line starts the text.
fn preceding_line(text: &[u8], p: usize) -> Option<usize> {
    if p < 2 || text.get(p - 1) != Some(&b'\n') || text[p - 2] == b'\n' {
        return None;
    }
    Some(
        text[..p - 1]
            .iter()
            .rposition(|b| *b == b'\n')
            .unwrap_or(0),
    )
}

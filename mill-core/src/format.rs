//! Format events: the vocabulary shared by all three pipeline stages.
//!
//! The lexer produces a list of `(offset, Format)` pairs where the offset
//! indexes the *stripped* text buffer, never the raw input. The preprocessor
//! rewrites that list, and the generator turns it into markup.
//!
//! Pairable variants follow a toggle protocol: the first occurrence of a
//! given value opens a span, and a later occurrence that compares equal to it
//! closes the span. Pairing is by full structural equality, so two unrelated
//! spans with identical attributes will pair with each other. That is a known
//! limitation of the dialect and deliberately left as-is; see DESIGN.md.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// An event anchored at a byte offset into the stripped text.
pub type Event = (usize, Format);

/// The kind of synthetic wrapper introduced by the preprocessor around a
/// contiguous run of items or rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    OrderedList,
    UnorderedList,
    Table,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::OrderedList => "ordered-list",
            GroupKind::UnorderedList => "unordered-list",
            GroupKind::Table => "table",
        }
    }
}

/// A markup construct discovered at some position of the stripped text.
///
/// Payloads are byte vectors because documents are processed as bytes end to
/// end; nothing in the pipeline requires the content to be valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// Front matter block content (fences excluded).
    Metadata { content: Vec<u8> },
    /// A run of 1-3 `*`. Pairable.
    Emphasis { strength: u8 },
    /// A link or image reference. Pairable. `id` is only set by the
    /// preprocessor when rewriting footnotes.
    Reference {
        bang: bool,
        uri: Vec<u8>,
        alt: Vec<u8>,
        id: Vec<u8>,
    },
    /// An ATX (`#`) or setext heading, level 1-6. Pairable.
    Heading { level: u8 },
    /// A list item marker. Pairable.
    Item { ordered: bool },
    /// A blockquote line marker. Pairable.
    Quote,
    /// A table row kept raw, pipes included, for later structural parsing.
    Row { content: Vec<u8> },
    /// Inline code content.
    Code { content: Vec<u8> },
    /// Fenced code block content with its language tag.
    Fence { content: Vec<u8>, lang: Vec<u8> },
    /// A thematic break; `style` is the byte the line was drawn with.
    Separator { style: u8 },
    /// A paragraph break. The stripped text keeps one literal newline so
    /// later stages can detect block adjacency.
    Break,
    /// Synthetic list/table wrapper introduced by the preprocessor. Pairable.
    Group { kind: GroupKind },
    /// Content spliced verbatim into the output.
    Raw { content: Vec<u8> },
}

impl Format {
    /// Whether this variant participates in toggle pairing.
    pub fn is_pairable(&self) -> bool {
        matches!(
            self,
            Format::Emphasis { .. }
                | Format::Reference { .. }
                | Format::Heading { .. }
                | Format::Item { .. }
                | Format::Quote
                | Format::Group { .. }
        )
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// Byte payloads are rendered lossily as strings so that `inspect` dumps stay
// readable; this serialization is diagnostic output, not a wire format.
impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Format::Metadata { content } => {
                let mut s = serializer.serialize_struct("Metadata", 2)?;
                s.serialize_field("kind", "metadata")?;
                s.serialize_field("content", &lossy(content))?;
                s.end()
            }
            Format::Emphasis { strength } => {
                let mut s = serializer.serialize_struct("Emphasis", 2)?;
                s.serialize_field("kind", "emphasis")?;
                s.serialize_field("strength", strength)?;
                s.end()
            }
            Format::Reference { bang, uri, alt, id } => {
                let mut s = serializer.serialize_struct("Reference", 5)?;
                s.serialize_field("kind", "reference")?;
                s.serialize_field("bang", bang)?;
                s.serialize_field("uri", &lossy(uri))?;
                s.serialize_field("alt", &lossy(alt))?;
                s.serialize_field("id", &lossy(id))?;
                s.end()
            }
            Format::Heading { level } => {
                let mut s = serializer.serialize_struct("Heading", 2)?;
                s.serialize_field("kind", "heading")?;
                s.serialize_field("level", level)?;
                s.end()
            }
            Format::Item { ordered } => {
                let mut s = serializer.serialize_struct("Item", 2)?;
                s.serialize_field("kind", "item")?;
                s.serialize_field("ordered", ordered)?;
                s.end()
            }
            Format::Quote => {
                let mut s = serializer.serialize_struct("Quote", 1)?;
                s.serialize_field("kind", "quote")?;
                s.end()
            }
            Format::Row { content } => {
                let mut s = serializer.serialize_struct("Row", 2)?;
                s.serialize_field("kind", "row")?;
                s.serialize_field("content", &lossy(content))?;
                s.end()
            }
            Format::Code { content } => {
                let mut s = serializer.serialize_struct("Code", 2)?;
                s.serialize_field("kind", "code")?;
                s.serialize_field("content", &lossy(content))?;
                s.end()
            }
            Format::Fence { content, lang } => {
                let mut s = serializer.serialize_struct("Fence", 3)?;
                s.serialize_field("kind", "fence")?;
                s.serialize_field("lang", &lossy(lang))?;
                s.serialize_field("content", &lossy(content))?;
                s.end()
            }
            Format::Separator { style } => {
                let mut s = serializer.serialize_struct("Separator", 2)?;
                s.serialize_field("kind", "separator")?;
                s.serialize_field("style", &(*style as char).to_string())?;
                s.end()
            }
            Format::Break => {
                let mut s = serializer.serialize_struct("Break", 1)?;
                s.serialize_field("kind", "break")?;
                s.end()
            }
            Format::Group { kind } => {
                let mut s = serializer.serialize_struct("Group", 2)?;
                s.serialize_field("kind", "group")?;
                s.serialize_field("group", kind.as_str())?;
                s.end()
            }
            Format::Raw { content } => {
                let mut s = serializer.serialize_struct("Raw", 2)?;
                s.serialize_field("kind", "raw")?;
                s.serialize_field("content", &lossy(content))?;
                s.end()
            }
        }
    }
}

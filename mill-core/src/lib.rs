//! Markup to HTML conversion pipeline
//!
//!     This crate converts documents written in a small, bespoke markup dialect into HTML. It is
//!     the core of the mill site generator, but knows nothing about files, sites or templates:
//!     input is bytes, output is bytes, and everything in between is data.
//!
//!     TLDR: for pipeline authors:
//!         - Everything is bytes end to end; nothing requires the input to be valid UTF-8.
//!         - The lexer never rewrites text in place, it strips syntax and records events.
//!         - Offsets always index the stripped text, never the raw input.
//!         - Pairable events follow the toggle protocol, see format.rs.
//!         - Each stage has its own unit tests next to the code; the whole pipeline has
//!           integration tests under tests/.
//!
//! Architecture
//!
//!     The conversion runs in three stages, each a pure function over the previous stage's
//!     output:
//!
//!     1. lex (lexer.rs): raw bytes -> (stripped text, format events). A single forward scan
//!        matches fourteen rules in priority order; syntax is accounted for through skip ranges
//!        rather than buffer splicing, and close events of line-scoped constructs are deferred
//!        through empty skip ranges discovered by lookahead.
//!     2. preprocess (preprocessor.rs): rewrites the event list. Groups items and rows, pairs
//!        footnotes, promotes setext headings, demotes orphan emphasis and runs injection
//!        fences through a closed extension registry. The text itself is never touched.
//!     3. generate (generator.rs): renders events into HTML fragments and splices them into the
//!        text in one reverse pass. Total: every event variant has generator code.
//!
//!     This is a pure lib, that is, it powers mill-cli but is shell agnostic, no code here
//!     should suppose a shell environment, be it to std print, env vars etc.
//!
//!     The file structure:
//!     .
//!     ├── error.rs                # PipelineError
//!     ├── format.rs               # Format event vocabulary shared by all stages
//!     ├── frontmatter.rs          # Restricted front matter parser
//!     ├── lexer.rs                # Stage 1
//!     ├── preprocessor.rs         # Stage 2, including the InjectionRegistry
//!     ├── generator.rs            # Stage 3
//!     └── lib.rs
//!
//! Dialect
//!
//!     The dialect is close to Markdown but deliberately not Markdown: emphasis, headings,
//!     lists, quotes, fences, inline code, references and tables look familiar, while front
//!     matter fences may mix `+` and `-`, separators under a text line become setext headings,
//!     raw HTML passes through untouched, and code fences can invoke registered injection
//!     extensions through their language tag (`inject=NAME`). See the rule list in lexer.rs
//!     for the authoritative syntax.

pub mod error;
pub mod format;
pub mod frontmatter;
pub mod generator;
pub mod lexer;
pub mod preprocessor;

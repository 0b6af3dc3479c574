//! Site assembly on top of the mill-core pipeline
//!
//!     Where mill-core turns one document into HTML, this crate turns a content tree into a
//!     website: it walks the input directory, renders markup documents through the page
//!     template, minifies styles and markup, copies everything else, and knows how to watch
//!     the tree for changes and rebuild incrementally.
//!
//!     This is a pure lib, that is, it powers mill-cli but is shell agnostic, no code here
//!     should suppose a shell environment, be it to std print, env vars etc. Progress and
//!     failure reporting is data (see builder::BuildReport), printing it is the binary's job.
//!
//!     The file structure:
//!     .
//!     ├── error.rs                # SiteError
//!     ├── entry.rs                # Entry metadata and the shared EntryCache
//!     ├── template.rs             # $VARIABLE template expansion + cached template
//!     ├── minify.rs               # CSS and HTML minifiers
//!     ├── inject.rs               # The standard injection set (entry-list)
//!     ├── builder.rs              # SiteBuilder: walk, process, write
//!     ├── watch.rs                # Polling file watcher
//!     └── lib.rs
//!
//!     Everything is addressed by paths relative to the content root; only the outermost
//!     layers (builder reads/writes, watcher polling) touch the filesystem.

pub mod builder;
pub mod entry;
pub mod error;
pub mod inject;
pub mod minify;
pub mod template;
pub mod watch;

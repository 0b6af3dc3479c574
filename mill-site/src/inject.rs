//! The standard injection set.
//!
//! Injection extensions are named functions a document can call from a code
//! fence tagged `inject=NAME`; the fence body is the extension's input. The
//! set is closed here rather than defined by documents, so content can never
//! run arbitrary code.

use std::path::Path;
use std::sync::Arc;

use mill_core::error::PipelineError;
use mill_core::preprocessor::InjectionRegistry;

use crate::entry::EntryCache;

fn trim(body: &[u8]) -> &[u8] {
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &body[start..end]
}

/// Builds the registry every document is preprocessed with.
///
/// - `entry-list`: the body names a directory under the content root; emits
///   a `<ul>` of links to the entries directly inside it, newest first,
///   with category and tags in a dimmed suffix when present.
pub fn standard_registry(cache: Arc<EntryCache>) -> InjectionRegistry {
    let mut registry = InjectionRegistry::new();
    registry.register(
        "entry-list",
        Box::new(move |body: &[u8]| {
            let dir = String::from_utf8_lossy(trim(body)).into_owned();
            let mut entries = cache
                .entries_in(Path::new(&dir))
                .map_err(|e| PipelineError::Injection(e.to_string()))?;
            entries.sort_by(|a, b| b.date().cmp(&a.date()));

            let mut lines = vec![b"<ul>".to_vec()];
            for entry in entries {
                let mut line = Vec::new();
                line.extend_from_slice(b"<li><a href=\"");
                line.extend_from_slice(entry.permalink().as_bytes());
                line.extend_from_slice(b"\">");
                line.extend_from_slice(entry.title().as_bytes());
                line.extend_from_slice(b"</a>");
                if let Some(category) = entry.category() {
                    line.extend_from_slice(b"<span class=\"dim\"> [mod ");
                    line.extend_from_slice(category.as_bytes());
                    line.extend_from_slice(b"; ");
                    line.extend_from_slice(
                        entry
                            .tags()
                            .into_iter()
                            .map(|tag| format!("'{tag}"))
                            .collect::<Vec<_>>()
                            .join(", ")
                            .as_bytes(),
                    );
                    line.extend_from_slice(b"]</span>");
                }
                line.extend_from_slice(b"</li>");
                lines.push(line);
            }
            lines.push(b"</ul>".to_vec());
            Ok(lines)
        }),
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn entry_list_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(
            dir.path().join("blog/old.md"),
            b"+++\ntitle = \"Old\"\ndate = 2020-01-01\n+++\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("blog/new.md"),
            b"+++\ntitle = \"New\"\ndate = 2024-01-01\ncategory = \"code\"\ntags = [\"x\", \"y\"]\n+++\n",
        )
        .unwrap();

        let registry = standard_registry(Arc::new(EntryCache::new(dir.path())));
        let (text, formats) = mill_core::lexer::lex(b"```inject=entry-list\nblog```").unwrap();
        let events = mill_core::preprocessor::preprocess(&text, formats, &registry).unwrap();
        let html = String::from_utf8(mill_core::generator::generate(&text, &events)).unwrap();

        assert_eq!(
            html,
            "<ul>\n\
             <li><a href=\"/blog/new\">New</a><span class=\"dim\"> [mod code; 'x, 'y]</span></li>\n\
             <li><a href=\"/blog/old\">Old</a></li>\n\
             </ul>"
        );
    }

    #[test]
    fn entry_list_missing_directory_fails_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let registry = standard_registry(Arc::new(EntryCache::new(dir.path())));
        let (text, formats) = mill_core::lexer::lex(b"```inject=entry-list\nnope```").unwrap();
        assert!(matches!(
            mill_core::preprocessor::preprocess(&text, formats, &registry),
            Err(PipelineError::Injection(_))
        ));
    }
}

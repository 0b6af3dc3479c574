//! Page template expansion.
//!
//! A template is plain HTML with `$NAME` slots, where `NAME` is a run of
//! ASCII uppercase letters. The variable set is closed: `TITLE`, `CONTENT`,
//! `ROOT` and `BLOG`. A `$` not followed by an uppercase letter is literal,
//! and anything else is [`SiteError::UnknownTemplateVariable`]. Expanded
//! content is spliced in as-is and never rescanned for slots.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::entry::Entry;
use crate::error::SiteError;
use crate::minify::minify_html;

/// The template file, read and minified at most once per process.
pub struct TemplateCache {
    path: PathBuf,
    cell: OnceCell<Vec<u8>>,
}

impl TemplateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<&[u8], SiteError> {
        self.cell
            .get_or_try_init(|| {
                fs::read(&self.path)
                    .map(|content| minify_html(&content))
                    .map_err(|e| SiteError::io(&self.path, e))
            })
            .map(|content| content.as_slice())
    }
}

fn first_component(path: &Path) -> String {
    path.components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Expands every slot of `template` for one rendered document.
pub fn expand(
    template: &[u8],
    entry: &Entry,
    site_title: &str,
    content: &[u8],
) -> Result<Vec<u8>, SiteError> {
    let first = first_component(entry.path());
    let mut out = Vec::with_capacity(template.len() + content.len());

    let mut i = 0;
    while i < template.len() {
        if template[i] != b'$' {
            out.push(template[i]);
            i += 1;
            continue;
        }
        let len = template[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_uppercase())
            .count();
        if len == 0 {
            out.push(b'$');
            i += 1;
            continue;
        }
        match &template[i + 1..i + 1 + len] {
            b"TITLE" => {
                if first == "index.md" {
                    out.extend_from_slice(site_title.as_bytes());
                } else {
                    out.extend_from_slice(entry.title().as_bytes());
                    out.extend_from_slice(b" | ");
                    out.extend_from_slice(site_title.as_bytes());
                }
            }
            b"CONTENT" => out.extend_from_slice(content),
            b"ROOT" => {
                if first == "index.md" {
                    out.extend_from_slice(b"class=selected");
                }
            }
            b"BLOG" => {
                if first == "blog.md" || first == "blog" {
                    out.extend_from_slice(b"class=selected");
                }
            }
            other => {
                return Err(SiteError::UnknownTemplateVariable(
                    String::from_utf8_lossy(other).into_owned(),
                ))
            }
        }
        i += 1 + len;
    }

    Ok(out)
}

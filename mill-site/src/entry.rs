//! Entry metadata: cheap access to a document's front matter and first title.
//!
//! Loading an entry lexes the document but never renders it; only the first
//! `Metadata` event and the first heading pair are consulted. Entries are
//! shared through an [`EntryCache`] keyed by path relative to the content
//! root, so that injection extensions listing dozens of documents do not
//! re-read them on every page.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mill_core::format::Format;
use mill_core::frontmatter::{self, Meta};
use mill_core::lexer::lex;

use crate::error::SiteError;

/// One document's metadata, addressed relative to the content root.
#[derive(Debug, Clone)]
pub struct Entry {
    rel: PathBuf,
    meta: Meta,
    first_title: Option<Vec<u8>>,
}

impl Entry {
    /// Reads and lexes `root/rel`, keeping its front matter and the text of
    /// its first heading.
    pub fn load(root: &Path, rel: impl Into<PathBuf>) -> Result<Self, SiteError> {
        let rel = rel.into();
        let full = root.join(&rel);
        let content = fs::read(&full).map_err(|e| SiteError::io(&full, e))?;
        let (text, formats) = lex(&content).map_err(|source| SiteError::Pipeline {
            path: full.clone(),
            source,
        })?;

        let meta = formats
            .iter()
            .find_map(|(_, f)| match f {
                Format::Metadata { content } => Some(frontmatter::parse(content)),
                _ => None,
            })
            .unwrap_or_default();

        let mut first_title = None;
        let mut heading_start = None;
        for (i, f) in &formats {
            if matches!(f, Format::Heading { .. }) {
                match heading_start {
                    None => heading_start = Some(*i),
                    Some(start) => {
                        first_title = Some(text[start..*i].to_vec());
                        break;
                    }
                }
            }
        }

        Ok(Self {
            rel,
            meta,
            first_title,
        })
    }

    /// Path relative to the content root.
    pub fn path(&self) -> &Path {
        &self.rel
    }

    fn meta_first(&self, key: &[u8]) -> Option<String> {
        self.meta
            .get(key)
            .and_then(|values| values.first())
            .filter(|value| !value.is_empty())
            .map(|value| String::from_utf8_lossy(value).into_owned())
    }

    /// Front matter title, else the first heading, else the file name.
    pub fn title(&self) -> String {
        self.meta_first(b"title")
            .or_else(|| {
                self.first_title
                    .as_ref()
                    .map(|t| String::from_utf8_lossy(t).into_owned())
            })
            .unwrap_or_else(|| {
                self.rel
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
    }

    pub fn date(&self) -> String {
        self.meta_first(b"date").unwrap_or_default()
    }

    pub fn category(&self) -> Option<String> {
        self.meta_first(b"category")
    }

    pub fn tags(&self) -> Vec<String> {
        self.meta
            .get(&b"tags"[..])
            .map(|values| {
                values
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(|v| String::from_utf8_lossy(v).into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Site-absolute link: extension stripped, `index.md` collapsed into its
    /// directory, forward slashes throughout.
    pub fn permalink(&self) -> String {
        let trimmed = if self.rel.file_name() == Some(OsStr::new("index.md")) {
            self.rel.parent().unwrap_or(Path::new("")).to_path_buf()
        } else {
            self.rel.with_extension("")
        };
        let mut link = String::from("/");
        let mut first = true;
        for component in trimmed.components() {
            if !first {
                link.push('/');
            }
            first = false;
            link.push_str(&component.as_os_str().to_string_lossy());
        }
        link
    }
}

/// Shared, lazily-filled entry cache over one content root.
pub struct EntryCache {
    root: PathBuf,
    entries: Mutex<HashMap<PathBuf, Arc<Entry>>>,
}

impl EntryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the entry at `rel`, reusing a previous load when present.
    pub fn get(&self, rel: &Path) -> Result<Arc<Entry>, SiteError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(rel) {
            return Ok(entry.clone());
        }
        let entry = Arc::new(Entry::load(&self.root, rel)?);
        entries.insert(rel.to_path_buf(), entry.clone());
        Ok(entry)
    }

    /// Drops the cached entry for `rel`; the next `get` re-reads the file.
    pub fn invalidate(&self, rel: &Path) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(rel);
    }

    /// Entries one level under `dir`: every `*.md` file plus every
    /// `*/index.md`, sorted by path.
    pub fn entries_in(&self, dir: &Path) -> Result<Vec<Arc<Entry>>, SiteError> {
        let full = self.root.join(dir);
        let mut rels = Vec::new();
        for item in fs::read_dir(&full).map_err(|e| SiteError::io(&full, e))? {
            let item = item.map_err(|e| SiteError::io(&full, e))?;
            let name = PathBuf::from(item.file_name());
            let path = item.path();
            if path.is_dir() {
                if path.join("index.md").is_file() {
                    rels.push(dir.join(&name).join("index.md"));
                }
            } else if path.extension() == Some(OsStr::new("md")) {
                rels.push(dir.join(&name));
            }
        }
        rels.sort();
        rels.iter().map(|rel| self.get(rel)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(path).unwrap();
        file.write_all(content).unwrap();
    }

    #[test]
    fn title_prefers_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "post.md",
            b"+++\ntitle = \"From meta\"\n+++\n# From heading\ntext",
        );
        let entry = Entry::load(dir.path(), "post.md").unwrap();
        assert_eq!(entry.title(), "From meta");
    }

    #[test]
    fn title_falls_back_to_heading_then_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "heading.md", b"# First heading\ntext");
        write(dir.path(), "bare.md", b"no headings here");

        let entry = Entry::load(dir.path(), "heading.md").unwrap();
        assert_eq!(entry.title(), "First heading");

        let entry = Entry::load(dir.path(), "bare.md").unwrap();
        assert_eq!(entry.title(), "bare.md");
    }

    #[test]
    fn metadata_accessors() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "post.md",
            b"+++\ndate = 2024-05-01\ncategory = \"code\"\ntags = [\"a\", \"b\"]\n+++\n",
        );
        let entry = Entry::load(dir.path(), "post.md").unwrap();
        assert_eq!(entry.date(), "2024-05-01");
        assert_eq!(entry.category(), Some("code".to_string()));
        assert_eq!(entry.tags(), ["a", "b"]);
    }

    #[test]
    fn permalinks() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/post.md", b"x");
        write(dir.path(), "blog/nested/index.md", b"x");

        let entry = Entry::load(dir.path(), "blog/post.md").unwrap();
        assert_eq!(entry.permalink(), "/blog/post");

        let entry = Entry::load(dir.path(), "blog/nested/index.md").unwrap();
        assert_eq!(entry.permalink(), "/blog/nested");
    }

    #[test]
    fn cache_reuses_loads_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "post.md", b"+++\ntitle = \"One\"\n+++\n");
        let cache = EntryCache::new(dir.path());

        assert_eq!(cache.get(Path::new("post.md")).unwrap().title(), "One");

        write(dir.path(), "post.md", b"+++\ntitle = \"Two\"\n+++\n");
        assert_eq!(cache.get(Path::new("post.md")).unwrap().title(), "One");

        cache.invalidate(Path::new("post.md"));
        assert_eq!(cache.get(Path::new("post.md")).unwrap().title(), "Two");
    }

    #[test]
    fn entries_in_lists_direct_and_nested_index_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/a.md", b"# A\n");
        write(dir.path(), "blog/b.md", b"# B\n");
        write(dir.path(), "blog/c/index.md", b"# C\n");
        write(dir.path(), "blog/c/asset.txt", b"skip");
        write(dir.path(), "blog/d/deep/index.md", b"too deep");

        let cache = EntryCache::new(dir.path());
        let entries = cache.entries_in(Path::new("blog")).unwrap();
        let paths: Vec<_> = entries
            .iter()
            .map(|e| e.path().to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, ["blog/a.md", "blog/b.md", "blog/c/index.md"]);
    }
}

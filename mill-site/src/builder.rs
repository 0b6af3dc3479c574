//! Build orchestration: content tree in, output tree out.
//!
//! The builder walks the content root once, processes each file by
//! extension (`.md` through the pipeline and the template, `.css`/`.html`
//! minified, everything else copied) and collects the results keyed by
//! output path. Writing to disk is a separate, optional step, so dry runs
//! and tests work on the in-memory result.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use mill_core::generator::generate;
use mill_core::lexer::lex;
use mill_core::preprocessor::{preprocess, InjectionRegistry};

use crate::entry::EntryCache;
use crate::error::SiteError;
use crate::inject;
use crate::minify::{minify_css, minify_html};
use crate::template::{self, TemplateCache};

/// How [`SiteBuilder::build`] behaves.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Write the generated tree to the output directory.
    pub write: bool,
    /// Delete the output directory before writing.
    pub force: bool,
    /// Keep going after a document fails, collecting the failure.
    pub ignore_errors: bool,
}

/// Result of one build: generated files plus the documents that failed.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output-relative path → file content.
    pub outputs: BTreeMap<PathBuf, Vec<u8>>,
    pub failures: Vec<(PathBuf, SiteError)>,
}

pub struct SiteBuilder {
    input: PathBuf,
    output: PathBuf,
    template: TemplateCache,
    site_title: String,
    cname: String,
    cache: Arc<EntryCache>,
    registry: InjectionRegistry,
}

impl SiteBuilder {
    /// `template` is relative to `input`, like every content path.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        template: impl AsRef<Path>,
        site_title: impl Into<String>,
        cname: impl Into<String>,
    ) -> Self {
        let input = input.into();
        let cache = Arc::new(EntryCache::new(&input));
        let registry = inject::standard_registry(cache.clone());
        Self {
            template: TemplateCache::new(input.join(template.as_ref())),
            input,
            output: output.into(),
            site_title: site_title.into(),
            cname: cname.into(),
            cache,
            registry,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn cache(&self) -> &Arc<EntryCache> {
        &self.cache
    }

    pub fn template_path(&self) -> &Path {
        self.template.path()
    }

    /// Runs one document through the pipeline and the template. `rel` is
    /// relative to the content root.
    pub fn render_document(&self, rel: &Path) -> Result<Vec<u8>, SiteError> {
        let full = self.input.join(rel);
        let raw = fs::read(&full).map_err(|e| SiteError::io(&full, e))?;
        let pipeline = |source| SiteError::Pipeline {
            path: full.clone(),
            source,
        };

        let (text, formats) = lex(&raw).map_err(pipeline)?;
        let formats = preprocess(&text, formats, &self.registry).map_err(pipeline)?;
        let html = minify_html(&generate(&text, &formats));

        let entry = self.cache.get(rel)?;
        template::expand(self.template.get()?, &entry, &self.site_title, &html)
    }

    /// Processes one content file into its output path and content.
    pub fn process_file(&self, rel: &Path) -> Result<(PathBuf, Vec<u8>), SiteError> {
        let read = || {
            let full = self.input.join(rel);
            fs::read(&full).map_err(|e| SiteError::io(&full, e))
        };
        match rel.extension().and_then(|e| e.to_str()) {
            Some("md") => Ok((rel.with_extension("html"), self.render_document(rel)?)),
            Some("css") => Ok((rel.to_path_buf(), minify_css(&read()?))),
            Some("html") => Ok((rel.to_path_buf(), minify_html(&read()?))),
            _ => Ok((rel.to_path_buf(), read()?)),
        }
    }

    /// Builds the whole tree. Fails fast on the first broken document
    /// unless `ignore_errors` is set, in which case failures are collected
    /// and the rest of the site still builds.
    pub fn build(&self, options: &BuildOptions) -> Result<BuildReport, SiteError> {
        let mut report = BuildReport::default();
        report
            .outputs
            .insert(PathBuf::from("CNAME"), self.cname.clone().into_bytes());

        for item in WalkDir::new(&self.input).sort_by_file_name() {
            let item = item.map_err(|e| SiteError::Io {
                path: e.path().unwrap_or(&self.input).to_path_buf(),
                message: e.to_string(),
            })?;
            if !item.file_type().is_file() || item.path() == self.template.path() {
                continue;
            }
            let rel = item
                .path()
                .strip_prefix(&self.input)
                .unwrap_or(item.path())
                .to_path_buf();

            match self.process_file(&rel) {
                Ok((out_rel, content)) => {
                    report.outputs.insert(out_rel, content);
                }
                Err(err) if options.ignore_errors => report.failures.push((rel, err)),
                Err(err) => return Err(err),
            }
        }

        if options.write {
            self.write_outputs(&report.outputs, options.force)?;
        }
        Ok(report)
    }

    fn write_outputs(
        &self,
        outputs: &BTreeMap<PathBuf, Vec<u8>>,
        force: bool,
    ) -> Result<(), SiteError> {
        if force {
            // Missing output directory is fine on a first build.
            let _ = fs::remove_dir_all(&self.output);
        }
        for (rel, content) in outputs {
            let path = self.output.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
            }
            fs::write(&path, content).map_err(|e| SiteError::io(&path, e))?;
        }
        Ok(())
    }
}

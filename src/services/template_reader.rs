//! Bundled template reader.
//!
//! Resolves logical `(subdir, filename)` pairs to paths inside a
//! [`ResourceStore`] and renders the files found there as templates.
//!
//! # Missing keys
//!
//! | Operation | Helpers | Missing key |
//! |-----------|---------|-------------|
//! | [`TemplateReader::render_template_bytes`] | yes | renders empty |
//! | [`TemplateReader::render_template`] | yes | renders empty |
//! | [`TemplateReader::print_table_template`] | no | fails |
//!
//! Table templates are strict so that a row never silently loses a column.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

use crate::config::EmbedConfig;
use crate::rendering::{ColumnLayout, ColumnWriter, CompiledTemplate, TemplateOptions};
use crate::storage::ResourceStore;
use crate::{Error, Result};

/// File mode for rendered output: owner read/write only.
#[cfg(unix)]
const OUTPUT_FILE_MODE: u32 = 0o600;

/// Reads files and renders templates from a resource store.
///
/// Immutable after construction; every call builds its own template registry,
/// so a reader can be shared across threads when the store allows it.
#[derive(Debug, Clone)]
pub struct TemplateReader<S> {
    root_dir: String,
    store: S,
    table_layout: ColumnLayout,
}

impl<S: ResourceStore> TemplateReader<S> {
    /// Creates a reader rooted at `root_dir` inside `store`.
    ///
    /// No validation happens here; a missing root surfaces as
    /// [`Error::NotFound`] on first use.
    pub fn new(root_dir: impl Into<String>, store: S) -> Self {
        Self {
            root_dir: root_dir.into(),
            store,
            table_layout: ColumnLayout::TABLE,
        }
    }

    /// Creates a reader using settings from `config`.
    pub fn from_config(root_dir: impl Into<String>, store: S, config: &EmbedConfig) -> Self {
        Self::new(root_dir, store).with_table_layout(config.table)
    }

    /// Sets the column layout used by [`Self::print_table_template`].
    #[must_use]
    pub const fn with_table_layout(mut self, layout: ColumnLayout) -> Self {
        self.table_layout = layout;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root_dir(&self) -> &str {
        &self.root_dir
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the table column layout.
    #[must_use]
    pub const fn table_layout(&self) -> &ColumnLayout {
        &self.table_layout
    }

    /// Returns the store path for `filename` in `subdir`.
    ///
    /// Always joined with `/`; an empty `subdir` places the file directly
    /// under the root.
    #[must_use]
    pub fn resolve_path(&self, subdir: &str, filename: &str) -> String {
        if subdir.is_empty() {
            format!("{}/{filename}", self.root_dir)
        } else {
            format!("{}/{subdir}/{filename}", self.root_dir)
        }
    }

    /// Reads a file from the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the resolved path does not exist.
    pub fn read_file(&self, subdir: &str, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(subdir, filename);
        let content = self.store.read(&path)?;
        tracing::debug!(path = %path, bytes = content.len(), "read bundled file");
        Ok(content.into_owned())
    }

    /// Renders a template and returns the output bytes.
    ///
    /// The helper library is available and missing keys render empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Encoding`], [`Error::Parse`] or
    /// [`Error::Execution`].
    #[instrument(skip(self, args), fields(root = %self.root_dir))]
    pub fn render_template_bytes<T: Serialize>(
        &self,
        args: &T,
        subdir: &str,
        filename: &str,
    ) -> Result<Vec<u8>> {
        let template = self.compile(subdir, filename, TemplateOptions::lenient())?;
        let rendered = template.render(args)?;
        tracing::debug!(bytes = rendered.len(), "rendered template");
        Ok(rendered.into_bytes())
    }

    /// Renders a template and returns the output as a string.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render_template_bytes`].
    pub fn render_template_string<T: Serialize>(
        &self,
        args: &T,
        subdir: &str,
        filename: &str,
    ) -> Result<String> {
        let template = self.compile(subdir, filename, TemplateOptions::lenient())?;
        template.render(args)
    }

    /// Renders a template and writes the output to `output_path`.
    ///
    /// A new file is created with mode `0o600` on Unix. An existing file is
    /// truncated and keeps its mode. A partially written file is left as is.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::render_template_bytes`], or
    /// [`Error::Write`] if the file cannot be written.
    pub fn render_template<T: Serialize>(
        &self,
        args: &T,
        subdir: &str,
        filename: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<()> {
        let data = self.render_template_bytes(args, subdir, filename)?;
        let output_path = output_path.as_ref();
        write_output(output_path, &data).map_err(|source| Error::Write {
            path: output_path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %output_path.display(), bytes = data.len(), "wrote rendered template");
        Ok(())
    }

    /// Renders a tab-separated template into `out` with aligned columns.
    ///
    /// No helper library is registered and a missing key fails the render.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Encoding`], [`Error::Parse`],
    /// [`Error::Execution`], or [`Error::Flush`] if the aligned output cannot
    /// be written to `out`.
    #[instrument(skip(self, out, args), fields(root = %self.root_dir))]
    pub fn print_table_template<W: Write, T: Serialize>(
        &self,
        out: W,
        args: &T,
        subdir: &str,
        filename: &str,
    ) -> Result<()> {
        let template = self.compile(subdir, filename, TemplateOptions::strict())?;
        let rendered = template.render(args)?;

        let mut table = ColumnWriter::new(out, self.table_layout);
        table
            .write_all(rendered.as_bytes())
            .and_then(|()| table.flush())
            .map_err(|source| Error::Flush { source })
    }

    /// Loads and parses the template at `(subdir, filename)`.
    fn compile(
        &self,
        subdir: &str,
        filename: &str,
        options: TemplateOptions,
    ) -> Result<CompiledTemplate> {
        let path = self.resolve_path(subdir, filename);
        let content = self.store.read(&path)?;
        let source =
            std::str::from_utf8(&content).map_err(|source| Error::Encoding {
                path: path.clone(),
                source,
            })?;
        tracing::trace!(path = %path, "loaded template");
        CompiledTemplate::compile(filename, source, options)
    }
}

/// Writes `data` to `path`, creating the file owner-only.
fn write_output(path: &Path, data: &[u8]) -> std::io::Result<()> {
    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(OUTPUT_FILE_MODE)
            .open(path)?
    };

    #[cfg(not(unix))]
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    file.write_all(data)?;
    file.flush()
}

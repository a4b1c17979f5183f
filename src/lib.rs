//! # embedfs
//!
//! Reads files bundled into an application binary and renders Handlebars
//! templates from them.
//!
//! The crate is a thin layer over three collaborators:
//!
//! - a read-only [`ResourceStore`] (an [`include_dir::Dir`] compiled into the
//!   binary, or a [`MemoryStore`] fixture),
//! - the [`handlebars`] engine, wrapped by [`CompiledTemplate`],
//! - a [`ColumnWriter`] that aligns tab-separated output into columns.
//!
//! ## Example
//!
//! ```rust,ignore
//! use embedfs::TemplateReader;
//! use include_dir::{Dir, include_dir};
//!
//! static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");
//!
//! let reader = TemplateReader::new("templates", &ASSETS);
//! let rendered = reader.render_template_bytes(&serde_json::json!({"Name": "Bob"}), "", "greeting.tmpl")?;
//! reader.print_table_template(&mut std::io::stdout(), &rows, "tables", "users.tmpl")?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

pub mod config;
pub mod observability;
pub mod rendering;
pub mod services;
pub mod storage;

pub use config::EmbedConfig;
pub use observability::{LogFormat, LoggingConfig, init_logging};
pub use rendering::{
    ColumnLayout, ColumnWriter, CompiledTemplate, MissingKeyPolicy, TemplateOptions,
    register_helpers,
};
pub use services::TemplateReader;
pub use storage::{MemoryStore, ResourceStore};

/// Error type for embedfs operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | The resolved path has no entry in the resource store |
/// | `Parse` | Template content is not valid Handlebars (e.g. unclosed block) |
/// | `Encoding` | Template content is not UTF-8 |
/// | `Execution` | Rendering failed: unknown helper, bad helper params, strict-mode miss |
/// | `Write` | Persisting rendered output to disk failed |
/// | `Flush` | The column writer could not emit aligned output |
/// | `Config` | A configuration file could not be read or parsed |
#[derive(Debug, ThisError)]
pub enum Error {
    /// No resource exists at the given path.
    #[error("bundled resource not found: {path}")]
    NotFound {
        /// The fully resolved store path.
        path: String,
    },

    /// The template could not be parsed.
    #[error("failed to parse template '{name}': {source}")]
    Parse {
        /// Template name (the file name it was loaded from).
        name: String,
        /// The underlying parser error.
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// The template content is not valid UTF-8.
    #[error("template at '{path}' is not valid UTF-8: {source}")]
    Encoding {
        /// The fully resolved store path.
        path: String,
        /// The underlying decoding error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The template parsed but rendering failed.
    ///
    /// Carries the argument value that was being rendered for diagnosis.
    #[error("failed to execute template '{name}': args: {args}. Error: {source}")]
    Execution {
        /// Template name.
        name: String,
        /// The rendering arguments, as JSON.
        args: serde_json::Value,
        /// The underlying render error.
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// Rendered output could not be written to disk.
    #[error("failed to write rendered template to {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Aligned table output could not be flushed.
    #[error("failed to flush table output: {source}")]
    Flush {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded.
    #[error("operation '{operation}' failed: {cause}")]
    Config {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for embedfs operations.
pub type Result<T> = std::result::Result<T, Error>;

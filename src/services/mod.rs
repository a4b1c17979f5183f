//! Service layer.
//!
//! [`TemplateReader`] resolves `(subdir, filename)` pairs against a resource
//! store and exposes the read, render and table operations.

mod template_reader;

pub use template_reader::TemplateReader;

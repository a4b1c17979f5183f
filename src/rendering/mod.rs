//! Template rendering.
//!
//! Compiles Handlebars templates with an explicit missing-key policy, provides
//! the helper library available to lenient renders, and aligns tabular output
//! into columns.

mod column_writer;
mod engine;
mod helpers;

pub use column_writer::{ColumnLayout, ColumnWriter};
pub use engine::{CompiledTemplate, MissingKeyPolicy, TemplateOptions};
pub use helpers::{HELPER_NAMES, register_helpers};

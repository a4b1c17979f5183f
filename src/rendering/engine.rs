//! Handlebars template compilation and execution.

use handlebars::Handlebars;
use serde::Serialize;
use std::io::Write;

use super::helpers::register_helpers;
use crate::{Error, Result};

/// What to do when a template references a key the arguments do not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Render the missing value as empty.
    #[default]
    ZeroValue,
    /// Fail execution.
    Error,
}

/// Options applied when compiling a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Missing-key behaviour at execution time.
    pub missing_key: MissingKeyPolicy,
    /// Whether the helper library is registered before parsing.
    pub helpers: bool,
}

impl TemplateOptions {
    /// Missing keys render empty; helper library available.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            missing_key: MissingKeyPolicy::ZeroValue,
            helpers: true,
        }
    }

    /// Missing keys fail execution; only Handlebars built-ins available.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            missing_key: MissingKeyPolicy::Error,
            helpers: false,
        }
    }
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

/// A parsed template ready to render.
///
/// Owns a private registry holding exactly one template, so compiled
/// templates share no state.
pub struct CompiledTemplate {
    name: String,
    registry: Handlebars<'static>,
}

impl CompiledTemplate {
    /// Parses `source` as a template called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `source` is not a valid template.
    pub fn compile(name: &str, source: &str, options: TemplateOptions) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(options.missing_key == MissingKeyPolicy::Error);
        if options.helpers {
            register_helpers(&mut registry);
        }

        registry
            .register_template_string(name, source)
            .map_err(|e| Error::Parse {
                name: name.to_string(),
                source: Box::new(e),
            })?;

        tracing::trace!(template = name, ?options, "compiled template");

        Ok(Self {
            name: name.to_string(),
            registry,
        })
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the template against `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Execution`] if rendering fails.
    pub fn render<T: Serialize>(&self, args: &T) -> Result<String> {
        self.registry
            .render(&self.name, args)
            .map_err(|e| self.execution_error(args, e))
    }

    /// Renders the template against `args` directly into `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Execution`] if rendering or writing fails.
    pub fn render_to<T: Serialize, W: Write>(&self, args: &T, writer: W) -> Result<()> {
        self.registry
            .render_to_write(&self.name, args, writer)
            .map_err(|e| self.execution_error(args, e))
    }

    fn execution_error<T: Serialize>(&self, args: &T, source: handlebars::RenderError) -> Error {
        Error::Execution {
            name: self.name.clone(),
            args: serde_json::to_value(args).unwrap_or(serde_json::Value::Null),
            source: Box::new(source),
        }
    }
}

impl std::fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .field("strict", &self.registry.strict_mode())
            .finish_non_exhaustive()
    }
}

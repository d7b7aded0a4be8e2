use std::sync::Arc;

use thiserror::Error;

/// A template that failed to compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to compile template {name}: {message}")]
pub struct CompileError {
	pub name: String,
	pub message: String,
}

impl CompileError {
	pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			message: message.into(),
		}
	}
}

/// Compiles raw (already minified) template text into a renderable handle.
pub trait TemplateEngine: Send + Sync + 'static {
	type Template: Clone + Send + Sync + 'static;

	fn compile(&self, name: &str, source: &str) -> Result<Self::Template, CompileError>;
}

/// Engine whose templates are the source text itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl TemplateEngine for Verbatim {
	type Template = Arc<str>;

	fn compile(&self, _name: &str, source: &str) -> Result<Arc<str>, CompileError> {
		Ok(Arc::from(source))
	}
}

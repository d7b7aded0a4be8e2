use std::path::PathBuf;

use thiserror::Error;

use crate::engine::CompileError;

#[derive(Error, Debug)]
pub enum ViewError {
	#[error("view directory {} is not beneath the application root {}", .path.display(), .root.display())]
	InvalidPath { path: PathBuf, root: PathBuf },

	#[error("failed to read view {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Compile(#[from] CompileError),

	#[error("invalid minifier pattern: {0}")]
	Pattern(#[from] regex::Error),
}

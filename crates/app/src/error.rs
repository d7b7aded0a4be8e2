use std::path::PathBuf;

use thiserror::Error;
use wright_registry::RegistryError;
use wright_views::ViewError;

/// Failure to read or parse `wright.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid configuration in {}: {source}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

#[derive(Error, Debug)]
pub enum AppError {
	#[error("cannot resolve base directory {}: {source}", .path.display())]
	BaseDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	View(#[from] ViewError),
}

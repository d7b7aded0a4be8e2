//! The seam between component files and running code.
//!
//! A [`ModuleLoader`] turns a component file into a [`ComponentFactory`]. The
//! loader owns the file format; the registry only decides which file to load.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use wright_primitives::{ComponentKind, QualifiedName, RootSet};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A constructed component. Callers recover the concrete type with [`crate::downcast`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Everything a factory gets when asked for an instance.
#[derive(Debug, Clone, Copy)]
pub struct ConstructContext<'a> {
	pub kind: ComponentKind,
	pub name: &'a QualifiedName,
	/// Short name the application used to ask for the component.
	pub alias: &'a str,
	/// Roots the instance should use for its own nested lookups.
	pub roots: &'a RootSet,
}

/// Builds instances of one component.
pub trait ComponentFactory: Send + Sync + 'static {
	fn construct(&self, cx: &ConstructContext<'_>) -> Result<Instance, BoxError>;
}

impl<F> ComponentFactory for F
where
	F: Fn(&ConstructContext<'_>) -> Result<Instance, BoxError> + Send + Sync + 'static,
{
	fn construct(&self, cx: &ConstructContext<'_>) -> Result<Instance, BoxError> {
		self(cx)
	}
}

/// Wraps a closure as a shared factory.
pub fn factory<F>(f: F) -> Arc<dyn ComponentFactory>
where
	F: Fn(&ConstructContext<'_>) -> Result<Instance, BoxError> + Send + Sync + 'static,
{
	Arc::new(f)
}

/// A request to load one component file.
#[derive(Debug)]
pub struct LoadRequest<'a> {
	pub kind: ComponentKind,
	pub name: &'a QualifiedName,
	/// Absolute path of the component file.
	pub path: &'a Path,
	/// Search root the file was found under.
	pub root: &'a Path,
	/// `configuration[kind][name]`, empty when nothing is configured.
	pub config: toml::Table,
}

/// Turns component files into factories.
pub trait ModuleLoader: Send + Sync {
	fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<dyn ComponentFactory>, LoadError>;
}

/// Errors reported by a [`ModuleLoader`].
#[derive(Error, Debug)]
pub enum LoadError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid component manifest: {0}")]
	Manifest(#[from] toml::de::Error),

	#[error("no factory registered under {0:?}")]
	UnknownFactory(String),

	#[error("factory failed: {0}")]
	Factory(#[source] BoxError),
}

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wright_primitives::{ComponentKind, QualifiedName, RootSet};

use crate::module::{BoxError, ComponentFactory, ConstructContext, Instance};

/// A loaded, not yet instantiated component.
///
/// Immutable once cached; shared by every caller that asks for the same
/// (kind, name).
pub struct Definition {
	kind: ComponentKind,
	name: QualifiedName,
	path: Option<PathBuf>,
	roots: RootSet,
	factory: Arc<dyn ComponentFactory>,
}

impl Definition {
	/// Definition backed by a component file.
	pub fn new(
		kind: ComponentKind,
		name: QualifiedName,
		path: PathBuf,
		roots: RootSet,
		factory: Arc<dyn ComponentFactory>,
	) -> Self {
		Self {
			kind,
			name,
			path: Some(path),
			roots,
			factory,
		}
	}

	/// Definition registered in code rather than found on disk.
	pub fn builtin(kind: ComponentKind, name: QualifiedName, primary: &Path, factory: Arc<dyn ComponentFactory>) -> Self {
		Self {
			kind,
			name,
			path: None,
			roots: RootSet::primary_only(primary),
			factory,
		}
	}

	pub fn kind(&self) -> ComponentKind {
		self.kind
	}

	pub fn name(&self) -> &QualifiedName {
		&self.name
	}

	/// Component file this definition was loaded from; `None` for built-ins.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn roots(&self) -> &RootSet {
		&self.roots
	}

	pub fn factory(&self) -> &Arc<dyn ComponentFactory> {
		&self.factory
	}

	pub fn is_builtin(&self) -> bool {
		self.path.is_none()
	}

	/// Builds a fresh, uncached instance.
	pub fn construct(&self, alias: &str) -> Result<Instance, BoxError> {
		self.factory.construct(&ConstructContext {
			kind: self.kind,
			name: &self.name,
			alias,
			roots: &self.roots,
		})
	}
}

impl fmt::Debug for Definition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Definition")
			.field("kind", &self.kind)
			.field("name", &self.name)
			.field("path", &self.path)
			.field("roots", &self.roots)
			.finish_non_exhaustive()
	}
}

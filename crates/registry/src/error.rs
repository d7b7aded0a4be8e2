use std::path::PathBuf;

use thiserror::Error;
use wright_primitives::{ComponentKind, NameError, QualifiedName};

use crate::module::{BoxError, LoadError};

/// Failures surfaced by component resolution.
///
/// None of these are retried. A missing component means no file matched the
/// naming convention, and the operation that needed it should fail.
#[derive(Error, Debug)]
pub enum RegistryError {
	#[error("unable to find {}/{} in any search root", .kind.subdir(), .name.relative_path("").display())]
	NotFound { kind: ComponentKind, name: QualifiedName },

	#[error("failed to load {kind} {name} from {}: {source}", .path.display())]
	Load {
		kind: ComponentKind,
		name: QualifiedName,
		path: PathBuf,
		#[source]
		source: LoadError,
	},

	#[error("failed to construct {kind} {name}: {source}")]
	Construct {
		kind: ComponentKind,
		name: QualifiedName,
		#[source]
		source: BoxError,
	},

	#[error("{0} components are never instantiated")]
	NotInstantiable(ComponentKind),

	#[error("{kind} {name} is not a {expected}")]
	TypeMismatch {
		kind: ComponentKind,
		name: QualifiedName,
		expected: &'static str,
	},

	#[error(transparent)]
	Name(#[from] NameError),
}

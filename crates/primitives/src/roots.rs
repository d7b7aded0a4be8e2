use std::path::{Path, PathBuf};

/// Ordered roots a resolved component consults for its own nested lookups.
///
/// Always ends with the primary root: `[primary]` when the component was found
/// in the primary root, `[found, primary]` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootSet(Box<[PathBuf]>);

impl RootSet {
	/// Root set for a component found under `found`.
	pub fn resolved(found: &Path, primary: &Path) -> Self {
		if found == primary {
			Self::primary_only(primary)
		} else {
			Self(Box::new([found.to_path_buf(), primary.to_path_buf()]))
		}
	}

	pub fn primary_only(primary: &Path) -> Self {
		Self(Box::new([primary.to_path_buf()]))
	}

	/// Root the component was found in.
	pub fn origin(&self) -> &Path {
		&self.0[0]
	}

	/// Primary root, the final fallback.
	pub fn primary(&self) -> &Path {
		&self.0[self.0.len() - 1]
	}

	/// True when the component came from a module root rather than the primary root.
	pub fn is_module(&self) -> bool {
		self.0.len() > 1
	}

	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.0.iter().map(PathBuf::as_path)
	}

	pub fn as_slice(&self) -> &[PathBuf] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

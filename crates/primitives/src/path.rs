//! Lexical path handling.
//!
//! Containment checks run before any filesystem access, so nothing here
//! touches the disk or resolves symlinks.

use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without consulting the filesystem.
///
/// `..` at the root of an absolute path is dropped; on a relative path it is
/// kept, so an escaping relative path stays recognisable.
pub fn normalize(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => match out.components().next_back() {
				Some(Component::Normal(_)) => {
					out.pop();
				}
				Some(Component::RootDir | Component::Prefix(_)) => {}
				_ => out.push(".."),
			},
			other => out.push(other),
		}
	}
	out
}

/// Anchors `path` at `base` when relative, then normalises the result.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		normalize(path)
	} else {
		normalize(&base.join(path))
	}
}

/// Returns true when `path` equals `root` or lies beneath it, compared lexically.
pub fn is_within(path: &Path, root: &Path) -> bool {
	normalize(path).starts_with(normalize(root))
}

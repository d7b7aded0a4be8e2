use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a string cannot be used as a [`QualifiedName`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
	#[error("component name is empty")]
	Empty,
	#[error("component name {0:?} has an empty segment")]
	EmptySegment(String),
	#[error("component name {0:?} contains a path separator")]
	Separator(String),
}

/// Dotted component identifier.
///
/// Dots denote nesting beneath the kind's sub-directory: `admin.userModel`
/// names the file `admin/userModel.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(Box<str>);

impl QualifiedName {
	pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
		let name = name.into();
		if name.is_empty() {
			return Err(NameError::Empty);
		}
		if name.contains(['/', '\\']) {
			return Err(NameError::Separator(name));
		}
		if name.split('.').any(str::is_empty) {
			return Err(NameError::EmptySegment(name));
		}
		Ok(Self(name.into_boxed_str()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Path segments, outermost first.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('.')
	}

	/// Final segment, used as the file stem.
	pub fn leaf(&self) -> &str {
		self.0.rsplit('.').next().unwrap_or(&self.0)
	}

	/// Directory portion relative to the kind's sub-directory.
	pub fn parent_path(&self) -> PathBuf {
		match self.0.rsplit_once('.') {
			Some((parent, _)) => parent.split('.').collect(),
			None => PathBuf::new(),
		}
	}

	/// File name of the component file for the given extension.
	pub fn file_name(&self, extension: &str) -> String {
		if extension.is_empty() {
			self.leaf().to_owned()
		} else {
			format!("{}.{extension}", self.leaf())
		}
	}

	/// Full path relative to the kind's sub-directory.
	pub fn relative_path(&self, extension: &str) -> PathBuf {
		self.parent_path().join(self.file_name(extension))
	}
}

impl fmt::Display for QualifiedName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for QualifiedName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

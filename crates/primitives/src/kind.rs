use std::fmt;

use crate::name::{NameError, QualifiedName};

/// Component categories recognised by the loader.
///
/// Each kind owns a fixed sub-directory beneath every search root and a fixed
/// suffix appended to the short name the application asks for, so a `user`
/// model lives at `models/userModel.<ext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
	Service,
	Helper,
	Model,
	Controller,
}

impl ComponentKind {
	/// All kinds, in the order warm-up visits them.
	pub const ALL: [ComponentKind; 4] = [Self::Service, Self::Helper, Self::Model, Self::Controller];

	/// Sub-directory holding components of this kind beneath a search root.
	pub const fn subdir(self) -> &'static str {
		match self {
			Self::Service => "services",
			Self::Helper => "helpers",
			Self::Model => "models",
			Self::Controller => "controllers",
		}
	}

	/// Suffix appended to short names to form the qualified name.
	pub const fn suffix(self) -> &'static str {
		match self {
			Self::Service => "Service",
			Self::Helper => "Helper",
			Self::Model => "Model",
			Self::Controller => "Controller",
		}
	}

	/// Helpers are handed out as definitions and never get a singleton.
	pub const fn is_instantiable(self) -> bool {
		!matches!(self, Self::Helper)
	}

	/// Looks a kind up by its sub-directory name (`"models"` → [`ComponentKind::Model`]).
	pub fn from_subdir(subdir: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.subdir() == subdir)
	}

	/// Builds the qualified name for a short name, e.g. `admin.user` → `admin.userModel`.
	pub fn qualify(self, short: &str) -> Result<QualifiedName, NameError> {
		QualifiedName::new(format!("{short}{}", self.suffix()))
	}
}

impl fmt::Display for ComponentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Service => "service",
			Self::Helper => "helper",
			Self::Model => "model",
			Self::Controller => "controller",
		};
		f.write_str(label)
	}
}

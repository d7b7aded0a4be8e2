//! TOML component manifests.
//!
//! The default [`ModuleLoader`] reads each component file as a manifest naming
//! a factory compiled into the binary, plus settings for it:
//!
//! ```toml
//! factory = "sql-model"
//!
//! [settings]
//! table = "users"
//! ```
//!
//! The application's configuration fragment for the component is layered over
//! `[settings]`. Factories are registered explicitly with
//! [`ManifestLoader::register`] or statically with [`register_factory!`](crate::register_factory).

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use serde::Deserialize;
use wright_primitives::{ComponentKind, QualifiedName};

use crate::module::{BoxError, ComponentFactory, LoadError, LoadRequest, ModuleLoader};

/// Parsed component file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	/// Name of the registered factory that builds this component.
	pub factory: String,
	#[serde(default)]
	pub settings: toml::Table,
}

impl Manifest {
	pub fn parse(source: &str) -> Result<Self, LoadError> {
		Ok(toml::from_str(source)?)
	}

	pub fn read(path: &Path) -> Result<Self, LoadError> {
		let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&source)
	}
}

/// Input handed to a factory builder.
#[derive(Debug)]
pub struct FactoryInput<'a> {
	pub kind: ComponentKind,
	pub name: &'a QualifiedName,
	pub path: &'a Path,
	/// Manifest settings with the configuration fragment layered on top.
	pub settings: toml::Table,
}

pub type FactoryBuilder = Arc<dyn Fn(&FactoryInput<'_>) -> Result<Arc<dyn ComponentFactory>, BoxError> + Send + Sync>;

/// Static factory registration collected via `inventory`.
pub struct FactoryStatic {
	/// Name manifests refer to in their `factory` key.
	pub name: &'static str,
	/// Crate that defined this factory.
	pub crate_name: &'static str,
	pub build: fn(&FactoryInput<'_>) -> Result<Arc<dyn ComponentFactory>, BoxError>,
}

/// Wrapper for `inventory::collect!`.
pub struct FactoryReg(pub &'static FactoryStatic);

inventory::collect!(FactoryReg);

/// Registers a factory builder under a manifest name at link time.
///
/// ```ignore
/// wright_registry::register_factory!(SQL_MODEL, "sql-model", build_sql_model);
/// ```
#[macro_export]
macro_rules! register_factory {
	($ident:ident, $name:literal, $build:path) => {
		#[allow(non_upper_case_globals)]
		static $ident: $crate::FactoryStatic = $crate::FactoryStatic {
			name: $name,
			crate_name: env!("CARGO_PKG_NAME"),
			build: $build,
		};

		$crate::__inventory::submit! { $crate::FactoryReg(&$ident) }
	};
}

/// [`ModuleLoader`] for TOML manifests.
pub struct ManifestLoader {
	factories: RwLock<HashMap<Box<str>, FactoryBuilder>>,
}

impl Default for ManifestLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ManifestLoader {
	/// Loader seeded with every statically registered factory.
	pub fn new() -> Self {
		let loader = Self::empty();
		for reg in inventory::iter::<FactoryReg> {
			let build = reg.0.build;
			tracing::trace!(factory = reg.0.name, crate_name = reg.0.crate_name, "static factory");
			loader.register(reg.0.name, move |input: &FactoryInput<'_>| build(input));
		}
		loader
	}

	/// Loader without any factories.
	pub fn empty() -> Self {
		Self {
			factories: RwLock::new(HashMap::default()),
		}
	}

	/// Registers or replaces a factory builder.
	pub fn register<F>(&self, name: &str, build: F)
	where
		F: Fn(&FactoryInput<'_>) -> Result<Arc<dyn ComponentFactory>, BoxError> + Send + Sync + 'static,
	{
		if self.factories.write().insert(Box::from(name), Arc::new(build)).is_some() {
			tracing::debug!(factory = name, "replaced factory registration");
		}
	}

	/// The builder registered under `name`, for wrapping or re-registering.
	pub fn builder(&self, name: &str) -> Option<FactoryBuilder> {
		self.factories.read().get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.read().contains_key(name)
	}

	/// Registered factory names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.factories.read().keys().map(|k| k.to_string()).collect();
		names.sort();
		names
	}
}

impl ModuleLoader for ManifestLoader {
	fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<dyn ComponentFactory>, LoadError> {
		let manifest = Manifest::read(request.path)?;
		let build = self
			.builder(&manifest.factory)
			.ok_or_else(|| LoadError::UnknownFactory(manifest.factory.clone()))?;

		let mut settings = manifest.settings;
		merge_tables(&mut settings, request.config.clone());

		build(&FactoryInput {
			kind: request.kind,
			name: request.name,
			path: request.path,
			settings,
		})
		.map_err(LoadError::Factory)
	}
}

/// Layers `overlay` onto `base`; nested tables merge, everything else replaces.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
	for (key, value) in overlay {
		match value {
			toml::Value::Table(incoming) => {
				if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
					merge_tables(existing, incoming);
					continue;
				}
				base.insert(key, toml::Value::Table(incoming));
			}
			value => {
				base.insert(key, value);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn manifest_requires_factory() {
		assert!(matches!(Manifest::parse("[settings]\nx = 1"), Err(LoadError::Manifest(_))));
		let manifest = Manifest::parse("factory = \"plain\"").unwrap();
		assert_eq!(manifest.factory, "plain");
		assert!(manifest.settings.is_empty());
	}

	#[test]
	fn overlay_merges_nested_tables() {
		let mut base: toml::Table = toml::from_str("a = 1\n[db]\nhost = \"localhost\"\nport = 5432").unwrap();
		let overlay: toml::Table = toml::from_str("b = 2\n[db]\nport = 6543").unwrap();
		merge_tables(&mut base, overlay);

		let expected: toml::Table = toml::from_str("a = 1\nb = 2\n[db]\nhost = \"localhost\"\nport = 6543").unwrap();
		assert_eq!(base, expected);
	}
}

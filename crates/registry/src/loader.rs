//! Definition lookup across search roots.
//!
//! A lookup for `(kind, name)` probes `<root>/<kind-subdir>/<name as path>.<ext>`
//! in each candidate root, in registry order, using the listing cache so the
//! probe is case-sensitive. The first root holding the file wins and no
//! further roots are consulted. Results are cached for the life of the loader.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use rustc_hash::FxHashMap as HashMap;
use wright_listing::ListingCache;
use wright_primitives::{ComponentKind, QualifiedName, RootSet};

use crate::definition::Definition;
use crate::error::RegistryError;
use crate::module::{LoadRequest, ModuleLoader};
use crate::roots::SearchRoots;
use crate::settings::ComponentSettings;

/// Tunables for [`ComponentLoader`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
	/// Extension of component files, without the dot. Empty means none.
	pub extension: String,
	/// Warn when a later root also holds a component that an earlier root won.
	pub warn_ambiguous: bool,
}

impl Default for LoaderOptions {
	fn default() -> Self {
		Self {
			extension: "toml".to_owned(),
			warn_ambiguous: false,
		}
	}
}

type DefKey = (ComponentKind, QualifiedName);

/// Resolves and caches component definitions.
pub struct ComponentLoader {
	roots: Arc<SearchRoots>,
	listings: Arc<ListingCache>,
	modules: Arc<dyn ModuleLoader>,
	settings: Arc<ComponentSettings>,
	options: LoaderOptions,
	/// Serialises check-then-load so each definition is loaded at most once.
	/// Reentrant because module loaders may resolve other components.
	gate: ReentrantMutex<()>,
	definitions: Mutex<HashMap<DefKey, Arc<Definition>>>,
}

impl ComponentLoader {
	pub fn new(
		roots: Arc<SearchRoots>,
		listings: Arc<ListingCache>,
		modules: Arc<dyn ModuleLoader>,
		settings: Arc<ComponentSettings>,
		options: LoaderOptions,
	) -> Self {
		Self {
			roots,
			listings,
			modules,
			settings,
			options,
			gate: ReentrantMutex::new(()),
			definitions: Mutex::new(HashMap::default()),
		}
	}

	/// Loads the definition for `(kind, name)`.
	///
	/// With `explicit_root`, only that root is probed. A cached definition is
	/// returned as-is regardless of `explicit_root`.
	pub fn load(
		&self,
		kind: ComponentKind,
		name: &QualifiedName,
		explicit_root: Option<&Path>,
	) -> Result<Arc<Definition>, RegistryError> {
		let _gate = self.gate.lock();
		if let Some(def) = self.cached(kind, name) {
			return Ok(def);
		}

		let candidates = match explicit_root {
			Some(root) => vec![root.to_path_buf()],
			None => self.roots.snapshot(),
		};

		let Some((index, path)) = candidates
			.iter()
			.enumerate()
			.find_map(|(i, root)| self.probe(kind, name, root).map(|path| (i, path)))
		else {
			return Err(RegistryError::NotFound {
				kind,
				name: name.clone(),
			});
		};
		let root = &candidates[index];

		if self.options.warn_ambiguous {
			self.report_shadowed(kind, name, root, &candidates[index + 1..]);
		}

		let request = LoadRequest {
			kind,
			name,
			path: &path,
			root,
			config: self.settings.fragment(kind, name.as_str()),
		};
		let factory = self.modules.load(&request).map_err(|source| RegistryError::Load {
			kind,
			name: name.clone(),
			path: path.clone(),
			source,
		})?;

		let roots = RootSet::resolved(root, self.roots.primary());
		tracing::debug!(%kind, %name, path = %path.display(), module = roots.is_module(), "loaded definition");
		let def = Arc::new(Definition::new(kind, name.clone(), path, roots, factory));
		self.definitions.lock().insert((kind, name.clone()), def.clone());
		Ok(def)
	}

	/// Path of the component file under `root`, if it exists with exactly this casing.
	fn probe(&self, kind: ComponentKind, name: &QualifiedName, root: &Path) -> Option<PathBuf> {
		let dir = root.join(kind.subdir()).join(name.parent_path());
		let file = name.file_name(&self.options.extension);
		self.listings.exists(&dir, &file).then(|| dir.join(file))
	}

	fn report_shadowed(&self, kind: ComponentKind, name: &QualifiedName, winner: &Path, rest: &[PathBuf]) {
		for root in rest {
			if let Some(path) = self.probe(kind, name, root) {
				tracing::warn!(
					%kind,
					%name,
					winner = %winner.display(),
					shadowed = %path.display(),
					"ambiguous component definition; earlier root wins"
				);
			}
		}
	}

	/// Cached definition, without probing any root.
	pub fn cached(&self, kind: ComponentKind, name: &QualifiedName) -> Option<Arc<Definition>> {
		self.definitions.lock().get(&(kind, name.clone())).cloned()
	}

	/// All cached definitions, ordered by kind then name.
	pub fn definitions(&self) -> Vec<Arc<Definition>> {
		let mut defs: Vec<_> = self.definitions.lock().values().cloned().collect();
		defs.sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
		defs
	}

	pub fn roots(&self) -> &Arc<SearchRoots> {
		&self.roots
	}

	pub fn listings(&self) -> &Arc<ListingCache> {
		&self.listings
	}

	pub fn options(&self) -> &LoaderOptions {
		&self.options
	}

	pub fn len(&self) -> usize {
		self.definitions.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.lock().is_empty()
	}
}

impl std::fmt::Debug for ComponentLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentLoader")
			.field("roots", &self.roots)
			.field("options", &self.options)
			.field("definitions", &self.len())
			.finish_non_exhaustive()
	}
}

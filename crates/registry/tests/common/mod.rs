//! Shared fixtures for registry integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use wright_listing::ListingCache;
use wright_registry::{
	ComponentFactory, ComponentLoader, ComponentSettings, Instance, LifecycleHooks, LoadError, LoadRequest,
	LoaderOptions, ModuleLoader, NoopMount, RootSet, SearchRoots, factory,
};

/// What the counting loader's factories construct.
#[derive(Debug)]
pub struct Widget {
	pub source: PathBuf,
	pub alias: String,
	pub roots: RootSet,
	pub config: toml::Table,
}

/// Module loader that records every file it is asked to load.
///
/// Files containing the word `broken` fail to load.
#[derive(Default)]
pub struct CountingLoader {
	pub loads: Mutex<Vec<PathBuf>>,
}

impl CountingLoader {
	pub fn count(&self) -> usize {
		self.loads.lock().unwrap().len()
	}
}

impl ModuleLoader for CountingLoader {
	fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<dyn ComponentFactory>, LoadError> {
		self.loads.lock().unwrap().push(request.path.to_path_buf());
		if fs::read_to_string(request.path).is_ok_and(|s| s.contains("broken")) {
			return Err(LoadError::UnknownFactory("broken".into()));
		}
		let source = request.path.to_path_buf();
		let config = request.config.clone();
		Ok(factory(move |cx| {
			Ok(Arc::new(Widget {
				source: source.clone(),
				alias: cx.alias.to_owned(),
				roots: cx.roots.clone(),
				config: config.clone(),
			}) as Instance)
		}))
	}
}

pub fn touch(path: &Path) {
	write(path, "");
}

pub fn write(path: &Path, contents: &str) {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(path, contents).unwrap();
}

/// Temporary application tree rooted at `<tmp>/app`.
pub struct Fixture {
	pub tmp: TempDir,
	pub primary: PathBuf,
}

impl Fixture {
	pub fn new() -> Self {
		let tmp = tempfile::tempdir().unwrap();
		let primary = tmp.path().join("app");
		fs::create_dir_all(&primary).unwrap();
		Self { tmp, primary }
	}

	pub fn module(&self, name: &str) -> PathBuf {
		let root = self.primary.join("modules").join(name);
		fs::create_dir_all(&root).unwrap();
		root
	}

	pub fn context(&self) -> Context {
		self.context_with(ComponentSettings::new(), LoaderOptions::default())
	}

	pub fn context_with(&self, settings: ComponentSettings, options: LoaderOptions) -> Context {
		let listings = Arc::new(ListingCache::new());
		let roots = Arc::new(SearchRoots::discover(
			self.primary.clone(),
			"modules",
			"public",
			listings.clone(),
			Arc::new(NoopMount),
		));
		let modules = Arc::new(CountingLoader::default());
		let loader = Arc::new(ComponentLoader::new(
			roots.clone(),
			listings.clone(),
			modules.clone(),
			Arc::new(settings),
			options,
		));
		Context {
			listings,
			roots,
			modules,
			loader,
			hooks: Arc::new(LifecycleHooks::new()),
		}
	}
}

pub struct Context {
	pub listings: Arc<ListingCache>,
	pub roots: Arc<SearchRoots>,
	pub modules: Arc<CountingLoader>,
	pub loader: Arc<ComponentLoader>,
	pub hooks: Arc<LifecycleHooks>,
}

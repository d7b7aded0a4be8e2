use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wright_listing::ListingCache;
use wright_primitives::path::{absolutize, normalize};
use wright_registry::{
	ComponentCreated, ComponentKind, ComponentLoader, Definition, Instance, Instantiator, LifecycleHooks, ManifestLoader,
	ModuleLoader, NoopMount, RegistryError, Resolved, SearchRoots, StaticMount, SubscriptionId, downcast,
};
use wright_views::{Minifier, PartialResolver, PartialSet, TemplateEngine, Verbatim, ViewError};

use crate::builtins;
use crate::config::AppConfig;
use crate::error::AppError;

/// Builder for [`App`].
pub struct AppBuilder<E: TemplateEngine = Verbatim> {
	base_dir: PathBuf,
	config: Option<AppConfig>,
	modules: Option<Arc<dyn ModuleLoader>>,
	engine: Arc<E>,
	mount: Arc<dyn StaticMount>,
}

impl AppBuilder<Verbatim> {
	pub fn new(base_dir: impl Into<PathBuf>) -> Self {
		Self {
			base_dir: base_dir.into(),
			config: None,
			modules: None,
			engine: Arc::new(Verbatim),
			mount: Arc::new(NoopMount),
		}
	}
}

impl<E: TemplateEngine> AppBuilder<E> {
	/// Uses `config` instead of reading `wright.toml`.
	pub fn config(mut self, config: AppConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// Replaces the default [`ManifestLoader`].
	pub fn module_loader(mut self, modules: impl ModuleLoader + 'static) -> Self {
		self.modules = Some(Arc::new(modules));
		self
	}

	pub fn engine<F: TemplateEngine>(self, engine: F) -> AppBuilder<F> {
		AppBuilder {
			base_dir: self.base_dir,
			config: self.config,
			modules: self.modules,
			engine: Arc::new(engine),
			mount: self.mount,
		}
	}

	/// Receives every public directory as its root is registered.
	pub fn static_mount(mut self, mount: impl StaticMount + 'static) -> Self {
		self.mount = Arc::new(mount);
		self
	}

	/// Establishes search roots, mounts public directories and registers the
	/// built-in controllers.
	///
	/// A relative base directory is anchored at the current directory, so every
	/// root and view directory the app hands out is absolute.
	pub fn build(self) -> Result<App<E>, AppError> {
		let base_dir = std::path::absolute(&self.base_dir)
			.map(|dir| normalize(&dir))
			.map_err(|source| AppError::BaseDir {
				path: self.base_dir.clone(),
				source,
			})?;
		let config = match self.config {
			Some(config) => config,
			None => AppConfig::load(&base_dir)?,
		};
		let primary = normalize(&config.primary_root(&base_dir));
		let listings = Arc::new(ListingCache::new());
		let roots = Arc::new(SearchRoots::discover(
			primary.clone(),
			&config.modules_dir,
			&config.public_dir,
			listings.clone(),
			self.mount,
		));

		let modules = self.modules.unwrap_or_else(|| Arc::new(ManifestLoader::new()));
		let loader = Arc::new(ComponentLoader::new(
			roots.clone(),
			listings.clone(),
			modules,
			Arc::new(config.component_settings()),
			config.loader_options(),
		));
		let components = Instantiator::new(loader, Arc::new(LifecycleHooks::new()));
		builtins::register(&components, &roots, &listings, &config.views_dir)?;

		let minifier = Minifier::new(config.minify_views).map_err(ViewError::from)?;
		let views = PartialResolver::new(
			&primary,
			listings.clone(),
			self.engine,
			Arc::new(minifier),
			config.partial_options(),
		);

		tracing::info!(
			base_dir = %base_dir.display(),
			roots = roots.len(),
			public_dirs = roots.public_dirs().len(),
			"application ready"
		);
		Ok(App {
			base_dir,
			config,
			listings,
			roots,
			components,
			views,
		})
	}
}

/// One application tree and every cache that belongs to it.
pub struct App<E: TemplateEngine = Verbatim> {
	base_dir: PathBuf,
	config: AppConfig,
	listings: Arc<ListingCache>,
	roots: Arc<SearchRoots>,
	components: Instantiator,
	views: PartialResolver<E>,
}

impl App {
	pub fn builder(base_dir: impl Into<PathBuf>) -> AppBuilder {
		AppBuilder::new(base_dir)
	}
}

impl<E: TemplateEngine> App<E> {
	pub fn service(&self, name: &str) -> Result<Instance, AppError> {
		self.instance(ComponentKind::Service, name)
	}

	pub fn controller(&self, name: &str) -> Result<Instance, AppError> {
		self.instance(ComponentKind::Controller, name)
	}

	pub fn model(&self, name: &str) -> Result<Instance, AppError> {
		self.instance(ComponentKind::Model, name)
	}

	pub fn service_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, AppError> {
		self.instance_as(ComponentKind::Service, name)
	}

	pub fn controller_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, AppError> {
		self.instance_as(ComponentKind::Controller, name)
	}

	pub fn model_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, AppError> {
		self.instance_as(ComponentKind::Model, name)
	}

	pub fn service_definition(&self, name: &str) -> Result<Arc<Definition>, AppError> {
		Ok(self.components.definition(ComponentKind::Service, name)?)
	}

	pub fn controller_definition(&self, name: &str) -> Result<Arc<Definition>, AppError> {
		Ok(self.components.definition(ComponentKind::Controller, name)?)
	}

	pub fn model_definition(&self, name: &str) -> Result<Arc<Definition>, AppError> {
		Ok(self.components.definition(ComponentKind::Model, name)?)
	}

	/// Helpers are never instantiated; this is always the definition.
	pub fn helper(&self, name: &str) -> Result<Arc<Definition>, AppError> {
		Ok(self.components.definition(ComponentKind::Helper, name)?)
	}

	pub fn set_service(&self, name: &str, instance: Instance) -> Result<Option<Instance>, AppError> {
		self.set(ComponentKind::Service, name, instance)
	}

	pub fn set_controller(&self, name: &str, instance: Instance) -> Result<Option<Instance>, AppError> {
		self.set(ComponentKind::Controller, name, instance)
	}

	pub fn set_model(&self, name: &str, instance: Instance) -> Result<Option<Instance>, AppError> {
		self.set(ComponentKind::Model, name, instance)
	}

	fn instance(&self, kind: ComponentKind, name: &str) -> Result<Instance, AppError> {
		match self.components.get(kind, name)? {
			Resolved::Instance(instance) => Ok(instance),
			Resolved::Definition(_) => Err(RegistryError::NotInstantiable(kind).into()),
		}
	}

	fn instance_as<T: Any + Send + Sync>(&self, kind: ComponentKind, name: &str) -> Result<Arc<T>, AppError> {
		let instance = self.instance(kind, name)?;
		Ok(downcast(kind, &kind.qualify(name).map_err(RegistryError::from)?, instance)?)
	}

	fn set(&self, kind: ComponentKind, name: &str, instance: Instance) -> Result<Option<Instance>, AppError> {
		let name = kind.qualify(name).map_err(RegistryError::from)?;
		Ok(self.components.override_instance(kind, &name, instance)?)
	}

	/// Calls `observer` the first time any component of `kind` is constructed.
	pub fn on_created<F>(&self, kind: ComponentKind, observer: F) -> SubscriptionId
	where
		F: Fn(&ComponentCreated<'_>) + Send + Sync + 'static,
	{
		self.components.hooks().subscribe(kind, observer)
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.components.hooks().unsubscribe(id)
	}

	/// Adds a search root after all existing ones. Relative paths are taken
	/// relative to the base directory.
	pub fn add_module_path(&self, path: impl AsRef<Path>) {
		self.roots.add_root(absolutize(&self.base_dir, path.as_ref()));
	}

	/// Search roots in precedence order, primary first.
	pub fn module_paths(&self) -> Vec<PathBuf> {
		self.roots.snapshot()
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	pub fn primary_root(&self) -> &Path {
		self.roots.primary()
	}

	pub fn public_dirs(&self) -> Vec<PathBuf> {
		self.roots.public_dirs()
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	pub fn components(&self) -> &Instantiator {
		&self.components
	}

	pub fn listings(&self) -> &Arc<ListingCache> {
		&self.listings
	}

	/// Partials visible from `view_dir`. Relative paths are taken relative to
	/// the primary root.
	pub fn partials(&self, view_dir: impl AsRef<Path>) -> Result<Arc<PartialSet<E::Template>>, AppError> {
		Ok(self.views.resolve(view_dir.as_ref())?)
	}

	/// Reads, minifies and compiles a view file. Relative paths are taken
	/// relative to the primary root.
	pub fn compile_view(&self, path: impl AsRef<Path>) -> Result<E::Template, AppError> {
		let path = absolutize(self.roots.primary(), path.as_ref());
		let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		Ok(self.views.compile_file(&name, &path)?)
	}

	/// `<root>/config/routes.<ext>` files that exist, in root order.
	pub fn route_sources(&self) -> Vec<PathBuf> {
		let file = match self.config.component_extension.as_str() {
			"" => "routes".to_owned(),
			ext => format!("routes.{ext}"),
		};
		self.roots
			.snapshot()
			.into_iter()
			.map(|root| root.join("config"))
			.filter(|dir| self.listings.exists(dir, &file))
			.map(|dir| dir.join(&file))
			.collect()
	}

	pub(crate) fn roots(&self) -> &Arc<SearchRoots> {
		&self.roots
	}

	pub(crate) fn loader(&self) -> &Arc<ComponentLoader> {
		self.components.loader()
	}
}

impl<E: TemplateEngine> std::fmt::Debug for App<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("App")
			.field("base_dir", &self.base_dir)
			.field("roots", &self.roots)
			.field("views", &self.views)
			.finish_non_exhaustive()
	}
}

//! Search root registry.
//!
//! Roots are consulted in order when resolving components. The primary
//! application root is always first; module roots follow in the order their
//! directories were listed, then any roots added at runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use wright_listing::ListingCache;

/// Receives each root's public-assets directory as it is registered.
pub trait StaticMount: Send + Sync {
	fn mount(&self, public_dir: &Path);
}

/// Mount that ignores every directory; used when no asset server is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMount;

impl StaticMount for NoopMount {
	fn mount(&self, _public_dir: &Path) {}
}

/// Ordered, append-only list of search roots.
pub struct SearchRoots {
	primary: PathBuf,
	roots: RwLock<Vec<PathBuf>>,
	public_dir: Box<str>,
	public_dirs: RwLock<Vec<PathBuf>>,
	mount: Arc<dyn StaticMount>,
	listings: Arc<ListingCache>,
}

impl SearchRoots {
	/// Establishes the registry from the primary root and its module sub-trees.
	///
	/// Every non-hidden directory in `<primary>/<modules_dir>` becomes a root.
	/// Each root's `<public_dir>` is mounted if present.
	pub fn discover(
		primary: impl Into<PathBuf>,
		modules_dir: &str,
		public_dir: &str,
		listings: Arc<ListingCache>,
		mount: Arc<dyn StaticMount>,
	) -> Self {
		let primary = primary.into();
		let modules = primary.join(modules_dir);
		let module_roots: Vec<PathBuf> = listings
			.listing(&modules)
			.iter()
			.filter(|name| !name.starts_with('.'))
			.map(|name| modules.join(name))
			.filter(|path| path.is_dir())
			.collect();

		let registry = Self {
			roots: RwLock::new(Vec::with_capacity(module_roots.len() + 1)),
			primary: primary.clone(),
			public_dir: Box::from(public_dir),
			public_dirs: RwLock::new(Vec::new()),
			mount,
			listings,
		};

		registry.push(primary);
		for root in module_roots {
			registry.push(root);
		}
		registry
	}

	/// Appends a root after every existing one and mounts its public directory.
	pub fn add_root(&self, root: impl Into<PathBuf>) {
		self.push(root.into());
	}

	fn push(&self, root: PathBuf) {
		tracing::debug!(root = %root.display(), "registering search root");
		self.mount_public(&root);
		self.roots.write().push(root);
	}

	fn mount_public(&self, root: &Path) {
		if !self.listings.exists(root, &self.public_dir) {
			return;
		}
		let public = root.join(&*self.public_dir);
		tracing::debug!(dir = %public.display(), "mounting public directory");
		self.mount.mount(&public);
		self.public_dirs.write().push(public);
	}

	pub fn primary(&self) -> &Path {
		&self.primary
	}

	/// Current roots in precedence order.
	pub fn snapshot(&self) -> Vec<PathBuf> {
		self.roots.read().clone()
	}

	/// Public directories mounted so far, in root order.
	pub fn public_dirs(&self) -> Vec<PathBuf> {
		self.public_dirs.read().clone()
	}

	pub fn len(&self) -> usize {
		self.roots.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.roots.read().is_empty()
	}
}

impl std::fmt::Debug for SearchRoots {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchRoots")
			.field("roots", &*self.roots.read())
			.field("public_dirs", &*self.public_dirs.read())
			.finish_non_exhaustive()
	}
}

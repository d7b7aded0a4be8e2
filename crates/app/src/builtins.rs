//! Controllers available without a component file.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use wright_listing::ListingCache;
use wright_registry::{ComponentKind, Instance, Instantiator, RegistryError, RootSet, SearchRoots, factory};

/// Controller every application can ask for as `Base`.
///
/// Knows the roots it was resolved against and where its views live.
#[derive(Debug, Clone)]
pub struct BaseController {
	pub alias: String,
	pub roots: RootSet,
	views_dir: String,
}

impl BaseController {
	/// `<root>/<views_dir>` for every root, closest first.
	pub fn view_dirs(&self) -> Vec<PathBuf> {
		self.roots.iter().map(|root| root.join(&self.views_dir)).collect()
	}
}

/// The default request handler, registered as the `Static` controller.
///
/// Maps request paths onto files in the mounted public directories. Each path
/// segment is matched exactly against the directory listing, so `/App.js`
/// never serves `app.js`.
pub struct StaticHandler {
	roots: Arc<SearchRoots>,
	listings: Arc<ListingCache>,
}

impl StaticHandler {
	/// First public file matching `request_path`, searching public directories
	/// in root order.
	///
	/// Paths with `.` or `..` segments, or that name a directory, resolve to
	/// nothing.
	pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
		let relative = Path::new(request_path.trim_start_matches('/'));
		let mut segments = Vec::new();
		for component in relative.components() {
			match component {
				Component::Normal(segment) => segments.push(segment.to_str()?),
				_ => return None,
			}
		}
		if segments.is_empty() {
			return None;
		}

		self.roots.public_dirs().into_iter().find_map(|public| {
			let mut path = public;
			for segment in &segments {
				if !self.listings.exists(&path, segment) {
					return None;
				}
				path.push(segment);
			}
			path.is_file().then_some(path)
		})
	}
}

impl std::fmt::Debug for StaticHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticHandler")
			.field("public_dirs", &self.roots.public_dirs())
			.finish_non_exhaustive()
	}
}

pub(crate) fn register(
	components: &Instantiator,
	roots: &Arc<SearchRoots>,
	listings: &Arc<ListingCache>,
	views_dir: &str,
) -> Result<(), RegistryError> {
	let views_dir = views_dir.to_owned();
	components.register_builtin(
		ComponentKind::Controller,
		"Base",
		factory(move |cx| {
			Ok(Arc::new(BaseController {
				alias: cx.alias.to_owned(),
				roots: cx.roots.clone(),
				views_dir: views_dir.clone(),
			}) as Instance)
		}),
	)?;

	let roots = roots.clone();
	let listings = listings.clone();
	components.register_builtin(
		ComponentKind::Controller,
		"Static",
		factory(move |_cx| {
			Ok(Arc::new(StaticHandler {
				roots: roots.clone(),
				listings: listings.clone(),
			}) as Instance)
		}),
	)
}

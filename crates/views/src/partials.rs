//! Partial cascade resolution.
//!
//! Resolving a view directory walks from that directory up to (not including)
//! the application root. At each level the entries of `<level>/partials` that
//! carry the template suffix become partials named after the file stem. A name
//! already collected at a closer level is never replaced.
//!
//! Results are cached per starting directory for the life of the resolver.
//! Intermediate levels are not cached on their own, so sibling view
//! directories re-walk their shared ancestors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use rustc_hash::FxHashMap as HashMap;
use wright_listing::ListingCache;
use wright_primitives::path::{absolutize, is_within, normalize};

use crate::engine::TemplateEngine;
use crate::error::ViewError;
use crate::minify::Minifier;

/// Directory and file naming for partials.
#[derive(Debug, Clone)]
pub struct PartialOptions {
	/// Name of the directory holding partials at each level.
	pub dir_name: String,
	/// Template file suffix, including the leading dot.
	pub suffix: String,
}

impl Default for PartialOptions {
	fn default() -> Self {
		Self {
			dir_name: "partials".to_owned(),
			suffix: ".html".to_owned(),
		}
	}
}

/// One compiled partial and the file it came from.
#[derive(Debug, Clone)]
pub struct Partial<T> {
	pub template: T,
	pub source: PathBuf,
}

/// Partials visible from one view directory, keyed by name.
#[derive(Debug, Clone)]
pub struct PartialSet<T> {
	partials: BTreeMap<Box<str>, Partial<T>>,
}

impl<T> Default for PartialSet<T> {
	fn default() -> Self {
		Self {
			partials: BTreeMap::new(),
		}
	}
}

impl<T> PartialSet<T> {
	pub fn get(&self, name: &str) -> Option<&T> {
		self.partials.get(name).map(|p| &p.template)
	}

	pub fn partial(&self, name: &str) -> Option<&Partial<T>> {
		self.partials.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.partials.contains_key(name)
	}

	/// Partial names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.partials.keys().map(|k| &**k)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Partial<T>)> {
		self.partials.iter().map(|(k, v)| (&**k, v))
	}

	pub fn len(&self) -> usize {
		self.partials.len()
	}

	pub fn is_empty(&self) -> bool {
		self.partials.is_empty()
	}
}

/// Resolves and caches partial sets beneath one application root.
pub struct PartialResolver<E: TemplateEngine> {
	root: PathBuf,
	listings: Arc<ListingCache>,
	engine: Arc<E>,
	minifier: Arc<Minifier>,
	options: PartialOptions,
	/// Serialises check-then-resolve; reentrant so engines may resolve other
	/// directories while compiling.
	gate: ReentrantMutex<()>,
	cache: Mutex<HashMap<PathBuf, Arc<PartialSet<E::Template>>>>,
}

impl<E: TemplateEngine> PartialResolver<E> {
	pub fn new(
		root: &Path,
		listings: Arc<ListingCache>,
		engine: Arc<E>,
		minifier: Arc<Minifier>,
		options: PartialOptions,
	) -> Self {
		Self {
			root: normalize(root),
			listings,
			engine,
			minifier,
			options,
			gate: ReentrantMutex::new(()),
			cache: Mutex::new(HashMap::default()),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn engine(&self) -> &Arc<E> {
		&self.engine
	}

	pub fn options(&self) -> &PartialOptions {
		&self.options
	}

	/// Partials visible from `view_dir`.
	///
	/// A relative `view_dir` is taken relative to the root. Directories outside
	/// the root are rejected before the filesystem is touched. The root itself
	/// has no ancestors below the root and yields an empty set.
	///
	/// An engine may call back into the resolver from `compile`, but asking for
	/// the directory currently being resolved recurses without end.
	pub fn resolve(&self, view_dir: &Path) -> Result<Arc<PartialSet<E::Template>>, ViewError> {
		let dir = absolutize(&self.root, view_dir);
		if !is_within(&dir, &self.root) {
			return Err(ViewError::InvalidPath {
				path: view_dir.to_path_buf(),
				root: self.root.clone(),
			});
		}

		let _gate = self.gate.lock();
		if let Some(set) = self.cache.lock().get(&dir) {
			return Ok(set.clone());
		}

		let mut set = PartialSet::default();
		let mut cursor = dir.as_path();
		while cursor != self.root.as_path() {
			self.collect_level(cursor, &mut set);
			match cursor.parent() {
				Some(parent) => cursor = parent,
				None => break,
			}
		}

		tracing::debug!(dir = %dir.display(), partials = set.len(), "resolved partials");
		let set = Arc::new(set);
		self.cache.lock().insert(dir, set.clone());
		Ok(set)
	}

	fn collect_level(&self, level: &Path, set: &mut PartialSet<E::Template>) {
		let dir = level.join(&self.options.dir_name);
		let listing = self.listings.listing(&dir);
		for entry in listing.iter() {
			if entry.starts_with('.') {
				continue;
			}
			let Some(name) = entry.strip_suffix(self.options.suffix.as_str()) else {
				continue;
			};
			if set.contains(name) {
				continue;
			}

			let path = dir.join(entry);
			match self.compile_file(name, &path) {
				Ok(template) => {
					set.partials.insert(Box::from(name), Partial { template, source: path });
				}
				Err(e) => {
					tracing::warn!(partial = name, path = %path.display(), error = %e, "skipping partial");
				}
			}
		}
	}

	/// Reads, minifies and compiles one view or partial file.
	pub fn compile_file(&self, name: &str, path: &Path) -> Result<E::Template, ViewError> {
		let source = std::fs::read_to_string(path).map_err(|source| ViewError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(self.engine.compile(name, &self.minifier.apply(&source))?)
	}

	/// Number of cached view directories.
	pub fn len(&self) -> usize {
		self.cache.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.lock().is_empty()
	}
}

impl<E: TemplateEngine> std::fmt::Debug for PartialResolver<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PartialResolver")
			.field("root", &self.root)
			.field("options", &self.options)
			.field("cached", &self.len())
			.finish_non_exhaustive()
	}
}

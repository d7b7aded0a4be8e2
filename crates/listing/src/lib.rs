//! Directory listing cache.
//!
//! Existence checks go through a memoised listing of the containing directory
//! rather than `Path::exists`, so lookups compare names exactly as they are
//! stored on disk. A request for `user` never matches a file called `User`,
//! even on case-insensitive filesystems.
//!
//! Listings are read once per directory and never refreshed. Changes made to
//! the filesystem after the first read are not observed.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Entry names of one directory, in the order the OS returned them.
#[derive(Debug, Default)]
pub struct DirListing {
	entries: Vec<Box<str>>,
	index: HashSet<Box<str>>,
}

impl DirListing {
	fn from_names(names: Vec<Box<str>>) -> Self {
		let index = names.iter().cloned().collect();
		Self { entries: names, index }
	}

	/// Exact, case-sensitive membership.
	pub fn contains(&self, name: &str) -> bool {
		self.index.contains(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|name| &**name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Process-lifetime memo of directory listings.
#[derive(Debug, Default)]
pub struct ListingCache {
	listings: Mutex<HashMap<PathBuf, Arc<DirListing>>>,
	reads: AtomicUsize,
}

impl ListingCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the listing for `dir`, reading it on first use.
	///
	/// A missing directory yields an empty listing. Any other read failure is
	/// logged and also yields an empty listing; either result is cached.
	pub fn listing(&self, dir: &Path) -> Arc<DirListing> {
		let mut listings = self.listings.lock();
		if let Some(listing) = listings.get(dir) {
			return listing.clone();
		}

		self.reads.fetch_add(1, Ordering::Relaxed);
		let listing = Arc::new(read_listing(dir));
		listings.insert(dir.to_path_buf(), listing.clone());
		listing
	}

	/// True when `dir` holds an entry named exactly `name`.
	pub fn exists(&self, dir: &Path, name: &str) -> bool {
		self.listing(dir).contains(name)
	}

	/// Case-sensitive existence check for a full path.
	pub fn contains_path(&self, path: &Path) -> bool {
		let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str())) else {
			return false;
		};
		self.exists(dir, name)
	}

	/// Number of directory reads performed so far.
	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::Relaxed)
	}

	/// Number of directories currently memoised.
	pub fn len(&self) -> usize {
		self.listings.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.listings.lock().is_empty()
	}
}

fn read_listing(dir: &Path) -> DirListing {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) if e.kind() == io::ErrorKind::NotFound => {
			tracing::trace!(dir = %dir.display(), "directory absent");
			return DirListing::default();
		}
		Err(e) => {
			tracing::warn!(dir = %dir.display(), error = %e, "unable to read directory");
			return DirListing::default();
		}
	};

	let mut names = Vec::new();
	for entry in entries {
		match entry {
			Ok(entry) => match entry.file_name().into_string() {
				Ok(name) => names.push(name.into_boxed_str()),
				Err(raw) => tracing::debug!(dir = %dir.display(), name = ?raw, "skipping non UTF-8 entry"),
			},
			Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "unable to read directory entry"),
		}
	}
	DirListing::from_names(names)
}

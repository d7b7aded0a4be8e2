//! Eager loading of everything an application tree defines.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wright_registry::{ComponentKind, QualifiedName, RegistryError};
use wright_views::TemplateEngine;

use crate::app::App;
use crate::error::AppError;

/// Something that failed to load during warm-up.
#[derive(Debug)]
pub struct WarmupFailure {
	pub path: PathBuf,
	pub error: AppError,
}

/// Outcome of [`App::prefetch`].
#[derive(Debug, Default)]
pub struct WarmupReport {
	/// Component files that resolved to a definition.
	pub definitions: usize,
	/// View directories whose partials were resolved.
	pub view_dirs: usize,
	pub failures: Vec<WarmupFailure>,
}

impl WarmupReport {
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}

	fn fail(&mut self, path: PathBuf, error: AppError) {
		tracing::warn!(path = %path.display(), error = %error, "warm-up failure");
		self.failures.push(WarmupFailure { path, error });
	}
}

impl<E: TemplateEngine> App<E> {
	/// Loads every top-level component file of every kind in every root, then
	/// resolves partials for every directory beneath the primary views
	/// directory.
	///
	/// Each component is loaded with the root it was found in as the explicit
	/// root, so a module's copy is loaded even where the primary root shadows
	/// it for ordinary lookups. Since definitions are cached by name, the
	/// first root to define a name keeps it. Failures are collected rather
	/// than returned.
	pub fn prefetch(&self) -> WarmupReport {
		let mut report = WarmupReport::default();
		for kind in ComponentKind::ALL {
			for root in self.roots().snapshot() {
				self.prefetch_components(kind, &root, &mut report);
			}
		}
		self.prefetch_partials(&mut report);

		tracing::info!(
			definitions = report.definitions,
			view_dirs = report.view_dirs,
			failures = report.failures.len(),
			"warm-up finished"
		);
		report
	}

	fn prefetch_components(&self, kind: ComponentKind, root: &Path, report: &mut WarmupReport) {
		let dir = root.join(kind.subdir());
		let ext = &self.config().component_extension;
		for entry in self.listings().listing(&dir).iter() {
			if entry.starts_with('.') {
				continue;
			}
			let path = dir.join(entry);
			if path.is_dir() {
				continue;
			}
			let stem = match ext.as_str() {
				"" => entry,
				ext => entry
					.strip_suffix(ext)
					.and_then(|s| s.strip_suffix('.'))
					.unwrap_or(entry),
			};

			let loaded = QualifiedName::new(stem)
				.map_err(RegistryError::from)
				.and_then(|name| self.loader().load(kind, &name, Some(root)));
			match loaded {
				Ok(_) => report.definitions += 1,
				Err(error) => report.fail(path, error.into()),
			}
		}
	}

	fn prefetch_partials(&self, report: &mut WarmupReport) {
		let views = self.primary_root().join(&self.config().views_dir);
		if !views.is_dir() {
			return;
		}
		for entry in WalkDir::new(&views).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(error) => {
					let path = error.path().map(Path::to_path_buf).unwrap_or_else(|| views.clone());
					tracing::warn!(path = %path.display(), error = %error, "skipping unreadable view directory");
					continue;
				}
			};
			if !entry.file_type().is_dir() {
				continue;
			}
			match self.partials(entry.path()) {
				Ok(_) => report.view_dirs += 1,
				Err(error) => report.fail(entry.path().to_path_buf(), error),
			}
		}
	}
}

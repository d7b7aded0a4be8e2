use rustc_hash::FxHashMap as HashMap;
use wright_primitives::ComponentKind;

/// Per-kind, per-name configuration fragments handed to the module loader.
///
/// Keyed by qualified name, so `[components.models.userModel]` configures the
/// `user` model.
#[derive(Debug, Clone, Default)]
pub struct ComponentSettings {
	by_kind: HashMap<ComponentKind, HashMap<Box<str>, toml::Table>>,
}

impl ComponentSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds settings from a table shaped like `{ models = { userModel = { .. } } }`.
	///
	/// Unknown kind keys and non-table values are skipped with a warning.
	pub fn from_table(table: &toml::Table) -> Self {
		let mut settings = Self::default();
		for (subdir, names) in table {
			let Some(kind) = ComponentKind::from_subdir(subdir) else {
				tracing::warn!(key = %subdir, "ignoring settings for unknown component kind");
				continue;
			};
			let Some(names) = names.as_table() else {
				tracing::warn!(key = %subdir, "component settings must be a table");
				continue;
			};
			for (name, value) in names {
				match value.as_table() {
					Some(fragment) => settings.insert(kind, name, fragment.clone()),
					None => tracing::warn!(kind = %kind, name = %name, "component settings must be a table"),
				}
			}
		}
		settings
	}

	pub fn insert(&mut self, kind: ComponentKind, name: &str, fragment: toml::Table) {
		self.by_kind.entry(kind).or_default().insert(Box::from(name), fragment);
	}

	/// Fragment for one component, if configured.
	pub fn get(&self, kind: ComponentKind, name: &str) -> Option<&toml::Table> {
		self.by_kind.get(&kind)?.get(name)
	}

	/// Fragment for one component, or an empty table.
	pub fn fragment(&self, kind: ComponentKind, name: &str) -> toml::Table {
		self.get(kind, name).cloned().unwrap_or_default()
	}
}

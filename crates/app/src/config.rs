//! Application configuration.
//!
//! Read from an optional `wright.toml` in the base directory. Every field has
//! a default, so an absent file is the same as an empty one.
//!
//! ```toml
//! minify_views = true
//!
//! [components.models.userModel]
//! table = "users"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wright_registry::{ComponentSettings, LoaderOptions};
use wright_views::PartialOptions;

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "wright.toml";

/// Environment switch that turns on view minification.
pub const MINIFY_ENV: &str = "WRIGHT_MINIFY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
	/// Primary root, relative to the base directory.
	pub app_dir: String,
	/// Directory under each root whose sub-directories are module roots.
	pub modules_dir: String,
	pub public_dir: String,
	pub views_dir: String,
	pub partials_dir: String,
	/// Template file extension, without the dot.
	pub view_engine: String,
	/// Component file extension, without the dot. Empty means none.
	pub component_extension: String,
	pub minify_views: bool,
	/// Log a warning when a later root also defines a component.
	pub warn_ambiguous: bool,
	/// `[components.<kind-subdir>.<qualified-name>]` fragments.
	pub components: toml::Table,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			app_dir: "app".to_owned(),
			modules_dir: "modules".to_owned(),
			public_dir: "public".to_owned(),
			views_dir: "views".to_owned(),
			partials_dir: "partials".to_owned(),
			view_engine: "html".to_owned(),
			component_extension: "toml".to_owned(),
			minify_views: false,
			warn_ambiguous: false,
			components: toml::Table::new(),
		}
	}
}

impl AppConfig {
	/// Loads `wright.toml` from `base_dir`, falling back to defaults, then
	/// applies environment overrides.
	pub fn load(base_dir: &Path) -> Result<Self, ConfigError> {
		let report = load_config_from_dir(base_dir);
		if let Some(error) = report.errors.into_iter().next() {
			return Err(error);
		}
		let mut config = report.config.unwrap_or_default();
		config.apply_env(|key| std::env::var(key).ok());
		Ok(config)
	}

	pub fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
		toml::from_str(source).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Applies overrides looked up through `var`.
	pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
		if let Some(value) = var(MINIFY_ENV) {
			self.minify_views = flag_enabled(&value);
		}
	}

	pub fn primary_root(&self, base_dir: &Path) -> PathBuf {
		base_dir.join(&self.app_dir)
	}

	/// Template suffix including the dot, e.g. `.html`.
	pub fn view_suffix(&self) -> String {
		format!(".{}", self.view_engine)
	}

	pub fn component_settings(&self) -> ComponentSettings {
		ComponentSettings::from_table(&self.components)
	}

	pub fn loader_options(&self) -> LoaderOptions {
		LoaderOptions {
			extension: self.component_extension.clone(),
			warn_ambiguous: self.warn_ambiguous,
		}
	}

	pub fn partial_options(&self) -> PartialOptions {
		PartialOptions {
			dir_name: self.partials_dir.clone(),
			suffix: self.view_suffix(),
		}
	}
}

fn flag_enabled(value: &str) -> bool {
	let value = value.trim();
	!(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Result of loading configuration from a directory.
#[derive(Debug, Default)]
pub struct ConfigLoadReport {
	/// Parsed config if the file existed and was valid.
	pub config: Option<AppConfig>,
	/// Read or parse failures.
	pub errors: Vec<ConfigError>,
}

/// Loads `wright.toml` from `dir`. A missing file yields an empty report.
pub fn load_config_from_dir(dir: &Path) -> ConfigLoadReport {
	let mut report = ConfigLoadReport::default();
	let path = dir.join(CONFIG_FILE);
	if !path.exists() {
		return report;
	}

	let content = match std::fs::read_to_string(&path) {
		Ok(content) => content,
		Err(source) => {
			report.errors.push(ConfigError::Read { path, source });
			return report;
		}
	};

	match AppConfig::parse(&content, &path) {
		Ok(config) => {
			tracing::debug!(path = %path.display(), "loaded configuration");
			report.config = Some(config);
		}
		Err(error) => report.errors.push(error),
	}
	report
}
